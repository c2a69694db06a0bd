//! Generational GA driver.
//!
//! # Algorithm
//!
//! 1. Build and score a random initial population.
//! 2. Per generation: rank by fitness, carry the top `elite_count`
//!    unchanged, and fill the rest with offspring (select two parents,
//!    cross over, mutate). Score the new population; the old one is dropped.
//! 3. Stop on a conflict-free candidate, the generation budget, the
//!    wall-clock budget, or cancellation. All stop conditions are checked
//!    between generations.
//!
//! The best candidate seen in any generation is tracked separately from
//! the population and is what the run returns.
//!
//! # Determinism
//!
//! Each offspring slot gets its own `SmallRng`, seeded from the master RNG
//! before breeding starts. Parallel and sequential breeding therefore
//! produce the same population for the same seed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand::rngs::SmallRng;
use rayon::prelude::*;

use super::chromosome::Candidate;
use super::config::GaConfig;
use super::evaluator::{Evaluation, Evaluator};
use super::operators::GeneticOperators;
use super::population::Population;
use super::problem::TimetableProblem;
use crate::error::TimetableError;
use crate::models::{Diagnostic, GenerationStats, Termination};

/// Cooperative cancellation flag shared across threads.
///
/// Checked at generation boundaries only.
#[derive(Clone, Default, Debug)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed)
    }
}

/// Output of a GA run, still in index form.
#[derive(Debug, Clone)]
pub struct GaOutcome {
    /// Best candidate observed across all generations.
    pub best: Candidate,
    /// Evaluation of `best`.
    pub evaluation: Evaluation,
    /// Generations evolved after the initial population.
    pub generations: usize,
    /// Per-generation summary, starting with generation 0.
    pub history: Vec<GenerationStats>,
    /// Why the run stopped.
    pub termination: Termination,
    /// Stagnation warnings raised during the run.
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs the timetabling GA on a compiled problem.
///
/// # Example
/// ```
/// use u_timetable::ga::{GaConfig, GaRunner, TimetableProblem};
/// use u_timetable::models::{EligibilityMap, TimetableInput, Unit};
///
/// let input = TimetableInput::new()
///     .with_unit(Unit::new("A", 30).with_courses(["Math", "Art"]))
///     .with_eligibility(EligibilityMap::new().with("Math", ["P1"]).with("Art", ["P2"]))
///     .with_rooms(["R1", "R2"])
///     .with_time_slots(["T1", "T2"]);
/// let problem = TimetableProblem::compile(&input).unwrap();
/// let config = GaConfig::default().with_population_size(20).with_max_generations(50).with_seed(1);
///
/// let outcome = GaRunner::new(&problem, &config).run().unwrap();
/// assert_eq!(outcome.evaluation.conflicts, 0);
/// ```
pub struct GaRunner<'a> {
    problem: &'a TimetableProblem,
    config: &'a GaConfig,
    cancellation: Option<CancellationToken>,
}

impl<'a> GaRunner<'a> {
    pub fn new(problem: &'a TimetableProblem, config: &'a GaConfig) -> Self {
        Self {
            problem,
            config,
            cancellation: None,
        }
    }

    /// Attaches a cancellation token checked between generations.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Runs with an RNG seeded from `config.seed` (or the OS if unset).
    pub fn run(&self) -> Result<GaOutcome, TimetableError> {
        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        self.run_with_rng(&mut rng)
    }

    /// Runs with a caller-supplied RNG.
    ///
    /// # Errors
    /// [`TimetableError::DegenerateConfiguration`] if the configuration is
    /// invalid or its soft constraints name unknown courses or slots. No
    /// error can occur once the run has started.
    pub fn run_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GaOutcome, TimetableError> {
        self.config.validate()?;
        self.config.soft_constraints.validate(self.problem)?;

        let config = self.config;
        let start = Instant::now();
        let evaluator =
            Evaluator::with_soft_constraints(self.problem, config.soft_constraints.clone());
        let operators = config.operators();

        info!(
            "Starting GA: {} offerings, population {}, up to {} generations",
            self.problem.offering_count(),
            config.population_size,
            config.max_generations
        );

        let mut population = Population::random(self.problem, config.population_size, rng);
        population.evaluate(&evaluator, config.parallel);
        population.rank();

        let mut best = population.candidates()[0].clone();
        let mut history = vec![stats(0, &population, best.fitness())];
        let mut diagnostics = Vec::new();
        let mut generation = 0;
        let mut last_improvement = 0;
        let mut stagnation_reported = false;

        let termination = loop {
            if best.is_perfect() {
                break Termination::PerfectFitness;
            }
            if generation >= config.max_generations {
                break Termination::MaxGenerations;
            }
            if config.time_limit.is_some_and(|limit| start.elapsed() >= limit) {
                break Termination::TimeLimit;
            }
            if self
                .cancellation
                .as_ref()
                .is_some_and(CancellationToken::is_cancelled)
            {
                break Termination::Cancelled;
            }

            population = self.next_generation(&population, &operators, &evaluator, rng);
            generation += 1;

            let leader = &population.candidates()[0];
            if leader.fitness() > best.fitness() {
                best = leader.clone();
                last_improvement = generation;
                stagnation_reported = false;
            }

            let entry = stats(generation, &population, best.fitness());
            debug!(
                "Generation {}: best {:.4} (conflicts {}), mean {:.4}, best so far {:.4}",
                generation, entry.best_fitness, entry.best_conflicts, entry.mean_fitness, entry.best_so_far
            );
            history.push(entry);

            if config.stagnation_window > 0
                && !stagnation_reported
                && generation - last_improvement >= config.stagnation_window
            {
                let diagnostic = Diagnostic::no_improvement(
                    last_improvement,
                    config.stagnation_window,
                    best.fitness(),
                );
                warn!("{diagnostic}");
                diagnostics.push(diagnostic);
                stagnation_reported = true;
            }
        };

        let evaluation = best
            .evaluation()
            .copied()
            .unwrap_or_else(|| evaluator.evaluate(&best));

        info!(
            "GA finished after {} generations in {:.2?}: {:?}, fitness {:.4}, conflicts {}",
            generation,
            start.elapsed(),
            termination,
            evaluation.fitness,
            evaluation.conflicts
        );

        Ok(GaOutcome {
            best,
            evaluation,
            generations: generation,
            history,
            termination,
            diagnostics,
        })
    }

    /// Breeds, scores, and ranks the next generation.
    fn next_generation<R: Rng + ?Sized>(
        &self,
        current: &Population,
        operators: &GeneticOperators,
        evaluator: &Evaluator<'_>,
        rng: &mut R,
    ) -> Population {
        let config = self.config;
        let pool = current.candidates();
        let slots = config.population_size - config.elite_count.min(config.population_size);
        let seeds: Vec<u64> = (0..slots).map(|_| rng.random()).collect();

        let breed = |seed: u64| {
            let mut local = SmallRng::seed_from_u64(seed);
            operators.offspring(pool, self.problem, &mut local)
        };
        let offspring: Vec<Candidate> = if config.parallel {
            seeds.into_par_iter().map(breed).collect()
        } else {
            seeds.into_iter().map(breed).collect()
        };

        let mut candidates = current.elites(config.elite_count);
        candidates.extend(offspring);

        let mut next = Population::from_candidates(candidates);
        next.evaluate(evaluator, config.parallel);
        next.rank();
        next
    }
}

fn stats(generation: usize, population: &Population, best_so_far: f64) -> GenerationStats {
    let leader = &population.candidates()[0];
    let summary = population.fitness_stats();
    GenerationStats {
        generation,
        best_fitness: leader.fitness(),
        mean_fitness: summary.map_or(0.0, |s| s.mean),
        best_conflicts: leader.conflicts(),
        best_so_far,
    }
}
