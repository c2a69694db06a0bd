//! Fixed-size candidate population.

use rand::Rng;
use rayon::prelude::*;

use super::chromosome::Candidate;
use super::evaluator::Evaluator;
use super::problem::TimetableProblem;

/// An ordered collection of candidates forming one generation.
///
/// Scoring ([`evaluate`](Self::evaluate)) and ranking are separate phases.
/// Already scored candidates, such as carried-over elites, are not
/// re-scored.
#[derive(Debug, Clone, Default)]
pub struct Population {
    candidates: Vec<Candidate>,
}

/// Fitness summary of a scored population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessStats {
    /// Highest fitness.
    pub best: f64,
    /// Mean fitness.
    pub mean: f64,
    /// Lowest fitness.
    pub worst: f64,
}

impl Population {
    /// Creates `size` random candidates.
    pub fn random<R: Rng + ?Sized>(problem: &TimetableProblem, size: usize, rng: &mut R) -> Self {
        let candidates = (0..size).map(|_| Candidate::random(problem, rng)).collect();
        Self { candidates }
    }

    /// Wraps existing candidates.
    pub fn from_candidates(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    /// Scores every unscored candidate.
    ///
    /// With `parallel`, candidates are scored on the rayon thread pool.
    /// The evaluator is read-only, so both paths give identical results.
    pub fn evaluate(&mut self, evaluator: &Evaluator<'_>, parallel: bool) {
        let score = |candidate: &mut Candidate| {
            if candidate.evaluation().is_none() {
                let evaluation = evaluator.evaluate(candidate);
                candidate.set_evaluation(evaluation);
            }
        };
        if parallel {
            self.candidates.par_iter_mut().for_each(score);
        } else {
            self.candidates.iter_mut().for_each(score);
        }
    }

    /// Sorts candidates by descending fitness.
    ///
    /// The sort is stable, so ties keep their current order.
    pub fn rank(&mut self) {
        self.candidates
            .sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
    }

    /// The fittest candidate, if any.
    pub fn best(&self) -> Option<&Candidate> {
        self.candidates
            .iter()
            .reduce(|best, c| if c.fitness() > best.fitness() { c } else { best })
    }

    /// Clones the first `k` candidates. Call after [`rank`](Self::rank).
    pub fn elites(&self, k: usize) -> Vec<Candidate> {
        self.candidates.iter().take(k).cloned().collect()
    }

    /// Fitness summary, or `None` for an empty population.
    pub fn fitness_stats(&self) -> Option<FitnessStats> {
        if self.candidates.is_empty() {
            return None;
        }
        let mut best = f64::NEG_INFINITY;
        let mut worst = f64::INFINITY;
        let mut sum = 0.0;
        for c in &self.candidates {
            let f = c.fitness();
            best = best.max(f);
            worst = worst.min(f);
            sum += f;
        }
        Some(FitnessStats {
            best,
            mean: sum / self.candidates.len() as f64,
            worst,
        })
    }

    /// Candidates in current order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the population is empty.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
