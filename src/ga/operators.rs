//! Configurable genetic operators for timetabling.
//!
//! Provides runtime-selectable selection, crossover, and mutation
//! strategies via [`GeneticOperators`].
//!
//! # Usage
//!
//! ```
//! use u_timetable::ga::operators::{CrossoverType, GeneticOperators, SelectionType};
//!
//! let ops = GeneticOperators::default();
//! assert_eq!(ops.crossover_type, CrossoverType::UnitBlock);
//! assert_eq!(ops.selection_type, SelectionType::Tournament { size: 3 });
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::chromosome::{
    Candidate, gene_mutation, single_point_crossover, two_point_crossover, uniform_crossover,
    unit_block_crossover,
};
use super::problem::TimetableProblem;

/// Parent selection strategy.
///
/// Both strategies favor fitter candidates while giving every candidate
/// a nonzero chance of selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionType {
    /// Best of `size` candidates drawn uniformly with replacement.
    Tournament {
        /// Tournament size (≥ 1).
        size: usize,
    },
    /// Fitness-proportional (roulette wheel) selection.
    RouletteWheel,
}

/// Crossover strategy over the fixed-order gene vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverType {
    /// One cut point; prefix from parent 1, suffix from parent 2.
    SinglePoint,
    /// Two cut points; middle segment from parent 2.
    TwoPoint,
    /// Each gene independently from either parent.
    Uniform,
    /// Each unit's block of genes from either parent.
    UnitBlock,
}

/// Runtime-selectable genetic operators for timetabling GA.
///
/// # Example
///
/// ```
/// use u_timetable::ga::operators::{CrossoverType, GeneticOperators, SelectionType};
///
/// let ops = GeneticOperators {
///     selection_type: SelectionType::RouletteWheel,
///     crossover_type: CrossoverType::Uniform,
///     mutation_rate: 0.1,
/// };
/// ```
#[derive(Debug, Clone)]
pub struct GeneticOperators {
    /// Parent selection strategy.
    pub selection_type: SelectionType,
    /// Crossover strategy.
    pub crossover_type: CrossoverType,
    /// Per-gene mutation probability in [0, 1].
    pub mutation_rate: f64,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self {
            selection_type: SelectionType::Tournament { size: 3 },
            crossover_type: CrossoverType::UnitBlock,
            mutation_rate: 0.05,
        }
    }
}

impl GeneticOperators {
    /// Selects one parent from a non-empty candidate pool.
    ///
    /// # Panics
    /// Panics if `pool` is empty.
    pub fn select<'p, R: Rng + ?Sized>(&self, pool: &'p [Candidate], rng: &mut R) -> &'p Candidate {
        match self.selection_type {
            SelectionType::Tournament { size } => tournament_select(pool, size.max(1), rng),
            SelectionType::RouletteWheel => roulette_select(pool, rng),
        }
    }

    /// Produces one offspring using the configured crossover.
    pub fn crossover<R: Rng + ?Sized>(
        &self,
        p1: &Candidate,
        p2: &Candidate,
        problem: &TimetableProblem,
        rng: &mut R,
    ) -> Candidate {
        match self.crossover_type {
            CrossoverType::SinglePoint => single_point_crossover(p1, p2, rng),
            CrossoverType::TwoPoint => two_point_crossover(p1, p2, rng),
            CrossoverType::Uniform => uniform_crossover(p1, p2, rng),
            CrossoverType::UnitBlock => unit_block_crossover(p1, p2, problem, rng),
        }
    }

    /// Applies per-gene mutation at the configured rate.
    pub fn mutate<R: Rng + ?Sized>(
        &self,
        candidate: &mut Candidate,
        problem: &TimetableProblem,
        rng: &mut R,
    ) -> usize {
        gene_mutation(candidate, problem, self.mutation_rate, rng)
    }

    /// Selects two parents and produces one mutated offspring.
    pub fn offspring<R: Rng + ?Sized>(
        &self,
        pool: &[Candidate],
        problem: &TimetableProblem,
        rng: &mut R,
    ) -> Candidate {
        let p1 = self.select(pool, rng);
        let p2 = self.select(pool, rng);
        let mut child = self.crossover(p1, p2, problem, rng);
        self.mutate(&mut child, problem, rng);
        child
    }
}

fn tournament_select<'p, R: Rng + ?Sized>(
    pool: &'p [Candidate],
    size: usize,
    rng: &mut R,
) -> &'p Candidate {
    let mut best = &pool[rng.random_range(0..pool.len())];
    for _ in 1..size {
        let challenger = &pool[rng.random_range(0..pool.len())];
        if challenger.fitness() > best.fitness() {
            best = challenger;
        }
    }
    best
}

fn roulette_select<'p, R: Rng + ?Sized>(pool: &'p [Candidate], rng: &mut R) -> &'p Candidate {
    let total: f64 = pool.iter().map(Candidate::fitness).sum();
    if !(total > 0.0) || !total.is_finite() {
        return &pool[rng.random_range(0..pool.len())];
    }
    let mut spin = rng.random_range(0.0..total);
    for candidate in pool {
        spin -= candidate.fitness();
        if spin < 0.0 {
            return candidate;
        }
    }
    // Floating-point residue
    &pool[pool.len() - 1]
}
