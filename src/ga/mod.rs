//! GA-based timetable optimization.
//!
//! A candidate timetable is a fixed-length vector of genes, one per
//! schedulable offering, in unit-then-course order. Each gene holds index
//! references into the compiled problem's instructor, room, and time-slot
//! tables.
//!
//! # Encoding
//!
//! - **Gene**: `(instructor, room, slot)` for one offering. The instructor
//!   is always drawn from the offering's eligible pool and the room from the
//!   pool matching its session kind.
//! - Because gene positions are fixed, every crossover is positional and
//!   never needs repair.
//!
//! # Submodules
//!
//! - [`operators`]: Runtime-selectable selection, crossover, and mutation
//!
//! # Reference
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization, and Machine Learning"

mod chromosome;
mod config;
mod evaluator;
pub mod operators;
mod population;
mod problem;
mod runner;

pub use chromosome::{
    Candidate, Gene, gene_mutation, single_point_crossover, two_point_crossover,
    uniform_crossover, unit_block_crossover,
};
pub use config::{GaConfig, InfeasibilityPolicy};
pub use evaluator::{Evaluation, Evaluator, SoftConstraints, fitness_from_conflicts};
pub use population::{FitnessStats, Population};
pub use problem::{OfferingInfo, TimetableProblem};
pub use runner::{CancellationToken, GaOutcome, GaRunner};
