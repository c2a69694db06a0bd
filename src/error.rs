//! Error types.

use thiserror::Error;

use crate::models::Diagnostic;
use crate::validation::ValidationError;

/// Errors that stop a run before it starts.
///
/// Conditions discovered during a run (stagnation, flagged offerings) are
/// reported as [`Diagnostic`]s on the result instead.
#[derive(Debug, Error)]
pub enum TimetableError {
    /// The input is structurally malformed.
    #[error("invalid input: {}", join(.0))]
    InvalidInput(Vec<ValidationError>),

    /// The input cannot yield a conflict-free timetable and the
    /// configuration asks to abort in that case.
    #[error("infeasible input: {}", join(.0))]
    InfeasibleInput(Vec<Diagnostic>),

    /// The optimizer configuration is outside its valid ranges.
    #[error("degenerate configuration: {0}")]
    DegenerateConfiguration(String),
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
