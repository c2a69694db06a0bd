//! Structured, non-fatal diagnostics attached to a run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A diagnostic surfaced to the caller.
///
/// Diagnostics never abort a run on their own. Whether an infeasibility
/// aborts is decided by [`InfeasibilityPolicy`](crate::ga::InfeasibilityPolicy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Diagnostic category.
    pub kind: DiagnosticKind,
    /// Entity the diagnostic is about (offering, room pool, run).
    pub subject: String,
    /// Human-readable description.
    pub message: String,
}

/// Categories of diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// An offering has no eligible instructor in its unit's pool.
    UnschedulableOffering,
    /// More offerings than (room, slot) places in a room pool.
    CapacityShortfall,
    /// Best fitness did not improve over the configured window.
    NoImprovement,
}

impl Diagnostic {
    /// Creates an unschedulable-offering diagnostic.
    pub fn unschedulable(unit: &str, course: &str) -> Self {
        Self {
            kind: DiagnosticKind::UnschedulableOffering,
            subject: format!("{unit}/{course}"),
            message: format!(
                "Course '{course}' of unit '{unit}' has no eligible instructor in the unit's pool"
            ),
        }
    }

    /// Creates a capacity-shortfall diagnostic.
    pub fn capacity_shortfall(pool: &str, offerings: usize, capacity: usize) -> Self {
        Self {
            kind: DiagnosticKind::CapacityShortfall,
            subject: pool.to_string(),
            message: format!(
                "{offerings} offerings need {pool} places but only {capacity} (room, slot) pairs exist"
            ),
        }
    }

    /// Creates a no-improvement warning.
    pub fn no_improvement(since_generation: usize, window: usize, best_fitness: f64) -> Self {
        Self {
            kind: DiagnosticKind::NoImprovement,
            subject: "run".to_string(),
            message: format!(
                "Best fitness {best_fitness:.4} unchanged for {window} generations since generation {since_generation}"
            ),
        }
    }

    /// Whether this diagnostic reports infeasible input.
    pub fn is_infeasibility(&self) -> bool {
        matches!(
            self.kind,
            DiagnosticKind::UnschedulableOffering | DiagnosticKind::CapacityShortfall
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}
