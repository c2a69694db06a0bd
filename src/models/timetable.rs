//! Timetable (solution) model.
//!
//! A timetable is the best candidate found by a run, decoded back into
//! named records, together with the run's diagnostics and fitness history.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Diagnostic;

/// Kind of session an offering is taught as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    /// Regular lecture in a lecture room.
    #[default]
    Lecture,
    /// Lab session, placed in a lab room when labs exist.
    Lab,
}

/// One (unit, course) pair requiring exactly one assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Offering {
    /// Unit name.
    pub unit: String,
    /// Course name.
    pub course: String,
}

impl Offering {
    /// Creates an offering.
    pub fn new(unit: impl Into<String>, course: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            course: course.into(),
        }
    }
}

/// One scheduled occurrence of an offering.
///
/// Within one timetable, `(room, time_slot)` and `(instructor, time_slot)`
/// are each expected to be unique. Violations are counted as conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Unit name.
    pub unit: String,
    /// Course name.
    pub course: String,
    /// Teaching instructor.
    pub instructor: String,
    /// Room identifier.
    pub room: String,
    /// Time slot identifier.
    pub time_slot: String,
    /// Students attending (the unit's student count).
    pub student_count: u32,
    /// Lecture or lab.
    pub session_kind: SessionKind,
}

impl Assignment {
    /// Whether the two assignments collide (same slot and same room or instructor).
    pub fn conflicts_with(&self, other: &Assignment) -> bool {
        self.time_slot == other.time_slot
            && (self.room == other.room || self.instructor == other.instructor)
    }

    /// The offering this assignment schedules.
    pub fn offering(&self) -> Offering {
        Offering::new(&self.unit, &self.course)
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// A conflict-free candidate (fitness 1.0) was found.
    PerfectFitness,
    /// The generation budget was exhausted.
    MaxGenerations,
    /// The wall-clock budget was exhausted.
    TimeLimit,
    /// An external cancellation was requested.
    Cancelled,
}

/// Per-generation fitness summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation index (0 = initial population).
    pub generation: usize,
    /// Best fitness within this generation.
    pub best_fitness: f64,
    /// Mean fitness within this generation.
    pub mean_fitness: f64,
    /// Conflict count of this generation's best candidate.
    pub best_conflicts: usize,
    /// Best fitness observed in any generation so far.
    pub best_so_far: f64,
}

/// Result of a timetabling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timetable {
    /// Best candidate's assignments, in offering order.
    pub assignments: Vec<Assignment>,
    /// Fitness of the best candidate, in (0, 1].
    pub fitness: f64,
    /// Conflict count of the best candidate (hard conflicts plus soft penalties).
    pub conflict_count: usize,
    /// Offerings excluded for lack of an eligible instructor.
    pub unschedulable: Vec<Offering>,
    /// Infeasibility and stagnation diagnostics.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of generations evolved after the initial population.
    pub generations: usize,
    /// Fitness summary per generation, starting with the initial population.
    pub history: Vec<GenerationStats>,
    /// Why the run stopped.
    pub termination: Termination,
}

impl Timetable {
    /// Whether no hard or soft conflict remains.
    pub fn is_conflict_free(&self) -> bool {
        self.conflict_count == 0
    }

    /// Whether any input infeasibility was flagged.
    pub fn has_infeasibility(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_infeasibility)
    }

    /// Assignments taught by `instructor`.
    pub fn by_instructor(&self, instructor: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.instructor == instructor)
            .collect()
    }

    /// Assignments placed in `room`.
    pub fn by_room(&self, room: &str) -> Vec<&Assignment> {
        self.assignments.iter().filter(|a| a.room == room).collect()
    }

    /// Assignments held during `time_slot`.
    pub fn by_time_slot(&self, time_slot: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.time_slot == time_slot)
            .collect()
    }

    /// Assignments of `unit`.
    pub fn by_unit(&self, unit: &str) -> Vec<&Assignment> {
        self.assignments.iter().filter(|a| a.unit == unit).collect()
    }

    /// Groups assignments by time slot, for table-style presentation.
    pub fn grid(&self) -> HashMap<&str, Vec<&Assignment>> {
        let mut grid: HashMap<&str, Vec<&Assignment>> = HashMap::new();
        for a in &self.assignments {
            grid.entry(a.time_slot.as_str()).or_default().push(a);
        }
        grid
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }
}
