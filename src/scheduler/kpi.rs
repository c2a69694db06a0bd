//! Timetable quality metrics (KPIs).
//!
//! Computes load and occupancy indicators from a finished timetable and
//! the input it was built from.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Sessions per instructor | Assignments taught by each instructor |
//! | Load spread | max − min sessions over instructors with any session |
//! | Room utilization | Sessions in a room / number of time slots |
//! | Slot occupancy | Sessions in a slot / number of rooms (incl. labs) |
//! | Conflict pairs | Pairs sharing a slot and a room or instructor |

use std::collections::HashMap;

use crate::models::{Timetable, TimetableInput};

/// Timetable performance indicators.
#[derive(Debug, Clone)]
pub struct TimetableKpi {
    /// Sessions taught by each instructor.
    pub sessions_by_instructor: HashMap<String, usize>,
    /// Difference between the busiest and least busy instructor.
    pub load_spread: usize,
    /// Per-room utilization (0.0..=1.0 when conflict-free).
    pub utilization_by_room: HashMap<String, f64>,
    /// Mean utilization over every declared room and lab.
    pub avg_room_utilization: f64,
    /// Fraction of places used in each time slot.
    pub occupancy_by_slot: HashMap<String, f64>,
    /// Hard-conflict pairs remaining in the timetable.
    pub conflict_pairs: usize,
}

impl TimetableKpi {
    /// Computes KPIs from a timetable and its input.
    ///
    /// Rooms and slots declared in the input but never used report 0.0.
    pub fn calculate(timetable: &Timetable, input: &TimetableInput) -> Self {
        let mut sessions_by_instructor: HashMap<String, usize> = HashMap::new();
        let mut room_sessions: HashMap<&str, usize> = HashMap::new();
        let mut slot_sessions: HashMap<&str, usize> = HashMap::new();

        for a in &timetable.assignments {
            *sessions_by_instructor.entry(a.instructor.clone()).or_default() += 1;
            *room_sessions.entry(a.room.as_str()).or_default() += 1;
            *slot_sessions.entry(a.time_slot.as_str()).or_default() += 1;
        }

        let load_spread = match (
            sessions_by_instructor.values().max(),
            sessions_by_instructor.values().min(),
        ) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        };

        let slots = input.time_slots.len();
        let utilization_by_room: HashMap<String, f64> = input
            .rooms
            .iter()
            .chain(&input.labs)
            .map(|room| {
                let used = room_sessions.get(room.as_str()).copied().unwrap_or(0);
                (room.clone(), ratio(used, slots))
            })
            .collect();
        let avg_room_utilization = if utilization_by_room.is_empty() {
            0.0
        } else {
            utilization_by_room.values().sum::<f64>() / utilization_by_room.len() as f64
        };

        let places = input.rooms.len() + input.labs.len();
        let occupancy_by_slot = input
            .time_slots
            .iter()
            .map(|slot| {
                let used = slot_sessions.get(slot.as_str()).copied().unwrap_or(0);
                (slot.clone(), ratio(used, places))
            })
            .collect();

        let conflict_pairs = timetable
            .assignments
            .iter()
            .enumerate()
            .map(|(i, a)| {
                timetable.assignments[i + 1..]
                    .iter()
                    .filter(|b| a.conflicts_with(b))
                    .count()
            })
            .sum();

        Self {
            sessions_by_instructor,
            load_spread,
            utilization_by_room,
            avg_room_utilization,
            occupancy_by_slot,
            conflict_pairs,
        }
    }

    /// Whether no instructor teaches more than `max_spread` sessions
    /// beyond the least loaded one.
    pub fn is_balanced(&self, max_spread: usize) -> bool {
        self.load_spread <= max_spread
    }
}

fn ratio(used: usize, capacity: usize) -> f64 {
    if capacity == 0 {
        0.0
    } else {
        used as f64 / capacity as f64
    }
}
