//! Compiled timetabling problem.
//!
//! Interns instructors, rooms, and time slots to dense indices so that
//! candidates are plain index vectors and evaluation avoids string work.
//! Bridges the named input model to the GA encoding and back.

use std::collections::HashMap;
use std::ops::Range;

use log::trace;

use super::chromosome::Candidate;
use crate::error::TimetableError;
use crate::models::{Assignment, Offering, SessionKind, TimetableInput};
use crate::validation::validate_input;

/// Compact offering descriptor for GA encoding.
///
/// Extracted from `Unit`/`EligibilityMap` so candidates never touch names.
#[derive(Debug, Clone)]
pub struct OfferingInfo {
    /// Unit name.
    pub unit: String,
    /// Course name.
    pub course: String,
    /// Index of the unit in the input.
    pub unit_index: usize,
    /// Students attending.
    pub student_count: u32,
    /// Lecture or lab.
    pub session_kind: SessionKind,
    /// Candidate instructor indices (eligible ∩ unit pool). Never empty.
    pub instructors: Vec<usize>,
    /// Candidate room indices for this session kind. Never empty.
    pub rooms: Vec<usize>,
}

/// A timetabling problem ready for optimization.
///
/// Offerings are ordered unit-then-course; every candidate uses this order.
/// Offerings without an eligible instructor are excluded and listed in
/// `unschedulable`.
#[derive(Debug, Clone)]
pub struct TimetableProblem {
    /// Schedulable offerings, in gene order.
    pub offerings: Vec<OfferingInfo>,
    /// Instructor names by index.
    pub instructors: Vec<String>,
    /// Room names by index (lecture rooms, then labs).
    pub rooms: Vec<String>,
    /// Time slot names by index.
    pub time_slots: Vec<String>,
    /// Offerings excluded for lack of an eligible instructor.
    pub unschedulable: Vec<Offering>,
    /// Gene range of each unit that has schedulable offerings.
    pub unit_ranges: Vec<Range<usize>>,
}

impl TimetableProblem {
    /// Compiles a validated input.
    ///
    /// # Errors
    /// [`TimetableError::InvalidInput`] if the input fails structural
    /// validation (empty pools, duplicates).
    pub fn compile(input: &TimetableInput) -> Result<Self, TimetableError> {
        validate_input(input).map_err(TimetableError::InvalidInput)?;

        let mut instructors: Vec<String> = Vec::new();
        let mut instructor_index: HashMap<&str, usize> = HashMap::new();

        let rooms: Vec<String> = input.rooms.iter().chain(&input.labs).cloned().collect();
        let room_index: HashMap<&str, usize> = rooms
            .iter()
            .enumerate()
            .map(|(i, r)| (r.as_str(), i))
            .collect();
        let pool = |kind: SessionKind| -> Vec<usize> {
            input
                .room_pool(kind)
                .iter()
                .filter_map(|r| room_index.get(r.as_str()).copied())
                .collect()
        };
        let lecture_rooms = pool(SessionKind::Lecture);
        let lab_rooms = pool(SessionKind::Lab);

        let mut offerings = Vec::with_capacity(input.offering_count());
        let mut unschedulable = Vec::new();
        let mut unit_ranges = Vec::new();

        for (unit_index, unit) in input.units.iter().enumerate() {
            let start = offerings.len();
            for course in &unit.courses {
                let eligible = input.eligible_instructors(unit, course);
                if eligible.is_empty() {
                    unschedulable.push(Offering::new(&unit.name, course));
                    continue;
                }

                let candidates = eligible
                    .into_iter()
                    .map(|name| {
                        *instructor_index.entry(name).or_insert_with(|| {
                            instructors.push(name.to_string());
                            instructors.len() - 1
                        })
                    })
                    .collect();

                let session_kind = input.session_kind(unit, course);
                let room_candidates = match session_kind {
                    SessionKind::Lab => lab_rooms.clone(),
                    SessionKind::Lecture => lecture_rooms.clone(),
                };

                offerings.push(OfferingInfo {
                    unit: unit.name.clone(),
                    course: course.clone(),
                    unit_index,
                    student_count: unit.student_count,
                    session_kind,
                    instructors: candidates,
                    rooms: room_candidates,
                });
            }
            if offerings.len() > start {
                unit_ranges.push(start..offerings.len());
            }
        }

        trace!(
            "Compiled {} offerings ({} unschedulable), {} instructors, {} rooms, {} slots",
            offerings.len(),
            unschedulable.len(),
            instructors.len(),
            rooms.len(),
            input.time_slots.len()
        );

        Ok(Self {
            offerings,
            instructors,
            rooms,
            time_slots: input.time_slots.clone(),
            unschedulable,
            unit_ranges,
        })
    }

    /// Number of genes per candidate.
    #[inline]
    pub fn offering_count(&self) -> usize {
        self.offerings.len()
    }

    /// Number of time slots.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.time_slots.len()
    }

    /// Decodes a candidate into named assignments.
    ///
    /// Genes with out-of-range indices are skipped; callers should only
    /// decode candidates for which [`Candidate::is_valid`] holds.
    pub fn decode(&self, candidate: &Candidate) -> Vec<Assignment> {
        self.offerings
            .iter()
            .zip(&candidate.genes)
            .filter_map(|(offering, gene)| {
                Some(Assignment {
                    unit: offering.unit.clone(),
                    course: offering.course.clone(),
                    instructor: self.instructors.get(gene.instructor)?.clone(),
                    room: self.rooms.get(gene.room)?.clone(),
                    time_slot: self.time_slots.get(gene.slot)?.clone(),
                    student_count: offering.student_count,
                    session_kind: offering.session_kind,
                })
            })
            .collect()
    }
}
