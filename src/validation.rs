//! Input validation for timetabling problems.
//!
//! Two layers of checks run before any optimization:
//!
//! - [`validate_input`]: structural integrity. Detects empty pools,
//!   duplicate identifiers, zero-sized units, and malformed lab lists.
//!   Failures are hard errors.
//! - [`feasibility_report`]: infeasibility diagnostics. Detects offerings
//!   with no eligible instructor and room pools too small to host every
//!   offering without collisions. The caller decides whether these abort.

use crate::models::{Diagnostic, SessionKind, TimetableInput};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two rooms, slots, or units share the same identifier.
    DuplicateId,
    /// No lecture rooms were given.
    NoRooms,
    /// No time slots were given.
    NoTimeSlots,
    /// A unit has a student count of zero.
    EmptyStudentGroup,
    /// A unit offers no courses.
    EmptyUnit,
    /// A unit lists the same course twice.
    DuplicateCourse,
    /// A lab course is not among the unit's courses.
    UnknownLabCourse,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Validates the structure of a timetabling input.
///
/// Checks:
/// 1. At least one lecture room and one time slot
/// 2. No duplicate room IDs (lecture rooms and labs share one namespace)
/// 3. No duplicate time slot IDs
/// 4. No duplicate unit names
/// 5. Every unit has students and at least one course
/// 6. No course listed twice within a unit
/// 7. Every lab course is one of the unit's courses
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(input: &TimetableInput) -> ValidationResult {
    let mut errors = Vec::new();

    if input.rooms.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoRooms,
            "At least one room is required",
        ));
    }
    if input.time_slots.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoTimeSlots,
            "At least one time slot is required",
        ));
    }

    let mut room_ids = HashSet::new();
    for room in input.rooms.iter().chain(&input.labs) {
        if !room_ids.insert(room.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room ID: {room}"),
            ));
        }
    }

    let mut slot_ids = HashSet::new();
    for slot in &input.time_slots {
        if !slot_ids.insert(slot.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate time slot ID: {slot}"),
            ));
        }
    }

    let mut unit_names = HashSet::new();
    for unit in &input.units {
        if !unit_names.insert(unit.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate unit name: {}", unit.name),
            ));
        }

        if unit.student_count == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyStudentGroup,
                format!("Unit '{}' has no students", unit.name),
            ));
        }

        if unit.courses.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyUnit,
                format!("Unit '{}' offers no courses", unit.name),
            ));
        }

        let mut courses = HashSet::new();
        for course in &unit.courses {
            if !courses.insert(course.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateCourse,
                    format!("Unit '{}' lists course '{course}' twice", unit.name),
                ));
            }
        }

        for lab in &unit.lab_courses {
            if !courses.contains(lab.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownLabCourse,
                    format!(
                        "Unit '{}' marks '{lab}' as a lab but does not offer it",
                        unit.name
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Reports infeasibilities in a structurally valid input.
///
/// # Checks
/// - Each offering needs at least one instructor in
///   `eligibility[course] ∩ unit.teachers`.
/// - Schedulable offerings must fit the (room, slot) places of their pool:
///   `|pool| × |slots| ≥ offerings`. With dedicated labs, lecture and lab
///   pools are checked separately; otherwise all offerings share `rooms`.
///
/// An empty report means a conflict-free timetable may exist. It is not a
/// guarantee: instructor overlaps can still make the problem unsolvable.
pub fn feasibility_report(input: &TimetableInput) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut lectures = 0usize;
    let mut labs = 0usize;

    for unit in &input.units {
        for course in &unit.courses {
            if input.eligible_instructors(unit, course).is_empty() {
                diagnostics.push(Diagnostic::unschedulable(&unit.name, course));
                continue;
            }
            match input.session_kind(unit, course) {
                SessionKind::Lab if !input.labs.is_empty() => labs += 1,
                _ => lectures += 1,
            }
        }
    }

    let slots = input.time_slots.len();
    let lecture_capacity = input.rooms.len() * slots;
    if lectures > lecture_capacity {
        diagnostics.push(Diagnostic::capacity_shortfall(
            "lecture room",
            lectures,
            lecture_capacity,
        ));
    }
    let lab_capacity = input.labs.len() * slots;
    if labs > lab_capacity {
        diagnostics.push(Diagnostic::capacity_shortfall("lab", labs, lab_capacity));
    }

    diagnostics
}
