//! Problem input snapshot.
//!
//! A [`TimetableInput`] is the immutable description of one timetabling
//! run: units with their offerings, the eligibility relation, and the
//! room and time-slot pools.

use serde::{Deserialize, Serialize};

use super::{EligibilityMap, Offering, SessionKind, Unit};

/// Complete input for one optimization run.
///
/// Room and time-slot identifiers are opaque labels. Slots carry no
/// chronological meaning beyond identity.
///
/// # Example
/// ```
/// use u_timetable::models::{EligibilityMap, TimetableInput, Unit};
///
/// let input = TimetableInput::new()
///     .with_unit(Unit::new("Class 9", 30).with_courses(["Math", "English"]))
///     .with_eligibility(
///         EligibilityMap::new()
///             .with("Math", ["Alice"])
///             .with("English", ["Bob"]),
///     )
///     .with_rooms(["R1", "R2"])
///     .with_time_slots(["08:00", "09:00"]);
/// assert_eq!(input.offering_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimetableInput {
    /// Units, in offering order.
    pub units: Vec<Unit>,
    /// Course → eligible instructors.
    #[serde(default)]
    pub eligibility: EligibilityMap,
    /// Lecture rooms.
    pub rooms: Vec<String>,
    /// Lab rooms. When empty, lab sessions use `rooms`.
    #[serde(default)]
    pub labs: Vec<String>,
    /// Time slots.
    pub time_slots: Vec<String>,
}

impl TimetableInput {
    /// Creates an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an input from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Adds a unit.
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.units.push(unit);
        self
    }

    /// Replaces the eligibility map.
    pub fn with_eligibility(mut self, eligibility: EligibilityMap) -> Self {
        self.eligibility = eligibility;
        self
    }

    /// Sets the lecture rooms.
    pub fn with_rooms<I, S>(mut self, rooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rooms = rooms.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the lab rooms.
    pub fn with_labs<I, S>(mut self, labs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labs = labs.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the time slots.
    pub fn with_time_slots<I, S>(mut self, slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.time_slots = slots.into_iter().map(Into::into).collect();
        self
    }

    /// All offerings in unit-then-course order.
    pub fn offerings(&self) -> impl Iterator<Item = Offering> + '_ {
        self.units.iter().flat_map(|unit| {
            unit.courses
                .iter()
                .map(move |course| Offering::new(&unit.name, course))
        })
    }

    /// Total number of offerings across all units.
    pub fn offering_count(&self) -> usize {
        self.units.iter().map(Unit::offering_count).sum()
    }

    /// Rooms a session of `kind` may be placed in.
    pub fn room_pool(&self, kind: SessionKind) -> &[String] {
        match kind {
            SessionKind::Lab if !self.labs.is_empty() => &self.labs,
            _ => &self.rooms,
        }
    }

    /// Session kind of `course` within `unit`.
    pub fn session_kind(&self, unit: &Unit, course: &str) -> SessionKind {
        if unit.is_lab(course) {
            SessionKind::Lab
        } else {
            SessionKind::Lecture
        }
    }

    /// Instructors eligible for `course` who also belong to the unit pool.
    pub fn eligible_instructors<'a>(&'a self, unit: &'a Unit, course: &str) -> Vec<&'a str> {
        self.eligibility
            .instructors_for(course)
            .iter()
            .map(String::as_str)
            .filter(|instructor| unit.admits(instructor))
            .collect()
    }

    /// Looks up a unit by name.
    pub fn unit(&self, name: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TimetableInput {
        TimetableInput::new()
            .with_unit(
                Unit::new("A", 30)
                    .with_courses(["Math", "Art"])
                    .with_lab_course("Chem")
                    .with_teachers(["Alice", "Bob"]),
            )
            .with_eligibility(
                EligibilityMap::new()
                    .with("Math", ["Alice", "Zed"])
                    .with("Art", ["Zed"])
                    .with("Chem", ["Bob"]),
            )
            .with_rooms(["R1"])
            .with_labs(["L1"])
            .with_time_slots(["T1", "T2"])
    }

    #[test]
    fn test_offerings_order() {
        let input = sample();
        let offerings: Vec<Offering> = input.offerings().collect();
        assert_eq!(offerings.len(), 3);
        assert_eq!(offerings[0], Offering::new("A", "Math"));
        assert_eq!(offerings[2], Offering::new("A", "Chem"));
        assert_eq!(input.offering_count(), 3);
    }

    #[test]
    fn test_eligible_instructors_intersects_pool() {
        let input = sample();
        let unit = &input.units[0];
        assert_eq!(input.eligible_instructors(unit, "Math"), vec!["Alice"]);
        assert!(input.eligible_instructors(unit, "Art").is_empty());
    }

    #[test]
    fn test_room_pools() {
        let input = sample();
        assert_eq!(input.room_pool(SessionKind::Lab), ["L1"]);
        assert_eq!(input.room_pool(SessionKind::Lecture), ["R1"]);

        let no_labs = input.with_labs(Vec::<String>::new());
        assert_eq!(no_labs.room_pool(SessionKind::Lab), ["R1"]);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "units": [{"name": "CS", "student_count": 25, "courses": ["Math"]}],
            "eligibility": {"Math": ["Alice"]},
            "rooms": ["R1"],
            "time_slots": ["Mon 9:00"]
        }"#;
        let input = TimetableInput::from_json_str(json).unwrap();
        assert_eq!(input.units[0].student_count, 25);
        assert!(input.labs.is_empty());
        assert_eq!(input.eligibility.instructors_for("Math"), ["Alice"]);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(TimetableInput::from_json_str("{\"units\": 3}").is_err());
    }
}
