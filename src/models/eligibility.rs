//! Course → instructor eligibility relation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from course name to the instructors qualified to teach it.
///
/// Instructor lists keep insertion order and never contain duplicates.
/// A `BTreeMap` keeps serialization and iteration order stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EligibilityMap {
    courses: BTreeMap<String, Vec<String>>,
}

impl EligibilityMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `instructor` as eligible for `course`.
    pub fn insert(&mut self, course: impl Into<String>, instructor: impl Into<String>) {
        let instructor = instructor.into();
        let entry = self.courses.entry(course.into()).or_default();
        if !entry.contains(&instructor) {
            entry.push(instructor);
        }
    }

    /// Builder form of [`insert`](Self::insert) for several instructors.
    pub fn with<I, S>(mut self, course: impl Into<String>, instructors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let course = course.into();
        // Registers the course even when the list is empty.
        self.courses.entry(course.clone()).or_default();
        for instructor in instructors {
            self.insert(course.clone(), instructor);
        }
        self
    }

    /// Builds the map from an instructor → taught subjects relation.
    ///
    /// This is the shape collected per instructor by input forms.
    pub fn from_teacher_subjects<'a, I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, S)>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        let mut map = Self::new();
        for (teacher, subjects) in pairs {
            for subject in subjects {
                map.insert(subject, teacher);
            }
        }
        map
    }

    /// Eligible instructors for `course` (empty if unknown).
    pub fn instructors_for(&self, course: &str) -> &[String] {
        self.courses.get(course).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the course has an entry (possibly empty).
    pub fn contains_course(&self, course: &str) -> bool {
        self.courses.contains_key(course)
    }

    /// All instructor names, sorted and de-duplicated.
    pub fn instructors(&self) -> Vec<&str> {
        let mut all: Vec<&str> = self
            .courses
            .values()
            .flat_map(|v| v.iter().map(String::as_str))
            .collect();
        all.sort_unstable();
        all.dedup();
        all
    }

    /// Number of courses with an entry.
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether no course has an entry.
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
