//! Organizational unit model.
//!
//! A unit is a department, class, or stream. It offers an ordered list of
//! courses, all attended by the same student group.

use serde::{Deserialize, Serialize};

/// An organizational unit offering courses to one student group.
///
/// Every course in `courses` is one offering that must receive exactly one
/// assignment. Courses share the unit's `student_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique unit name.
    pub name: String,
    /// Number of students attending every course of this unit.
    pub student_count: u32,
    /// Offered courses, in offering order.
    pub courses: Vec<String>,
    /// Unit teacher pool. Empty means any eligible instructor may teach.
    #[serde(default)]
    pub teachers: Vec<String>,
    /// Courses taught as lab sessions (must also appear in `courses`).
    #[serde(default)]
    pub lab_courses: Vec<String>,
}

impl Unit {
    /// Creates a unit with no courses.
    pub fn new(name: impl Into<String>, student_count: u32) -> Self {
        Self {
            name: name.into(),
            student_count,
            courses: Vec::new(),
            teachers: Vec::new(),
            lab_courses: Vec::new(),
        }
    }

    /// Adds a lecture course.
    pub fn with_course(mut self, course: impl Into<String>) -> Self {
        self.courses.push(course.into());
        self
    }

    /// Adds several lecture courses.
    pub fn with_courses<I, S>(mut self, courses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.courses.extend(courses.into_iter().map(Into::into));
        self
    }

    /// Adds a course taught as a lab session.
    pub fn with_lab_course(mut self, course: impl Into<String>) -> Self {
        let course = course.into();
        self.courses.push(course.clone());
        self.lab_courses.push(course);
        self
    }

    /// Adds a teacher to the unit pool.
    pub fn with_teacher(mut self, teacher: impl Into<String>) -> Self {
        self.teachers.push(teacher.into());
        self
    }

    /// Adds several teachers to the unit pool.
    pub fn with_teachers<I, S>(mut self, teachers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.teachers.extend(teachers.into_iter().map(Into::into));
        self
    }

    /// Whether `course` is taught as a lab in this unit.
    pub fn is_lab(&self, course: &str) -> bool {
        self.lab_courses.iter().any(|c| c == course)
    }

    /// Whether `instructor` belongs to this unit's pool.
    ///
    /// An empty pool admits every instructor.
    pub fn admits(&self, instructor: &str) -> bool {
        self.teachers.is_empty() || self.teachers.iter().any(|t| t == instructor)
    }

    /// Number of offerings (one per course).
    pub fn offering_count(&self) -> usize {
        self.courses.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_builder() {
        let unit = Unit::new("CS", 40)
            .with_courses(["Math", "Physics"])
            .with_lab_course("Chemistry")
            .with_teacher("Alice");

        assert_eq!(unit.name, "CS");
        assert_eq!(unit.student_count, 40);
        assert_eq!(unit.courses, vec!["Math", "Physics", "Chemistry"]);
        assert!(unit.is_lab("Chemistry"));
        assert!(!unit.is_lab("Math"));
        assert_eq!(unit.offering_count(), 3);
    }

    #[test]
    fn test_empty_pool_admits_everyone() {
        let unit = Unit::new("CS", 40);
        assert!(unit.admits("anyone"));

        let unit = unit.with_teacher("Alice");
        assert!(unit.admits("Alice"));
        assert!(!unit.admits("Bob"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let unit: Unit =
            serde_json::from_str(r#"{"name":"A","student_count":10,"courses":["X"]}"#).unwrap();
        assert!(unit.teachers.is_empty());
        assert!(unit.lab_courses.is_empty());
    }
}
