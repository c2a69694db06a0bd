//! Conflict and fitness evaluation.
//!
//! # Hard conflicts
//!
//! A conflict is a pair of genes sharing a time slot and either a room or
//! an instructor. Each such pair counts once, so a gene colliding with two
//! others contributes two conflicts. Pairs are counted by grouping rather
//! than by pairwise comparison:
//!
//! ```text
//! conflicts = Σ C(n, 2) over (slot, room) groups
//!           + Σ C(n, 2) over (slot, instructor) groups
//!           - Σ C(n, 2) over (slot, room, instructor) groups
//! ```
//!
//! The subtraction removes pairs counted by both of the first two terms.
//!
//! # Fitness
//!
//! `fitness = 1 / (1 + conflicts)`, where `conflicts` is hard conflicts
//! plus weighted soft penalties. 1.0 means conflict-free; fitness never
//! reaches zero.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::chromosome::Candidate;
use super::problem::TimetableProblem;
use crate::error::TimetableError;

/// Result of evaluating one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Room and instructor collision pairs.
    pub hard_conflicts: usize,
    /// Weighted soft-constraint penalty.
    pub soft_penalty: usize,
    /// `hard_conflicts + soft_penalty`.
    pub conflicts: usize,
    /// `1 / (1 + conflicts)`.
    pub fitness: f64,
}

impl Evaluation {
    /// Builds an evaluation from its conflict terms.
    pub fn new(hard_conflicts: usize, soft_penalty: usize) -> Self {
        let conflicts = hard_conflicts.saturating_add(soft_penalty);
        Self {
            hard_conflicts,
            soft_penalty,
            conflicts,
            fitness: fitness_from_conflicts(conflicts),
        }
    }

    /// Evaluation assigned to malformed candidates.
    pub fn worst() -> Self {
        Self::new(usize::MAX, 0)
    }

    /// Whether the candidate is conflict-free.
    #[inline]
    pub fn is_perfect(&self) -> bool {
        self.conflicts == 0
    }
}

/// Maps a conflict count to fitness: `1 / (1 + conflicts)`.
#[inline]
pub fn fitness_from_conflicts(conflicts: usize) -> f64 {
    1.0 / (1.0 + conflicts as f64)
}

/// Optional quality terms folded into the conflict count.
///
/// All terms are disabled by default, so the default evaluation counts
/// hard conflicts only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftConstraints {
    /// Penalty per pair of same-unit sessions sharing a slot.
    pub unit_overlap_weight: usize,
    /// Sessions an instructor may teach before overload applies.
    pub max_sessions_per_instructor: Option<usize>,
    /// Penalty per session above `max_sessions_per_instructor`.
    pub overload_weight: usize,
    /// Course → preferred time slots. Courses not listed have no preference.
    pub preferred_slots: HashMap<String, Vec<String>>,
    /// Penalty per session outside its course's preferred slots.
    pub preference_weight: usize,
}

impl SoftConstraints {
    /// Whether every soft term is disabled.
    pub fn is_disabled(&self) -> bool {
        self.unit_overlap_weight == 0
            && (self.max_sessions_per_instructor.is_none() || self.overload_weight == 0)
            && (self.preferred_slots.is_empty() || self.preference_weight == 0)
    }

    /// Sets the same-unit overlap penalty.
    pub fn with_unit_overlap(mut self, weight: usize) -> Self {
        self.unit_overlap_weight = weight;
        self
    }

    /// Sets the instructor load cap and its penalty.
    pub fn with_instructor_cap(mut self, max_sessions: usize, weight: usize) -> Self {
        self.max_sessions_per_instructor = Some(max_sessions);
        self.overload_weight = weight;
        self
    }

    /// Adds preferred slots for a course.
    pub fn with_preferred_slots<I, S>(mut self, course: impl Into<String>, slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_slots
            .entry(course.into())
            .or_default()
            .extend(slots.into_iter().map(Into::into));
        self
    }

    /// Sets the preferred-slot penalty.
    pub fn with_preference_weight(mut self, weight: usize) -> Self {
        self.preference_weight = weight;
        self
    }

    /// Checks every preferred-slot entry against the problem.
    ///
    /// # Errors
    /// [`TimetableError::DegenerateConfiguration`] if an entry names a course
    /// no unit offers, or a time slot the problem does not define. Either
    /// would penalize every candidate and make a perfect score unreachable.
    pub fn validate(&self, problem: &TimetableProblem) -> Result<(), TimetableError> {
        let courses: HashSet<&str> = problem
            .offerings
            .iter()
            .map(|o| o.course.as_str())
            .chain(problem.unschedulable.iter().map(|o| o.course.as_str()))
            .collect();

        let mut entries: Vec<_> = self.preferred_slots.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        for (course, slots) in entries {
            if !courses.contains(course.as_str()) {
                return Err(TimetableError::DegenerateConfiguration(format!(
                    "preferred slots given for unknown course '{course}'"
                )));
            }
            if let Some(slot) = slots.iter().find(|s| !problem.time_slots.contains(*s)) {
                return Err(TimetableError::DegenerateConfiguration(format!(
                    "preferred slot '{slot}' for course '{course}' is not a time slot"
                )));
            }
        }
        Ok(())
    }
}

/// Scores candidates against one problem.
///
/// Holds only read-only data; safe to share across threads.
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    problem: &'a TimetableProblem,
    soft: SoftConstraints,
    /// Per gene: allowed slot indices, `None` if unrestricted.
    preferred: Vec<Option<HashSet<usize>>>,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator counting hard conflicts only.
    pub fn new(problem: &'a TimetableProblem) -> Self {
        Self::with_soft_constraints(problem, SoftConstraints::default())
    }

    /// Creates an evaluator with soft-constraint terms.
    pub fn with_soft_constraints(problem: &'a TimetableProblem, soft: SoftConstraints) -> Self {
        let slot_index: HashMap<&str, usize> = problem
            .time_slots
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), i))
            .collect();

        let preferred = problem
            .offerings
            .iter()
            .map(|offering| {
                soft.preferred_slots.get(&offering.course).map(|slots| {
                    slots
                        .iter()
                        .filter_map(|s| slot_index.get(s.as_str()).copied())
                        .collect()
                })
            })
            .collect();

        Self {
            problem,
            soft,
            preferred,
        }
    }

    /// Evaluates a candidate.
    ///
    /// Pure: identical candidates always yield identical results.
    /// Malformed candidates (wrong length, out-of-domain genes) evaluate
    /// to [`Evaluation::worst`] instead of failing.
    pub fn evaluate(&self, candidate: &Candidate) -> Evaluation {
        if !candidate.is_valid(self.problem) {
            return Evaluation::worst();
        }
        let hard = self.hard_conflicts(candidate);
        let soft = if self.soft.is_disabled() {
            0
        } else {
            self.soft_penalty(candidate)
        };
        Evaluation::new(hard, soft)
    }

    /// Counts room and instructor collision pairs.
    pub fn hard_conflicts(&self, candidate: &Candidate) -> usize {
        let mut by_room: HashMap<(usize, usize), usize> = HashMap::new();
        let mut by_instructor: HashMap<(usize, usize), usize> = HashMap::new();
        let mut by_both: HashMap<(usize, usize, usize), usize> = HashMap::new();

        for gene in &candidate.genes {
            *by_room.entry((gene.slot, gene.room)).or_insert(0) += 1;
            *by_instructor.entry((gene.slot, gene.instructor)).or_insert(0) += 1;
            *by_both
                .entry((gene.slot, gene.room, gene.instructor))
                .or_insert(0) += 1;
        }

        let room_pairs: usize = by_room.values().map(|&n| pairs(n)).sum();
        let instructor_pairs: usize = by_instructor.values().map(|&n| pairs(n)).sum();
        let shared_pairs: usize = by_both.values().map(|&n| pairs(n)).sum();

        room_pairs + instructor_pairs - shared_pairs
    }

    /// Weighted soft-constraint penalty.
    pub fn soft_penalty(&self, candidate: &Candidate) -> usize {
        let mut penalty = 0usize;

        if self.soft.unit_overlap_weight > 0 {
            let mut by_unit: HashMap<(usize, usize), usize> = HashMap::new();
            for (gene, offering) in candidate.genes.iter().zip(&self.problem.offerings) {
                *by_unit.entry((gene.slot, offering.unit_index)).or_insert(0) += 1;
            }
            let overlaps: usize = by_unit.values().map(|&n| pairs(n)).sum();
            penalty += overlaps * self.soft.unit_overlap_weight;
        }

        if let Some(cap) = self.soft.max_sessions_per_instructor {
            let mut load: HashMap<usize, usize> = HashMap::new();
            for gene in &candidate.genes {
                *load.entry(gene.instructor).or_insert(0) += 1;
            }
            let overload: usize = load.values().map(|&n| n.saturating_sub(cap)).sum();
            penalty += overload * self.soft.overload_weight;
        }

        if self.soft.preference_weight > 0 {
            let misses = candidate
                .genes
                .iter()
                .zip(&self.preferred)
                .filter(|&(gene, allowed)| match allowed {
                    Some(slots) => !slots.contains(&gene.slot),
                    None => false,
                })
                .count();
            penalty += misses * self.soft.preference_weight;
        }

        penalty
    }
}

#[inline]
fn pairs(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::chromosome::Gene;
    use crate::models::{EligibilityMap, TimetableInput, Unit};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn problem(input: TimetableInput) -> TimetableProblem {
        TimetableProblem::compile(&input).unwrap()
    }

    fn gene(instructor: usize, room: usize, slot: usize) -> Gene {
        Gene {
            instructor,
            room,
            slot,
        }
    }

    fn two_course_input(rooms: &[&str], slots: &[&str], same_teacher: bool) -> TimetableInput {
        let (a, b) = if same_teacher {
            ("Alice", "Alice")
        } else {
            ("Alice", "Bob")
        };
        TimetableInput::new()
            .with_unit(Unit::new("U", 30).with_courses(["Math", "Art"]))
            .with_eligibility(EligibilityMap::new().with("Math", [a]).with("Art", [b]))
            .with_rooms(rooms.iter().copied())
            .with_time_slots(slots.iter().copied())
    }

    #[test]
    fn test_fitness_formula() {
        for c in [0usize, 1, 2, 5, 100] {
            assert_eq!(fitness_from_conflicts(c), 1.0 / (1.0 + c as f64));
            assert_eq!(Evaluation::new(c, 0).fitness, 1.0 / (1.0 + c as f64));
        }
        assert_eq!(fitness_from_conflicts(0), 1.0);
        assert!(Evaluation::worst().fitness > 0.0);
    }

    #[test]
    fn test_room_collision_with_distinct_instructors() {
        let p = problem(two_course_input(&["R1"], &["T1"], false));
        let e = Evaluator::new(&p);
        let c = Candidate::new(vec![gene(0, 0, 0), gene(1, 0, 0)]);
        let result = e.evaluate(&c);
        assert!(result.conflicts >= 1);
        assert_eq!(result.hard_conflicts, 1);
        assert_eq!(result.fitness, 0.5);
    }

    #[test]
    fn test_instructor_collision_across_rooms() {
        let p = problem(two_course_input(&["R1", "R2"], &["T1"], true));
        let e = Evaluator::new(&p);
        let c = Candidate::new(vec![gene(0, 0, 0), gene(0, 1, 0)]);
        assert!(e.evaluate(&c).conflicts >= 1);
    }

    #[test]
    fn test_pair_sharing_room_and_instructor_counts_once() {
        let p = problem(two_course_input(&["R1"], &["T1"], true));
        let e = Evaluator::new(&p);
        let c = Candidate::new(vec![gene(0, 0, 0), gene(0, 0, 0)]);
        assert_eq!(e.evaluate(&c).conflicts, 1);
    }

    #[test]
    fn test_conflict_free() {
        let p = problem(two_course_input(&["R1", "R2"], &["T1", "T2"], true));
        let e = Evaluator::new(&p);
        let c = Candidate::new(vec![gene(0, 0, 0), gene(0, 0, 1)]);
        let result = e.evaluate(&c);
        assert!(result.is_perfect());
        assert_eq!(result.fitness, 1.0);
    }

    #[test]
    fn test_additive_penalty() {
        // Three sessions in one room and slot: 3 pairs
        let input = TimetableInput::new()
            .with_unit(Unit::new("U", 10).with_courses(["X", "Y", "Z"]))
            .with_eligibility(
                EligibilityMap::new()
                    .with("X", ["P1"])
                    .with("Y", ["P2"])
                    .with("Z", ["P3"]),
            )
            .with_rooms(["R1"])
            .with_time_slots(["T1"]);
        let p = problem(input);
        let e = Evaluator::new(&p);
        let c = Candidate::new(vec![gene(0, 0, 0), gene(1, 0, 0), gene(2, 0, 0)]);
        assert_eq!(e.evaluate(&c).conflicts, 3);
    }

    #[test]
    fn test_malformed_candidate_is_worst() {
        let p = problem(two_course_input(&["R1"], &["T1"], false));
        let e = Evaluator::new(&p);
        let short = Candidate::new(vec![gene(0, 0, 0)]);
        assert_eq!(e.evaluate(&short), Evaluation::worst());
        let out_of_range = Candidate::new(vec![gene(0, 0, 0), gene(1, 0, 7)]);
        assert_eq!(e.evaluate(&out_of_range), Evaluation::worst());
    }

    #[test]
    fn test_deterministic() {
        let p = problem(two_course_input(&["R1", "R2"], &["T1", "T2"], false));
        let e = Evaluator::new(&p);
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..10 {
            let c = Candidate::random(&p, &mut rng);
            assert_eq!(e.evaluate(&c), e.evaluate(&c));
        }
    }

    #[test]
    fn test_unit_overlap_penalty() {
        let p = problem(two_course_input(&["R1", "R2"], &["T1", "T2"], false));
        let soft = SoftConstraints::default().with_unit_overlap(2);
        let e = Evaluator::with_soft_constraints(&p, soft);

        let same_slot = Candidate::new(vec![gene(0, 0, 0), gene(1, 1, 0)]);
        let result = e.evaluate(&same_slot);
        assert_eq!(result.hard_conflicts, 0);
        assert_eq!(result.soft_penalty, 2);
        assert_eq!(result.fitness, 1.0 / 3.0);

        let split = Candidate::new(vec![gene(0, 0, 0), gene(1, 1, 1)]);
        assert!(e.evaluate(&split).is_perfect());
    }

    #[test]
    fn test_instructor_cap_penalty() {
        let p = problem(two_course_input(&["R1", "R2"], &["T1", "T2"], true));
        let soft = SoftConstraints::default().with_instructor_cap(1, 3);
        let e = Evaluator::with_soft_constraints(&p, soft);
        let c = Candidate::new(vec![gene(0, 0, 0), gene(0, 0, 1)]);
        assert_eq!(e.evaluate(&c).soft_penalty, 3);
    }

    #[test]
    fn test_soft_constraints_validate_labels() {
        let p = problem(two_course_input(&["R1", "R2"], &["T1", "T2"], false));
        let ok = SoftConstraints::default()
            .with_preferred_slots("Math", ["T1"])
            .with_preference_weight(1);
        assert!(ok.validate(&p).is_ok());
        assert!(SoftConstraints::default().validate(&p).is_ok());

        let unknown_slot = SoftConstraints::default()
            .with_preferred_slots("Math", ["Monday"])
            .with_preference_weight(1);
        assert!(matches!(
            unknown_slot.validate(&p),
            Err(TimetableError::DegenerateConfiguration(msg)) if msg.contains("Monday")
        ));

        let unknown_course = SoftConstraints::default().with_preferred_slots("History", ["T1"]);
        assert!(matches!(
            unknown_course.validate(&p),
            Err(TimetableError::DegenerateConfiguration(msg)) if msg.contains("History")
        ));
    }

    #[test]
    fn test_preferred_slots_penalty() {
        let p = problem(two_course_input(&["R1", "R2"], &["T1", "T2"], false));
        let soft = SoftConstraints::default()
            .with_preferred_slots("Math", ["T1"])
            .with_preference_weight(1);
        let e = Evaluator::with_soft_constraints(&p, soft);

        let good = Candidate::new(vec![gene(0, 0, 0), gene(1, 0, 1)]);
        assert_eq!(e.evaluate(&good).soft_penalty, 0);
        let bad = Candidate::new(vec![gene(0, 0, 1), gene(1, 0, 0)]);
        assert_eq!(e.evaluate(&bad).soft_penalty, 1);
    }

    #[test]
    fn test_soft_disabled_by_default() {
        assert!(SoftConstraints::default().is_disabled());
        assert!(!SoftConstraints::default().with_unit_overlap(1).is_disabled());
    }
}
