//! Fixed-order assignment chromosome.
//!
//! # Encoding
//!
//! A candidate is a vector of genes, one per schedulable offering, in the
//! problem's unit-then-course order. Each gene holds three indices:
//! instructor, room, and time slot. Because every candidate shares the
//! same gene order, crossover is positional and never breaks the
//! one-gene-per-offering invariant.
//!
//! # Reference
//! Burke & Petrovic (2002), "Recent research directions in automated timetabling"

use rand::Rng;
use rand::prelude::IndexedRandom;

use super::evaluator::Evaluation;
use super::problem::{OfferingInfo, TimetableProblem};

/// One offering's (instructor, room, slot) choice, as indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gene {
    /// Index into `TimetableProblem::instructors`.
    pub instructor: usize,
    /// Index into `TimetableProblem::rooms`.
    pub room: usize,
    /// Index into `TimetableProblem::time_slots`.
    pub slot: usize,
}

/// A complete candidate timetable.
///
/// Higher fitness = better (1.0 = conflict-free). Freshly built candidates
/// are unevaluated; scoring happens in a separate phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// One gene per schedulable offering.
    pub genes: Vec<Gene>,
    evaluation: Option<Evaluation>,
}

impl Candidate {
    /// Wraps genes into an unevaluated candidate.
    pub fn new(genes: Vec<Gene>) -> Self {
        Self {
            genes,
            evaluation: None,
        }
    }

    /// Creates a random candidate.
    ///
    /// Instructors are drawn uniformly from each offering's candidates and
    /// (room, slot) uniformly from the room pool × all slots. Collisions are
    /// left in place; they are what the evaluator measures.
    pub fn random<R: Rng + ?Sized>(problem: &TimetableProblem, rng: &mut R) -> Self {
        let slots = problem.slot_count();
        let genes = problem
            .offerings
            .iter()
            .map(|offering| random_gene(offering, slots, rng))
            .collect();
        Self::new(genes)
    }

    /// Evaluation result, if scored.
    #[inline]
    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }

    /// Records the evaluation result.
    #[inline]
    pub fn set_evaluation(&mut self, evaluation: Evaluation) {
        self.evaluation = Some(evaluation);
    }

    /// Fitness, or 0.0 if unevaluated.
    #[inline]
    pub fn fitness(&self) -> f64 {
        self.evaluation.map_or(0.0, |e| e.fitness)
    }

    /// Conflict count, or `usize::MAX` if unevaluated.
    #[inline]
    pub fn conflicts(&self) -> usize {
        self.evaluation.map_or(usize::MAX, |e| e.conflicts)
    }

    /// Whether the candidate is evaluated and conflict-free.
    #[inline]
    pub fn is_perfect(&self) -> bool {
        self.conflicts() == 0
    }

    /// Number of genes.
    #[inline]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the candidate has no genes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Validates the candidate against the problem.
    ///
    /// Checks completeness (one gene per offering) and that every gene
    /// draws from its offering's domains.
    pub fn is_valid(&self, problem: &TimetableProblem) -> bool {
        if self.genes.len() != problem.offering_count() {
            return false;
        }
        let slots = problem.slot_count();
        self.genes
            .iter()
            .zip(&problem.offerings)
            .all(|(gene, offering)| {
                gene.slot < slots
                    && offering.instructors.contains(&gene.instructor)
                    && offering.rooms.contains(&gene.room)
            })
    }
}

fn random_gene<R: Rng + ?Sized>(offering: &OfferingInfo, slots: usize, rng: &mut R) -> Gene {
    Gene {
        instructor: random_instructor(offering, rng),
        room: random_room(offering, rng),
        slot: rng.random_range(0..slots),
    }
}

// Offering domains are non-empty by construction in `TimetableProblem::compile`.
fn random_instructor<R: Rng + ?Sized>(offering: &OfferingInfo, rng: &mut R) -> usize {
    offering.instructors.choose(rng).copied().unwrap_or_default()
}

fn random_room<R: Rng + ?Sized>(offering: &OfferingInfo, rng: &mut R) -> usize {
    offering.rooms.choose(rng).copied().unwrap_or_default()
}

// ======================== Crossover operators ========================

/// Single-point crossover.
///
/// Takes genes `[0, cut)` from `p1` and `[cut, n)` from `p2`.
pub fn single_point_crossover<R: Rng + ?Sized>(
    p1: &Candidate,
    p2: &Candidate,
    rng: &mut R,
) -> Candidate {
    let len = p1.len().min(p2.len());
    if len < 2 {
        return Candidate::new(p1.genes.clone());
    }
    let cut = rng.random_range(1..len);
    let mut genes = Vec::with_capacity(len);
    genes.extend_from_slice(&p1.genes[..cut]);
    genes.extend_from_slice(&p2.genes[cut..len]);
    Candidate::new(genes)
}

/// Two-point crossover.
///
/// Takes the segment `[i, j)` from `p2` and everything else from `p1`.
pub fn two_point_crossover<R: Rng + ?Sized>(
    p1: &Candidate,
    p2: &Candidate,
    rng: &mut R,
) -> Candidate {
    let len = p1.len().min(p2.len());
    if len < 2 {
        return Candidate::new(p1.genes.clone());
    }
    let mut i = rng.random_range(0..len);
    let mut j = rng.random_range(0..=len);
    if i > j {
        std::mem::swap(&mut i, &mut j);
    }
    let mut genes = p1.genes[..len].to_vec();
    genes[i..j].copy_from_slice(&p2.genes[i..j]);
    Candidate::new(genes)
}

/// Uniform crossover: each gene from either parent with probability 0.5.
pub fn uniform_crossover<R: Rng + ?Sized>(
    p1: &Candidate,
    p2: &Candidate,
    rng: &mut R,
) -> Candidate {
    let genes = p1
        .genes
        .iter()
        .zip(&p2.genes)
        .map(|(a, b)| if rng.random_bool(0.5) { *a } else { *b })
        .collect();
    Candidate::new(genes)
}

/// Unit-block crossover.
///
/// Partitions genes by unit and copies each unit's whole block from one
/// parent or the other. Keeps each unit's internal arrangement intact.
///
/// With fewer than two units there is nothing to exchange at block level,
/// so this falls back to [`two_point_crossover`].
pub fn unit_block_crossover<R: Rng + ?Sized>(
    p1: &Candidate,
    p2: &Candidate,
    problem: &TimetableProblem,
    rng: &mut R,
) -> Candidate {
    if problem.unit_ranges.len() < 2 {
        return two_point_crossover(p1, p2, rng);
    }
    let len = p1.len().min(p2.len());
    let mut genes = p1.genes[..len].to_vec();
    for range in &problem.unit_ranges {
        if range.end > len {
            break;
        }
        if rng.random_bool(0.5) {
            genes[range.clone()].copy_from_slice(&p2.genes[range.clone()]);
        }
    }
    Candidate::new(genes)
}

// ======================== Mutation operators ========================

/// Gene mutation.
///
/// Each gene mutates independently with probability `rate`. A mutating
/// gene redraws either its instructor or its (room, slot) pair, with equal
/// probability, from the same domains used at construction.
///
/// # Returns
/// The number of mutated genes.
pub fn gene_mutation<R: Rng + ?Sized>(
    candidate: &mut Candidate,
    problem: &TimetableProblem,
    rate: f64,
    rng: &mut R,
) -> usize {
    let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
    let slots = problem.slot_count();
    let mut mutated = 0;
    for (gene, offering) in candidate.genes.iter_mut().zip(&problem.offerings) {
        if !rng.random_bool(rate) {
            continue;
        }
        if rng.random_bool(0.5) {
            gene.instructor = random_instructor(offering, rng);
        } else {
            gene.room = random_room(offering, rng);
            gene.slot = rng.random_range(0..slots);
        }
        mutated += 1;
    }
    if mutated > 0 {
        candidate.evaluation = None;
    }
    mutated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EligibilityMap, TimetableInput, Unit};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn sample_problem() -> TimetableProblem {
        let input = TimetableInput::new()
            .with_unit(Unit::new("A", 30).with_courses(["Math", "Art", "Bio"]))
            .with_unit(Unit::new("B", 25).with_courses(["Math", "Art"]))
            .with_eligibility(
                EligibilityMap::new()
                    .with("Math", ["Alice", "Bob"])
                    .with("Art", ["Carol"])
                    .with("Bio", ["Dan", "Alice"]),
            )
            .with_rooms(["R1", "R2", "R3"])
            .with_time_slots(["T1", "T2", "T3", "T4"]);
        TimetableProblem::compile(&input).unwrap()
    }

    fn constant(problem: &TimetableProblem, room: usize, slot: usize) -> Candidate {
        Candidate::new(
            problem
                .offerings
                .iter()
                .map(|o| Gene {
                    instructor: o.instructors[0],
                    room,
                    slot,
                })
                .collect(),
        )
    }

    #[test]
    fn test_random_candidate() {
        let problem = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let c = Candidate::random(&problem, &mut rng);

        assert_eq!(c.len(), problem.offering_count());
        assert!(c.is_valid(&problem));
        assert!(c.evaluation().is_none());
        assert_eq!(c.fitness(), 0.0);
        assert!(!c.is_perfect());
    }

    #[test]
    fn test_random_is_seed_deterministic() {
        let problem = sample_problem();
        let a = Candidate::random(&problem, &mut SmallRng::seed_from_u64(7));
        let b = Candidate::random(&problem, &mut SmallRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_candidate() {
        let problem = sample_problem();
        let mut c = constant(&problem, 0, 0);
        assert!(c.is_valid(&problem));

        c.genes.pop();
        assert!(!c.is_valid(&problem));

        let mut c = constant(&problem, 0, 0);
        c.genes[1].instructor = 0; // Alice cannot teach Art
        assert!(!c.is_valid(&problem));

        let mut c = constant(&problem, 0, 0);
        c.genes[0].slot = 99;
        assert!(!c.is_valid(&problem));
    }

    #[test]
    fn test_single_point_crossover() {
        let problem = sample_problem();
        let p1 = constant(&problem, 0, 0);
        let p2 = constant(&problem, 1, 1);
        let mut rng = SmallRng::seed_from_u64(42);

        let child = single_point_crossover(&p1, &p2, &mut rng);
        assert_eq!(child.len(), 5);
        assert!(child.is_valid(&problem));
        // Prefix from p1, suffix from p2, at least one gene from each
        assert_eq!(child.genes[0].room, 0);
        assert_eq!(child.genes[4].room, 1);
        let cut = child.genes.iter().position(|g| g.room == 1).unwrap();
        assert!(child.genes[cut..].iter().all(|g| g.room == 1));
    }

    #[test]
    fn test_two_point_crossover() {
        let problem = sample_problem();
        let p1 = constant(&problem, 0, 0);
        let p2 = constant(&problem, 1, 1);
        let mut rng = SmallRng::seed_from_u64(3);

        for _ in 0..20 {
            let child = two_point_crossover(&p1, &p2, &mut rng);
            assert_eq!(child.len(), 5);
            assert!(child.is_valid(&problem));
            // Genes from p2 form one contiguous run
            let from_p2: Vec<usize> = (0..5).filter(|&i| child.genes[i].room == 1).collect();
            if let (Some(first), Some(last)) = (from_p2.first(), from_p2.last()) {
                assert_eq!(last - first + 1, from_p2.len());
            }
        }
    }

    #[test]
    fn test_uniform_crossover() {
        let problem = sample_problem();
        let p1 = constant(&problem, 0, 0);
        let p2 = constant(&problem, 1, 1);
        let mut rng = SmallRng::seed_from_u64(42);

        let child = uniform_crossover(&p1, &p2, &mut rng);
        assert_eq!(child.len(), 5);
        assert!(child
            .genes
            .iter()
            .all(|g| (g.room, g.slot) == (0, 0) || (g.room, g.slot) == (1, 1)));
    }

    #[test]
    fn test_unit_block_crossover_keeps_units_whole() {
        let problem = sample_problem();
        let p1 = constant(&problem, 0, 0);
        let p2 = constant(&problem, 1, 1);
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..20 {
            let child = unit_block_crossover(&p1, &p2, &problem, &mut rng);
            assert!(child.is_valid(&problem));
            for range in &problem.unit_ranges {
                let block = &child.genes[range.clone()];
                assert!(block.iter().all(|g| g.room == block[0].room));
            }
        }
    }

    #[test]
    fn test_unit_block_crossover_mixes_single_unit() {
        let courses: Vec<String> = (0..10).map(|i| format!("C{i}")).collect();
        let mut eligibility = EligibilityMap::new();
        for course in &courses {
            eligibility.insert(course.as_str(), "P1");
        }
        let input = TimetableInput::new()
            .with_unit(Unit::new("Only", 20).with_courses(courses.iter().cloned()))
            .with_eligibility(eligibility)
            .with_rooms(["R1", "R2"])
            .with_time_slots(["T1", "T2"]);
        let problem = TimetableProblem::compile(&input).unwrap();
        assert_eq!(problem.unit_ranges.len(), 1);

        let p1 = constant(&problem, 0, 0);
        let p2 = constant(&problem, 1, 1);
        let mut rng = SmallRng::seed_from_u64(42);
        let mixed = (0..200)
            .filter(|_| {
                let child = unit_block_crossover(&p1, &p2, &problem, &mut rng);
                assert!(child.is_valid(&problem));
                child.genes.iter().any(|g| g.room == 0) && child.genes.iter().any(|g| g.room == 1)
            })
            .count();
        assert!(mixed > 100, "mixed = {mixed}");
    }

    #[test]
    fn test_crossover_short_parents() {
        let one = Candidate::new(vec![Gene {
            instructor: 0,
            room: 0,
            slot: 0,
        }]);
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(single_point_crossover(&one, &one, &mut rng).len(), 1);
        assert_eq!(two_point_crossover(&one, &one, &mut rng).len(), 1);
    }

    #[test]
    fn test_gene_mutation_rate_bounds() {
        let problem = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut c = constant(&problem, 0, 0);
        let original = c.clone();

        assert_eq!(gene_mutation(&mut c, &problem, 0.0, &mut rng), 0);
        assert_eq!(c, original);

        assert_eq!(gene_mutation(&mut c, &problem, 1.0, &mut rng), 5);
        assert!(c.is_valid(&problem));
    }

    #[test]
    fn test_gene_mutation_non_finite_rate() {
        let problem = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut c = constant(&problem, 0, 0);
        let original = c.clone();

        assert_eq!(gene_mutation(&mut c, &problem, f64::NAN, &mut rng), 0);
        assert_eq!(c, original);
        assert_eq!(gene_mutation(&mut c, &problem, f64::NEG_INFINITY, &mut rng), 0);
        assert_eq!(gene_mutation(&mut c, &problem, f64::INFINITY, &mut rng), 5);
    }

    #[test]
    fn test_gene_mutation_changes_genes() {
        let problem = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let original = constant(&problem, 0, 0);

        let mut changed = false;
        for _ in 0..20 {
            let mut c = original.clone();
            gene_mutation(&mut c, &problem, 1.0, &mut rng);
            assert!(c.is_valid(&problem));
            if c.genes != original.genes {
                changed = true;
                break;
            }
        }
        assert!(changed, "full-rate mutation should redraw some gene");
    }
}
