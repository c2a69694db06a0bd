//! GA-driven timetable scheduler.
//!
//! # Pipeline
//!
//! 1. Validate input structure and the GA configuration.
//! 2. Run feasibility checks. Under [`InfeasibilityPolicy::Abort`] any
//!    finding is an error; otherwise findings become diagnostics and
//!    unschedulable offerings are left out of the search.
//! 3. Compile the input, run the GA, and decode the best candidate.

use log::warn;
use rand::Rng;

use crate::error::TimetableError;
use crate::ga::{
    CancellationToken, GaConfig, GaOutcome, GaRunner, InfeasibilityPolicy, TimetableProblem,
};
use crate::models::{Diagnostic, Timetable, TimetableInput};
use crate::validation::{feasibility_report, validate_input};

/// Builds timetables from a [`TimetableInput`].
///
/// # Example
///
/// ```
/// use u_timetable::scheduler::TimetableScheduler;
/// use u_timetable::ga::GaConfig;
/// use u_timetable::models::{EligibilityMap, TimetableInput, Unit};
///
/// let input = TimetableInput::new()
///     .with_unit(Unit::new("CS-A", 40).with_courses(["Algorithms", "Databases"]))
///     .with_eligibility(
///         EligibilityMap::new()
///             .with("Algorithms", ["Dr. Lee"])
///             .with("Databases", ["Dr. Park"]),
///     )
///     .with_rooms(["R101", "R102"])
///     .with_time_slots(["Mon 9:00", "Mon 11:00"]);
///
/// let scheduler = TimetableScheduler::new(GaConfig::default().with_seed(7));
/// let timetable = scheduler.schedule(&input).unwrap();
/// assert_eq!(timetable.assignment_count(), 2);
/// assert!(timetable.is_conflict_free());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimetableScheduler {
    config: GaConfig,
    cancellation: Option<CancellationToken>,
}

impl TimetableScheduler {
    /// Creates a scheduler with the given GA configuration.
    pub fn new(config: GaConfig) -> Self {
        Self {
            config,
            cancellation: None,
        }
    }

    /// Attaches a cancellation token, checked between generations.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// The GA configuration in use.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Schedules with an RNG seeded from `config.seed` (or the OS if unset).
    ///
    /// # Errors
    /// - [`TimetableError::InvalidInput`] for structural input problems
    /// - [`TimetableError::DegenerateConfiguration`] for out-of-range settings
    /// - [`TimetableError::InfeasibleInput`] under [`InfeasibilityPolicy::Abort`]
    pub fn schedule(&self, input: &TimetableInput) -> Result<Timetable, TimetableError> {
        let (problem, report) = self.prepare(input)?;
        let outcome = self.runner(&problem).run()?;
        Ok(finish(&problem, report, outcome))
    }

    /// Schedules with a caller-supplied RNG.
    pub fn schedule_with_rng<R: Rng + ?Sized>(
        &self,
        input: &TimetableInput,
        rng: &mut R,
    ) -> Result<Timetable, TimetableError> {
        let (problem, report) = self.prepare(input)?;
        let outcome = self.runner(&problem).run_with_rng(rng)?;
        Ok(finish(&problem, report, outcome))
    }

    fn prepare(
        &self,
        input: &TimetableInput,
    ) -> Result<(TimetableProblem, Vec<Diagnostic>), TimetableError> {
        validate_input(input).map_err(TimetableError::InvalidInput)?;
        self.config.validate()?;

        let report = feasibility_report(input);
        if !report.is_empty() && self.config.infeasibility == InfeasibilityPolicy::Abort {
            return Err(TimetableError::InfeasibleInput(report));
        }
        for diagnostic in &report {
            warn!("{diagnostic}");
        }

        Ok((TimetableProblem::compile(input)?, report))
    }

    fn runner<'a>(&'a self, problem: &'a TimetableProblem) -> GaRunner<'a> {
        let runner = GaRunner::new(problem, &self.config);
        match &self.cancellation {
            Some(token) => runner.with_cancellation(token.clone()),
            None => runner,
        }
    }
}

fn finish(problem: &TimetableProblem, mut diagnostics: Vec<Diagnostic>, outcome: GaOutcome) -> Timetable {
    diagnostics.extend(outcome.diagnostics);

    Timetable {
        assignments: problem.decode(&outcome.best),
        fitness: outcome.evaluation.fitness,
        conflict_count: outcome.evaluation.conflicts,
        unschedulable: problem.unschedulable.clone(),
        diagnostics,
        generations: outcome.generations,
        history: outcome.history,
        termination: outcome.termination,
    }
}
