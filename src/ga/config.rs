//! GA configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::evaluator::SoftConstraints;
use super::operators::{CrossoverType, GeneticOperators, SelectionType};
use crate::error::TimetableError;

/// What to do when the input is infeasible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfeasibilityPolicy {
    /// Refuse to run; return [`TimetableError::InfeasibleInput`].
    Abort,
    /// Run anyway, excluding unschedulable offerings and flagging every
    /// infeasibility as a diagnostic on the result.
    #[default]
    FlagAndContinue,
}

/// Configuration for the timetabling GA.
///
/// # Parameters
///
/// | Parameter | Default | Valid range |
/// |-----------|---------|-------------|
/// | `population_size` | 50 | ≥ 2 |
/// | `max_generations` | 500 | ≥ 1 |
/// | `elite_count` | 2 | < `population_size` |
/// | `mutation_rate` | 0.05 | [0, 1] |
/// | `selection` | Tournament(3) | tournament size ≥ 1 |
/// | `crossover` | UnitBlock | any |
/// | `stagnation_window` | 100 | any (0 disables) |
///
/// `elite_count ≥ 1` makes the best fitness per generation non-decreasing.
///
/// # Examples
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_max_generations(50)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Candidates per generation.
    pub population_size: usize,

    /// Maximum number of generations after the initial population.
    pub max_generations: usize,

    /// Top candidates carried unchanged into the next generation.
    pub elite_count: usize,

    /// Per-gene mutation probability.
    pub mutation_rate: f64,

    /// Parent selection strategy.
    pub selection: SelectionType,

    /// Crossover strategy.
    pub crossover: CrossoverType,

    /// Generations without improvement before a warning (0 to disable).
    pub stagnation_window: usize,

    /// Wall-clock budget, checked between generations.
    pub time_limit: Option<Duration>,

    /// Whether to evaluate and breed in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,

    /// Handling of infeasible input.
    pub infeasibility: InfeasibilityPolicy,

    /// Soft-constraint terms folded into the conflict count.
    pub soft_constraints: SoftConstraints,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 500,
            elite_count: 2,
            mutation_rate: 0.05,
            selection: SelectionType::Tournament { size: 3 },
            crossover: CrossoverType::UnitBlock,
            stagnation_window: 100,
            time_limit: None,
            parallel: true,
            seed: None,
            infeasibility: InfeasibilityPolicy::FlagAndContinue,
            soft_constraints: SoftConstraints::default(),
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_elite_count(mut self, k: usize) -> Self {
        self.elite_count = k;
        self
    }

    /// Sets the mutation rate. Not clamped: out-of-range values are
    /// rejected by [`validate`](Self::validate).
    pub fn with_mutation_rate(mut self, p: f64) -> Self {
        self.mutation_rate = p;
        self
    }

    pub fn with_selection(mut self, selection: SelectionType) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_crossover(mut self, crossover: CrossoverType) -> Self {
        self.crossover = crossover;
        self
    }

    pub fn with_stagnation_window(mut self, n: usize) -> Self {
        self.stagnation_window = n;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_infeasibility(mut self, policy: InfeasibilityPolicy) -> Self {
        self.infeasibility = policy;
        self
    }

    pub fn with_soft_constraints(mut self, soft: SoftConstraints) -> Self {
        self.soft_constraints = soft;
        self
    }

    /// Operators described by this configuration.
    pub fn operators(&self) -> GeneticOperators {
        GeneticOperators {
            selection_type: self.selection,
            crossover_type: self.crossover,
            mutation_rate: self.mutation_rate,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// [`TimetableError::DegenerateConfiguration`] naming the first
    /// out-of-range parameter.
    pub fn validate(&self) -> Result<(), TimetableError> {
        let degenerate =
            |msg: String| -> Result<(), TimetableError> { Err(TimetableError::DegenerateConfiguration(msg)) };

        if self.population_size < 2 {
            return degenerate(format!(
                "population_size must be at least 2 (got {})",
                self.population_size
            ));
        }
        if self.elite_count >= self.population_size {
            return degenerate(format!(
                "elite_count ({}) must be < population_size ({})",
                self.elite_count, self.population_size
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return degenerate(format!(
                "mutation_rate must be within [0, 1] (got {})",
                self.mutation_rate
            ));
        }
        if self.max_generations == 0 {
            return degenerate("max_generations must be at least 1".into());
        }
        if let SelectionType::Tournament { size: 0 } = self.selection {
            return degenerate("tournament size must be at least 1".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_degenerate(config: GaConfig) {
        assert!(matches!(
            config.validate(),
            Err(TimetableError::DegenerateConfiguration(_))
        ));
    }

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 50);
        assert_eq!(config.max_generations, 500);
        assert_eq!(config.elite_count, 2);
        assert!((config.mutation_rate - 0.05).abs() < 1e-10);
        assert_eq!(config.infeasibility, InfeasibilityPolicy::FlagAndContinue);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_population() {
        assert_degenerate(GaConfig::default().with_population_size(1).with_elite_count(0));
    }

    #[test]
    fn test_validate_elites() {
        assert_degenerate(GaConfig::default().with_population_size(4).with_elite_count(4));
        assert!(GaConfig::default()
            .with_population_size(4)
            .with_elite_count(3)
            .validate()
            .is_ok());
        assert!(GaConfig::default().with_elite_count(0).validate().is_ok());
    }

    #[test]
    fn test_validate_mutation_rate() {
        assert_degenerate(GaConfig::default().with_mutation_rate(-0.1));
        assert_degenerate(GaConfig::default().with_mutation_rate(1.5));
        assert_degenerate(GaConfig::default().with_mutation_rate(f64::NAN));
        assert!(GaConfig::default().with_mutation_rate(1.0).validate().is_ok());
    }

    #[test]
    fn test_validate_generations_and_tournament() {
        assert_degenerate(GaConfig::default().with_max_generations(0));
        assert_degenerate(GaConfig::default().with_selection(SelectionType::Tournament { size: 0 }));
    }

    #[test]
    fn test_operators_mirror_config() {
        let config = GaConfig::default()
            .with_selection(SelectionType::RouletteWheel)
            .with_crossover(CrossoverType::TwoPoint)
            .with_mutation_rate(0.2);
        let ops = config.operators();
        assert_eq!(ops.selection_type, SelectionType::RouletteWheel);
        assert_eq!(ops.crossover_type, CrossoverType::TwoPoint);
        assert!((ops.mutation_rate - 0.2).abs() < 1e-10);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: GaConfig =
            serde_json::from_str(r#"{"population_size": 20, "selection": "RouletteWheel"}"#)
                .unwrap();
        assert_eq!(config.population_size, 20);
        assert_eq!(config.selection, SelectionType::RouletteWheel);
        assert_eq!(config.max_generations, 500);
    }
}
