//! model::options — validated configuration for solving and simulating.
//!
//! Purpose
//! -------
//! Collect every knob of a solve or a simulation in explicit, validated
//! structs so that no toggle lives in global state and every configuration
//! problem is reported before any enumeration or recursion begins.
//!
//! Key behaviors
//! -------------
//! - [`ModelSpec`]: horizon, schooling range, and discount factor.
//! - [`Interpolation`]: whether EMAX is approximated by regression and how
//!   many states are solved exactly.
//! - [`Ambiguity`] / [`Measure`]: worst-case expectation settings; `Measure`
//!   parses case-insensitively from `"abs"` / `"kl"`.
//! - [`Backend`]: serial or rayon-parallel state loop.
//! - [`SolveOptions`] and [`SimOptions`]: the bundles consumed by
//!   `solve` and `simulate`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Constructors (`new`) validate their own fields; struct literals bypass
//!   validation, so the solver re-validates through [`SolveOptions::validate`].
//! - `Interpolation::num_points` is only checked when interpolation is
//!   enabled.
//!
//! Conventions
//! -----------
//! - Seeds are `u64` and feed `rand::rngs::StdRng::seed_from_u64`.
//! - Defaults mirror the reference configuration: 500 draws, seed 456, no
//!   interpolation, no ambiguity, serial backend.
//!
//! Testing notes
//! -------------
//! - Unit tests cover defaults, `FromStr` parsing, and the rejection paths of
//!   each constructor.
use crate::model::{
    errors::{ModelError, ModelResult},
    validation::{
        validate_ambiguity_level, validate_delta, validate_education_bounds,
        validate_interp_points, validate_num_agents, validate_num_draws, validate_num_periods,
        validate_num_threads,
    },
};
use std::str::FromStr;

/// Number of regressors in the EMAX interpolation equation.
pub const NUM_INTERP_REGRESSORS: usize = 8;

/// ModelSpec — horizon and schooling bounds of the model.
///
/// Fields
/// ------
/// - `num_periods`: number of decision periods `T ≥ 1`.
/// - `edu_start`: schooling (years) at period 0.
/// - `edu_max`: maximum attainable schooling, `≥ edu_start`.
/// - `delta`: discount factor, finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelSpec {
    pub num_periods: usize,
    pub edu_start: usize,
    pub edu_max: usize,
    pub delta: f64,
}

impl ModelSpec {
    /// Construct and validate a model specification.
    ///
    /// # Errors
    /// - [`ModelError::InvalidNumPeriods`] when `num_periods == 0`.
    /// - [`ModelError::InvalidEducationBounds`] when `edu_max < edu_start`.
    /// - [`ModelError::InvalidDelta`] for a negative or non-finite `delta`.
    pub fn new(num_periods: usize, edu_start: usize, edu_max: usize, delta: f64) -> ModelResult<Self> {
        let spec = Self { num_periods, edu_start, edu_max, delta };
        spec.validate()?;
        Ok(spec)
    }

    /// Re-run the constructor checks.
    pub fn validate(&self) -> ModelResult<()> {
        validate_num_periods(self.num_periods)?;
        validate_education_bounds(self.edu_start, self.edu_max)?;
        validate_delta(self.delta)
    }
}

/// Interpolation — regression approximation of EMAX.
///
/// When `enabled` and a period holds more than `num_points` states, only
/// `num_points` randomly chosen states are solved exactly and the rest are
/// predicted by OLS. Otherwise every state is solved exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interpolation {
    pub enabled: bool,
    pub num_points: usize,
}

impl Interpolation {
    /// Construct an interpolation setting.
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidInterpPoints`] when enabled with fewer
    /// points than [`NUM_INTERP_REGRESSORS`].
    pub fn new(enabled: bool, num_points: usize) -> ModelResult<Self> {
        let interp = Self { enabled, num_points };
        interp.validate()?;
        Ok(interp)
    }

    /// Exact solution at every state.
    pub fn disabled() -> Self {
        Self { enabled: false, num_points: 0 }
    }

    /// Re-run the constructor checks.
    pub fn validate(&self) -> ModelResult<()> {
        if self.enabled {
            validate_interp_points(self.num_points, NUM_INTERP_REGRESSORS)?;
        }
        Ok(())
    }

    /// `true` when a period with `num_states` states should be interpolated.
    pub fn applies_to(&self, num_states: usize) -> bool {
        self.enabled && num_states > self.num_points
    }
}

impl Default for Interpolation {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Divergence used to bound the set of admissible shock distributions.
///
/// Parsing
/// -------
/// Implements `FromStr` accepting `"abs"` and `"kl"` in any case. Unknown
/// names return [`ModelError::InvalidMeasure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// Total absolute deviation from the empirical weights.
    Abs,
    /// Kullback–Leibler divergence from the empirical weights.
    Kl,
}

impl FromStr for Measure {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abs" => Ok(Measure::Abs),
            "kl" => Ok(Measure::Kl),
            _ => Err(ModelError::InvalidMeasure {
                name: s.to_string(),
                reason: "Expected one of: 'abs', 'kl'.",
            }),
        }
    }
}

/// Ambiguity — worst-case expectation settings.
///
/// `level == 0` is equivalent to no ambiguity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ambiguity {
    pub measure: Measure,
    pub level: f64,
}

impl Ambiguity {
    /// Construct and validate an ambiguity setting.
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidAmbiguityLevel`] for negative or
    /// non-finite levels.
    pub fn new(measure: Measure, level: f64) -> ModelResult<Self> {
        validate_ambiguity_level(level)?;
        Ok(Self { measure, level })
    }

    /// Ambiguity switched off (level zero).
    pub fn none() -> Self {
        Self { measure: Measure::Abs, level: 0.0 }
    }

    /// `true` when the worst-case expectation differs from the plain mean.
    pub fn is_active(&self) -> bool {
        self.level > 0.0
    }
}

impl Default for Ambiguity {
    fn default() -> Self {
        Self::none()
    }
}

/// Execution backend for the per-period state loop.
///
/// - `Serial`: a plain iterator on the calling thread.
/// - `Parallel { num_threads }`: rayon; `None` uses the global pool,
///   `Some(n)` builds a dedicated pool with `n` workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Serial,
    Parallel { num_threads: Option<usize> },
}

impl Backend {
    /// Validate an explicit thread count if one is given.
    pub fn validate(&self) -> ModelResult<()> {
        match self {
            Backend::Parallel { num_threads: Some(n) } => validate_num_threads(*n),
            _ => Ok(()),
        }
    }
}

/// SolveOptions — everything `solve` needs beyond the model itself.
///
/// Fields
/// ------
/// - `num_draws`: Monte-Carlo draws per period.
/// - `seed`: seed of the solution draws and interpolation point selection.
/// - `debug`: skip the Cholesky scaling of the draws.
/// - `interpolation`, `ambiguity`, `backend`: see their types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOptions {
    pub num_draws: usize,
    pub seed: u64,
    pub debug: bool,
    pub interpolation: Interpolation,
    pub ambiguity: Ambiguity,
    pub backend: Backend,
}

impl SolveOptions {
    /// Construct and validate solver options.
    ///
    /// # Errors
    /// Propagates the first violation among the draw count, the
    /// interpolation quota, the ambiguity level, and the thread count.
    pub fn new(
        num_draws: usize, seed: u64, debug: bool, interpolation: Interpolation,
        ambiguity: Ambiguity, backend: Backend,
    ) -> ModelResult<Self> {
        let opts = Self { num_draws, seed, debug, interpolation, ambiguity, backend };
        opts.validate()?;
        Ok(opts)
    }

    /// Re-run the constructor checks.
    pub fn validate(&self) -> ModelResult<()> {
        validate_num_draws(self.num_draws)?;
        self.interpolation.validate()?;
        validate_ambiguity_level(self.ambiguity.level)?;
        self.backend.validate()
    }
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            num_draws: 500,
            seed: 456,
            debug: false,
            interpolation: Interpolation::disabled(),
            ambiguity: Ambiguity::none(),
            backend: Backend::Serial,
        }
    }
}

/// SimOptions — forward simulation settings.
///
/// The simulation seed is independent of the solve seed, so agents face
/// draws that the solver never saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimOptions {
    pub num_agents: usize,
    pub seed: u64,
    pub debug: bool,
}

impl SimOptions {
    /// Construct simulation options.
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidNumAgents`] when `num_agents == 0`.
    pub fn new(num_agents: usize, seed: u64, debug: bool) -> ModelResult<Self> {
        validate_num_agents(num_agents)?;
        Ok(Self { num_agents, seed, debug })
    }

    pub fn validate(&self) -> ModelResult<()> {
        validate_num_agents(self.num_agents)
    }
}

impl Default for SimOptions {
    fn default() -> Self {
        Self { num_agents: 1000, seed: 132, debug: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Defaults describe an exact, unambiguous, serial solve.
    fn solve_options_default_is_exact_and_serial() {
        let opts = SolveOptions::default();

        assert_eq!(opts.num_draws, 500);
        assert_eq!(opts.seed, 456);
        assert!(!opts.interpolation.enabled);
        assert!(!opts.ambiguity.is_active());
        assert_eq!(opts.backend, Backend::Serial);
        assert!(opts.validate().is_ok());
    }

    #[test]
    // Purpose
    // -------
    // `Measure::from_str` is case-insensitive and rejects unknown names.
    //
    // Given
    // -----
    // - "ABS", "Kl" and "entropy".
    //
    // Expect
    // ------
    // - `Abs`, `Kl`, and `InvalidMeasure` carrying the original name.
    fn measure_parses_case_insensitively() {
        assert_eq!("ABS".parse::<Measure>(), Ok(Measure::Abs));
        assert_eq!("Kl".parse::<Measure>(), Ok(Measure::Kl));
        match "entropy".parse::<Measure>() {
            Err(ModelError::InvalidMeasure { name, .. }) => assert_eq!(name, "entropy"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // The interpolation quota is checked only when interpolation is enabled.
    fn interpolation_quota_checked_only_when_enabled() {
        assert!(Interpolation::new(false, 0).is_ok());
        assert_eq!(
            Interpolation::new(true, 5),
            Err(ModelError::InvalidInterpPoints { num_points: 5, minimum: NUM_INTERP_REGRESSORS })
        );
        let interp = Interpolation::new(true, 10).unwrap();
        assert!(!interp.applies_to(10));
        assert!(interp.applies_to(11));
    }

    #[test]
    // Purpose
    // -------
    // Struct literals that bypass `new` are still caught by `validate`.
    fn solve_options_validate_catches_literal_misconfiguration() {
        let opts = SolveOptions {
            ambiguity: Ambiguity { measure: Measure::Kl, level: -0.5 },
            ..SolveOptions::default()
        };
        assert!(matches!(opts.validate(), Err(ModelError::InvalidAmbiguityLevel { .. })));

        let opts = SolveOptions {
            backend: Backend::Parallel { num_threads: Some(0) },
            ..SolveOptions::default()
        };
        assert_eq!(opts.validate(), Err(ModelError::InvalidNumThreads { num_threads: 0 }));
    }

    #[test]
    fn model_spec_rejects_inverted_education_range() {
        assert!(matches!(
            ModelSpec::new(3, 12, 10, 0.95),
            Err(ModelError::InvalidEducationBounds { .. })
        ));
        assert!(SimOptions::new(0, 1, false).is_err());
    }
}
