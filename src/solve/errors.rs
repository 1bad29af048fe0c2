//! Errors for solving and simulating the model.
//!
//! [`SolveError`] is the top-level error of the crate: configuration problems
//! arrive wrapped from [`ModelError`], worst-case expectation failures from
//! [`AmbiguityError`], and the solver adds its own numerical and
//! lookup failures. [`SolveError::kind`] sorts every variant into one of
//! three [`ErrorKind`]s so callers can react without matching each variant.
//!
//! ## Conventions
//! - Periods and state indices are 0-based.
//! - A solve is all-or-nothing: any error aborts it and no partial
//!   solution is returned.
use crate::{ambiguity::AmbiguityError, model::ModelError};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for `solve`, `simulate`, and solution lookups.
pub type SolveResult<T> = Result<T, SolveError>;

/// Coarse classification of a [`SolveError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid inputs, detected before any work starts.
    Configuration,
    /// A computation produced an unusable number.
    Numerical,
    /// A lookup between components failed (missing state or transition).
    Integration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    // ---- Configuration ----
    /// Invalid model specification, parameters, or options.
    Model(ModelError),

    /// Specification and draw batch disagree on a dimension.
    DimensionMismatch { name: &'static str, expected: usize, actual: usize },

    /// Parameters passed alongside a solution differ from those it was
    /// solved with.
    ParamsMismatch { name: &'static str },

    // ---- Numerical ----
    /// Worst-case expectation failed at a state.
    Ambiguity { period: usize, state: usize, source: AmbiguityError },

    /// Interpolation regression could not be solved.
    SingularRegression { period: usize, reason: String },

    /// EMAX came out NaN/±inf.
    NonFiniteEmax { period: usize, state: usize, value: f64 },

    // ---- Integration ----
    /// Period outside `0..num_periods`.
    PeriodOutOfRange { period: usize, num_periods: usize },

    /// State index outside `0..num_states(period)`.
    StateOutOfRange { period: usize, index: usize, num_states: usize },

    /// A feasible choice has no successor state.
    MissingTransition { period: usize, index: usize, choice: usize },

    /// The dedicated rayon pool could not be created.
    ThreadPool { reason: String },
}

impl SolveError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SolveError::Model(ModelError::NonPositiveDefiniteCovariance) => ErrorKind::Numerical,
            SolveError::Model(_)
            | SolveError::DimensionMismatch { .. }
            | SolveError::ParamsMismatch { .. } => ErrorKind::Configuration,
            SolveError::Ambiguity { source: AmbiguityError::InfeasibleLevel { .. }, .. } => {
                ErrorKind::Configuration
            }
            SolveError::Ambiguity { .. }
            | SolveError::SingularRegression { .. }
            | SolveError::NonFiniteEmax { .. } => ErrorKind::Numerical,
            SolveError::PeriodOutOfRange { .. }
            | SolveError::StateOutOfRange { .. }
            | SolveError::MissingTransition { .. }
            | SolveError::ThreadPool { .. } => ErrorKind::Integration,
        }
    }
}

impl std::error::Error for SolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolveError::Model(err) => Some(err),
            SolveError::Ambiguity { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl std::fmt::Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            SolveError::Model(err) => write!(f, "Invalid configuration: {err}"),
            SolveError::DimensionMismatch { name, expected, actual } => {
                write!(f, "{name} mismatch: expected {expected}, actual {actual}")
            }
            SolveError::ParamsMismatch { name } => {
                write!(f, "Parameters do not match the solution: {name} differs.")
            }

            // ---- Numerical ----
            SolveError::Ambiguity { period, state, source } => {
                write!(f, "Worst-case expectation failed at period {period}, state {state}: {source}")
            }
            SolveError::SingularRegression { period, reason } => {
                write!(f, "Interpolation regression failed in period {period}: {reason}")
            }
            SolveError::NonFiniteEmax { period, state, value } => {
                write!(f, "EMAX at period {period}, state {state} is non-finite: {value}")
            }

            // ---- Integration ----
            SolveError::PeriodOutOfRange { period, num_periods } => {
                write!(f, "Period {period} is out of range for a {num_periods}-period model.")
            }
            SolveError::StateOutOfRange { period, index, num_states } => {
                write!(
                    f,
                    "State index {index} is out of range in period {period} ({num_states} states)."
                )
            }
            SolveError::MissingTransition { period, index, choice } => {
                write!(
                    f,
                    "No successor for choice {choice} from state {index} in period {period}."
                )
            }
            SolveError::ThreadPool { reason } => {
                write!(f, "Could not build the worker pool: {reason}")
            }
        }
    }
}

impl From<ModelError> for SolveError {
    fn from(err: ModelError) -> Self {
        SolveError::Model(err)
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<SolveError> for PyErr {
    fn from(err: SolveError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
