//! model::errors — configuration and parameter errors for model setup.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias used while validating the model
//! specification, structural parameters, and solver/simulation options. Every
//! problem detected here is raised *before* any state-space enumeration or
//! backward-induction step runs.
//!
//! Key behaviors
//! -------------
//! - Define [`ModelError`] with one variant per configuration rule, each
//!   carrying the offending value so messages are self-explanatory.
//! - Implement `Display`/`Error` by hand, mirroring the other error modules
//!   in this crate.
//! - Convert into `PyErr` (`ValueError`) when the `python-bindings` feature is
//!   enabled.
//!
//! Conventions
//! -----------
//! - Periods and indices are 0-based.
//! - Education values are absolute years of schooling, not years beyond the
//!   starting level.
//! - `NonPositiveDefiniteCovariance` is the only numerical variant; it is
//!   raised while building
//!   [`ModelParams`](crate::model::params::ModelParams).
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for model construction and validation.
pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Model specification ----
    /// At least one period is required.
    InvalidNumPeriods { num_periods: usize },

    /// Maximum schooling must not be below the starting level.
    InvalidEducationBounds { edu_start: usize, edu_max: usize },

    /// Discount factor must be finite and non-negative.
    InvalidDelta { value: f64, reason: &'static str },

    // ---- Solver options ----
    /// Monte-Carlo integration needs at least one draw.
    InvalidNumDraws { num_draws: usize },

    /// Interpolation quota must leave the regression identified.
    InvalidInterpPoints { num_points: usize, minimum: usize },

    /// Ambiguity level must be finite and non-negative.
    InvalidAmbiguityLevel { level: f64, reason: &'static str },

    /// Unknown divergence measure name.
    InvalidMeasure { name: String, reason: &'static str },

    /// Explicit thread count must be positive.
    InvalidNumThreads { num_threads: usize },

    // ---- Simulation options ----
    /// At least one agent must be simulated.
    InvalidNumAgents { num_agents: usize },

    // ---- Structural parameters ----
    /// Coefficient vector has the wrong length.
    CoeffLengthMismatch { name: &'static str, expected: usize, actual: usize },

    /// Coefficient entry is NaN/±inf.
    NonFiniteCoeff { name: &'static str, index: usize, value: f64 },

    /// Shock matrices must be 4×4.
    InvalidCholeskyShape { rows: usize, cols: usize },

    /// Entries above the diagonal of a Cholesky factor must be zero.
    CholeskyNotLowerTriangular { row: usize, col: usize, value: f64 },

    /// Covariance matrix could not be factorized.
    NonPositiveDefiniteCovariance,
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Model specification ----
            ModelError::InvalidNumPeriods { num_periods } => {
                write!(f, "Number of periods must be at least 1; got {num_periods}.")
            }
            ModelError::InvalidEducationBounds { edu_start, edu_max } => {
                write!(
                    f,
                    "Maximum schooling ({edu_max}) must not be below the starting level ({edu_start})."
                )
            }
            ModelError::InvalidDelta { value, reason } => {
                write!(f, "Invalid discount factor {value}: {reason}")
            }

            // ---- Solver options ----
            ModelError::InvalidNumDraws { num_draws } => {
                write!(f, "Number of draws must be at least 1; got {num_draws}.")
            }
            ModelError::InvalidInterpPoints { num_points, minimum } => {
                write!(
                    f,
                    "Interpolation requires at least {minimum} points; got {num_points}."
                )
            }
            ModelError::InvalidAmbiguityLevel { level, reason } => {
                write!(f, "Invalid ambiguity level {level}: {reason}")
            }
            ModelError::InvalidMeasure { name, reason } => {
                write!(f, "Invalid ambiguity measure '{name}': {reason}")
            }
            ModelError::InvalidNumThreads { num_threads } => {
                write!(f, "Number of threads must be positive; got {num_threads}.")
            }

            // ---- Simulation options ----
            ModelError::InvalidNumAgents { num_agents } => {
                write!(f, "Number of agents must be at least 1; got {num_agents}.")
            }

            // ---- Structural parameters ----
            ModelError::CoeffLengthMismatch { name, expected, actual } => {
                write!(f, "{name} length mismatch: expected {expected}, actual {actual}")
            }
            ModelError::NonFiniteCoeff { name, index, value } => {
                write!(f, "{name} entry at index {index} is non-finite: {value}")
            }
            ModelError::InvalidCholeskyShape { rows, cols } => {
                write!(f, "Shock matrix must be 4x4; got {rows}x{cols}.")
            }
            ModelError::CholeskyNotLowerTriangular { row, col, value } => {
                write!(
                    f,
                    "Cholesky factor must be lower triangular; entry ({row}, {col}) is {value}."
                )
            }
            ModelError::NonPositiveDefiniteCovariance => {
                write!(f, "Shock covariance matrix is not positive definite.")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<ModelError> for PyErr {
    fn from(err: ModelError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Check that messages embed the offending payload.
    //
    // Given
    // -----
    // - An education-bounds error and a coefficient-length error.
    //
    // Expect
    // ------
    // - Both numbers appear verbatim in the rendered message.
    fn display_embeds_payload_values() {
        // Arrange
        let bounds = ModelError::InvalidEducationBounds { edu_start: 12, edu_max: 10 };
        let coeffs = ModelError::CoeffLengthMismatch { name: "coeffs_a", expected: 6, actual: 4 };

        // Act
        let bounds_msg = bounds.to_string();
        let coeffs_msg = coeffs.to_string();

        // Assert
        assert!(bounds_msg.contains("12") && bounds_msg.contains("10"));
        assert!(coeffs_msg.contains("coeffs_a") && coeffs_msg.contains('6'));
    }
}
