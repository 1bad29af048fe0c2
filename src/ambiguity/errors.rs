//! Errors for worst-case expectations (input checks, infeasible radii, and
//! root-finding failures of the KL dual).
//!
//! ## Conventions
//! - Indices are 0-based positions in the value slice.
//! - `argmin` failures are normalized into the matching [`AmbiguityError`]
//!   variant, the same way the optimizer layer wraps backend errors.
use argmin::core::{ArgminError, Error};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for ambiguity computations.
pub type AmbiguityResult<T> = Result<T, AmbiguityError>;

#[derive(Debug, Clone, PartialEq)]
pub enum AmbiguityError {
    // ---- Input validation ----
    /// No values to take an expectation over.
    EmptyValues,

    /// A value is NaN/±inf.
    NonFiniteValue { index: usize, value: f64 },

    /// The divergence ball is empty (negative or non-finite radius).
    InfeasibleLevel { level: f64 },

    // ---- KL dual root-find ----
    /// Doubling the tilt never pushed the divergence above the level.
    BracketNotFound { level: f64, last_theta: f64 },

    /// The root-finder terminated without a usable tilt.
    RootFindFailed { level: f64, reason: String },

    // ---- argmin backend ----
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter { text: String },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated { text: String },
    /// Wrapper for argmin::PotentialBug
    PotentialBug { text: String },
    /// Wrapper for other argmin::Error types
    BackendError { text: String },
}

impl std::error::Error for AmbiguityError {}

impl std::fmt::Display for AmbiguityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input validation ----
            AmbiguityError::EmptyValues => {
                write!(f, "Cannot take an expectation over an empty set of values.")
            }
            AmbiguityError::NonFiniteValue { index, value } => {
                write!(f, "Value at index {index} is non-finite: {value}")
            }
            AmbiguityError::InfeasibleLevel { level } => {
                write!(f, "Ambiguity level {level} is infeasible; it must be finite and non-negative.")
            }

            // ---- KL dual root-find ----
            AmbiguityError::BracketNotFound { level, last_theta } => {
                write!(
                    f,
                    "Could not bracket the KL tilt for level {level}; last tilt tried: {last_theta}."
                )
            }
            AmbiguityError::RootFindFailed { level, reason } => {
                write!(f, "KL root-find failed for level {level}: {reason}")
            }

            // ---- argmin backend ----
            AmbiguityError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            AmbiguityError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            AmbiguityError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            AmbiguityError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }
        }
    }
}

impl From<Error> for AmbiguityError {
    fn from(original_err: Error) -> Self {
        match original_err.downcast::<AmbiguityError>() {
            Ok(amb_err) => amb_err,
            Err(err) => match err.downcast::<ArgminError>() {
                Ok(ArgminError::InvalidParameter { text }) => {
                    AmbiguityError::InvalidParameter { text }
                }
                Ok(ArgminError::ConditionViolated { text }) => {
                    AmbiguityError::ConditionViolated { text }
                }
                Ok(ArgminError::PotentialBug { text }) => AmbiguityError::PotentialBug { text },
                Ok(other) => AmbiguityError::BackendError { text: other.to_string() },
                Err(err) => AmbiguityError::BackendError { text: err.to_string() },
            },
        }
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<AmbiguityError> for PyErr {
    fn from(err: AmbiguityError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Errors raised inside a cost function survive the trip through argmin.
    //
    // Given
    // -----
    // - An `AmbiguityError` boxed into `argmin::core::Error`, and a plain
    //   `ArgminError::InvalidParameter`.
    //
    // Expect
    // ------
    // - The first is recovered unchanged, the second maps to
    //   `InvalidParameter`.
    fn argmin_errors_round_trip_into_ambiguity_errors() {
        // Arrange
        let inner = AmbiguityError::NonFiniteValue { index: 3, value: f64::INFINITY };
        let boxed: Error = inner.clone().into();
        let backend: Error = ArgminError::InvalidParameter { text: "bad sign".to_string() }.into();

        // Act
        let recovered = AmbiguityError::from(boxed);
        let mapped = AmbiguityError::from(backend);

        // Assert
        assert_eq!(recovered, inner);
        assert_eq!(mapped, AmbiguityError::InvalidParameter { text: "bad sign".to_string() });
    }
}
