//! model — specification, structural parameters, and options.
//!
//! Purpose
//! -------
//! Hold the validated inputs of a solve: the model specification (horizon,
//! schooling range, discount factor), the structural parameters (wage,
//! schooling, and home coefficients plus the shock Cholesky factor), and the
//! solver / simulator options. Everything downstream assumes these inputs
//! passed validation here.
//!
//! Key behaviors
//! -------------
//! - [`errors`]: [`ModelError`] and [`ModelResult`], the configuration error
//!   surface of the crate.
//! - [`params`]: [`ModelParams`] with coefficient layout constants.
//! - [`options`]: [`ModelSpec`], [`SolveOptions`], [`SimOptions`] and their
//!   components.
//! - [`validation`]: the individual eager checks.
//!
//! Downstream usage
//! ----------------
//! - Build a [`ModelSpec`], [`ModelParams`], and [`SolveOptions`], then call
//!   `crate::solve::solve`. Bindings import from [`prelude`].

pub mod errors;
pub mod options;
pub mod params;
pub mod validation;

pub use self::errors::{ModelError, ModelResult};
pub use self::options::{
    Ambiguity, Backend, Interpolation, Measure, ModelSpec, NUM_INTERP_REGRESSORS, SimOptions,
    SolveOptions,
};
pub use self::params::{ModelParams, NUM_COEFFS_EDU, NUM_COEFFS_HOME, NUM_COEFFS_WAGE};
pub use self::validation::NUM_CHOICES;

pub mod prelude {
    pub use super::{
        Ambiguity, Backend, Interpolation, Measure, ModelError, ModelParams, ModelResult,
        ModelSpec, SimOptions, SolveOptions,
    };
}
