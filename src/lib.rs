//! rust_dcm — finite-horizon dynamic discrete-choice models with Python bindings.
//!
//! Purpose
//! -------
//! Solve and simulate a Keane–Wolpin style occupational-choice model: agents
//! choose each period between two occupations, schooling, and staying home,
//! facing random shocks and, optionally, ambiguity about the shock
//! distribution. This file is the crate root for Rust callers and the PyO3
//! bridge behind the `_rust_dcm` extension module.
//!
//! Key behaviors
//! -------------
//! - [`model`]: validated specification, parameters, and options.
//! - [`state_space`]: enumeration, indexing, and transitions of states.
//! - [`payoffs`]: systematic payoffs per state and choice.
//! - [`draws`]: seeded standard-normal draws and their transformation.
//! - [`ambiguity`]: worst-case expectations under `abs` and `kl` measures.
//! - [`solve`]: backward induction producing an immutable [`Solution`].
//! - [`simulate`]: forward simulation of agents through a solution.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work lives in the inner modules; the PyO3 items in
//!   this file perform only argument conversion and error mapping.
//! - Equal inputs and seeds give bit-identical results on every backend.
//!
//! Downstream usage
//! ----------------
//! - Rust callers import [`prelude`] and call [`solve::solve`] followed by
//!   [`simulate::simulate`].
//! - With the `python-bindings` feature, Python code constructs a `Model`
//!   from `_rust_dcm`, calls `solve(...)`, then `simulate(...)`.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; end-to-end properties live in
//!   `tests/integration_solve_pipeline.rs` and `tests/state_space_properties.rs`.

pub mod ambiguity;
pub mod draws;
pub mod model;
pub mod payoffs;
pub mod simulate;
pub mod solve;
pub mod state_space;
#[cfg(feature = "python-bindings")]
pub mod utils;

pub use crate::solve::Solution;

/// Everything needed to configure, solve, and simulate a model.
pub mod prelude {
    pub use crate::{
        ambiguity::{AmbiguityError, AmbiguityResult, worst_case_expectation},
        draws::{DrawBatch, create_draws},
        model::prelude::*,
        simulate::{AgentHistory, AgentRecord, simulate},
        solve::{ErrorKind, Solution, SolveError, SolveResult, solve},
        state_space::{Choice, State, StateSpace},
    };
}

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    model::{
        options::{ModelSpec, SimOptions},
        params::ModelParams,
    },
    utils::{build_params, build_solve_options},
};

/// Model — Python-facing wrapper around [`solve::solve`] and
/// [`simulate::simulate`].
///
/// Purpose
/// -------
/// Hold a validated [`ModelSpec`] and [`ModelParams`] built from Python
/// arguments, and cache the most recent [`Solution`].
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `Model(num_periods, edu_start, edu_max, delta, coeffs_a, coeffs_b,
/// coeffs_edu, coeffs_home, shocks_cholesky=None, shocks_cov=None)`.
/// Exactly one of `shocks_cholesky` and `shocks_cov` must be given.
///
/// Invariants
/// ----------
/// - `spec` and `params` passed validation at construction.
/// - `solution`, when present, was computed from `spec` and `params`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_dcm.models")]
pub struct Model {
    spec: ModelSpec,
    params: ModelParams,
    solution: Option<Solution>,
}

#[cfg(feature = "python-bindings")]
impl Model {
    fn solved(&self) -> PyResult<&Solution> {
        self.solution.as_ref().ok_or_else(|| {
            pyo3::exceptions::PyRuntimeError::new_err("model has not been solved; call solve() first")
        })
    }
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Model {
    #[new]
    #[pyo3(
        signature = (
            num_periods,
            edu_start,
            edu_max,
            delta,
            coeffs_a,
            coeffs_b,
            coeffs_edu,
            coeffs_home,
            shocks_cholesky = None,
            shocks_cov = None,
        ),
        text_signature = "(num_periods, edu_start, edu_max, delta, coeffs_a, coeffs_b, \
                          coeffs_edu, coeffs_home, /, shocks_cholesky=None, shocks_cov=None)"
    )]
    pub fn new<'py>(
        py: Python<'py>, num_periods: usize, edu_start: usize, edu_max: usize, delta: f64,
        coeffs_a: &Bound<'py, PyAny>, coeffs_b: &Bound<'py, PyAny>, coeffs_edu: &Bound<'py, PyAny>,
        coeffs_home: &Bound<'py, PyAny>, shocks_cholesky: Option<&Bound<'py, PyAny>>,
        shocks_cov: Option<&Bound<'py, PyAny>>,
    ) -> PyResult<Self> {
        let spec = ModelSpec::new(num_periods, edu_start, edu_max, delta)?;
        let params = build_params(
            py,
            coeffs_a,
            coeffs_b,
            coeffs_edu,
            coeffs_home,
            shocks_cholesky,
            shocks_cov,
        )?;
        Ok(Model { spec, params, solution: None })
    }

    /// Solve the model by backward induction and cache the solution.
    ///
    /// `interp_points` enables interpolation with that many points per
    /// period; `level` enables ambiguity under `measure` (`"abs"` or `"kl"`).
    #[pyo3(
        signature = (
            num_draws = None,
            seed = None,
            debug = None,
            interp_points = None,
            measure = None,
            level = None,
            backend = None,
            num_threads = None,
        )
    )]
    pub fn solve(
        &mut self, py: Python<'_>, num_draws: Option<usize>, seed: Option<u64>, debug: Option<bool>,
        interp_points: Option<usize>, measure: Option<&str>, level: Option<f64>,
        backend: Option<&str>, num_threads: Option<usize>,
    ) -> PyResult<f64> {
        let options = build_solve_options(
            num_draws,
            seed,
            debug,
            interp_points,
            measure,
            level,
            backend,
            num_threads,
        )?;
        let solution = py.allow_threads(|| solve::solve(&self.spec, &self.params, &options))?;
        let entry = solution.emax_lookup(0, 0)?;
        self.solution = Some(solution);
        Ok(entry)
    }

    /// Simulate agents through the cached solution.
    ///
    /// Returns an `(num_agents · num_periods) × 8` array with columns
    /// `agent, period, choice, earnings, exp_a, exp_b, edu, lagged_choice`;
    /// earnings are NaN for non-work choices.
    #[pyo3(signature = (num_agents = None, seed = None, debug = None))]
    pub fn simulate<'py>(
        &self, py: Python<'py>, num_agents: Option<usize>, seed: Option<u64>, debug: Option<bool>,
    ) -> PyResult<Bound<'py, PyArray2<f64>>> {
        let solution = self.solved()?;
        let defaults = SimOptions::default();
        let options = SimOptions::new(
            num_agents.unwrap_or(defaults.num_agents),
            seed.unwrap_or(defaults.seed),
            debug.unwrap_or(defaults.debug),
        )?;
        let history = simulate::simulate(solution, &self.params, &options)?;
        Ok(history.to_array().into_pyarray(py))
    }

    /// EMAX of every state in `period`.
    pub fn emax<'py>(&self, py: Python<'py>, period: usize) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let emax = self.solved()?.emax_period(period)?;
        Ok(emax.clone().into_pyarray(py))
    }

    /// Systematic payoffs of every state in `period`, `num_states × 4`.
    pub fn payoffs<'py>(
        &self, py: Python<'py>, period: usize,
    ) -> PyResult<Bound<'py, PyArray2<f64>>> {
        let payoffs = self.solved()?.payoffs_period(period)?;
        Ok(payoffs.clone().into_pyarray(py))
    }

    /// Number of reachable states in `period`.
    pub fn num_states(&self, period: usize) -> PyResult<usize> {
        Ok(self.solved()?.state_space().num_states(period))
    }

    #[getter]
    pub fn is_solved(&self) -> bool {
        self.solution.is_some()
    }

    #[getter]
    pub fn num_periods(&self) -> usize {
        self.spec.num_periods
    }
}

/// _rust_dcm — PyO3 module initializer for the Python extension.
///
/// Registers the `models` submodule and adds it to `sys.modules` so that
/// `import rust_dcm.models` works from Python.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_dcm<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let models_mod = PyModule::new(_py, "models")?;
    models_mod.add_class::<Model>()?;
    m.add_submodule(&models_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("rust_dcm.models", models_mod)?;
    Ok(())
}
