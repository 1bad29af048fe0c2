//! solve::api — the `solve` entry point.
//!
//! Validates every input, enumerates the state space, tabulates the
//! systematic payoffs, draws the integration shocks, and runs backward
//! induction on the configured backend. Either a complete [`Solution`] is
//! returned or nothing is.
use crate::{
    draws::create_draws,
    model::{
        options::{ModelSpec, SolveOptions},
        params::ModelParams,
    },
    payoffs::period_payoffs,
    solve::{
        backend::StateExecutor,
        backward::{BackwardInputs, backward_induction},
        errors::SolveResult,
        solution::Solution,
    },
    state_space::StateSpace,
};
use log::{info, warn};
use ndarray::Array2;

/// Solve the model by backward induction.
///
/// # Errors
/// - [`SolveError::Model`](crate::solve::SolveError::Model) for any invalid
///   specification, parameter, or option, before any work starts.
/// - Numerical and integration errors from the backward pass.
///
/// # Examples
/// ```
/// use ndarray::{Array2, array};
/// use rust_dcm::prelude::*;
///
/// let spec = ModelSpec::new(3, 10, 12, 0.95).unwrap();
/// let params = ModelParams::new(
///     array![9.21, 0.038, 0.033, -0.0005, 0.0, 0.0],
///     array![8.48, 0.07, 0.067, -0.001, 0.022, -0.0005],
///     array![0.0, 0.0, -4000.0],
///     array![17750.0],
///     Array2::eye(4) * 0.2,
/// )
/// .unwrap();
/// let options = SolveOptions { num_draws: 50, ..SolveOptions::default() };
///
/// let solution = solve(&spec, &params, &options).unwrap();
/// assert!(solution.emax_lookup(0, 0).unwrap().is_finite());
/// ```
pub fn solve(spec: &ModelSpec, params: &ModelParams, options: &SolveOptions) -> SolveResult<Solution> {
    spec.validate()?;
    params.validate()?;
    options.validate()?;

    let space = StateSpace::new(spec.num_periods, spec.edu_start, spec.edu_max)?;
    info!(
        "solving {} periods, {} states (max {} per period), {} draws, backend {:?}",
        spec.num_periods,
        space.total_states(),
        space.max_states_period(),
        options.num_draws,
        options.backend
    );
    if options.interpolation.enabled && options.interpolation.num_points >= space.max_states_period() {
        warn!(
            "interpolation requested with {} points but no period has more than {} states; solving exactly",
            options.interpolation.num_points,
            space.max_states_period()
        );
    }

    let payoffs: Vec<Array2<f64>> =
        (0..spec.num_periods).map(|t| period_payoffs(&space, t, params)).collect();
    let draws = create_draws(spec.num_periods, options.num_draws, options.seed, options.debug)?;
    let exec = StateExecutor::new(&options.backend)?;

    let inputs = BackwardInputs {
        space: &space,
        params,
        payoffs: &payoffs,
        draws: &draws,
        delta: spec.delta,
        options,
    };
    let emax = backward_induction(&inputs, &exec)?;
    if let Some(entry) = emax.first().and_then(|e| e.get(0)) {
        info!("solve finished; EMAX at the entry state: {entry:.4}");
    }

    Ok(Solution::new(space, payoffs, emax, spec.delta, params.shocks_cholesky.clone()))
}
