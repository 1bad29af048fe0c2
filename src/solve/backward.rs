//! solve::backward — backward induction over periods.
//!
//! Purpose
//! -------
//! Fill the EMAX table from the terminal period down to period 0. Each
//! period is solved in full, either exactly at every state or by
//! interpolation, before the previous period starts.
//!
//! Key behaviors
//! -------------
//! - Terminal period: continuation values are zero.
//! - Earlier periods: continuation values are `delta · EMAX[t+1][next]`,
//!   read from the already frozen next-period array.
//! - Exact states and `maxe` regressors are fanned out through the
//!   [`StateExecutor`]; the regression itself runs once per period.
//! - Any non-finite EMAX aborts the solve with the offending coordinates.
//!
//! Invariants & assumptions
//! ------------------------
//! - `payoffs[t]` has one row per state of period `t`.
//! - The draw batch covers every period.
use crate::{
    draws::DrawBatch,
    model::{NUM_CHOICES, options::SolveOptions, params::ModelParams},
    solve::{
        backend::StateExecutor,
        emax::{choice_continuations, exact_emax, expected_max_at_mean, mean_shocks},
        errors::{SolveError, SolveResult},
        interpolation::{interpolate_emax, interpolation_points},
    },
    state_space::StateSpace,
};
use log::debug;
use ndarray::{Array1, Array2};

/// Borrowed inputs of one backward pass.
pub struct BackwardInputs<'a> {
    pub space: &'a StateSpace,
    pub params: &'a ModelParams,
    pub payoffs: &'a [Array2<f64>],
    pub draws: &'a DrawBatch,
    pub delta: f64,
    pub options: &'a SolveOptions,
}

/// Run backward induction and return the EMAX table, one array per period.
///
/// # Errors
/// - [`SolveError::PeriodOutOfRange`] if payoffs or draws miss a period.
/// - [`SolveError::Ambiguity`] if a worst-case expectation fails.
/// - [`SolveError::SingularRegression`] if an interpolation fit fails.
/// - [`SolveError::NonFiniteEmax`] if any EMAX is NaN/±inf.
pub fn backward_induction(inputs: &BackwardInputs<'_>, exec: &StateExecutor) -> SolveResult<Vec<Array1<f64>>> {
    let num_periods = inputs.space.num_periods();
    let mean = mean_shocks(inputs.params, inputs.options.debug);
    let mut emax: Vec<Array1<f64>> = vec![Array1::zeros(0); num_periods];
    for period in (0..num_periods).rev() {
        let emax_t = solve_period(inputs, exec, period, emax.get(period + 1), &mean)?;
        emax[period] = emax_t;
    }
    Ok(emax)
}

fn solve_period(
    inputs: &BackwardInputs<'_>, exec: &StateExecutor, period: usize,
    next_emax: Option<&Array1<f64>>, mean: &[f64; NUM_CHOICES],
) -> SolveResult<Array1<f64>> {
    let BackwardInputs { space, params, payoffs, draws, delta, options } = *inputs;
    let num_periods = space.num_periods();
    let states = space.period_states(period);
    let num_states = states.len();

    let payoffs = payoffs.get(period).ok_or(SolveError::PeriodOutOfRange { period, num_periods })?;
    let shocks = draws
        .transformed(period, &params.shocks_cholesky)
        .ok_or(SolveError::PeriodOutOfRange { period, num_periods: draws.num_periods() })?;

    let exact_at = |k: usize| -> SolveResult<f64> {
        let conts = choice_continuations(space, period, k, next_emax, delta)?;
        exact_emax(payoffs.row(k), &conts, &shocks, &options.ambiguity)
            .map_err(|source| SolveError::Ambiguity { period, state: k, source })
    };

    let all: Vec<usize> = (0..num_states).collect();
    let emax_t = if options.interpolation.applies_to(num_states) {
        let points = interpolation_points(num_states, options.interpolation.num_points, options.seed, period);
        debug!(
            "period {period}: {num_states} states, interpolating from {} exact points",
            points.len()
        );
        let exact = exec.map_states(&points, exact_at)?;
        let maxe = exec.map_states(&all, |k| {
            let conts = choice_continuations(space, period, k, next_emax, delta)?;
            Ok(expected_max_at_mean(payoffs.row(k), &conts, mean))
        })?;
        interpolate_emax(period, states, &maxe, &points, &exact, !options.ambiguity.is_active())?
    } else {
        debug!("period {period}: {num_states} states, solving exactly");
        Array1::from(exec.map_states(&all, exact_at)?)
    };

    if let Some((state, &value)) = emax_t.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(SolveError::NonFiniteEmax { period, state, value });
    }
    Ok(emax_t)
}
