//! simulate::agents — forward simulation of agents through a solved model.
//!
//! Purpose
//! -------
//! Walk each agent from the entry state through every period, choosing the
//! alternative with the highest realized value (ex-post reward plus the
//! continuation value the solver used), and record the path.
//!
//! Key behaviors
//! -------------
//! - Shocks come from [`create_draws`] with the simulation seed and one
//!   "draw" per agent, transformed exactly like the solver's draws.
//! - Ties in realized value go to the lower choice index.
//! - Earnings are recorded for work choices only.
//!
//! Invariants & assumptions
//! ------------------------
//! - `params` must be the parameters the solution was computed with. The
//!   shock factor and the entry-state payoffs are compared against the
//!   solution before any agent moves.
use crate::{
    draws::create_draws,
    model::{options::SimOptions, params::ModelParams},
    payoffs::systematic_payoffs,
    simulate::history::{AgentHistory, AgentRecord},
    solve::{
        Solution,
        emax::{best_choice, choice_values},
        errors::{SolveError, SolveResult},
    },
};
use log::info;
use ndarray::Array2;

/// Simulate `options.num_agents` agents through `solution`.
///
/// # Errors
/// - [`SolveError::Model`] for invalid options or parameters.
/// - [`SolveError::ParamsMismatch`] if `params` is not the parameter set the
///   solution was computed with.
/// - [`SolveError::MissingTransition`] / [`SolveError::StateOutOfRange`]
///   if an agent's path leaves the solved state space.
pub fn simulate(solution: &Solution, params: &ModelParams, options: &SimOptions) -> SolveResult<AgentHistory> {
    options.validate()?;
    params.validate()?;
    check_params(solution, params)?;
    let num_periods = solution.num_periods();
    info!("simulating {} agents over {num_periods} periods", options.num_agents);

    let draws = create_draws(num_periods, options.num_agents, options.seed, options.debug)?;
    let shocks: Vec<Array2<f64>> = (0..num_periods)
        .map(|t| {
            draws
                .transformed(t, &params.shocks_cholesky)
                .ok_or(SolveError::PeriodOutOfRange { period: t, num_periods })
        })
        .collect::<SolveResult<_>>()?;

    let mut records = Vec::with_capacity(options.num_agents * num_periods);
    for agent in 0..options.num_agents {
        let mut index = 0;
        for (period, period_shocks) in shocks.iter().enumerate() {
            let state = *solution.state(period, index)?;
            let payoffs = solution.payoff_lookup(period, index)?;
            let continuations = solution.continuations(period, index)?;
            let shock = period_shocks.row(agent);
            let values = choice_values(payoffs, shock, &continuations);
            let (choice, _) = best_choice(&values);

            let c = choice.index();
            let earnings = choice.is_work().then(|| payoffs[c] * shock[c]);
            records.push(AgentRecord {
                agent,
                period,
                choice,
                earnings,
                exp_a: state.exp_a,
                exp_b: state.exp_b,
                edu: state.edu,
                lagged_choice: state.lagged_choice,
            });

            if period + 1 < num_periods {
                index = solution
                    .transition(period, index, choice)
                    .ok_or(SolveError::MissingTransition { period, index, choice: c })?;
            }
        }
    }
    info!("simulation finished with {} records", records.len());

    Ok(AgentHistory::new(options.num_agents, num_periods, records))
}

fn check_params(solution: &Solution, params: &ModelParams) -> SolveResult<()> {
    if params.shocks_cholesky != *solution.shocks_cholesky() {
        return Err(SolveError::ParamsMismatch { name: "shocks_cholesky" });
    }
    let entry = solution.state(0, 0)?;
    let expected = systematic_payoffs(entry, params);
    if solution.payoff_lookup(0, 0)?.iter().ne(expected.iter()) {
        return Err(SolveError::ParamsMismatch { name: "payoff coefficients" });
    }
    Ok(())
}
