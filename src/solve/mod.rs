//! solve — backward-induction solver and its solution container.
//!
//! Purpose
//! -------
//! Compute the EMAX table of the model, period by period from the terminal
//! period down to period 0, with optional regression interpolation and
//! optional ambiguity aversion, on a serial or rayon-parallel backend.
//!
//! Key behaviors
//! -------------
//! - [`solve`] ([`api`]): the single entry point; validates inputs and
//!   returns an immutable [`Solution`].
//! - [`backward`]: the period loop.
//! - [`emax`]: per-state kernels (continuations, ex-post rewards, EMAX,
//!   `maxe`), shared with the simulator.
//! - [`interpolation`]: point selection and the OLS approximation.
//! - [`backend`]: serial / parallel fan-out over the states of a period.
//! - [`errors`]: [`SolveError`], [`SolveResult`], [`ErrorKind`].
//!
//! Invariants & assumptions
//! ------------------------
//! - A period is solved completely before the previous one starts; the
//!   arrays of later periods are never modified.
//! - Serial and parallel backends produce identical results.
//!
//! Testing notes
//! -------------
//! - Unit tests cover each kernel in isolation and the Bellman recursion of
//!   a zero-shock model.
//! - End-to-end properties (determinism, backend parity, ambiguity
//!   monotonicity, interpolation with a full quota, horizon independence
//!   under `delta = 0`) live in `tests/integration_solve_pipeline.rs`.

pub mod api;
pub mod backend;
pub mod backward;
pub mod emax;
pub mod errors;
pub mod interpolation;
pub mod solution;

pub use self::api::solve;
pub use self::errors::{ErrorKind, SolveError, SolveResult};
pub use self::solution::Solution;
