//! state_space — reachable decision states of the occupational-choice model.
//!
//! Purpose
//! -------
//! Enumerate `(period, exp_a, exp_b, edu, lagged_choice)` states, give them
//! dense per-period indices, and precompute the successor of each state under
//! each choice. The solver and the simulator only move between states through
//! this module.
//!
//! Key behaviors
//! -------------
//! - [`Choice`] and [`State`] are the shared vocabulary.
//! - [`StateSpace`] owns enumeration, index lookup, and transitions.

pub mod builder;
pub mod choice;

pub use self::builder::{StateSpace, Transitions};
pub use self::choice::{Choice, State};
