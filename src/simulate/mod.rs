//! simulate — forward simulation of agents through a solved model.
//!
//! - [`agents`]: [`simulate`], the per-agent decision loop.
//! - [`history`]: [`AgentRecord`] / [`AgentHistory`] and their summaries.

pub mod agents;
pub mod history;

pub use self::agents::simulate;
pub use self::history::{AgentHistory, AgentRecord, NUM_HISTORY_COLUMNS};
