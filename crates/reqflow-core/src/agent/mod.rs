//! Reasoning loop: alternate between the model and remote tools until the
//! model answers

mod decision;
mod error;
mod runner;
mod state;

pub use decision::{parse_reply, ModelDecision, ParsedReply};
pub use error::{AgentError, AgentResult};
pub use runner::{Agent, AgentConfig, RunOutcome};
pub use state::AgentState;
