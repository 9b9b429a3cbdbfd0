//! Knowledge-based agent for the wumpus world.
//!
//! [`LogicalAgent`] runs one perceive, infer, decide, act cycle per [`LogicalAgent::step`]. It
//! owns a [`wumpus_logic::KnowledgeBase`] for the episode, turns what it knows into per-cell
//! risk, and picks actions with a fixed-priority [`Policy`].

#![forbid(unsafe_code)]

pub mod agent;
pub mod config;
pub mod policy;
pub mod risk;
pub mod state;
pub mod trace;

pub use agent::{AgentSnapshot, LogicalAgent, TurnReport};
pub use config::AgentConfig;
pub use policy::{Decision, DecisionKind, Policy};
pub use risk::RiskModel;
pub use state::AgentState;
pub use trace::{ThoughtEntry, ThoughtLog};
