use serde::{Deserialize, Serialize};
use wumpus_logic::ResolutionLimits;
use wumpus_nav::PlannerConfig;

/// Tunables for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Number of trace entries kept; older ones are dropped.
    #[serde(default = "default_trace_capacity")]
    pub trace_capacity: usize,

    /// Risk of a cell with no visited neighbour to judge it by.
    #[serde(default = "default_unknown_risk")]
    pub unknown_risk: f32,

    /// Unvisited cells below this risk are explored without hesitation.
    #[serde(default = "default_safe_explore_risk")]
    pub safe_explore_risk: f32,

    /// Last-resort moves must stay below this risk.
    #[serde(default = "default_last_resort_risk")]
    pub last_resort_risk: f32,

    #[serde(default)]
    pub planner: PlannerConfig,

    #[serde(default)]
    pub resolution: ResolutionLimits,
}

fn default_trace_capacity() -> usize {
    50
}
fn default_unknown_risk() -> f32 {
    0.7
}
fn default_safe_explore_risk() -> f32 {
    0.2
}
fn default_last_resort_risk() -> f32 {
    0.3
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            trace_capacity: default_trace_capacity(),
            unknown_risk: default_unknown_risk(),
            safe_explore_risk: default_safe_explore_risk(),
            last_resort_risk: default_last_resort_risk(),
            planner: PlannerConfig::default(),
            resolution: ResolutionLimits::default(),
        }
    }
}
