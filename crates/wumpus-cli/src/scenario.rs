//! Scenario loading, from .wumpus/scenario.yaml by default.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use wumpus_agent::AgentConfig;
use wumpus_core::{grid_area, Cell, WorldLayout};

pub const SCENARIO_PATH: &str = ".wumpus/scenario.yaml";

/// Sample written by `wumpus init`. Mirrors [`Scenario::default`].
pub const SAMPLE_SCENARIO: &str = r#"# Wumpus scenario

max_turns: 200

world:
  width: 4
  height: 4
  wumpus:
    - { x: 0, y: 2 }
  pits:
    - { x: 2, y: 0 }
    - { x: 2, y: 2 }
    - { x: 3, y: 3 }
  gold:
    - { x: 1, y: 2 }

agent:
  trace_capacity: 50
  unknown_risk: 0.7
  safe_explore_risk: 0.2
  last_resort_risk: 0.3
  planner:
    risk_weight: 5.0
    max_risk: 0.7
    max_expansions: 10000
  resolution:
    max_clauses: 4096
    max_rounds: 64
"#;

/// One episode: the cave, the agent's tunables, and a turn cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub world: WorldLayout,

    pub agent: AgentConfig,

    /// Hard stop for agents that never finish.
    #[serde(default = "default_max_turns")]
    pub max_turns: u64,
}

fn default_max_turns() -> u64 {
    200
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            world: WorldLayout {
                width: 4,
                height: 4,
                wumpus: vec![Cell::new(0, 2)],
                pits: vec![Cell::new(2, 0), Cell::new(2, 2), Cell::new(3, 3)],
                gold: vec![Cell::new(1, 2)],
            },
            agent: AgentConfig::default(),
            max_turns: default_max_turns(),
        }
    }
}

impl Scenario {
    /// Load a scenario from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario from {}", path.display()))?;
        let scenario: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse scenario from {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario in {}", path.display()))?;
        Ok(scenario)
    }

    /// Load from project root (looks for .wumpus/scenario.yaml)
    pub fn load_from_project(project_root: &Path) -> Result<Self> {
        let path = project_root.join(SCENARIO_PATH);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        let layout = &self.world;
        grid_area(layout.width, layout.height)?;
        let inside = |c: &Cell| {
            c.x >= 0 && c.y >= 0 && (c.x as u32) < layout.width && (c.y as u32) < layout.height
        };
        for (what, cells) in [
            ("wumpus", &layout.wumpus),
            ("pit", &layout.pits),
            ("gold", &layout.gold),
        ] {
            if let Some(cell) = cells.iter().find(|c| !inside(c)) {
                anyhow::bail!("{what} at {cell} lies outside the {}x{} grid", layout.width, layout.height);
            }
        }
        Ok(())
    }
}
