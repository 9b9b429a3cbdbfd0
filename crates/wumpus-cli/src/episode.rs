//! Drives one agent through one simulated cave.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use wumpus_agent::{LogicalAgent, TurnReport};
use wumpus_core::{GridWorld, World};

use crate::scenario::Scenario;

/// Outcome of an episode, as printed at the end of `wumpus run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub turns: u64,
    pub score: i64,
    pub alive: bool,
    pub has_gold: bool,
    /// The world reported game over before the turn cap.
    pub finished: bool,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Episode {
    world: GridWorld,
    agent: LogicalAgent,
    reports: Vec<TurnReport>,
}

impl Episode {
    pub fn new(scenario: &Scenario) -> Result<Self> {
        let world = GridWorld::from_layout(&scenario.world).context("Failed to build world")?;
        let agent = LogicalAgent::new(world.width(), world.height(), scenario.agent.clone());
        Ok(Self {
            world,
            agent,
            reports: Vec::new(),
        })
    }

    pub fn agent(&self) -> &LogicalAgent {
        &self.agent
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    pub fn reports(&self) -> &[TurnReport] {
        &self.reports
    }

    /// Run one turn. `None` once the game is over.
    pub fn step(&mut self) -> Option<&TurnReport> {
        let report = self.agent.step(&mut self.world)?;
        self.reports.push(report);
        self.reports.last()
    }

    /// Run up to `max_turns` turns, calling `on_turn` after each. Returns the number played.
    pub fn run(&mut self, max_turns: u64, mut on_turn: impl FnMut(&TurnReport)) -> u64 {
        tracing::info!(
            width = self.world.width(),
            height = self.world.height(),
            max_turns,
            "episode started"
        );
        let mut played = 0;
        while played < max_turns {
            let Some(report) = self.step() else { break };
            on_turn(report);
            played += 1;
        }
        let summary = self.summary();
        tracing::info!(
            turns = summary.turns,
            score = summary.score,
            finished = summary.finished,
            "episode ended: {}",
            summary.message
        );
        played
    }

    pub fn summary(&self) -> EpisodeSummary {
        EpisodeSummary {
            turns: self.reports.len() as u64,
            score: self.world.score(),
            alive: self.world.is_agent_alive(),
            has_gold: self.world.has_gold(),
            finished: self.world.is_game_over(),
            message: self.world.message().to_string(),
        }
    }
}
