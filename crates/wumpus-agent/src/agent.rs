use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use wumpus_core::{Action, ActionResult, Cell, Direction, Percept, World};
use wumpus_logic::{KnowledgeBase, KnowledgeSnapshot, Literal, Predicate};

use crate::risk::{frontier, in_grid};
use crate::{AgentConfig, AgentState, Decision, Policy, ThoughtEntry, ThoughtLog};

/// What happened during one [`LogicalAgent::step`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: u64,
    /// Where the agent stood when it perceived.
    pub position: Cell,
    pub percept: Percept,
    pub decision: Decision,
    /// `None` when the decision carried no action.
    pub result: Option<ActionResult>,
}

/// Serializable view of the agent for callers and UIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub position: Cell,
    pub direction: Direction,
    pub has_gold: bool,
    pub has_arrow: bool,
    pub wumpus_killed: bool,
    pub move_count: u64,
    pub visited: Vec<Cell>,
    pub safe: Vec<Cell>,
    pub dangerous: Vec<Cell>,
    /// Frontier risk keyed by the cell's `(x,y)` text.
    pub risk_assessment: BTreeMap<String, f32>,
    pub thoughts: Vec<ThoughtEntry>,
}

/// Knowledge-based agent for one episode.
#[derive(Debug, Clone)]
pub struct LogicalAgent {
    width: u32,
    height: u32,
    config: AgentConfig,
    kb: KnowledgeBase,
    state: AgentState,
    policy: Policy,
    thoughts: ThoughtLog,
}

impl LogicalAgent {
    pub fn new(width: u32, height: u32, config: AgentConfig) -> Self {
        let mut kb = KnowledgeBase::new()
            .with_bounds(width, height)
            .with_limits(config.resolution);
        kb.add_fact(Literal::at(Predicate::Safe, Cell::ORIGIN));

        let mut agent = Self {
            width,
            height,
            policy: Policy::new(width, height, &config),
            thoughts: ThoughtLog::new(config.trace_capacity),
            config,
            kb,
            state: AgentState::new(),
        };
        agent.refresh_beliefs();
        agent.think("Agent initialized at (0,0), starting exploration");
        agent
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn thoughts(&self) -> &ThoughtLog {
        &self.thoughts
    }

    /// Resolution query against everything the agent knows.
    pub fn query(&self, literal: &Literal) -> bool {
        self.kb.query(literal)
    }

    /// Run one perceive, infer, decide, act cycle. Returns `None` once the world reports game
    /// over.
    pub fn step(&mut self, world: &mut impl World) -> Option<TurnReport> {
        if world.is_game_over() {
            return None;
        }
        self.state.move_count += 1;
        let turn = self.state.move_count;
        let position = self.state.position;

        let percept = world.percept(position);
        self.update_knowledge(percept);
        self.refresh_risk();

        let decision = self.policy.decide(&self.state, &self.kb, &percept);
        tracing::debug!(turn, kind = ?decision.kind, action = ?decision.action, "decision");
        self.think(format!("Decision: {}", decision.reason));

        let result = decision.action.map(|action| self.execute(world, action));
        if decision.action.is_none() {
            self.think("No action taken this turn");
        }

        Some(TurnReport {
            turn,
            position,
            percept,
            decision,
            result,
        })
    }

    /// Assert the percepts at the current cell and re-derive the safe and dangerous sets.
    pub fn update_knowledge(&mut self, percept: Percept) {
        let here = self.state.position;

        let stench = Literal::at(Predicate::Stench, here);
        if percept.stench {
            self.think(format!("Detected stench at {here}, wumpus nearby"));
            self.kb.add_fact(stench);
        } else {
            if self.state.wumpus_killed {
                // Left over from the dead wumpus.
                self.kb.remove_fact(&stench);
            }
            self.kb.add_fact(stench.negative());
        }

        let breeze = Literal::at(Predicate::Breeze, here);
        if percept.breeze {
            self.think(format!("Detected breeze at {here}, pit nearby"));
            self.kb.add_fact(breeze);
        } else {
            self.kb.add_fact(breeze.negative());
        }

        if percept.glitter {
            self.think(format!("Gold glitters at {here}"));
            self.kb.add_fact(Literal::at(Predicate::Glitter, here));
        }

        if percept.scream && !self.state.wumpus_killed {
            self.on_wumpus_killed();
        }

        self.kb.add_fact(Literal::at(Predicate::Safe, here));
        self.kb.add_fact(Literal::at(Predicate::Visited, here));
        self.state.visited.insert(here);
        self.state.safe.insert(here);

        self.refresh_beliefs();
    }

    fn cells(&self) -> impl Iterator<Item = Cell> {
        let (w, h) = (self.width as i32, self.height as i32);
        (0..w).flat_map(move |x| (0..h).map(move |y| Cell::new(x, y)))
    }

    /// Recompute `safe` and `dangerous` from the knowledge base.
    fn refresh_beliefs(&mut self) {
        let safe = self
            .cells()
            .filter(|c| {
                self.state.visited.contains(c) || self.kb.has_fact(&Literal::at(Predicate::Safe, *c))
            })
            .collect();
        self.state.safe = safe;

        let wumpus_alive = !self.state.wumpus_killed;
        let mut dangerous: BTreeSet<Cell> = self
            .cells()
            .filter(|c| {
                self.kb.has_fact(&Literal::at(Predicate::Pit, *c))
                    || (wumpus_alive && self.kb.has_fact(&Literal::at(Predicate::Wumpus, *c)))
            })
            .collect();
        dangerous.extend(self.policy.localize(&self.state, &self.kb, Predicate::Breeze));
        if wumpus_alive {
            dangerous.extend(self.policy.localize(&self.state, &self.kb, Predicate::Stench));
        }
        self.state.dangerous = dangerous;
    }

    fn refresh_risk(&mut self) {
        let model = self.policy.risk_model(&self.state, &self.kb);
        let assessment = frontier(&self.state, self.state.position, self.width, self.height)
            .into_iter()
            .map(|c| (c, model.position_risk(c)))
            .collect();
        self.state.risk_assessment = assessment;
    }

    fn execute(&mut self, world: &mut impl World, action: Action) -> ActionResult {
        let here = self.state.position;
        let result = world.perform_action(action, here);

        if !result.success {
            tracing::warn!(%action, cell = %here, message = %result.message, "action failed");
            self.think(format!("Action failed: {}", result.message));
            return result;
        }

        match action {
            Action::MoveForward(direction) => {
                let next = here.step(direction);
                if in_grid(next, self.width, self.height) {
                    self.state.position = next;
                    self.state.direction = direction;
                    self.think(format!("Moved to {next}"));
                }
            }
            Action::Grab => {
                self.state.has_gold = true;
                self.kb.remove_fact(&Literal::at(Predicate::Glitter, here));
                self.kb.remove_fact(&Literal::at(Predicate::Gold, here));
                tracing::info!(cell = %here, "gold grabbed");
                self.think("Grabbed the gold");
            }
            Action::Shoot(direction) => {
                self.state.has_arrow = false;
                self.state.direction = direction;
                if result.scream {
                    self.think("Arrow hit, the wumpus is dead");
                    self.on_wumpus_killed();
                } else {
                    self.think(format!("Arrow flew {direction} and missed"));
                    self.clear_line_of_fire(here, direction);
                }
                self.refresh_beliefs();
            }
        }
        result
    }

    fn on_wumpus_killed(&mut self) {
        self.state.wumpus_killed = true;
        tracing::info!("wumpus killed");
        self.kb.add_fact(Literal::nullary(Predicate::Scream));
        self.kb.add_fact(Literal::nullary(Predicate::WumpusDead));

        let suspects: Vec<Literal> = self
            .kb
            .store()
            .known()
            .filter(|l| {
                l.is(&Predicate::PossibleWumpus, false) || l.is(&Predicate::Wumpus, false)
            })
            .cloned()
            .collect();
        for literal in suspects {
            self.kb.remove_fact(&literal);
            let Some(cell) = literal.cell else { continue };
            let pit_suspected = self.kb.has_fact(&Literal::at(Predicate::PossiblePit, cell))
                || self.kb.has_fact(&Literal::at(Predicate::Pit, cell));
            if !pit_suspected {
                self.kb.add_fact(Literal::at(Predicate::Safe, cell));
            }
        }
    }

    /// A miss proves no wumpus stands anywhere along the arrow's path.
    fn clear_line_of_fire(&mut self, from: Cell, direction: Direction) {
        let mut cell = from.step(direction);
        while in_grid(cell, self.width, self.height) {
            self.kb
                .add_fact(Literal::at(Predicate::Wumpus, cell).negative());
            cell = cell.step(direction);
        }
    }

    fn think(&mut self, message: impl Into<String>) {
        self.thoughts.push(self.state.move_count, message);
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            position: self.state.position,
            direction: self.state.direction,
            has_gold: self.state.has_gold,
            has_arrow: self.state.has_arrow,
            wumpus_killed: self.state.wumpus_killed,
            move_count: self.state.move_count,
            visited: self.state.visited.iter().copied().collect(),
            safe: self.state.safe.iter().copied().collect(),
            dangerous: self.state.dangerous.iter().copied().collect(),
            risk_assessment: self
                .state
                .risk_assessment
                .iter()
                .map(|(c, r)| (c.to_string(), *r))
                .collect(),
            thoughts: self.thoughts.entries().cloned().collect(),
        }
    }

    pub fn knowledge(&self) -> KnowledgeSnapshot {
        self.kb.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wumpus_core::GridWorld;

    #[test]
    fn new_agent_starts_safe_at_origin() {
        let agent = LogicalAgent::new(4, 4, AgentConfig::default());
        let state = agent.state();
        assert_eq!(state.position, Cell::ORIGIN);
        assert_eq!(state.direction, Direction::East);
        assert!(state.has_arrow && !state.has_gold);
        assert!(state.safe.contains(&Cell::ORIGIN));
        assert!(agent.knowledge_base().has_fact(&"Safe(0,0)".parse().unwrap()));
        assert_eq!(agent.thoughts().len(), 1);
    }

    #[test]
    fn step_is_a_no_op_after_game_over() {
        let mut world = GridWorld::new(2, 1).with_pit(Cell::new(1, 0));
        let mut agent = LogicalAgent::new(2, 1, AgentConfig::default());
        // Breeze at the origin with nowhere safe to go.
        let report = agent.step(&mut world).unwrap();
        assert_eq!(report.result, None);
        assert_eq!(agent.state().move_count, 1);

        let mut dead = GridWorld::new(2, 1).with_pit(Cell::new(1, 0));
        dead.perform_action(Action::MoveForward(Direction::East), Cell::ORIGIN);
        assert!(dead.is_game_over());
        assert!(agent.step(&mut dead).is_none());
        assert_eq!(agent.state().move_count, 1);
    }

    #[test]
    fn missed_arrow_clears_the_line() {
        let mut world = GridWorld::new(4, 1);
        let mut agent = LogicalAgent::new(4, 1, AgentConfig::default());
        let result = agent.execute(&mut world, Action::Shoot(Direction::East));
        assert!(result.success && !result.scream);
        assert!(!agent.state().has_arrow);
        for x in 1..4 {
            assert!(agent
                .knowledge_base()
                .has_fact(&Literal::at(Predicate::Wumpus, Cell::new(x, 0)).negative()));
        }
    }

    #[test]
    fn snapshot_serializes() {
        let agent = LogicalAgent::new(3, 3, AgentConfig::default());
        let json = serde_json::to_value(agent.snapshot()).unwrap();
        assert_eq!(json["position"]["x"], 0);
        assert_eq!(json["has_arrow"], true);
        assert_eq!(json["thoughts"].as_array().map(Vec::len), Some(1));
    }
}
