//! Fixed-priority action selection.
//!
//! Every turn the policy walks the same ladder and takes the first rung that yields an action:
//! grab, return home with the gold, walk to known gold, hunt a located wumpus, explore. A rung
//! whose path comes back empty falls through to the next one.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};
use wumpus_core::{Action, Cell, Percept};
use wumpus_logic::{KnowledgeBase, Literal, Predicate};
use wumpus_nav::GridPlanner;

use crate::risk::{frontier, in_grid};
use crate::{AgentConfig, AgentState, RiskModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionKind {
    Grab,
    ReturnHome,
    SeekGold,
    HuntWumpus,
    Explore,
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub kind: DecisionKind,
    /// `None` means the agent does nothing this turn.
    pub action: Option<Action>,
    pub reason: String,
}

impl Decision {
    fn act(kind: DecisionKind, action: Action, reason: impl Into<String>) -> Self {
        Self {
            kind,
            action: Some(action),
            reason: reason.into(),
        }
    }

    fn wait(kind: DecisionKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            action: None,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Policy {
    width: u32,
    height: u32,
    unknown_risk: f32,
    safe_explore_risk: f32,
    last_resort_risk: f32,
    planner: GridPlanner,
}

impl Policy {
    pub fn new(width: u32, height: u32, config: &AgentConfig) -> Self {
        Self {
            width,
            height,
            unknown_risk: config.unknown_risk,
            safe_explore_risk: config.safe_explore_risk,
            last_resort_risk: config.last_resort_risk,
            planner: GridPlanner::with_config(width, height, config.planner),
        }
    }

    pub fn risk_model<'a>(&self, state: &'a AgentState, kb: &'a KnowledgeBase) -> RiskModel<'a> {
        RiskModel::new(state, kb, self.unknown_risk)
    }

    /// Risk-weighted path from the agent's cell to `goal`.
    pub fn plan(&self, state: &AgentState, kb: &KnowledgeBase, goal: Cell) -> Vec<Cell> {
        self.planner
            .find_path(&self.risk_model(state, kb), state.position, goal)
    }

    pub fn decide(&self, state: &AgentState, kb: &KnowledgeBase, percept: &Percept) -> Decision {
        if percept.glitter && !state.has_gold {
            return Decision::act(DecisionKind::Grab, Action::Grab, "Glitter here: grabbing the gold");
        }

        if state.has_gold {
            if state.position == Cell::ORIGIN {
                return Decision::wait(DecisionKind::ReturnHome, "Back at the entrance with the gold");
            }
            if let Some(action) = self.first_step(state, kb, Cell::ORIGIN) {
                return Decision::act(DecisionKind::ReturnHome, action, "Holding gold: heading back to (0,0)");
            }
        }

        if !state.has_gold {
            if let Some(decision) = self.seek_gold(state, kb) {
                return decision;
            }
        }

        if state.has_arrow && !state.wumpus_killed {
            if let Some(decision) = self.hunt(state, kb) {
                return decision;
            }
        }

        self.explore(state, kb)
    }

    fn seek_gold(&self, state: &AgentState, kb: &KnowledgeBase) -> Option<Decision> {
        let mut targets: Vec<Cell> = kb
            .store()
            .known()
            .filter(|l| l.is(&Predicate::Gold, false))
            .filter_map(|l| l.cell)
            .filter(|c| *c != state.position)
            .collect();
        targets.sort_by_key(|c| (state.position.manhattan(*c), *c));

        targets.into_iter().find_map(|gold| {
            let action = self.first_step(state, kb, gold)?;
            Some(Decision::act(
                DecisionKind::SeekGold,
                action,
                format!("Gold known at {gold}: moving toward it"),
            ))
        })
    }

    fn hunt(&self, state: &AgentState, kb: &KnowledgeBase) -> Option<Decision> {
        let threat = self.known_wumpus(state, kb)?;

        if state.position.is_adjacent(threat) {
            let direction = state.position.direction_to(threat)?;
            return Some(Decision::act(
                DecisionKind::HuntWumpus,
                Action::Shoot(direction),
                format!("Wumpus located at {threat}: shooting {direction}"),
            ));
        }

        let best = threat
            .neighbors()
            .into_iter()
            .filter(|n| in_grid(*n, self.width, self.height) && !state.dangerous.contains(n))
            .map(|n| self.plan(state, kb, n))
            .filter(|path| !path.is_empty())
            .min_by_key(Vec::len)?;

        let action = state.position.direction_to(best[0]).map(Action::MoveForward)?;
        Some(Decision::act(
            DecisionKind::HuntWumpus,
            action,
            format!("Wumpus located at {threat}: moving into firing position"),
        ))
    }

    /// A wumpus asserted as a fact, or else one pinned down by surrounding stench.
    pub fn known_wumpus(&self, state: &AgentState, kb: &KnowledgeBase) -> Option<Cell> {
        if state.wumpus_killed {
            return None;
        }
        kb.store()
            .known()
            .filter(|l| l.is(&Predicate::Wumpus, false))
            .filter_map(|l| l.cell)
            .find(|c| in_grid(*c, self.width, self.height))
            .or_else(|| self.localize(state, kb, Predicate::Stench).into_iter().next())
    }

    /// Unvisited, unproven cells with at least two visited neighbours, all carrying `percept`.
    ///
    /// `Stench` locates the wumpus and `Breeze` locates pits. Cells where the matching threat is
    /// already ruled out are skipped.
    pub fn localize(&self, state: &AgentState, kb: &KnowledgeBase, percept: Predicate) -> Vec<Cell> {
        let ruled_out = match percept {
            Predicate::Stench => Predicate::Wumpus,
            Predicate::Breeze => Predicate::Pit,
            _ => return Vec::new(),
        };
        let model = self.risk_model(state, kb);

        let mut found = Vec::new();
        for x in 0..self.width as i32 {
            for y in 0..self.height as i32 {
                let cell = Cell::new(x, y);
                if state.is_visited(cell)
                    || model.is_known_safe(cell)
                    || kb.has_fact(&Literal::at(ruled_out.clone(), cell).negative())
                {
                    continue;
                }
                let witnesses: Vec<Cell> = cell
                    .neighbors()
                    .into_iter()
                    .filter(|n| state.is_visited(*n))
                    .collect();
                if witnesses.len() >= 2
                    && witnesses
                        .iter()
                        .all(|w| kb.has_fact(&Literal::at(percept.clone(), *w)))
                {
                    found.push(cell);
                }
            }
        }
        found
    }

    fn explore(&self, state: &AgentState, kb: &KnowledgeBase) -> Decision {
        let model = self.risk_model(state, kb);
        let candidates = frontier(state, state.position, self.width, self.height);
        let inviting = |c: Cell| model.is_known_safe(c) || model.position_risk(c) < self.safe_explore_risk;

        if let Some(next) = candidates.iter().copied().find(|c| inviting(*c)) {
            if let Some(action) = state.position.direction_to(next).map(Action::MoveForward) {
                return Decision::act(
                    DecisionKind::Explore,
                    action,
                    format!("Exploring safe neighbour {next}"),
                );
            }
        }

        if let Some(target) = self.nearest_inviting(state, &inviting) {
            if let Some(action) = self.first_step(state, kb, target) {
                return Decision::act(
                    DecisionKind::Explore,
                    action,
                    format!("Heading for unexplored safe cell {target}"),
                );
            }
        }

        let least_risky = candidates
            .iter()
            .map(|c| (*c, model.position_risk(*c)))
            .fold(None::<(Cell, f32)>, |best, (c, r)| match best {
                Some((_, br)) if br <= r => best,
                _ => Some((c, r)),
            });
        if let Some((next, risk)) = least_risky {
            if risk < self.last_resort_risk {
                if let Some(action) = state.position.direction_to(next).map(Action::MoveForward) {
                    return Decision::act(
                        DecisionKind::Explore,
                        action,
                        format!("Taking a calculated risk: {next} at {risk:.2}"),
                    );
                }
            }
        }

        Decision::wait(DecisionKind::Idle, "No safe move available, staying put")
    }

    /// Breadth-first search through visited and proven-safe cells for the closest unvisited cell
    /// that `inviting` accepts.
    fn nearest_inviting(&self, state: &AgentState, inviting: &impl Fn(Cell) -> bool) -> Option<Cell> {
        let mut queue = VecDeque::from([state.position]);
        let mut seen = BTreeSet::from([state.position]);

        while let Some(cell) = queue.pop_front() {
            for n in cell.neighbors() {
                if !in_grid(n, self.width, self.height) || !seen.insert(n) {
                    continue;
                }
                if !state.is_visited(n) && inviting(n) {
                    return Some(n);
                }
                if state.is_visited(n) || state.safe.contains(&n) {
                    queue.push_back(n);
                }
            }
        }
        None
    }

    fn first_step(&self, state: &AgentState, kb: &KnowledgeBase, goal: Cell) -> Option<Action> {
        let path = self.plan(state, kb, goal);
        let next = path.first()?;
        state.position.direction_to(*next).map(Action::MoveForward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wumpus_core::Direction;

    fn lit(s: &str) -> Literal {
        s.parse().unwrap()
    }

    fn policy(size: u32) -> Policy {
        Policy::new(size, size, &AgentConfig::default())
    }

    #[test]
    fn known_gold_is_sought() {
        let state = AgentState::new();
        let mut kb = KnowledgeBase::new().with_bounds(3, 3);
        kb.add_fact(lit("Gold(0,2)"));

        let decision = policy(3).decide(&state, &kb, &Percept::default());
        assert_eq!(decision.kind, DecisionKind::SeekGold);
        assert_eq!(decision.action, Some(Action::MoveForward(Direction::South)));
    }

    #[test]
    fn adjacent_wumpus_is_shot() {
        let state = AgentState::at(Cell::new(1, 1));
        let mut kb = KnowledgeBase::new().with_bounds(3, 3);
        kb.add_fact(lit("Wumpus(2,1)"));

        let decision = policy(3).decide(&state, &kb, &Percept::default().with_stench());
        assert_eq!(decision.kind, DecisionKind::HuntWumpus);
        assert_eq!(decision.action, Some(Action::Shoot(Direction::East)));
    }

    #[test]
    fn distant_wumpus_is_approached() {
        let mut state = AgentState::new();
        state.dangerous.insert(Cell::new(2, 2));
        let mut kb = KnowledgeBase::new().with_bounds(3, 3);
        kb.add_fact(lit("Wumpus(2,2)"));
        kb.add_fact(lit("Safe(1,0)"));
        kb.add_fact(lit("Safe(2,0)"));
        kb.add_fact(lit("Safe(2,1)"));

        let decision = policy(3).decide(&state, &kb, &Percept::default());
        assert_eq!(decision.kind, DecisionKind::HuntWumpus);
        assert_eq!(decision.action, Some(Action::MoveForward(Direction::East)));
    }

    #[test]
    fn unreachable_gold_falls_through_to_exploration() {
        let gold = Cell::new(2, 2);
        let mut state = AgentState::new();
        state.dangerous.extend(gold.neighbors());
        state.safe.insert(Cell::new(1, 0));
        let mut kb = KnowledgeBase::empty().with_bounds(4, 4);
        kb.add_fact(lit("Gold(2,2)"));

        let p = policy(4);
        assert!(p.plan(&state, &kb, gold).is_empty());
        let decision = p.decide(&state, &kb, &Percept::default());
        assert_eq!(decision.kind, DecisionKind::Explore);
        assert_eq!(decision.action, Some(Action::MoveForward(Direction::East)));
    }

    #[test]
    fn walled_off_entrance_falls_through_to_exploration() {
        let mut state = AgentState::at(Cell::new(2, 2));
        state.has_gold = true;
        state.dangerous.extend([Cell::new(1, 0), Cell::new(0, 1)]);
        state.safe.insert(Cell::new(3, 2));
        let mut kb = KnowledgeBase::empty().with_bounds(4, 4);
        kb.add_fact(lit("Breeze(2,2)"));

        let p = policy(4);
        assert!(p.plan(&state, &kb, Cell::ORIGIN).is_empty());
        let decision = p.decide(&state, &kb, &Percept::default().with_breeze());
        assert_eq!(decision.kind, DecisionKind::Explore);
        assert_eq!(decision.action, Some(Action::MoveForward(Direction::East)));
    }

    #[test]
    fn no_arrow_means_no_hunt() {
        let mut state = AgentState::at(Cell::new(1, 1));
        state.has_arrow = false;
        let mut kb = KnowledgeBase::new().with_bounds(3, 3);
        kb.add_fact(lit("Wumpus(2,1)"));

        let decision = policy(3).decide(&state, &kb, &Percept::default());
        assert_ne!(decision.kind, DecisionKind::HuntWumpus);
    }

    #[test]
    fn stench_on_two_sides_localizes_the_wumpus() {
        let mut state = AgentState::new();
        state.visited.extend([Cell::new(1, 0), Cell::new(0, 1)]);
        let mut kb = KnowledgeBase::empty().with_bounds(3, 3);
        kb.add_fact(lit("Stench(1,0)"));
        kb.add_fact(lit("Stench(0,1)"));

        let p = policy(3);
        assert_eq!(p.localize(&state, &kb, Predicate::Stench), vec![Cell::new(1, 1)]);
        assert!(p.localize(&state, &kb, Predicate::Breeze).is_empty());
        assert_eq!(p.known_wumpus(&state, &kb), Some(Cell::new(1, 1)));

        kb.add_fact(lit("~Wumpus(1,1)"));
        assert!(p.localize(&state, &kb, Predicate::Stench).is_empty());
    }

    #[test]
    fn breeze_on_two_sides_localizes_a_pit_unless_ruled_out() {
        let mut state = AgentState::new();
        state.visited.extend([Cell::new(1, 0), Cell::new(0, 1)]);
        let mut kb = KnowledgeBase::empty().with_bounds(3, 3);
        kb.add_fact(lit("Breeze(1,0)"));
        kb.add_fact(lit("Breeze(0,1)"));

        let p = policy(3);
        assert_eq!(p.localize(&state, &kb, Predicate::Breeze), vec![Cell::new(1, 1)]);
        assert_eq!(p.known_wumpus(&state, &kb), None);

        kb.add_fact(lit("~Pit(1,1)"));
        assert!(p.localize(&state, &kb, Predicate::Breeze).is_empty());
    }

    #[test]
    fn exploration_walks_through_known_safe_cells() {
        // Visited row y = 0; only (0,1) is known safe and it is two steps back.
        let mut state = AgentState::at(Cell::new(2, 0));
        state.visited.insert(Cell::new(1, 0));
        state.safe.insert(Cell::new(1, 0));
        state.safe.insert(Cell::new(0, 1));
        let mut kb = KnowledgeBase::empty().with_bounds(3, 2);
        kb.add_fact(lit("Breeze(2,0)"));
        kb.add_fact(lit("Breeze(1,0)"));

        let policy = Policy::new(3, 2, &AgentConfig::default());
        let decision = policy.decide(&state, &kb, &Percept::default().with_breeze());
        assert_eq!(decision.kind, DecisionKind::Explore);
        assert_eq!(decision.action, Some(Action::MoveForward(Direction::West)));
    }

    #[test]
    fn nothing_safe_means_idle() {
        let state = AgentState::new();
        let mut kb = KnowledgeBase::new().with_bounds(3, 3);
        kb.add_fact(lit("Breeze(0,0)"));

        let decision = policy(3).decide(&state, &kb, &Percept::default().with_breeze());
        assert_eq!(decision.kind, DecisionKind::Idle);
        assert_eq!(decision.action, None);
    }
}
