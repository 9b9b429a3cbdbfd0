//! Heuristic danger estimate for cells the agent has not proven safe.

use wumpus_core::Cell;
use wumpus_logic::{KnowledgeBase, Literal, Predicate};
use wumpus_nav::RiskField;

use crate::AgentState;

/// Risk of a cell with visited neighbours that all felt clear.
pub const CLEAR_EVIDENCE_RISK: f32 = 0.1;
/// Risk when every visited neighbour reported a danger percept.
pub const DANGER_EVIDENCE_RISK: f32 = 0.95;
/// Risk when danger percepts outnumber clear neighbours.
pub const DANGER_MAJORITY_RISK: f32 = 0.8;
/// Risk for evenly split or clear-majority evidence.
pub const MIXED_EVIDENCE_RISK: f32 = 0.3;

/// Read-only view combining agent state and knowledge into per-cell risk.
///
/// Also serves as the planner's [`RiskField`], so step costs and exploration thresholds agree.
#[derive(Debug, Clone, Copy)]
pub struct RiskModel<'a> {
    state: &'a AgentState,
    kb: &'a KnowledgeBase,
    unknown_risk: f32,
}

impl<'a> RiskModel<'a> {
    pub fn new(state: &'a AgentState, kb: &'a KnowledgeBase, unknown_risk: f32) -> Self {
        Self {
            state,
            kb,
            unknown_risk,
        }
    }

    pub fn is_known_safe(&self, cell: Cell) -> bool {
        self.state.safe.contains(&cell) || self.kb.has_fact(&Literal::at(Predicate::Safe, cell))
    }

    pub fn is_known_dangerous(&self, cell: Cell) -> bool {
        self.state.dangerous.contains(&cell)
            || self.kb.has_fact(&Literal::at(Predicate::Pit, cell))
            || (!self.state.wumpus_killed
                && self.kb.has_fact(&Literal::at(Predicate::Wumpus, cell)))
    }

    /// Risk in `[0, 1]`.
    pub fn position_risk(&self, cell: Cell) -> f32 {
        if self.is_known_safe(cell) {
            return 0.0;
        }
        if self.is_known_dangerous(cell) {
            return 1.0;
        }

        let mut danger = 0usize;
        let mut clear = 0usize;
        for n in cell.neighbors() {
            if !self.state.is_visited(n) {
                continue;
            }
            if self.has_danger_percept(n) {
                danger += 1;
            } else {
                clear += 1;
            }
        }

        match (danger, clear) {
            (0, 0) => self.unknown_risk,
            (0, _) => CLEAR_EVIDENCE_RISK,
            (_, 0) => DANGER_EVIDENCE_RISK,
            (d, c) if d > c => DANGER_MAJORITY_RISK,
            _ => MIXED_EVIDENCE_RISK,
        }
    }

    fn has_danger_percept(&self, cell: Cell) -> bool {
        self.kb.has_fact(&Literal::at(Predicate::Breeze, cell))
            || (!self.state.wumpus_killed
                && self.kb.has_fact(&Literal::at(Predicate::Stench, cell)))
    }
}

impl RiskField for RiskModel<'_> {
    fn risk(&self, cell: Cell) -> f32 {
        self.position_risk(cell)
    }

    fn is_dangerous(&self, cell: Cell) -> bool {
        self.state.dangerous.contains(&cell)
    }
}

/// Unvisited in-bounds neighbours of `cell`, in N, E, S, W order.
pub fn frontier(state: &AgentState, cell: Cell, width: u32, height: u32) -> Vec<Cell> {
    cell.neighbors()
        .into_iter()
        .filter(|n| in_grid(*n, width, height) && !state.is_visited(*n))
        .collect()
}

pub(crate) fn in_grid(cell: Cell, width: u32, height: u32) -> bool {
    cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < width && (cell.y as u32) < height
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Literal {
        s.parse().unwrap()
    }

    /// Mark `cell` visited with the given percepts. Only the positive percepts go into the
    /// knowledge base so no neighbour gets proven safe.
    fn visit(state: &mut AgentState, kb: &mut KnowledgeBase, cell: Cell, stench: bool, breeze: bool) {
        if stench {
            kb.add_fact(Literal::at(Predicate::Stench, cell));
        }
        if breeze {
            kb.add_fact(Literal::at(Predicate::Breeze, cell));
        }
        state.visited.insert(cell);
    }

    #[test]
    fn no_evidence_uses_unknown_risk() {
        let state = AgentState::new();
        let kb = KnowledgeBase::empty();
        let model = RiskModel::new(&state, &kb, 0.7);
        assert_eq!(model.position_risk(Cell::new(3, 3)), 0.7);
        assert_eq!(model.position_risk(Cell::ORIGIN), 0.0);
    }

    #[test]
    fn evidence_buckets() {
        let mut state = AgentState::new();
        let mut kb = KnowledgeBase::empty().with_bounds(4, 4);
        visit(&mut state, &mut kb, Cell::new(1, 0), false, true);
        visit(&mut state, &mut kb, Cell::new(0, 1), false, true);
        visit(&mut state, &mut kb, Cell::new(2, 1), false, false);
        visit(&mut state, &mut kb, Cell::new(3, 0), false, false);

        let model = RiskModel::new(&state, &kb, 0.7);
        // (1,1): two breezy, one clear.
        assert_eq!(model.position_risk(Cell::new(1, 1)), DANGER_MAJORITY_RISK);
        // (2,0): one breezy, two clear.
        assert_eq!(model.position_risk(Cell::new(2, 0)), MIXED_EVIDENCE_RISK);
        // (0,2): only (0,1), breezy.
        assert_eq!(model.position_risk(Cell::new(0, 2)), DANGER_EVIDENCE_RISK);
        // (3,2): no visited neighbour.
        assert_eq!(model.position_risk(Cell::new(3, 2)), 0.7);
        assert_eq!(model.position_risk(Cell::new(2, 2)), CLEAR_EVIDENCE_RISK);
    }

    #[test]
    fn stench_stops_counting_once_the_wumpus_is_dead() {
        let mut state = AgentState::new();
        let mut kb = KnowledgeBase::empty().with_bounds(3, 3);
        visit(&mut state, &mut kb, Cell::new(1, 0), true, false);

        let cell = Cell::new(2, 0);
        assert_eq!(RiskModel::new(&state, &kb, 0.7).position_risk(cell), DANGER_EVIDENCE_RISK);
        state.wumpus_killed = true;
        assert_eq!(RiskModel::new(&state, &kb, 0.7).position_risk(cell), CLEAR_EVIDENCE_RISK);
    }

    #[test]
    fn known_threats_are_certain() {
        let mut state = AgentState::new();
        let mut kb = KnowledgeBase::empty();
        kb.add_fact(lit("Pit(2,2)"));
        kb.add_fact(lit("Wumpus(1,2)"));
        state.dangerous.insert(Cell::new(0, 2));

        let model = RiskModel::new(&state, &kb, 0.7);
        assert_eq!(model.position_risk(Cell::new(2, 2)), 1.0);
        assert_eq!(model.position_risk(Cell::new(1, 2)), 1.0);
        assert_eq!(model.position_risk(Cell::new(0, 2)), 1.0);
        assert!(model.is_dangerous(Cell::new(0, 2)));
        assert!(!model.is_dangerous(Cell::new(2, 2)));
    }

    #[test]
    fn frontier_skips_visited_and_out_of_grid() {
        let mut state = AgentState::new();
        state.visited.insert(Cell::new(1, 0));
        assert_eq!(frontier(&state, Cell::ORIGIN, 3, 3), vec![Cell::new(0, 1)]);
        assert_eq!(
            frontier(&state, Cell::new(1, 0), 3, 3),
            vec![Cell::new(2, 0), Cell::new(1, 1)]
        );
    }
}
