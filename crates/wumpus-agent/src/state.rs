use std::collections::{BTreeMap, BTreeSet};

use wumpus_core::{Cell, Direction};

/// What the agent carries between turns, apart from its knowledge base.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    pub position: Cell,
    pub direction: Direction,
    pub has_gold: bool,
    pub has_arrow: bool,
    pub wumpus_killed: bool,
    pub visited: BTreeSet<Cell>,
    pub safe: BTreeSet<Cell>,
    pub dangerous: BTreeSet<Cell>,
    /// Risk of the current frontier, refreshed every turn.
    pub risk_assessment: BTreeMap<Cell, f32>,
    pub move_count: u64,
}

impl Default for AgentState {
    fn default() -> Self {
        Self {
            position: Cell::ORIGIN,
            direction: Direction::East,
            has_gold: false,
            has_arrow: true,
            wumpus_killed: false,
            visited: BTreeSet::from([Cell::ORIGIN]),
            safe: BTreeSet::from([Cell::ORIGIN]),
            dangerous: BTreeSet::new(),
            risk_assessment: BTreeMap::new(),
            move_count: 0,
        }
    }
}

impl AgentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start somewhere other than the origin; used for synthetic scenarios.
    pub fn at(position: Cell) -> Self {
        let mut state = Self::default();
        state.position = position;
        state.visited.insert(position);
        state.safe.insert(position);
        state
    }

    pub fn is_visited(&self, cell: Cell) -> bool {
        self.visited.contains(&cell)
    }
}
