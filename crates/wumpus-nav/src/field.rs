use std::collections::{BTreeSet, HashMap};

use wumpus_core::Cell;

/// Per-cell risk in `[0, 1]` plus a hard "never enter" set.
pub trait RiskField {
    fn risk(&self, cell: Cell) -> f32;

    fn is_dangerous(&self, _cell: Cell) -> bool {
        false
    }
}

/// Explicit risk table with a fallback for cells that were never assessed.
#[derive(Debug, Clone, Default)]
pub struct RiskMap {
    default_risk: f32,
    risk: HashMap<Cell, f32>,
    dangerous: BTreeSet<Cell>,
}

impl RiskMap {
    pub fn new(default_risk: f32) -> Self {
        Self {
            default_risk: default_risk.clamp(0.0, 1.0),
            ..Self::default()
        }
    }

    pub fn set_risk(&mut self, cell: Cell, risk: f32) {
        self.risk.insert(cell, risk.clamp(0.0, 1.0));
    }

    pub fn with_risk(mut self, cell: Cell, risk: f32) -> Self {
        self.set_risk(cell, risk);
        self
    }

    pub fn mark_dangerous(&mut self, cell: Cell) {
        self.dangerous.insert(cell);
    }

    pub fn with_dangerous(mut self, cell: Cell) -> Self {
        self.mark_dangerous(cell);
        self
    }

    pub fn default_risk(&self) -> f32 {
        self.default_risk
    }
}

impl RiskField for RiskMap {
    fn risk(&self, cell: Cell) -> f32 {
        self.risk.get(&cell).copied().unwrap_or(self.default_risk)
    }

    fn is_dangerous(&self, cell: Cell) -> bool {
        self.dangerous.contains(&cell)
    }
}

impl<F: RiskField + ?Sized> RiskField for &F {
    fn risk(&self, cell: Cell) -> f32 {
        (**self).risk(cell)
    }

    fn is_dangerous(&self, cell: Cell) -> bool {
        (**self).is_dangerous(cell)
    }
}
