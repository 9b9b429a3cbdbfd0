use core::cmp::Ordering;
use std::collections::BinaryHeap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use wumpus_core::Cell;

use crate::RiskField;

/// Fixed-point scale for step costs.
const UNIT: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Extra cost per unit of risk when entering a cell.
    pub risk_weight: f32,
    /// Cells riskier than this are never entered unless they are the goal.
    pub max_risk: f32,
    /// Expansion budget; the search returns no path when exhausted.
    pub max_expansions: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            risk_weight: 5.0,
            max_risk: 0.7,
            max_expansions: 10_000,
        }
    }
}

#[derive(Debug)]
struct OpenNode {
    f: u32,
    g: u32,
    cell: Cell,
    tie: u64,
}

impl OpenNode {
    fn key(&self) -> (u32, u32, Cell, u64) {
        (self.f, self.g, self.cell, self.tie)
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.key().cmp(&self.key())
    }
}

/// A* over a `width x height` grid whose step costs come from a [`RiskField`].
#[derive(Debug, Clone)]
pub struct GridPlanner {
    width: i32,
    height: i32,
    config: PlannerConfig,
}

impl GridPlanner {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(width, height, PlannerConfig::default())
    }

    pub fn with_config(width: u32, height: u32, config: PlannerConfig) -> Self {
        Self {
            width: i32::try_from(width).unwrap_or(i32::MAX),
            height: i32::try_from(height).unwrap_or(i32::MAX),
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    fn idx(&self, cell: Cell) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        Some((cell.y as usize) * (self.width as usize) + cell.x as usize)
    }

    fn cell_from_idx(&self, idx: usize) -> Cell {
        let width = self.width as usize;
        Cell::new((idx % width) as i32, (idx / width) as i32)
    }

    fn heuristic(&self, a: Cell, b: Cell) -> u32 {
        a.manhattan(b).saturating_mul(UNIT)
    }

    fn step_cost(&self, risk: f32) -> u32 {
        let extra = (risk.clamp(0.0, 1.0) * self.config.risk_weight.max(0.0) * UNIT as f32).round();
        UNIT.saturating_add(extra as u32)
    }

    fn passable(&self, field: &impl RiskField, cell: Cell, goal: Cell) -> bool {
        cell == goal || !(field.is_dangerous(cell) || field.risk(cell) > self.config.max_risk)
    }

    /// Cheapest path from `start` to `goal`, excluding `start` and including `goal`.
    ///
    /// Empty when there is nothing to do or no admissible route: `start == goal`, an endpoint
    /// outside the grid, every route crossing a blocked cell, or the expansion budget running out.
    pub fn find_path(&self, field: &impl RiskField, start: Cell, goal: Cell) -> Vec<Cell> {
        if start == goal {
            return Vec::new();
        }
        let (Some(start_idx), Some(goal_idx)) = (self.idx(start), self.idx(goal)) else {
            return Vec::new();
        };

        let grid_len = (self.width as usize) * (self.height as usize);
        let mut g_score = vec![u32::MAX; grid_len];
        let mut came_from: Vec<Option<usize>> = vec![None; grid_len];
        let mut open = BinaryHeap::<OpenNode>::new();
        let mut tie: u64 = 0;
        let mut expansions = 0usize;

        g_score[start_idx] = 0;
        open.push(OpenNode {
            f: self.heuristic(start, goal),
            g: 0,
            cell: start,
            tie,
        });
        tie += 1;

        while let Some(node) = open.pop() {
            if node.cell == goal {
                return self.reconstruct_path(&came_from, goal_idx);
            }

            let Some(node_idx) = self.idx(node.cell) else {
                continue;
            };
            if node.g != g_score[node_idx] {
                // Stale heap entry.
                continue;
            }

            expansions += 1;
            if expansions > self.config.max_expansions {
                tracing::debug!(%start, %goal, expansions, "planner expansion budget exhausted");
                return Vec::new();
            }

            // Fixed order for determinism: N, E, S, W.
            for n in node.cell.neighbors() {
                let Some(n_idx) = self.idx(n) else { continue };
                if !self.passable(field, n, goal) {
                    continue;
                }

                let tentative_g = node.g.saturating_add(self.step_cost(field.risk(n)));
                if tentative_g >= g_score[n_idx] {
                    continue;
                }

                came_from[n_idx] = Some(node_idx);
                g_score[n_idx] = tentative_g;
                open.push(OpenNode {
                    f: tentative_g.saturating_add(self.heuristic(n, goal)),
                    g: tentative_g,
                    cell: n,
                    tie,
                });
                tie += 1;
            }
        }

        tracing::trace!(%start, %goal, "no admissible path");
        Vec::new()
    }

    fn reconstruct_path(&self, came_from: &[Option<usize>], mut current: usize) -> Vec<Cell> {
        let mut out = vec![self.cell_from_idx(current)];
        while let Some(prev) = came_from[current] {
            current = prev;
            out.push(self.cell_from_idx(current));
        }
        // Drop the start cell.
        out.pop();
        out.reverse();
        out
    }
}
