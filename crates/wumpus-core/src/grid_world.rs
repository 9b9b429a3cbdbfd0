//! Reference simulator for the [`World`] trait.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use thiserror::Error;

use crate::{Action, ActionResult, Cell, Direction, Percept, World};

/// Largest grid, in cells, a [`GridWorld`] will allocate.
pub const MAX_CELLS: usize = 1 << 20;

const DEATH_PENALTY: i64 = 1000;
const GOLD_REWARD: i64 = 1000;
const MOVE_COST: i64 = 1;
const ARROW_COST: i64 = 10;

/// Hazard and gold placement for a [`GridWorld`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldLayout {
    pub width: u32,
    pub height: u32,
    pub wumpus: Vec<Cell>,
    pub pits: Vec<Cell>,
    pub gold: Vec<Cell>,
}

/// Grid sizes a [`GridWorld`] refuses to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("grid must be non-empty, got {width}x{height}")]
    Empty { width: u32, height: u32 },

    #[error("grid {width}x{height} exceeds the {max} cell limit", max = MAX_CELLS)]
    TooLarge { width: u32, height: u32 },
}

/// Cell count of a `width x height` grid, if it can be built.
pub fn grid_area(width: u32, height: u32) -> Result<usize, WorldError> {
    if width == 0 || height == 0 {
        return Err(WorldError::Empty { width, height });
    }
    let too_large = WorldError::TooLarge { width, height };
    let w = i32::try_from(width).map_err(|_| too_large)?;
    let h = i32::try_from(height).map_err(|_| too_large)?;
    match w.checked_mul(h) {
        Some(area) if area as usize <= MAX_CELLS => Ok(area as usize),
        _ => Err(too_large),
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Contents {
    wumpus: bool,
    pit: bool,
    gold: bool,
}

#[derive(Debug, Clone)]
pub struct GridWorld {
    width: i32,
    height: i32,
    contents: Vec<Contents>,
    agent: Cell,
    agent_alive: bool,
    has_arrow: bool,
    has_gold: bool,
    score: i64,
    message: String,
}

impl GridWorld {
    /// # Panics
    ///
    /// When [`grid_area`] rejects the size. Use [`GridWorld::try_new`] for untrusted input.
    pub fn new(width: u32, height: u32) -> Self {
        match Self::try_new(width, height) {
            Ok(world) => world,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_new(width: u32, height: u32) -> Result<Self, WorldError> {
        let area = grid_area(width, height)?;
        Ok(Self {
            width: width as i32,
            height: height as i32,
            contents: vec![Contents::default(); area],
            agent: Cell::ORIGIN,
            agent_alive: true,
            has_arrow: true,
            has_gold: false,
            score: 0,
            message: "Game started".to_string(),
        })
    }

    /// Build a world from a layout; placements outside the grid or on the origin are ignored.
    pub fn from_layout(layout: &WorldLayout) -> Result<Self, WorldError> {
        let mut world = Self::try_new(layout.width, layout.height)?;
        for &cell in &layout.wumpus {
            world.place(cell, |c| c.wumpus = true);
        }
        for &cell in &layout.pits {
            world.place(cell, |c| c.pit = true);
        }
        for &cell in &layout.gold {
            world.place(cell, |c| c.gold = true);
        }
        Ok(world)
    }

    pub fn with_wumpus(mut self, cell: Cell) -> Self {
        self.place(cell, |c| c.wumpus = true);
        self
    }

    pub fn with_pit(mut self, cell: Cell) -> Self {
        self.place(cell, |c| c.pit = true);
        self
    }

    pub fn with_gold(mut self, cell: Cell) -> Self {
        self.place(cell, |c| c.gold = true);
        self
    }

    pub fn agent_position(&self) -> Cell {
        self.agent
    }

    pub fn is_agent_alive(&self) -> bool {
        self.agent_alive
    }

    pub fn has_gold(&self) -> bool {
        self.has_gold
    }

    pub fn has_arrow(&self) -> bool {
        self.has_arrow
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn has_wumpus(&self, cell: Cell) -> bool {
        self.get(cell).is_some_and(|c| c.wumpus)
    }

    pub fn has_pit(&self, cell: Cell) -> bool {
        self.get(cell).is_some_and(|c| c.pit)
    }

    pub fn has_gold_at(&self, cell: Cell) -> bool {
        self.get(cell).is_some_and(|c| c.gold)
    }

    fn place(&mut self, cell: Cell, f: impl FnOnce(&mut Contents)) {
        if cell == Cell::ORIGIN {
            return;
        }
        if let Some(idx) = self.idx(cell) {
            f(&mut self.contents[idx]);
        }
    }

    fn idx(&self, cell: Cell) -> Option<usize> {
        if !self.is_valid_position(cell.x, cell.y) {
            return None;
        }
        Some((cell.y * self.width + cell.x) as usize)
    }

    fn get(&self, cell: Cell) -> Option<&Contents> {
        self.idx(cell).map(|idx| &self.contents[idx])
    }

    fn any_neighbor(&self, cell: Cell, pred: impl Fn(&Contents) -> bool) -> bool {
        cell.neighbors()
            .into_iter()
            .filter_map(|n| self.get(n))
            .any(pred)
    }

    fn move_agent(&mut self, direction: Direction, from: Cell) -> ActionResult {
        let to = from.step(direction);
        if !self.contains(to) {
            return ActionResult::failed("Bump! Hit the wall").with_bump();
        }

        self.agent = to;
        let Some(contents) = self.get(to).copied() else {
            return ActionResult::failed("Bump! Hit the wall").with_bump();
        };

        if contents.pit {
            self.agent_alive = false;
            self.score -= DEATH_PENALTY;
            self.message = "Agent fell into a pit! Game Over!".to_string();
            tracing::info!(cell = %to, "agent fell into a pit");
            return ActionResult::failed("Fell into pit");
        }

        if contents.wumpus {
            self.agent_alive = false;
            self.score -= DEATH_PENALTY;
            self.message = "Agent eaten by Wumpus! Game Over!".to_string();
            tracing::info!(cell = %to, "agent eaten by the wumpus");
            return ActionResult::failed("Eaten by Wumpus");
        }

        self.score -= MOVE_COST;
        ActionResult::ok("Moved successfully")
    }

    fn shoot(&mut self, direction: Direction, from: Cell) -> ActionResult {
        if !self.has_arrow {
            return ActionResult::failed("No arrow left");
        }
        self.has_arrow = false;
        self.score -= ARROW_COST;

        let mut arrow = from.step(direction);
        while let Some(idx) = self.idx(arrow) {
            if self.contents[idx].wumpus {
                self.contents[idx].wumpus = false;
                self.message = "Wumpus killed! Scream heard!".to_string();
                tracing::info!(cell = %arrow, "wumpus killed");
                return ActionResult::ok("Wumpus killed").with_scream();
            }
            arrow = arrow.step(direction);
        }

        ActionResult::ok("Arrow missed")
    }

    fn grab(&mut self, at: Cell) -> ActionResult {
        match self.idx(at) {
            Some(idx) if self.contents[idx].gold => {
                self.contents[idx].gold = false;
                self.has_gold = true;
                self.score += GOLD_REWARD;
                self.message = "Gold grabbed! +1000 points!".to_string();
                ActionResult::ok("Gold grabbed")
            }
            _ => ActionResult::failed("No gold here"),
        }
    }
}

impl World for GridWorld {
    fn width(&self) -> u32 {
        self.width as u32
    }

    fn height(&self) -> u32 {
        self.height as u32
    }

    fn percept(&self, cell: Cell) -> Percept {
        let Some(here) = self.get(cell) else {
            return Percept::default();
        };
        Percept {
            stench: self.any_neighbor(cell, |c| c.wumpus),
            breeze: self.any_neighbor(cell, |c| c.pit),
            glitter: here.gold,
            bump: false,
            scream: false,
        }
    }

    fn perform_action(&mut self, action: Action, cell: Cell) -> ActionResult {
        if !self.agent_alive {
            return ActionResult::failed("Agent is dead");
        }
        match action {
            Action::MoveForward(direction) => self.move_agent(direction, cell),
            Action::Shoot(direction) => self.shoot(direction, cell),
            Action::Grab => self.grab(cell),
        }
    }

    fn is_game_over(&self) -> bool {
        !self.agent_alive || (self.has_gold && self.agent == Cell::ORIGIN)
    }
}
