use crate::{Action, ActionResult, Cell, Percept};

/// The environment the agent acts in.
///
/// The reasoner only ever talks to the world through this trait; simulators, replays and test
/// fixtures all plug in here.
pub trait World {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn percept(&self, cell: Cell) -> Percept;

    fn perform_action(&mut self, action: Action, cell: Cell) -> ActionResult;

    fn is_game_over(&self) -> bool;

    fn is_valid_position(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as i64) < self.width() as i64 && (y as i64) < self.height() as i64
    }

    fn contains(&self, cell: Cell) -> bool {
        self.is_valid_position(cell.x, cell.y)
    }
}
