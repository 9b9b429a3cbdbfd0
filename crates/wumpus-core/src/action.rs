use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Direction;

/// Local sensor reading at the agent's cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Percept {
    pub stench: bool,
    pub breeze: bool,
    pub glitter: bool,
    pub bump: bool,
    pub scream: bool,
}

impl Percept {
    pub fn with_stench(mut self) -> Self {
        self.stench = true;
        self
    }

    pub fn with_breeze(mut self) -> Self {
        self.breeze = true;
        self
    }

    pub fn with_glitter(mut self) -> Self {
        self.glitter = true;
        self
    }

    pub fn with_scream(mut self) -> Self {
        self.scream = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Action {
    MoveForward(Direction),
    Grab,
    Shoot(Direction),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::MoveForward(d) => write!(f, "move {d}"),
            Action::Grab => f.write_str("grab"),
            Action::Shoot(d) => write!(f, "shoot {d}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    pub bump: bool,
    pub scream: bool,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            bump: false,
            scream: false,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::ok(message)
        }
    }

    pub fn with_bump(mut self) -> Self {
        self.bump = true;
        self
    }

    pub fn with_scream(mut self) -> Self {
        self.scream = true;
        self
    }
}
