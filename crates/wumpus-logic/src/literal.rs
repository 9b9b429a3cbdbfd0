//! Ground literals over grid cells.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use wumpus_core::Cell;

use crate::LogicError;

/// Predicate symbol of a literal.
///
/// The named variants are the vocabulary the agent and the percept axioms speak; anything else
/// parses into [`Predicate::Custom`] so free-form rules keep working.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Predicate {
    // Percepts
    Stench,
    Breeze,
    Glitter,
    Bump,
    Scream,

    // World state
    Wumpus,
    Pit,
    Gold,
    WumpusDead,

    // Agent bookkeeping
    Safe,
    Visited,

    // Hypotheses
    PossibleWumpus,
    PossiblePit,
    SafeFromWumpus,
    SafeFromPit,
    WumpusNearby,
    PitNearby,

    Custom(String),
}

impl Predicate {
    pub fn name(&self) -> &str {
        match self {
            Self::Stench => "Stench",
            Self::Breeze => "Breeze",
            Self::Glitter => "Glitter",
            Self::Bump => "Bump",
            Self::Scream => "Scream",
            Self::Wumpus => "Wumpus",
            Self::Pit => "Pit",
            Self::Gold => "Gold",
            Self::WumpusDead => "WumpusDead",
            Self::Safe => "Safe",
            Self::Visited => "Visited",
            Self::PossibleWumpus => "PossibleWumpus",
            Self::PossiblePit => "PossiblePit",
            Self::SafeFromWumpus => "SafeFromWumpus",
            Self::SafeFromPit => "SafeFromPit",
            Self::WumpusNearby => "WumpusNearby",
            Self::PitNearby => "PitNearby",
            Self::Custom(name) => name,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "Stench" => Self::Stench,
            "Breeze" => Self::Breeze,
            "Glitter" => Self::Glitter,
            "Bump" => Self::Bump,
            "Scream" => Self::Scream,
            "Wumpus" => Self::Wumpus,
            "Pit" => Self::Pit,
            "Gold" => Self::Gold,
            "WumpusDead" => Self::WumpusDead,
            "Safe" => Self::Safe,
            "Visited" => Self::Visited,
            "PossibleWumpus" => Self::PossibleWumpus,
            "PossiblePit" => Self::PossiblePit,
            "SafeFromWumpus" => Self::SafeFromWumpus,
            "SafeFromPit" => Self::SafeFromPit,
            "WumpusNearby" => Self::WumpusNearby,
            "PitNearby" => Self::PitNearby,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An atomic proposition about at most one cell, possibly negated.
///
/// Text form is `Name(x,y)`, `~Name(x,y)`, or a bare `Name` for cell-less atoms.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Literal {
    pub predicate: Predicate,
    pub negated: bool,
    pub cell: Option<Cell>,
}

impl Literal {
    pub fn at(predicate: Predicate, cell: Cell) -> Self {
        Self {
            predicate,
            negated: false,
            cell: Some(cell),
        }
    }

    pub fn nullary(predicate: Predicate) -> Self {
        Self {
            predicate,
            negated: false,
            cell: None,
        }
    }

    /// Free propositional atom, e.g. `A`.
    pub fn atom(name: &str) -> Self {
        Self::nullary(Predicate::from_name(name))
    }

    pub fn negate(&self) -> Self {
        Self {
            negated: !self.negated,
            ..self.clone()
        }
    }

    pub fn negative(self) -> Self {
        Self {
            negated: true,
            ..self
        }
    }

    pub fn is_positive(&self) -> bool {
        !self.negated
    }

    /// Same predicate and cell, opposite polarity.
    pub fn is_complementary(&self, other: &Literal) -> bool {
        self.negated != other.negated && self.predicate == other.predicate && self.cell == other.cell
    }

    pub fn is(&self, predicate: &Predicate, negated: bool) -> bool {
        &self.predicate == predicate && self.negated == negated
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("~")?;
        }
        match self.cell {
            Some(c) => write!(f, "{}({},{})", self.predicate, c.x, c.y),
            None => write!(f, "{}", self.predicate),
        }
    }
}

fn malformed(text: &str, reason: &'static str) -> LogicError {
    LogicError::MalformedLiteral {
        text: text.to_string(),
        reason,
    }
}

/// Split `~Name(args)` into polarity, name and the raw argument text.
pub(crate) fn split_literal(text: &str) -> crate::Result<(bool, &str, Option<&str>)> {
    let trimmed = text.trim();
    let (negated, body) = match trimmed
        .strip_prefix('~')
        .or_else(|| trimmed.strip_prefix('¬'))
    {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };

    let (name, args) = match body.find('(') {
        Some(open) => {
            let args = body[open + 1..]
                .strip_suffix(')')
                .ok_or_else(|| malformed(text, "unterminated argument list"))?;
            (body[..open].trim(), Some(args))
        }
        None => (body, None),
    };

    if name.is_empty() {
        return Err(malformed(text, "empty predicate name"));
    }
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(malformed(text, "predicate name must be alphanumeric"));
    }
    Ok((negated, name, args))
}

pub(crate) fn parse_cell(text: &str, args: &str) -> crate::Result<Cell> {
    let mut parts = args.split(',');
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed(text, "expected two coordinates"));
    };
    let x = x
        .trim()
        .parse::<i32>()
        .map_err(|_| malformed(text, "non-numeric coordinate"))?;
    let y = y
        .trim()
        .parse::<i32>()
        .map_err(|_| malformed(text, "non-numeric coordinate"))?;
    Ok(Cell::new(x, y))
}

impl FromStr for Literal {
    type Err = LogicError;

    fn from_str(s: &str) -> crate::Result<Self> {
        let (negated, name, args) = split_literal(s)?;
        let cell = args.map(|a| parse_cell(s, a)).transpose()?;
        Ok(Self {
            predicate: Predicate::from_name(name),
            negated,
            cell,
        })
    }
}

impl TryFrom<String> for Literal {
    type Error = LogicError;

    fn try_from(value: String) -> crate::Result<Self> {
        value.parse()
    }
}

impl From<Literal> for String {
    fn from(value: Literal) -> Self {
        value.to_string()
    }
}
