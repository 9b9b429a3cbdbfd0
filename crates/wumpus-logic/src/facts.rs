use std::collections::{BTreeMap, BTreeSet};

use wumpus_core::Cell;

use crate::Literal;

/// Confidence assigned to observed facts.
pub const OBSERVED_CONFIDENCE: u8 = 100;

/// Observed and derived literals with per-literal confidence.
///
/// A literal lives in at most one of the two sets; observing a derived literal promotes it.
#[derive(Debug, Clone, Default)]
pub struct FactStore {
    facts: BTreeSet<Literal>,
    derived: BTreeSet<Literal>,
    confidence: BTreeMap<Literal, u8>,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation. Returns `true` if it was not observed before.
    pub fn observe(&mut self, literal: Literal) -> bool {
        self.derived.remove(&literal);
        self.confidence.insert(literal.clone(), OBSERVED_CONFIDENCE);
        self.facts.insert(literal)
    }

    /// Record an inference. Returns `false` (and changes nothing) if the literal is already known.
    pub fn derive(&mut self, literal: Literal, confidence: u8) -> bool {
        if self.contains(&literal) {
            return false;
        }
        self.confidence
            .insert(literal.clone(), confidence.min(OBSERVED_CONFIDENCE));
        self.derived.insert(literal)
    }

    pub fn remove(&mut self, literal: &Literal) -> bool {
        let in_facts = self.facts.remove(literal);
        let in_derived = self.derived.remove(literal);
        self.confidence.remove(literal);
        in_facts || in_derived
    }

    pub fn contains(&self, literal: &Literal) -> bool {
        self.facts.contains(literal) || self.derived.contains(literal)
    }

    pub fn confidence(&self, literal: &Literal) -> Option<u8> {
        self.confidence.get(literal).copied()
    }

    pub fn facts(&self) -> &BTreeSet<Literal> {
        &self.facts
    }

    pub fn derived(&self) -> &BTreeSet<Literal> {
        &self.derived
    }

    pub fn confidences(&self) -> &BTreeMap<Literal, u8> {
        &self.confidence
    }

    /// Every known literal, observed first.
    pub fn known(&self) -> impl Iterator<Item = &Literal> {
        self.facts.iter().chain(self.derived.iter())
    }

    pub fn len(&self) -> usize {
        self.facts.len() + self.derived.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty() && self.derived.is_empty()
    }

    /// Cells mentioned by any known literal.
    pub fn cells(&self) -> BTreeSet<Cell> {
        self.known().filter_map(|l| l.cell).collect()
    }

    /// Positive literals whose negation is also held.
    pub fn contradictions(&self) -> Vec<Literal> {
        self.known()
            .filter(|l| l.is_positive() && self.contains(&l.negate()))
            .cloned()
            .collect()
    }
}
