//! Forward chaining to a fixpoint.
//!
//! Each new literal is pushed through two stages: the built-in percept axioms, which reason
//! about the neighbours of the literal's cell, and the textual rules, whose premises are matched
//! by predicate name alone against the triggering literal. The match ignores polarity, so
//! `~Stench(c)` fires `Stench(x,y) => WumpusNearby(x,y)` as well.

use std::collections::{BTreeSet, VecDeque};

use wumpus_core::Cell;

use crate::{KnowledgeBase, Literal, Predicate, OBSERVED_CONFIDENCE};

/// Confidence for a threat that is possible but not located.
pub const POSSIBLE_CONFIDENCE: u8 = 70;
/// Confidence for a threat ruled out by a missing percept.
pub const RULED_OUT_CONFIDENCE: u8 = 90;
/// Confidence for a neighbour of a visited cell with no stench and no breeze.
pub const CLEAR_NEIGHBOUR_CONFIDENCE: u8 = 95;
/// Floor for rule-derived confidence.
pub const RULE_CONFIDENCE_FLOOR: u8 = 50;

impl KnowledgeBase {
    /// Run inference from `seed` until nothing new is derived. Returns the number of derived
    /// literals.
    pub(crate) fn forward_chain(&mut self, seed: Literal) -> usize {
        let mut queue = VecDeque::from([seed]);
        let mut processed: BTreeSet<Literal> = BTreeSet::new();
        let mut derived = 0usize;

        while let Some(trigger) = queue.pop_front() {
            if !processed.insert(trigger.clone()) {
                continue;
            }

            let mut consequences = self.domain_consequences(&trigger);
            consequences.extend(self.rule_consequences(&trigger));

            for (literal, confidence) in consequences {
                if self.store.derive(literal.clone(), confidence) {
                    tracing::debug!(%trigger, derived = %literal, confidence, "derived");
                    derived += 1;
                    queue.push_back(literal);
                }
            }
        }

        derived
    }

    /// Percept axioms keyed on the trigger's predicate.
    fn domain_consequences(&self, trigger: &Literal) -> Vec<(Literal, u8)> {
        let Some(cell) = trigger.cell else {
            return Vec::new();
        };

        let mut out = Vec::new();
        match (&trigger.predicate, trigger.negated) {
            (Predicate::Stench, false) => {
                for n in self.open_neighbours(cell) {
                    self.push_new(
                        &mut out,
                        Literal::at(Predicate::PossibleWumpus, n),
                        POSSIBLE_CONFIDENCE,
                    );
                }
            }
            (Predicate::Breeze, false) => {
                for n in self.open_neighbours(cell) {
                    self.push_new(
                        &mut out,
                        Literal::at(Predicate::PossiblePit, n),
                        POSSIBLE_CONFIDENCE,
                    );
                }
            }
            (Predicate::Stench, true) => {
                for n in self.open_neighbours(cell) {
                    self.push_new(
                        &mut out,
                        Literal::at(Predicate::Wumpus, n).negative(),
                        RULED_OUT_CONFIDENCE,
                    );
                    self.push_new(
                        &mut out,
                        Literal::at(Predicate::SafeFromWumpus, n),
                        RULED_OUT_CONFIDENCE,
                    );
                }
            }
            (Predicate::Breeze, true) => {
                for n in self.open_neighbours(cell) {
                    self.push_new(
                        &mut out,
                        Literal::at(Predicate::Pit, n).negative(),
                        RULED_OUT_CONFIDENCE,
                    );
                    self.push_new(
                        &mut out,
                        Literal::at(Predicate::SafeFromPit, n),
                        RULED_OUT_CONFIDENCE,
                    );
                }
            }
            _ => {}
        }

        // A visited cell with neither percept clears its neighbours, whichever of the three
        // facts arrives last.
        let completes_clear_cell = matches!(
            (&trigger.predicate, trigger.negated),
            (Predicate::Visited, false) | (Predicate::Stench, true) | (Predicate::Breeze, true)
        );
        if completes_clear_cell && self.is_clear_visited(cell) {
            for n in self.open_neighbours(cell) {
                self.push_new(
                    &mut out,
                    Literal::at(Predicate::Safe, n),
                    CLEAR_NEIGHBOUR_CONFIDENCE,
                );
            }
        }
        out
    }

    fn is_clear_visited(&self, cell: Cell) -> bool {
        [
            Literal::at(Predicate::Visited, cell),
            Literal::at(Predicate::Stench, cell).negative(),
            Literal::at(Predicate::Breeze, cell).negative(),
        ]
        .iter()
        .all(|l| self.store.contains(l))
    }

    /// Conclusions of every implication whose premises hold for `trigger`.
    fn rule_consequences(&self, trigger: &Literal) -> Vec<(Literal, u8)> {
        let confidence = self
            .store
            .confidence(trigger)
            .unwrap_or(OBSERVED_CONFIDENCE)
            .saturating_sub(10)
            .max(RULE_CONFIDENCE_FLOOR);

        let mut out = Vec::new();
        for rule in &self.rules {
            let Some((premises, conclusion)) = rule.implication() else {
                continue;
            };
            let satisfied = premises.iter().all(|p| {
                p.matches(trigger)
                    || p
                        .instantiate(trigger.cell)
                        .is_some_and(|l| self.store.contains(&l))
            });
            if !satisfied {
                continue;
            }
            // A pattern conclusion needs a cell to bind to.
            let Some(literal) = conclusion.instantiate(trigger.cell) else {
                continue;
            };
            tracing::trace!(rule = rule.text(), %trigger, "rule fired");
            self.push_new(&mut out, literal, confidence);
        }
        out
    }

    /// In-bounds neighbours of `cell` not already known safe.
    fn open_neighbours(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        cell.neighbors().into_iter().filter(move |n| {
            self.in_bounds(*n) && !self.store.contains(&Literal::at(Predicate::Safe, *n))
        })
    }

    fn push_new(&self, out: &mut Vec<(Literal, u8)>, literal: Literal, confidence: u8) {
        if !self.store.contains(&literal) {
            out.push((literal, confidence));
        }
    }
}
