//! Ground resolution refutation.
//!
//! To show `KB ⊢ q` the refuter saturates `CNF(KB) ∪ {¬q}` with binary resolution and succeeds
//! when the empty clause appears:
//!
//! ```text
//!     C₁ ∨ L    C₂ ∨ ¬L
//!     ───────────────────
//!         C₁ ∨ C₂
//! ```
//!
//! Every round resolves the clauses produced by the previous round against the whole set, so each
//! pair is visited once. The loop is bounded by [`ResolutionLimits`].

use core::fmt;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::Literal;

/// A disjunction of literals. Equality and ordering are by literal-set content.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Clause {
    literals: BTreeSet<Literal>,
}

impl Clause {
    pub fn from_literals(literals: impl IntoIterator<Item = Literal>) -> Self {
        Self {
            literals: literals.into_iter().collect(),
        }
    }

    pub fn unit(literal: Literal) -> Self {
        Self::from_literals([literal])
    }

    /// The contradiction.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn contains(&self, literal: &Literal) -> bool {
        self.literals.contains(literal)
    }

    pub fn literals(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    /// Holds some literal together with its complement.
    pub fn is_tautology(&self) -> bool {
        self.literals
            .iter()
            .any(|l| l.is_positive() && self.literals.contains(&l.negate()))
    }

    /// Every resolvent of `self` and `other`, one per complementary pair.
    pub fn resolve(&self, other: &Clause) -> Vec<Clause> {
        self.literals
            .iter()
            .filter(|l| other.literals.contains(&l.negate()))
            .map(|l| {
                let complement = l.negate();
                Clause::from_literals(
                    self.literals
                        .iter()
                        .filter(|x| *x != l)
                        .chain(other.literals.iter().filter(|x| **x != complement))
                        .cloned(),
                )
            })
            .collect()
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.literals.is_empty() {
            return f.write_str("□");
        }
        let mut first = true;
        for lit in &self.literals {
            if !first {
                f.write_str(" | ")?;
            }
            write!(f, "{lit}")?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionLimits {
    /// Give up once the clause set reaches this size.
    pub max_clauses: usize,
    /// Give up after this many saturation rounds.
    pub max_rounds: usize,
}

impl Default for ResolutionLimits {
    fn default() -> Self {
        Self {
            max_clauses: 4096,
            max_rounds: 64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofOutcome {
    /// The empty clause was derived.
    Proved { steps: usize },
    /// Saturated without a contradiction.
    NotEntailed { clauses: usize },
    /// Search stopped at a limit before deciding.
    LimitReached { clauses: usize },
}

impl ProofOutcome {
    pub fn is_proved(&self) -> bool {
        matches!(self, Self::Proved { .. })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    limits: ResolutionLimits,
}

impl Resolver {
    pub fn new(limits: ResolutionLimits) -> Self {
        Self { limits }
    }

    /// Search for the empty clause in `clauses`.
    pub fn refute(&self, clauses: impl IntoIterator<Item = Clause>) -> ProofOutcome {
        let mut seen: BTreeSet<Clause> = BTreeSet::new();
        let mut all: Vec<Clause> = Vec::new();
        // literal -> indices into `all` of clauses containing it
        let mut index: BTreeMap<Literal, Vec<usize>> = BTreeMap::new();

        let mut frontier = Vec::new();
        for clause in clauses {
            if clause.is_empty() {
                return ProofOutcome::Proved { steps: 0 };
            }
            if clause.is_tautology() || !seen.insert(clause.clone()) {
                continue;
            }
            frontier.push(push_clause(clause, &mut all, &mut index));
        }

        let mut steps = 0usize;
        for round in 0..self.limits.max_rounds {
            let mut fresh: Vec<Clause> = Vec::new();

            for &i in &frontier {
                let clause = &all[i];
                let partners: BTreeSet<usize> = clause
                    .literals()
                    .filter_map(|l| index.get(&l.negate()))
                    .flatten()
                    .copied()
                    .collect();

                for j in partners {
                    for resolvent in clause.resolve(&all[j]) {
                        steps += 1;
                        if resolvent.is_empty() {
                            tracing::debug!(steps, round, "resolution derived the empty clause");
                            return ProofOutcome::Proved { steps };
                        }
                        if resolvent.is_tautology() || !seen.insert(resolvent.clone()) {
                            continue;
                        }
                        fresh.push(resolvent);
                        if seen.len() >= self.limits.max_clauses {
                            tracing::debug!(clauses = seen.len(), "resolution clause limit reached");
                            return ProofOutcome::LimitReached {
                                clauses: seen.len(),
                            };
                        }
                    }
                }
            }

            if fresh.is_empty() {
                return ProofOutcome::NotEntailed { clauses: all.len() };
            }

            frontier = fresh
                .into_iter()
                .map(|c| push_clause(c, &mut all, &mut index))
                .collect();
        }

        tracing::debug!(rounds = self.limits.max_rounds, "resolution round limit reached");
        ProofOutcome::LimitReached { clauses: all.len() }
    }
}

fn push_clause(
    clause: Clause,
    all: &mut Vec<Clause>,
    index: &mut BTreeMap<Literal, Vec<usize>>,
) -> usize {
    let idx = all.len();
    for lit in clause.literals() {
        index.entry(lit.clone()).or_default().push(idx);
    }
    all.push(clause);
    idx
}
