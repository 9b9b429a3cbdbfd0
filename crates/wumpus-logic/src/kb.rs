use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wumpus_core::Cell;

use crate::{
    Clause, FactStore, Literal, ProofOutcome, ResolutionLimits, Resolver, Rule, DOMAIN_RULES,
};

/// Facts, rules and the two inference procedures over them.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    pub(crate) store: FactStore,
    pub(crate) rules: Vec<Rule>,
    /// `(width, height)`; neighbour inference stays inside `[0, width) x [0, height)`.
    bounds: Option<(i32, i32)>,
    limits: ResolutionLimits,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeBase {
    /// Knowledge base with the percept axioms in [`DOMAIN_RULES`] installed.
    pub fn new() -> Self {
        let mut kb = Self::empty();
        for text in DOMAIN_RULES {
            kb.add_rule(text);
        }
        kb
    }

    /// Knowledge base without any rules.
    pub fn empty() -> Self {
        Self {
            store: FactStore::new(),
            rules: Vec::new(),
            bounds: None,
            limits: ResolutionLimits::default(),
        }
    }

    pub fn with_bounds(mut self, width: u32, height: u32) -> Self {
        let clamp = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
        self.bounds = Some((clamp(width), clamp(height)));
        self
    }

    pub fn with_limits(mut self, limits: ResolutionLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> ResolutionLimits {
        self.limits
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        match self.bounds {
            Some((w, h)) => cell.x >= 0 && cell.y >= 0 && cell.x < w && cell.y < h,
            None => true,
        }
    }

    /// Assert an observed fact and run inference to a fixpoint.
    pub fn add_fact(&mut self, literal: Literal) {
        tracing::trace!(%literal, "observe");
        self.store.observe(literal.clone());
        let derived = self.forward_chain(literal);
        if derived > 0 {
            tracing::debug!(derived, facts = self.store.len(), "forward chaining finished");
        }
        self.check_consistency();
    }

    pub fn has_fact(&self, literal: &Literal) -> bool {
        self.store.contains(literal)
    }

    /// Retract a literal from both the observed and derived sets.
    pub fn remove_fact(&mut self, literal: &Literal) -> bool {
        self.store.remove(literal)
    }

    /// Install a rule. Text that does not parse as an implication is kept as an annotation.
    pub fn add_rule(&mut self, text: &str) {
        self.rules.push(Rule::parse(text));
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn confidence(&self, literal: &Literal) -> Option<u8> {
        self.store.confidence(literal)
    }

    pub fn facts(&self) -> impl Iterator<Item = &Literal> {
        self.store.facts().iter()
    }

    pub fn derived_facts(&self) -> impl Iterator<Item = &Literal> {
        self.store.derived().iter()
    }

    pub fn store(&self) -> &FactStore {
        &self.store
    }

    pub fn contradictions(&self) -> Vec<Literal> {
        self.store.contradictions()
    }

    /// Log every contradiction currently held. Nothing is retracted.
    pub fn check_consistency(&self) -> Vec<Literal> {
        let contradictions = self.store.contradictions();
        for literal in &contradictions {
            tracing::warn!(%literal, "knowledge base holds a literal and its negation");
        }
        contradictions
    }

    /// Whether `query` is known or entailed. A search that hits its limits answers `false`.
    pub fn query(&self, query: &Literal) -> bool {
        self.prove(query).is_proved()
    }

    pub fn prove(&self, query: &Literal) -> ProofOutcome {
        if self.store.contains(query) {
            return ProofOutcome::Proved { steps: 0 };
        }

        let outcome = Resolver::new(self.limits).refute(self.refutation_clauses(query));
        tracing::debug!(%query, ?outcome, "resolution query");
        outcome
    }

    /// `CNF(KB) ∪ {¬query}`.
    fn refutation_clauses(&self, query: &Literal) -> Vec<Clause> {
        let mut clauses: Vec<Clause> = self.store.known().cloned().map(Clause::unit).collect();

        let mut cells = self.store.cells();
        if let Some(cell) = query.cell {
            cells.insert(cell);
        }
        for rule in &self.rules {
            if rule.is_schematic() {
                clauses.extend(cells.iter().filter_map(|c| rule.clause(Some(*c))));
            } else if let Some(clause) = rule.clause(None) {
                clauses.push(clause);
            }
        }

        clauses.push(Clause::unit(query.negate()));
        clauses
    }

    pub fn snapshot(&self) -> KnowledgeSnapshot {
        KnowledgeSnapshot {
            facts: self.store.facts().iter().cloned().collect(),
            derived_facts: self.store.derived().iter().cloned().collect(),
            confidence: self
                .store
                .confidences()
                .iter()
                .map(|(l, c)| (l.to_string(), *c))
                .collect(),
            rules: self.rules.iter().map(|r| r.text().to_string()).collect(),
            contradictions: self.store.contradictions(),
        }
    }
}

/// Sorted, serializable view of a [`KnowledgeBase`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeSnapshot {
    pub facts: Vec<Literal>,
    pub derived_facts: Vec<Literal>,
    pub confidence: BTreeMap<String, u8>,
    pub rules: Vec<String>,
    pub contradictions: Vec<Literal>,
}
