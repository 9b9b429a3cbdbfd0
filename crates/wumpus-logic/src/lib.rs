//! # wumpus-logic
//!
//! Propositional knowledge base for a grid-exploring agent.
//!
//! Facts are ground [`Literal`]s such as `Stench(2,3)` or `~Breeze(0,0)`, each carrying a
//! confidence in `[0, 100]`. Adding a fact runs a forward-chaining fixpoint that applies the
//! built-in percept axioms and the textual [`Rule`]s; [`KnowledgeBase::query`] falls back to
//! resolution refutation over the CNF of the whole base when a literal is not known outright.
//!
//! ## Example
//!
//! ```rust
//! use wumpus_logic::{KnowledgeBase, Literal};
//!
//! let mut kb = KnowledgeBase::empty();
//! kb.add_fact(Literal::atom("A"));
//! kb.add_rule("A => B");
//!
//! assert!(kb.query(&Literal::atom("B")));
//! assert!(!kb.query(&Literal::atom("C")));
//! ```

#![forbid(unsafe_code)]

pub mod facts;
pub mod inference;
pub mod kb;
pub mod literal;
pub mod resolution;
pub mod rule;

pub use facts::{FactStore, OBSERVED_CONFIDENCE};
pub use kb::{KnowledgeBase, KnowledgeSnapshot};
pub use literal::{Literal, Predicate};
pub use resolution::{Clause, ProofOutcome, ResolutionLimits, Resolver};
pub use rule::{Args, Pattern, Rule, DOMAIN_RULES};

use thiserror::Error;

/// Errors raised at the text boundary of the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogicError {
    #[error("malformed literal `{text}`: {reason}")]
    MalformedLiteral { text: String, reason: &'static str },

    #[error("malformed rule `{0}`: expected `premise & ... => conclusion`")]
    MalformedRule(String),
}

pub type Result<T> = std::result::Result<T, LogicError>;
