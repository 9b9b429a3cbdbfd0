//! Implication rules parsed from `premise & premise => conclusion` text.
//!
//! Rule literals are patterns: besides ground coordinates they may use the variable pair
//! `(x,y)`, which is bound to the cell of the literal that triggered the rule. There is no
//! unification beyond that single binding.

use core::fmt;

use wumpus_core::Cell;

use crate::literal::{parse_cell, split_literal};
use crate::{Clause, Literal, LogicError, Predicate};

/// Percept axioms installed into every [`crate::KnowledgeBase::new`].
pub const DOMAIN_RULES: [&str; 7] = [
    "Stench(x,y) => WumpusNearby(x,y)",
    "Breeze(x,y) => PitNearby(x,y)",
    "Glitter(x,y) => Gold(x,y)",
    "Visited(x,y) => Safe(x,y)",
    "SafeFromWumpus(x,y) & SafeFromPit(x,y) => Safe(x,y)",
    "Safe(x,y) => ~Wumpus(x,y)",
    "Safe(x,y) => ~Pit(x,y)",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Args {
    Ground(Option<Cell>),
    /// `(x,y)`: takes the triggering literal's cell.
    Bound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub predicate: Predicate,
    pub negated: bool,
    pub args: Args,
}

impl Pattern {
    fn parse(text: &str) -> crate::Result<Self> {
        let (negated, name, args) = split_literal(text)?;
        let args = match args {
            None => Args::Ground(None),
            Some(raw) if is_variable_pair(raw) => Args::Bound,
            Some(raw) => Args::Ground(Some(parse_cell(text, raw)?)),
        };
        Ok(Self {
            predicate: Predicate::from_name(name),
            negated,
            args,
        })
    }

    pub fn is_schematic(&self) -> bool {
        matches!(self.args, Args::Bound)
    }

    /// Predicate-name match, ignoring polarity and arguments. `~Stench(c)` matches a
    /// `Stench(x,y)` premise.
    pub fn matches(&self, literal: &Literal) -> bool {
        literal.predicate == self.predicate
    }

    /// Ground this pattern; `None` when it needs a binding that is not available.
    pub fn instantiate(&self, binding: Option<Cell>) -> Option<Literal> {
        let cell = match self.args {
            Args::Ground(cell) => cell,
            Args::Bound => Some(binding?),
        };
        Some(Literal {
            predicate: self.predicate.clone(),
            negated: self.negated,
            cell,
        })
    }
}

fn is_variable_pair(raw: &str) -> bool {
    let mut parts = raw.split(',').map(str::trim);
    matches!((parts.next(), parts.next(), parts.next()), (Some("x"), Some("y"), None))
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.args {
            Args::Bound => {
                if self.negated {
                    f.write_str("~")?;
                }
                write!(f, "{}(x,y)", self.predicate)
            }
            Args::Ground(cell) => {
                let lit = Literal {
                    predicate: self.predicate.clone(),
                    negated: self.negated,
                    cell,
                };
                write!(f, "{lit}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    Implication {
        premises: Vec<Pattern>,
        conclusion: Pattern,
    },
    /// Free-form text that never fires.
    Annotation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    text: String,
    kind: RuleKind,
}

impl Rule {
    /// Parse rule text. Anything that is not a well-formed implication is kept as an annotation.
    pub fn parse(text: &str) -> Self {
        let kind = match Self::parse_implication(text) {
            Ok((premises, conclusion)) => RuleKind::Implication {
                premises,
                conclusion,
            },
            Err(err) => {
                tracing::debug!(rule = text, error = %err, "storing rule as annotation");
                RuleKind::Annotation
            }
        };
        Self {
            text: text.trim().to_string(),
            kind,
        }
    }

    fn parse_implication(text: &str) -> crate::Result<(Vec<Pattern>, Pattern)> {
        let (lhs, rhs) = text
            .split_once("=>")
            .ok_or_else(|| LogicError::MalformedRule(text.to_string()))?;
        if rhs.contains("=>") || lhs.trim().is_empty() {
            return Err(LogicError::MalformedRule(text.to_string()));
        }
        let premises = lhs
            .split('&')
            .map(Pattern::parse)
            .collect::<crate::Result<Vec<_>>>()?;
        let conclusion = Pattern::parse(rhs)?;
        Ok((premises, conclusion))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    pub fn is_annotation(&self) -> bool {
        matches!(self.kind, RuleKind::Annotation)
    }

    pub fn implication(&self) -> Option<(&[Pattern], &Pattern)> {
        match &self.kind {
            RuleKind::Implication {
                premises,
                conclusion,
            } => Some((premises, conclusion)),
            RuleKind::Annotation => None,
        }
    }

    pub fn is_schematic(&self) -> bool {
        self.implication().is_some_and(|(premises, conclusion)| {
            conclusion.is_schematic() || premises.iter().any(Pattern::is_schematic)
        })
    }

    /// CNF clause `~p1 | ... | ~pn | c` for one binding of `(x,y)`.
    pub fn clause(&self, binding: Option<Cell>) -> Option<Clause> {
        let (premises, conclusion) = self.implication()?;
        let mut literals = Vec::with_capacity(premises.len() + 1);
        for premise in premises {
            literals.push(premise.instantiate(binding)?.negate());
        }
        literals.push(conclusion.instantiate(binding)?);
        Some(Clause::from_literals(literals))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_rules_all_parse_as_implications() {
        for text in DOMAIN_RULES {
            let rule = Rule::parse(text);
            assert!(!rule.is_annotation(), "{text}");
            assert!(rule.is_schematic(), "{text}");
        }
    }

    #[test]
    fn text_without_arrow_is_an_annotation() {
        let rule = Rule::parse("If stench in adjacent cell, then wumpus nearby");
        assert!(rule.is_annotation());
        assert!(rule.implication().is_none());
        assert!(rule.clause(None).is_none());
    }

    #[test]
    fn unparseable_premise_is_an_annotation() {
        assert!(Rule::parse("Stench(a,b) => Wumpus(1,1)").is_annotation());
        assert!(Rule::parse(" => B").is_annotation());
        assert!(Rule::parse("A => B => C").is_annotation());
    }

    #[test]
    fn premise_matching_ignores_polarity_and_cell() {
        let rule = Rule::parse("Stench(x,y) => WumpusNearby(x,y)");
        let (premises, _) = rule.implication().unwrap();
        assert!(premises[0].matches(&Literal::at(Predicate::Stench, Cell::new(2, 1))));
        assert!(premises[0].matches(&Literal::at(Predicate::Stench, Cell::ORIGIN).negative()));
        assert!(!premises[0].matches(&Literal::at(Predicate::Breeze, Cell::ORIGIN)));
    }

    #[test]
    fn ground_rule_clause() {
        let rule = Rule::parse("A & B => C");
        assert!(!rule.is_schematic());
        let clause = rule.clause(None).unwrap();
        assert_eq!(clause.len(), 3);
        assert!(clause.contains(&Literal::atom("A").negate()));
        assert!(clause.contains(&Literal::atom("C")));
    }

    #[test]
    fn schematic_rule_needs_binding() {
        let rule = Rule::parse("Safe(x,y) => ~Pit(x,y)");
        assert!(rule.clause(None).is_none());
        let clause = rule.clause(Some(Cell::new(1, 2))).unwrap();
        assert!(clause.contains(&Literal::at(Predicate::Pit, Cell::new(1, 2)).negative()));
        assert_eq!(
            rule.implication().unwrap().1.to_string(),
            "~Pit(x,y)".to_string()
        );
    }
}
