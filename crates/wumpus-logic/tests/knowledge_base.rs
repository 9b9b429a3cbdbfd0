use proptest::prelude::*;
use wumpus_core::Cell;
use wumpus_logic::{KnowledgeBase, Literal, Predicate, ProofOutcome, ResolutionLimits};

fn lit(text: &str) -> Literal {
    text.parse().expect("literal")
}

fn percept_literal() -> impl Strategy<Value = Literal> {
    let predicate = prop_oneof![
        Just(Predicate::Stench),
        Just(Predicate::Breeze),
        Just(Predicate::Glitter),
        Just(Predicate::Visited),
        Just(Predicate::Safe),
    ];
    (predicate, any::<bool>(), 0_i32..4, 0_i32..4).prop_map(|(predicate, negated, x, y)| {
        Literal {
            predicate,
            negated,
            cell: Some(Cell::new(x, y)),
        }
    })
}

#[test]
fn toy_knowledge_base_entails_by_resolution() {
    let mut kb = KnowledgeBase::empty();
    kb.add_fact(Literal::atom("A"));
    assert!(!kb.query(&Literal::atom("B")));

    kb.add_rule("A => B");
    assert!(kb.query(&Literal::atom("B")));
    assert!(matches!(
        kb.prove(&Literal::atom("B")),
        ProofOutcome::Proved { steps } if steps > 0
    ));
}

#[test]
fn breeze_at_origin_suspects_both_neighbours() {
    let mut kb = KnowledgeBase::new().with_bounds(3, 3);
    kb.add_fact(lit("Safe(0,0)"));
    kb.add_fact(lit("~Stench(0,0)"));
    kb.add_fact(lit("Breeze(0,0)"));
    kb.add_fact(lit("Visited(0,0)"));

    assert!(kb.has_fact(&lit("PossiblePit(1,0)")));
    assert!(kb.has_fact(&lit("PossiblePit(0,1)")));
    assert!(kb.has_fact(&lit("PitNearby(0,0)")));
    assert!(kb.has_fact(&lit("Safe(0,0)")));
    assert!(!kb.has_fact(&lit("Safe(1,0)")));
    assert!(kb.has_fact(&lit("~Wumpus(1,0)")));
    assert!(kb.contradictions().is_empty());
}

#[test]
fn remove_fact_retracts_derived_literal() {
    let mut kb = KnowledgeBase::new().with_bounds(3, 3);
    kb.add_fact(lit("Stench(1,1)"));
    let target = lit("PossibleWumpus(2,1)");
    assert!(kb.has_fact(&target));

    assert!(kb.remove_fact(&target));
    assert!(!kb.has_fact(&target));
    assert_eq!(kb.confidence(&target), None);
    assert!(!kb.snapshot().derived_facts.contains(&target));
}

#[test]
fn annotation_rules_are_listed_but_never_fire() {
    let mut kb = KnowledgeBase::empty();
    kb.add_rule("If stench in adjacent cell, then wumpus nearby");
    kb.add_fact(Literal::atom("Stench"));

    assert_eq!(kb.rules().len(), 1);
    assert!(kb.rules()[0].is_annotation());
    assert_eq!(kb.derived_facts().count(), 0);
    assert_eq!(
        kb.snapshot().rules,
        vec!["If stench in adjacent cell, then wumpus nearby".to_string()]
    );
}

#[test]
fn contradictions_are_reported_not_resolved() {
    let mut kb = KnowledgeBase::new().with_bounds(3, 3);
    kb.add_fact(lit("~Stench(0,0)"));
    kb.add_fact(lit("Wumpus(1,0)"));

    assert!(kb.has_fact(&lit("~Wumpus(1,0)")));
    assert!(kb.has_fact(&lit("Wumpus(1,0)")));
    assert_eq!(kb.check_consistency(), vec![lit("Wumpus(1,0)")]);
}

#[test]
fn resolution_limit_answers_false() {
    let mut kb = KnowledgeBase::empty().with_limits(ResolutionLimits {
        max_clauses: 4,
        max_rounds: 1,
    });
    kb.add_rule("A => B");
    kb.add_rule("B => C");
    kb.add_rule("C => D");
    kb.add_fact(Literal::atom("A"));

    assert!(matches!(
        kb.prove(&Literal::atom("D")),
        ProofOutcome::LimitReached { .. }
    ));
    assert!(!kb.query(&Literal::atom("D")));
}

proptest! {
    #[test]
    fn add_fact_is_idempotent(literals in prop::collection::vec(percept_literal(), 1..12)) {
        let mut once = KnowledgeBase::new().with_bounds(4, 4);
        for l in &literals {
            once.add_fact(l.clone());
        }
        let mut twice = once.clone();
        for l in &literals {
            twice.add_fact(l.clone());
        }
        prop_assert_eq!(once.snapshot(), twice.snapshot());
    }

    #[test]
    fn missing_stench_rules_out_every_neighbour(x in 0_i32..5, y in 0_i32..5) {
        let mut kb = KnowledgeBase::new().with_bounds(5, 5);
        let cell = Cell::new(x, y);
        kb.add_fact(Literal::at(Predicate::Stench, cell).negative());

        for n in cell.neighbors() {
            let ruled_out = Literal::at(Predicate::Wumpus, n).negative();
            if kb.in_bounds(n) {
                prop_assert!(kb.has_fact(&ruled_out), "missing {}", ruled_out);
            } else {
                prop_assert!(!kb.has_fact(&ruled_out));
            }
        }
    }
}
