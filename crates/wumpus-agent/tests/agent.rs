use wumpus_agent::{AgentConfig, AgentState, DecisionKind, LogicalAgent, Policy};
use wumpus_core::{Action, Cell, Direction, GridWorld, Percept, World};
use wumpus_logic::{KnowledgeBase, Literal, Predicate};

fn run_episode(world: &mut GridWorld, agent: &mut LogicalAgent, max_turns: usize) -> usize {
    let mut turns = 0;
    while turns < max_turns && agent.step(world).is_some() {
        turns += 1;
    }
    turns
}

#[test]
fn glitter_without_gold_always_grabs() {
    let policy = Policy::new(4, 4, &AgentConfig::default());
    let mut kb = KnowledgeBase::new().with_bounds(4, 4);
    kb.add_fact("Wumpus(2,1)".parse().unwrap());
    kb.add_fact("Gold(3,3)".parse().unwrap());

    for (x, y) in [(0, 0), (1, 1), (3, 0)] {
        for has_arrow in [true, false] {
            for wumpus_killed in [true, false] {
                let mut state = AgentState::at(Cell::new(x, y));
                state.has_arrow = has_arrow;
                state.wumpus_killed = wumpus_killed;
                let percept = Percept::default()
                    .with_glitter()
                    .with_stench()
                    .with_breeze();

                let decision = policy.decide(&state, &kb, &percept);
                assert_eq!(decision.kind, DecisionKind::Grab);
                assert_eq!(decision.action, Some(Action::Grab));
            }
        }
    }
}

#[test]
fn breeze_at_origin_keeps_origin_safe() {
    let mut world = GridWorld::new(3, 3).with_pit(Cell::new(1, 0));
    let mut agent = LogicalAgent::new(3, 3, AgentConfig::default());

    let report = agent.step(&mut world).expect("game running");
    assert!(report.percept.breeze);

    let kb = agent.knowledge_base();
    for cell in [Cell::new(1, 0), Cell::new(0, 1)] {
        let suspect = Literal::at(Predicate::PossiblePit, cell);
        assert!(kb.has_fact(&suspect));
        assert!(agent.query(&suspect));
    }
    assert!(agent.state().safe.contains(&Cell::ORIGIN));
    // Both exits are breezy guesses, so the agent waits rather than gamble.
    assert_eq!(report.decision.kind, DecisionKind::Idle);
    assert!(world.is_agent_alive());
}

#[test]
fn gold_holder_walks_back_to_origin() {
    let policy = Policy::new(3, 3, &AgentConfig::default());
    let kb = KnowledgeBase::new().with_bounds(3, 3);
    let mut state = AgentState::at(Cell::new(2, 2));
    state.has_gold = true;

    let mut steps = 0;
    while state.position != Cell::ORIGIN {
        let decision = policy.decide(&state, &kb, &Percept::default());
        assert_eq!(decision.kind, DecisionKind::ReturnHome);
        let Some(Action::MoveForward(direction)) = decision.action else {
            panic!("expected a move, got {:?}", decision.action);
        };
        let next = state.position.step(direction);
        assert_eq!(
            next.manhattan(Cell::ORIGIN) + 1,
            state.position.manhattan(Cell::ORIGIN)
        );
        state.position = next;
        state.visited.insert(next);
        steps += 1;
        assert!(steps <= 4);
    }

    let decision = policy.decide(&state, &kb, &Percept::default());
    assert_eq!(decision.kind, DecisionKind::ReturnHome);
    assert_eq!(decision.action, None);
}

#[test]
fn hazard_free_cave_is_solved() {
    let mut world = GridWorld::new(3, 3).with_gold(Cell::new(2, 2));
    let mut agent = LogicalAgent::new(3, 3, AgentConfig::default());

    run_episode(&mut world, &mut agent, 50);

    assert!(world.is_game_over());
    assert!(world.is_agent_alive());
    assert!(agent.state().has_gold);
    assert_eq!(agent.state().position, Cell::ORIGIN);
    assert_eq!(world.score(), 1000 - 8);
}

#[test]
fn located_wumpus_is_shot_before_gold_run() {
    let mut world = GridWorld::new(4, 4)
        .with_wumpus(Cell::new(2, 0))
        .with_gold(Cell::new(3, 3));
    let mut agent = LogicalAgent::new(4, 4, AgentConfig::default());

    run_episode(&mut world, &mut agent, 100);

    let state = agent.state();
    assert!(world.is_game_over());
    assert!(world.is_agent_alive());
    assert!(state.wumpus_killed);
    assert!(!state.has_arrow);
    assert!(state.has_gold);
    assert_eq!(state.position, Cell::ORIGIN);
    assert!(agent
        .knowledge_base()
        .has_fact(&Literal::nullary(Predicate::WumpusDead)));
    assert!(!agent
        .knowledge_base()
        .store()
        .known()
        .any(|l| l.is(&Predicate::PossibleWumpus, false)));
    // 16 moves, one arrow, the gold.
    assert_eq!(world.score(), 1000 - 16 - 10);
}

#[test]
fn trace_is_bounded_and_snapshots_serialize() {
    let config = AgentConfig {
        trace_capacity: 5,
        ..AgentConfig::default()
    };
    let mut world = GridWorld::new(3, 3).with_gold(Cell::new(2, 2));
    let mut agent = LogicalAgent::new(3, 3, config);
    run_episode(&mut world, &mut agent, 3);

    assert_eq!(agent.thoughts().len(), 5);
    let snapshot = agent.snapshot();
    assert_eq!(snapshot.move_count, 3);
    assert_eq!(snapshot.direction, Direction::South);
    assert!(snapshot.visited.contains(&Cell::new(2, 0)));

    let json = serde_json::to_string(&snapshot).expect("snapshot json");
    assert!(json.contains("\"risk_assessment\""));
    let knowledge = serde_json::to_value(agent.knowledge()).expect("knowledge json");
    assert!(knowledge["facts"]
        .as_array()
        .expect("facts array")
        .iter()
        .any(|f| f == "Visited(2,0)"));
}
