use smallworlds::graph::{GridGraph, RingGraph};
use smallworlds::stats::{random_transition_matrix, uniform_transition_matrix};
use smallworlds::{Agent, AgentConfig, Graph, SmallWorldError, ValidationError, World};

use rand::SeedableRng;
use rand_pcg::Pcg64;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn grid_world(len: usize) -> World {
    let grid = GridGraph::new(len, len).seed(42).with_all_nodes().with_short_edges(1);
    World::from_graph(&grid).unwrap().seed(42)
}

#[test]
fn every_step_appends_one_walk_and_moves_state() {
    init_tracing();

    let world = grid_world(10);
    let mut agent = Agent::builder(&world)
        .addresses(["(0,0)", "(9,9)", "(3,6)"])
        .visit_distribution(uniform_transition_matrix(3))
        .state("(5,5)")
        .seed(42)
        .build()
        .unwrap();

    let mut expected_start = agent.state().to_string();
    for step in 1..=25 {
        let walk = agent.visit_or_explore().unwrap().clone();
        assert_eq!(agent.history().len(), step);
        assert_eq!(walk.start(), Some(expected_start.as_str()));
        assert_eq!(walk.end(), Some(agent.state()));
        for pair in walk.nodes().windows(2) {
            assert!(world.has_edge(pair[0].as_str(), pair[1].as_str()).unwrap());
        }
        expected_start = agent.state().to_string();
    }
}

#[test]
fn visit_reaches_target_on_grid() {
    init_tracing();

    let world = grid_world(10);
    let mut agent = Agent::builder(&world).state("(0,0)").k(3).seed(5).build().unwrap();

    let walk = agent.visit("(9,9)").unwrap().clone();
    assert_eq!(walk.start(), Some("(0,0)"));
    assert_eq!(walk.end(), Some("(9,9)"));
    assert_eq!(agent.state(), "(9,9)");
    assert_eq!(agent.last_walk(), Some(&walk));
}

#[test]
fn explorer_only_takes_bounded_walks() {
    init_tracing();

    let ring = RingGraph::new(2, 0.0).seed(42).with_nodes(20).with_short_edges();
    let world = World::from_graph(&ring).unwrap().seed(1);
    let mut agent = Agent::builder(&world)
        .config(AgentConfig {
            k: 2,
            max_explore_len: 3,
            explore_prob: 1.0,
        })
        .state(&0)
        .seed(9)
        .build()
        .unwrap();

    for walk in agent.run(30).unwrap() {
        assert!((1..=3).contains(&walk.len()));
    }
}

#[test]
fn homebody_shuttles_between_addresses() {
    init_tracing();

    let ring = RingGraph::new(3, 0.0).seed(42).with_nodes(12).with_short_edges();
    let world = World::from_graph(&ring).unwrap().seed(42);
    let mut agent = Agent::builder(&world)
        .address(&0)
        .address(&6)
        .visit_distribution(vec![vec![0.0, 1.0], vec![1.0, 0.0]])
        .state(&0)
        .explore_prob(0.0)
        .seed(4)
        .build()
        .unwrap();

    let states: Vec<String> = (0..6)
        .map(|_| agent.visit_or_explore().unwrap().end().unwrap().to_string())
        .collect();
    assert_eq!(states, vec!["6", "0", "6", "0", "6", "0"]);
}

#[test]
fn agents_with_same_seed_share_history() {
    init_tracing();

    let run = |seed: u64| {
        let world = grid_world(8);
        let mut rng = Pcg64::seed_from_u64(seed);
        let distribution = random_transition_matrix(&mut rng, 3);
        let mut agent = Agent::builder(&world)
            .addresses(["(0,0)", "(7,7)", "(0,7)"])
            .visit_distribution(distribution)
            .state("(4,4)")
            .seed(seed)
            .build()
            .unwrap();
        agent.run(15).unwrap().to_vec()
    };

    assert_eq!(run(21), run(21));
}

#[test]
fn many_agents_share_one_world() {
    init_tracing();

    let world = grid_world(6);
    let nodes = world.nodes();
    let mut agents: Vec<Agent<'_>> = (0..4u64)
        .map(|i| {
            Agent::builder(&world)
                .address(&nodes[0])
                .address(&nodes[35])
                .state(&nodes[usize::try_from(i).unwrap() * 5])
                .seed(i)
                .build()
                .unwrap()
        })
        .collect();

    for agent in &mut agents {
        agent.run(5).unwrap();
    }
    assert!(agents.iter().all(|a| a.history().len() == 5));
    assert_ne!(agents[0].id(), agents[1].id());
}

#[test]
fn configuration_errors_surface_at_build() {
    init_tracing();

    let world = grid_world(3);

    let err = Agent::builder(&world)
        .address("(0,0)")
        .visit_distribution(vec![vec![0.5, 0.5], vec![0.5, 0.5]])
        .state("(0,0)")
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        SmallWorldError::from(ValidationError::InvalidDistribution { rows: 2, expected: 1 })
    );

    let err = Agent::builder(&world).state("(9,9)").build().unwrap_err();
    assert!(err.is_unknown_node());

    let err = Agent::builder(&world).state("(0,0)").max_explore_len(0).build().unwrap_err();
    assert_eq!(err, SmallWorldError::from(ValidationError::ZeroExploreLength));
}
