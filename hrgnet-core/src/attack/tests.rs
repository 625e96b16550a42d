//! Unit tests for the attack simulator.

use super::*;

use rand::{SeedableRng, rngs::SmallRng};
use rstest::{fixture, rstest};

use crate::error::AttackErrorCode;

fn star(leaves: usize) -> Network {
    Network::from_edges(leaves + 1, (1..=leaves).map(|leaf| Edge::new(0, leaf)))
}

fn ring(n: usize) -> Network {
    Network::from_edges(n, (0..n).map(|v| Edge::new(v, (v + 1) % n)))
}

fn simulator(strategy: AttackStrategy, fractions: &[f64], trials: usize) -> AttackSimulator {
    AttackSimulatorBuilder::new()
        .with_fractions(fractions.iter().copied())
        .with_trials(trials)
        .with_strategy(strategy)
        .with_execution_strategy(ExecutionStrategy::Sequential)
        .build()
        .expect("configuration is valid")
}

/// Four chords across a 16-vertex ring, touching vertices 0, 1, 8 and 9.
#[fixture]
fn bridges() -> Vec<Edge> {
    vec![
        Edge::new(0, 8),
        Edge::new(0, 9),
        Edge::new(1, 8),
        Edge::new(1, 9),
    ]
}

#[fixture]
fn bridged_ring(bridges: Vec<Edge>) -> Network {
    let mut network = ring(16);
    for bridge in bridges {
        network.add_edge(bridge);
    }
    network
}

#[rstest]
#[case(AttackStrategy::RandomNode)]
#[case(AttackStrategy::RandomEdge)]
#[case(AttackStrategy::TargetedNode)]
fn zero_fraction_keeps_connected_graph_whole(#[case] strategy: AttackStrategy) {
    let records = simulator(strategy, &[0.0], 3)
        .run(&ring(12))
        .expect("sweep succeeds");
    assert_eq!(records, vec![AttackRecord::new(0.0, 1.0, 0.0)]);
}

#[rstest]
#[case(AttackStrategy::RandomNode)]
#[case(AttackStrategy::TargetedNode)]
fn full_node_removal_leaves_nothing(#[case] strategy: AttackStrategy) {
    let records = simulator(strategy, &[1.0], 3)
        .run(&star(6))
        .expect("sweep succeeds");
    assert_eq!(records, vec![AttackRecord::new(1.0, 0.0, 0.0)]);
}

#[test]
fn full_edge_removal_isolates_every_vertex() {
    let records = simulator(AttackStrategy::RandomEdge, &[1.0], 2)
        .run(&star(3))
        .expect("sweep succeeds");
    assert_eq!(records, vec![AttackRecord::new(1.0, 0.25, 0.0)]);
}

#[rstest]
#[case(4, 0.2)]
#[case(9, 0.1)]
fn targeted_attack_removes_star_hub(#[case] leaves: usize, #[case] fraction: f64) {
    let simulator = simulator(AttackStrategy::TargetedNode, &[fraction], 1);
    let mut rng = SmallRng::seed_from_u64(0);
    let rescaled = simulator
        .run_trial(&star(leaves), fraction, &mut rng)
        .expect("trial succeeds");
    assert_eq!(rescaled, fraction);
}

#[test]
fn empty_network_rescales_to_zero() {
    let simulator = simulator(AttackStrategy::RandomNode, &[0.0], 1);
    let mut rng = SmallRng::seed_from_u64(0);
    let rescaled = simulator
        .run_trial(&Network::default(), 0.0, &mut rng)
        .expect("trial succeeds");
    assert_eq!(rescaled, 0.0);
}

#[rstest]
#[case(AttackStrategy::RandomNode)]
#[case(AttackStrategy::TargetedNode)]
fn protected_vertices_always_survive(
    bridges: Vec<Edge>,
    bridged_ring: Network,
    #[case] strategy: AttackStrategy,
) {
    let protection = Protection::from_bridges(bridges);
    let guarded = protection.vertices().clone();
    // 12 of 16 vertices are unprotected, so 0.75 empties the removable pool.
    let records = AttackSimulatorBuilder::new()
        .with_fractions([0.75])
        .with_trials(64)
        .with_strategy(strategy)
        .with_protection(protection)
        .with_extractor(move |network: &Network| {
            guarded
                .iter()
                .filter(|&&vertex| network.contains_vertex(vertex))
                .count()
        })
        .build()
        .expect("configuration is valid")
        .run(&bridged_ring)
        .expect("sweep succeeds");
    assert_eq!(records, vec![AttackRecord::new(0.75, 0.25, 0.0)]);
}

#[rstest]
fn protected_edges_always_survive(bridges: Vec<Edge>, bridged_ring: Network) {
    assert_eq!(bridged_ring.edge_count(), 20);
    let protection = Protection::from_bridges(bridges.iter().copied());
    // 16 of 20 edges are unprotected, so 0.8 empties the removable pool.
    let records = AttackSimulatorBuilder::new()
        .with_fractions([0.8])
        .with_trials(64)
        .with_strategy(AttackStrategy::RandomEdge)
        .with_protection(protection)
        .with_extractor(move |network: &Network| {
            bridges
                .iter()
                .filter(|&&edge| network.contains_edge(edge))
                .count()
        })
        .build()
        .expect("configuration is valid")
        .run(&bridged_ring)
        .expect("sweep succeeds");
    assert_eq!(records, vec![AttackRecord::new(0.8, 0.25, 0.0)]);
}

#[rstest]
#[case(AttackStrategy::RandomNode, 16, 12)]
#[case(AttackStrategy::TargetedNode, 16, 12)]
#[case(AttackStrategy::RandomEdge, 20, 16)]
fn oversized_fraction_is_rejected(
    bridges: Vec<Edge>,
    bridged_ring: Network,
    #[case] strategy: AttackStrategy,
    #[case] requested: usize,
    #[case] available: usize,
) {
    let err = AttackSimulatorBuilder::new()
        .with_fractions([0.0, 1.0])
        .with_trials(2)
        .with_strategy(strategy)
        .with_protection(Protection::from_bridges(bridges))
        .build()
        .expect("configuration is valid")
        .run(&bridged_ring)
        .expect_err("removal beyond the unprotected pool must fail");
    assert_eq!(err.code(), AttackErrorCode::InvalidFraction);
    assert_eq!(
        err,
        AttackError::InvalidFraction {
            fraction: 1.0,
            requested,
            available,
        }
    );
}

#[test]
fn run_trial_checks_fraction_range() {
    let simulator = simulator(AttackStrategy::RandomNode, &[0.0], 1);
    let mut rng = SmallRng::seed_from_u64(0);
    let err = simulator
        .run_trial(&ring(4), 1.25, &mut rng)
        .expect_err("fraction must be rejected");
    assert_eq!(err, AttackError::FractionOutOfRange { fraction: 1.25 });
}

#[test]
fn samples_follow_grid_order() {
    let samples = simulator(AttackStrategy::RandomNode, &[0.5, 0.0], 4)
        .sample(&ring(10))
        .expect("sweep succeeds");
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].fraction(), 0.5);
    assert_eq!(samples[0].samples().len(), 4);
    assert!(samples[1].samples().iter().all(|&value| value == 1.0));
}

#[test]
fn seeded_sweeps_repeat() {
    let network = ring(40);
    let first = simulator(AttackStrategy::RandomEdge, &[0.1, 0.3, 0.6], 5)
        .sample(&network)
        .expect("sweep succeeds");
    let second = simulator(AttackStrategy::RandomEdge, &[0.1, 0.3, 0.6], 5)
        .sample(&network)
        .expect("sweep succeeds");
    assert_eq!(first, second);
}

#[test]
fn trial_seeds_differ_per_pair() {
    let seeds: std::collections::HashSet<u64> = (0..8)
        .flat_map(|fraction| (0..8).map(move |trial| trial_seed(42, fraction, trial)))
        .collect();
    assert_eq!(seeds.len(), 64);
}

#[cfg(feature = "parallel")]
#[rstest]
#[case(AttackStrategy::RandomNode)]
#[case(AttackStrategy::RandomEdge)]
#[case(AttackStrategy::TargetedNode)]
fn parallel_matches_sequential(#[case] strategy: AttackStrategy) {
    let network = ring(64);
    let sweep = |execution| {
        AttackSimulatorBuilder::new()
            .with_strategy(strategy)
            .with_trials(6)
            .with_seed(11)
            .with_execution_strategy(execution)
            .build()
            .expect("configuration is valid")
            .run(&network)
            .expect("sweep succeeds")
    };
    let sequential = sweep(ExecutionStrategy::Sequential);
    assert_eq!(sequential, sweep(ExecutionStrategy::Parallel));
    assert_eq!(sequential, sweep(ExecutionStrategy::Auto));
}

#[cfg(not(feature = "parallel"))]
#[test]
fn parallel_requires_feature() {
    let err = AttackSimulatorBuilder::new()
        .with_execution_strategy(ExecutionStrategy::Parallel)
        .build()
        .expect("configuration is valid")
        .run(&ring(4))
        .expect_err("parallel execution is unavailable");
    assert_eq!(
        err,
        AttackError::BackendUnavailable {
            requested: ExecutionStrategy::Parallel,
        }
    );
}
