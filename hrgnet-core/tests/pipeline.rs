//! End-to-end tests: dendrogram file to attack records.

mod common;

use common::{CHERRY, NESTED, dendrogram_file};
use hrgnet_core::{
    AttackSimulatorBuilder, AttackStrategy, Dendrogram, ErdosRenyi, Protection, synthesize,
};
use rand::{SeedableRng, rngs::SmallRng};
use rstest::rstest;

#[test]
fn loads_from_disk() {
    let file = dendrogram_file(NESTED);
    let dendrogram = Dendrogram::load(file.path()).expect("fixture file is valid");
    assert_eq!(dendrogram.total_size(), 75);
    assert_eq!(dendrogram.node_count(), 5);
    assert_eq!(dendrogram.root().id(), "R");
}

#[test]
fn empirical_degree_tracks_analytic_degree() {
    let dendrogram: Dendrogram = CHERRY.parse().expect("fixture is valid");
    let expected = dendrogram.average_degree().expect("resolvable");

    let runs = 400_u32;
    let mut total = 0.0;
    for seed in 0..runs {
        let result = synthesize(&dendrogram, &ErdosRenyi, &mut SmallRng::seed_from_u64(seed.into()))
            .expect("synthesis succeeds");
        let network = result.network();
        total += 2.0 * network.edge_count() as f64 / network.vertex_count() as f64;
    }
    let observed = total / f64::from(runs);
    assert!(
        (observed - expected).abs() < expected * 0.05,
        "observed {observed}, expected {expected}"
    );
}

#[rstest]
#[case(AttackStrategy::RandomNode)]
#[case(AttackStrategy::RandomEdge)]
#[case(AttackStrategy::TargetedNode)]
fn sweep_produces_one_record_per_fraction(#[case] strategy: AttackStrategy) {
    let dendrogram: Dendrogram = NESTED.parse().expect("fixture is valid");
    let synthesized = synthesize(&dendrogram, &ErdosRenyi, &mut SmallRng::seed_from_u64(8))
        .expect("synthesis succeeds");

    let records = AttackSimulatorBuilder::new()
        .with_strategy(strategy)
        .with_trials(5)
        .build()
        .expect("defaults are valid")
        .run(synthesized.network())
        .expect("sweep succeeds");

    assert_eq!(records.len(), 11);
    assert!(records.windows(2).all(|pair| pair[0].fraction() < pair[1].fraction()));
    assert!(records.iter().all(|record| (0.0..=1.0).contains(&record.mean())));
    if strategy != AttackStrategy::RandomEdge {
        let last = records.last().expect("grid is non-empty");
        assert_eq!(last.mean(), 0.0);
    }
}

#[test]
fn bridge_protection_keeps_bridges_intact() {
    let dendrogram: Dendrogram = NESTED.parse().expect("fixture is valid");
    let synthesized = synthesize(&dendrogram, &ErdosRenyi, &mut SmallRng::seed_from_u64(21))
        .expect("synthesis succeeds");
    let (network, bridges) = synthesized.into_parts();
    assert!(!bridges.is_empty());

    let protection = Protection::from_bridges(bridges.iter().copied());
    let removable = network.edge_count() - protection.edges().len();
    let fraction = (removable / 2) as f64 / network.edge_count() as f64;

    let watched = bridges.clone();
    let records = AttackSimulatorBuilder::new()
        .with_fractions([fraction])
        .with_trials(20)
        .with_strategy(AttackStrategy::RandomEdge)
        .with_protection(protection)
        .with_extractor(move |attacked: &hrgnet_core::Network| {
            watched
                .iter()
                .filter(|&&edge| attacked.contains_edge(edge))
                .count()
        })
        .build()
        .expect("configuration is valid")
        .run(&network)
        .expect("sweep succeeds");

    let expected = bridges.len() as f64 / network.vertex_count() as f64;
    assert_eq!(records.len(), 1);
    assert!((records[0].mean() - expected).abs() < 1e-12);
    assert_eq!(records[0].std_dev(), 0.0);
}
