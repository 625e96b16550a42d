//! Unit tests for dendrogram validation and analytic statistics.

use super::*;

use proptest::prelude::*;
use rstest::{fixture, rstest};

use crate::error::StructureErrorCode;

fn tables(edges: &[(&str, &str)], probabilities: &[(&str, f64)], sizes: &[(&str, usize)]) -> DendrogramTables {
    DendrogramTables {
        edges: edges
            .iter()
            .map(|&(a, b)| (a.to_owned(), b.to_owned()))
            .collect(),
        probabilities: probabilities
            .iter()
            .map(|&(node, p)| (node.to_owned(), p))
            .collect(),
        sizes: sizes
            .iter()
            .map(|&(node, size)| (node.to_owned(), size))
            .collect(),
    }
}

#[fixture]
fn cherry() -> Dendrogram {
    Dendrogram::from_tables(tables(
        &[("R", "A"), ("R", "B")],
        &[("R", 0.5), ("A", 0.6), ("B", 0.6)],
        &[("A", 4), ("B", 4)],
    ))
    .expect("cherry dendrogram is valid")
}

#[rstest]
fn cherry_matches_closed_form(cherry: Dendrogram) {
    assert_eq!(cherry.total_size(), 8);
    let expected = 2.0 * (2.0 * 0.6 * 6.0 + 0.5 * 4.0) / 8.0;
    let actual = cherry.average_degree().expect("resolvable");
    assert!((actual - expected).abs() < 1e-12, "{actual} != {expected}");
}

#[rstest]
fn exposes_tree_shape(cherry: Dendrogram) {
    assert_eq!(cherry.node_count(), 3);
    assert_eq!(cherry.root().id(), "R");
    assert_eq!(
        cherry.leaves().map(DendrogramNode::id).collect::<Vec<_>>(),
        vec!["A", "B"]
    );
    assert_eq!(cherry.children("R").collect::<Vec<_>>(), vec!["A", "B"]);
    assert_eq!(cherry.neighbors("A").collect::<Vec<_>>(), vec!["R"]);
    assert_eq!(cherry.children("missing").count(), 0);
    assert_eq!(
        cherry.node("R").map(DendrogramNode::kind),
        Some(NodeKind::Internal { probability: 0.5 })
    );
}

#[test]
fn root_probability_defaults_to_zero() {
    let dendrogram = Dendrogram::from_tables(tables(
        &[("R", "A"), ("R", "B")],
        &[("A", 1.0), ("B", 1.0)],
        &[("A", 3), ("B", 2)],
    ))
    .expect("root may omit its probability");
    assert_eq!(dendrogram.root().kind().probability(), 0.0);
    // Leaves: 3 + 1 expected edges, no bridge contribution.
    let degree = dendrogram.average_degree().expect("resolvable");
    assert!((degree - 2.0 * 4.0 / 5.0).abs() < 1e-12);
}

#[test]
fn nested_tree_uses_smaller_child() {
    let dendrogram = Dendrogram::from_tables(tables(
        &[("R", "X"), ("R", "C"), ("X", "A"), ("X", "B")],
        &[("R", 1.0), ("X", 0.5), ("A", 0.0), ("B", 0.0), ("C", 0.0)],
        &[("A", 2), ("B", 6), ("C", 3)],
    ))
    .expect("nested tree is valid");
    // X contributes 0.5 * min(2, 6); R contributes 1.0 * min(8, 3).
    let expected = 2.0 * (1.0 + 3.0) / 11.0;
    let actual = dendrogram.average_degree().expect("resolvable");
    assert!((actual - expected).abs() < 1e-12);
    assert_eq!(
        dendrogram.leaves().map(DendrogramNode::id).collect::<Vec<_>>(),
        vec!["C", "A", "B"]
    );
}

#[rstest]
#[case::parent_first(&[("R", "X"), ("R", "C"), ("X", "A"), ("X", "B")])]
#[case::child_first(&[("X", "R"), ("C", "R"), ("A", "X"), ("B", "X")])]
#[case::mixed(&[("R", "X"), ("A", "X"), ("B", "X"), ("R", "C")])]
fn edge_direction_does_not_change_the_tree(#[case] edges: &[(&str, &str)]) {
    let dendrogram = Dendrogram::from_tables(tables(
        edges,
        &[("R", 1.0), ("X", 0.5), ("A", 0.0), ("B", 0.0), ("C", 0.0)],
        &[("A", 2), ("B", 6), ("C", 3)],
    ))
    .expect("orientation is free");
    assert_eq!(dendrogram.root().id(), "R");
    let mut children: Vec<&str> = dendrogram.children("R").collect();
    children.sort_unstable();
    assert_eq!(children, vec!["C", "X"]);
    assert_eq!(dendrogram.children("X").collect::<Vec<_>>(), vec!["A", "B"]);
    assert_eq!(dendrogram.children("A").count(), 0);
    assert_eq!(
        dendrogram.node("X").map(DendrogramNode::kind),
        Some(NodeKind::Internal { probability: 0.5 })
    );
    let expected = 2.0 * (1.0 + 3.0) / 11.0;
    let actual = dendrogram.average_degree().expect("resolvable");
    assert!((actual - expected).abs() < 1e-12);
}

#[test]
fn child_first_file_parses() {
    let dendrogram: Dendrogram = "# t\nA R\nB R\n# p\nR 0.5\nA 0.6\nB 0.6\n# s\nA 4\nB 4\n"
        .parse()
        .expect("child-first edges are accepted");
    assert_eq!(dendrogram.root().id(), "R");
    assert_eq!(
        dendrogram.leaves().map(DendrogramNode::id).collect::<Vec<_>>(),
        vec!["A", "B"]
    );
    let degree = dendrogram.average_degree().expect("resolvable");
    assert!((degree - 2.3).abs() < 1e-12);
}

#[test]
fn written_root_wins_over_smaller_internal_node() {
    // R has four children and X two, so X has fewer neighbours than R.
    let dendrogram = Dendrogram::from_tables(tables(
        &[("R", "A"), ("R", "B"), ("R", "C"), ("R", "X"), ("X", "D"), ("X", "E")],
        &[("X", 0.1), ("A", 0.1), ("B", 0.1), ("C", 0.1), ("D", 0.1), ("E", 0.1)],
        &[("A", 1), ("B", 1), ("C", 1), ("D", 1), ("E", 1)],
    ))
    .expect("parent-first tree is valid");
    assert_eq!(dendrogram.root().id(), "R");
    assert_eq!(dendrogram.children("X").collect::<Vec<_>>(), vec!["D", "E"]);
}

#[test]
fn single_leaf_without_edges() {
    let dendrogram =
        Dendrogram::from_tables(tables(&[], &[("solo", 0.3)], &[("solo", 7)])).expect("valid");
    assert_eq!(dendrogram.total_size(), 7);
    assert_eq!(dendrogram.root().id(), "solo");
    assert!(dendrogram.root().kind().is_leaf());
}

#[rstest]
#[case::empty(tables(&[], &[], &[]), StructureErrorCode::Empty)]
#[case::self_loop(tables(&[("A", "A")], &[], &[]), StructureErrorCode::SelfLoop)]
#[case::duplicate(tables(&[("R", "A"), ("R", "A")], &[], &[]), StructureErrorCode::DuplicateEdge)]
#[case::reversed_duplicate(tables(&[("R", "A"), ("A", "R")], &[], &[]), StructureErrorCode::DuplicateEdge)]
#[case::cycle_with_tail(tables(&[("R", "A"), ("A", "B"), ("B", "R"), ("R", "C")], &[], &[]), StructureErrorCode::Cyclic)]
#[case::cycle(tables(&[("A", "B"), ("B", "C"), ("C", "A")], &[], &[]), StructureErrorCode::Cyclic)]
#[case::disconnected(tables(&[("R", "A"), ("S", "B")], &[], &[]), StructureErrorCode::Disconnected)]
#[case::tables_only(tables(&[], &[("A", 0.1)], &[("A", 1), ("B", 1)]), StructureErrorCode::Disconnected)]
#[case::unknown_size(
    tables(&[("R", "A"), ("R", "B")], &[("A", 0.1), ("B", 0.1)], &[("A", 1), ("B", 1), ("Z", 1)]),
    StructureErrorCode::UnknownNode,
)]
#[case::unknown_probability(
    tables(&[("R", "A"), ("R", "B")], &[("Q", 0.1)], &[("A", 1), ("B", 1)]),
    StructureErrorCode::UnknownNode,
)]
#[case::duplicate_entry(
    tables(&[("R", "A"), ("R", "B")], &[("A", 0.1), ("A", 0.2)], &[("A", 1), ("B", 1)]),
    StructureErrorCode::DuplicateEntry,
)]
#[case::sized_internal(
    tables(&[("R", "A"), ("R", "B")], &[("A", 0.1), ("B", 0.1)], &[("A", 1), ("B", 1), ("R", 2)]),
    StructureErrorCode::SizedInternalNode,
)]
#[case::missing_size(
    tables(&[("R", "A"), ("R", "B")], &[("A", 0.1), ("B", 0.1)], &[("A", 1)]),
    StructureErrorCode::MissingSize,
)]
#[case::missing_leaf_probability(
    tables(&[("R", "A"), ("R", "B")], &[("A", 0.1)], &[("A", 1), ("B", 1)]),
    StructureErrorCode::MissingProbability,
)]
#[case::missing_internal_probability(
    tables(
        &[("R", "X"), ("R", "C"), ("X", "A"), ("X", "B")],
        &[("A", 0.1), ("B", 0.1), ("C", 0.1)],
        &[("A", 1), ("B", 1), ("C", 1)],
    ),
    StructureErrorCode::MissingProbability,
)]
#[case::probability_range(
    tables(&[("R", "A"), ("R", "B")], &[("A", 1.1), ("B", 0.1)], &[("A", 1), ("B", 1)]),
    StructureErrorCode::ProbabilityOutOfRange,
)]
fn rejects_invalid_structure(#[case] input: DendrogramTables, #[case] expected: StructureErrorCode) {
    let err = Dendrogram::from_tables(input).expect_err("structure must be rejected");
    assert_eq!(err.code(), expected, "unexpected error: {err}");
}

#[test]
fn zero_population_has_no_average_degree() {
    let dendrogram = Dendrogram::from_tables(tables(
        &[("R", "A"), ("R", "B")],
        &[("A", 0.5), ("B", 0.5)],
        &[("A", 0), ("B", 0)],
    ))
    .expect("empty leaves are structurally valid");
    assert_eq!(
        dendrogram.average_degree(),
        Err(StructureError::ZeroPopulation)
    );
}

#[test]
fn parse_reports_structure_errors() {
    let err = "# t\nR A\nS B\n# p\n# s\n"
        .parse::<Dendrogram>()
        .expect_err("two roots must be rejected");
    assert_eq!(
        err.structure_code(),
        Some(StructureErrorCode::Disconnected)
    );
    assert_eq!(err.format_code(), None);
}

fn balanced(depth: u32, sizes: &[usize]) -> DendrogramTables {
    let mut result = DendrogramTables::default();
    let leaf_count = 1_usize << depth;
    for node in 1..leaf_count {
        result.probabilities.push((format!("n{node}"), 0.25));
        for child in [2 * node, 2 * node + 1] {
            result.edges.push((format!("n{node}"), format!("n{child}")));
        }
    }
    for (offset, size) in sizes.iter().take(leaf_count).enumerate() {
        let leaf = format!("n{}", leaf_count + offset);
        result.probabilities.push((leaf.clone(), 0.5));
        result.sizes.push((leaf, *size));
    }
    result
}

proptest! {
    #[test]
    fn total_size_sums_leaf_sizes(sizes in proptest::collection::vec(0_usize..50, 8)) {
        let dendrogram = Dendrogram::from_tables(balanced(3, &sizes)).expect("balanced tree is valid");
        prop_assert_eq!(dendrogram.total_size(), sizes.iter().sum::<usize>());
        prop_assert_eq!(dendrogram.leaves().count(), 8);
    }

    #[test]
    fn average_degree_is_non_negative(sizes in proptest::collection::vec(1_usize..50, 4)) {
        let dendrogram = Dendrogram::from_tables(balanced(2, &sizes)).expect("balanced tree is valid");
        let degree = dendrogram.average_degree().expect("populated tree resolves");
        prop_assert!(degree.is_finite() && degree >= 0.0);
    }
}
