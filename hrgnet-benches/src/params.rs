//! Benchmark parameter labels.

use std::fmt;

use hrgnet_core::AttackStrategy;

/// Parameters for a synthesis benchmark run.
#[derive(Clone, Debug)]
pub struct SynthesisBenchParams {
    /// Number of leaves in the balanced dendrogram.
    pub leaves: usize,
    /// Vertices per leaf community.
    pub leaf_size: usize,
}

impl fmt::Display for SynthesisBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "leaves={},size={}", self.leaves, self.leaf_size)
    }
}

/// Parameters for an attack sweep benchmark run.
#[derive(Clone, Debug)]
pub struct AttackBenchParams {
    /// Vertices in the attacked network.
    pub vertices: usize,
    /// Victim selection strategy.
    pub strategy: AttackStrategy,
}

impl fmt::Display for AttackBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategy = match self.strategy {
            AttackStrategy::RandomNode => "random-node",
            AttackStrategy::RandomEdge => "random-edge",
            AttackStrategy::TargetedNode => "targeted-node",
        };
        write!(f, "n={},{strategy}", self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(AttackStrategy::RandomNode, "n=64,random-node")]
    #[case(AttackStrategy::TargetedNode, "n=64,targeted-node")]
    fn attack_params_render_compact_labels(#[case] strategy: AttackStrategy, #[case] expected: &str) {
        let params = AttackBenchParams {
            vertices: 64,
            strategy,
        };
        assert_eq!(params.to_string(), expected);
    }

    #[test]
    fn synthesis_params_render_compact_labels() {
        let params = SynthesisBenchParams {
            leaves: 8,
            leaf_size: 32,
        };
        assert_eq!(params.to_string(), "leaves=8,size=32");
    }
}
