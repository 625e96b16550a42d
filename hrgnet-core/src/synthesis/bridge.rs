//! Bridge sampling between two merged communities.

use rand::{Rng, seq::index};

use crate::network::{Edge, VertexId};

/// Returns `round(probability * size)`, rounding half away from zero.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "probability lies in [0, 1] so the product stays within 0..=size"
)]
pub(crate) fn endpoint_quota(probability: f64, size: usize) -> usize {
    (probability * size as f64).round() as usize
}

/// Draws `min(round(p * |left|), round(p * |right|))` distinct cross edges
/// uniformly without replacement from `left × right`.
///
/// The result is sorted so callers see a stable order for a given draw.
pub(crate) fn sample_bridge_edges<R: Rng + ?Sized>(
    left: &[VertexId],
    right: &[VertexId],
    probability: f64,
    rng: &mut R,
) -> Vec<Edge> {
    let count = endpoint_quota(probability, left.len()).min(endpoint_quota(probability, right.len()));
    if count == 0 {
        return Vec::new();
    }
    let width = right.len();
    let mut edges: Vec<Edge> = index::sample(rng, left.len() * width, count)
        .into_iter()
        .map(|flat| Edge::new(left[flat / width], right[flat % width]))
        .collect();
    edges.sort_unstable();
    edges
}
