//! Clustering coefficients over the adjacency matrix.
//!
//! The local coefficient is taken over the *closed* neighbourhood: the
//! node's out-neighbours plus the node itself. Every ordered pair in that
//! set joined by a directed edge counts, including edges to and from the
//! node and a self-loop, and the total is divided by `|S| * (|S| - 1)`.
//! This is not the textbook undirected coefficient.

use crate::world::adjacency::AdjacencyMatrix;
use crate::world::index::NodeId;

/// Local clustering coefficient of `node`; 0 when it has no neighbours
/// other than itself.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn local_clustering_coefficient(adjacency: &AdjacencyMatrix, node: NodeId) -> f64 {
    let mut closed = adjacency.neighbours(node);
    if !closed.contains(&node) {
        closed.push(node);
    }
    if closed.len() < 2 {
        return 0.0;
    }

    let links = closed
        .iter()
        .flat_map(|&u| closed.iter().map(move |&v| (u, v)))
        .filter(|&(u, v)| adjacency.has_edge(u, v))
        .count();

    let size = closed.len();
    links as f64 / (size * (size - 1)) as f64
}

/// Local coefficients of every node, in id order.
pub(crate) fn local_clustering_coefficients(adjacency: &AdjacencyMatrix) -> Vec<f64> {
    (0..adjacency.len())
        .map(|i| local_clustering_coefficient(adjacency, NodeId::new(i)))
        .collect()
}

/// Arithmetic mean of the local coefficients; 0 for an empty matrix.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn average_clustering_coefficient(adjacency: &AdjacencyMatrix) -> f64 {
    let coefficients = local_clustering_coefficients(adjacency);
    if coefficients.is_empty() {
        return 0.0;
    }
    coefficients.iter().sum::<f64>() / coefficients.len() as f64
}
