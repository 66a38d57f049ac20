//! Purely random directed graphs.

use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use tracing::warn;

use crate::graph::{Edge, Graph};

/// Nodes `0..n` with directed edges between uniformly chosen endpoints.
#[derive(Debug, Clone)]
pub struct RandomGraph {
    n: usize,
    edges: BTreeSet<(usize, usize)>,
    rng: Pcg64,
}

impl Default for RandomGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomGraph {
    /// Creates an empty graph seeded from the OS.
    #[must_use]
    pub fn new() -> Self {
        Self {
            n: 0,
            edges: BTreeSet::new(),
            rng: Pcg64::from_os_rng(),
        }
    }

    /// Replaces the random source with one seeded from `seed`.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = Pcg64::seed_from_u64(seed);
        self
    }

    /// Appends `n` nodes.
    #[must_use]
    pub fn with_nodes(mut self, n: usize) -> Self {
        self.n += n;
        self
    }

    /// Adds `m` new directed edges between distinct, uniformly chosen
    /// nodes. Self-loops and duplicate edges are never produced.
    ///
    /// A request larger than the number of missing edges is clamped.
    #[must_use]
    pub fn with_edges(mut self, m: usize) -> Self {
        let capacity = self.n * self.n.saturating_sub(1) - self.edges.len();
        let m = if m > capacity {
            warn!(requested = m, capacity, "random graph cannot hold requested edges; clamping");
            capacity
        } else {
            m
        };

        let mut added = 0;
        while added < m {
            let from = self.rng.random_range(0..self.n);
            let to = self.rng.random_range(0..self.n);
            if from != to && self.edges.insert((from, to)) {
                added += 1;
            }
        }
        self
    }

    /// Number of nodes.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.n
    }

    /// Returns true if the directed edge `from -> to` exists.
    #[must_use]
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.edges.contains(&(from, to))
    }
}

impl Graph for RandomGraph {
    type Node = usize;

    fn nodes(&self) -> Vec<usize> {
        (0..self.n).collect()
    }

    fn edges(&self) -> Vec<Edge<usize>> {
        self.edges.iter().map(|&(from, to)| Edge::new(from, to)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_nodes() {
        let g = RandomGraph::new().with_nodes(3);
        assert_eq!(g.nodes(), vec![0, 1, 2]);

        let g = g.with_nodes(3);
        assert_eq!(g.nodes(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_with_edges() {
        let g = RandomGraph::new().seed(42).with_nodes(3).with_edges(2);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edges().len(), 2);
        assert!(g.edges().iter().all(|e| e.from != e.to));
    }

    #[test]
    fn test_with_edges_clamps_to_capacity() {
        let g = RandomGraph::new().seed(42).with_nodes(3).with_edges(100);
        assert_eq!(g.edges().len(), 6);
        assert!(g.has_edge(0, 1) && g.has_edge(2, 1));
    }

    #[test]
    fn test_seeded_graphs_match() {
        let a = RandomGraph::new().seed(9).with_nodes(50).with_edges(80);
        let b = RandomGraph::new().seed(9).with_nodes(50).with_edges(80);
        assert_eq!(a.edges(), b.edges());
    }
}
