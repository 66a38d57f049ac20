//! Ring-lattice generator with Watts–Strogatz rewiring.
//!
//! Nodes `0..n` are arranged in a ring and each node is linked to its
//! `k/2` nearest neighbours on either side. Rewiring then replaces each
//! lattice edge, with probability `beta`, by an edge to a random node.

use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use tracing::warn;

use crate::graph::{Edge, Graph};

/// Ring lattice controlled by `k` (lattice degree) and `beta` (rewiring
/// probability). All edges are undirected, stored in both directions.
///
/// # Examples
///
/// ```
/// use smallworlds::graph::{Graph, RingGraph};
///
/// let ring = RingGraph::new(1, 0.0).seed(42).with_nodes(5).with_short_edges();
/// assert_eq!(ring.edges().len(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct RingGraph {
    n: usize,
    k: usize,
    beta: f64,
    edges: BTreeSet<(usize, usize)>,
    rng: Pcg64,
}

impl RingGraph {
    /// Creates an empty ring with `k = 2 * k_over_2`, so `k` is always even.
    #[must_use]
    pub fn new(k_over_2: usize, beta: f64) -> Self {
        Self {
            n: 0,
            k: k_over_2 * 2,
            beta,
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

    /// Appends `n` new nodes to the ring.
    #[must_use]
    pub fn with_nodes(mut self, n: usize) -> Self {
        self.n += n;
        self
    }

    /// Links every node to the `k/2` nodes on each side of it, wrapping
    /// the tail of the list around to its head.
    #[must_use]
    pub fn with_short_edges(mut self) -> Self {
        for u in 0..self.n {
            for v in self.window(u) {
                self.add_edge(u, v);
            }
        }
        self
    }

    /// Rewires lattice edges: each one still present is removed with
    /// probability `beta` and replaced by an edge from the same node to a
    /// uniformly chosen node it is not yet linked to.
    #[must_use]
    pub fn with_distant_edges(mut self) -> Self {
        for u in 0..self.n {
            for v in self.window(u) {
                if !self.has_edge(u, v) || self.rng.random::<f64>() >= self.beta {
                    continue;
                }
                self.remove_edge(u, v);

                if (0..self.n).all(|p| p == u || self.has_edge(u, p)) {
                    warn!(node = u, "ring node is linked to every other node; rewiring skipped");
                    continue;
                }
                loop {
                    let p = self.rng.random_range(0..self.n);
                    if p != u && !self.has_edge(u, p) {
                        self.add_edge(u, p);
                        break;
                    }
                }
            }
        }
        self
    }

    /// Returns true if `n >> k >> ln(n) >> 1`, approximated as
    /// `n >= 5k` and `k >= 5 ln(n)`.
    ///
    /// A ring must be valid before rewiring for the result to have the
    /// small-world property.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn is_valid(&self) -> bool {
        self.n >= 5 * self.k && self.k as f64 >= 5.0 * (self.n as f64).ln()
    }

    /// Number of nodes in the ring.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.n
    }

    /// Lattice degree `k`.
    #[must_use]
    pub const fn k(&self) -> usize {
        self.k
    }

    /// Rewiring probability.
    #[must_use]
    pub const fn beta(&self) -> f64 {
        self.beta
    }

    /// Returns true if the directed edge `from -> to` exists.
    #[must_use]
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.edges.contains(&(from, to))
    }

    /// Adds the undirected edge `p -- q`.
    pub fn add_edge(&mut self, p: usize, q: usize) {
        self.edges.insert((p, q));
        self.edges.insert((q, p));
    }

    /// Removes the undirected edge `p -- q`.
    pub fn remove_edge(&mut self, p: usize, q: usize) {
        self.edges.remove(&(p, q));
        self.edges.remove(&(q, p));
    }

    /// Ring positions within `k/2` of `u`, excluding `u`'s own offset.
    fn window(&self, u: usize) -> Vec<usize> {
        let n = i64::try_from(self.n).unwrap_or(i64::MAX);
        let half = i64::try_from(self.k / 2).unwrap_or(i64::MAX);
        let Ok(u) = i64::try_from(u) else {
            return Vec::new();
        };

        ((u - half)..=(u + half))
            .filter(|&next| next != u)
            .filter_map(|next| usize::try_from(next.rem_euclid(n)).ok())
            .collect()
    }
}

impl Graph for RingGraph {
    type Node = usize;

    fn nodes(&self) -> Vec<usize> {
        (0..self.n).collect()
    }

    fn edges(&self) -> Vec<Edge<usize>> {
        self.edges.iter().map(|&(from, to)| Edge::new(from, to)).collect()
    }
}
