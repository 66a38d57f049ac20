//! Grid lattice generator with Kleinberg long-range edges.
//!
//! Nodes sit on a `len_x` by `len_y` lattice. Short edges connect nodes
//! within a Manhattan radius; distant edges are drawn with probability
//! proportional to `distance^(-r)`.

use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use tracing::warn;

use crate::graph::{Edge, Graph};

mod position;

pub use position::Position;

/// A 2D lattice graph.
///
/// Short edges are undirected (stored in both directions); distant edges
/// and dropout act on single directed edges.
///
/// # Examples
///
/// ```
/// use smallworlds::graph::{Graph, GridGraph};
///
/// let grid = GridGraph::new(4, 4).seed(1).with_all_nodes().with_short_edges(1);
/// assert_eq!(grid.nodes().len(), 16);
/// assert_eq!(grid.edges().len(), 48);
/// ```
#[derive(Debug, Clone)]
pub struct GridGraph {
    len_x: i64,
    len_y: i64,
    nodes: BTreeSet<Position>,
    edges: BTreeSet<(Position, Position)>,
    rng: Pcg64,
}

impl GridGraph {
    /// Creates an empty grid with the given dimensions.
    #[must_use]
    pub fn new(len_x: usize, len_y: usize) -> Self {
        Self {
            len_x: i64::try_from(len_x).unwrap_or(i64::MAX),
            len_y: i64::try_from(len_y).unwrap_or(i64::MAX),
            nodes: BTreeSet::new(),
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

    /// Places a node at every position of the grid.
    #[must_use]
    pub fn with_all_nodes(mut self) -> Self {
        for x in 0..self.len_x {
            for y in 0..self.len_y {
                self.add_node(Position::at(x, y));
            }
        }
        self
    }

    /// Links every pair of nodes whose Manhattan distance is at most
    /// `max_distance`.
    #[must_use]
    pub fn with_short_edges(mut self, max_distance: u64) -> Self {
        let nodes: Vec<Position> = self.nodes.iter().copied().collect();
        for from in nodes {
            for to in from.neighbourhood(max_distance) {
                if from != to && self.exists(&from) && self.exists(&to) {
                    self.edges.insert((from, to));
                    self.edges.insert((to, from));
                }
            }
        }
        self
    }

    /// Adds `q` directed long-range edges from every node.
    ///
    /// Candidate ends are swept in node order and each is accepted with
    /// probability `distance(from, to)^(-r)` over the normalizing
    /// constant, repeating sweeps until `q` edges were added.
    #[must_use]
    pub fn with_distant_edges(mut self, q: usize, r: i32) -> Self {
        let nodes: Vec<Position> = self.nodes.iter().copied().collect();
        for from in &nodes {
            self.add_distant_edges_from(*from, &nodes, q, r);
        }
        self
    }

    /// Drops every directed edge independently with probability `p`.
    #[must_use]
    pub fn with_dropout(mut self, p: f64) -> Self {
        let edges: Vec<(Position, Position)> = self.edges.iter().copied().collect();
        for edge in edges {
            if self.rng.random::<f64>() < p {
                self.edges.remove(&edge);
            }
        }
        self
    }

    /// Sum of `distance(from, v)^(-r)` over all other nodes `v`.
    #[must_use]
    pub fn normalizing_const(&self, from: &Position, r: i32) -> f64 {
        self.nodes
            .iter()
            .filter(|to| *to != from)
            .map(|to| distance_weight(from, to, r))
            .sum()
    }

    /// Grid width.
    #[must_use]
    pub fn len_x(&self) -> usize {
        usize::try_from(self.len_x).unwrap_or(0)
    }

    /// Grid height.
    #[must_use]
    pub fn len_y(&self) -> usize {
        usize::try_from(self.len_y).unwrap_or(0)
    }

    /// Returns true if the directed edge `from -> to` exists.
    #[must_use]
    pub fn has_edge(&self, from: &Position, to: &Position) -> bool {
        self.edges.contains(&(*from, *to))
    }

    fn add_distant_edges_from(&mut self, from: Position, nodes: &[Position], q: usize, r: i32) {
        let norm = self.normalizing_const(&from, r);
        let mut added = 0;

        while added < q {
            if nodes.iter().all(|to| *to == from || self.has_edge(&from, to)) {
                warn!(node = %from, missing = q - added, "no candidates left for distant edges");
                return;
            }
            for to in nodes {
                if added >= q || *to == from || self.has_edge(&from, to) {
                    continue;
                }
                let p = distance_weight(&from, to, r) / norm;
                if self.rng.random::<f64>() < p {
                    self.edges.insert((from, *to));
                    added += 1;
                }
            }
        }
    }

    fn add_node(&mut self, p: Position) {
        if p.within(self.len_x, self.len_y) {
            self.nodes.insert(p);
        }
    }

    fn exists(&self, p: &Position) -> bool {
        self.nodes.contains(p)
    }
}

#[allow(clippy::cast_precision_loss)]
fn distance_weight(from: &Position, to: &Position, r: i32) -> f64 {
    (from.distance(to) as f64).powi(-r)
}

impl Graph for GridGraph {
    type Node = Position;

    fn nodes(&self) -> Vec<Position> {
        self.nodes.iter().copied().collect()
    }

    fn edges(&self) -> Vec<Edge<Position>> {
        self.edges.iter().map(|&(from, to)| Edge::new(from, to)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_all_nodes() {
        let grid = GridGraph::new(2, 2).with_all_nodes();
        assert_eq!(
            grid.nodes(),
            vec![
                Position::at(0, 0),
                Position::at(0, 1),
                Position::at(1, 0),
                Position::at(1, 1),
            ]
        );
    }

    #[test]
    fn test_with_short_edges() {
        let grid = GridGraph::new(2, 2).with_all_nodes().with_short_edges(1);
        let mut expected = vec![
            Edge::new(Position::at(0, 0), Position::at(0, 1)),
            Edge::new(Position::at(0, 0), Position::at(1, 0)),
            Edge::new(Position::at(1, 0), Position::at(0, 0)),
            Edge::new(Position::at(1, 0), Position::at(1, 1)),
            Edge::new(Position::at(0, 1), Position::at(1, 1)),
            Edge::new(Position::at(0, 1), Position::at(0, 0)),
            Edge::new(Position::at(1, 1), Position::at(1, 0)),
            Edge::new(Position::at(1, 1), Position::at(0, 1)),
        ];
        expected.sort();
        assert_eq!(grid.edges(), expected);
    }

    #[test]
    fn test_normalizing_const_flat() {
        let grid = GridGraph::new(4, 4).with_all_nodes().with_short_edges(1);
        let c = grid.normalizing_const(&Position::at(0, 0), 0);
        assert!((c - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalizing_const_inverse_square() {
        let grid = GridGraph::new(4, 4).with_all_nodes().with_short_edges(1);
        let c = grid.normalizing_const(&Position::at(0, 0), 2);
        assert!((c - 3.4897).abs() < 0.001);
    }

    #[test]
    fn test_with_distant_edges_adds_q_per_node() {
        let short = GridGraph::new(4, 4).seed(3).with_all_nodes().with_short_edges(1);
        let distant = GridGraph::new(4, 4)
            .seed(3)
            .with_all_nodes()
            .with_short_edges(1)
            .with_distant_edges(1, 0);

        assert_eq!(short.edges().len(), 48);
        assert_eq!(distant.edges().len(), 48 + 16);
    }

    #[test]
    fn test_hundred_node_small_world() {
        let grid = GridGraph::new(10, 10)
            .seed(42)
            .with_all_nodes()
            .with_short_edges(1)
            .with_distant_edges(1, 1);
        assert_eq!(grid.edges().len(), 460);
    }

    #[test]
    fn test_distant_edges_stop_when_saturated() {
        // Two nodes already linked both ways: nothing left to add.
        let grid = GridGraph::new(2, 1)
            .seed(1)
            .with_all_nodes()
            .with_short_edges(1)
            .with_distant_edges(3, 1);
        assert_eq!(grid.edges().len(), 2);
    }

    #[test]
    fn test_with_dropout_all() {
        let grid = GridGraph::new(4, 4)
            .seed(5)
            .with_all_nodes()
            .with_short_edges(1)
            .with_dropout(1.0);
        assert!(grid.edges().is_empty());
    }

    #[test]
    fn test_with_dropout_none() {
        let grid = GridGraph::new(4, 4)
            .seed(5)
            .with_all_nodes()
            .with_short_edges(1)
            .with_dropout(0.0);
        assert_eq!(grid.edges().len(), 48);
    }

    #[test]
    fn test_dimensions() {
        let grid = GridGraph::new(3, 5);
        assert_eq!(grid.len_x(), 3);
        assert_eq!(grid.len_y(), 5);
        assert!(grid.nodes().is_empty());
    }
}
