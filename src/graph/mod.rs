//! Graph capability and generators.
//!
//! A [`Graph`] is anything that can enumerate its nodes and its directed
//! edges. Node identity is the node's `Display` string: two nodes are the
//! same node iff they render to the same string. Generators that build
//! undirected graphs emit both directions of every edge.
//!
//! The [`ring`], [`random`], and [`grid`] modules provide seedable
//! generators; [`export`] renders any graph as a D3-style JSON document.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod export;
pub mod grid;
pub mod random;
pub mod ring;

pub use export::{d3_document, d3_json, D3Document, D3Link, D3Node};
pub use grid::{GridGraph, Position};
pub use random::RandomGraph;
pub use ring::RingGraph;

/// A directed edge between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge<N> {
    /// Tail of the edge.
    pub from: N,
    /// Head of the edge.
    pub to: N,
}

impl<N> Edge<N> {
    /// Creates a directed edge `from -> to`.
    pub const fn new(from: N, to: N) -> Self {
        Self { from, to }
    }

    /// Returns the same edge pointing the other way.
    #[must_use]
    pub fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
}

impl<N> From<(N, N)> for Edge<N> {
    fn from((from, to): (N, N)) -> Self {
        Self { from, to }
    }
}

impl<N: fmt::Display> fmt::Display for Edge<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Enumerable nodes plus directed edges.
///
/// Implementations must return a stable node set: the same node must
/// render to the same string every time it is listed.
pub trait Graph {
    /// Node type; its `Display` output is the node identity.
    type Node: fmt::Display;

    /// Returns every node of the graph.
    fn nodes(&self) -> Vec<Self::Node>;

    /// Returns every directed edge of the graph.
    fn edges(&self) -> Vec<Edge<Self::Node>>;
}

/// A graph given explicitly as a node list and a directed edge list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeList<N> {
    nodes: Vec<N>,
    edges: Vec<Edge<N>>,
}

impl<N> EdgeList<N> {
    /// Creates a graph from nodes and directed edges.
    pub fn new(nodes: Vec<N>, edges: Vec<Edge<N>>) -> Self {
        Self { nodes, edges }
    }
}

impl EdgeList<usize> {
    /// Builds a graph over nodes `0..rows.len()` from a 0/1 adjacency
    /// matrix; a non-zero cell `(i, j)` becomes the edge `i -> j`.
    #[must_use]
    pub fn from_adjacency<R: AsRef<[u8]>>(rows: &[R]) -> Self {
        let edges = rows
            .iter()
            .enumerate()
            .flat_map(|(i, row)| {
                row.as_ref()
                    .iter()
                    .enumerate()
                    .filter(|&(_, &cell)| cell != 0)
                    .map(move |(j, _)| Edge::new(i, j))
            })
            .collect();
        Self {
            nodes: (0..rows.len()).collect(),
            edges,
        }
    }
}

impl<N: fmt::Display + Clone> Graph for EdgeList<N> {
    type Node = N;

    fn nodes(&self) -> Vec<N> {
        self.nodes.clone()
    }

    fn edges(&self) -> Vec<Edge<N>> {
        self.edges.clone()
    }
}

/// Returns true if `node` is among `nodes`, comparing by identity string.
pub fn contains<A: fmt::Display, B: fmt::Display>(nodes: &[A], node: &B) -> bool {
    let needle = node.to_string();
    nodes.iter().any(|n| n.to_string() == needle)
}
