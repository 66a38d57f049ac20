//! The world: a mutable snapshot of a graph with per-node contexts.
//!
//! A [`World`] is built once from any [`Graph`]. Node identities are
//! interned into dense [`NodeId`]s, edges land in a directed adjacency
//! matrix, and every node starts with an empty [`Context`]. After
//! construction the world only changes through its own methods; the source
//! graph is never consulted again.
//!
//! All node arguments are identities: anything whose `Display` output
//! names a node, so `"3"`, `&3usize` and `&Position::at(0, 3)` are all
//! valid keys.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use tracing::debug;

use crate::error::{SmallWorldResult, TraversalError, ValidationError};
use crate::graph::{Edge, Graph};

mod adjacency;
mod context;
mod index;
mod metrics;
mod paths;
mod walk;

pub use context::Context;
pub use index::NodeId;
pub use paths::UNREACHABLE;
pub use walk::Walk;

use adjacency::AdjacencyMatrix;
use index::NodeIndex;
pub(crate) use paths::Path;

/// A contextual graph for agents to traverse.
///
/// # Examples
///
/// ```
/// use smallworlds::graph::RingGraph;
/// use smallworlds::World;
///
/// let ring = RingGraph::new(2, 0.0).seed(42).with_nodes(5).with_short_edges();
/// let world = World::from_graph(&ring)?.seed(42);
///
/// let paths = world.k_shortest_paths(2, "0", "1")?;
/// assert_eq!(paths[0].nodes(), ["0", "1"]);
/// assert_eq!(paths[1].nodes(), ["0", "4", "1"]);
/// # Ok::<(), smallworlds::SmallWorldError>(())
/// ```
#[derive(Debug, Clone)]
pub struct World {
    index: NodeIndex,
    adjacency: AdjacencyMatrix,
    contexts: Vec<Context>,
    rng: RefCell<Pcg64>,
}

impl World {
    /// Snapshots `graph` into a new world.
    ///
    /// Nodes receive ids in the order the graph lists them; a repeated
    /// identity keeps the id of its first occurrence.
    ///
    /// # Errors
    ///
    /// Returns `TraversalError::UnknownNode` if an edge names a node that
    /// is not in the graph's node list.
    pub fn from_graph<G: Graph + ?Sized>(graph: &G) -> SmallWorldResult<Self> {
        let mut index = NodeIndex::default();
        for node in graph.nodes() {
            index.register(node.to_string());
        }

        let mut adjacency = AdjacencyMatrix::new(index.len());
        for edge in graph.edges() {
            let from = index.id(&edge.from.to_string())?;
            let to = index.id(&edge.to.to_string())?;
            adjacency.set(from, to);
        }

        debug!(
            nodes = index.len(),
            edges = adjacency.edge_count(),
            "world built from graph"
        );

        Ok(Self {
            contexts: vec![Context::new(); index.len()],
            index,
            adjacency,
            rng: RefCell::new(Pcg64::from_os_rng()),
        })
    }

    /// Replaces the random source used by [`World::random_walk`].
    #[must_use]
    pub fn seed(self, seed: u64) -> Self {
        self.rng.replace(Pcg64::seed_from_u64(seed));
        self
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    /// Number of directed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.edge_count()
    }

    /// Dense id of a node.
    ///
    /// # Errors
    ///
    /// Returns `TraversalError::UnknownNode` for an unseen identity.
    pub fn node_id(&self, node: &(impl fmt::Display + ?Sized)) -> SmallWorldResult<NodeId> {
        Ok(self.index.id(&node.to_string())?)
    }

    /// Identity of a dense id.
    ///
    /// # Errors
    ///
    /// Returns `TraversalError::UnknownNodeId` if `id` is out of range.
    pub fn label(&self, id: NodeId) -> SmallWorldResult<&str> {
        Ok(self.index.label(id)?)
    }

    /// Returns true if the world knows `node`.
    #[must_use]
    pub fn contains(&self, node: &(impl fmt::Display + ?Sized)) -> bool {
        self.index.id(&node.to_string()).is_ok()
    }

    /// Sets the given directed edges.
    ///
    /// Every endpoint is resolved before anything changes, so a failed
    /// call leaves the world untouched.
    ///
    /// # Errors
    ///
    /// Returns `TraversalError::UnknownNode` if an endpoint is unknown.
    pub fn add_edges<N: fmt::Display>(&mut self, edges: &[Edge<N>]) -> SmallWorldResult<()> {
        for (from, to) in self.resolve_edges(edges)? {
            self.adjacency.set(from, to);
        }
        Ok(())
    }

    /// Clears the given directed edges. Absent edges are ignored.
    ///
    /// # Errors
    ///
    /// Returns `TraversalError::UnknownNode` if an endpoint is unknown; the
    /// world is left untouched.
    pub fn remove_edges<N: fmt::Display>(&mut self, edges: &[Edge<N>]) -> SmallWorldResult<()> {
        for (from, to) in self.resolve_edges(edges)? {
            self.adjacency.clear(from, to);
        }
        Ok(())
    }

    fn resolve_edges<N: fmt::Display>(
        &self,
        edges: &[Edge<N>],
    ) -> SmallWorldResult<Vec<(NodeId, NodeId)>> {
        edges
            .iter()
            .map(|e| Ok((self.node_id(&e.from)?, self.node_id(&e.to)?)))
            .collect()
    }

    /// Returns true if the directed edge `from -> to` exists.
    ///
    /// # Errors
    ///
    /// Returns `TraversalError::UnknownNode` if either node is unknown.
    pub fn has_edge(
        &self,
        from: &(impl fmt::Display + ?Sized),
        to: &(impl fmt::Display + ?Sized),
    ) -> SmallWorldResult<bool> {
        Ok(self.adjacency.has_edge(self.node_id(from)?, self.node_id(to)?))
    }

    /// Out-neighbours of `node`, in id order.
    ///
    /// # Errors
    ///
    /// Returns `TraversalError::UnknownNode` if `node` is unknown.
    pub fn neighbourhood(
        &self,
        node: &(impl fmt::Display + ?Sized),
    ) -> SmallWorldResult<Vec<String>> {
        let id = self.node_id(node)?;
        Ok(self
            .adjacency
            .neighbours(id)
            .into_iter()
            .map(|v| self.label_of(v).to_string())
            .collect())
    }

    /// Replaces the context of `node`.
    ///
    /// # Errors
    ///
    /// Returns `TraversalError::UnknownNode` if `node` is unknown.
    pub fn add_context(
        &mut self,
        node: &(impl fmt::Display + ?Sized),
        context: Context,
    ) -> SmallWorldResult<&mut Self> {
        let id = self.node_id(node)?;
        self.contexts[id.index()] = context;
        Ok(self)
    }

    /// Sets `context` on `origin` and on every node reachable from it in at
    /// most `spread` hops. Returns the number of nodes updated.
    ///
    /// # Errors
    ///
    /// Returns `TraversalError::UnknownNode` if `origin` is unknown.
    pub fn add_context_with_spread(
        &mut self,
        origin: &(impl fmt::Display + ?Sized),
        context: &Context,
        spread: usize,
    ) -> SmallWorldResult<usize> {
        let start = self.node_id(origin)?;

        let mut depth: Vec<Option<usize>> = vec![None; self.node_count()];
        depth[start.index()] = Some(0);
        let mut queue = VecDeque::from([start]);
        let mut updated = 0;

        while let Some(u) = queue.pop_front() {
            self.contexts[u.index()] = context.clone();
            updated += 1;

            let d = depth[u.index()].unwrap_or(spread);
            if d >= spread {
                continue;
            }
            for v in self.adjacency.neighbours(u) {
                if depth[v.index()].is_none() {
                    depth[v.index()] = Some(d + 1);
                    queue.push_back(v);
                }
            }
        }
        Ok(updated)
    }

    /// Sets the feature `key` on `node` only if it is not set yet.
    ///
    /// # Errors
    ///
    /// Returns `TraversalError::UnknownNode` if `node` is unknown.
    pub fn add_if_key_not_exists(
        &mut self,
        node: &(impl fmt::Display + ?Sized),
        key: &str,
        value: f64,
    ) -> SmallWorldResult<&mut Self> {
        let id = self.node_id(node)?;
        let ctx = &mut self.contexts[id.index()];
        if !ctx.contains_key(key) {
            ctx.insert(key, value);
        }
        Ok(self)
    }

    /// Current context of `node`.
    ///
    /// # Errors
    ///
    /// Returns `TraversalError::UnknownNode` if `node` is unknown.
    pub fn context(&self, node: &(impl fmt::Display + ?Sized)) -> SmallWorldResult<&Context> {
        let id = self.node_id(node)?;
        Ok(&self.contexts[id.index()])
    }

    /// Contexts of every node along `walk`, in walk order.
    ///
    /// # Errors
    ///
    /// Returns `TraversalError::UnknownNode` if the walk leaves this world.
    pub fn contexts(&self, walk: &Walk) -> SmallWorldResult<Vec<&Context>> {
        walk.iter().map(|node| self.context(node)).collect()
    }

    /// A random walk of exactly `length` nodes starting at `from`, drawn
    /// from the world's own random source.
    ///
    /// Each step moves to a uniformly chosen out-neighbour of the node the
    /// previous step reached.
    ///
    /// # Errors
    ///
    /// - `ValidationError::ZeroWalkLength` if `length` is 0.
    /// - `TraversalError::UnknownNode` if `from` is unknown.
    /// - `TraversalError::NoOutgoingEdges` if the walk reaches a node with
    ///   no out-neighbours before it is complete.
    pub fn random_walk(
        &self,
        length: usize,
        from: &(impl fmt::Display + ?Sized),
    ) -> SmallWorldResult<Walk> {
        let mut rng = self.rng.borrow_mut();
        self.random_walk_with(&mut *rng, length, from)
    }

    /// Like [`World::random_walk`], drawing from a caller-supplied source.
    ///
    /// # Errors
    ///
    /// Same as [`World::random_walk`].
    pub fn random_walk_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        length: usize,
        from: &(impl fmt::Display + ?Sized),
    ) -> SmallWorldResult<Walk> {
        let from = self.node_id(from)?;
        let path = self.sample_path(rng, length, from)?;
        Ok(self.to_walk(&path))
    }

    /// Up to `k` cheapest walks from `from` to `to`, cheapest first.
    ///
    /// Walks may revisit nodes. When `to` cannot be reached the result is
    /// the single one-node walk `[from]`.
    ///
    /// # Errors
    ///
    /// - `ValidationError::ZeroCandidatePaths` if `k` is 0.
    /// - `TraversalError::UnknownNode` if either node is unknown.
    pub fn k_shortest_paths(
        &self,
        k: usize,
        from: &(impl fmt::Display + ?Sized),
        to: &(impl fmt::Display + ?Sized),
    ) -> SmallWorldResult<Vec<Walk>> {
        if k == 0 {
            return Err(ValidationError::ZeroCandidatePaths.into());
        }
        let from = self.node_id(from)?;
        let to = self.node_id(to)?;
        Ok(self
            .candidate_paths(k, from, to)
            .iter()
            .map(|p| self.to_walk(p))
            .collect())
    }

    /// All-pairs hop distances indexed by [`NodeId`]; unreachable pairs
    /// hold [`UNREACHABLE`].
    #[must_use]
    pub fn shortest_path_lengths(&self) -> Vec<Vec<u64>> {
        paths::shortest_path_lengths(&self.adjacency)
    }

    /// Local clustering coefficient of `node` over its closed
    /// neighbourhood; 0 when it has no out-neighbours.
    ///
    /// # Errors
    ///
    /// Returns `TraversalError::UnknownNode` if `node` is unknown.
    pub fn local_clustering_coefficient(
        &self,
        node: &(impl fmt::Display + ?Sized),
    ) -> SmallWorldResult<f64> {
        let id = self.node_id(node)?;
        Ok(metrics::local_clustering_coefficient(&self.adjacency, id))
    }

    /// Local clustering coefficients of every node, in id order.
    #[must_use]
    pub fn local_clustering_coefficients(&self) -> Vec<f64> {
        metrics::local_clustering_coefficients(&self.adjacency)
    }

    /// Mean local clustering coefficient; 0 for an empty world.
    #[must_use]
    pub fn average_clustering_coefficient(&self) -> f64 {
        metrics::average_clustering_coefficient(&self.adjacency)
    }

    /// Candidate paths for a visit: the k-shortest-paths result, or the
    /// one-node path `[from]` if `to` is unreachable.
    pub(crate) fn candidate_paths(&self, k: usize, from: NodeId, to: NodeId) -> Vec<Path> {
        let found = paths::k_shortest_paths(&self.adjacency, k, from, to);
        if found.is_empty() {
            return vec![Path::new(from)];
        }
        found
    }

    pub(crate) fn sample_path<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        length: usize,
        from: NodeId,
    ) -> SmallWorldResult<Path> {
        if length == 0 {
            return Err(ValidationError::ZeroWalkLength.into());
        }
        paths::random_path(&self.adjacency, rng, length, from).map_err(|dead_end| {
            TraversalError::NoOutgoingEdges {
                node: self.label_of(dead_end.0).to_string(),
            }
            .into()
        })
    }

    /// Walk over the world's own random source, from a resolved id.
    pub(crate) fn sample_walk(&self, length: usize, from: NodeId) -> SmallWorldResult<Path> {
        let mut rng = self.rng.borrow_mut();
        self.sample_path(&mut *rng, length, from)
    }

    pub(crate) fn to_walk(&self, path: &Path) -> Walk {
        path.nodes()
            .iter()
            .map(|&id| self.label_of(id).to_string())
            .collect()
    }

    // Ids handed out by this world are always in range.
    pub(crate) fn label_of(&self, id: NodeId) -> &str {
        &self.index.labels()[id.index()]
    }
}

impl Graph for World {
    type Node = String;

    fn nodes(&self) -> Vec<String> {
        self.index.labels().to_vec()
    }

    fn edges(&self) -> Vec<Edge<String>> {
        self.adjacency
            .edges()
            .map(|(from, to)| {
                Edge::new(self.label_of(from).to_string(), self.label_of(to).to_string())
            })
            .collect()
    }
}
