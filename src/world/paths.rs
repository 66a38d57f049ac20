//! Path engine: random walks, k-shortest-paths enumeration, and all-pairs
//! hop distances over a dense adjacency matrix.
//!
//! Everything here works on [`NodeId`]s; the world facade translates to
//! and from node identities.

use rand::Rng;
use tracing::trace;

use crate::world::adjacency::AdjacencyMatrix;
use crate::world::index::NodeId;

/// Distance reported between nodes that cannot reach each other.
pub const UNREACHABLE: u64 = u32::MAX as u64;

/// A route during search. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Path(Vec<NodeId>);

impl Path {
    pub(crate) fn new(start: NodeId) -> Self {
        Self(vec![start])
    }

    /// Node count, not hop count.
    pub(crate) fn cost(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn end(&self) -> NodeId {
        // Paths are built from a start node and only grow.
        self.0[self.0.len() - 1]
    }

    /// A copy of this path with `next` appended.
    pub(crate) fn extended(&self, next: NodeId) -> Self {
        let mut nodes = Vec::with_capacity(self.0.len() + 1);
        nodes.extend_from_slice(&self.0);
        nodes.push(next);
        Self(nodes)
    }

    fn push(&mut self, next: NodeId) {
        self.0.push(next);
    }

    pub(crate) fn nodes(&self) -> &[NodeId] {
        &self.0
    }
}

/// Ordered collection of distinct paths.
#[derive(Debug, Default)]
struct PathSet(Vec<Path>);

impl PathSet {
    fn contains(&self, p: &Path) -> bool {
        self.0.iter().any(|q| q == p)
    }

    /// Appends `p` unless an identical path is already present.
    fn add(&mut self, p: Path) {
        if !self.contains(&p) {
            self.0.push(p);
        }
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn into_vec(self) -> Vec<Path> {
        self.0
    }
}

/// Binary min-heap of paths keyed on cost.
///
/// Push sifts up, pop swaps the root with the last slot and sifts down,
/// always comparing with a strict `<`. Among equal-cost paths this fixes
/// the order in which the k-shortest-paths search sees them, which in turn
/// fixes which paths it returns.
#[derive(Debug, Default)]
struct PathQueue {
    heap: Vec<Path>,
}

impl PathQueue {
    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn less(&self, i: usize, j: usize) -> bool {
        self.heap[i].cost() < self.heap[j].cost()
    }

    fn push(&mut self, p: Path) {
        self.heap.push(p);
        let mut j = self.heap.len() - 1;
        while j > 0 {
            let i = (j - 1) / 2;
            if !self.less(j, i) {
                break;
            }
            self.heap.swap(i, j);
            j = i;
        }
    }

    fn pop(&mut self) -> Option<Path> {
        let n = self.heap.len().checked_sub(1)?;
        self.heap.swap(0, n);

        let mut i = 0;
        loop {
            let left = 2 * i + 1;
            if left >= n {
                break;
            }
            let mut j = left;
            if left + 1 < n && self.less(left + 1, left) {
                j = left + 1;
            }
            if !self.less(j, i) {
                break;
            }
            self.heap.swap(i, j);
            i = j;
        }

        self.heap.pop()
    }
}

/// Returned when a walk reaches a node without out-neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DeadEnd(pub(crate) NodeId);

/// Samples a path of exactly `length` nodes starting at `from`.
///
/// Every step picks a uniform out-neighbour of the node reached by the
/// previous step. `length` must be at least 1.
pub(crate) fn random_path<R: Rng + ?Sized>(
    adjacency: &AdjacencyMatrix,
    rng: &mut R,
    length: usize,
    from: NodeId,
) -> Result<Path, DeadEnd> {
    let mut path = Path::new(from);
    let mut current = from;

    for _ in 1..length {
        let neighbours = adjacency.neighbours(current);
        if neighbours.is_empty() {
            return Err(DeadEnd(current));
        }
        current = neighbours[rng.random_range(0..neighbours.len())];
        path.push(current);
    }
    Ok(path)
}

/// Enumerates up to `k` cheapest paths from `src` to `target`.
///
/// Paths are expanded cheapest first. Every pop increments the visit count
/// of the popped path's end node, and a node is only expanded while its
/// count is at most `k`. The search stops once `target` has been reached
/// `k` times or nothing is left to expand. Returned paths may revisit
/// nodes; identical paths are reported once.
///
/// An empty result means `target` is unreachable from `src`.
pub(crate) fn k_shortest_paths(
    adjacency: &AdjacencyMatrix,
    k: usize,
    src: NodeId,
    target: NodeId,
) -> Vec<Path> {
    let mut queue = PathQueue::default();
    let mut found = PathSet::default();
    let mut count = vec![0usize; adjacency.len()];
    let mut pops = 0usize;

    queue.push(Path::new(src));

    while let Some(p) = queue.pop() {
        pops += 1;
        let u = p.end();
        count[u.index()] += 1;

        if count[u.index()] <= k {
            for v in adjacency.neighbours(u) {
                queue.push(p.extended(v));
            }
        }

        if u == target {
            found.add(p);
        }

        if count[target.index()] >= k {
            break;
        }
    }

    trace!(
        src = src.index(),
        target = target.index(),
        k,
        pops,
        found = found.len(),
        "k-shortest-paths search finished"
    );
    found.into_vec()
}

/// All-pairs hop distances (Floyd–Warshall).
///
/// `dist[i][i]` is 0, `dist[i][j]` is 1 for an edge, and [`UNREACHABLE`]
/// when no route exists.
pub(crate) fn shortest_path_lengths(adjacency: &AdjacencyMatrix) -> Vec<Vec<u64>> {
    let n = adjacency.len();
    let mut dist: Vec<Vec<u64>> = (0..n)
        .map(|i| {
            let row = adjacency.row(NodeId::new(i));
            (0..n)
                .map(|j| {
                    if i == j {
                        0
                    } else if row[j] {
                        1
                    } else {
                        UNREACHABLE
                    }
                })
                .collect()
        })
        .collect();

    for k in 0..n {
        for i in 0..n {
            let via = dist[i][k];
            if via >= UNREACHABLE {
                continue;
            }
            for j in 0..n {
                let candidate = via + dist[k][j];
                if candidate < dist[i][j] {
                    dist[i][j] = candidate;
                }
            }
        }
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn id(i: usize) -> NodeId {
        NodeId::new(i)
    }

    fn path(ids: &[usize]) -> Path {
        Path(ids.iter().copied().map(NodeId::new).collect())
    }

    fn complete4() -> AdjacencyMatrix {
        AdjacencyMatrix::from_rows(&[&[0, 1, 1, 1], &[1, 0, 1, 1], &[1, 1, 0, 1], &[1, 1, 1, 0]])
    }

    /// Ring lattice: each node linked to `half` neighbours on either side.
    fn ring(n: usize, half: usize) -> AdjacencyMatrix {
        let mut m = AdjacencyMatrix::new(n);
        for u in 0..n {
            for d in 1..=half {
                let v = (u + d) % n;
                m.set(id(u), id(v));
                m.set(id(v), id(u));
            }
        }
        m
    }

    #[test]
    fn test_path_extended() {
        let p = Path::new(id(0));
        let q = p.extended(id(1));

        assert_eq!(q, path(&[0, 1]));
        assert_eq!(q.cost(), 2);
        assert_eq!(p.cost(), 1);
        assert_eq!(q.end(), id(1));
        assert_eq!(q.nodes(), &[id(0), id(1)]);
    }

    #[test]
    fn test_path_set_dedups() {
        let p = Path::new(id(0));
        let q = p.extended(id(1));
        let r = q.extended(id(2));

        let mut set = PathSet::default();
        set.add(p.clone());
        set.add(p);
        set.add(q.clone());
        set.add(q.clone());

        assert_eq!(set.len(), 2);
        assert!(set.contains(&q));
        assert!(!set.contains(&r));
    }

    #[test]
    fn test_queue_pops_cheapest_first() {
        let mut queue = PathQueue::default();
        queue.push(path(&[0, 1, 2]));
        queue.push(path(&[0]));
        queue.push(path(&[0, 1]));

        assert_eq!(queue.pop().map(|p| p.cost()), Some(1));
        assert_eq!(queue.pop().map(|p| p.cost()), Some(2));
        assert_eq!(queue.pop().map(|p| p.cost()), Some(3));
        assert!(queue.pop().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_k_shortest_complete_graph() {
        let found = k_shortest_paths(&complete4(), 2, id(0), id(2));
        assert_eq!(found, vec![path(&[0, 2]), path(&[0, 3, 2])]);
    }

    #[test]
    fn test_k_shortest_same_node() {
        let found = k_shortest_paths(&complete4(), 1, id(0), id(0));
        assert_eq!(found, vec![path(&[0])]);
    }

    #[test]
    fn test_k_shortest_revisits_nodes() {
        // Two nodes linked both ways: the second path bounces back and forth.
        let found = k_shortest_paths(&ring(2, 1), 2, id(1), id(0));
        assert_eq!(found, vec![path(&[1, 0]), path(&[1, 0, 1, 0])]);
    }

    #[test]
    fn test_k_shortest_ring_neighbours() {
        let found = k_shortest_paths(&ring(5, 2), 2, id(0), id(1));
        assert_eq!(found, vec![path(&[0, 1]), path(&[0, 4, 1])]);
    }

    #[test]
    fn test_k_shortest_unreachable() {
        let m = AdjacencyMatrix::from_rows(&[&[0, 1, 0], &[1, 0, 0], &[0, 0, 0]]);
        assert!(k_shortest_paths(&m, 3, id(0), id(2)).is_empty());
    }

    #[test]
    fn test_k_shortest_paths_are_connected() {
        let m = ring(10, 3);
        let found = k_shortest_paths(&m, 4, id(0), id(5));
        assert_eq!(found.len(), 4);
        for p in &found {
            assert_eq!(p.end(), id(5));
            for pair in p.nodes().windows(2) {
                assert!(m.has_edge(pair[0], pair[1]));
            }
        }
    }

    #[test]
    fn test_random_path_lengths() {
        let mut rng = Pcg64::seed_from_u64(42);
        let m = complete4();
        assert_eq!(random_path(&m, &mut rng, 3, id(0)).unwrap().cost(), 3);
        assert_eq!(random_path(&m, &mut rng, 4, id(0)).unwrap().cost(), 4);
        assert_eq!(random_path(&m, &mut rng, 1, id(0)).unwrap(), path(&[0]));
    }

    #[test]
    fn test_random_path_moves_from_last_node() {
        // A directed chain forces every step to leave the previous node.
        let m = AdjacencyMatrix::from_rows(&[
            &[0, 1, 0, 0],
            &[0, 0, 1, 0],
            &[0, 0, 0, 1],
            &[1, 0, 0, 0],
        ]);
        let mut rng = Pcg64::seed_from_u64(1);
        let p = random_path(&m, &mut rng, 6, id(0)).unwrap();
        assert_eq!(p, path(&[0, 1, 2, 3, 0, 1]));
    }

    #[test]
    fn test_random_path_dead_end() {
        let m = AdjacencyMatrix::from_rows(&[&[0, 1], &[0, 0]]);
        let mut rng = Pcg64::seed_from_u64(1);
        assert_eq!(random_path(&m, &mut rng, 3, id(0)), Err(DeadEnd(id(1))));
        assert_eq!(random_path(&m, &mut rng, 2, id(1)), Err(DeadEnd(id(1))));
    }

    #[test]
    fn test_shortest_path_lengths_ring() {
        let sum = |m: &AdjacencyMatrix| -> u64 { shortest_path_lengths(m).iter().flatten().sum() };
        assert_eq!(sum(&ring(2, 1)), 2);
        assert_eq!(sum(&ring(3, 1)), 6);
        assert_eq!(sum(&ring(5, 1)), 30);
    }

    #[test]
    fn test_shortest_path_lengths_unreachable() {
        let m = AdjacencyMatrix::from_rows(&[&[0, 1, 0], &[0, 0, 0], &[0, 0, 0]]);
        let d = shortest_path_lengths(&m);
        assert_eq!(d[0][1], 1);
        assert_eq!(d[1][0], UNREACHABLE);
        assert_eq!(d[0][2], UNREACHABLE);
        assert_eq!(d[2][2], 0);
    }
}
