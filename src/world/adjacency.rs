//! Dense directed adjacency matrix over node ids.

use crate::world::index::NodeId;

/// `n`×`n` boolean matrix stored row-major; cell `(i, j)` is set when the
/// directed edge `i -> j` exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AdjacencyMatrix {
    n: usize,
    cells: Vec<bool>,
}

impl AdjacencyMatrix {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            n,
            cells: vec![false; n * n],
        }
    }

    /// Builds a matrix from rows of 0/1 values. Used by fixtures.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: &[&[u8]]) -> Self {
        let n = rows.len();
        let mut m = Self::new(n);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), n, "adjacency rows must be square");
            for (j, &cell) in row.iter().enumerate() {
                if cell != 0 {
                    m.set(NodeId::new(i), NodeId::new(j));
                }
            }
        }
        m
    }

    pub(crate) const fn len(&self) -> usize {
        self.n
    }

    pub(crate) fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.cells[from.index() * self.n + to.index()]
    }

    pub(crate) fn set(&mut self, from: NodeId, to: NodeId) {
        self.cells[from.index() * self.n + to.index()] = true;
    }

    pub(crate) fn clear(&mut self, from: NodeId, to: NodeId) {
        self.cells[from.index() * self.n + to.index()] = false;
    }

    pub(crate) fn row(&self, from: NodeId) -> &[bool] {
        let start = from.index() * self.n;
        &self.cells[start..start + self.n]
    }

    /// Out-neighbours of `from` in ascending id order.
    pub(crate) fn neighbours(&self, from: NodeId) -> Vec<NodeId> {
        self.row(from)
            .iter()
            .enumerate()
            .filter_map(|(j, &set)| set.then_some(NodeId::new(j)))
            .collect()
    }

    /// Every set cell, scanned row-major.
    pub(crate) fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(cell, &set)| {
            set.then(|| (NodeId::new(cell / self.n), NodeId::new(cell % self.n)))
        })
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.cells.iter().filter(|&&set| set).count()
    }
}
