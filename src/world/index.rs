//! Identity index: dense ids for external node identities.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TraversalError;

/// Dense handle of a node inside one world, in `[0, n)`.
///
/// Ids are assigned in the order nodes were enumerated when the world was
/// built, and are only meaningful for that world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// Wraps a raw dense index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw dense index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Two-way table between node labels and dense ids. Built once.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeIndex {
    labels: Vec<String>,
    ids: HashMap<String, NodeId>,
}

impl NodeIndex {
    /// Registers `label`, returning its id. A label seen before keeps the
    /// id it was first given.
    pub(crate) fn register(&mut self, label: String) -> NodeId {
        if let Some(&id) = self.ids.get(&label) {
            return id;
        }
        let id = NodeId(self.labels.len());
        self.ids.insert(label.clone(), id);
        self.labels.push(label);
        id
    }

    pub(crate) fn len(&self) -> usize {
        self.labels.len()
    }

    pub(crate) fn id(&self, label: &str) -> Result<NodeId, TraversalError> {
        self.ids
            .get(label)
            .copied()
            .ok_or_else(|| TraversalError::UnknownNode {
                label: label.to_string(),
            })
    }

    pub(crate) fn label(&self, id: NodeId) -> Result<&str, TraversalError> {
        self.labels
            .get(id.0)
            .map(String::as_str)
            .ok_or(TraversalError::UnknownNodeId { index: id.0 })
    }

    pub(crate) fn labels(&self) -> &[String] {
        &self.labels
    }
}
