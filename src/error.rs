//! Error types for smallworlds.
//!
//! All errors are strongly typed using thiserror so callers can match
//! on the failure family (bad configuration vs. an impossible traversal)
//! instead of parsing messages.

use thiserror::Error;

/// Validation errors raised while configuring worlds and agents.
///
/// These are the "invalid configuration" failures: they are reported
/// before any simulation step runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Visit distribution has {rows} rows, expected one per address ({expected})")]
    InvalidDistribution {
        rows: usize,
        expected: usize,
    },

    #[error("Visit distribution row {row} has {columns} columns, expected {expected}")]
    InvalidDistributionRow {
        row: usize,
        columns: usize,
        expected: usize,
    },

    #[error("Probability '{field}' = {value} is out of range [0.0, 1.0]")]
    ProbabilityOutOfRange {
        field: String,
        value: f64,
    },

    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },

    #[error("Number of candidate paths (k) must be at least 1")]
    ZeroCandidatePaths,

    #[error("Walk length must be at least 1")]
    ZeroWalkLength,

    #[error("Maximum explore length must be at least 1")]
    ZeroExploreLength,

    #[error("Node '{label}' is not one of the agent's addresses")]
    UnknownAddress {
        label: String,
    },

    #[error("Agent has no addresses to visit")]
    NoAddresses,
}

/// Errors raised while reading or traversing a world.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraversalError {
    #[error("Unknown node: {label}")]
    UnknownNode {
        label: String,
    },

    #[error("Unknown node id: {index}")]
    UnknownNodeId {
        index: usize,
    },

    #[error("Node {node} has no outgoing edges")]
    NoOutgoingEdges {
        node: String,
    },
}

/// Top-level error type for smallworlds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SmallWorldError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Traversal error: {0}")]
    Traversal(#[from] TraversalError),
}

impl SmallWorldError {
    /// Shorthand for an unknown node label.
    #[must_use]
    pub fn unknown_node(label: impl Into<String>) -> Self {
        Self::Traversal(TraversalError::UnknownNode {
            label: label.into(),
        })
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a traversal error.
    #[must_use]
    pub const fn is_traversal(&self) -> bool {
        matches!(self, Self::Traversal(_))
    }

    /// Returns true if an operation referenced a node the world never saw.
    #[must_use]
    pub const fn is_unknown_node(&self) -> bool {
        matches!(
            self,
            Self::Traversal(
                TraversalError::UnknownNode { .. } | TraversalError::UnknownNodeId { .. }
            )
        )
    }

    /// Returns true if a walk ran into a node without neighbours.
    #[must_use]
    pub const fn is_dead_end(&self) -> bool {
        matches!(self, Self::Traversal(TraversalError::NoOutgoingEdges { .. }))
    }
}

/// Result type alias for smallworlds operations.
pub type SmallWorldResult<T> = Result<T, SmallWorldError>;
