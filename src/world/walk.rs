//! Walks: routes expressed in node identities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An ordered list of visited node identities.
///
/// Walks handed out by a world are never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Walk(Vec<String>);

impl Walk {
    /// Creates a walk from node identities.
    #[must_use]
    pub fn new(nodes: Vec<String>) -> Self {
        Self(nodes)
    }

    /// The first visited node.
    #[must_use]
    pub fn start(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// The last visited node.
    #[must_use]
    pub fn end(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Number of visited nodes (not hops).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing was visited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The same walk, travelled backwards.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self(self.0.iter().rev().cloned().collect())
    }

    /// Visited node identities in order.
    #[must_use]
    pub fn nodes(&self) -> &[String] {
        &self.0
    }

    /// Iterates the visited node identities.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Walk {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Walk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(" -> "))
    }
}
