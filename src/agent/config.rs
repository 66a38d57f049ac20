//! Agent mobility parameters.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Parameters that shape how an agent moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Number of shortest routes considered when visiting a node.
    pub k: usize,
    /// Longest random walk, in nodes, an exploration may take.
    pub max_explore_len: usize,
    /// Probability of exploring instead of visiting an address.
    pub explore_prob: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            k: 5,
            max_explore_len: 4,
            explore_prob: 0.3,
        }
    }
}

impl AgentConfig {
    /// Validate the configuration.
    ///
    /// Called by the agent builder before any agent exists.
    ///
    /// # Errors
    ///
    /// - `ValidationError::ZeroCandidatePaths` if `k` is 0.
    /// - `ValidationError::ZeroExploreLength` if `max_explore_len` is 0.
    /// - `ValidationError::ProbabilityOutOfRange` if `explore_prob` is NaN
    ///   or outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.k == 0 {
            return Err(ValidationError::ZeroCandidatePaths);
        }
        if self.max_explore_len == 0 {
            return Err(ValidationError::ZeroExploreLength);
        }
        if !(0.0..=1.0).contains(&self.explore_prob) {
            return Err(ValidationError::ProbabilityOutOfRange {
                field: "explore_prob".to_string(),
                value: self.explore_prob,
            });
        }
        Ok(())
    }
}
