//! Agents: mobile entities that move through a [`World`].
//!
//! An agent has a list of addresses (nodes it cares about), a transition
//! table between those addresses, and a current state. Every step either
//! explores the world with a random walk or travels to an address along
//! one of the `k` shortest routes. Each step appends exactly one [`Walk`]
//! to the agent's history and moves the state to the walk's last node.
//!
//! Agents read their world but never change it.

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{SmallWorldResult, ValidationError};
use crate::stats;
use crate::world::{NodeId, Path, Walk, World};

mod builder;
mod config;

pub use builder::AgentBuilder;
pub use config::AgentConfig;

/// Unique identifier of an agent, used to tell agents apart in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(Uuid);

impl AgentId {
    /// Creates a new random agent ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Visit,
    Explore,
}

impl Step {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Visit => "visit",
            Self::Explore => "explore",
        }
    }
}

/// A mobile entity bound to one world.
///
/// Built with [`Agent::builder`]; see [`AgentBuilder`] for an example.
/// A clone continues from the same state, history and random stream
/// under a new [`AgentId`].
#[derive(Debug)]
pub struct Agent<'w> {
    id: AgentId,
    world: &'w World,
    addresses: Vec<NodeId>,
    transitions: BTreeMap<NodeId, BTreeMap<NodeId, f64>>,
    state: NodeId,
    history: Vec<Walk>,
    rng: Pcg64,
    config: AgentConfig,
}

impl Clone for Agent<'_> {
    fn clone(&self) -> Self {
        Self {
            id: AgentId::new(),
            world: self.world,
            addresses: self.addresses.clone(),
            transitions: self.transitions.clone(),
            state: self.state,
            history: self.history.clone(),
            rng: self.rng.clone(),
            config: self.config,
        }
    }
}

impl<'w> Agent<'w> {
    /// Starts building an agent that lives in `world`.
    #[must_use]
    pub fn builder(world: &'w World) -> AgentBuilder<'w> {
        AgentBuilder::new(world)
    }

    /// Travels from the current state to `to` along one of the `k`
    /// shortest routes.
    ///
    /// With several candidates the route is drawn uniformly from all but
    /// the last-ranked one. When `to` cannot be reached the agent stays
    /// put and records the one-node walk `[state]`.
    ///
    /// # Errors
    ///
    /// Returns `TraversalError::UnknownNode` if `to` is not in the world.
    pub fn visit(&mut self, to: &(impl fmt::Display + ?Sized)) -> SmallWorldResult<&Walk> {
        let to = self.world.node_id(to)?;
        Ok(self.visit_id(to))
    }

    /// Takes a random walk of uniformly drawn length in
    /// `1..=max_explore_len` from the current state.
    ///
    /// # Errors
    ///
    /// Returns `TraversalError::NoOutgoingEdges` if the walk gets stuck;
    /// the agent is left unchanged.
    pub fn explore(&mut self) -> SmallWorldResult<&Walk> {
        let world = self.world;
        let length = self.rng.random_range(1..=self.config.max_explore_len);
        let path = world.sample_walk(length, self.state)?;
        Ok(self.record(Step::Explore, &path))
    }

    /// One simulation step.
    ///
    /// With probability `explore_prob` the agent explores. Otherwise, away
    /// from its addresses it visits one of them chosen uniformly; at an
    /// address it draws the next address from that address's transition
    /// row, falling back to a uniform choice when the row is empty.
    ///
    /// # Errors
    ///
    /// - `ValidationError::NoAddresses` if the agent must visit an address
    ///   but has none.
    /// - Any error from [`Agent::explore`].
    pub fn visit_or_explore(&mut self) -> SmallWorldResult<&Walk> {
        if self.rng.random::<f64>() < self.config.explore_prob {
            return self.explore();
        }
        if self.addresses.is_empty() {
            return Err(ValidationError::NoAddresses.into());
        }

        let next = if self.addresses.contains(&self.state) {
            let (targets, probs): (Vec<NodeId>, Vec<f64>) = self
                .transitions
                .get(&self.state)
                .map(|row| row.iter().map(|(&to, &p)| (to, p)).unzip())
                .unwrap_or_default();
            match stats::pick_from_discrete_dist(&mut self.rng, &probs) {
                Some(i) => targets[i],
                None => self.random_address(),
            }
        } else {
            self.random_address()
        };

        Ok(self.visit_id(next))
    }

    /// Runs `steps` simulation steps and returns the full history.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step and returns its error; walks from
    /// earlier steps stay in the history.
    pub fn run(&mut self, steps: usize) -> SmallWorldResult<&[Walk]> {
        for _ in 0..steps {
            self.visit_or_explore()?;
        }
        Ok(&self.history)
    }

    /// The agent's identifier.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// The world the agent lives in.
    #[must_use]
    pub const fn world(&self) -> &'w World {
        self.world
    }

    /// Mobility parameters.
    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Addresses in the order they were added, repeats included.
    #[must_use]
    pub fn addresses(&self) -> Vec<&'w str> {
        self.addresses.iter().map(|&a| self.world.label_of(a)).collect()
    }

    /// The node the agent is on.
    #[must_use]
    pub fn state(&self) -> &'w str {
        self.world.label_of(self.state)
    }

    /// Every walk taken so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Walk] {
        &self.history
    }

    /// The most recent walk.
    #[must_use]
    pub fn last_walk(&self) -> Option<&Walk> {
        self.history.last()
    }

    /// Probability of moving from address `from` to address `to`, if set.
    #[must_use]
    pub fn visit_prob(
        &self,
        from: &(impl fmt::Display + ?Sized),
        to: &(impl fmt::Display + ?Sized),
    ) -> Option<f64> {
        let from = self.world.node_id(from).ok()?;
        let to = self.world.node_id(to).ok()?;
        self.transitions.get(&from)?.get(&to).copied()
    }

    /// Transition row of `node` in id order; empty if `node` is not an
    /// address.
    #[must_use]
    pub fn transitions_from(&self, node: &(impl fmt::Display + ?Sized)) -> Vec<(&'w str, f64)> {
        let Ok(id) = self.world.node_id(node) else {
            return Vec::new();
        };
        self.transitions
            .get(&id)
            .map(|row| {
                row.iter()
                    .map(|(&to, &p)| (self.world.label_of(to), p))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn random_address(&mut self) -> NodeId {
        self.addresses[self.rng.random_range(0..self.addresses.len())]
    }

    fn visit_id(&mut self, to: NodeId) -> &Walk {
        let world = self.world;
        let candidates = world.candidate_paths(self.config.k, self.state, to);
        let pick = if candidates.len() > 1 {
            self.rng.random_range(0..candidates.len() - 1)
        } else {
            0
        };
        self.record(Step::Visit, &candidates[pick])
    }

    fn record(&mut self, step: Step, path: &Path) -> &Walk {
        let walk = self.world.to_walk(path);
        self.state = path.end();
        debug!(
            agent_id = %self.id,
            action = step.as_str(),
            len = walk.len(),
            state = self.world.label_of(self.state),
            "agent step"
        );
        self.history.push(walk);
        &self.history[self.history.len() - 1]
    }
}
