//! Agent builder.
//!
//! The builder collects labels and probabilities as given and resolves
//! them against the world only in [`AgentBuilder::build`], so a failed
//! build never leaves a half-configured agent behind.

use std::collections::BTreeMap;
use std::fmt;

use rand::SeedableRng;
use rand_pcg::Pcg64;
use tracing::debug;

use crate::agent::{Agent, AgentConfig, AgentId};
use crate::error::{SmallWorldResult, ValidationError};
use crate::world::{NodeId, World};

#[derive(Debug, Clone)]
enum TransitionEntry {
    Single { from: String, to: String, p: f64 },
    Distribution(Vec<Vec<f64>>),
}

/// Builder for [`Agent`].
///
/// # Examples
///
/// ```
/// use smallworlds::graph::RingGraph;
/// use smallworlds::{Agent, World};
///
/// let ring = RingGraph::new(2, 0.0).seed(42).with_nodes(10).with_short_edges();
/// let world = World::from_graph(&ring)?.seed(42);
///
/// let mut agent = Agent::builder(&world)
///     .address("0")
///     .address("5")
///     .visit_distribution(vec![vec![0.3, 0.7], vec![0.6, 0.4]])
///     .state("0")
///     .seed(42)
///     .build()?;
///
/// agent.run(5)?;
/// assert_eq!(agent.history().len(), 5);
/// # Ok::<(), smallworlds::SmallWorldError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AgentBuilder<'w> {
    world: &'w World,
    addresses: Vec<String>,
    transitions: Vec<TransitionEntry>,
    state: Option<String>,
    config: AgentConfig,
    seed: Option<u64>,
}

impl<'w> AgentBuilder<'w> {
    /// Creates a builder for an agent living in `world`.
    #[must_use]
    pub fn new(world: &'w World) -> Self {
        Self {
            world,
            addresses: Vec::new(),
            transitions: Vec::new(),
            state: None,
            config: AgentConfig::default(),
            seed: None,
        }
    }

    /// Appends an address. Repeated addresses are kept.
    #[must_use]
    pub fn address(mut self, node: &(impl fmt::Display + ?Sized)) -> Self {
        self.addresses.push(node.to_string());
        self
    }

    /// Appends several addresses in order.
    #[must_use]
    pub fn addresses<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        self.addresses.extend(nodes.into_iter().map(|n| n.to_string()));
        self
    }

    /// Sets the probability of moving to address `to` when at address
    /// `from`. Later entries overwrite earlier ones.
    #[must_use]
    pub fn visit_prob(
        mut self,
        from: &(impl fmt::Display + ?Sized),
        to: &(impl fmt::Display + ?Sized),
        p: f64,
    ) -> Self {
        self.transitions.push(TransitionEntry::Single {
            from: from.to_string(),
            to: to.to_string(),
            p,
        });
        self
    }

    /// Sets the full transition matrix. Row `i`, column `j` is the
    /// probability of moving from the `i`-th to the `j`-th address, in
    /// the order the addresses were added.
    #[must_use]
    pub fn visit_distribution(mut self, distribution: Vec<Vec<f64>>) -> Self {
        self.transitions.push(TransitionEntry::Distribution(distribution));
        self
    }

    /// Sets the node the agent starts on (required).
    #[must_use]
    pub fn state(mut self, node: &(impl fmt::Display + ?Sized)) -> Self {
        self.state = Some(node.to_string());
        self
    }

    /// Set the number of candidate routes per visit (default: 5).
    #[must_use]
    pub fn k(mut self, k: usize) -> Self {
        self.config.k = k;
        self
    }

    /// Set the longest exploration walk (default: 4).
    #[must_use]
    pub fn max_explore_len(mut self, len: usize) -> Self {
        self.config.max_explore_len = len;
        self
    }

    /// Set the exploration probability (default: 0.3).
    #[must_use]
    pub fn explore_prob(mut self, p: f64) -> Self {
        self.config.explore_prob = p;
        self
    }

    /// Replaces all mobility parameters at once.
    #[must_use]
    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    /// Seeds the agent's random source; unseeded agents draw from the OS.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the agent.
    ///
    /// Transition entries are applied in the order they were given, after
    /// every address is known.
    ///
    /// # Errors
    ///
    /// - `ValidationError::MissingField` if no state was set.
    /// - `TraversalError::UnknownNode` if the state or an address is not in
    ///   the world.
    /// - `ValidationError::UnknownAddress` if a transition names a node that
    ///   is not an address.
    /// - `ValidationError::InvalidDistribution` /
    ///   `ValidationError::InvalidDistributionRow` if a matrix does not have
    ///   one row and one column per address.
    /// - `ValidationError::ProbabilityOutOfRange` for a probability outside
    ///   `[0, 1]`.
    /// - Any error from [`AgentConfig::validate`].
    pub fn build(self) -> SmallWorldResult<Agent<'w>> {
        self.config.validate()?;

        let state = self.state.as_deref().ok_or_else(|| ValidationError::MissingField {
            field: "state".to_string(),
        })?;
        let state = self.world.node_id(state)?;

        let addresses = self
            .addresses
            .iter()
            .map(|a| self.world.node_id(a.as_str()))
            .collect::<SmallWorldResult<Vec<_>>>()?;

        let mut transitions: BTreeMap<NodeId, BTreeMap<NodeId, f64>> =
            addresses.iter().map(|&a| (a, BTreeMap::new())).collect();

        for entry in &self.transitions {
            match entry {
                TransitionEntry::Single { from, to, p } => {
                    let from = self.address_id(&transitions, from)?;
                    let to = self.address_id(&transitions, to)?;
                    set_probability(&mut transitions, from, to, *p)?;
                }
                TransitionEntry::Distribution(rows) => {
                    apply_distribution(&mut transitions, &addresses, rows)?;
                }
            }
        }

        let rng = self.seed.map_or_else(Pcg64::from_os_rng, Pcg64::seed_from_u64);
        let id = AgentId::new();
        debug!(
            agent_id = %id,
            addresses = addresses.len(),
            k = self.config.k,
            explore_prob = self.config.explore_prob,
            "agent built"
        );

        Ok(Agent {
            id,
            world: self.world,
            addresses,
            transitions,
            state,
            history: Vec::new(),
            rng,
            config: self.config,
        })
    }

    fn address_id(
        &self,
        transitions: &BTreeMap<NodeId, BTreeMap<NodeId, f64>>,
        label: &str,
    ) -> SmallWorldResult<NodeId> {
        let id = self.world.node_id(label)?;
        if !transitions.contains_key(&id) {
            return Err(ValidationError::UnknownAddress {
                label: label.to_string(),
            }
            .into());
        }
        Ok(id)
    }
}

fn set_probability(
    transitions: &mut BTreeMap<NodeId, BTreeMap<NodeId, f64>>,
    from: NodeId,
    to: NodeId,
    p: f64,
) -> Result<(), ValidationError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(ValidationError::ProbabilityOutOfRange {
            field: "visit_prob".to_string(),
            value: p,
        });
    }
    transitions.entry(from).or_default().insert(to, p);
    Ok(())
}

fn apply_distribution(
    transitions: &mut BTreeMap<NodeId, BTreeMap<NodeId, f64>>,
    addresses: &[NodeId],
    rows: &[Vec<f64>],
) -> Result<(), ValidationError> {
    let expected = addresses.len();
    if rows.len() != expected {
        return Err(ValidationError::InvalidDistribution {
            rows: rows.len(),
            expected,
        });
    }
    if let Some((row, columns)) = rows
        .iter()
        .enumerate()
        .find_map(|(i, r)| (r.len() != expected).then_some((i, r.len())))
    {
        return Err(ValidationError::InvalidDistributionRow {
            row,
            columns,
            expected,
        });
    }

    for (&from, row) in addresses.iter().zip(rows) {
        for (&to, &p) in addresses.iter().zip(row) {
            set_probability(transitions, from, to, p)?;
        }
    }
    Ok(())
}
