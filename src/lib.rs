//! # smallworlds - Agents on small-world graphs
//!
//! smallworlds builds contextual graphs ("worlds") from small-world graph
//! generators and lets agents move through them, producing a recorded
//! sequence of walks that can drive simulations.
//!
//! ## Core Concepts
//!
//! - **Graph**: anything that can list its nodes and directed edges; ring
//!   (Watts–Strogatz), random and grid (Kleinberg) generators are included
//! - **World**: a mutable snapshot of a graph with per-node feature vectors,
//!   random walks, k-shortest-paths and clustering metrics
//! - **Agent**: a mobile entity with addresses and a transition table that
//!   either visits an address or explores on every step
//! - **Walk**: the route an agent took, in node identities
//!
//! ## Usage
//!
//! ```
//! use smallworlds::graph::GridGraph;
//! use smallworlds::{Agent, World};
//!
//! let grid = GridGraph::new(10, 10).seed(42).with_all_nodes().with_short_edges(1);
//! let world = World::from_graph(&grid)?.seed(42);
//!
//! let mut agent = Agent::builder(&world)
//!     .address("(0,0)")
//!     .address("(9,9)")
//!     .visit_distribution(vec![vec![0.3, 0.7], vec![0.6, 0.4]])
//!     .state("(0,0)")
//!     .seed(42)
//!     .build()?;
//!
//! for walk in agent.run(5)? {
//!     let contexts = world.contexts(walk)?;
//!     assert_eq!(contexts.len(), walk.len());
//! }
//! # Ok::<(), smallworlds::SmallWorldError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod agent;
pub mod error;
pub mod graph;
pub mod stats;
pub mod world;

// Re-export primary types at crate root for convenience
pub use agent::{Agent, AgentBuilder, AgentConfig, AgentId};
pub use error::{SmallWorldError, SmallWorldResult, TraversalError, ValidationError};
pub use graph::{Edge, Graph};
pub use world::{Context, NodeId, Walk, World, UNREACHABLE};
