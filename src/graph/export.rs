//! D3 force-layout export.
//!
//! Schema:
//!
//! ```text
//! {
//!   "nodes": [{"id": "ID", "group": 1}],
//!   "links": [{"source": "ID", "target": "ID", "value": 1}]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::graph::Graph;

/// A node entry of the export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct D3Node {
    /// Node identity string.
    pub id: String,
    /// Cluster group; always 1 until clustering is exported.
    pub group: u32,
}

/// A link entry of the export document, one per directed edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct D3Link {
    /// Identity of the edge tail.
    pub source: String,
    /// Identity of the edge head.
    pub target: String,
    /// Link weight; always 1 (edges are unweighted).
    pub value: u32,
}

/// A graph rendered for a D3 force-directed layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct D3Document {
    /// All nodes.
    pub nodes: Vec<D3Node>,
    /// All directed edges.
    pub links: Vec<D3Link>,
}

/// Builds the export document for a graph.
pub fn d3_document<G: Graph + ?Sized>(graph: &G) -> D3Document {
    let nodes = graph
        .nodes()
        .into_iter()
        .map(|n| D3Node {
            id: n.to_string(),
            group: 1,
        })
        .collect();

    let links = graph
        .edges()
        .into_iter()
        .map(|e| D3Link {
            source: e.from.to_string(),
            target: e.to.to_string(),
            value: 1,
        })
        .collect();

    D3Document { nodes, links }
}

/// Renders a graph as a D3 JSON value.
///
/// # Errors
///
/// Returns the serializer's error if the document cannot be encoded.
pub fn d3_json<G: Graph + ?Sized>(graph: &G) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(d3_document(graph))
}
