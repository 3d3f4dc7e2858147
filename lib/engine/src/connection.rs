//! Connections: directed data edges between node ports.
//!
//! A connection carries data from an output port on the source node to an
//! input port on the target node. At most one connection may feed a given
//! `(to_node, to_port)` pair; the validator reports violations, the engine
//! never auto-corrects them.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};

/// A directed, typed data edge between two node ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// The source node.
    pub from_node: NodeId,
    /// The output port on the source node's capsule.
    pub from_port: String,
    /// The target node.
    pub to_node: NodeId,
    /// The input port on the target node's capsule.
    pub to_port: String,
}

impl Connection {
    /// Creates a new connection.
    #[must_use]
    pub fn new(
        from_node: impl Into<NodeId>,
        from_port: impl Into<String>,
        to_node: impl Into<NodeId>,
        to_port: impl Into<String>,
    ) -> Self {
        Self {
            from_node: from_node.into(),
            from_port: from_port.into(),
            to_node: to_node.into(),
            to_port: to_port.into(),
        }
    }

    /// Returns true if this connection terminates at the given port.
    #[must_use]
    pub fn targets(&self, node_id: &NodeId, port_id: &str) -> bool {
        &self.to_node == node_id && self.to_port == port_id
    }
}
