//! Flow definition types.
//!
//! A flow is the complete user-authored graph: metadata, a set of nodes
//! (ids unique), and a set of connections referencing those nodes. A flow
//! must be acyclic to execute, but that is discovered at validation and
//! scheduling time, not enforced here.

use crate::connection::Connection;
use crate::node::{Node, NodeId};
use chrono::{DateTime, Utc};
use flowcap_core::FlowId;
use serde::{Deserialize, Serialize};

/// Metadata for a flow definition. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowMetadata {
    /// Human-readable name for this flow.
    pub name: String,
    /// Description of what this flow does.
    pub description: Option<String>,
    /// Semantic version of this flow definition.
    pub version: String,
    /// Author, if known.
    pub author: Option<String>,
    /// Tags for organization/filtering.
    pub tags: Vec<String>,
    /// When this flow was created.
    pub created_at: DateTime<Utc>,
    /// When this flow was last updated.
    pub updated_at: DateTime<Utc>,
}

impl FlowMetadata {
    /// Creates new metadata with default values.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            description: None,
            version: "0.1.0".to_string(),
            author: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the author.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Adds a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// The complete graph of nodes and connections representing one
/// user-authored program.
///
/// Flows arrive as plain data from whatever assembles them (the visual
/// editor or a programmatic builder); the engine requires no construction
/// API beyond this shape.
#[derive(Debug, Clone)]
pub struct Flow {
    /// Unique identifier for this flow.
    pub id: FlowId,
    /// Flow metadata.
    pub metadata: FlowMetadata,
    /// The nodes, ids unique within the flow. Declaration order is the
    /// scheduler's tie-break order.
    pub nodes: Vec<Node>,
    /// The connections between node ports.
    pub connections: Vec<Connection>,
}

impl Flow {
    /// Creates a new empty flow with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: FlowId::new(),
            metadata: FlowMetadata::new(name),
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Creates a flow with a specific ID.
    #[must_use]
    pub fn with_id(id: FlowId, name: impl Into<String>) -> Self {
        Self {
            id,
            metadata: FlowMetadata::new(name),
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Adds a node.
    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Adds a connection.
    pub fn add_connection(&mut self, connection: Connection) {
        self.connections.push(connection);
    }

    /// Returns the flow name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Returns the node with the given id, if any.
    #[must_use]
    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == node_id)
    }

    /// Returns the connection feeding the given input port, if any.
    #[must_use]
    pub fn connection_into(&self, node_id: &NodeId, port_id: &str) -> Option<&Connection> {
        self.connections
            .iter()
            .find(|c| c.targets(node_id, port_id))
    }

    /// Returns every connection terminating at the given node.
    pub fn connections_into(&self, node_id: &NodeId) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |c| &c.to_node == node_id)
    }

    /// Marks the flow as updated (bumps the updated_at timestamp).
    pub fn touch(&mut self) {
        self.metadata.updated_at = Utc::now();
    }
}
