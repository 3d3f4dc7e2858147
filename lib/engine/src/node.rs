//! Flow nodes: placed instances of capsules.
//!
//! Each node has:
//! - An id unique within the flow (authored by the external editor)
//! - A reference to its capsule
//! - A position (irrelevant to execution, kept for the editor)
//! - An optional config object supplying values for inputs not fed by a
//!   connection

use crate::capsule::Capsule;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

/// A unique identifier for a node within a flow.
///
/// Node ids come from the external editor as plain strings; the newtype
/// keeps them from being confused with port or capsule ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Creates a node id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Canvas position of a node, kept for the external editor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One placed instance of a capsule inside a flow.
#[derive(Clone)]
pub struct Node {
    /// Unique identifier within the flow.
    pub id: NodeId,
    /// Human-readable name.
    pub name: String,
    /// The capsule this node instantiates.
    pub capsule: Arc<dyn Capsule>,
    /// Canvas position.
    pub position: Position,
    /// Static configuration, passed to the capsule alongside the resolved
    /// inputs. May be mutated between executions.
    pub config: JsonValue,
}

impl Node {
    /// Creates a new node for the given capsule.
    #[must_use]
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, capsule: Arc<dyn Capsule>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            capsule,
            position: Position::default(),
            config: JsonValue::Null,
        }
    }

    /// Sets the canvas position.
    #[must_use]
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    /// Sets the static configuration object.
    #[must_use]
    pub fn with_config(mut self, config: JsonValue) -> Self {
        self.config = config;
        self
    }

    /// Returns true if the config carries a non-empty value under the
    /// given port id.
    ///
    /// Null values and empty strings do not count: they cannot satisfy a
    /// required input.
    #[must_use]
    pub fn has_config_value(&self, port_id: &str) -> bool {
        match self.config.get(port_id) {
            None | Some(JsonValue::Null) => false,
            Some(JsonValue::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("capsule", &self.capsule.id())
            .field("position", &self.position)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capsule::CapsuleDescriptor;
    use serde_json::json;

    fn note_capsule() -> Arc<dyn Capsule> {
        Arc::new(CapsuleDescriptor::new("note", "Sticky Note"))
    }

    #[test]
    fn node_id_display_is_plain() {
        let id = NodeId::from("X");
        assert_eq!(id.to_string(), "X");
        assert_eq!(id.as_str(), "X");
    }

    #[test]
    fn node_defaults() {
        let node = Node::new("n1", "Note", note_capsule());
        assert_eq!(node.id, NodeId::from("n1"));
        assert_eq!(node.position, Position::default());
        assert_eq!(node.config, JsonValue::Null);
    }

    #[test]
    fn config_value_presence() {
        let node = Node::new("n1", "Note", note_capsule()).with_config(json!({
            "amount": 42,
            "label": "",
            "unset": null,
        }));

        assert!(node.has_config_value("amount"));
        assert!(!node.has_config_value("label")); // empty string
        assert!(!node.has_config_value("unset")); // null
        assert!(!node.has_config_value("missing"));
    }

    #[test]
    fn node_id_serde_roundtrip() {
        let id = NodeId::from("transform-1");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"transform-1\"");
        let parsed: NodeId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(id, parsed);
    }
}
