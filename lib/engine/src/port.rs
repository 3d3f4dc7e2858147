//! Port system for capsules.
//!
//! Ports are named connection points on capsules. Each port carries a
//! `PortType` naming the category of data it accepts (input) or produces
//! (output).
//!
//! Connections between ports are valid if their types are compatible.
//! Compatibility is directional: a `user` output may feed an `object`
//! input, but not the other way around.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of data that can cross a connection.
///
/// A closed enumeration plus the wildcard `Any`. The domain-specific kinds
/// (`User`, `Auth`, `Data`, ...) come from the capsule catalog: capsules
/// wrap external services and tag their ports with the shape of payload the
/// service consumes or produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    File,
    User,
    Auth,
    Data,
    Message,
    Event,
    Job,
    Email,
    /// Wildcard: compatible with every other type in either direction.
    Any,
}

impl PortType {
    /// Every known port type, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::String,
        Self::Number,
        Self::Boolean,
        Self::Object,
        Self::Array,
        Self::File,
        Self::User,
        Self::Auth,
        Self::Data,
        Self::Message,
        Self::Event,
        Self::Job,
        Self::Email,
        Self::Any,
    ];

    /// The static adjacency table: which target types this type may feed,
    /// beyond itself. Directional by construction.
    const fn feeds(self) -> &'static [Self] {
        match self {
            Self::User => &[Self::Object],
            Self::Auth => &[Self::String],
            Self::Data => &[Self::Object, Self::Array],
            Self::Message | Self::Event | Self::Job | Self::Email => &[Self::Object],
            _ => &[],
        }
    }

    /// Checks whether a value of this type may feed a port of `target` type.
    ///
    /// Rules, in order: the wildcard matches everything, equal types match,
    /// otherwise the static adjacency table decides.
    #[must_use]
    pub fn is_compatible_with(self, target: Self) -> bool {
        if self == Self::Any || target == Self::Any {
            return true;
        }
        if self == target {
            return true;
        }
        self.feeds().contains(&target)
    }

    /// Returns every target type this type may feed: itself plus the
    /// adjacency table entries, or all known types for the wildcard.
    #[must_use]
    pub fn compatible_targets(self) -> Vec<Self> {
        if self == Self::Any {
            return Self::ALL.to_vec();
        }
        let mut targets = vec![self];
        targets.extend_from_slice(self.feeds());
        targets
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::File => "file",
            Self::User => "user",
            Self::Auth => "auth",
            Self::Data => "data",
            Self::Message => "message",
            Self::Event => "event",
            Self::Job => "job",
            Self::Email => "email",
            Self::Any => "any",
        };
        f.write_str(name)
    }
}

/// A named, typed input or output slot on a capsule.
///
/// The `required` flag is only meaningful for input ports; output ports
/// leave it false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Identifier, unique within the owning capsule.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// The data category crossing this port.
    pub port_type: PortType,
    /// Whether this input must be satisfied by a connection or config value.
    #[serde(default)]
    pub required: bool,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

impl Port {
    /// Creates a new required input port.
    #[must_use]
    pub fn required(id: impl Into<String>, name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            port_type,
            required: true,
            description: String::new(),
        }
    }

    /// Creates a new optional input port.
    #[must_use]
    pub fn optional(id: impl Into<String>, name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            port_type,
            required: false,
            description: String::new(),
        }
    }

    /// Creates a new output port.
    #[must_use]
    pub fn output(id: impl Into<String>, name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            port_type,
            required: false,
            description: String::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_compatible_with_all() {
        for t in PortType::ALL {
            assert!(PortType::Any.is_compatible_with(t));
            assert!(t.is_compatible_with(PortType::Any));
        }
    }

    #[test]
    fn same_type_compatible() {
        for t in PortType::ALL {
            assert!(t.is_compatible_with(t));
        }
    }

    #[test]
    fn table_is_directional() {
        assert!(PortType::User.is_compatible_with(PortType::Object));
        assert!(!PortType::Object.is_compatible_with(PortType::User));

        assert!(PortType::Auth.is_compatible_with(PortType::String));
        assert!(!PortType::String.is_compatible_with(PortType::Auth));
    }

    #[test]
    fn data_feeds_object_and_array() {
        assert!(PortType::Data.is_compatible_with(PortType::Object));
        assert!(PortType::Data.is_compatible_with(PortType::Array));
        assert!(!PortType::Data.is_compatible_with(PortType::String));
    }

    #[test]
    fn payload_kinds_feed_object() {
        for t in [
            PortType::Message,
            PortType::Event,
            PortType::Job,
            PortType::Email,
        ] {
            assert!(t.is_compatible_with(PortType::Object));
        }
    }

    #[test]
    fn unrelated_types_not_compatible() {
        assert!(!PortType::String.is_compatible_with(PortType::Number));
        assert!(!PortType::File.is_compatible_with(PortType::Object));
    }

    #[test]
    fn compatible_targets_includes_self_and_table() {
        let targets = PortType::Data.compatible_targets();
        assert!(targets.contains(&PortType::Data));
        assert!(targets.contains(&PortType::Object));
        assert!(targets.contains(&PortType::Array));
        assert_eq!(targets.len(), 3);
    }

    #[test]
    fn any_targets_all_known_types() {
        let targets = PortType::Any.compatible_targets();
        assert_eq!(targets.len(), PortType::ALL.len());
    }

    #[test]
    fn port_required_flag() {
        let input = Port::required("amount", "Amount", PortType::Number);
        assert!(input.required);

        let optional = Port::optional("note", "Note", PortType::String);
        assert!(!optional.required);

        let output = Port::output("result", "Result", PortType::Object);
        assert!(!output.required);
    }

    #[test]
    fn port_type_serde_uses_lowercase() {
        let json = serde_json::to_string(&PortType::Email).expect("serialize");
        assert_eq!(json, "\"email\"");
        let parsed: PortType = serde_json::from_str("\"any\"").expect("deserialize");
        assert_eq!(parsed, PortType::Any);
    }

    #[test]
    fn port_serde_roundtrip() {
        let port = Port::required("user", "User", PortType::User).with_description("account");
        let json = serde_json::to_string(&port).expect("serialize");
        let parsed: Port = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(port, parsed);
    }
}
