//! Flow validation.
//!
//! Checks a flow against the data model and the type compatibility table:
//! - Every connection resolves to existing nodes and ports
//! - Connected port types are compatible
//! - No input port is fed by more than one connection
//! - Every required input is satisfied by a connection or a config value
//!
//! Validation is a pure function: it collects every error it finds and
//! never raises. Callers decide whether to proceed to execution.

use crate::error::ValidationError;
use crate::flow::Flow;
use crate::node::NodeId;
use std::collections::HashMap;

/// The outcome of validating a flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    /// Every problem found, in discovery order.
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// Returns true if no errors were found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the errors as human-readable strings.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Validates a flow, collecting every structural and type error.
#[must_use]
pub fn validate(flow: &Flow) -> ValidationReport {
    let mut errors = Vec::new();

    for connection in &flow.connections {
        let from = flow.node(&connection.from_node);
        let to = flow.node(&connection.to_node);

        if from.is_none() {
            errors.push(ValidationError::MissingSourceNode {
                node_id: connection.from_node.clone(),
            });
        }
        if to.is_none() {
            errors.push(ValidationError::MissingTargetNode {
                node_id: connection.to_node.clone(),
            });
        }
        // Port resolution needs both endpoints present.
        let (Some(from), Some(to)) = (from, to) else {
            continue;
        };

        let from_port = from.capsule.output_port(&connection.from_port);
        if from_port.is_none() {
            errors.push(ValidationError::SourcePortNotFound {
                node_id: from.id.clone(),
                port_id: connection.from_port.clone(),
            });
        }

        let to_port = to.capsule.input_port(&connection.to_port);
        if to_port.is_none() {
            errors.push(ValidationError::TargetPortNotFound {
                node_id: to.id.clone(),
                port_id: connection.to_port.clone(),
            });
        }

        if let (Some(from_port), Some(to_port)) = (from_port, to_port)
            && !from_port.port_type.is_compatible_with(to_port.port_type)
        {
            errors.push(ValidationError::IncompatibleTypes {
                from_node: from.id.clone(),
                from_port: from_port.name.clone(),
                from_type: from_port.port_type,
                to_node: to.id.clone(),
                to_port: to_port.name.clone(),
                to_type: to_port.port_type,
            });
        }
    }

    // An input receives from a single source, never from two.
    let mut feed_counts: HashMap<(&NodeId, &str), usize> = HashMap::new();
    for connection in &flow.connections {
        *feed_counts
            .entry((&connection.to_node, connection.to_port.as_str()))
            .or_default() += 1;
    }
    for ((node_id, port_id), count) in feed_counts {
        if count > 1 {
            errors.push(ValidationError::DuplicateInputConnection {
                node_id: node_id.clone(),
                port_id: port_id.to_string(),
            });
        }
    }

    for node in &flow.nodes {
        for port in node.capsule.inputs() {
            if !port.required {
                continue;
            }
            let fed = flow.connection_into(&node.id, &port.id).is_some();
            if !fed && !node.has_config_value(&port.id) {
                errors.push(ValidationError::RequiredInputUnsatisfied {
                    node_id: node.id.clone(),
                    port_id: port.id.clone(),
                });
            }
        }
    }

    ValidationReport { errors }
}
