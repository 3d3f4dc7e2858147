//! Error types for the engine crate.
//!
//! The engine splits failures by how they propagate:
//! - `ValidationError`: structural/type problems, collected into a report
//!   and returned, never raised.
//! - `CycleError`: fatal to a run, surfaced before any node executes.
//! - `CapsuleError`: a single capsule call failing, recovered by the
//!   executor and recorded against the node.

use crate::node::NodeId;
use crate::port::PortType;
use std::fmt;

/// A structural or type problem found while validating a flow.
///
/// These errors carry everything needed to point a user at the offending
/// connection or node; the validator collects all of them rather than
/// stopping at the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A connection references a source node that is not in the flow.
    MissingSourceNode { node_id: NodeId },
    /// A connection references a target node that is not in the flow.
    MissingTargetNode { node_id: NodeId },
    /// The named output port does not exist on the source node's capsule.
    SourcePortNotFound { node_id: NodeId, port_id: String },
    /// The named input port does not exist on the target node's capsule.
    TargetPortNotFound { node_id: NodeId, port_id: String },
    /// A connection joins ports whose types may not feed each other.
    IncompatibleTypes {
        from_node: NodeId,
        from_port: String,
        from_type: PortType,
        to_node: NodeId,
        to_port: String,
        to_type: PortType,
    },
    /// More than one connection feeds the same input port.
    DuplicateInputConnection { node_id: NodeId, port_id: String },
    /// A required input port has neither an incoming connection nor a
    /// config value.
    RequiredInputUnsatisfied { node_id: NodeId, port_id: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSourceNode { node_id } => {
                write!(f, "connection references missing source node {node_id}")
            }
            Self::MissingTargetNode { node_id } => {
                write!(f, "connection references missing target node {node_id}")
            }
            Self::SourcePortNotFound { node_id, port_id } => {
                write!(f, "output port '{port_id}' not found on node {node_id}")
            }
            Self::TargetPortNotFound { node_id, port_id } => {
                write!(f, "input port '{port_id}' not found on node {node_id}")
            }
            Self::IncompatibleTypes {
                from_node,
                from_port,
                from_type,
                to_node,
                to_port,
                to_type,
            } => {
                write!(
                    f,
                    "incompatible types: {from_node}:{from_port} ({from_type}) -> {to_node}:{to_port} ({to_type})"
                )
            }
            Self::DuplicateInputConnection { node_id, port_id } => {
                write!(
                    f,
                    "input '{port_id}' on node {node_id} is fed by more than one connection"
                )
            }
            Self::RequiredInputUnsatisfied { node_id, port_id } => {
                write!(
                    f,
                    "required input '{port_id}' on node {node_id} has no connection or config value"
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// The flow's dependency graph contains a cycle.
///
/// Carries the node at which the cycle was discovered. Fatal to a run:
/// no node executes when this is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError {
    /// The node where the back edge was found.
    pub node_id: NodeId,
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dependency cycle detected at node {}", self.node_id)
    }
}

impl std::error::Error for CycleError {}

/// Errors raised by a capsule's processing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapsuleError {
    /// Input validation failed inside the capsule.
    InvalidInput { message: String },
    /// Processing failed.
    Failed { message: String },
    /// The wrapped external service reported an error.
    ExternalService { service: String, message: String },
}

impl CapsuleError {
    /// Creates a plain processing failure.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

impl fmt::Display for CapsuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { message } => write!(f, "invalid input: {message}"),
            Self::Failed { message } => write!(f, "{message}"),
            Self::ExternalService { service, message } => {
                write!(f, "external service error ({service}): {message}")
            }
        }
    }
}

impl std::error::Error for CapsuleError {}
