//! Flow graph execution engine for the flowcap platform.
//!
//! This crate provides the core engine that validates, orders, and runs
//! user-authored flows of capsule nodes:
//!
//! - **Port System**: Named input/output ports with a directional type
//!   compatibility table
//! - **Capsules**: One polymorphic async interface over heterogeneous
//!   processing units wrapping external services
//! - **Graph Model**: Flows of nodes joined by typed connections
//! - **Validator**: Collects every structural and type error in a flow
//! - **Scheduler**: Dependency-first topological ordering with cycle
//!   detection
//! - **Executor**: Sequential execution with per-node failure isolation
//!
//! The engine is a library with purely in-process contracts: capsules and
//! flows arrive as data/interface values from the caller, and results go
//! back as data. It owns no file format, wire protocol, or CLI surface.

pub mod capsule;
pub mod connection;
pub mod context;
pub mod error;
pub mod execution;
pub mod executor;
pub mod flow;
pub mod node;
pub mod port;
pub mod scheduler;
pub mod validator;

pub use capsule::{Capsule, CapsuleDescriptor, ValueMap};
pub use connection::Connection;
pub use context::{ExecutionContext, RunLogger, TracingLogger};
pub use error::{CapsuleError, CycleError, ValidationError};
pub use execution::{ExecutionResult, FLOW_ERROR_KEY, NodeError};
pub use executor::{execute, execution_order};
pub use flow::{Flow, FlowMetadata};
pub use node::{Node, NodeId, Position};
pub use port::{Port, PortType};
pub use scheduler::DependencyGraph;
pub use validator::{ValidationReport, validate};
