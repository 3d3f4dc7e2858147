//! Run results.
//!
//! One `ExecutionResult` is produced per run and never mutated afterwards.
//! It carries the overall success flag, every node's produced output map,
//! the accumulated per-node errors, and wall-clock bookkeeping.

use crate::capsule::ValueMap;
use crate::node::NodeId;
use chrono::{DateTime, Utc};
use flowcap_core::RunId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sentinel key under which flow-level failures (cycles, unexpected
/// engine errors) are recorded, since they belong to no single node.
pub const FLOW_ERROR_KEY: &str = "__flow__";

/// A failure recorded against one node during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeError {
    /// The node that failed.
    pub node_id: NodeId,
    /// The failure message.
    pub error: String,
}

impl NodeError {
    /// Creates a new node error.
    #[must_use]
    pub fn new(node_id: impl Into<NodeId>, error: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            error: error.into(),
        }
    }
}

/// The outcome of one flow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Identifier of this run.
    pub run_id: RunId,
    /// True when every attempted node completed without error.
    pub success: bool,
    /// Each node's produced output map, keyed by node id. A failed node
    /// records the synthetic map `{"error": message}`.
    pub outputs: HashMap<NodeId, ValueMap>,
    /// Accumulated per-node failures, in execution order. Empty on a
    /// fully successful run.
    pub errors: Vec<NodeError>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
}

impl ExecutionResult {
    /// Returns the output map recorded for a node, if it ran.
    #[must_use]
    pub fn node_output(&self, node_id: &NodeId) -> Option<&ValueMap> {
        self.outputs.get(node_id)
    }

    /// Returns the error recorded against a node, if any.
    #[must_use]
    pub fn error_for(&self, node_id: &NodeId) -> Option<&NodeError> {
        self.errors.iter().find(|e| &e.node_id == node_id)
    }

    /// Elapsed wall-clock time for the run.
    #[must_use]
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_result() -> ExecutionResult {
        let started_at = Utc::now();
        let mut outputs = HashMap::new();
        let mut x_out = ValueMap::new();
        x_out.insert("value".to_string(), json!(42));
        outputs.insert(NodeId::from("X"), x_out);

        ExecutionResult {
            run_id: RunId::new(),
            success: false,
            outputs,
            errors: vec![NodeError::new("Y", "boom")],
            started_at,
            finished_at: started_at + chrono::Duration::milliseconds(5),
        }
    }

    #[test]
    fn node_output_lookup() {
        let result = sample_result();
        let output = result.node_output(&NodeId::from("X")).expect("X ran");
        assert_eq!(output.get("value"), Some(&json!(42)));
        assert!(result.node_output(&NodeId::from("Z")).is_none());
    }

    #[test]
    fn error_lookup() {
        let result = sample_result();
        let err = result.error_for(&NodeId::from("Y")).expect("Y failed");
        assert_eq!(err.error, "boom");
        assert!(result.error_for(&NodeId::from("X")).is_none());
    }

    #[test]
    fn elapsed_is_nonnegative() {
        let result = sample_result();
        assert!(result.elapsed() >= chrono::Duration::zero());
    }

    #[test]
    fn result_serde_roundtrip() {
        let result = sample_result();
        let json = serde_json::to_string(&result).expect("serialize");
        let parsed: ExecutionResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.run_id, result.run_id);
        assert_eq!(parsed.errors, result.errors);
        assert!(parsed.node_output(&NodeId::from("X")).is_some());
    }
}
