//! Flow execution.
//!
//! Drives the scheduler's order, invokes each node's capsule with its
//! resolved inputs, and collects outputs and errors into one
//! `ExecutionResult`. All failure modes are captured in the result:
//! `execute` itself never fails.
//!
//! Scheduling model: single logical thread of control per run. Each
//! capsule call is awaited to completion before the next node starts,
//! even when the dependency graph would permit independent nodes to run
//! concurrently. The engine defines no timeout; a hung capsule call
//! blocks the run.

use crate::capsule::ValueMap;
use crate::context::ExecutionContext;
use crate::error::CycleError;
use crate::execution::{ExecutionResult, FLOW_ERROR_KEY, NodeError};
use crate::flow::Flow;
use crate::node::NodeId;
use crate::scheduler::DependencyGraph;
use chrono::Utc;
use flowcap_core::RunId;
use serde_json::json;
use std::collections::HashMap;

/// Computes the order in which a flow's nodes would execute, without
/// running anything.
///
/// Used by editors to visualize/debug ordering.
///
/// # Errors
///
/// Unlike `execute`, this entry point fails loudly on a cyclic flow: it
/// has no partial side effects to protect.
pub fn execution_order(flow: &Flow) -> Result<Vec<NodeId>, CycleError> {
    DependencyGraph::from_flow(flow).topological_order()
}

/// Executes a flow, node by node, in topological order.
///
/// Per-node failures are recorded and execution continues: one node's
/// failure does not prevent downstream nodes from attempting to run,
/// though they will find their expected input keys missing. Only a cycle
/// aborts the run before any node executes.
pub async fn execute(flow: &Flow, context: &ExecutionContext) -> ExecutionResult {
    let run_id = RunId::new();
    let started_at = Utc::now();
    let logger = &context.logger;

    logger.info(&format!(
        "run {run_id} starting for flow '{}' ({} nodes)",
        flow.name(),
        flow.nodes.len()
    ));

    let order = match execution_order(flow) {
        Ok(order) => order,
        Err(cycle) => {
            let message = cycle.to_string();
            logger.error(&message);
            let mut outputs = HashMap::new();
            let mut flow_output = ValueMap::new();
            flow_output.insert("error".to_string(), json!(message.clone()));
            outputs.insert(NodeId::from(FLOW_ERROR_KEY), flow_output);
            return ExecutionResult {
                run_id,
                success: false,
                outputs,
                errors: vec![NodeError::new(FLOW_ERROR_KEY, message)],
                started_at,
                finished_at: Utc::now(),
            };
        }
    };

    let mut outputs: HashMap<NodeId, ValueMap> = HashMap::new();
    let mut errors: Vec<NodeError> = Vec::new();

    for node_id in order {
        // The order only contains ids taken from the flow's own nodes.
        let Some(node) = flow.node(&node_id) else {
            continue;
        };

        let inputs = collect_inputs(flow, &node_id, &outputs);

        if !node.capsule.is_executable() {
            logger.warn(&format!(
                "node {node_id} ('{}') has no processing function, skipping",
                node.name
            ));
            outputs.insert(node_id, ValueMap::new());
            continue;
        }

        logger.info(&format!("node {node_id} ('{}') starting", node.name));
        match node.capsule.execute(inputs, &node.config).await {
            Ok(produced) => {
                logger.info(&format!("node {node_id} ('{}') finished", node.name));
                outputs.insert(node_id, produced);
            }
            Err(err) => {
                let message = err.to_string();
                logger.error(&format!("node {node_id} ('{}') failed: {message}", node.name));
                errors.push(NodeError::new(node_id.clone(), message.clone()));
                // Synthetic output; downstream nodes still attempt to run
                // but will not find the keys they expect.
                let mut synthetic = ValueMap::new();
                synthetic.insert("error".to_string(), json!(message));
                outputs.insert(node_id, synthetic);
            }
        }
    }

    let success = errors.is_empty();
    logger.info(&format!(
        "run {run_id} finished: {}",
        if success { "success" } else { "failed" }
    ));

    ExecutionResult {
        run_id,
        success,
        outputs,
        errors,
        started_at,
        finished_at: Utc::now(),
    }
}

/// Builds a node's input map from the outputs already recorded for its
/// upstream nodes.
///
/// The topological order guarantees every upstream node has an entry by
/// the time its consumer runs; individual keys may still be absent when
/// the upstream node failed or produced less than it declared.
fn collect_inputs(
    flow: &Flow,
    node_id: &NodeId,
    outputs: &HashMap<NodeId, ValueMap>,
) -> ValueMap {
    let mut inputs = ValueMap::new();

    let Some(node) = flow.node(node_id) else {
        return inputs;
    };

    for port in node.capsule.inputs() {
        if let Some(connection) = flow.connection_into(node_id, &port.id)
            && let Some(upstream) = outputs.get(&connection.from_node)
            && let Some(value) = upstream.get(&connection.from_port)
        {
            inputs.insert(port.id.clone(), value.clone());
        }
    }

    inputs
}
