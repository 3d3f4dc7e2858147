//! Topological scheduling of flow nodes.
//!
//! Builds a dependency graph from a flow's nodes and connections and
//! produces an execution order in which every node appears after all nodes
//! whose outputs it consumes. Cycles are detected and reported with the
//! node at which the back edge was found.
//!
//! Tie-breaking among independent nodes follows node declaration order;
//! callers must not rely on anything stronger.

use crate::connection::Connection;
use crate::error::CycleError;
use crate::flow::Flow;
use crate::node::{Node, NodeId};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// The data-dependency graph of a flow.
///
/// Node weights are NodeIds; an edge `a -> b` means b consumes an output
/// of a. Connections referencing unknown nodes are skipped here — the
/// validator reports those.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<NodeId, ()>,
    /// Map from NodeId to graph index for O(1) lookup.
    node_to_index: HashMap<NodeId, NodeIndex>,
}

impl DependencyGraph {
    /// Builds the dependency graph for a flow.
    #[must_use]
    pub fn from_flow(flow: &Flow) -> Self {
        Self::new(&flow.nodes, &flow.connections)
    }

    /// Builds a dependency graph from nodes and connections.
    ///
    /// Nodes are inserted in declaration order, which fixes the
    /// tie-break order of the traversal.
    #[must_use]
    pub fn new(nodes: &[Node], connections: &[Connection]) -> Self {
        let mut graph = DiGraph::new();
        let mut node_to_index = HashMap::new();

        for node in nodes {
            let idx = graph.add_node(node.id.clone());
            node_to_index.insert(node.id.clone(), idx);
        }

        for connection in connections {
            if let (Some(&from), Some(&to)) = (
                node_to_index.get(&connection.from_node),
                node_to_index.get(&connection.to_node),
            ) {
                graph.update_edge(from, to, ());
            }
        }

        Self {
            graph,
            node_to_index,
        }
    }

    /// Returns nodes with no incoming edges (natural roots), in
    /// declaration order.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .filter_map(|idx| self.graph.node_weight(idx).cloned())
            .collect()
    }

    /// Returns the direct upstream dependencies of a node.
    #[must_use]
    pub fn upstream(&self, node_id: &NodeId) -> Vec<NodeId> {
        let Some(&idx) = self.node_to_index.get(node_id) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .filter_map(|dep| self.graph.node_weight(dep).cloned())
            .collect()
    }

    /// Computes a topological order over every node: dependencies first,
    /// each node exactly once.
    ///
    /// The traversal is seeded from the natural roots in declaration
    /// order, then picks up any still-unvisited nodes so disconnected
    /// subgraphs are covered.
    ///
    /// # Errors
    ///
    /// Returns a `CycleError` naming the node at which a back edge was
    /// found when the graph is not acyclic.
    pub fn topological_order(&self) -> Result<Vec<NodeId>, CycleError> {
        let mut visited = HashSet::new();
        let mut in_progress = HashSet::new();
        let mut order = Vec::with_capacity(self.graph.node_count());

        for idx in self.graph.node_indices() {
            if self
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .next()
                .is_none()
            {
                self.visit(idx, &mut visited, &mut in_progress, &mut order)?;
            }
        }
        // Disconnected subgraphs and cycles have no roots; cover the rest.
        for idx in self.graph.node_indices() {
            self.visit(idx, &mut visited, &mut in_progress, &mut order)?;
        }

        Ok(order)
    }

    /// Depth-first visit: every upstream dependency before the node
    /// itself. `in_progress` marks the current path and is unwound on
    /// backtracking, so diamonds are not misreported as cycles.
    fn visit(
        &self,
        idx: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        in_progress: &mut HashSet<NodeIndex>,
        order: &mut Vec<NodeId>,
    ) -> Result<(), CycleError> {
        if visited.contains(&idx) {
            return Ok(());
        }
        if in_progress.contains(&idx) {
            return Err(CycleError {
                node_id: self.graph[idx].clone(),
            });
        }

        in_progress.insert(idx);
        for dep in self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .collect::<Vec<_>>()
        {
            self.visit(dep, visited, in_progress, order)?;
        }
        in_progress.remove(&idx);
        visited.insert(idx);
        order.push(self.graph[idx].clone());

        Ok(())
    }
}
