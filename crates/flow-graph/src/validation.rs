//! Flow graph validation
//!
//! Checks the structural invariants the editor maintains: edge endpoints,
//! group membership and ordering, branch handles, the single loop edge,
//! plus unknown node types and cycles.

use std::collections::{HashMap, HashSet};

use crate::constants::handles;
use crate::registry::SchemaRegistry;
use crate::topology::sort_by_edges;
use crate::types::FlowGraph;

/// Validation error with location context
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An edge references a non-existent node
    UnknownNode { edge_id: String, node_id: String },
    /// A node's parent is missing or is not a group
    InvalidParent { node_id: String, parent_id: String },
    /// A child appears before its group in the node list
    ChildBeforeGroup { node_id: String, parent_id: String },
    /// A branch node has an edge on a handle it does not declare
    UndeclaredBranchHandle {
        edge_id: String,
        node_id: String,
        handle: String,
    },
    /// More than one loop edge leaves a loop node
    DuplicateLoopEdge { node_id: String, count: usize },
    /// A node has a type the registry does not know
    UnknownNodeType { node_id: String, node_type: String },
    /// Cycle detected in the graph
    CycleDetected { omitted: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownNode { edge_id, node_id } => {
                write!(f, "Edge '{}' references unknown node '{}'", edge_id, node_id)
            }
            Self::InvalidParent { node_id, parent_id } => {
                write!(
                    f,
                    "Node '{}' has parent '{}' which is not a group",
                    node_id, parent_id
                )
            }
            Self::ChildBeforeGroup { node_id, parent_id } => {
                write!(f, "Node '{}' precedes its group '{}'", node_id, parent_id)
            }
            Self::UndeclaredBranchHandle {
                edge_id,
                node_id,
                handle,
            } => {
                write!(
                    f,
                    "Edge '{}' leaves node '{}' on undeclared branch '{}'",
                    edge_id, node_id, handle
                )
            }
            Self::DuplicateLoopEdge { node_id, count } => {
                write!(f, "Loop node '{}' has {} loop edges", node_id, count)
            }
            Self::UnknownNodeType { node_id, node_type } => {
                write!(f, "Unknown node type '{}' for node '{}'", node_type, node_id)
            }
            Self::CycleDetected { omitted } => {
                write!(f, "Cycle detected in graph ({} nodes unordered)", omitted)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a flow graph
///
/// Returns all validation errors found (not just the first).
/// Pass a registry to also check node types.
pub fn validate_flow(
    graph: &FlowGraph,
    registry: Option<&SchemaRegistry>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_edge_references(graph, &mut errors);
    validate_group_membership(graph, &mut errors);
    validate_branch_handles(graph, &mut errors);
    validate_loop_edges(graph, &mut errors);
    detect_cycles(graph, &mut errors);

    if let Some(reg) = registry {
        validate_node_types(graph, reg, &mut errors);
    }

    errors
}

/// Check that all edge source/target nodes exist
fn validate_edge_references(graph: &FlowGraph, errors: &mut Vec<ValidationError>) {
    let node_ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();

    for edge in &graph.edges {
        for endpoint in [&edge.source, &edge.target] {
            if !node_ids.contains(endpoint.as_str()) {
                errors.push(ValidationError::UnknownNode {
                    edge_id: edge.id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
    }
}

/// Check that parents are groups listed before their children
fn validate_group_membership(graph: &FlowGraph, errors: &mut Vec<ValidationError>) {
    let index: HashMap<&str, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    for (position, node) in graph.nodes.iter().enumerate() {
        let Some(parent_id) = node.parent() else {
            continue;
        };
        match index.get(parent_id) {
            Some(&parent_index) if graph.nodes[parent_index].is_group() => {
                if parent_index > position {
                    errors.push(ValidationError::ChildBeforeGroup {
                        node_id: node.id.clone(),
                        parent_id: parent_id.to_string(),
                    });
                }
            }
            _ => errors.push(ValidationError::InvalidParent {
                node_id: node.id.clone(),
                parent_id: parent_id.to_string(),
            }),
        }
    }
}

/// Check that branch nodes only emit edges on declared branches
fn validate_branch_handles(graph: &FlowGraph, errors: &mut Vec<ValidationError>) {
    for node in graph.nodes.iter().filter(|n| n.node_type().is_branching()) {
        let declared: HashSet<String> = node.data.config.branch_ids().into_iter().collect();
        for edge in graph.outgoing_edges(&node.id) {
            if let Some(handle) = &edge.source_handle {
                if !declared.contains(handle) {
                    errors.push(ValidationError::UndeclaredBranchHandle {
                        edge_id: edge.id.clone(),
                        node_id: node.id.clone(),
                        handle: handle.clone(),
                    });
                }
            }
        }
    }
}

/// Check that no loop node has more than one loop edge
fn validate_loop_edges(graph: &FlowGraph, errors: &mut Vec<ValidationError>) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for edge in &graph.edges {
        if edge.source_handle.as_deref() == Some(handles::LOOP) {
            *counts.entry(edge.source.as_str()).or_insert(0) += 1;
        }
    }

    for node in &graph.nodes {
        if let Some(&count) = counts.get(node.id.as_str()) {
            if count > 1 {
                errors.push(ValidationError::DuplicateLoopEdge {
                    node_id: node.id.clone(),
                    count,
                });
            }
        }
    }
}

/// Detect cycles from the length of the topological order
fn detect_cycles(graph: &FlowGraph, errors: &mut Vec<ValidationError>) {
    let ordered = sort_by_edges(&graph.nodes, &graph.edges).len();
    if ordered < graph.nodes.len() {
        errors.push(ValidationError::CycleDetected {
            omitted: graph.nodes.len() - ordered,
        });
    }
}

/// Check that all nodes have known types in the registry
fn validate_node_types(
    graph: &FlowGraph,
    registry: &SchemaRegistry,
    errors: &mut Vec<ValidationError>,
) {
    for node in &graph.nodes {
        let node_type = node.node_type().as_str();
        if !registry.has_node_type(node_type) {
            errors.push(ValidationError::UnknownNodeType {
                node_id: node.id.clone(),
                node_type: node_type.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NodeSchema;
    use crate::types::{CanvasNode, FlowEdge, FlowNode};

    fn make_node(id: &str, kind: &str) -> CanvasNode {
        CanvasNode::from_flow_node(FlowNode::new(id, kind))
    }

    fn make_edge(source: &str, target: &str) -> FlowEdge {
        FlowEdge::new(format!("{}-{}", source, target), source, target)
    }

    #[test]
    fn test_valid_graph() {
        let mut child = make_node("child", "loop-start");
        child.set_parent(Some("body".to_string()));
        let graph = FlowGraph::new(
            vec![
                make_node("start", "start"),
                make_node("loop", "loop"),
                make_node("body", "loop-body"),
                child,
            ],
            vec![
                make_edge("start", "loop"),
                make_edge("loop", "body").with_source_handle("loop"),
            ],
        );

        assert!(validate_flow(&graph, None).is_empty());
    }

    #[test]
    fn test_unknown_edge_endpoint() {
        let graph = FlowGraph::new(vec![make_node("A", "start")], vec![make_edge("A", "missing")]);

        let errors = validate_flow(&graph, None);
        assert_eq!(
            errors,
            vec![ValidationError::UnknownNode {
                edge_id: "A-missing".to_string(),
                node_id: "missing".to_string(),
            }]
        );
    }

    #[test]
    fn test_group_membership_errors() {
        let mut early = make_node("early", "llm");
        early.set_parent(Some("body".to_string()));
        let mut stray = make_node("stray", "llm");
        stray.set_parent(Some("plain".to_string()));
        let graph = FlowGraph::new(
            vec![early, make_node("body", "loop-body"), make_node("plain", "llm"), stray],
            vec![],
        );

        let errors = validate_flow(&graph, None);
        assert!(errors.contains(&ValidationError::ChildBeforeGroup {
            node_id: "early".to_string(),
            parent_id: "body".to_string(),
        }));
        assert!(errors.contains(&ValidationError::InvalidParent {
            node_id: "stray".to_string(),
            parent_id: "plain".to_string(),
        }));
    }

    #[test]
    fn test_undeclared_branch_handle() {
        let cond = CanvasNode::from_flow_node(FlowNode::new("cond", "condition").with_params(
            serde_json::json!({"branches": [{"branch_id": "if", "next_nodes": ["a"]}]}),
        ));
        let graph = FlowGraph::new(
            vec![cond, make_node("a", "llm"), make_node("b", "llm")],
            vec![
                make_edge("cond", "a").with_source_handle("if"),
                make_edge("cond", "b").with_source_handle("elif"),
            ],
        );

        let errors = validate_flow(&graph, None);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("elif"));
    }

    #[test]
    fn test_duplicate_loop_edge_and_cycle() {
        let mut second = make_edge("loop", "body").with_source_handle("loop");
        second.id = "dup".to_string();
        let graph = FlowGraph::new(
            vec![make_node("loop", "loop"), make_node("body", "loop-body"), make_node("x", "llm")],
            vec![
                make_edge("loop", "body").with_source_handle("loop"),
                second,
                make_edge("body", "x"),
                make_edge("x", "body"),
            ],
        );

        let errors = validate_flow(&graph, None);
        assert!(errors.contains(&ValidationError::DuplicateLoopEdge {
            node_id: "loop".to_string(),
            count: 2,
        }));
        assert!(errors.contains(&ValidationError::CycleDetected { omitted: 2 }));
    }

    #[test]
    fn test_unknown_node_type_with_registry() {
        let mut registry = SchemaRegistry::new();
        registry.register(NodeSchema::new("start", "v0", "Start"));
        let graph = FlowGraph::new(vec![make_node("s", "start"), make_node("v", "vision")], vec![]);

        assert!(validate_flow(&graph, None).is_empty());
        let errors = validate_flow(&graph, Some(&registry));
        assert_eq!(
            errors,
            vec![ValidationError::UnknownNodeType {
                node_id: "v".to_string(),
                node_type: "vision".to_string(),
            }]
        );
    }
}
