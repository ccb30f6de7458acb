//! Ancestor/descendant closures and topological ordering
//!
//! All walks carry an explicit visited set, so malformed (cyclic) graphs
//! terminate. Cycles are never an error here: [`sort_by_edges`] omits
//! cycle members and [`check_has_node_out_of_flow`] reports unreachable
//! nodes as an advisory boolean.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use serde_json::Value;

use crate::constants::canvas;
use crate::types::{CanvasNode, FlowEdge};

#[derive(Clone, Copy)]
enum Direction {
    Upstream,
    Downstream,
}

/// Breadth-first closure from `start` along edges in one direction
///
/// Returns node ids in discovery order. `on_edge` sees every traversed edge
/// whose far endpoint exists, including edges into already visited nodes.
fn closure<'a>(
    start: &'a str,
    nodes: &'a [CanvasNode],
    edges: &'a [FlowEdge],
    direction: Direction,
    mut on_edge: impl FnMut(&'a FlowEdge, &'a CanvasNode),
) -> Vec<&'a str> {
    let by_id: HashMap<&str, &CanvasNode> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();

    let mut visited: HashSet<&str> = HashSet::new();
    let mut order = Vec::new();
    let mut queue: VecDeque<&str> = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        for edge in edges {
            let (near, far) = match direction {
                Direction::Upstream => (edge.target.as_str(), edge.source.as_str()),
                Direction::Downstream => (edge.source.as_str(), edge.target.as_str()),
            };
            if near != current {
                continue;
            }
            let Some(&neighbor) = by_id.get(far) else {
                continue;
            };
            on_edge(edge, neighbor);
            if visited.insert(neighbor.id.as_str()) {
                order.push(neighbor.id.as_str());
                queue.push_back(neighbor.id.as_str());
            }
        }
    }

    order
}

fn clone_by_ids(ids: &[&str], nodes: &[CanvasNode]) -> Vec<CanvasNode> {
    let by_id: HashMap<&str, &CanvasNode> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    ids.iter()
        .filter_map(|id| by_id.get(id).map(|n| (*n).clone()))
        .collect()
}

/// Every node from which `node_id` can be reached
///
/// The returned copies of branch-type predecessors carry
/// `params.outputBranchIds`: the source handles of their edges into the
/// walked region, i.e. which branches' outputs are visible downstream.
/// The start node is included only if it lies on a cycle.
pub fn get_all_predecessors(
    node_id: &str,
    nodes: &[CanvasNode],
    edges: &[FlowEdge],
) -> Vec<CanvasNode> {
    let mut branch_handles: HashMap<&str, BTreeSet<String>> = HashMap::new();
    let order = closure(node_id, nodes, edges, Direction::Upstream, |edge, predecessor| {
        if !predecessor.node_type().is_branching() {
            return;
        }
        if let Some(handle) = &edge.source_handle {
            branch_handles
                .entry(predecessor.id.as_str())
                .or_default()
                .insert(handle.clone());
        }
    });

    let mut predecessors = clone_by_ids(&order, nodes);
    for predecessor in &mut predecessors {
        if let Some(handles) = branch_handles.get(predecessor.id.as_str()) {
            let ids: Vec<Value> = handles.iter().cloned().map(Value::from).collect();
            set_param(
                &mut predecessor.data.config.params,
                canvas::OUTPUT_BRANCH_IDS,
                Value::Array(ids),
            );
        }
    }
    predecessors
}

/// Every node reachable from `node_id`
pub fn get_all_post_nodes(
    node_id: &str,
    nodes: &[CanvasNode],
    edges: &[FlowEdge],
) -> Vec<CanvasNode> {
    let order = closure(node_id, nodes, edges, Direction::Downstream, |_, _| {});
    clone_by_ids(&order, nodes)
}

/// Topological order by Kahn's algorithm
///
/// The queue is seeded in node order, so ties keep the input order. Nodes
/// that never reach in-degree zero (cycle members and everything behind
/// them) are omitted; a result shorter than `nodes` is the cycle signal.
/// Edges whose endpoints are not in `nodes` are ignored.
pub fn sort_by_edges(nodes: &[CanvasNode], edges: &[FlowEdge]) -> Vec<CanvasNode> {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut in_degree = vec![0usize; nodes.len()];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for edge in edges {
        if let (Some(&source), Some(&target)) =
            (index.get(edge.source.as_str()), index.get(edge.target.as_str()))
        {
            successors[source].push(target);
            in_degree[target] += 1;
        }
    }

    let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(nodes.len());
    while let Some(current) = queue.pop_front() {
        order.push(current);
        for &next in &successors[current] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if order.len() < nodes.len() {
        log::warn!(
            "Topological sort omitted {} of {} nodes (cycle detected)",
            nodes.len() - order.len(),
            nodes.len()
        );
    }

    order.into_iter().map(|i| nodes[i].clone()).collect()
}

/// Whether some node cannot be reached from the trigger (`nodes[0]`)
pub fn check_has_node_out_of_flow(nodes: &[CanvasNode], edges: &[FlowEdge]) -> bool {
    let Some(trigger) = nodes.first() else {
        return false;
    };
    let reachable: HashSet<String> = get_all_post_nodes(&trigger.id, nodes, edges)
        .into_iter()
        .map(|n| n.id)
        .filter(|id| *id != trigger.id)
        .collect();
    reachable.len() != nodes.len() - 1
}

fn set_param(params: &mut Value, key: &str, value: Value) {
    if params.is_null() {
        *params = Value::Object(serde_json::Map::new());
    }
    if let Some(object) = params.as_object_mut() {
        object.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FlowNode;

    fn make_node(id: &str, kind: &str) -> CanvasNode {
        CanvasNode::from_flow_node(FlowNode::new(id, kind))
    }

    fn make_edge(source: &str, target: &str) -> FlowEdge {
        FlowEdge::new(format!("{}-{}", source, target), source, target)
    }

    fn ids(nodes: &[CanvasNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.id.as_str()).collect()
    }

    fn position_of(order: &[CanvasNode], id: &str) -> usize {
        order.iter().position(|n| n.id == id).unwrap()
    }

    #[test]
    fn test_sort_linear_chain() {
        let nodes = vec![make_node("A", "start"), make_node("B", "llm"), make_node("C", "end")];
        let edges = vec![make_edge("A", "B"), make_edge("B", "C")];

        assert_eq!(ids(&sort_by_edges(&nodes, &edges)), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_sort_cycle_is_omitted() {
        let nodes = vec![make_node("A", "llm"), make_node("B", "llm"), make_node("C", "llm")];
        let edges = vec![make_edge("A", "B"), make_edge("B", "C"), make_edge("C", "A")];

        assert!(sort_by_edges(&nodes, &edges).is_empty());
    }

    #[test]
    fn test_sort_respects_every_edge() {
        // Diamond with a tail, nodes given out of order
        let nodes = vec![
            make_node("E", "end"),
            make_node("C", "tool"),
            make_node("A", "start"),
            make_node("D", "llm"),
            make_node("B", "http"),
        ];
        let edges = vec![
            make_edge("A", "B"),
            make_edge("A", "C"),
            make_edge("B", "D"),
            make_edge("C", "D"),
            make_edge("D", "E"),
        ];

        let order = sort_by_edges(&nodes, &edges);
        assert_eq!(order.len(), nodes.len());
        for edge in &edges {
            assert!(position_of(&order, &edge.source) < position_of(&order, &edge.target));
        }
    }

    #[test]
    fn test_sort_partial_cycle_keeps_acyclic_prefix() {
        let nodes = vec![make_node("A", "start"), make_node("B", "llm"), make_node("C", "llm")];
        let edges = vec![make_edge("A", "B"), make_edge("B", "C"), make_edge("C", "B")];

        assert_eq!(ids(&sort_by_edges(&nodes, &edges)), vec!["A"]);
    }

    #[test]
    fn test_predecessor_closure() {
        // A -> B -> D, C -> D, X unrelated
        let nodes = vec![
            make_node("A", "start"),
            make_node("B", "llm"),
            make_node("C", "tool"),
            make_node("D", "end"),
            make_node("X", "llm"),
        ];
        let edges = vec![make_edge("A", "B"), make_edge("B", "D"), make_edge("C", "D")];

        let predecessors = get_all_predecessors("D", &nodes, &edges);
        let mut found = ids(&predecessors);
        found.sort();
        assert_eq!(found, vec!["A", "B", "C"]);

        // Removing any member breaks a chain: each is a direct predecessor
        // of D or of another member
        let members: HashSet<&str> = found.iter().copied().collect();
        for member in &found {
            let feeds_member_or_d = edges.iter().any(|e| {
                e.source == *member && (e.target == "D" || members.contains(e.target.as_str()))
            });
            assert!(feeds_member_or_d);
        }
    }

    #[test]
    fn test_predecessors_terminate_on_cycle() {
        let nodes = vec![make_node("A", "llm"), make_node("B", "llm")];
        let edges = vec![make_edge("A", "B"), make_edge("B", "A")];

        let predecessors = get_all_predecessors("A", &nodes, &edges);
        let mut found = ids(&predecessors);
        found.sort();
        assert_eq!(found, vec!["A", "B"]);
    }

    #[test]
    fn test_predecessors_record_branch_handles() {
        let nodes = vec![
            make_node("cond", "condition"),
            make_node("yes", "llm"),
            make_node("no", "llm"),
            make_node("target", "end"),
        ];
        let edges = vec![
            make_edge("cond", "yes").with_source_handle("if"),
            make_edge("cond", "no").with_source_handle("else"),
            make_edge("yes", "target"),
        ];

        let predecessors = get_all_predecessors("target", &nodes, &edges);
        let cond = predecessors.iter().find(|n| n.id == "cond").unwrap();
        assert_eq!(
            cond.data.config.params[canvas::OUTPUT_BRANCH_IDS],
            serde_json::json!(["if"])
        );

        // The source graph is not touched
        assert!(nodes[0].data.config.params.is_null());
        // Non-branch predecessors carry no annotation
        let yes = predecessors.iter().find(|n| n.id == "yes").unwrap();
        assert!(yes.data.config.params.is_null());
    }

    #[test]
    fn test_post_nodes() {
        let nodes = vec![
            make_node("A", "start"),
            make_node("B", "llm"),
            make_node("C", "end"),
            make_node("X", "llm"),
        ];
        let edges = vec![make_edge("A", "B"), make_edge("B", "C"), make_edge("X", "C")];

        assert_eq!(ids(&get_all_post_nodes("A", &nodes, &edges)), vec!["B", "C"]);
        assert!(get_all_post_nodes("C", &nodes, &edges).is_empty());
    }

    #[test]
    fn test_out_of_flow_detection() {
        let nodes = vec![make_node("A", "start"), make_node("B", "llm"), make_node("C", "end")];
        let connected = vec![make_edge("A", "B"), make_edge("B", "C")];
        let dangling = vec![make_edge("A", "B")];

        assert!(!check_has_node_out_of_flow(&nodes, &connected));
        assert!(check_has_node_out_of_flow(&nodes, &dangling));
        assert!(!check_has_node_out_of_flow(&[], &[]));
    }

    #[test]
    fn test_out_of_flow_ignores_cycle_back_to_trigger() {
        let nodes = vec![make_node("A", "start"), make_node("B", "llm")];
        let edges = vec![make_edge("A", "B"), make_edge("B", "A")];

        assert!(!check_has_node_out_of_flow(&nodes, &edges));
    }
}
