//! Copy/paste of node selections
//!
//! A pasted selection is self-contained: successor lists and edges that
//! leave the selection are dropped, everything inside is rewritten to the
//! fresh ids. Id references nested in `params`/`input`/`output` are found
//! by walking the JSON tree and rewriting string values under known
//! reference keys on exact match only.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::config::CloneConfig;
use crate::ids::IdGenerator;
use crate::types::{order_groups_first, CanvasNode, FlowEdge, NodeId};

/// Old id to new id
pub type IdMap = HashMap<NodeId, NodeId>;

/// Nodes and edges produced by a paste
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PasteResult {
    pub paste_nodes: Vec<CanvasNode>,
    pub paste_edges: Vec<FlowEdge>,
}

fn clone_with_id(node: &CanvasNode, new_id: &str, offset: Option<(f64, f64)>) -> CanvasNode {
    let mut pasted = node.clone();
    pasted.id = new_id.to_string();
    pasted.data.config.node_id = new_id.to_string();
    if let Some((dx, dy)) = offset {
        pasted.set_position(node.position.translate(dx, dy));
    }
    pasted
}

/// Copy one node under a fresh id, shifted by the paste offset
///
/// `next_nodes` and other references are copied as they are.
pub fn generate_paste_node(
    node: &CanvasNode,
    ids: &dyn IdGenerator,
    config: &CloneConfig,
) -> CanvasNode {
    clone_with_id(node, &ids.next_id(), Some((config.offset_x, config.offset_y)))
}

/// Copy edges under fresh ids, mapping endpoints through `id_map`
///
/// Endpoints missing from the map are kept.
pub fn generate_paste_edges(
    id_map: &IdMap,
    edges: &[FlowEdge],
    ids: &dyn IdGenerator,
) -> Vec<FlowEdge> {
    let map = |id: &NodeId| id_map.get(id).cloned().unwrap_or_else(|| id.clone());
    edges
        .iter()
        .map(|edge| {
            let mut pasted = edge.clone();
            pasted.id = ids.next_id();
            pasted.source = map(&edge.source);
            pasted.target = map(&edge.target);
            pasted
        })
        .collect()
}

/// Duplicate a selection with its internal references intact
///
/// Nodes whose parent is also selected keep their group-relative position;
/// the others are shifted by the paste offset. A pasted child of an
/// unselected group stays in that group. Loop links (`relation_id`) to an
/// unselected body are cleared. A node selected twice is pasted once.
pub fn generate_paste_nodes_and_edges(
    selected_nodes: &[CanvasNode],
    selected_edges: &[FlowEdge],
    ids: &dyn IdGenerator,
    config: &CloneConfig,
) -> PasteResult {
    let mut selected: HashSet<&str> = HashSet::new();
    let unique: Vec<&CanvasNode> = selected_nodes
        .iter()
        .filter(|n| selected.insert(n.id.as_str()))
        .collect();
    let id_map: IdMap = unique.iter().map(|n| (n.id.clone(), ids.next_id())).collect();
    let reference_keys: HashSet<&str> =
        config.reference_keys.iter().map(String::as_str).collect();

    let remap_targets = |targets: &mut Vec<NodeId>| {
        targets.retain(|t| selected.contains(t.as_str()));
        for target in targets.iter_mut() {
            if let Some(new_id) = id_map.get(target.as_str()) {
                *target = new_id.clone();
            }
        }
    };

    let mut paste_nodes = Vec::with_capacity(unique.len());
    for node in unique {
        let Some(new_id) = id_map.get(&node.id) else {
            continue;
        };
        let parent_selected = node.parent().is_some_and(|p| selected.contains(p));
        let offset = (!parent_selected).then_some((config.offset_x, config.offset_y));
        let mut pasted = clone_with_id(node, new_id, offset);

        let config_node = &mut pasted.data.config;
        remap_targets(&mut config_node.next_nodes);
        if config_node.node_type.is_branching() {
            config_node.update_branch_targets(|_, targets| remap_targets(targets));
        }

        for value in [
            &mut config_node.params,
            &mut config_node.input,
            &mut config_node.output,
            &mut config_node.system_output,
        ] {
            rewrite_references(value, &id_map, &reference_keys);
        }

        config_node.meta.relation_id = config_node
            .meta
            .relation_id
            .as_ref()
            .and_then(|id| id_map.get(id).cloned());

        if parent_selected {
            let new_parent = node.parent().and_then(|p| id_map.get(p).cloned());
            pasted.set_parent(new_parent);
        }

        paste_nodes.push(pasted);
    }

    let internal_edges: Vec<FlowEdge> = selected_edges
        .iter()
        .filter(|e| selected.contains(e.source.as_str()) && selected.contains(e.target.as_str()))
        .cloned()
        .collect();
    let paste_edges = generate_paste_edges(&id_map, &internal_edges, ids);

    log::debug!(
        "Pasted {} nodes and {} edges ({} edges crossed the selection)",
        paste_nodes.len(),
        paste_edges.len(),
        selected_edges.len() - internal_edges.len()
    );

    PasteResult {
        paste_nodes: order_groups_first(paste_nodes),
        paste_edges,
    }
}

/// Rewrite node ids held under reference keys anywhere in `value`
pub fn rewrite_references(value: &mut Value, id_map: &IdMap, reference_keys: &HashSet<&str>) {
    match value {
        Value::Object(object) => {
            for (key, child) in object.iter_mut() {
                if reference_keys.contains(key.as_str()) {
                    rewrite_ids(child, id_map);
                }
                rewrite_references(child, id_map, reference_keys);
            }
        }
        Value::Array(items) => {
            for item in items {
                rewrite_references(item, id_map, reference_keys);
            }
        }
        _ => {}
    }
}

fn rewrite_ids(value: &mut Value, id_map: &IdMap) {
    match value {
        Value::String(id) => {
            if let Some(new_id) = id_map.get(id.as_str()) {
                *id = new_id.clone();
            }
        }
        Value::Array(items) => {
            for item in items {
                if let Value::String(id) = item {
                    if let Some(new_id) = id_map.get(id.as_str()) {
                        *id = new_id.clone();
                    }
                }
            }
        }
        _ => {}
    }
}
