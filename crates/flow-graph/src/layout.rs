//! Auto-layout
//!
//! Layered (Sugiyama) layout through dagre, in two passes: the top-level
//! graph is laid out on its own, then each group's interior is laid out
//! independently and re-based into the group's local coordinate space.
//! Group boxes are then resized to fit their children.

use std::collections::{HashMap, HashSet};

use dagre_rust::{
    layout as dagre_layout_run, GraphConfig as DagreConfig, GraphEdge as DagreEdge,
    GraphNode as DagreNode,
};
use graphlib_rust::{Graph as DagreGraph, GraphOption};
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::types::{nesting_depth, CanvasNode, FlowEdge, HandlePosition, NodeId, Position};

/// Rank direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutDirection {
    #[default]
    #[serde(rename = "TB")]
    TopBottom,
    #[serde(rename = "BT")]
    BottomTop,
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "RL")]
    RightLeft,
}

impl LayoutDirection {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftRight | Self::RightLeft)
    }

    /// Handle sides for (target, source)
    pub fn handle_positions(self) -> (HandlePosition, HandlePosition) {
        if self.is_horizontal() {
            (HandlePosition::Left, HandlePosition::Right)
        } else {
            (HandlePosition::Top, HandlePosition::Bottom)
        }
    }

    fn rankdir(self) -> &'static str {
        match self {
            Self::TopBottom => "tb",
            Self::BottomTop => "bt",
            Self::LeftRight => "lr",
            Self::RightLeft => "rl",
        }
    }
}

/// A computed dagre layout, queryable by node id
pub struct LayeredLayout {
    graph: DagreGraph<DagreConfig, DagreNode, DagreEdge>,
}

impl LayeredLayout {
    /// Centre of a laid-out node
    pub fn node_center(&self, node_id: &String) -> Option<(f64, f64)> {
        self.graph
            .node(node_id)
            .map(|node| (f64::from(node.x), f64::from(node.y)))
    }
}

/// Lay out `nodes` with dagre
///
/// Only edges with both endpoints in `nodes` take part; parallel edges are
/// collapsed. Nodes without a measured size use their best known size.
pub fn dagre_layout(
    direction: LayoutDirection,
    nodes: &[&CanvasNode],
    edges: &[FlowEdge],
    config: &LayoutConfig,
) -> LayeredLayout {
    let mut graph: DagreGraph<DagreConfig, DagreNode, DagreEdge> =
        DagreGraph::new(Some(GraphOption {
            directed: Some(true),
            multigraph: Some(false),
            compound: Some(false),
        }));

    let mut graph_config = DagreConfig::default();
    graph_config.rankdir = Some(direction.rankdir().to_string());
    graph_config.nodesep = Some(config.node_separation as f32);
    graph_config.ranksep = Some(config.rank_separation as f32);
    graph_config.marginx = Some(0.0);
    graph_config.marginy = Some(0.0);
    graph.set_graph(graph_config);

    let mut node_set: HashSet<&str> = HashSet::new();
    for (order, canvas_node) in nodes.iter().enumerate() {
        let (width, height) = canvas_node.size_or_default();
        let mut node = DagreNode::default();
        node.width = width as f32;
        node.height = height as f32;
        node.order = Some(order);
        graph.set_node(canvas_node.id.clone(), Some(node));
        node_set.insert(canvas_node.id.as_str());
    }

    let mut edge_set: HashSet<(String, String)> = HashSet::new();
    for edge in edges {
        if !node_set.contains(edge.source.as_str()) || !node_set.contains(edge.target.as_str()) {
            continue;
        }
        let from = edge.source.clone();
        let to = edge.target.clone();
        if !edge_set.insert((from.clone(), to.clone())) {
            continue;
        }
        let _ = graph.set_edge(&from, &to, Some(DagreEdge::default()), None);
    }

    if !nodes.is_empty() {
        dagre_layout_run::run_layout(&mut graph);
    }

    LayeredLayout { graph }
}

/// Result of [`get_layout_elements`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutElements {
    pub nodes: Vec<CanvasNode>,
    pub edges: Vec<FlowEdge>,
}

/// Lay out a whole canvas graph
///
/// Returns the input unchanged when any node has not been measured yet.
/// Top-level positions are dagre centres minus half the node size; child
/// positions are relative to their group, offset by the group margins.
/// Children whose parent is not a group in `nodes` keep their position.
pub fn get_layout_elements(
    nodes: &[CanvasNode],
    edges: &[FlowEdge],
    direction: LayoutDirection,
    config: &LayoutConfig,
) -> LayoutElements {
    let unchanged = || LayoutElements {
        nodes: nodes.to_vec(),
        edges: edges.to_vec(),
    };

    if let Some(node) = nodes.iter().find(|n| n.measured_size().is_none()) {
        log::debug!("Layout deferred: node '{}' has not been measured", node.id);
        return unchanged();
    }

    let group_ids: HashSet<&str> = nodes
        .iter()
        .filter(|n| n.is_group())
        .map(|n| n.id.as_str())
        .collect();

    let top_level: Vec<&CanvasNode> = nodes.iter().filter(|n| n.parent().is_none()).collect();
    let top_layout = dagre_layout(direction, &top_level, edges, config);

    let mut group_layouts: HashMap<&str, LayeredLayout> = HashMap::new();
    for group_id in &group_ids {
        let children: Vec<&CanvasNode> =
            nodes.iter().filter(|n| n.parent() == Some(*group_id)).collect();
        if !children.is_empty() {
            group_layouts.insert(*group_id, dagre_layout(direction, &children, edges, config));
        }
    }

    let (target_position, source_position) = direction.handle_positions();
    let (origin_x, origin_y) = config.child_origin();

    let mut laid_out: Vec<CanvasNode> = nodes.to_vec();
    for node in &mut laid_out {
        let (width, height) = node.size_or_default();
        let placed = match node.parent_id.as_deref() {
            None => top_layout
                .node_center(&node.id)
                .map(|(cx, cy)| Position::new(cx - width / 2.0, cy - height / 2.0)),
            Some(parent) => group_layouts
                .get(parent)
                .and_then(|layout| layout.node_center(&node.id))
                .map(|(cx, cy)| {
                    Position::new(cx - width / 2.0 + origin_x, cy - height / 2.0 + origin_y)
                }),
        };

        if let Some(position) = placed {
            node.set_position(position);
            node.target_position = Some(target_position);
            node.source_position = Some(source_position);
        }
    }

    resize_groups(&mut laid_out, config);

    log::debug!(
        "Laid out {} nodes ({} groups) direction {:?}",
        laid_out.len(),
        group_ids.len(),
        direction
    );

    LayoutElements {
        nodes: laid_out,
        edges: edges.to_vec(),
    }
}

/// Fit every group around its children, innermost groups first
fn resize_groups(nodes: &mut [CanvasNode], config: &LayoutConfig) {
    let parents: HashMap<NodeId, NodeId> = nodes
        .iter()
        .filter_map(|n| n.parent_id.clone().map(|p| (n.id.clone(), p)))
        .collect();

    let mut groups: Vec<(usize, usize)> = nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.is_group())
        .map(|(i, n)| (nesting_depth(&n.id, &parents), i))
        .collect();
    groups.sort_by(|a, b| b.0.cmp(&a.0));

    for (_, index) in groups {
        let group_id = nodes[index].id.clone();
        let bounds = nodes
            .iter()
            .filter(|n| n.parent() == Some(group_id.as_str()))
            .map(|n| {
                let (width, height) = n.size_or_default();
                (n.position.x, n.position.y, n.position.x + width, n.position.y + height)
            })
            .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)));

        let (width, height) = match bounds {
            Some((min_x, min_y, max_x, max_y)) => {
                config.group_size_for(max_x - min_x, max_y - min_y)
            }
            None => (config.default_group_width, config.default_group_height),
        };
        nodes[index].set_box_size(width, height);
    }
}
