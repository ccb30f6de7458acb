//! Loop bodies
//!
//! A loop node owns exactly one loop-body group, linked forward through
//! `meta.relation_id` and drawn as an edge on the reserved `loop` handle.
//! Children of the group live in the group's local coordinate space.

use crate::config::LayoutConfig;
use crate::constants::{defaults, handles};
use crate::ids::IdGenerator;
use crate::model::resolve_render_props;
use crate::registry::SchemaRegistry;
use crate::types::{CanvasNode, FlowEdge, FlowNode, NodeKind, Position};

/// Nodes and edges created for a new loop body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoopBody {
    /// The group first, then its children
    pub new_nodes: Vec<CanvasNode>,
    /// Empty when the loop edge already existed
    pub new_edges: Vec<FlowEdge>,
}

impl LoopBody {
    /// The created group node
    pub fn group(&self) -> Option<&CanvasNode> {
        self.new_nodes.first()
    }
}

/// Size of the loop-start node, from its schema or the built-in default
fn loop_start_size(registry: &SchemaRegistry) -> (f64, f64) {
    let key = NodeKind::LoopStart.as_str();
    let style = registry
        .get_schema(key, &registry.latest_version(key))
        .map(|schema| schema.style)
        .unwrap_or_default();
    (
        style.width.unwrap_or(defaults::LOOP_START_WIDTH),
        style.height.unwrap_or(defaults::LOOP_START_HEIGHT),
    )
}

fn new_canvas_node(
    id: String,
    kind: NodeKind,
    position: Position,
    index: usize,
    registry: &SchemaRegistry,
) -> CanvasNode {
    let mut node = FlowNode::new(id, kind.clone());
    node.version = Some(registry.latest_version(kind.as_str()));
    node.meta.position = position;
    resolve_render_props(&node, index, registry)
}

/// Create the loop body owned by `loop_node`
///
/// The group is placed one rank to the right of the loop node and sized to
/// hold a single loop-start child. `loop_node.meta.relation_id` is pointed
/// at the new group. The loop edge is only created when `edges` has no edge
/// leaving `loop_node` on the loop handle, so repeated calls never
/// duplicate it.
pub fn generate_loop_body(
    loop_node: &mut CanvasNode,
    edges: &[FlowEdge],
    registry: &SchemaRegistry,
    ids: &dyn IdGenerator,
    config: &LayoutConfig,
) -> LoopBody {
    let (loop_width, _) = loop_node.size_or_default();
    let anchor = Position::new(
        loop_node.position.x + loop_width + config.rank_separation,
        loop_node.position.y,
    );

    let (start_width, start_height) = loop_start_size(registry);
    let (group_width, group_height) = config.group_size_for(start_width, start_height);

    let group_id = ids.next_id();
    let mut group = new_canvas_node(group_id.clone(), NodeKind::LoopBody, anchor, 0, registry);
    group.set_box_size(group_width, group_height);

    loop_node.data.config.meta.relation_id = Some(group_id.clone());

    let (child_x, child_y) = config.child_origin();
    let mut start = new_canvas_node(
        ids.next_id(),
        NodeKind::LoopStart,
        Position::new(child_x, child_y),
        1,
        registry,
    );
    start.set_parent(Some(group_id.clone()));
    start.style.width = Some(start_width);
    start.style.height = Some(start_height);

    let mut new_edges = Vec::new();
    if find_loop_edge(&loop_node.id, edges).is_none() {
        let mut edge = FlowEdge::new(ids.next_id(), loop_node.id.clone(), group_id.clone())
            .with_source_handle(handles::LOOP);
        edge.data.allow_add_on_line = false;
        new_edges.push(edge);
    } else {
        log::debug!("Loop node '{}' already has a loop edge", loop_node.id);
    }

    log::debug!("Created loop body '{}' for loop node '{}'", group_id, loop_node.id);

    LoopBody {
        new_nodes: vec![group, start],
        new_edges,
    }
}

/// The edge leaving `loop_id` on the loop handle, if any
pub fn find_loop_edge<'a>(loop_id: &str, edges: &'a [FlowEdge]) -> Option<&'a FlowEdge> {
    edges
        .iter()
        .find(|e| e.source == loop_id && e.source_handle.as_deref() == Some(handles::LOOP))
}

/// The loop body a loop node owns
pub fn find_loop_body<'a>(
    loop_node: &CanvasNode,
    nodes: &'a [CanvasNode],
) -> Option<&'a CanvasNode> {
    let body_id = loop_node.data.config.meta.relation_id.as_deref()?;
    nodes.iter().find(|n| n.id == body_id && n.is_group())
}

/// The loop node owning a loop body
pub fn find_owner_loop<'a>(group_id: &str, nodes: &'a [CanvasNode]) -> Option<&'a CanvasNode> {
    nodes
        .iter()
        .find(|n| n.data.config.meta.relation_id.as_deref() == Some(group_id))
}

/// Children of a group, in node order
pub fn children_of<'a>(group_id: &str, nodes: &'a [CanvasNode]) -> Vec<&'a CanvasNode> {
    nodes.iter().filter(|n| n.parent() == Some(group_id)).collect()
}
