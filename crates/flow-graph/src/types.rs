//! Core types for flow graphs
//!
//! Two shapes of the same graph live here:
//!
//! - the wire shape ([`FlowNode`], [`FlowEdge`]) that persistence and the
//!   execution runtime read, with snake_case node fields
//! - the canvas shape ([`CanvasNode`]) that the renderer reads, with the
//!   merged schema properties under `data` and the parent-clipping triple
//!
//! Every engine in this crate operates on a [`FlowGraph`] of canvas nodes.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{canvas, defaults};

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for an edge
pub type EdgeId = String;

/// The type of a flow node
///
/// Known types are enumerated; anything else deserializes into
/// [`NodeKind::Unknown`] and serializes back to the same string, so a
/// document written by a newer editor survives a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    /// Trigger node; every flow starts here
    Start,
    /// LLM call
    Llm,
    /// Tool / plugin invocation
    Tool,
    /// HTTP request
    Http,
    /// Knowledge-base query
    Knowledge,
    /// Inline code
    Code,
    /// Condition branch (if / elif / else)
    Condition,
    /// Intent recognition branch
    Intent,
    /// Loop controller; owns a loop body through `meta.relation_id`
    Loop,
    /// Loop body group containing its own mini-graph
    LoopBody,
    /// Entry node created inside every loop body
    LoopStart,
    /// Sub-flow call
    SubFlow,
    /// Flow end
    End,
    /// A type this build does not know
    Unknown(String),
}

impl NodeKind {
    /// The wire key of this node type
    pub fn as_str(&self) -> &str {
        match self {
            Self::Start => "start",
            Self::Llm => "llm",
            Self::Tool => "tool",
            Self::Http => "http",
            Self::Knowledge => "knowledge",
            Self::Code => "code",
            Self::Condition => "condition",
            Self::Intent => "intent",
            Self::Loop => "loop",
            Self::LoopBody => "loop-body",
            Self::LoopStart => "loop-start",
            Self::SubFlow => "flow",
            Self::End => "end",
            Self::Unknown(key) => key,
        }
    }

    /// Whether nodes of this type route through named `branches[]`
    pub fn is_branching(&self) -> bool {
        matches!(self, Self::Condition | Self::Intent)
    }

    /// Whether this is the loop-body group type
    pub fn is_loop_body(&self) -> bool {
        matches!(self, Self::LoopBody)
    }
}

impl From<&str> for NodeKind {
    fn from(key: &str) -> Self {
        match key {
            "start" => Self::Start,
            "llm" => Self::Llm,
            "tool" => Self::Tool,
            "http" => Self::Http,
            "knowledge" => Self::Knowledge,
            "code" => Self::Code,
            "condition" => Self::Condition,
            "intent" => Self::Intent,
            "loop" => Self::Loop,
            "loop-body" => Self::LoopBody,
            "loop-start" => Self::LoopStart,
            "flow" => Self::SubFlow,
            "end" => Self::End,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for NodeKind {
    fn from(key: String) -> Self {
        Self::from(key.as_str())
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Unknown(key) => key,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canvas coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Return this position moved by (dx, dy)
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Box size of a node, either part may be unknown
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl NodeStyle {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }
}

/// Whether the user may swap the node type or operate on the node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Changeable {
    pub node_type: bool,
    pub operation: bool,
}

/// Source-handle rendering flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleConfig {
    pub with_source_handle: bool,
    pub operation: bool,
}

/// Per-node override of [`Changeable`]; unset fields keep the schema value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeableOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<bool>,
}

/// Per-node override of [`HandleConfig`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_source_handle: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<bool>,
}

/// Editor metadata persisted with each node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMeta {
    /// Authoritative position (group-relative for children)
    #[serde(default)]
    pub position: Position,
    /// Owning loop body, set iff the node lives inside a group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    /// Owned loop body, set on loop nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<NodeStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changeable: Option<ChangeableOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<HandleOverride>,
}

/// A node as persisted and as read by the execution runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub node_id: NodeId,
    pub node_type: NodeKind,
    /// Schema version; resolved against the registry when rendered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub meta: NodeMeta,
    #[serde(default)]
    pub params: Value,
    /// Explicit successor list used by the runtime
    #[serde(default)]
    pub next_nodes: Vec<NodeId>,
    /// Advisory distance from the trigger node
    #[serde(default)]
    pub step: u32,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub input: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub output: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub system_output: Value,
}

impl FlowNode {
    /// Create a node with empty configuration
    pub fn new(node_id: impl Into<String>, node_type: impl Into<NodeKind>) -> Self {
        Self {
            node_id: node_id.into(),
            node_type: node_type.into(),
            version: None,
            name: String::new(),
            meta: NodeMeta::default(),
            params: Value::Null,
            next_nodes: Vec::new(),
            step: 0,
            input: Value::Null,
            output: Value::Null,
            system_output: Value::Null,
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.meta.position = Position::new(x, y);
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    pub fn with_next_nodes(mut self, next_nodes: Vec<NodeId>) -> Self {
        self.next_nodes = next_nodes;
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.meta.parent_id = Some(parent_id.into());
        self
    }

    /// Declared `params.branches[].branch_id`, in order
    pub fn branch_ids(&self) -> Vec<String> {
        self.params
            .get("branches")
            .and_then(Value::as_array)
            .map(|branches| {
                branches
                    .iter()
                    .filter_map(|b| b.get("branch_id").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Successors declared by one branch
    pub fn branch_targets(&self, branch_id: &str) -> Vec<NodeId> {
        self.params
            .get("branches")
            .and_then(Value::as_array)
            .and_then(|branches| {
                branches
                    .iter()
                    .find(|b| b.get("branch_id").and_then(Value::as_str) == Some(branch_id))
            })
            .and_then(|b| b.get("next_nodes"))
            .map(string_list)
            .unwrap_or_default()
    }

    /// Visit every branch's successor list mutably
    ///
    /// The closure receives the branch id and the parsed `next_nodes`; the
    /// list is written back afterwards. Nodes without `params.branches` are
    /// left untouched.
    pub fn update_branch_targets<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut Vec<NodeId>),
    {
        let Some(branches) = self
            .params
            .get_mut("branches")
            .and_then(Value::as_array_mut)
        else {
            return;
        };

        for branch in branches.iter_mut() {
            let Some(obj) = branch.as_object_mut() else {
                continue;
            };
            let branch_id = obj
                .get("branch_id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let mut targets = obj.get("next_nodes").map(string_list).unwrap_or_default();
            f(&branch_id, &mut targets);
            obj.insert("next_nodes".to_string(), Value::from(targets));
        }
    }
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Extra edge flags read by the canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    #[serde(default)]
    pub allow_add_on_line: bool,
}

/// A directed connection between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    /// Disambiguates multiple edges leaving a branch or loop node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(default)]
    pub data: EdgeData,
}

impl FlowEdge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            data: EdgeData {
                allow_add_on_line: true,
            },
        }
    }

    pub fn with_source_handle(mut self, handle: impl Into<String>) -> Self {
        self.source_handle = Some(handle.into());
        self
    }
}

/// React-canvas node component key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanvasNodeType {
    #[default]
    CommonNode,
    Group,
}

/// Side of a node a handle is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlePosition {
    Top,
    Bottom,
    Left,
    Right,
}

/// Canvas `data` payload: the flow node plus merged render properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(flatten)]
    pub config: FlowNode,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub style: NodeStyle,
    #[serde(default)]
    pub changeable: Changeable,
    #[serde(default)]
    pub handle: HandleConfig,
    #[serde(default)]
    pub addable: bool,
}

impl NodeData {
    /// Wrap a flow node with empty render properties
    pub fn bare(config: FlowNode) -> Self {
        Self {
            config,
            label: String::new(),
            icon: String::new(),
            desc: String::new(),
            style: NodeStyle::default(),
            changeable: Changeable::default(),
            handle: HandleConfig::default(),
            addable: false,
        }
    }
}

/// A node as the canvas renders it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: CanvasNodeType,
    /// Render cache of `data.meta.position`
    pub position: Position,
    pub data: NodeData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand_parent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<String>,
    /// Measured by the canvas; `None` until the node has been drawn once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub style: NodeStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_position: Option<HandlePosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_position: Option<HandlePosition>,
    /// Render ordinal assigned when the node was resolved
    #[serde(default)]
    pub step: usize,
}

impl CanvasNode {
    /// Wrap a flow node without consulting a schema
    pub fn from_flow_node(node: FlowNode) -> Self {
        let kind = if node.node_type.is_loop_body() {
            CanvasNodeType::Group
        } else {
            CanvasNodeType::CommonNode
        };
        let position = node.meta.position;
        let parent_id = node.meta.parent_id.clone();
        let mut canvas = Self {
            id: node.node_id.clone(),
            kind,
            position,
            data: NodeData::bare(node),
            parent_id: None,
            expand_parent: None,
            extent: None,
            width: None,
            height: None,
            style: NodeStyle::default(),
            target_position: None,
            source_position: None,
            step: 0,
        };
        canvas.set_parent(parent_id);
        canvas
    }

    /// Set the measured size
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn node_type(&self) -> &NodeKind {
        &self.data.config.node_type
    }

    /// Whether this node is a loop-body group
    pub fn is_group(&self) -> bool {
        self.kind == CanvasNodeType::Group || self.data.config.node_type.is_loop_body()
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// Measured size, if the canvas has reported both dimensions
    pub fn measured_size(&self) -> Option<(f64, f64)> {
        Some((self.width?, self.height?))
    }

    /// Best known size: measured, then style, then schema style, then defaults
    pub fn size_or_default(&self) -> (f64, f64) {
        let width = self
            .width
            .or(self.style.width)
            .or(self.data.style.width)
            .unwrap_or(defaults::NODE_WIDTH);
        let height = self
            .height
            .or(self.style.height)
            .or(self.data.style.height)
            .unwrap_or(defaults::NODE_HEIGHT);
        (width, height)
    }

    /// Move the node, keeping the persisted position in sync
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
        self.data.config.meta.position = position;
    }

    /// Attach to (or detach from) a group, keeping both parent fields in sync
    pub fn set_parent(&mut self, parent_id: Option<NodeId>) {
        match parent_id {
            Some(parent_id) => {
                self.parent_id = Some(parent_id.clone());
                self.expand_parent = Some(true);
                self.extent = Some(canvas::EXTENT_PARENT.to_string());
                self.data.config.meta.parent_id = Some(parent_id);
            }
            None => {
                self.parent_id = None;
                self.expand_parent = None;
                self.extent = None;
                self.data.config.meta.parent_id = None;
            }
        }
    }

    /// Set the measured and style size (used for groups)
    ///
    /// The size is also written to `meta.style` so it survives persistence.
    pub fn set_box_size(&mut self, width: f64, height: f64) {
        let style = NodeStyle::sized(width, height);
        self.width = Some(width);
        self.height = Some(height);
        self.style = style;
        self.data.style = style;
        self.data.config.meta.style = Some(style);
    }

    /// Persisted view of this node
    pub fn to_flow_node(&self) -> FlowNode {
        let mut node = self.data.config.clone();
        node.node_id = self.id.clone();
        node.meta.position = self.position;
        node.meta.parent_id = self.parent_id.clone();
        node
    }
}

/// The canvas graph every engine operates on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    pub nodes: Vec<CanvasNode>,
    pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
    pub fn new(nodes: Vec<CanvasNode>, edges: Vec<FlowEdge>) -> Self {
        Self { nodes, edges }
    }

    /// Find a node by ID
    pub fn find_node(&self, id: &str) -> Option<&CanvasNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find a node by ID (mutable)
    pub fn find_node_mut(&mut self, id: &str) -> Option<&mut CanvasNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Find an edge by ID
    pub fn find_edge(&self, id: &str) -> Option<&FlowEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Get edges coming into a node
    pub fn incoming_edges<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a FlowEdge> + 'a {
        self.edges.iter().filter(move |e| e.target == node_id)
    }

    /// Get edges going out of a node
    pub fn outgoing_edges<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a FlowEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == node_id)
    }

    /// Get the IDs of nodes that this node depends on (upstream nodes)
    pub fn get_dependencies(&self, node_id: &str) -> Vec<NodeId> {
        self.incoming_edges(node_id)
            .map(|e| e.source.clone())
            .collect()
    }

    /// Get the IDs of nodes that depend on this node (downstream nodes)
    pub fn get_dependents(&self, node_id: &str) -> Vec<NodeId> {
        self.outgoing_edges(node_id)
            .map(|e| e.target.clone())
            .collect()
    }

    /// Nodes whose parent is the given group
    pub fn children_of<'a>(
        &'a self,
        group_id: &'a str,
    ) -> impl Iterator<Item = &'a CanvasNode> + 'a {
        self.nodes.iter().filter(move |n| n.parent() == Some(group_id))
    }

    /// Whether an edge with this source, target and handle already exists
    pub fn has_edge(&self, source: &str, target: &str, source_handle: Option<&str>) -> bool {
        self.edges.iter().any(|e| {
            e.source == source && e.target == target && e.source_handle.as_deref() == source_handle
        })
    }
}

/// Stable reorder so every group precedes the nodes it contains
///
/// Nodes are ordered by nesting depth, so nested groups also come after
/// their own parent. Parents missing from `nodes` do not count towards the
/// depth.
pub fn order_groups_first(nodes: Vec<CanvasNode>) -> Vec<CanvasNode> {
    let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let parents: HashMap<NodeId, NodeId> = nodes
        .iter()
        .filter_map(|n| {
            n.parent()
                .filter(|p| ids.contains(p))
                .map(|p| (n.id.clone(), p.to_string()))
        })
        .collect();

    let mut ranked: Vec<(usize, CanvasNode)> = nodes
        .into_iter()
        .map(|n| (nesting_depth(&n.id, &parents), n))
        .collect();
    ranked.sort_by_key(|(depth, _)| *depth);
    ranked.into_iter().map(|(_, n)| n).collect()
}

/// Number of ancestors above `node_id`, stopping at a parent cycle
pub(crate) fn nesting_depth(node_id: &str, parents: &HashMap<NodeId, NodeId>) -> usize {
    let mut depth = 0;
    let mut seen: HashSet<&str> = HashSet::new();
    let mut current = node_id;
    while let Some(parent) = parents.get(current) {
        if !seen.insert(parent.as_str()) {
            break;
        }
        depth += 1;
        current = parent.as_str();
    }
    depth
}
