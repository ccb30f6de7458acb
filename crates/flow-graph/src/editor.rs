//! Editing context
//!
//! [`FlowEditor`] owns one graph together with everything the engines need
//! to edit it: the schema registry, an id generator, the undo history and
//! the configuration. Each edit goes through the editor so `next_nodes`,
//! edges, steps and history stay in step with each other. Several editors
//! can share one registry and one id generator.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use crate::clone::{generate_paste_nodes_and_edges, PasteResult};
use crate::config::EditorConfig;
use crate::constants::handles;
use crate::document::FlowDocument;
use crate::error::{FlowGraphError, Result};
use crate::ids::IdGenerator;
use crate::layout::{get_layout_elements, LayoutElements};
use crate::loop_group::generate_loop_body;
use crate::model::resolve_render_props;
use crate::registry::SchemaRegistry;
use crate::steps::{update_target_nodes_step, Connection, StepUpdate};
use crate::topology::{
    check_has_node_out_of_flow, get_all_post_nodes, get_all_predecessors, sort_by_edges,
};
use crate::types::{CanvasNode, EdgeId, FlowEdge, FlowGraph, FlowNode, NodeId, NodeKind, Position};
use crate::undo::UndoStack;
use crate::validation::{validate_flow, ValidationError};

/// A flow graph being edited
pub struct FlowEditor {
    graph: FlowGraph,
    global_variable: Option<Value>,
    registry: Arc<SchemaRegistry>,
    ids: Arc<dyn IdGenerator>,
    undo: UndoStack,
    config: EditorConfig,
}

impl FlowEditor {
    /// Start editing an empty flow
    pub fn new(
        registry: Arc<SchemaRegistry>,
        ids: Arc<dyn IdGenerator>,
        config: EditorConfig,
    ) -> Result<Self> {
        Self::open(FlowDocument::default(), registry, ids, config)
    }

    /// Start editing a persisted flow
    pub fn open(
        document: FlowDocument,
        registry: Arc<SchemaRegistry>,
        ids: Arc<dyn IdGenerator>,
        config: EditorConfig,
    ) -> Result<Self> {
        let graph = FlowGraph::from_document(&document, &registry);
        let mut undo = UndoStack::new(config.undo_depth);
        undo.push(&graph, "Open")?;

        log::info!(
            "Opened flow with {} nodes and {} edges",
            graph.nodes.len(),
            graph.edges.len()
        );

        Ok(Self {
            graph,
            global_variable: document.global_variable,
            registry,
            ids,
            undo,
            config,
        })
    }

    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The persisted view of the current graph
    pub fn document(&self) -> FlowDocument {
        let mut document = self.graph.to_document();
        document.global_variable = self.global_variable.clone();
        document
    }

    fn checkpoint(&mut self, label: &str) -> Result<()> {
        self.undo.push(&self.graph, label)
    }

    fn node(&self, node_id: &str) -> Result<&CanvasNode> {
        self.graph
            .find_node(node_id)
            .ok_or_else(|| FlowGraphError::NodeNotFound(node_id.to_string()))
    }

    /// Add a node of the latest registered version
    ///
    /// With a `parent`, the node is placed inside that loop body and
    /// `position` is relative to it. Adding a loop node also creates its
    /// loop body. Returns the new node's id.
    pub fn add_node(
        &mut self,
        node_type: impl Into<NodeKind>,
        position: Position,
        parent: Option<&str>,
    ) -> Result<NodeId> {
        if let Some(parent_id) = parent {
            if !self.node(parent_id)?.is_group() {
                return Err(FlowGraphError::NotAGroup(parent_id.to_string()));
            }
        }

        let kind = node_type.into();
        let node_id = self.ids.next_id();
        let mut config = FlowNode::new(node_id.clone(), kind.clone());
        config.version = Some(self.registry.latest_version(kind.as_str()));
        config.meta.position = position;
        config.meta.parent_id = parent.map(str::to_string);

        let mut node = resolve_render_props(&config, self.graph.nodes.len(), &self.registry);

        let body = (kind == NodeKind::Loop).then(|| {
            generate_loop_body(
                &mut node,
                &self.graph.edges,
                &self.registry,
                self.ids.as_ref(),
                &self.config.layout,
            )
        });

        self.graph.nodes.push(node);
        if let Some(body) = body {
            for mut body_node in body.new_nodes {
                if body_node.parent().is_none() {
                    body_node.set_parent(parent.map(str::to_string));
                }
                self.graph.nodes.push(body_node);
            }
            self.graph.edges.extend(body.new_edges);
        }

        log::debug!("Added {} node '{}'", kind, node_id);
        self.checkpoint("Add node")?;
        Ok(node_id)
    }

    /// Report the size the canvas measured for a node
    pub fn set_node_size(&mut self, node_id: &str, width: f64, height: f64) -> Result<()> {
        let node = self
            .graph
            .find_node_mut(node_id)
            .ok_or_else(|| FlowGraphError::NodeNotFound(node_id.to_string()))?;
        node.width = Some(width);
        node.height = Some(height);
        Ok(())
    }

    /// Move a node (group-relative for children)
    pub fn move_node(&mut self, node_id: &str, position: Position) -> Result<()> {
        let node = self
            .graph
            .find_node_mut(node_id)
            .ok_or_else(|| FlowGraphError::NodeNotFound(node_id.to_string()))?;
        node.set_position(position);
        self.checkpoint("Move node")
    }

    /// Connect two nodes and re-annotate downstream steps
    ///
    /// Branch nodes must connect on one of their declared branches; the
    /// target is appended to that branch's `next_nodes`, otherwise to the
    /// source's `next_nodes`. Both endpoints must live in the same scope
    /// (top level or the same loop body).
    pub fn connect(&mut self, connection: Connection) -> Result<EdgeId> {
        let source = self.node(&connection.source)?;
        let target = self.node(&connection.target)?;
        let reject = |reason: &str| {
            Err(FlowGraphError::invalid_connection(
                &connection.source,
                &connection.target,
                reason,
            ))
        };

        if source.id == target.id {
            return reject("a node cannot connect to itself");
        }
        if target.is_group() {
            return reject("loop bodies are only reached through their loop node");
        }
        if source.parent() != target.parent() {
            return reject("endpoints are in different scopes");
        }
        let handle = connection.source_handle.as_deref();
        if handle == Some(handles::LOOP) {
            return reject("the loop handle is reserved");
        }
        if source.node_type().is_branching() {
            let declared =
                handle.is_some_and(|h| source.data.config.branch_ids().iter().any(|b| b == h));
            if !declared {
                return Err(FlowGraphError::UnknownBranch {
                    node_id: source.id.clone(),
                    handle: handle.unwrap_or_default().to_string(),
                });
            }
        }
        if self.graph.has_edge(&connection.source, &connection.target, handle) {
            return reject("the connection already exists");
        }

        let branching = source.node_type().is_branching();
        let edge_id = self.ids.next_id();
        let mut edge = FlowEdge::new(edge_id.clone(), &connection.source, &connection.target);
        edge.source_handle = connection.source_handle.clone();

        if let Some(source) = self.graph.find_node_mut(&connection.source) {
            let config = &mut source.data.config;
            let target_id = connection.target.clone();
            if branching {
                config.update_branch_targets(|branch_id, targets| {
                    if Some(branch_id) == handle && !targets.contains(&target_id) {
                        targets.push(target_id.clone());
                    }
                });
            } else if !config.next_nodes.contains(&target_id) {
                config.next_nodes.push(target_id);
            }
        }
        self.graph.edges.push(edge);

        update_target_nodes_step(
            &StepUpdate::connect(connection),
            &mut self.graph.nodes,
            &self.graph.edges,
        );
        self.checkpoint("Connect")?;
        Ok(edge_id)
    }

    /// Remove an edge and its `next_nodes` entry
    pub fn disconnect(&mut self, edge_id: &str) -> Result<FlowEdge> {
        let edge = self
            .graph
            .find_edge(edge_id)
            .cloned()
            .ok_or_else(|| FlowGraphError::EdgeNotFound(edge_id.to_string()))?;
        self.graph.edges.retain(|e| e.id != edge_id);

        let handle = edge.source_handle.as_deref();
        let still_linked = self.graph.has_edge(&edge.source, &edge.target, handle);
        if !still_linked {
            if let Some(source) = self.graph.find_node_mut(&edge.source) {
                let config = &mut source.data.config;
                if config.node_type.is_branching() {
                    config.update_branch_targets(|branch_id, targets| {
                        if Some(branch_id) == handle {
                            targets.retain(|t| *t != edge.target);
                        }
                    });
                } else {
                    config.next_nodes.retain(|t| *t != edge.target);
                }
            }
        }

        let mut connection = Connection::new(&edge.source, &edge.target);
        connection.source_handle = edge.source_handle.clone();
        update_target_nodes_step(
            &StepUpdate::disconnect(connection),
            &mut self.graph.nodes,
            &self.graph.edges,
        );
        self.checkpoint("Disconnect")?;
        Ok(edge)
    }

    /// Delete nodes with their edges and every reference to them
    ///
    /// Children of a deleted group are kept. Returns how many nodes were
    /// removed.
    pub fn remove_nodes(&mut self, node_ids: &[NodeId]) -> Result<usize> {
        let removed: HashSet<&str> = node_ids.iter().map(String::as_str).collect();
        let before = self.graph.nodes.len();
        self.graph.nodes.retain(|n| !removed.contains(n.id.as_str()));
        let count = before - self.graph.nodes.len();
        if count == 0 {
            return Ok(0);
        }

        let (dropped, kept): (Vec<FlowEdge>, Vec<FlowEdge>) =
            std::mem::take(&mut self.graph.edges)
                .into_iter()
                .partition(|e| {
                    removed.contains(e.source.as_str()) || removed.contains(e.target.as_str())
                });
        self.graph.edges = kept;

        for node in &mut self.graph.nodes {
            let config = &mut node.data.config;
            config.next_nodes.retain(|id| !removed.contains(id.as_str()));
            config.update_branch_targets(|_, targets| {
                targets.retain(|id| !removed.contains(id.as_str()))
            });
            if config
                .meta
                .relation_id
                .as_deref()
                .is_some_and(|id| removed.contains(id))
            {
                config.meta.relation_id = None;
            }
        }

        for edge in dropped.iter().filter(|e| !removed.contains(e.source.as_str())) {
            update_target_nodes_step(
                &StepUpdate::disconnect(Connection::new(&edge.source, &edge.target)),
                &mut self.graph.nodes,
                &self.graph.edges,
            );
        }

        log::debug!("Removed {} nodes and {} edges", count, dropped.len());
        self.checkpoint("Delete")?;
        Ok(count)
    }

    /// Lay out the whole graph in the configured direction
    ///
    /// Returns `false` (and changes nothing) while some node is unmeasured.
    pub fn auto_layout(&mut self) -> Result<bool> {
        if self.graph.nodes.iter().any(|n| n.measured_size().is_none()) {
            log::debug!("Auto layout skipped: graph not fully measured");
            return Ok(false);
        }
        let LayoutElements { nodes, edges } = get_layout_elements(
            &self.graph.nodes,
            &self.graph.edges,
            self.config.direction,
            &self.config.layout,
        );
        self.graph.nodes = nodes;
        self.graph.edges = edges;
        self.checkpoint("Auto layout")?;
        Ok(true)
    }

    /// Duplicate the given nodes (and the edges between them) into the graph
    pub fn paste(&mut self, node_ids: &[NodeId]) -> Result<PasteResult> {
        let wanted: HashSet<&str> = node_ids.iter().map(String::as_str).collect();
        let selected: Vec<CanvasNode> = self
            .graph
            .nodes
            .iter()
            .filter(|n| wanted.contains(n.id.as_str()))
            .cloned()
            .collect();
        if selected.is_empty() {
            return Ok(PasteResult::default());
        }

        let result = generate_paste_nodes_and_edges(
            &selected,
            &self.graph.edges,
            self.ids.as_ref(),
            &self.config.clone,
        );
        self.graph.nodes.extend(result.paste_nodes.iter().cloned());
        self.graph.edges.extend(result.paste_edges.iter().cloned());
        self.checkpoint("Paste")?;
        Ok(result)
    }

    /// Every node upstream of `node_id`, branch outputs annotated
    pub fn predecessors(&self, node_id: &str) -> Vec<CanvasNode> {
        get_all_predecessors(node_id, &self.graph.nodes, &self.graph.edges)
    }

    /// Every node downstream of `node_id`
    pub fn post_nodes(&self, node_id: &str) -> Vec<CanvasNode> {
        get_all_post_nodes(node_id, &self.graph.nodes, &self.graph.edges)
    }

    /// Topological order; shorter than the graph when it has a cycle
    pub fn execution_order(&self) -> Vec<CanvasNode> {
        sort_by_edges(&self.graph.nodes, &self.graph.edges)
    }

    /// Whether any node is unreachable from its scope's entry node
    ///
    /// The top level is walked from the start node, each loop body from
    /// its loop-start node.
    pub fn has_node_out_of_flow(&self) -> bool {
        let top_level = entry_first(
            self.graph.nodes.iter().filter(|n| n.parent().is_none()),
            &NodeKind::Start,
        );
        if check_has_node_out_of_flow(&top_level, &self.graph.edges) {
            return true;
        }

        self.graph.nodes.iter().filter(|n| n.is_group()).any(|group| {
            let children = entry_first(self.graph.children_of(&group.id), &NodeKind::LoopStart);
            check_has_node_out_of_flow(&children, &self.graph.edges)
        })
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        validate_flow(&self.graph, Some(self.registry.as_ref()))
    }

    /// Revert the last edit; `false` when there is nothing to undo
    pub fn undo(&mut self) -> Result<bool> {
        match self.undo.undo() {
            Some(graph) => {
                self.graph = graph?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Reapply the last undone edit; `false` when there is nothing to redo
    pub fn redo(&mut self) -> Result<bool> {
        match self.undo.redo() {
            Some(graph) => {
                self.graph = graph?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }
}

/// Clone `nodes`, moving the first node of kind `entry` to the front
fn entry_first<'a>(
    nodes: impl Iterator<Item = &'a CanvasNode>,
    entry: &NodeKind,
) -> Vec<CanvasNode> {
    let mut nodes: Vec<CanvasNode> = nodes.cloned().collect();
    if let Some(index) = nodes.iter().position(|n| n.node_type() == entry) {
        let node = nodes.remove(index);
        nodes.insert(0, node);
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIdGenerator;
    use crate::registry::NodeSchema;
    use serde_json::json;

    fn make_registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        for (key, label) in [
            ("start", "Start"),
            ("llm", "LLM"),
            ("end", "End"),
            ("loop", "Loop"),
            ("loop-body", "Loop body"),
            ("loop-start", "Loop start"),
        ] {
            registry.register(NodeSchema::new(key, "v0", label));
        }
        registry.register(
            NodeSchema::new("condition", "v0", "Condition").with_default_params(json!({
                "branches": [
                    {"branch_id": "if", "next_nodes": []},
                    {"branch_id": "else", "next_nodes": []}
                ]
            })),
        );
        registry
    }

    fn make_editor() -> FlowEditor {
        FlowEditor::new(
            Arc::new(make_registry()),
            Arc::new(SequentialIdGenerator::new("n")),
            EditorConfig::default(),
        )
        .unwrap()
    }

    fn add(editor: &mut FlowEditor, kind: &str) -> NodeId {
        editor.add_node(kind, Position::default(), None).unwrap()
    }

    fn config_of<'a>(editor: &'a FlowEditor, id: &str) -> &'a FlowNode {
        &editor.graph().find_node(id).unwrap().data.config
    }

    #[test]
    fn test_connect_updates_next_nodes_and_steps() {
        let mut editor = make_editor();
        let start = add(&mut editor, "start");
        let llm = add(&mut editor, "llm");
        let end = add(&mut editor, "end");

        editor.connect(Connection::new(&llm, &end)).unwrap();
        editor.connect(Connection::new(&start, &llm)).unwrap();

        assert_eq!(config_of(&editor, &start).next_nodes, vec![llm.clone()]);
        assert_eq!(config_of(&editor, &llm).step, 1);
        assert_eq!(config_of(&editor, &end).step, 2);
        assert!(!editor.has_node_out_of_flow());
        assert!(editor.validate().is_empty());

        let order: Vec<String> = editor.execution_order().into_iter().map(|n| n.id).collect();
        assert_eq!(order, vec![start, llm, end]);
    }

    #[test]
    fn test_branch_connections() {
        let mut editor = make_editor();
        let cond = add(&mut editor, "condition");
        let yes = add(&mut editor, "llm");

        let err = editor.connect(Connection::new(&cond, &yes)).unwrap_err();
        assert!(matches!(err, FlowGraphError::UnknownBranch { .. }));
        let err = editor
            .connect(Connection::new(&cond, &yes).with_source_handle("elif"))
            .unwrap_err();
        assert!(matches!(err, FlowGraphError::UnknownBranch { .. }));

        editor
            .connect(Connection::new(&cond, &yes).with_source_handle("if"))
            .unwrap();
        let config = config_of(&editor, &cond);
        assert_eq!(config.branch_targets("if"), vec![yes.clone()]);
        assert!(config.branch_targets("else").is_empty());
        assert!(config.next_nodes.is_empty());
    }

    #[test]
    fn test_rejected_connections() {
        let mut editor = make_editor();
        let a = add(&mut editor, "llm");
        let b = add(&mut editor, "llm");
        editor.connect(Connection::new(&a, &b)).unwrap();

        for connection in [
            Connection::new(&a, &b),
            Connection::new(&a, &a),
            Connection::new(&b, &a).with_source_handle(handles::LOOP),
        ] {
            let err = editor.connect(connection).unwrap_err();
            assert!(matches!(err, FlowGraphError::InvalidConnection { .. }));
        }
        assert!(matches!(
            editor.connect(Connection::new(&a, "missing")),
            Err(FlowGraphError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_add_loop_creates_body() {
        let mut editor = make_editor();
        let start = add(&mut editor, "start");
        let loop_id = add(&mut editor, "loop");
        editor.connect(Connection::new(&start, &loop_id)).unwrap();

        let graph = editor.graph();
        assert_eq!(graph.nodes.len(), 4);
        let body_id = config_of(&editor, &loop_id).meta.relation_id.clone().unwrap();
        let body = graph.find_node(&body_id).unwrap();
        assert!(body.is_group());
        assert_eq!(graph.children_of(&body_id).count(), 1);
        assert!(graph.has_edge(&loop_id, &body_id, Some(handles::LOOP)));
        assert!(editor.validate().is_empty());
        assert!(!editor.has_node_out_of_flow());

        // A node dropped into the body without a connection is out of flow
        let stray = editor.add_node("llm", Position::new(40.0, 300.0), Some(&body_id)).unwrap();
        assert_eq!(editor.graph().find_node(&stray).unwrap().parent(), Some(body_id.as_str()));
        assert!(editor.has_node_out_of_flow());

        // Connecting across scopes is rejected
        let err = editor.connect(Connection::new(&start, &stray)).unwrap_err();
        assert!(matches!(err, FlowGraphError::InvalidConnection { .. }));

        let err = editor.add_node("llm", Position::default(), Some(&start)).unwrap_err();
        assert!(matches!(err, FlowGraphError::NotAGroup(_)));
    }

    #[test]
    fn test_disconnect_removes_next_node() {
        let mut editor = make_editor();
        let a = add(&mut editor, "start");
        let b = add(&mut editor, "llm");
        let edge_id = editor.connect(Connection::new(&a, &b)).unwrap();
        assert_eq!(
            editor.graph().find_edge(&edge_id).map(|e| e.source.as_str()),
            Some(a.as_str())
        );

        let edge = editor.disconnect(&edge_id).unwrap();
        assert_eq!(edge.target, b);
        assert!(editor.graph().find_edge(&edge_id).is_none());
        assert!(config_of(&editor, &a).next_nodes.is_empty());
        assert!(editor.graph().edges.is_empty());
        assert!(matches!(editor.disconnect(&edge_id), Err(FlowGraphError::EdgeNotFound(_))));
    }

    #[test]
    fn test_remove_nodes_scrubs_references() {
        let mut editor = make_editor();
        let a = add(&mut editor, "start");
        let b = add(&mut editor, "llm");
        let c = add(&mut editor, "end");
        editor.connect(Connection::new(&a, &b)).unwrap();
        editor.connect(Connection::new(&b, &c)).unwrap();

        assert_eq!(editor.remove_nodes(&[b.clone()]).unwrap(), 1);
        assert!(editor.graph().find_node(&b).is_none());
        assert!(editor.graph().edges.is_empty());
        assert!(config_of(&editor, &a).next_nodes.is_empty());
        assert_eq!(editor.remove_nodes(&[b]).unwrap(), 0);
    }

    #[test]
    fn test_remove_group_keeps_children() {
        let mut editor = make_editor();
        let loop_id = add(&mut editor, "loop");
        let body_id = config_of(&editor, &loop_id).meta.relation_id.clone().unwrap();

        editor.remove_nodes(&[body_id.clone()]).unwrap();
        assert_eq!(editor.graph().children_of(&body_id).count(), 1);
        assert!(config_of(&editor, &loop_id).meta.relation_id.is_none());
        assert!(editor.graph().edges.is_empty());
    }

    #[test]
    fn test_paste_appends_copies() {
        let mut editor = make_editor();
        let a = add(&mut editor, "start");
        let b = add(&mut editor, "llm");
        editor.connect(Connection::new(&a, &b)).unwrap();

        let result = editor.paste(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(result.paste_nodes.len(), 2);
        assert_eq!(result.paste_edges.len(), 1);
        assert_eq!(editor.graph().nodes.len(), 4);
        assert_eq!(editor.graph().edges.len(), 2);
        assert!(result.paste_nodes.iter().all(|n| n.id != a && n.id != b));
        assert!(editor.paste(&["missing".to_string()]).unwrap().paste_nodes.is_empty());
    }

    #[test]
    fn test_undo_redo() {
        let mut editor = make_editor();
        assert!(!editor.undo().unwrap());

        let a = add(&mut editor, "start");
        add(&mut editor, "llm");
        assert_eq!(editor.graph().nodes.len(), 2);

        assert!(editor.undo().unwrap());
        assert_eq!(editor.graph().nodes.len(), 1);
        assert_eq!(editor.graph().nodes[0].id, a);
        assert!(editor.can_redo());

        assert!(editor.redo().unwrap());
        assert_eq!(editor.graph().nodes.len(), 2);
        assert!(!editor.redo().unwrap());
    }

    #[test]
    fn test_auto_layout_waits_for_measurements() {
        let mut editor = make_editor();
        let a = add(&mut editor, "start");
        let b = add(&mut editor, "llm");
        editor.connect(Connection::new(&a, &b)).unwrap();

        assert!(!editor.auto_layout().unwrap());

        editor.set_node_size(&a, 200.0, 80.0).unwrap();
        editor.set_node_size(&b, 200.0, 80.0).unwrap();
        assert!(editor.auto_layout().unwrap());

        let graph = editor.graph();
        let a = graph.find_node(&a).unwrap();
        let b = graph.find_node(&b).unwrap();
        assert!(a.position.y < b.position.y);
        assert_eq!(a.data.config.meta.position, a.position);
    }

    #[test]
    fn test_open_and_save_document() {
        let document = FlowDocument::from_json(
            r#"{
                "nodes": [
                    {"node_id": "s", "node_type": "start", "version": "v0", "name": "Start",
                     "next_nodes": ["l"]},
                    {"node_id": "l", "node_type": "llm", "version": "v0", "name": "LLM", "step": 1}
                ],
                "edges": [{"id": "e", "source": "s", "target": "l"}],
                "global_variable": {"type": "object"}
            }"#,
        )
        .unwrap();

        let editor = FlowEditor::open(
            document.clone(),
            Arc::new(make_registry()),
            Arc::new(SequentialIdGenerator::new("n")),
            EditorConfig::default(),
        )
        .unwrap();

        assert_eq!(editor.predecessors("l").len(), 1);
        assert_eq!(editor.post_nodes("s").len(), 1);
        assert_eq!(editor.document(), document);
    }
}
