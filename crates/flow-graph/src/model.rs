//! Graph model: resolving persisted nodes into canvas nodes
//!
//! A node is rendered with the schema registered for its `(type, version)`.
//! Missing versions resolve to the type's oldest registered version (those
//! documents predate versioning); versions the registry does not know fall
//! back to the latest one; unknown types render with empty defaults so the
//! editor stays usable after a schema is retired.

use crate::document::FlowDocument;
use crate::registry::{NodeSchema, SchemaRegistry, SchemaResolution};
use crate::types::{
    order_groups_first, CanvasNode, CanvasNodeType, Changeable, FlowGraph, FlowNode, HandleConfig,
    NodeData, NodeStyle,
};

/// Latest registered version of a node type (default version if none)
pub fn latest_node_version(registry: &SchemaRegistry, node_type: &str) -> String {
    registry.latest_version(node_type)
}

/// Build the canvas view of a persisted node
///
/// `index` becomes the node's render ordinal (`step`).
pub fn resolve_render_props(
    node: &FlowNode,
    index: usize,
    registry: &SchemaRegistry,
) -> CanvasNode {
    let node_type = node.node_type.as_str();
    let version = node
        .version
        .clone()
        .unwrap_or_else(|| registry.oldest_version(node_type));

    let schema = match registry.resolve(node_type, &version) {
        SchemaResolution::Exact(schema) => schema.clone(),
        SchemaResolution::LatestFallback(schema) => {
            log::debug!(
                "Node '{}': version '{}' of '{}' not registered, using '{}'",
                node.node_id,
                version,
                node_type,
                schema.version
            );
            schema.clone()
        }
        SchemaResolution::Unresolved => {
            log::warn!(
                "Node '{}': no schema registered for type '{}', rendering with defaults",
                node.node_id,
                node_type
            );
            NodeSchema::default()
        }
    };

    let mut config = node.clone();
    if config.version.is_none() {
        config.version = Some(version);
    }
    if config.params.is_null() {
        config.params = schema.default_params.clone();
    }
    if config.input.is_null() {
        config.input = schema.input.clone();
    }
    if config.output.is_null() {
        config.output = schema.output.clone();
    }
    if config.name.is_empty() {
        config.name = schema.label.clone();
    }

    let meta = &node.meta;
    let changeable = Changeable {
        node_type: meta
            .changeable
            .and_then(|c| c.node_type)
            .unwrap_or(schema.changeable.node_type),
        operation: meta
            .changeable
            .and_then(|c| c.operation)
            .unwrap_or(schema.changeable.operation),
    };
    let handle = HandleConfig {
        with_source_handle: meta
            .handle
            .and_then(|h| h.with_source_handle)
            .unwrap_or(schema.handle.with_source_handle),
        operation: meta
            .handle
            .and_then(|h| h.operation)
            .unwrap_or(schema.handle.operation),
    };
    let style = NodeStyle {
        width: meta.style.and_then(|s| s.width).or(schema.style.width),
        height: meta.style.and_then(|s| s.height).or(schema.style.height),
    };

    let kind = if node.node_type.is_loop_body() {
        CanvasNodeType::Group
    } else {
        CanvasNodeType::CommonNode
    };

    let mut canvas = CanvasNode {
        id: node.node_id.clone(),
        kind,
        position: meta.position,
        data: NodeData {
            config,
            label: schema.label.clone(),
            icon: meta.icon.clone().unwrap_or_else(|| schema.icon.clone()),
            desc: meta.desc.clone().unwrap_or_else(|| schema.desc.clone()),
            style,
            changeable,
            handle,
            addable: schema.addable,
        },
        parent_id: None,
        expand_parent: None,
        extent: None,
        width: None,
        height: None,
        style,
        target_position: None,
        source_position: None,
        step: index,
    };
    canvas.set_parent(meta.parent_id.clone());
    canvas
}

impl FlowGraph {
    /// Resolve every node of a document; groups are placed before their children
    pub fn from_document(document: &FlowDocument, registry: &SchemaRegistry) -> Self {
        let nodes = document
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| resolve_render_props(node, index, registry))
            .collect();

        Self {
            nodes: order_groups_first(nodes),
            edges: document.edges.clone(),
        }
    }

    /// Persisted view of the graph (without global variables)
    pub fn to_document(&self) -> FlowDocument {
        FlowDocument::new(
            self.nodes.iter().map(CanvasNode::to_flow_node).collect(),
            self.edges.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChangeableOverride, FlowEdge, NodeKind, NodeStyle, Position};

    fn make_registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.register(
            NodeSchema::new("llm", "v0", "LLM v0")
                .with_icon("llm.svg")
                .with_size(320.0, 120.0)
                .with_changeable(true, true)
                .with_handle(true, true)
                .with_default_params(serde_json::json!({"model": "default"})),
        );
        registry.register(NodeSchema::new("llm", "v1", "LLM v1").with_size(360.0, 140.0));
        registry.register(NodeSchema::new("loop-body", "v0", "Loop body"));
        registry
    }

    #[test]
    fn test_missing_version_uses_oldest_schema() {
        let registry = make_registry();
        let node = FlowNode::new("n1", "llm");

        let canvas = resolve_render_props(&node, 3, &registry);
        assert_eq!(canvas.id, "n1");
        assert_eq!(canvas.kind, CanvasNodeType::CommonNode);
        assert_eq!(canvas.data.label, "LLM v0");
        assert_eq!(canvas.data.config.version.as_deref(), Some("v0"));
        assert_eq!(canvas.data.config.params["model"], "default");
        assert_eq!(canvas.step, 3);
    }

    #[test]
    fn test_unknown_version_falls_back_to_latest() {
        let registry = make_registry();
        let mut node = FlowNode::new("n1", "llm");
        node.version = Some("v5".to_string());

        let canvas = resolve_render_props(&node, 0, &registry);
        assert_eq!(canvas.data.label, "LLM v1");
        assert_eq!(canvas.style.width, Some(360.0));
        // The persisted version is not silently upgraded
        assert_eq!(canvas.data.config.version.as_deref(), Some("v5"));
    }

    #[test]
    fn test_unknown_type_degrades_to_defaults() {
        let registry = make_registry();
        let node = FlowNode::new("n1", "vision");

        let canvas = resolve_render_props(&node, 0, &registry);
        assert_eq!(canvas.node_type(), &NodeKind::Unknown("vision".to_string()));
        assert_eq!(canvas.data.label, "");
        assert_eq!(canvas.data.changeable, Changeable::default());
        assert_eq!(latest_node_version(&registry, "vision"), "v0");
    }

    #[test]
    fn test_per_node_overrides_win() {
        let registry = make_registry();
        let mut node = FlowNode::new("n1", "llm");
        node.meta.icon = Some("custom.svg".to_string());
        node.meta.desc = Some("Summarise".to_string());
        node.meta.style = Some(NodeStyle {
            width: Some(500.0),
            height: None,
        });
        node.meta.changeable = Some(ChangeableOverride {
            node_type: Some(false),
            operation: None,
        });

        let canvas = resolve_render_props(&node, 0, &registry);
        assert_eq!(canvas.data.icon, "custom.svg");
        assert_eq!(canvas.data.desc, "Summarise");
        assert_eq!(canvas.data.style.width, Some(500.0));
        assert_eq!(canvas.data.style.height, Some(120.0));
        assert!(!canvas.data.changeable.node_type);
        assert!(canvas.data.changeable.operation);
        assert!(canvas.data.handle.with_source_handle);
    }

    #[test]
    fn test_group_and_child_render_props() {
        let registry = make_registry();
        let body = FlowNode::new("body", "loop-body");
        let child = FlowNode::new("child", "llm")
            .with_parent("body")
            .with_position(40.0, 88.0);

        let body = resolve_render_props(&body, 0, &registry);
        let child = resolve_render_props(&child, 1, &registry);

        assert_eq!(body.kind, CanvasNodeType::Group);
        assert_eq!(child.parent(), Some("body"));
        assert_eq!(child.expand_parent, Some(true));
        assert_eq!(child.extent.as_deref(), Some("parent"));
        assert_eq!(child.position, Position::new(40.0, 88.0));
    }

    #[test]
    fn test_nested_loop_bodies_resolve_parent_first() {
        let registry = make_registry();
        let document = FlowDocument::new(
            vec![
                FlowNode::new("c", "llm").with_parent("inner"),
                FlowNode::new("inner", "loop-body").with_parent("outer"),
                FlowNode::new("outer", "loop-body"),
            ],
            vec![],
        );

        let graph = FlowGraph::from_document(&document, &registry);
        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["outer", "inner", "c"]);
        assert!(crate::validation::validate_flow(&graph, Some(&registry)).is_empty());
    }

    #[test]
    fn test_document_round_trip_through_canvas() {
        let mut registry = SchemaRegistry::new();
        registry.register(NodeSchema::new("start", "v0", "Start"));
        registry.register(NodeSchema::new("loop-body", "v0", "Loop body"));
        registry.register(NodeSchema::new("llm", "v0", "LLM"));

        let mut start = FlowNode::new("start", "start").with_next_nodes(vec!["child".to_string()]);
        start.version = Some("v0".to_string());
        start.name = "Start".to_string();
        let mut child = FlowNode::new("child", "llm").with_parent("body");
        child.version = Some("v0".to_string());
        child.name = "LLM".to_string();
        let mut body = FlowNode::new("body", "loop-body");
        body.version = Some("v0".to_string());
        body.name = "Loop body".to_string();

        let document = FlowDocument::new(
            vec![start, child, body],
            vec![FlowEdge::new("e1", "start", "child")],
        );

        let graph = FlowGraph::from_document(&document, &registry);
        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["start", "body", "child"]);

        let back = graph.to_document();
        for node in &document.nodes {
            let restored = back.nodes.iter().find(|n| n.node_id == node.node_id).unwrap();
            assert_eq!(restored, node);
        }
        assert_eq!(back.edges, document.edges);
    }
}
