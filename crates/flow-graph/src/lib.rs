//! Flow Graph - Graph core of the flow canvas editor
//!
//! This crate keeps a visual flow (agent/workflow) graph consistent while
//! it is edited. It provides:
//!
//! - Resolution of persisted nodes against versioned node schemas
//! - Ancestor/descendant closures and topological ordering
//! - Advisory step annotation after rewiring
//! - Loop bodies: nested groups with their own coordinate space
//! - Layered auto-layout (dagre) with a separate pass per group
//! - Self-contained copy/paste of node selections
//! - Compressed snapshot-based undo/redo
//!
//! # Architecture
//!
//! The engines are free functions over node and edge slices. The
//! [`FlowEditor`] ties them to one graph, a [`SchemaRegistry`], an
//! [`IdGenerator`] and an [`UndoStack`]; there is no global state.
//! Built-in node schemas are contributed through `inventory` and collected
//! by [`SchemaRegistry::with_builtins`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use flow_graph::{
//!     Connection, EditorConfig, FlowEditor, Position, SchemaRegistry, SnowflakeIdGenerator,
//! };
//!
//! let mut editor = FlowEditor::new(
//!     Arc::new(SchemaRegistry::with_builtins()),
//!     Arc::new(SnowflakeIdGenerator::new(1)),
//!     EditorConfig::default(),
//! )?;
//! let start = editor.add_node("start", Position::default(), None)?;
//! let llm = editor.add_node("llm", Position::new(0.0, 200.0), None)?;
//! editor.connect(Connection::new(&start, &llm))?;
//! ```

pub mod clone;
pub mod config;
pub mod constants;
pub mod document;
pub mod editor;
pub mod error;
pub mod ids;
pub mod layout;
pub mod loop_group;
pub mod model;
pub mod registry;
pub mod steps;
pub mod topology;
pub mod types;
pub mod undo;
pub mod validation;

// Re-export key types
pub use clone::{
    generate_paste_edges, generate_paste_node, generate_paste_nodes_and_edges, PasteResult,
};
pub use config::{CloneConfig, EditorConfig, LayoutConfig};
pub use document::FlowDocument;
pub use editor::FlowEditor;
pub use error::{FlowGraphError, Result};
pub use ids::{IdGenerator, SequentialIdGenerator, SnowflakeIdGenerator, UuidIdGenerator};
pub use layout::{dagre_layout, get_layout_elements, LayoutDirection, LayoutElements};
pub use loop_group::{generate_loop_body, LoopBody};
pub use model::{latest_node_version, resolve_render_props};
pub use registry::{NodeSchema, SchemaFn, SchemaRegistry, SchemaResolution};
pub use steps::{update_target_nodes_step, Connection, StepUpdate, StepUpdateKind};
pub use topology::{
    check_has_node_out_of_flow, get_all_post_nodes, get_all_predecessors, sort_by_edges,
};
pub use types::{
    CanvasNode, CanvasNodeType, FlowEdge, FlowGraph, FlowNode, HandlePosition, NodeId, NodeKind,
    Position,
};
pub use undo::UndoStack;
pub use validation::{validate_flow, ValidationError};

