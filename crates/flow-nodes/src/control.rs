//! Control flow nodes: branches, loops and sub-flows
//!
//! A loop node owns a loop body (a group node) created together with it;
//! the body always starts with a loop-start node. Neither the body nor the
//! loop-start node appears in the add-node palette.

use flow_graph::constants::defaults;
use flow_graph::{NodeKind, NodeSchema, SchemaFn};
use serde_json::json;

pub fn condition() -> NodeSchema {
    NodeSchema::new(NodeKind::Condition, "v0", "Condition")
        .with_icon("condition")
        .with_desc("Routes the flow by if / elif / else conditions")
        .with_size(360.0, 160.0)
        .with_default_params(json!({
            "branches": [
                {"branch_id": "if", "conditions": [], "logic": "and", "next_nodes": []},
                {"branch_id": "else", "next_nodes": []}
            ]
        }))
        .with_io(json!([]), json!([]))
        .with_changeable(true, true)
        .with_handle(false, true)
        .addable()
}

inventory::submit!(SchemaFn(condition));

pub fn loop_node() -> NodeSchema {
    NodeSchema::new(NodeKind::Loop, "v0", "Loop")
        .with_icon("loop")
        .with_desc("Runs its loop body once per item or a fixed number of times")
        .with_size(320.0, 120.0)
        .with_default_params(json!({
            "loop_type": "array",
            "loop_array": {"ref_node_id": "", "path": ""},
            "loop_count": 10,
            "max_iterations": 100
        }))
        .with_io(json!([]), json!([{"name": "results", "type": "array"}]))
        .with_changeable(false, true)
        .with_handle(true, true)
        .addable()
}

inventory::submit!(SchemaFn(loop_node));

pub fn loop_body() -> NodeSchema {
    NodeSchema::new(NodeKind::LoopBody, "v0", "Loop body")
        .with_icon("loop")
        .with_changeable(false, false)
}

inventory::submit!(SchemaFn(loop_body));

pub fn loop_start() -> NodeSchema {
    NodeSchema::new(NodeKind::LoopStart, "v0", "Loop start")
        .with_icon("loop-start")
        .with_size(defaults::LOOP_START_WIDTH, defaults::LOOP_START_HEIGHT)
        .with_io(
            json!([]),
            json!([
                {"name": "item", "type": "object"},
                {"name": "index", "type": "number"}
            ]),
        )
        .with_changeable(false, false)
        .with_handle(true, false)
}

inventory::submit!(SchemaFn(loop_start));

/// Calls another published flow
pub fn sub_flow() -> NodeSchema {
    NodeSchema::new(NodeKind::SubFlow, "v0", "Flow")
        .with_icon("flow")
        .with_desc("Runs another flow and returns its output")
        .with_size(320.0, 120.0)
        .with_default_params(json!({"flow_id": "", "inputs": []}))
        .with_io(json!([]), json!([{"name": "output", "type": "object"}]))
        .with_changeable(true, true)
        .with_handle(true, true)
        .addable()
}

inventory::submit!(SchemaFn(sub_flow));
