//! Flow entry and exit nodes

use flow_graph::{NodeKind, NodeSchema, SchemaFn};
use serde_json::json;

/// Trigger node; the first node of every flow
pub fn start() -> NodeSchema {
    NodeSchema::new(NodeKind::Start, "v0", "Start")
        .with_icon("start")
        .with_desc("Entry point of the flow, receives the user input")
        .with_size(320.0, 96.0)
        .with_io(
            json!([]),
            json!([{"name": "user_input", "type": "string", "required": true}]),
        )
        .with_handle(true, false)
}

inventory::submit!(SchemaFn(start));

/// Flow end; returns the selected variables
pub fn end() -> NodeSchema {
    NodeSchema::new(NodeKind::End, "v0", "End")
        .with_icon("end")
        .with_desc("Returns the flow result")
        .with_size(320.0, 96.0)
        .with_default_params(json!({"output_mode": "variables", "template": ""}))
        .with_io(json!([]), json!([]))
        .with_changeable(false, true)
}

inventory::submit!(SchemaFn(end));
