//! Nodes that reach outside the flow: tools, HTTP, knowledge bases, code

use flow_graph::{NodeKind, NodeSchema, SchemaFn};
use serde_json::json;

pub fn tool() -> NodeSchema {
    NodeSchema::new(NodeKind::Tool, "v0", "Tool")
        .with_icon("tool")
        .with_desc("Invokes a plugin tool")
        .with_size(320.0, 120.0)
        .with_default_params(json!({"tool_id": "", "inputs": []}))
        .with_io(json!([]), json!([{"name": "result", "type": "object"}]))
        .with_changeable(true, true)
        .with_handle(true, true)
        .addable()
}

inventory::submit!(SchemaFn(tool));

pub fn http() -> NodeSchema {
    NodeSchema::new(NodeKind::Http, "v0", "HTTP request")
        .with_icon("http")
        .with_desc("Sends an HTTP request")
        .with_size(320.0, 120.0)
        .with_default_params(json!({
            "method": "GET",
            "url": "",
            "headers": [],
            "body": "",
            "timeout_ms": 30000
        }))
        .with_io(
            json!([]),
            json!([
                {"name": "status", "type": "number"},
                {"name": "body", "type": "string"}
            ]),
        )
        .with_changeable(true, true)
        .with_handle(true, true)
        .addable()
}

inventory::submit!(SchemaFn(http));

pub fn knowledge() -> NodeSchema {
    NodeSchema::new(NodeKind::Knowledge, "v0", "Knowledge")
        .with_icon("knowledge")
        .with_desc("Retrieves passages from knowledge bases")
        .with_size(320.0, 120.0)
        .with_default_params(json!({"knowledge_ids": [], "top_k": 5, "min_score": 0.5}))
        .with_io(json!([]), json!([{"name": "chunks", "type": "array"}]))
        .with_changeable(true, true)
        .with_handle(true, true)
        .addable()
}

inventory::submit!(SchemaFn(knowledge));

pub fn code() -> NodeSchema {
    NodeSchema::new(NodeKind::Code, "v0", "Code")
        .with_icon("code")
        .with_desc("Runs a Python or JavaScript snippet")
        .with_size(320.0, 120.0)
        .with_default_params(json!({"language": "python", "code": "", "inputs": []}))
        .with_io(json!([]), json!([{"name": "result", "type": "object"}]))
        .with_changeable(true, true)
        .with_handle(true, true)
        .addable()
}

inventory::submit!(SchemaFn(code));
