//! Model-backed nodes
//!
//! `llm` has two versions: `v1` adds structured output. Documents that
//! predate `v1` keep rendering with `v0`.

use flow_graph::{NodeKind, NodeSchema, SchemaFn};
use serde_json::json;

fn llm_params() -> serde_json::Value {
    json!({
        "model": "",
        "temperature": 0.7,
        "system_prompt": "",
        "prompt": "",
        "inputs": []
    })
}

pub fn llm_v0() -> NodeSchema {
    NodeSchema::new(NodeKind::Llm, "v0", "LLM")
        .with_icon("llm")
        .with_desc("Calls a language model with a prompt template")
        .with_size(360.0, 120.0)
        .with_default_params(llm_params())
        .with_io(json!([]), json!([{"name": "output", "type": "string"}]))
        .with_changeable(true, true)
        .with_handle(true, true)
        .addable()
}

inventory::submit!(SchemaFn(llm_v0));

pub fn llm_v1() -> NodeSchema {
    let mut params = llm_params();
    params["response_format"] = json!("text");

    NodeSchema::new(NodeKind::Llm, "v1", "LLM")
        .with_icon("llm")
        .with_desc("Calls a language model, optionally returning JSON")
        .with_size(360.0, 120.0)
        .with_default_params(params)
        .with_io(
            json!([]),
            json!([
                {"name": "output", "type": "string"},
                {"name": "reasoning", "type": "string"}
            ]),
        )
        .with_changeable(true, true)
        .with_handle(true, true)
        .addable()
}

inventory::submit!(SchemaFn(llm_v1));

/// Intent recognition; one branch per intent plus a fallback
pub fn intent() -> NodeSchema {
    NodeSchema::new(NodeKind::Intent, "v0", "Intent recognition")
        .with_icon("intent")
        .with_desc("Classifies the input and routes it to the matching intent")
        .with_size(360.0, 160.0)
        .with_default_params(json!({
            "model": "",
            "branches": [
                {"branch_id": "intent-1", "intent": "", "next_nodes": []},
                {"branch_id": "other", "intent": "other", "next_nodes": []}
            ]
        }))
        .with_io(json!([]), json!([{"name": "intent", "type": "string"}]))
        .with_changeable(true, true)
        .with_handle(false, true)
        .addable()
}

inventory::submit!(SchemaFn(intent));
