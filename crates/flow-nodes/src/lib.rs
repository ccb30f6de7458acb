//! Flow Nodes
//!
//! Built-in node schemas for the flow canvas editor. Each schema is
//! submitted through `inventory` and picked up by
//! [`SchemaRegistry::with_builtins`].
//!
//! # Categories
//!
//! - **Trigger**: flow entry and exit
//! - **Model**: LLM calls and intent recognition
//! - **Integration**: tools, HTTP, knowledge bases, code
//! - **Control**: conditions, loops, sub-flows

pub mod control;
pub mod integration;
pub mod model;
pub mod trigger;

use flow_graph::SchemaRegistry;

/// A registry holding every built-in schema
///
/// Calling this (rather than `SchemaRegistry::with_builtins` directly)
/// guarantees this crate is linked, so its submissions are present.
pub fn builtin_registry() -> SchemaRegistry {
    SchemaRegistry::with_builtins()
}
