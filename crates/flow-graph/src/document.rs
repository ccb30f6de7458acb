//! Persisted flow document
//!
//! The JSON shape shared with the execution runtime and the REST layer:
//! `{ nodes, edges, global_variable? }`. Reading and writing a file is the
//! only I/O this crate performs.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::types::{FlowEdge, FlowNode};

/// A complete flow as persisted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowDocument {
    #[serde(default)]
    pub nodes: Vec<FlowNode>,
    #[serde(default)]
    pub edges: Vec<FlowEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_variable: Option<Value>,
}

impl FlowDocument {
    pub fn new(nodes: Vec<FlowNode>, edges: Vec<FlowEdge>) -> Self {
        Self {
            nodes,
            edges,
            global_variable: None,
        }
    }

    /// Parse a document from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty-printed JSON text
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a document from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let document = Self::from_json(&json)?;
        log::debug!(
            "Loaded flow document with {} nodes from {:?}",
            document.nodes.len(),
            path
        );
        Ok(document)
    }

    /// Write the document to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::debug!("Saved flow document to {:?}", path);
        Ok(())
    }
}
