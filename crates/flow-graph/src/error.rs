//! Error types for the flow graph core

use thiserror::Error;

/// Result type alias using FlowGraphError
pub type Result<T> = std::result::Result<T, FlowGraphError>;

/// Errors that can occur while editing a flow graph
#[derive(Debug, Error)]
pub enum FlowGraphError {
    /// A referenced node does not exist in the graph
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// A referenced edge does not exist in the graph
    #[error("Edge not found: {0}")]
    EdgeNotFound(String),

    /// A connection was rejected
    #[error("Invalid connection {source_id} -> {target_id}: {reason}")]
    InvalidConnection {
        source_id: String,
        target_id: String,
        reason: String,
    },

    /// A node was placed inside something that is not a loop body
    #[error("Node '{0}' is not a group")]
    NotAGroup(String),

    /// An edge leaves a branch node on a handle the node does not declare
    #[error("Node '{node_id}' has no branch '{handle}'")]
    UnknownBranch { node_id: String, handle: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Compression error
    #[error("Compression error: {0}")]
    Compression(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FlowGraphError {
    /// Create an invalid connection error with a reason
    pub fn invalid_connection(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConnection {
            source_id: source_id.into(),
            target_id: target_id.into(),
            reason: reason.into(),
        }
    }
}
