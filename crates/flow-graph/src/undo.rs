//! Undo/redo history
//!
//! Every edit pushes a zstd-compressed JSON snapshot of the whole canvas
//! graph, tagged with a short label ("Connect", "Paste", ...). Snapshots
//! keep measured sizes, so restoring one never defers the next layout.

use std::collections::VecDeque;

use crate::constants::defaults;
use crate::error::{FlowGraphError, Result};
use crate::types::FlowGraph;

const COMPRESSION_LEVEL: i32 = 3;

struct Snapshot {
    label: String,
    bytes: Vec<u8>,
}

/// Bounded history of graph snapshots
pub struct UndoStack {
    snapshots: VecDeque<Snapshot>,
    /// Index of the snapshot matching the live graph
    current: usize,
    max_snapshots: usize,
}

impl UndoStack {
    /// Create a history keeping at most `max_snapshots` entries (at least 1)
    pub fn new(max_snapshots: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            current: 0,
            max_snapshots: max_snapshots.max(1),
        }
    }

    /// Record the graph after an edit, discarding any redo history
    pub fn push(&mut self, graph: &FlowGraph, label: impl Into<String>) -> Result<()> {
        let json = serde_json::to_vec(graph)?;
        let bytes = zstd::encode_all(&json[..], COMPRESSION_LEVEL)
            .map_err(|e| FlowGraphError::Compression(e.to_string()))?;

        self.snapshots.truncate(self.current + 1);
        self.snapshots.push_back(Snapshot {
            label: label.into(),
            bytes,
        });
        if self.snapshots.len() > self.max_snapshots {
            self.snapshots.pop_front();
        }
        self.current = self.snapshots.len() - 1;
        Ok(())
    }

    /// Step back; `None` at the oldest snapshot
    pub fn undo(&mut self) -> Option<Result<FlowGraph>> {
        if !self.can_undo() {
            return None;
        }
        log::debug!("Undo '{}'", self.snapshots[self.current].label);
        self.current -= 1;
        Some(self.decode(self.current))
    }

    /// Step forward; `None` at the newest snapshot
    pub fn redo(&mut self) -> Option<Result<FlowGraph>> {
        if !self.can_redo() {
            return None;
        }
        self.current += 1;
        log::debug!("Redo '{}'", self.snapshots[self.current].label);
        Some(self.decode(self.current))
    }

    pub fn current(&self) -> Option<Result<FlowGraph>> {
        (!self.snapshots.is_empty()).then(|| self.decode(self.current))
    }

    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current + 1 < self.snapshots.len()
    }

    /// Label of the edit an undo would revert
    pub fn undo_label(&self) -> Option<&str> {
        self.can_undo()
            .then(|| self.snapshots[self.current].label.as_str())
    }

    /// Label of the edit a redo would reapply
    pub fn redo_label(&self) -> Option<&str> {
        self.can_redo()
            .then(|| self.snapshots[self.current + 1].label.as_str())
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.current = 0;
    }

    /// Total compressed size of the history in bytes
    pub fn compressed_size(&self) -> usize {
        self.snapshots.iter().map(|s| s.bytes.len()).sum()
    }

    fn decode(&self, index: usize) -> Result<FlowGraph> {
        let json = zstd::decode_all(&self.snapshots[index].bytes[..])
            .map_err(|e| FlowGraphError::Compression(e.to_string()))?;
        Ok(serde_json::from_slice(&json)?)
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(defaults::UNDO_DEPTH)
    }
}
