//! Step annotation
//!
//! Every node carries `step`, an approximate distance from the trigger that
//! the editor shows as execution order. After a connection is added or
//! removed the steps downstream of its source are rewritten locally:
//! breadth-first from the source, each node written once per pass with the
//! first distance that reaches it. With several incoming paths of
//! different lengths this is the shortest distance from the edited source,
//! not the longest path from the trigger, so `step` stays advisory. The
//! runtime orders execution from `next_nodes`/edges, never from `step`.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::types::{CanvasNode, FlowEdge};

/// What happened to the connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepUpdateKind {
    Connect,
    Disconnect,
}

/// The edited connection's endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
}

impl Connection {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: None,
        }
    }

    pub fn with_source_handle(mut self, handle: impl Into<String>) -> Self {
        self.source_handle = Some(handle.into());
        self
    }
}

/// A step re-annotation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepUpdate {
    pub kind: StepUpdateKind,
    pub connection: Connection,
}

impl StepUpdate {
    pub fn connect(connection: Connection) -> Self {
        Self {
            kind: StepUpdateKind::Connect,
            connection,
        }
    }

    pub fn disconnect(connection: Connection) -> Self {
        Self {
            kind: StepUpdateKind::Disconnect,
            connection,
        }
    }
}

/// Re-annotate steps downstream of the connection's source
///
/// `edges` must already reflect the update (the new edge added, or the
/// removed edge gone). Returns the number of nodes whose step changed.
/// Unknown sources are ignored.
pub fn update_target_nodes_step(
    update: &StepUpdate,
    nodes: &mut [CanvasNode],
    edges: &[FlowEdge],
) -> usize {
    let source_id = update.connection.source.as_str();
    let index: HashMap<String, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.clone(), i))
        .collect();

    let Some(&source_index) = index.get(source_id) else {
        log::debug!("Step update skipped: source '{}' not in graph", source_id);
        return 0;
    };

    let mut successors: HashMap<&str, Vec<usize>> = HashMap::new();
    for edge in edges {
        if let Some(&target) = index.get(&edge.target) {
            successors.entry(edge.source.as_str()).or_default().push(target);
        }
    }

    let mut written: HashSet<usize> = HashSet::from([source_index]);
    let mut queue: VecDeque<(usize, u32)> =
        VecDeque::from([(source_index, nodes[source_index].data.config.step)]);
    let mut changed = 0;

    while let Some((current, before_step)) = queue.pop_front() {
        let current_id = nodes[current].id.clone();
        let Some(next) = successors.get(current_id.as_str()) else {
            continue;
        };
        for &successor in next {
            if !written.insert(successor) {
                continue;
            }
            let step = before_step + 1;
            let config = &mut nodes[successor].data.config;
            if config.step != step {
                config.step = step;
                changed += 1;
            }
            queue.push_back((successor, step));
        }
    }

    log::debug!(
        "Step update ({:?}) from '{}' rewrote {} nodes",
        update.kind,
        source_id,
        changed
    );
    changed
}
