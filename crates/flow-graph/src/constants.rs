//! Graph-wide constants
//!
//! Single source of truth for the geometry, handle names and defaults the
//! engines share. Config structs build their `Default` from these values.

/// Loop-body (group) geometry
pub mod group {
    /// Margin between a group's border and its children, on every side
    pub const MIN_DISTANCE: f64 = 40.0;
    /// Extra space above the first row of children (group title bar)
    pub const TOP_GAP: f64 = 48.0;
    /// Width given to a group with no children
    pub const DEFAULT_WIDTH: f64 = 480.0;
    /// Height given to a group with no children
    pub const DEFAULT_HEIGHT: f64 = 600.0;
}

/// Layered layout separations
pub mod layout {
    /// Distance between adjacent ranks
    pub const RANK_SEPARATION: f64 = 80.0;
    /// Distance between adjacent nodes within a rank
    pub const NODE_SEPARATION: f64 = 40.0;
}

/// Fallback node sizes used when neither the canvas nor the schema knows one
pub mod defaults {
    pub const NODE_WIDTH: f64 = 320.0;
    pub const NODE_HEIGHT: f64 = 120.0;
    pub const LOOP_START_WIDTH: f64 = 160.0;
    pub const LOOP_START_HEIGHT: f64 = 56.0;
    /// Snapshots kept by the editor's undo stack
    pub const UNDO_DEPTH: usize = 100;
}

/// Copy/paste behaviour
pub mod paste {
    /// Translation applied to pasted top-level nodes
    pub const OFFSET_X: f64 = 40.0;
    pub const OFFSET_Y: f64 = 40.0;
    /// Keys whose string values hold node ids inside params/input/output/meta
    pub const REFERENCE_KEYS: &[&str] = &[
        "node_id",
        "ref_node_id",
        "source_node_id",
        "target_node_id",
        "parent_id",
        "relation_id",
    ];
}

/// Reserved handle identifiers
pub mod handles {
    /// Source handle of the edge from a loop node to its loop body
    pub const LOOP: &str = "loop";
}

/// Schema version handling
pub mod versions {
    /// Version assumed when a node type has no registered versions
    pub const DEFAULT: &str = "v0";
}

/// Canvas-side identifiers
pub mod canvas {
    /// `extent` value that clips a child to its parent group
    pub const EXTENT_PARENT: &str = "parent";
    /// Params key written on branch-type predecessors
    pub const OUTPUT_BRANCH_IDS: &str = "outputBranchIds";
}
