//! Engine configuration
//!
//! Every field defaults to the matching value in [`crate::constants`], so a
//! partially written JSON config (or none at all) is valid.

use serde::{Deserialize, Serialize};

use crate::constants::{defaults, group, layout, paste};
use crate::layout::LayoutDirection;

/// Geometry used by auto-layout and loop-body creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub rank_separation: f64,
    pub node_separation: f64,
    pub group_min_distance: f64,
    pub group_top_gap: f64,
    pub default_group_width: f64,
    pub default_group_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            rank_separation: layout::RANK_SEPARATION,
            node_separation: layout::NODE_SEPARATION,
            group_min_distance: group::MIN_DISTANCE,
            group_top_gap: group::TOP_GAP,
            default_group_width: group::DEFAULT_WIDTH,
            default_group_height: group::DEFAULT_HEIGHT,
        }
    }
}

impl LayoutConfig {
    /// Offset of a group's first child from the group's origin
    pub fn child_origin(&self) -> (f64, f64) {
        (
            self.group_min_distance,
            self.group_min_distance + self.group_top_gap,
        )
    }

    /// Group size needed to hold content of the given size
    pub fn group_size_for(&self, content_width: f64, content_height: f64) -> (f64, f64) {
        (
            content_width + 2.0 * self.group_min_distance,
            content_height + self.group_top_gap + 2.0 * self.group_min_distance,
        )
    }
}

/// Copy/paste behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CloneConfig {
    pub offset_x: f64,
    pub offset_y: f64,
    /// Keys whose string values are node ids and get rewritten on paste
    pub reference_keys: Vec<String>,
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            offset_x: paste::OFFSET_X,
            offset_y: paste::OFFSET_Y,
            reference_keys: paste::REFERENCE_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Everything a [`crate::editor::FlowEditor`] needs beyond the graph itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub layout: LayoutConfig,
    pub clone: CloneConfig,
    pub direction: LayoutDirection,
    pub undo_depth: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            clone: CloneConfig::default(),
            direction: LayoutDirection::default(),
            undo_depth: defaults::UNDO_DEPTH,
        }
    }
}
