//! Node schema registry
//!
//! Maps `(node_type, version)` to the [`NodeSchema`] the editor renders a
//! node with: label, icon, default size, I/O shape, default params and the
//! changeable/handle/addable flags. The registry is read-only from the
//! point of view of every engine in this crate.
//!
//! # Usage
//!
//! ```ignore
//! use flow_graph::SchemaRegistry;
//!
//! // Built-ins submitted through `inventory` by the flow-nodes crate
//! let mut registry = SchemaRegistry::with_builtins();
//! registry.register(my_plugin_schema());
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::versions;
use crate::types::{Changeable, HandleConfig, NodeKind, NodeStyle};

/// Rendering and I/O metadata for one version of a node type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSchema {
    /// Node type key (e.g. "llm")
    pub node_type: String,
    /// Schema version key (e.g. "v0")
    pub version: String,
    /// Human-readable label
    pub label: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub desc: String,
    /// Default box size
    #[serde(default)]
    pub style: NodeStyle,
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub output: Value,
    /// Params given to freshly created nodes
    #[serde(default)]
    pub default_params: Value,
    #[serde(default)]
    pub changeable: Changeable,
    #[serde(default)]
    pub handle: HandleConfig,
    /// Whether the node appears in the add-node palette
    #[serde(default)]
    pub addable: bool,
}

impl NodeSchema {
    /// Create a schema with default flags
    pub fn new(
        node_type: impl Into<NodeKind>,
        version: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            node_type: String::from(node_type.into()),
            version: version.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.style = NodeStyle::sized(width, height);
        self
    }

    pub fn with_default_params(mut self, params: Value) -> Self {
        self.default_params = params;
        self
    }

    pub fn with_io(mut self, input: Value, output: Value) -> Self {
        self.input = input;
        self.output = output;
        self
    }

    pub fn with_changeable(mut self, node_type: bool, operation: bool) -> Self {
        self.changeable = Changeable {
            node_type,
            operation,
        };
        self
    }

    pub fn with_handle(mut self, with_source_handle: bool, operation: bool) -> Self {
        self.handle = HandleConfig {
            with_source_handle,
            operation,
        };
        self
    }

    pub fn addable(mut self) -> Self {
        self.addable = true;
        self
    }
}

/// A schema constructor collected at link time
///
/// Node crates register their built-ins with
/// `inventory::submit!(flow_graph::SchemaFn(my_schema));`.
pub struct SchemaFn(pub fn() -> NodeSchema);

inventory::collect!(SchemaFn);

/// Outcome of looking up a `(type, version)` pair
#[derive(Debug, Clone, Copy)]
pub enum SchemaResolution<'a> {
    /// The exact version is registered
    Exact(&'a NodeSchema),
    /// The requested version is unknown; the type's latest version is used
    LatestFallback(&'a NodeSchema),
    /// No version of the type is registered
    Unresolved,
}

impl<'a> SchemaResolution<'a> {
    /// The schema, if any version resolved
    pub fn schema(&self) -> Option<&'a NodeSchema> {
        match self {
            Self::Exact(schema) | Self::LatestFallback(schema) => Some(schema),
            Self::Unresolved => None,
        }
    }
}

/// Registry of node schemas keyed by type, then version
///
/// Versions are held in a `BTreeMap`, so "latest" and "oldest" are the
/// lexicographically last and first keys.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: HashMap<String, BTreeMap<String, NodeSchema>>,
}

impl SchemaRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create a registry holding every schema submitted through `inventory`
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for schema_fn in inventory::iter::<SchemaFn> {
            registry.register((schema_fn.0)());
        }
        log::debug!(
            "Schema registry loaded {} built-in node types",
            registry.entries.len()
        );
        registry
    }

    /// Register a schema, replacing any schema with the same type and version
    pub fn register(&mut self, schema: NodeSchema) {
        self.entries
            .entry(schema.node_type.clone())
            .or_default()
            .insert(schema.version.clone(), schema);
    }

    /// Get the schema for an exact type and version
    pub fn get_schema(&self, node_type: &str, version: &str) -> Option<&NodeSchema> {
        self.entries.get(node_type).and_then(|v| v.get(version))
    }

    /// Resolve a schema, falling back to the type's latest version
    pub fn resolve(&self, node_type: &str, version: &str) -> SchemaResolution<'_> {
        let Some(versions) = self.entries.get(node_type) else {
            return SchemaResolution::Unresolved;
        };
        if let Some(schema) = versions.get(version) {
            return SchemaResolution::Exact(schema);
        }
        match versions.values().next_back() {
            Some(schema) => SchemaResolution::LatestFallback(schema),
            None => SchemaResolution::Unresolved,
        }
    }

    /// Lexicographically-last registered version, or the default version
    pub fn latest_version(&self, node_type: &str) -> String {
        self.entries
            .get(node_type)
            .and_then(|v| v.keys().next_back())
            .cloned()
            .unwrap_or_else(|| versions::DEFAULT.to_string())
    }

    /// Lexicographically-first registered version, or the default version
    pub fn oldest_version(&self, node_type: &str) -> String {
        self.entries
            .get(node_type)
            .and_then(|v| v.keys().next())
            .cloned()
            .unwrap_or_else(|| versions::DEFAULT.to_string())
    }

    /// Check if any version of a node type is registered
    pub fn has_node_type(&self, node_type: &str) -> bool {
        self.entries.contains_key(node_type)
    }

    /// List all registered node type strings
    pub fn node_types(&self) -> Vec<&str> {
        self.entries.keys().map(|s| s.as_str()).collect()
    }

    /// Every registered schema, all versions
    pub fn all_schemas(&self) -> Vec<&NodeSchema> {
        self.entries.values().flat_map(|v| v.values()).collect()
    }

    /// Latest schema of every type flagged `addable`, for the add-node palette
    pub fn addable_schemas(&self) -> Vec<&NodeSchema> {
        let mut schemas: Vec<&NodeSchema> = self
            .entries
            .values()
            .filter_map(|v| v.values().next_back())
            .filter(|s| s.addable)
            .collect();
        schemas.sort_by(|a, b| a.node_type.cmp(&b.node_type));
        schemas
    }

    /// Merge another registry into this one
    ///
    /// Entries from `other` override entries in `self` with the same type and version.
    pub fn merge(&mut self, other: SchemaRegistry) {
        for (node_type, versions) in other.entries {
            self.entries.entry(node_type).or_default().extend(versions);
        }
    }
}
