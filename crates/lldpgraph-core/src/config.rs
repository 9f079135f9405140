//! Core data types and configuration for topology graph builds.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Subdirectories of the input root that may hold per-device dumps, in scan order.
pub const DEFAULT_SUBDIRECTORIES: &[&str] = &[
    "lldp_neighbors",
    "lldp_neighbors_detail",
    "interface",
    "chassis",
    "config",
];

/// CSS class the renderer uses for every node.
pub const NODE_CLASSES: &str = "rectangle";
pub const NODES_GROUP: &str = "nodes";
pub const EDGES_GROUP: &str = "edges";

/// Build the flat id of an interface node.
pub fn interface_id(device: &str, interface: &str) -> String {
    format!("{device}_{interface}")
}

/// Kind of node in the topology graph.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Device,
    Interface,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Device => "device",
            Self::Interface => "interface",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized adjacency: a local interface and the remote endpoint it discovered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeighborRecord {
    pub source_device: String,
    pub source_interface: String,
    pub target_device: String,
    pub target_interface: String,
}

impl NeighborRecord {
    pub fn source_id(&self) -> String {
        interface_id(&self.source_device, &self.source_interface)
    }

    pub fn target_id(&self) -> String {
        interface_id(&self.target_device, &self.target_interface)
    }
}

/// The `data` payload of a node element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: String,
    pub label: String,
    pub parent: Option<String>,
}

/// A node element as consumed by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeElement {
    pub data: NodeData,
    pub classes: String,
    pub group: String,
}

impl NodeElement {
    pub fn device(name: &str) -> Self {
        Self {
            data: NodeData {
                id: name.to_string(),
                label: name.to_string(),
                parent: None,
            },
            classes: NODE_CLASSES.to_string(),
            group: NODES_GROUP.to_string(),
        }
    }

    pub fn interface(device: &str, interface: &str) -> Self {
        Self {
            data: NodeData {
                id: interface_id(device, interface),
                label: interface.to_string(),
                parent: Some(device.to_string()),
            },
            classes: NODE_CLASSES.to_string(),
            group: NODES_GROUP.to_string(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        if self.data.parent.is_some() {
            NodeKind::Interface
        } else {
            NodeKind::Device
        }
    }
}

/// The `data` payload of an edge element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeData {
    pub source: String,
    pub target: String,
}

/// An edge element as consumed by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeElement {
    pub data: EdgeData,
    pub group: String,
}

impl EdgeElement {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            data: EdgeData {
                source: source.to_string(),
                target: target.to_string(),
            },
            group: EDGES_GROUP.to_string(),
        }
    }
}

/// Either kind of element in a combined element list.
///
/// Nodes are tried first; edge objects lack `classes` and fall through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element {
    Node(NodeElement),
    Edge(EdgeElement),
}

/// An input file that was skipped as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// A single interface entry that was skipped inside an otherwise readable file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub path: String,
    pub interface: String,
    pub reason: String,
}

/// Configuration for a graph build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default)]
    pub input_dir: String,
    pub output_dir: Option<String>,
    #[serde(default = "default_subdirectories")]
    pub subdirectories: Vec<String>,
    #[serde(default = "default_hidden_prefix")]
    pub hidden_prefix: String,
    #[serde(default)]
    pub write_elements: bool,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub quiet: bool,
}

fn default_subdirectories() -> Vec<String> {
    DEFAULT_SUBDIRECTORIES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_hidden_prefix() -> String {
    ".".to_string()
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            input_dir: String::new(),
            output_dir: None,
            subdirectories: default_subdirectories(),
            hidden_prefix: default_hidden_prefix(),
            write_elements: false,
            verbose: false,
            quiet: false,
        }
    }
}

/// Result of a graph build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphResult {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub stats: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub nodes: Vec<NodeElement>,
    #[serde(default)]
    pub edges: Vec<EdgeElement>,
    #[serde(default)]
    pub skipped_files: Vec<SkippedFile>,
    #[serde(default)]
    pub skipped_entries: Vec<SkippedEntry>,
    #[serde(default)]
    pub cancelled: bool,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for GraphResult {
    fn default() -> Self {
        Self {
            version: default_version(),
            metadata: HashMap::new(),
            stats: HashMap::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            skipped_files: Vec::new(),
            skipped_entries: Vec::new(),
            cancelled: false,
        }
    }
}

impl GraphResult {
    /// Nodes followed by edges, the element set the renderer loads.
    pub fn elements(&self) -> Vec<Element> {
        self.nodes
            .iter()
            .cloned()
            .map(Element::Node)
            .chain(self.edges.iter().cloned().map(Element::Edge))
            .collect()
    }
}
