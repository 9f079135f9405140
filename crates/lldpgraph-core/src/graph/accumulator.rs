//! Append-only topology graph backed by petgraph::UnGraph.

use log::warn;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

use crate::config::{interface_id, EdgeElement, NeighborRecord, NodeElement, NodeKind};

/// Node and edge lists in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeElement>,
    pub edges: Vec<EdgeElement>,
}

/// Deduplicating reducer over neighbor records.
///
/// Device and interface ids share one namespace. Edges are undirected: a link
/// reported from both ends is stored once, oriented as first seen. Nothing is
/// ever removed, so node and edge indices follow insertion order.
pub struct GraphAccumulator {
    graph: UnGraph<NodeElement, ()>,
    /// O(1) string ID → NodeIndex lookup.
    id_index: HashMap<String, NodeIndex>,
    device_count: usize,
    interface_count: usize,
}

impl GraphAccumulator {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            id_index: HashMap::new(),
            device_count: 0,
            interface_count: 0,
        }
    }

    /// Get or create a node by string ID.
    fn ensure_node(&mut self, node: NodeElement) -> NodeIndex {
        if let Some(&idx) = self.id_index.get(&node.data.id) {
            return idx;
        }
        match node.kind() {
            NodeKind::Device => self.device_count += 1,
            NodeKind::Interface => self.interface_count += 1,
        }
        let id = node.data.id.clone();
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        idx
    }

    /// Ensure a device node exists.
    pub fn add_device(&mut self, device: &str) {
        self.ensure_node(NodeElement::device(device));
    }

    /// Ensure a device node and one of its interfaces exist, device first.
    pub fn add_node(&mut self, device: &str, interface: &str) {
        self.add_device(device);
        self.ensure_node(NodeElement::interface(device, interface));
    }

    /// Link two existing nodes unless the pair is already linked in either direction.
    ///
    /// Returns `true` when a new edge was stored.
    pub fn add_edge(&mut self, source_id: &str, target_id: &str) -> bool {
        let (Some(&a), Some(&b)) = (self.id_index.get(source_id), self.id_index.get(target_id))
        else {
            warn!("Not linking {source_id} and {target_id}: unknown node id");
            return false;
        };
        if self.graph.find_edge(a, b).is_some() {
            return false;
        }
        self.graph.add_edge(a, b, ());
        true
    }

    /// Apply one record: both endpoints, then the link between them.
    ///
    /// Records with an empty device or interface name are logged and dropped
    /// without touching the graph. Returns `true` if the record was applied.
    pub fn process_record(&mut self, record: &NeighborRecord) -> bool {
        let fields = [
            ("source device", &record.source_device),
            ("source interface", &record.source_interface),
            ("target device", &record.target_device),
            ("target interface", &record.target_interface),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, v)| v.is_empty()) {
            warn!(
                "Skipping record {} -> {}: empty {}",
                record.source_id(),
                record.target_id(),
                field
            );
            return false;
        }

        self.add_node(&record.source_device, &record.source_interface);
        self.add_node(&record.target_device, &record.target_interface);
        self.add_edge(
            &interface_id(&record.source_device, &record.source_interface),
            &interface_id(&record.target_device, &record.target_interface),
        );
        true
    }

    /// Copy out the current node and edge lists.
    pub fn snapshot(&self) -> GraphSnapshot {
        let nodes = self
            .graph
            .node_indices()
            .map(|idx| self.graph[idx].clone())
            .collect();

        let edges = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| EdgeElement::new(&self.graph[a].data.id, &self.graph[b].data.id))
            .collect();

        GraphSnapshot { nodes, edges }
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.id_index.contains_key(id)
    }

    /// Whether the two nodes are linked, in either direction.
    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        match (self.id_index.get(a), self.id_index.get(b)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn device_count(&self) -> usize {
        self.device_count
    }

    pub fn interface_count(&self) -> usize {
        self.interface_count
    }
}

impl Default for GraphAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
