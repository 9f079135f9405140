//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use lldpgraph_core::config::{GraphConfig, GraphResult, NeighborRecord};

// ---------------------------------------------------------------------------
// Fixture path resolution
// ---------------------------------------------------------------------------

/// Resolve `tests/fixtures/{name}` relative to the workspace root.
pub fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .join("../../tests/fixtures")
        .join(name)
        .canonicalize()
        .unwrap_or_else(|_| {
            Path::new(manifest_dir)
                .join("../../tests/fixtures")
                .join(name)
        })
}

/// Config pointing at a fixture directory.
pub fn fixture_config(name: &str) -> GraphConfig {
    GraphConfig {
        input_dir: fixture_path(name).to_string_lossy().to_string(),
        ..Default::default()
    }
}

/// Run the whole pipeline on a fixture directory.
pub fn build_fixture(name: &str) -> GraphResult {
    lldpgraph_core::pipeline::run_pipeline(&fixture_config(name), None)
        .expect("pipeline should succeed on fixture")
}

// ---------------------------------------------------------------------------
// Scratch input trees
// ---------------------------------------------------------------------------

/// Write `{root}/{subdir}/{file}` with the given body, creating directories.
pub fn write_input(root: &Path, subdir: &str, file: &str, body: &str) -> PathBuf {
    let dir = root.join(subdir);
    std::fs::create_dir_all(&dir).expect("Failed to create input subdir");
    let path = dir.join(file);
    std::fs::write(&path, body).expect("Failed to write input file");
    path
}

pub fn record(sd: &str, si: &str, td: &str, ti: &str) -> NeighborRecord {
    NeighborRecord {
        source_device: sd.to_string(),
        source_interface: si.to_string(),
        target_device: td.to_string(),
        target_interface: ti.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Extractors from GraphResult
// ---------------------------------------------------------------------------

pub fn node_ids(result: &GraphResult) -> Vec<String> {
    result.nodes.iter().map(|n| n.data.id.clone()).collect()
}

pub fn edge_pairs(result: &GraphResult) -> Vec<(String, String)> {
    result
        .edges
        .iter()
        .map(|e| (e.data.source.clone(), e.data.target.clone()))
        .collect()
}

/// Edge endpoints with each pair sorted, for direction-agnostic comparisons.
pub fn undirected_pairs(result: &GraphResult) -> HashSet<(String, String)> {
    edge_pairs(result)
        .into_iter()
        .map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
        .collect()
}

/// Check the structural invariants every output must satisfy.
pub fn assert_graph_invariants(result: &GraphResult) {
    let ids = node_ids(result);
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len(), "Node ids must be unique: {ids:?}");

    let devices: HashSet<&str> = result
        .nodes
        .iter()
        .filter(|n| n.data.parent.is_none())
        .map(|n| n.data.id.as_str())
        .collect();
    for node in &result.nodes {
        if let Some(parent) = &node.data.parent {
            assert!(
                devices.contains(parent.as_str()),
                "Interface {} has dangling parent {parent}",
                node.data.id
            );
        }
    }

    let pairs = edge_pairs(result);
    assert_eq!(
        undirected_pairs(result).len(),
        pairs.len(),
        "Edges must be unique regardless of direction: {pairs:?}"
    );
    for (a, b) in &pairs {
        assert!(unique.contains(a) && unique.contains(b), "Dangling edge {a}-{b}");
    }
}
