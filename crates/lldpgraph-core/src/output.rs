//! JSON element files consumed by the topology renderer.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::config::{
    EdgeElement, Element, GraphConfig, GraphResult, NodeElement, SkippedEntry, SkippedFile,
};
use crate::error::{GraphError, Result};
use crate::graph::accumulator::{GraphAccumulator, GraphSnapshot};

pub const NODE_FILE: &str = "node.json";
pub const EDGE_FILE: &str = "edge.json";
pub const ELEMENTS_FILE: &str = "elements.json";
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Everything the pipeline collected besides the graph itself.
pub struct RunSummary<'a> {
    pub file_count: usize,
    pub skipped_files: Vec<SkippedFile>,
    pub skipped_entries: Vec<SkippedEntry>,
    pub timings: &'a HashMap<String, f64>,
    pub total_ms: f64,
    pub cancelled: bool,
}

/// Build the GraphResult from the accumulator.
pub fn build_result(
    config: &GraphConfig,
    acc: &GraphAccumulator,
    summary: RunSummary<'_>,
) -> GraphResult {
    let GraphSnapshot { nodes, edges } = acc.snapshot();

    // Build metadata
    let mut metadata = HashMap::new();
    metadata.insert(
        "input_dir".to_string(),
        serde_json::Value::String(config.input_dir.clone()),
    );
    metadata.insert(
        "generated_at".to_string(),
        serde_json::Value::String(Utc::now().to_rfc3339()),
    );
    metadata.insert(
        "lldpgraph_version".to_string(),
        serde_json::Value::String(env!("CARGO_PKG_VERSION").to_string()),
    );
    metadata.insert(
        "build_duration_ms".to_string(),
        serde_json::json!(((summary.total_ms * 10.0).round() / 10.0)),
    );
    metadata.insert(
        "phase_timings".to_string(),
        serde_json::to_value(summary.timings).unwrap_or_default(),
    );

    // Build stats
    let mut stats = HashMap::new();
    stats.insert("files".to_string(), serde_json::json!(summary.file_count));
    stats.insert("devices".to_string(), serde_json::json!(acc.device_count()));
    stats.insert(
        "interfaces".to_string(),
        serde_json::json!(acc.interface_count()),
    );
    stats.insert("edges".to_string(), serde_json::json!(acc.edge_count()));
    stats.insert(
        "skipped_files".to_string(),
        serde_json::json!(summary.skipped_files.len()),
    );
    stats.insert(
        "skipped_entries".to_string(),
        serde_json::json!(summary.skipped_entries.len()),
    );

    GraphResult {
        version: "1.0".to_string(),
        metadata,
        stats,
        nodes,
        edges,
        skipped_files: summary.skipped_files,
        skipped_entries: summary.skipped_entries,
        cancelled: summary.cancelled,
    }
}

fn write_error(path: &Path, source: std::io::Error) -> GraphError {
    GraphError::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Hidden sibling that holds the new content until every file is ready.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

/// Write `node.json` and `edge.json` (plus `elements.json` when asked) into `output_dir`.
///
/// All files are serialized and staged before any existing file is replaced,
/// so a failure leaves the previous set untouched. Returns the paths written.
pub fn write_output(
    result: &GraphResult,
    output_dir: &Path,
    write_elements: bool,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir).map_err(|e| write_error(output_dir, e))?;

    let mut artifacts = vec![
        (
            output_dir.join(NODE_FILE),
            serde_json::to_string_pretty(&result.nodes)?,
        ),
        (
            output_dir.join(EDGE_FILE),
            serde_json::to_string_pretty(&result.edges)?,
        ),
    ];
    if write_elements {
        artifacts.push((
            output_dir.join(ELEMENTS_FILE),
            serde_json::to_string_pretty(&result.elements())?,
        ));
    }

    let mut staged = Vec::new();
    let outcome = stage_and_commit(&artifacts, &mut staged);
    if outcome.is_err() {
        for tmp in &staged {
            let _ = std::fs::remove_file(tmp);
        }
    }
    outcome
}

fn stage_and_commit(
    artifacts: &[(PathBuf, String)],
    staged: &mut Vec<PathBuf>,
) -> Result<Vec<PathBuf>> {
    for (path, json) in artifacts {
        if path.is_dir() {
            return Err(write_error(
                path,
                std::io::Error::other("a directory is in the way"),
            ));
        }
        let tmp = staging_path(path);
        std::fs::write(&tmp, json).map_err(|e| write_error(&tmp, e))?;
        staged.push(tmp);
    }

    for (path, _) in artifacts {
        std::fs::rename(staging_path(path), path).map_err(|e| write_error(path, e))?;
    }
    Ok(artifacts.iter().map(|(path, _)| path.clone()).collect())
}

/// Write to `config.output_dir` (current directory when unset).
pub fn write_configured_output(
    result: &GraphResult,
    config: &GraphConfig,
) -> Result<Vec<PathBuf>> {
    let output_dir = config.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR);
    write_output(result, Path::new(output_dir), config.write_elements)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|source| GraphError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|e| GraphError::schema(path, e.to_string()))
}

/// Load a previously written `node.json` + `edge.json` pair as one element list.
pub fn load_elements(dir: &Path) -> Result<Vec<Element>> {
    let nodes: Vec<NodeElement> = read_json(&dir.join(NODE_FILE))?;
    let edges: Vec<EdgeElement> = read_json(&dir.join(EDGE_FILE))?;
    Ok(nodes
        .into_iter()
        .map(Element::Node)
        .chain(edges.into_iter().map(Element::Edge))
        .collect())
}
