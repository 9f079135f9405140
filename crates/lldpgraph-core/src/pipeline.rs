//! Sequential phase orchestrator with timing.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::{debug, error, info};
use rayon::prelude::*;

use crate::config::{GraphConfig, GraphResult, SkippedEntry, SkippedFile};
use crate::error::Result;
use crate::graph::accumulator::GraphAccumulator;
use crate::output::{build_result, RunSummary};
use crate::phases;
use crate::phases::parse::ParsedFile;

/// Phase labels for progress reporting.
const PHASE_LABELS: &[(&str, &str)] = &[
    ("scan", "Scanning input directories"),
    ("parse", "Parsing neighbor files"),
    ("accumulate", "Building topology graph"),
];

/// Progress callback type: (phase_name, label).
pub type ProgressCallback = Box<dyn FnMut(&str, &str)>;

/// State handed from phase to phase.
#[derive(Default)]
struct PipelineState {
    files: Vec<PathBuf>,
    parsed: Vec<(PathBuf, Result<ParsedFile>)>,
    acc: GraphAccumulator,
    skipped_files: Vec<SkippedFile>,
    skipped_entries: Vec<SkippedEntry>,
    cancelled: bool,
}

/// Type alias for phase function closures to keep signatures readable.
type PhaseFn<'a> = Box<dyn FnOnce(&GraphConfig, &mut PipelineState) -> Result<()> + 'a>;

/// Run scan, parse and accumulate, and return the graph.
pub fn run_pipeline(
    config: &GraphConfig,
    progress_callback: Option<ProgressCallback>,
) -> Result<GraphResult> {
    let never = AtomicBool::new(false);
    run_pipeline_cancellable(config, progress_callback, &never)
}

/// Like [`run_pipeline`], but stops merging files once `cancel` is raised.
///
/// Files merged before the flag was seen stay in the graph and the result is
/// marked `cancelled`. Only a missing input directory is an error.
pub fn run_pipeline_cancellable(
    config: &GraphConfig,
    mut progress_callback: Option<ProgressCallback>,
    cancel: &AtomicBool,
) -> Result<GraphResult> {
    let mut state = PipelineState::default();
    let mut timings: HashMap<String, f64> = HashMap::new();
    let total_start = Instant::now();

    let phase_fns: Vec<(&str, PhaseFn<'_>)> = vec![
        (
            "scan",
            Box::new(|config, state| {
                state.files = phases::scan::scan_input_files(config)?;
                Ok(())
            }),
        ),
        (
            "parse",
            Box::new(|_config, state| {
                // Files parse independently; collect keeps scan order.
                state.parsed = state
                    .files
                    .par_iter()
                    .filter(|_| !cancel.load(Ordering::Relaxed))
                    .map(|path| (path.clone(), phases::parse::parse_neighbor_file(path)))
                    .collect();
                if state.parsed.len() < state.files.len() {
                    state.cancelled = true;
                }
                Ok(())
            }),
        ),
        (
            "accumulate",
            Box::new(|_config, state| {
                accumulate(state, &|| cancel.load(Ordering::Relaxed));
                Ok(())
            }),
        ),
    ];

    for (name, phase_fn) in phase_fns {
        // Report progress
        if let Some(ref mut cb) = progress_callback {
            let label = PHASE_LABELS
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, l)| *l)
                .unwrap_or(name);
            cb(name, label);
        }

        let start = Instant::now();
        phase_fn(config, &mut state)?;
        timings.insert(name.to_string(), start.elapsed().as_secs_f64());
    }

    let total_ms = total_start.elapsed().as_secs_f64() * 1000.0;
    info!(
        "Built graph with {} nodes and {} edges from {} files",
        state.acc.node_count(),
        state.acc.edge_count(),
        state.files.len()
    );

    let summary = RunSummary {
        file_count: state.files.len(),
        skipped_files: state.skipped_files,
        skipped_entries: state.skipped_entries,
        timings: &timings,
        total_ms,
        cancelled: state.cancelled,
    };
    Ok(build_result(config, &state.acc, summary))
}

/// Merge parsed files into the accumulator in scan order.
///
/// `should_stop` is checked before each file; files merged earlier stay.
fn accumulate(state: &mut PipelineState, should_stop: &dyn Fn() -> bool) {
    for (path, outcome) in std::mem::take(&mut state.parsed) {
        if should_stop() {
            state.cancelled = true;
            break;
        }

        let parsed = match outcome {
            Ok(p) => p,
            Err(e) => {
                error!("Skipping file: {e}");
                state.skipped_files.push(SkippedFile {
                    path: path.to_string_lossy().to_string(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        debug!(
            "Merging {} ({} records)",
            parsed.path.display(),
            parsed.records.len()
        );
        for record in &parsed.records {
            if !state.acc.process_record(record) {
                state.skipped_entries.push(SkippedEntry {
                    path: parsed.path.to_string_lossy().to_string(),
                    interface: record.source_interface.clone(),
                    reason: "empty device or interface name".to_string(),
                });
            }
        }
        state.skipped_entries.extend(parsed.skipped);
    }
}
