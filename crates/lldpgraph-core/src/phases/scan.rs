//! Phase 1: Collect per-device dump files from the configured subdirectories.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::config::GraphConfig;
use crate::error::{GraphError, Result};

/// List candidate input files under `config.input_dir`.
///
/// Files come out in subdirectory configuration order, then by file name.
/// Subdirectories that do not exist are skipped: partially populated data
/// trees are normal.
pub fn scan_input_files(config: &GraphConfig) -> Result<Vec<PathBuf>> {
    let root = Path::new(&config.input_dir);
    if !root.is_dir() {
        return Err(GraphError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut files = Vec::new();

    for subdir in &config.subdirectories {
        let dir = root.join(subdir);
        if !dir.is_dir() {
            debug!("Skipping missing subdirectory {}", dir.display());
            continue;
        }

        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Cannot list entry in {}: {e}", dir.display());
                    continue;
                }
            };

            // With links followed, a symlinked dump reports its target's type.
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if is_hidden(&name, &config.hidden_prefix) {
                continue;
            }

            let path = entry.into_path();
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }

    debug!("Found {} input files under {}", files.len(), root.display());
    Ok(files)
}

fn is_hidden(name: &str, prefix: &str) -> bool {
    !prefix.is_empty() && name.starts_with(prefix)
}
