//! lldpgraph CLI — build topology graph elements from LLDP neighbor dumps.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use lldpgraph_core::config::{GraphConfig, GraphResult, DEFAULT_SUBDIRECTORIES};
use lldpgraph_core::output::write_configured_output;
use lldpgraph_core::pipeline;

#[derive(Parser)]
#[command(
    name = "lldpgraph",
    version,
    about = "Build network topology graph elements from per-device LLDP neighbor dumps"
)]
struct Cli {
    /// Root directory holding the per-device dump subdirectories
    #[arg(short, long)]
    input_dir: PathBuf,

    /// Directory to write node.json and edge.json into
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Subdirectory to scan, repeatable (default: lldp_neighbors, lldp_neighbors_detail, interface, chassis, config)
    #[arg(long = "subdir")]
    subdirs: Vec<String>,

    /// Also write elements.json with nodes and edges combined
    #[arg(long)]
    elements: bool,

    /// Debug logging and per-phase timing breakdown
    #[arg(long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long)]
    quiet: bool,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let subdirectories = if cli.subdirs.is_empty() {
        DEFAULT_SUBDIRECTORIES.iter().map(|s| s.to_string()).collect()
    } else {
        cli.subdirs
    };

    let config = GraphConfig {
        input_dir: cli.input_dir.to_string_lossy().to_string(),
        output_dir: Some(cli.output_dir.to_string_lossy().to_string()),
        subdirectories,
        write_elements: cli.elements,
        verbose: cli.verbose,
        quiet: cli.quiet,
        ..Default::default()
    };

    if config.quiet {
        run_quiet(&config);
    } else {
        run_with_progress(&config);
    }
}

fn run_quiet(config: &GraphConfig) {
    match pipeline::run_pipeline(config, None) {
        Ok(result) => {
            if let Err(e) = write_configured_output(&result, config) {
                eprintln!("Error writing output: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Graph build failed: {e}");
            std::process::exit(1);
        }
    }
}

fn run_with_progress(config: &GraphConfig) {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(spinner.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.set_message("Initialising...");
    pb.enable_steady_tick(std::time::Duration::from_millis(80));

    let progress: pipeline::ProgressCallback = {
        let pb = pb.clone();
        Box::new(move |_name, label| {
            pb.set_message(label.to_string());
        })
    };

    let start = Instant::now();
    let result = match pipeline::run_pipeline(config, Some(progress)) {
        Ok(r) => r,
        Err(e) => {
            pb.finish_and_clear();
            eprintln!("Graph build failed: {e}");
            std::process::exit(1);
        }
    };
    pb.finish_and_clear();

    print_summary(config, &result, start);

    let written = match write_configured_output(&result, config) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error writing output: {e}");
            std::process::exit(1);
        }
    };

    println!("\n  {}", style("Output written to:").green());
    for path in written {
        println!("    {}", path.display());
    }
}

fn stat(result: &GraphResult, key: &str) -> serde_json::Value {
    result
        .stats
        .get(key)
        .cloned()
        .unwrap_or_else(|| serde_json::json!(0))
}

fn print_summary(config: &GraphConfig, result: &GraphResult, start: Instant) {
    println!(
        "\n{}  LLDP Topology: {}",
        style("✓").green().bold(),
        style(
            Path::new(&config.input_dir)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()
        )
        .bold()
    );
    println!("  {:<14} {}", "Files:", stat(result, "files"));
    println!("  {:<14} {}", "Devices:", stat(result, "devices"));
    println!("  {:<14} {}", "Interfaces:", stat(result, "interfaces"));
    println!("  {:<14} {}", "Links:", stat(result, "edges"));

    let skipped_files = result.skipped_files.len();
    let skipped_entries = result.skipped_entries.len();
    if skipped_files + skipped_entries > 0 {
        println!(
            "  {:<14} {} files, {} entries (see log)",
            style("Skipped:").yellow(),
            skipped_files,
            skipped_entries
        );
    }
    if result.cancelled {
        println!("  {}", style("Build was cancelled; graph is partial").yellow());
    }

    let duration = start.elapsed();
    println!(
        "  {:<14} {:.1}ms",
        "Duration:",
        duration.as_secs_f64() * 1000.0
    );

    if config.verbose {
        if let Some(serde_json::Value::Object(timings)) = result.metadata.get("phase_timings") {
            println!("\n  Phase Timings:");
            for (phase, secs) in timings {
                if let Some(val) = secs.as_f64() {
                    println!("    {:<14} {:.1}ms", phase, val * 1000.0);
                }
            }
        }
    }
}
