//! Build command implementation
//!
//! Builds the call graph for a project, serving it from cache when the
//! index is unchanged.

use anyhow::Result;
use portolan::output::{output_json, JsonResponse, OutputFormat};
use portolan::{BuildReport, Language, ReachabilityOptions};
use std::path::PathBuf;

/// Run the build command
///
/// # Arguments
/// * `project_dir` - Path to the project root
/// * `language` - Language hint (auto-detected if None)
/// * `overrides` - Optional manual override document
/// * `force` - Rebuild even if the cached graph is current
/// * `output_format` - Output format (Human, Json, or Pretty)
///
/// # Displays
/// Build status with node/edge counts, human-readable or JSON
pub fn run_build(
    project_dir: PathBuf,
    language: Option<Language>,
    overrides: Option<PathBuf>,
    force: bool,
    output_format: OutputFormat,
) -> Result<()> {
    let opts = ReachabilityOptions {
        language,
        overrides,
        force,
        ..Default::default()
    };

    let report: BuildReport = portolan::build_graph(&project_dir, &opts)?;

    if output_format == OutputFormat::Json || output_format == OutputFormat::Pretty {
        let exec_id = portolan::generate_execution_id();
        return output_json(&JsonResponse::new(report, &exec_id), output_format);
    }

    println!(
        "Call graph {} for {} ({})",
        report.status, report.project_dir, report.language
    );
    println!("  Nodes: {}", report.node_count);
    println!("  Edges: {}", report.edge_count);
    Ok(())
}
