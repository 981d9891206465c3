//! Find command implementation
//!
//! Enumerates call paths from a source function to a target function.

use anyhow::Result;
use portolan::output::{output_json, JsonResponse, OutputFormat};
use portolan::{Language, ReachabilityOptions, ReachabilityResult};
use std::path::PathBuf;

/// Run the find command
///
/// # Arguments
/// * `project_dir` - Path to the project root
/// * `source` - Starting function name
/// * `target` - Target function name
/// * `max_depth` - Maximum hops per path
/// * `language` - Language hint (auto-detected if None)
/// * `overrides` - Optional manual override document
/// * `annotate` - Annotate hops with call-site locations
/// * `output_format` - Output format (Human, Json, or Pretty)
///
/// # Displays
/// All discovered call paths with per-hop locations, or JSON output
#[allow(clippy::too_many_arguments)]
pub fn run_find(
    project_dir: PathBuf,
    source: String,
    target: String,
    max_depth: usize,
    language: Option<Language>,
    overrides: Option<PathBuf>,
    annotate: bool,
    output_format: OutputFormat,
) -> Result<()> {
    let opts = ReachabilityOptions {
        language,
        max_depth,
        overrides,
        annotate,
        ..Default::default()
    };

    let result: ReachabilityResult = portolan::find_paths(&project_dir, &source, &target, &opts)?;

    if output_format == OutputFormat::Json || output_format == OutputFormat::Pretty {
        let exec_id = portolan::generate_execution_id();
        return output_json(&JsonResponse::new(result, &exec_id), output_format);
    }

    if result.paths.is_empty() {
        println!(
            "No call paths from \"{}\" to \"{}\" (max depth {})",
            result.source, result.target, max_depth
        );
        if result.cache_used {
            println!("  (graph served from cache)");
        }
        return Ok(());
    }

    println!(
        "Call paths from \"{}\" to \"{}\": {}{}",
        result.source,
        result.target,
        result.path_count,
        if result.cache_used { " (cached graph)" } else { "" }
    );
    for (i, path) in result.paths.iter().enumerate() {
        println!("\n  [{}] Length: {}", i + 1, path.len());
        for hop in &path.hops {
            if hop.line > 0 {
                println!("    {} ({}:{})", hop.function, hop.file, hop.line);
                if !hop.snippet.is_empty() {
                    println!("        {}", hop.snippet);
                }
            } else {
                println!("    {}", hop.function);
            }
        }
    }
    Ok(())
}
