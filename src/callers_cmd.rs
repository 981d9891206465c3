//! Callers command implementation
//!
//! Lists direct callers of a function (reverse adjacency lookup).

use anyhow::Result;
use portolan::output::{output_json, JsonResponse, OutputFormat};
use portolan::ReachabilityOptions;
use std::path::PathBuf;

use crate::callees_cmd::NeighborsResponse;

/// Run the callers command
///
/// # Arguments
/// * `project_dir` - Path to the project root
/// * `function` - Function name to query
/// * `auto_build` - Build the graph if none is cached
/// * `output_format` - Output format (Human, Json, or Pretty)
///
/// # Displays
/// Direct callers sorted by name, human-readable or JSON
pub fn run_callers(
    project_dir: PathBuf,
    function: String,
    auto_build: bool,
    output_format: OutputFormat,
) -> Result<()> {
    let opts = ReachabilityOptions::default();
    let (graph, _) = portolan::ensure_graph(&project_dir, auto_build, &opts)?;

    let callers = graph.callers(&function);
    let response = NeighborsResponse {
        function,
        count: callers.len(),
        neighbors: callers,
    };

    if output_format == OutputFormat::Json || output_format == OutputFormat::Pretty {
        let exec_id = portolan::generate_execution_id();
        return output_json(&JsonResponse::new(response, &exec_id), output_format);
    }

    if response.neighbors.is_empty() {
        println!("No recorded callers of \"{}\"", response.function);
    } else {
        println!("Callers of \"{}\":", response.function);
        for caller in &response.neighbors {
            println!("  {}", caller);
        }
    }
    Ok(())
}
