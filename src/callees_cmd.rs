//! Callees command implementation
//!
//! Lists direct callees of a function (forward adjacency).

use anyhow::Result;
use portolan::output::{output_json, JsonResponse, OutputFormat};
use portolan::ReachabilityOptions;
use std::path::PathBuf;

/// Run the callees command
///
/// # Arguments
/// * `project_dir` - Path to the project root
/// * `function` - Function name to query
/// * `auto_build` - Build the graph if none is cached
/// * `output_format` - Output format (Human, Json, or Pretty)
///
/// # Displays
/// Direct callees in first-discovered order, human-readable or JSON
pub fn run_callees(
    project_dir: PathBuf,
    function: String,
    auto_build: bool,
    output_format: OutputFormat,
) -> Result<()> {
    let opts = ReachabilityOptions::default();
    let (graph, _) = portolan::ensure_graph(&project_dir, auto_build, &opts)?;

    let callees: Vec<String> = graph.callees(&function).to_vec();
    let response = NeighborsResponse {
        function,
        count: callees.len(),
        neighbors: callees,
    };

    if output_format == OutputFormat::Json || output_format == OutputFormat::Pretty {
        let exec_id = portolan::generate_execution_id();
        return output_json(&JsonResponse::new(response, &exec_id), output_format);
    }

    if response.neighbors.is_empty() {
        println!("No recorded callees for \"{}\"", response.function);
    } else {
        println!("Callees of \"{}\":", response.function);
        for callee in &response.neighbors {
            println!("  {}", callee);
        }
    }
    Ok(())
}

/// Response structure for callees/callers commands
#[derive(Debug, Clone, serde::Serialize)]
pub struct NeighborsResponse {
    /// Queried function name
    pub function: String,
    /// Number of neighbors found
    pub count: usize,
    /// Neighbor function names
    pub neighbors: Vec<String>,
}
