//! Show command implementation
//!
//! Dumps the full call graph adjacency.

use anyhow::Result;
use portolan::output::{output_json, JsonResponse, OutputFormat};
use portolan::{CallGraph, ReachabilityOptions};
use std::path::PathBuf;

/// Run the show command
///
/// # Arguments
/// * `project_dir` - Path to the project root
/// * `auto_build` - Build the graph if none is cached
/// * `output_format` - Output format (Human, Json, or Pretty)
///
/// # Displays
/// Full caller -> callees adjacency, human-readable or JSON
pub fn run_show(project_dir: PathBuf, auto_build: bool, output_format: OutputFormat) -> Result<()> {
    let opts = ReachabilityOptions::default();
    let (graph, cache_used) = portolan::ensure_graph(&project_dir, auto_build, &opts)?;

    if output_format == OutputFormat::Json || output_format == OutputFormat::Pretty {
        let exec_id = portolan::generate_execution_id();
        let response = ShowResponse {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            cache_used,
            graph,
        };
        return output_json(&JsonResponse::new(response, &exec_id), output_format);
    }

    if graph.is_empty() {
        println!("Call graph is empty");
        return Ok(());
    }

    println!(
        "Call graph: {} nodes, {} edges{}",
        graph.node_count(),
        graph.edge_count(),
        if cache_used { " (cached)" } else { "" }
    );
    for (caller, callees) in graph.iter() {
        println!("  {} -> {}", caller, callees.join(", "));
    }
    Ok(())
}

/// Response structure for the show command
#[derive(Debug, Clone, serde::Serialize)]
pub struct ShowResponse {
    /// Number of callers in the graph
    pub node_count: usize,
    /// Total number of edges
    pub edge_count: usize,
    /// Whether the graph came from cache
    pub cache_used: bool,
    /// Full adjacency mapping
    pub graph: CallGraph,
}
