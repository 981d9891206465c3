//! Index command implementation
//!
//! Creates or refreshes the external symbol index for a project.

use anyhow::Result;
use portolan::output::{output_json, JsonResponse, OutputFormat};
use portolan::SymbolIndex;
use std::path::PathBuf;

/// Run the index command
///
/// # Arguments
/// * `project_dir` - Path to the project root
/// * `force` - Rebuild the index even if it exists
/// * `output_format` - Output format (Human, Json, or Pretty)
///
/// # Displays
/// Index status and modification marker, human-readable or JSON
pub fn run_index(project_dir: PathBuf, force: bool, output_format: OutputFormat) -> Result<()> {
    let index = SymbolIndex::open(&project_dir)?;

    let existed = index.mtime_nanos()? > 0;
    let status = if existed && !force {
        index.ensure()?;
        "exists"
    } else if force {
        index.rebuild()?;
        "rebuilt"
    } else {
        index.ensure()?;
        "created"
    };

    let response = IndexResponse {
        status: status.to_string(),
        project_dir: index.root().to_string_lossy().to_string(),
        index_mtime: index.mtime_nanos()?,
    };

    if output_format == OutputFormat::Json || output_format == OutputFormat::Pretty {
        let exec_id = portolan::generate_execution_id();
        return output_json(&JsonResponse::new(response, &exec_id), output_format);
    }

    println!("Index {} for {}", response.status, response.project_dir);
    Ok(())
}

/// Response structure for the index command
#[derive(Debug, Clone, serde::Serialize)]
pub struct IndexResponse {
    /// "created", "rebuilt", or "exists"
    pub status: String,
    /// Resolved project root
    pub project_dir: String,
    /// Index modification marker (Unix nanoseconds)
    pub index_mtime: u128,
}
