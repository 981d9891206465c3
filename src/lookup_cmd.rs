//! Lookup command implementation
//!
//! Surfaces the symbol index's forward/backward lookup: definitions of and
//! references to a symbol.

use anyhow::Result;
use portolan::output::{output_json, JsonResponse, OutputFormat};
use portolan::{FunctionDef, SymbolIndex};
use std::path::PathBuf;

use crate::cli::LookupKind;

/// Run the lookup command
///
/// # Arguments
/// * `project_dir` - Path to the project root
/// * `symbol` - Symbol name to look up
/// * `kind` - Definitions, references, or both
/// * `output_format` - Output format (Human, Json, or Pretty)
///
/// # Displays
/// Matching locations per kind, human-readable or JSON
pub fn run_lookup(
    project_dir: PathBuf,
    symbol: String,
    kind: LookupKind,
    output_format: OutputFormat,
) -> Result<()> {
    let index = SymbolIndex::open(&project_dir)?;
    index.ensure()?;

    let definitions = match kind {
        LookupKind::Definitions | LookupKind::Both => Some(
            index
                .find_definitions(&symbol)?
                .into_iter()
                .map(LocationJson::from)
                .collect(),
        ),
        LookupKind::References => None,
    };
    let references = match kind {
        LookupKind::References | LookupKind::Both => Some(
            index
                .find_references(&symbol)?
                .into_iter()
                .map(LocationJson::from)
                .collect(),
        ),
        LookupKind::Definitions => None,
    };

    let response = LookupResponse {
        symbol,
        definitions,
        references,
    };

    if output_format == OutputFormat::Json || output_format == OutputFormat::Pretty {
        let exec_id = portolan::generate_execution_id();
        return output_json(&JsonResponse::new(response, &exec_id), output_format);
    }

    if let Some(defs) = &response.definitions {
        println!("Definitions of \"{}\": {}", response.symbol, defs.len());
        for def in defs {
            println!("  {}:{}", def.file, def.line);
        }
    }
    if let Some(refs) = &response.references {
        println!("References to \"{}\": {}", response.symbol, refs.len());
        for reference in refs {
            println!("  {}:{}", reference.file, reference.line);
        }
    }
    Ok(())
}

/// Response structure for the lookup command
#[derive(Debug, Clone, serde::Serialize)]
pub struct LookupResponse {
    /// Queried symbol name
    pub symbol: String,
    /// Definition locations (when requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definitions: Option<Vec<LocationJson>>,
    /// Reference locations (when requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<LocationJson>>,
}

/// Location for JSON output
#[derive(Debug, Clone, serde::Serialize)]
pub struct LocationJson {
    /// File path relative to the project root
    pub file: String,
    /// Line number (1-indexed)
    pub line: usize,
}

impl From<FunctionDef> for LocationJson {
    fn from(def: FunctionDef) -> Self {
        Self {
            file: def.file,
            line: def.line,
        }
    }
}
