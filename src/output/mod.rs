//! JSON output module for CLI commands
//!
//! Provides schema-versioned response types for all query commands.

pub mod command;

pub use command::{
    generate_execution_id, output_json, ErrorResponse, JsonResponse, OutputFormat,
    PORTOLAN_JSON_SCHEMA_VERSION,
};
