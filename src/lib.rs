//! Portolan: deterministic call-graph reachability for code audits
//!
//! Portolan reconstructs an approximate function-call graph for a source
//! tree, answers reachability queries between two functions, and caches
//! built graphs across runs. One language per run (C, Java, or Python);
//! symbol locations come from GNU Global and Universal Ctags, and call
//! edges from lexical token matching over function bodies.
//!
//! # Position Conventions
//!
//! - **Line positions**: 1-indexed (line 1 is the first line)
//! - **Column positions**: 0-indexed (column 0 is the first character)
//!
//! # Accuracy
//!
//! The graph is a best-effort lexical approximation. False positives (a
//! known name followed by `(` in an unclassified context) and false
//! negatives (indirect calls, dispatch through interfaces) are expected;
//! manual override documents patch known gaps.

pub mod error;
pub mod graph;
pub mod index;
pub mod lang;
pub mod output;
pub mod overrides;
pub mod reachability;
pub mod version;

pub use error::{IndexToolError, OverrideError};
pub use graph::{
    find_all_paths, CallGraph, CallGraphBuilder, CallPath, CallSite, CacheEntry,
    FunctionPointerResolver, GraphCache, Hop, IndirectCallResolver, NoopResolver, PathAnnotator,
    Token, TokenKind, Tokenizer,
};
pub use index::{FunctionBody, FunctionDef, SymbolIndex};
pub use lang::{detect_language, Language};
pub use output::{generate_execution_id, output_json, JsonResponse, OutputFormat};
pub use overrides::OverrideMap;
pub use reachability::{
    build_graph, ensure_graph, find_paths, BuildReport, ReachabilityOptions, ReachabilityResult,
    DEFAULT_MAX_DEPTH,
};
