//! Orchestration: index → cache → builder → path finder.
//!
//! Each layer lazily ensures its dependency exists: a reachability query
//! ensures a current graph, which ensures the symbol index. Nothing here
//! requires an explicit build step first.

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::graph::{find_all_paths, CallGraph, CallGraphBuilder, GraphCache, CallPath, PathAnnotator};
use crate::index::SymbolIndex;
use crate::lang::{detect_language, Language};
use crate::overrides::OverrideMap;

/// Default hop bound for path queries.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Options shared by graph building and path queries.
#[derive(Debug, Clone)]
pub struct ReachabilityOptions {
    /// Language hint; auto-detected when None
    pub language: Option<Language>,
    /// Maximum hops per path
    pub max_depth: usize,
    /// Manual override document
    pub overrides: Option<PathBuf>,
    /// Rebuild even when the cache is current
    pub force: bool,
    /// Annotate hops with file/line/snippet locations
    pub annotate: bool,
}

impl Default for ReachabilityOptions {
    fn default() -> Self {
        Self {
            language: None,
            max_depth: DEFAULT_MAX_DEPTH,
            overrides: None,
            force: false,
            annotate: true,
        }
    }
}

/// Result of a path query.
#[derive(Debug, Clone, Serialize)]
pub struct ReachabilityResult {
    pub source: String,
    pub target: String,
    pub paths: Vec<CallPath>,
    pub path_count: usize,
    /// Whether the underlying graph was served from cache
    pub cache_used: bool,
}

/// Result of a graph build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    /// "built" or "cached"
    pub status: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub language: Language,
    pub project_dir: String,
}

/// Find all call paths from `source` to `target` in a project.
///
/// Ensures the index exists, serves the graph from cache when the index is
/// unchanged (and no overrides are supplied), and annotates each hop with
/// its call-site location.
pub fn find_paths(
    project_dir: &Path,
    source: &str,
    target: &str,
    opts: &ReachabilityOptions,
) -> Result<ReachabilityResult> {
    let index = SymbolIndex::open(project_dir)?;
    index.ensure()?;

    let language = opts.language.unwrap_or_else(|| detect_language(index.root()));
    let overrides = load_overrides(opts)?;

    let (graph, cache_used) = current_graph(&index, language, opts.force, overrides.as_ref())?;

    let raw_paths = find_all_paths(&graph, source, target, opts.max_depth);

    let paths: Vec<CallPath> = if opts.annotate {
        let mut annotator = PathAnnotator::new(&index, language)?;
        raw_paths.iter().map(|p| annotator.annotate(p)).collect()
    } else {
        raw_paths.into_iter().map(CallPath::unannotated).collect()
    };

    Ok(ReachabilityResult {
        source: source.to_string(),
        target: target.to_string(),
        path_count: paths.len(),
        paths,
        cache_used,
    })
}

/// Build (or refresh) the call graph for a project and report counts.
pub fn build_graph(project_dir: &Path, opts: &ReachabilityOptions) -> Result<BuildReport> {
    let index = SymbolIndex::open(project_dir)?;
    index.ensure()?;

    let language = opts.language.unwrap_or_else(|| detect_language(index.root()));
    let overrides = load_overrides(opts)?;

    let (graph, cache_used) = current_graph(&index, language, opts.force, overrides.as_ref())?;

    Ok(BuildReport {
        status: if cache_used { "cached" } else { "built" }.to_string(),
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        language,
        project_dir: index.root().to_string_lossy().to_string(),
    })
}

/// Load or build the graph for read-only queries (show/callees/callers).
///
/// With `auto_build` disabled, a missing or stale cache is an error telling
/// the auditor how to build, instead of silently rebuilding.
pub fn ensure_graph(
    project_dir: &Path,
    auto_build: bool,
    opts: &ReachabilityOptions,
) -> Result<(CallGraph, bool)> {
    let index = SymbolIndex::open(project_dir)?;

    if !auto_build {
        let cache = GraphCache::for_project(index.root());
        let fingerprint = GraphCache::fingerprint(index.root(), index.mtime_nanos()?);
        return match cache.load(&fingerprint)? {
            Some(graph) => Ok((graph, true)),
            None => Err(anyhow!(
                "No call graph found. Run: portolan build --project {}",
                index.root().display()
            )),
        };
    }

    index.ensure()?;
    let language = opts.language.unwrap_or_else(|| detect_language(index.root()));
    let overrides = load_overrides(opts)?;
    current_graph(&index, language, opts.force, overrides.as_ref())
}

fn load_overrides(opts: &ReachabilityOptions) -> Result<Option<OverrideMap>> {
    opts.overrides
        .as_deref()
        .map(|path| OverrideMap::load(path).map_err(anyhow::Error::from))
        .transpose()
}

/// Serve the graph from cache, or build and store it.
///
/// Overrides bypass the cache on read (their edges are not part of the
/// fingerprinted index state) and the merged graph replaces the record.
fn current_graph(
    index: &SymbolIndex,
    language: Language,
    force: bool,
    overrides: Option<&OverrideMap>,
) -> Result<(CallGraph, bool)> {
    let cache = GraphCache::for_project(index.root());
    let mtime = index.mtime_nanos()?;
    let force = force || overrides.is_some();

    cache.get_or_build(index.root(), mtime, force, || {
        build_from_index(index, language, overrides)
    })
}

/// Assemble the symbol universe and all function bodies, then build.
fn build_from_index(
    index: &SymbolIndex,
    language: Language,
    overrides: Option<&OverrideMap>,
) -> Result<CallGraph> {
    let symbols = index.list_symbols()?;
    let universe: HashSet<String> = symbols.iter().cloned().collect();

    let mut bodies = Vec::new();
    for symbol in &symbols {
        let defs = index.find_definitions(symbol)?;
        let Some(def) = defs.first() else {
            continue; // completion with no definition (e.g. macro reference)
        };
        match index.function_body(def) {
            Ok(Some(body)) => bodies.push(body),
            Ok(None) => {} // not a function, or no bounds reported
            Err(e) => {
                eprintln!("Warning: skipping body of {}: {}", symbol, e);
            }
        }
    }

    let mut builder = CallGraphBuilder::new(language, universe)?;
    builder.build(&bodies, Some(index), overrides)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = ReachabilityOptions::default();
        assert_eq!(opts.max_depth, DEFAULT_MAX_DEPTH);
        assert!(opts.annotate);
        assert!(!opts.force);
        assert!(opts.language.is_none());
        assert!(opts.overrides.is_none());
    }

    #[test]
    fn test_find_paths_rejects_missing_project() {
        let result = find_paths(
            Path::new("/nonexistent/portolan-project"),
            "a",
            "b",
            &ReachabilityOptions::default(),
        );
        assert!(result.is_err());
    }
}
