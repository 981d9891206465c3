//! Per-project call graph cache with index-keyed invalidation.
//!
//! One JSON record per project holds the serialized adjacency and a
//! fingerprint of the index state it was built from. Staleness is decided
//! purely by comparing fingerprints, never by inspecting graph content,
//! so a rebuilt index with identical symbols but a newer modification
//! marker still forces a rebuild. Replacement is atomic (temp file +
//! rename); concurrent processes race with last-writer-wins semantics.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::graph::CallGraph;

/// File name of the cache record inside the cache directory.
const CACHE_FILE: &str = "callgraph.json";

/// Persisted cache record: fingerprint plus the graph built under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Digest of (project path, index modification marker)
    pub fingerprint: String,
    /// The cached call graph
    pub graph: CallGraph,
}

/// Durable cache store for one cache directory.
///
/// An explicit value rather than module-level state, so several projects can
/// be processed in one process without cross-talk.
pub struct GraphCache {
    dir: PathBuf,
}

impl GraphCache {
    /// Create a store rooted at an explicit directory.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Default store location for a project: `<project>/.cache/portolan`.
    pub fn for_project(project: &Path) -> Self {
        Self::new(project.join(".cache").join("portolan"))
    }

    /// Directory holding the cache record.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Compute the fingerprint for a project and index modification marker.
    ///
    /// SHA-256 over the project path and marker, truncated to 16 hex chars.
    /// Deterministic and platform-independent.
    pub fn fingerprint(project: &Path, index_mtime_nanos: u128) -> String {
        let mut hasher = Sha256::new();
        hasher.update(project.to_string_lossy().as_bytes());
        hasher.update(b":");
        hasher.update(index_mtime_nanos.to_be_bytes());
        let digest = hasher.finalize();
        hex::encode(&digest[..8])
    }

    /// Load the cached graph if its fingerprint matches.
    ///
    /// Returns None for a missing record, a mismatched fingerprint, or a
    /// record that no longer parses (treated as stale, not fatal).
    pub fn load(&self, fingerprint: &str) -> Result<Option<CallGraph>> {
        let path = self.dir.join(CACHE_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read cache file {}", path.display()))?;
        let Ok(entry) = serde_json::from_str::<CacheEntry>(&text) else {
            return Ok(None);
        };
        if entry.fingerprint != fingerprint {
            return Ok(None);
        }
        Ok(Some(entry.graph))
    }

    /// Store a graph under a fingerprint, replacing any prior record.
    ///
    /// The record is written to a temp file in the same directory and
    /// renamed into place, so a concurrent reader never observes a torn
    /// write.
    pub fn store(&self, fingerprint: &str, graph: &CallGraph) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("cannot create cache directory {}", self.dir.display()))?;

        let entry = CacheEntry {
            fingerprint: fingerprint.to_string(),
            graph: graph.clone(),
        };
        let json = serde_json::to_string(&entry)?;

        let mut temp = tempfile::NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("cannot create temp file in {}", self.dir.display()))?;
        temp.write_all(json.as_bytes())?;
        let path = self.dir.join(CACHE_FILE);
        temp.persist(&path)
            .with_context(|| format!("cannot replace cache file {}", path.display()))?;
        Ok(())
    }

    /// Return the cached graph for the current index state, or build and
    /// store a fresh one.
    ///
    /// # Arguments
    /// * `project` - Project root the graph describes
    /// * `index_mtime_nanos` - The index's modification marker
    /// * `force` - Rebuild even when the cached record is current
    /// * `build` - Invoked on a miss to produce the graph
    ///
    /// # Returns
    /// The graph and whether it came from cache
    pub fn get_or_build<F>(
        &self,
        project: &Path,
        index_mtime_nanos: u128,
        force: bool,
        build: F,
    ) -> Result<(CallGraph, bool)>
    where
        F: FnOnce() -> Result<CallGraph>,
    {
        let fingerprint = Self::fingerprint(project, index_mtime_nanos);

        if !force {
            if let Some(graph) = self.load(&fingerprint)? {
                return Ok((graph, true));
            }
        }

        let graph = build()?;
        self.store(&fingerprint, &graph)?;
        Ok((graph, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_graph() -> CallGraph {
        let mut graph = CallGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("a", "c");
        graph.add_edge("b", "d");
        graph
    }

    #[test]
    fn test_fingerprint_deterministic() {
        let project = Path::new("/some/project");
        assert_eq!(
            GraphCache::fingerprint(project, 100),
            GraphCache::fingerprint(project, 100)
        );
    }

    #[test]
    fn test_fingerprint_varies_with_inputs() {
        let project = Path::new("/some/project");
        assert_ne!(
            GraphCache::fingerprint(project, 100),
            GraphCache::fingerprint(project, 200)
        );
        assert_ne!(
            GraphCache::fingerprint(Path::new("/path/a"), 100),
            GraphCache::fingerprint(Path::new("/path/b"), 100)
        );
    }

    #[test]
    fn test_fingerprint_is_hex_16_chars() {
        let fp = GraphCache::fingerprint(Path::new("/some/project"), 42);
        assert_eq!(fp.len(), 16);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_store_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let cache = GraphCache::new(temp_dir.path().join("cache"));
        let graph = sample_graph();

        cache.store("abcd1234abcd1234", &graph).unwrap();
        let loaded = cache.load("abcd1234abcd1234").unwrap();
        assert_eq!(loaded, Some(graph));
    }

    #[test]
    fn test_load_mismatched_fingerprint_misses() {
        let temp_dir = TempDir::new().unwrap();
        let cache = GraphCache::new(temp_dir.path().join("cache"));

        cache.store("old_fingerprint0", &sample_graph()).unwrap();
        assert_eq!(cache.load("new_fingerprint0").unwrap(), None);
    }

    #[test]
    fn test_load_missing_record_misses() {
        let temp_dir = TempDir::new().unwrap();
        let cache = GraphCache::new(temp_dir.path().join("cache"));
        assert_eq!(cache.load("whatever00000000").unwrap(), None);
    }

    #[test]
    fn test_corrupt_record_is_stale_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("cache");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(CACHE_FILE), b"{not json").unwrap();

        let cache = GraphCache::new(dir);
        assert_eq!(cache.load("whatever00000000").unwrap(), None);
    }

    #[test]
    fn test_store_replaces_prior_entry() {
        let temp_dir = TempDir::new().unwrap();
        let cache = GraphCache::new(temp_dir.path().join("cache"));

        cache.store("fp_one0000000000", &sample_graph()).unwrap();
        let mut second = CallGraph::new();
        second.add_edge("x", "y");
        cache.store("fp_two0000000000", &second).unwrap();

        // Only the newest record survives
        assert_eq!(cache.load("fp_one0000000000").unwrap(), None);
        assert_eq!(cache.load("fp_two0000000000").unwrap(), Some(second));
    }

    #[test]
    fn test_get_or_build_hits_then_misses_on_touch() {
        let temp_dir = TempDir::new().unwrap();
        let cache = GraphCache::new(temp_dir.path().join("cache"));
        let project = Path::new("/proj");

        let (first, cached) = cache
            .get_or_build(project, 100, false, || Ok(sample_graph()))
            .unwrap();
        assert!(!cached);

        let (second, cached) = cache
            .get_or_build(project, 100, false, || panic!("must not rebuild"))
            .unwrap();
        assert!(cached);
        assert_eq!(first, second);

        // Index touched: marker changes, builder runs again
        let (_, cached) = cache
            .get_or_build(project, 200, false, || Ok(sample_graph()))
            .unwrap();
        assert!(!cached);
    }

    #[test]
    fn test_get_or_build_force_rebuilds() {
        let temp_dir = TempDir::new().unwrap();
        let cache = GraphCache::new(temp_dir.path().join("cache"));
        let project = Path::new("/proj");

        cache
            .get_or_build(project, 100, false, || Ok(sample_graph()))
            .unwrap();
        let (_, cached) = cache
            .get_or_build(project, 100, true, || Ok(sample_graph()))
            .unwrap();
        assert!(!cached);
    }
}
