//! Call graph construction, caching, and path finding.
mod builder;
mod cache;
mod pathfinder;
mod tokenizer;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Re-export public types
pub use builder::{CallGraphBuilder, CallSite, FunctionPointerResolver, IndirectCallResolver, NoopResolver};
pub use cache::{CacheEntry, GraphCache};
pub use pathfinder::{find_all_paths, CallPath, Hop, PathAnnotator};
pub use tokenizer::{Token, TokenKind, Tokenizer};

/// Best-effort lexical call graph: caller name -> distinct callee names.
///
/// Callee lists keep first-discovered order and are never sorted; map keys
/// iterate in a stable order, so serialized output is deterministic for a
/// fixed set of inputs. The graph may contain cycles (recursion, mutual
/// recursion); it is not a DAG.
///
/// Edges are a lexical approximation: false positives (a known name followed
/// by a call delimiter in an unclassified context) and false negatives
/// (indirect calls) are both possible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallGraph {
    adjacency: BTreeMap<String, Vec<String>>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a caller -> callee edge.
    ///
    /// Duplicate edges are ignored; the first insertion fixes the callee's
    /// position in the caller's adjacency list.
    ///
    /// # Returns
    /// true if the edge was new
    pub fn add_edge(&mut self, caller: &str, callee: &str) -> bool {
        let callees = self.adjacency.entry(caller.to_string()).or_default();
        if callees.iter().any(|c| c == callee) {
            return false;
        }
        callees.push(callee.to_string());
        true
    }

    /// Direct callees of a function, in first-discovered order.
    ///
    /// Unknown functions have no callees.
    pub fn callees(&self, function: &str) -> &[String] {
        self.adjacency
            .get(function)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Direct callers of a function (reverse lookup), sorted by name.
    pub fn callers(&self, function: &str) -> Vec<String> {
        // Keys iterate sorted, so the result is already ordered
        self.adjacency
            .iter()
            .filter(|(_, callees)| callees.iter().any(|c| c == function))
            .map(|(caller, _)| caller.clone())
            .collect()
    }

    /// Whether a function appears anywhere in the graph, as caller or callee.
    pub fn contains(&self, function: &str) -> bool {
        self.adjacency.contains_key(function)
            || self
                .adjacency
                .values()
                .any(|callees| callees.iter().any(|c| c == function))
    }

    /// Number of functions with at least one outgoing edge.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Iterate (caller, callees) pairs in stable key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.adjacency.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_deduplicates() {
        let mut graph = CallGraph::new();
        assert!(graph.add_edge("a", "b"));
        assert!(!graph.add_edge("a", "b"));
        assert_eq!(graph.callees("a"), &["b"]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_callees_keep_first_seen_order() {
        let mut graph = CallGraph::new();
        graph.add_edge("main", "zeta");
        graph.add_edge("main", "alpha");
        graph.add_edge("main", "zeta");
        graph.add_edge("main", "mid");

        // Not alphabetical: first discovery fixes position
        assert_eq!(graph.callees("main"), &["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_callers_sorted() {
        let mut graph = CallGraph::new();
        graph.add_edge("z_caller", "leaf");
        graph.add_edge("a_caller", "leaf");
        graph.add_edge("m_caller", "other");

        assert_eq!(graph.callers("leaf"), vec!["a_caller", "z_caller"]);
        assert!(graph.callers("unknown").is_empty());
    }

    #[test]
    fn test_contains_checks_callees_too() {
        let mut graph = CallGraph::new();
        graph.add_edge("a", "b");

        assert!(graph.contains("a"));
        assert!(graph.contains("b")); // only appears as callee
        assert!(!graph.contains("c"));
    }

    #[test]
    fn test_counts() {
        let mut graph = CallGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("a", "c");
        graph.add_edge("b", "c");

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 3);
        assert!(!graph.is_empty());
    }

    #[test]
    fn test_serialization_is_stable() {
        let mut graph = CallGraph::new();
        graph.add_edge("b", "y");
        graph.add_edge("a", "z");
        graph.add_edge("a", "c");

        let first = serde_json::to_string(&graph).unwrap();
        let second = serde_json::to_string(&graph).unwrap();
        assert_eq!(first, second);

        let restored: CallGraph = serde_json::from_str(&first).unwrap();
        assert_eq!(restored, graph);
    }
}
