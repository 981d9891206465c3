//! BFS path enumeration over the call graph, with call-site annotation.
//!
//! Enumerates all simple paths (no repeated function within one path) from a
//! source to a target function, bounded by a hop limit. The per-path visited
//! check lets distinct paths share nodes while preventing any single path
//! from cycling; it bounds each path's length, not the number of paths,
//! which grows exponentially with branching; callers pick `max_depth`
//! conservatively on large codebases.

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::path::Path;

use crate::graph::builder::call_sites;
use crate::graph::tokenizer::Tokenizer;
use crate::graph::CallGraph;
use crate::index::SymbolIndex;
use crate::lang::Language;

/// One step in a discovered call path.
///
/// The first and final hops carry their own definition location; each
/// intermediate hop carries the first call site of its function inside the
/// preceding hop's body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hop {
    /// Function visited at this step
    pub function: String,
    /// File of the location ("<unknown>" when unresolvable)
    pub file: String,
    /// Line of the location (1-indexed; 0 when unresolvable)
    pub line: usize,
    /// Trimmed source line at the location
    pub snippet: String,
}

/// A complete path from source to target. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallPath {
    pub hops: Vec<Hop>,
}

impl CallPath {
    /// Number of functions visited, including source and target.
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Wrap bare function names without location annotation.
    pub fn unannotated(names: Vec<String>) -> Self {
        Self {
            hops: names
                .into_iter()
                .map(|function| Hop {
                    function,
                    file: String::new(),
                    line: 0,
                    snippet: String::new(),
                })
                .collect(),
        }
    }
}

/// Enumerate all simple paths from `source` to `target`, as name sequences.
///
/// Breadth-first over a frontier of partial paths; a path reaching the
/// target is emitted and never extended further. No returned path exceeds
/// `max_depth` hops (edges).
///
/// # Edge cases
/// - `source == target`: a single-node path only if the graph has a genuine
///   self-edge; otherwise no paths
/// - source or target absent from the graph: empty result, not an error
pub fn find_all_paths(
    graph: &CallGraph,
    source: &str,
    target: &str,
    max_depth: usize,
) -> Vec<Vec<String>> {
    let mut results = Vec::new();

    if !graph.contains(source) || !graph.contains(target) {
        return results;
    }

    if source == target {
        if graph.callees(source).iter().any(|c| c == source) {
            results.push(vec![source.to_string()]);
        }
        return results;
    }

    let mut frontier: VecDeque<Vec<String>> = VecDeque::new();
    frontier.push_back(vec![source.to_string()]);

    while let Some(path) = frontier.pop_front() {
        let hops = path.len() - 1;
        if hops >= max_depth {
            continue;
        }
        let current = path.last().expect("frontier paths are non-empty");

        for callee in graph.callees(current) {
            if path.iter().any(|seen| seen == callee) {
                continue; // would cycle within this path
            }
            let mut extended = path.clone();
            extended.push(callee.clone());
            if callee == target {
                results.push(extended);
            } else {
                frontier.push_back(extended);
            }
        }
    }

    results
}

/// Annotates name sequences with file/line/snippet locations.
///
/// Re-scans caller bodies with the same tokenizer the builder used, so the
/// reported call site is the token match that produced the edge (first
/// occurrence when a caller invokes the callee more than once). Annotation
/// failures degrade to placeholder locations rather than failing the query.
pub struct PathAnnotator<'a> {
    index: &'a SymbolIndex,
    tokenizer: Tokenizer,
}

impl<'a> PathAnnotator<'a> {
    pub fn new(index: &'a SymbolIndex, language: Language) -> anyhow::Result<Self> {
        Ok(Self {
            index,
            tokenizer: Tokenizer::new(language)?,
        })
    }

    /// Annotate one path of function names.
    pub fn annotate(&mut self, names: &[String]) -> CallPath {
        let last = names.len().saturating_sub(1);
        let hops = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                if i == 0 || i == last {
                    self.definition_hop(name)
                } else {
                    self.call_site_hop(&names[i - 1], name)
                        .unwrap_or_else(|| self.definition_hop(name))
                }
            })
            .collect();
        CallPath { hops }
    }

    /// Hop at a function's own definition line.
    fn definition_hop(&self, name: &str) -> Hop {
        let def = self
            .index
            .find_definitions(name)
            .ok()
            .and_then(|defs| defs.into_iter().next());
        match def {
            Some(def) => Hop {
                function: name.to_string(),
                snippet: read_line(self.index.root(), &def.file, def.line),
                file: def.file,
                line: def.line,
            },
            None => Hop {
                function: name.to_string(),
                file: "<unknown>".to_string(),
                line: 0,
                snippet: String::new(),
            },
        }
    }

    /// Hop at the first call site of `callee` inside `caller`'s body.
    fn call_site_hop(&mut self, caller: &str, callee: &str) -> Option<Hop> {
        let def = self
            .index
            .find_definitions(caller)
            .ok()?
            .into_iter()
            .next()?;
        let body = self.index.function_body(&def).ok()??;
        let tokens = self.tokenizer.tokenize(&body.source).ok()?;

        let wanted: HashSet<String> = std::iter::once(callee.to_string()).collect();
        let site = call_sites(&tokens, &body, &wanted)
            .into_iter()
            .find(|s| s.callee == callee)?;

        let row = site.line.checked_sub(body.start_line)?;
        let snippet = body
            .source
            .lines()
            .nth(row)
            .map(|l| l.trim().to_string())
            .unwrap_or_default();

        Some(Hop {
            function: callee.to_string(),
            file: body.file,
            line: site.line,
            snippet,
        })
    }
}

/// Read a single line from a file under the project root, trimmed.
fn read_line(root: &Path, file: &str, line: usize) -> String {
    if line == 0 {
        return String::new();
    }
    let path = root.join(file);
    let Ok(text) = std::fs::read_to_string(&path) else {
        return String::new();
    };
    text.lines()
        .nth(line - 1)
        .map(|l| l.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &[&str])]) -> CallGraph {
        let mut g = CallGraph::new();
        for (caller, callees) in edges {
            for callee in *callees {
                g.add_edge(caller, callee);
            }
        }
        g
    }

    #[test]
    fn test_direct_call() {
        let g = graph(&[("a", &["b"])]);
        assert_eq!(find_all_paths(&g, "a", "b", 10), vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_two_hop() {
        let g = graph(&[("a", &["b"]), ("b", &["c"])]);
        assert_eq!(find_all_paths(&g, "a", "c", 10), vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn test_multiple_paths() {
        let g = graph(&[("a", &["b", "c"]), ("b", &["d"]), ("c", &["d"])]);
        let mut paths = find_all_paths(&g, "a", "d", 10);
        paths.sort();
        assert_eq!(paths, vec![vec!["a", "b", "d"], vec!["a", "c", "d"]]);
    }

    #[test]
    fn test_no_path() {
        let g = graph(&[("a", &["b"]), ("c", &["d"])]);
        assert!(find_all_paths(&g, "a", "d", 10).is_empty());
    }

    #[test]
    fn test_cycle_avoidance() {
        let g = graph(&[("a", &["b"]), ("b", &["a", "c"])]);
        assert_eq!(find_all_paths(&g, "a", "c", 10), vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn test_self_loop_on_intermediate() {
        let g = graph(&[("a", &["a", "b"])]);
        assert_eq!(find_all_paths(&g, "a", "b", 10), vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_source_equals_target_without_self_edge() {
        // An indirect route back (a -> b -> a) is not a self-edge
        let g = graph(&[("a", &["b"]), ("b", &["a"])]);
        assert!(find_all_paths(&g, "a", "a", 10).is_empty());
    }

    #[test]
    fn test_source_equals_target_with_self_edge() {
        let g = graph(&[("a", &["a", "b"])]);
        assert_eq!(find_all_paths(&g, "a", "a", 10), vec![vec!["a"]]);
    }

    #[test]
    fn test_max_depth_bounds_hops() {
        let g = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &["d"]), ("d", &["e"])]);
        assert!(find_all_paths(&g, "a", "e", 3).is_empty());
        assert_eq!(
            find_all_paths(&g, "a", "e", 4),
            vec![vec!["a", "b", "c", "d", "e"]]
        );
    }

    #[test]
    fn test_returned_paths_never_exceed_depth() {
        let g = graph(&[("a", &["b", "e"]), ("b", &["c"]), ("c", &["e"])]);
        for path in find_all_paths(&g, "a", "e", 2) {
            assert!(path.len() - 1 <= 2);
        }
    }

    #[test]
    fn test_empty_graph() {
        let g = CallGraph::new();
        assert!(find_all_paths(&g, "a", "b", 10).is_empty());
    }

    #[test]
    fn test_absent_endpoints_yield_empty() {
        let g = graph(&[("a", &["b"])]);
        assert!(find_all_paths(&g, "missing", "b", 10).is_empty());
        assert!(find_all_paths(&g, "a", "missing", 10).is_empty());
    }

    #[test]
    fn test_diamond_graph() {
        let g = graph(&[
            ("a", &["b", "c"]),
            ("b", &["d"]),
            ("c", &["d"]),
            ("d", &["e"]),
        ]);
        let mut paths = find_all_paths(&g, "a", "e", 10);
        paths.sort();
        assert_eq!(
            paths,
            vec![vec!["a", "b", "d", "e"], vec!["a", "c", "d", "e"]]
        );
    }

    #[test]
    fn test_paths_are_simple() {
        let g = graph(&[
            ("a", &["b", "c"]),
            ("b", &["c", "a"]),
            ("c", &["a", "d"]),
        ]);
        for path in find_all_paths(&g, "a", "d", 6) {
            let distinct: HashSet<&String> = path.iter().collect();
            assert_eq!(distinct.len(), path.len(), "path repeats a function: {:?}", path);
        }
    }

    #[test]
    fn test_unannotated_path() {
        let path = CallPath::unannotated(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(path.len(), 2);
        assert_eq!(path.hops[0].function, "a");
        assert_eq!(path.hops[0].line, 0);
    }
}
