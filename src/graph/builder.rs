//! Call graph construction from indexed function bodies.
//!
//! The builder consumes every `FunctionBody` the symbol index can produce
//! and emits a caller -> callees adjacency by lexical matching: an
//! identifier token that names a known symbol and is followed by a call
//! delimiter becomes an edge. String-literal and comment tokens never match.
//! A language-specific secondary pass resolves indirect calls (C function
//! pointers) through an external text-search tool when one is available,
//! and a manual override document patches remaining blind spots.

use anyhow::Result;
use regex::Regex;
use std::collections::HashSet;
use std::path::PathBuf;
use std::process::Command;

use crate::graph::tokenizer::{Token, TokenKind, Tokenizer};
use crate::graph::CallGraph;
use crate::index::{FunctionBody, SymbolIndex};
use crate::lang::Language;
use crate::overrides::OverrideMap;

/// How many tokens past a matched identifier to inspect for the call
/// delimiter, skipping comments.
const CALL_LOOKAHEAD: usize = 4;

/// One detected call site inside a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Name of the called function
    pub callee: String,
    /// Absolute line of the call (1-indexed, within the body's file)
    pub line: usize,
}

/// Extract call sites from a tokenized body.
///
/// The first occurrence of the body's own name is its declaration (bodies
/// start at the definition line) and produces no edge; later occurrences
/// are genuine recursive calls.
pub fn call_sites(tokens: &[Token], body: &FunctionBody, universe: &HashSet<String>) -> Vec<CallSite> {
    let mut sites = Vec::new();
    let mut seen_declaration = false;

    for (i, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::Identifier || !universe.contains(&token.text) {
            continue;
        }
        if token.text == body.name && !seen_declaration {
            seen_declaration = true;
            continue;
        }

        // Look ahead for the call delimiter, skipping comment tokens
        let mut is_call = false;
        for next in tokens.iter().skip(i + 1).take(CALL_LOOKAHEAD) {
            if next.kind == TokenKind::Comment {
                continue;
            }
            is_call = next.text == "(";
            break;
        }

        if is_call {
            sites.push(CallSite {
                callee: token.text.clone(),
                line: body.start_line + token.row,
            });
        }
    }

    sites
}

/// Strategy for resolving indirect calls the lexical pass cannot see.
///
/// Selected once at builder construction; a missing external tool degrades
/// to [`NoopResolver`] instead of branching through the builder logic.
pub trait IndirectCallResolver {
    /// Produce extra (caller, callee) edges for the project.
    fn resolve(&self, index: &SymbolIndex, universe: &HashSet<String>) -> Result<Vec<(String, String)>>;
}

/// Resolver that produces no edges. Used when no external search tool is
/// available or the language has no indirect-call heuristic.
pub struct NoopResolver;

impl IndirectCallResolver for NoopResolver {
    fn resolve(&self, _index: &SymbolIndex, _universe: &HashSet<String>) -> Result<Vec<(String, String)>> {
        Ok(Vec::new())
    }
}

/// C function-pointer resolver backed by ripgrep.
///
/// Scans for struct-field assignments that look like function pointers
/// (`.handler = callback` or `->ops = my_func`) and attributes each hit to
/// the enclosing function via the index's per-file definition list.
pub struct FunctionPointerResolver {
    rg_path: PathBuf,
    assignment: Regex,
    location: Regex,
}

impl FunctionPointerResolver {
    /// Detect ripgrep in PATH; None means the heuristic pass is unavailable.
    pub fn detect() -> Option<Self> {
        let rg_path = which::which("rg").ok()?;
        Some(Self {
            rg_path,
            assignment: Regex::new(r"(?:->|\.)\w+\s*=\s*(\w+)").expect("valid assignment pattern"),
            location: Regex::new(r"^(.+?):(\d+):").expect("valid location pattern"),
        })
    }
}

impl IndirectCallResolver for FunctionPointerResolver {
    fn resolve(&self, index: &SymbolIndex, universe: &HashSet<String>) -> Result<Vec<(String, String)>> {
        let output = Command::new(&self.rg_path)
            .args([
                "--no-heading",
                "-n",
                // Sorted output keeps edge discovery order deterministic
                "--sort",
                "path",
                r"(?:->|\.)(\w+)\s*=\s*(\w+)",
                "--type",
                "c",
            ])
            .current_dir(index.root())
            .output();

        // rg exits non-zero on zero matches; an empty stdout is simply no
        // edges, and a failed spawn degrades to none as well
        let stdout = match output {
            Ok(out) => String::from_utf8_lossy(&out.stdout).to_string(),
            Err(_) => return Ok(Vec::new()),
        };

        let mut edges = Vec::new();
        for line in stdout.lines() {
            let Some(loc) = self.location.captures(line) else {
                continue;
            };
            let rest = &line[loc.get(0).map(|m| m.end()).unwrap_or(0)..];
            let Some(assign) = self.assignment.captures(rest) else {
                continue;
            };
            let target = assign[1].to_string();
            if !universe.contains(&target) {
                continue;
            }
            let file = loc[1].to_string();
            let Ok(line_no) = loc[2].parse::<usize>() else {
                continue;
            };
            if let Some(caller) = index.enclosing_function(&file, line_no)? {
                edges.push((caller, target));
            }
        }
        Ok(edges)
    }
}

/// Builds a [`CallGraph`] from function bodies for one language.
pub struct CallGraphBuilder {
    universe: HashSet<String>,
    tokenizer: Tokenizer,
    resolver: Box<dyn IndirectCallResolver>,
}

impl CallGraphBuilder {
    /// Create a builder over the known symbol universe.
    ///
    /// The indirect-call resolver is chosen here: C projects get the
    /// function-pointer heuristic when ripgrep is present, everything else
    /// gets the no-op resolver.
    pub fn new(language: Language, universe: HashSet<String>) -> Result<Self> {
        let resolver: Box<dyn IndirectCallResolver> = match language {
            Language::C => match FunctionPointerResolver::detect() {
                Some(resolver) => Box::new(resolver),
                None => Box::new(NoopResolver),
            },
            _ => Box::new(NoopResolver),
        };
        Self::with_resolver(language, universe, resolver)
    }

    /// Create a builder with an explicit resolver.
    pub fn with_resolver(
        language: Language,
        universe: HashSet<String>,
        resolver: Box<dyn IndirectCallResolver>,
    ) -> Result<Self> {
        Ok(Self {
            universe,
            tokenizer: Tokenizer::new(language)?,
            resolver,
        })
    }

    /// Build the call graph.
    ///
    /// # Arguments
    /// * `bodies` - All function bodies for the project, in a stable order
    /// * `index` - Index handle for the indirect-call pass (None skips it)
    /// * `overrides` - Manual edges, merged last and purely additive
    ///
    /// # Behavior
    /// 1. Tokenize each body; string/comment tokens never produce edges
    /// 2. Record an edge per identifier match followed by a call delimiter
    /// 3. Run the indirect-call resolver, if any
    /// 4. Merge overrides (callees need not be indexed symbols)
    /// 5. Deduplicate callees per caller, keeping first-seen order
    ///
    /// A body that fails to tokenize is skipped with a warning; the build
    /// continues.
    pub fn build(
        &mut self,
        bodies: &[FunctionBody],
        index: Option<&SymbolIndex>,
        overrides: Option<&OverrideMap>,
    ) -> Result<CallGraph> {
        let mut graph = CallGraph::new();

        for body in bodies {
            let tokens = match self.tokenizer.tokenize(&body.source) {
                Ok(tokens) => tokens,
                Err(e) => {
                    eprintln!("Warning: skipping body of {}: {}", body.name, e);
                    continue;
                }
            };
            for site in call_sites(&tokens, body, &self.universe) {
                graph.add_edge(&body.name, &site.callee);
            }
        }

        if let Some(index) = index {
            for (caller, callee) in self.resolver.resolve(index, &self.universe)? {
                graph.add_edge(&caller, &callee);
            }
        }

        if let Some(overrides) = overrides {
            for (caller, callees) in overrides.iter() {
                for callee in callees {
                    graph.add_edge(caller, callee);
                }
            }
        }

        Ok(graph)
    }

    /// The symbol universe this builder matches against.
    pub fn universe(&self) -> &HashSet<String> {
        &self.universe
    }
}
