//! Symbol index interface over GNU Global and Universal Ctags.
//!
//! The index is an external collaborator: gtags builds the index files,
//! `global` answers symbol queries, and Universal Ctags supplies precise
//! function body bounds (`ctags --output-format=json --fields=+ne`). All
//! invocations are blocking subprocess calls; this module only starts them,
//! awaits them, and parses their output. It never mutates index data beyond
//! (re)running the indexing tool itself.

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::UNIX_EPOCH;

use crate::error::IndexToolError;

/// A function definition located by the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    /// Symbol name
    pub name: String,
    /// File path relative to the project root
    pub file: String,
    /// Definition line (1-indexed)
    pub line: usize,
}

/// The verbatim text of a function's implementation.
///
/// Used only as tokenization input; never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionBody {
    /// Function name
    pub name: String,
    /// File path relative to the project root
    pub file: String,
    /// First line of the definition (1-indexed)
    pub start_line: usize,
    /// Last line of the definition (1-indexed, inclusive)
    pub end_line: usize,
    /// Source text sliced from the file
    pub source: String,
}

/// Find the `global` binary, or report the fatal tool error.
fn global_bin() -> Result<PathBuf, IndexToolError> {
    which::which("global").map_err(|_| IndexToolError::GlobalNotFound)
}

/// Find the `gtags` binary, or report the fatal tool error.
fn gtags_bin() -> Result<PathBuf, IndexToolError> {
    which::which("gtags").map_err(|_| IndexToolError::GlobalNotFound)
}

/// Find the Universal Ctags binary, or report the fatal tool error.
fn ctags_bin() -> Result<PathBuf, IndexToolError> {
    which::which("ctags").map_err(|_| IndexToolError::CtagsNotFound)
}

/// Run an external tool and capture its output.
fn run_tool(bin: &Path, args: &[&str], cwd: &Path) -> Result<Output> {
    Command::new(bin)
        .args(args)
        .current_dir(cwd)
        .output()
        .with_context(|| format!("failed to run {}", bin.display()))
}

/// Symbol index for one project directory.
///
/// Read-only handle apart from [`ensure`](Self::ensure) and
/// [`rebuild`](Self::rebuild), which run the indexing tool.
pub struct SymbolIndex {
    root: PathBuf,
    grep_line: Regex,
}

impl SymbolIndex {
    /// Open the index for a project directory.
    ///
    /// # Arguments
    /// * `project_dir` - Path to the project root (must exist)
    ///
    /// # Returns
    /// A SymbolIndex handle; no tools are invoked yet
    pub fn open(project_dir: &Path) -> Result<Self> {
        let root = project_dir
            .canonicalize()
            .with_context(|| format!("project directory does not exist: {}", project_dir.display()))?;
        if !root.is_dir() {
            return Err(anyhow!("not a directory: {}", root.display()));
        }
        Ok(Self {
            root,
            // global --result=grep lines look like "path/to/file.c:42:..."
            grep_line: Regex::new(r"^(.+?):(\d+):").expect("valid grep-line pattern"),
        })
    }

    /// Project root this index covers.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run gtags if the index does not already exist.
    pub fn ensure(&self) -> Result<()> {
        if self.root.join("GTAGS").exists() {
            return Ok(());
        }
        self.run_gtags()
    }

    /// Rebuild the index from scratch, removing stale index files first.
    pub fn rebuild(&self) -> Result<()> {
        for name in ["GTAGS", "GRTAGS", "GPATH"] {
            let path = self.root.join(name);
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("cannot remove stale index file {}", path.display()))?;
            }
        }
        self.run_gtags()
    }

    fn run_gtags(&self) -> Result<()> {
        let bin = gtags_bin()?;
        let output = Command::new(&bin)
            .current_dir(&self.root)
            // Treat .h as C++ so headers index cleanly
            .env("GTAGSFORCECPP", "1")
            .output()
            .with_context(|| format!("failed to run {}", bin.display()))?;
        if !output.status.success() {
            return Err(IndexToolError::IndexingFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Modification marker of the index, as Unix nanoseconds.
    ///
    /// Returns 0 when no index exists. This is the only staleness signal the
    /// graph cache consumes.
    pub fn mtime_nanos(&self) -> Result<u128> {
        let gtags = self.root.join("GTAGS");
        if !gtags.exists() {
            return Ok(0);
        }
        let modified = gtags
            .metadata()
            .and_then(|m| m.modified())
            .with_context(|| format!("cannot stat {}", gtags.display()))?;
        Ok(modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0))
    }

    /// List all symbol names known to the index (`global -c`).
    ///
    /// The tool emits names sorted, which keeps downstream builds
    /// deterministic.
    pub fn list_symbols(&self) -> Result<Vec<String>> {
        let bin = global_bin()?;
        let output = run_tool(&bin, &["-c", ""], &self.root)?;
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect())
    }

    /// Find definition locations for a symbol (`global -d`).
    pub fn find_definitions(&self, name: &str) -> Result<Vec<FunctionDef>> {
        self.grep_query(&["-d", "--result=grep", name], name)
    }

    /// Find reference locations for a symbol (`global -r`).
    pub fn find_references(&self, name: &str) -> Result<Vec<FunctionDef>> {
        self.grep_query(&["-r", "--result=grep", name], name)
    }

    fn grep_query(&self, args: &[&str], name: &str) -> Result<Vec<FunctionDef>> {
        let bin = global_bin()?;
        let output = run_tool(&bin, args, &self.root)?;
        let mut defs = Vec::new();
        for line in String::from_utf8_lossy(&output.stdout).lines() {
            if let Some(caps) = self.grep_line.captures(line) {
                let line_no: usize = match caps[2].parse() {
                    Ok(n) => n,
                    Err(_) => continue,
                };
                defs.push(FunctionDef {
                    name: name.to_string(),
                    file: caps[1].to_string(),
                    line: line_no,
                });
            }
        }
        Ok(defs)
    }

    /// List symbol definitions in a single file (`global -f`), as
    /// (name, line) pairs.
    ///
    /// Used to locate the function enclosing a given line.
    pub fn definitions_in_file(&self, rel_path: &str) -> Result<Vec<(String, usize)>> {
        let bin = global_bin()?;
        let output = run_tool(&bin, &["-f", rel_path], &self.root)?;
        let mut defs = Vec::new();
        for line in String::from_utf8_lossy(&output.stdout).lines() {
            let mut parts = line.split_whitespace();
            let (Some(name), Some(line_str)) = (parts.next(), parts.next()) else {
                continue;
            };
            if let Ok(line_no) = line_str.parse::<usize>() {
                defs.push((name.to_string(), line_no));
            }
        }
        Ok(defs)
    }

    /// Name of the definition nearest above `line` in a file, if any.
    pub fn enclosing_function(&self, rel_path: &str, line: usize) -> Result<Option<String>> {
        let mut best: Option<(String, usize)> = None;
        for (name, def_line) in self.definitions_in_file(rel_path)? {
            if def_line <= line && best.as_ref().map_or(true, |(_, b)| def_line > *b) {
                best = Some((name, def_line));
            }
        }
        Ok(best.map(|(name, _)| name))
    }

    /// Extract a function's body text using Universal Ctags bounds.
    ///
    /// Runs ctags in JSON mode on the definition's file and matches the tag
    /// by name and line; tags without an `end` field (non-functions) yield
    /// `Ok(None)`. I/O failures are errors so callers can report the skipped
    /// body.
    pub fn function_body(&self, def: &FunctionDef) -> Result<Option<FunctionBody>> {
        let file_path = self.root.join(&def.file);
        if !file_path.exists() {
            return Ok(None);
        }

        let Some((start_line, end_line)) = self.ctags_bounds(&file_path, &def.name, def.line)? else {
            return Ok(None);
        };

        let text = std::fs::read_to_string(&file_path)
            .with_context(|| format!("cannot read {}", file_path.display()))?;
        let lines: Vec<&str> = text.lines().collect();
        let start_idx = start_line.saturating_sub(1);
        let end_idx = end_line.min(lines.len());
        if start_idx >= end_idx {
            return Ok(None);
        }
        let source = lines[start_idx..end_idx].join("\n");

        Ok(Some(FunctionBody {
            name: def.name.clone(),
            file: def.file.clone(),
            start_line,
            end_line,
            source,
        }))
    }

    /// Look up (start, end) bounds for a tag via ctags JSON output.
    fn ctags_bounds(
        &self,
        file_path: &Path,
        name: &str,
        start_line: usize,
    ) -> Result<Option<(usize, usize)>> {
        let bin = ctags_bin()?;
        let file_arg = file_path.to_string_lossy();
        let output = run_tool(
            &bin,
            &[
                "--output-format=json",
                "--fields=+ne",
                "-o",
                "-",
                file_arg.as_ref(),
            ],
            &self.root,
        )?;

        let mut fallback: Option<(usize, usize)> = None;
        for raw_line in String::from_utf8_lossy(&output.stdout).lines() {
            let raw_line = raw_line.trim();
            if raw_line.is_empty() {
                continue;
            }
            let Ok(tag) = serde_json::from_str::<serde_json::Value>(raw_line) else {
                continue;
            };
            if tag.get("_type").and_then(|v| v.as_str()) != Some("tag") {
                continue;
            }
            if tag.get("name").and_then(|v| v.as_str()) != Some(name) {
                continue;
            }
            let (Some(line), Some(end)) = (
                tag.get("line").and_then(|v| v.as_u64()),
                tag.get("end").and_then(|v| v.as_u64()),
            ) else {
                continue;
            };
            if line as usize == start_line {
                return Ok(Some((line as usize, end as usize)));
            }
            // First name-only match wins if no exact line match appears
            if fallback.is_none() {
                fallback = Some((line as usize, end as usize));
            }
        }
        Ok(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_rejects_missing_directory() {
        let result = SymbolIndex::open(Path::new("/nonexistent/portolan-test"));
        assert!(result.is_err());
    }

    #[test]
    fn test_mtime_zero_without_index() {
        let temp_dir = TempDir::new().unwrap();
        let index = SymbolIndex::open(temp_dir.path()).unwrap();
        assert_eq!(index.mtime_nanos().unwrap(), 0);
    }

    #[test]
    fn test_mtime_tracks_index_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("GTAGS"), b"stub").unwrap();
        let index = SymbolIndex::open(temp_dir.path()).unwrap();
        assert!(index.mtime_nanos().unwrap() > 0);
    }

    #[test]
    fn test_grep_line_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let index = SymbolIndex::open(temp_dir.path()).unwrap();
        let caps = index.grep_line.captures("src/main.c:42:void main(void)").unwrap();
        assert_eq!(&caps[1], "src/main.c");
        assert_eq!(&caps[2], "42");
    }
}
