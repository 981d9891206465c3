//! Language detection for analyzed projects.
//!
//! A project is analyzed in exactly one language per run. When the caller
//! does not name one, the dominant language is picked by counting source
//! file extensions across the tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use walkdir::WalkDir;

/// Source language of the analyzed project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Java,
    Python,
}

impl Language {
    /// Parse from a CLI argument ("c", "java", "python").
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "c" => Some(Language::C),
            "java" => Some(Language::Java),
            "python" | "py" => Some(Language::Python),
            _ => None,
        }
    }

    /// Map a file extension to a language.
    ///
    /// `.h` headers are attributed to C, matching the indexing tool's view.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "c" | "h" => Some(Language::C),
            "java" => Some(Language::Java),
            "py" => Some(Language::Python),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Java => "java",
            Language::Python => "python",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Auto-detect the dominant language of a project by file extension counts.
///
/// Walks the tree once, counts files per language, and returns the language
/// with the most files. An empty or unrecognized tree defaults to C.
pub fn detect_language(root: &Path) -> Language {
    let mut c = 0usize;
    let mut java = 0usize;
    let mut python = 0usize;

    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let ext = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        match Language::from_extension(ext) {
            Some(Language::C) => c += 1,
            Some(Language::Java) => java += 1,
            Some(Language::Python) => python += 1,
            None => {}
        }
    }

    // Ties resolve in c > java > python order for determinism
    if java > c && java >= python {
        Language::Java
    } else if python > c && python > java {
        Language::Python
    } else {
        Language::C
    }
}
