//! Typed errors for external tool discovery and override documents.
//!
//! Most of the crate propagates `anyhow::Result` with contextual messages;
//! these enums cover the two seams where callers need to distinguish error
//! classes: missing indexing tools (fatal, no retry) and malformed override
//! documents (fatal for the call, since silently dropping overrides would
//! hide intended edges from the auditor).

/// Errors from the external symbol-indexing toolchain.
#[derive(Debug, thiserror::Error)]
pub enum IndexToolError {
    /// GNU Global (gtags/global) is not on PATH
    #[error(
        "GNU Global (gtags/global) is not installed.\n\
         Install it with:\n  \
         Ubuntu/Debian: sudo apt-get install global\n  \
         macOS:         brew install global\n  \
         Fedora:        sudo dnf install global"
    )]
    GlobalNotFound,

    /// Universal Ctags is not on PATH
    #[error(
        "Universal Ctags is not installed.\n\
         Install it with:\n  \
         Ubuntu/Debian: sudo apt-get install universal-ctags\n  \
         macOS:         brew install universal-ctags\n  \
         Fedora:        sudo dnf install ctags"
    )]
    CtagsNotFound,

    /// The indexing tool ran but exited non-zero
    #[error("gtags failed (exit {code}):\n{stderr}")]
    IndexingFailed { code: i32, stderr: String },
}

/// Errors from loading a manual override document.
#[derive(Debug, thiserror::Error)]
pub enum OverrideError {
    /// The override file does not exist or cannot be read
    #[error("cannot read override file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    /// The document parsed but is not a map of caller -> [callee, ...]
    #[error("invalid override document {path}: {reason}")]
    Malformed { path: String, reason: String },
}
