//! Crate-level error types for yamlnav diagnostics.

use std::path::PathBuf;

/// All errors carry enough context to produce a useful diagnostic without a
/// debugger. Parse failures and no-provider-matched conditions are recovered
/// locally inside the reference service (empty result, `None`) and only
/// reach this type when a command needs to report them to the user.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// A cursor argument was not `line:column`.
    #[error("invalid position `{arg}` (expected LINE:COLUMN, 1-based)")]
    InvalidPosition {
        /// The argument as given on the command line.
        arg: String,
    },

    /// No reference sits under the given cursor position.
    #[error("no reference at {}:{line}:{character}", file.display())]
    NoReferenceAtPosition {
        /// 1-based column reported to the user.
        character: u32,
        /// Document that was searched.
        file: PathBuf,
        /// 1-based line reported to the user.
        line: u32,
    },

    /// YAML text could not be parsed into a syntax tree.
    #[error("parse failed: {}: {reason}", file.display())]
    ParseFailed {
        /// File that failed to parse.
        file: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// Reverse-search target does not exist on disk.
    #[error("target not found: {}", path.display())]
    TargetNotFound {
        /// Path to the missing target file.
        path: PathBuf,
    },

    /// TOML deserialization of the config file failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// A reference resolved to a path that does not exist on disk.
    ///
    /// Names both the raw text and the resolved path so the user can tell
    /// whether the bug is in the reference or in path resolution.
    #[error("`{raw}` resolved to {} which does not exist", resolved.display())]
    UnresolvedReference {
        /// The reference text as written in the document.
        raw: String,
        /// The absolute path the reference resolved to.
        resolved: PathBuf,
    },

    /// The filesystem watcher could not be set up.
    #[error("watch setup failed: {reason}")]
    WatchSetup {
        /// Description of the watcher failure.
        reason: String,
    },
}
