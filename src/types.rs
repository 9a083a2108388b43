//! Core domain types for YAML file references.

use std::path::PathBuf;

use serde::Serialize;

/// Zero-based text coordinate. `character` counts UTF-16 code units within
/// the line so columns line up with editor coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Position {
    /// Zero-based line index.
    pub line: u32,
    /// Zero-based column, in UTF-16 code units.
    pub character: u32,
}

impl Position {
    /// Construct a position from line and character.
    pub fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }
}

/// A span of source text. `end` is the position immediately after the last
/// character of the match; containment checks are inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    /// Start of the span.
    pub start: Position,
    /// Position just past the last character of the span.
    pub end: Position,
}

impl Range {
    /// Whether `position` falls inside this range.
    ///
    /// Uses a closed interval: a position exactly on either boundary counts
    /// as inside. Comparison is lexicographic on (line, character).
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }
}

/// Which dialect keyword produced a reference.
///
/// `Uses`, `Include` and `Local` are reserved for dialects the provider set
/// can grow into (GitHub Actions, GitLab CI). `Unknown` marks generic
/// regex matches with no semantic keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceType {
    /// An Azure Pipelines `template:` step or stage reference.
    Template,
    /// A `template:` nested under an `extends:` mapping.
    Extends,
    /// A GitHub-Actions-style `uses:` reference (reserved).
    Uses,
    /// A GitLab-style `include:` reference (reserved).
    Include,
    /// A bare local path reference (reserved).
    Local,
    /// A generic regex match with no semantic keyword.
    Unknown,
}

impl std::fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ReferenceType::Template => "template",
            ReferenceType::Extends => "extends",
            ReferenceType::Uses => "uses",
            ReferenceType::Include => "include",
            ReferenceType::Local => "local",
            ReferenceType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// One located path-reference occurrence.
///
/// Created fresh on every extraction call and never mutated — callers own
/// their copies outright. Performance comes from the registry's per-document
/// provider cache, not from reference caching.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReference {
    /// Raw path text as written in the source, quotes removed for scalar
    /// values but the `@repo` suffix kept.
    pub path: String,
    /// Absolute filesystem path; empty for external references, whose
    /// target repository is not available locally.
    pub resolved_path: PathBuf,
    /// Location of the raw path text in the source document.
    pub range: Range,
    /// Dialect keyword that produced this reference.
    pub kind: ReferenceType,
    /// True when the raw path uses the `path@repo` addressing syntax.
    pub is_external: bool,
    /// Repository named by an external reference; `None` otherwise.
    pub external_repo: Option<String>,
}

/// Result of a provider's dialect detection over one document.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Id of the provider that produced this result.
    pub provider: String,
    /// How likely the document belongs to this provider's dialect, in [0, 1].
    pub confidence: f64,
    /// Human-readable explanation of the score.
    pub reason: String,
}

/// The `path`/`repo` halves of an external `path@repo` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalRef {
    /// In-repo path portion, before the first `@`.
    pub path: String,
    /// Repository identifier, after the first `@`.
    pub repo: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_ordering_is_lexicographic() {
        assert!(Position::new(1, 0) > Position::new(0, 99));
        assert!(Position::new(2, 3) < Position::new(2, 4));
        assert_eq!(Position::new(2, 3), Position::new(2, 3));
    }

    #[test]
    fn range_containment_includes_both_boundaries() {
        let range = Range {
            start: Position::new(1, 4),
            end: Position::new(1, 10),
        };
        assert!(range.contains(Position::new(1, 4)));
        assert!(range.contains(Position::new(1, 7)));
        assert!(range.contains(Position::new(1, 10)));
        assert!(!range.contains(Position::new(1, 3)));
        assert!(!range.contains(Position::new(1, 11)));
        assert!(!range.contains(Position::new(0, 7)));
        assert!(!range.contains(Position::new(2, 0)));
    }

    #[test]
    fn multiline_range_containment() {
        let range = Range {
            start: Position::new(1, 4),
            end: Position::new(3, 2),
        };
        // Any column on a fully covered middle line is inside.
        assert!(range.contains(Position::new(2, 0)));
        assert!(range.contains(Position::new(2, 500)));
        assert!(!range.contains(Position::new(1, 3)));
        assert!(!range.contains(Position::new(3, 3)));
    }
}
