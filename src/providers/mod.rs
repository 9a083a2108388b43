//! Dialect providers: pluggable strategies that recognize one YAML dialect
//! and extract file references from it. Variants override detection and
//! extraction; path resolution and at-position lookup share defaults.

mod azure;
mod generic;

use std::path::{Component, Path, PathBuf};

pub use azure::{AzurePipelinesProvider, AZURE_PROVIDER_ID};
pub use generic::{GenericYamlProvider, GENERIC_PROVIDER_ID};

use crate::parser::ParsedDocument;
use crate::types::{Detection, ExternalRef, FileReference, Position};

/// A YAML dialect strategy.
///
/// `detect` must be a pure function of document content and name, scoring
/// in `[0, 1]`. A provider with no domain-specific signal still returns a
/// small nonzero confidence so it can serve as a fallback; only the
/// designated generic provider sits at a constant low score.
pub trait Provider {
    /// Stable unique id, used as the registry key.
    fn id(&self) -> &'static str;

    /// Human-readable dialect name.
    fn display_name(&self) -> &'static str;

    /// Score how likely `text` (from the document at `path`) belongs to
    /// this provider's dialect.
    fn detect(&self, text: &str, path: &Path) -> Detection;

    /// Harvest every file reference the dialect defines from a parsed
    /// document. `root` is the workspace root for root-relative paths.
    fn extract_references(&self, document: &ParsedDocument, root: &Path) -> Vec<FileReference>;

    /// The reference under `position`, if any: extract, then take the first
    /// whose range contains the position (closed interval). O(references)
    /// per query, which is fine for single-document interactive use.
    fn reference_at_position(
        &self,
        document: &ParsedDocument,
        position: Position,
        root: &Path,
    ) -> Option<FileReference> {
        self.extract_references(document, root)
            .into_iter()
            .find(|reference| reference.range.contains(position))
    }

    /// Resolve a raw path against the current file and workspace root.
    fn resolve_path(&self, raw: &str, current_file: &Path, root: &Path) -> PathBuf {
        resolve_path(raw, current_file, root)
    }

    /// Whether the raw path uses this dialect's external addressing syntax.
    fn is_external_reference(&self, _raw: &str) -> bool {
        false
    }

    /// Split an external reference into its path and repository halves.
    fn parse_external_reference(&self, _raw: &str) -> Option<ExternalRef> {
        None
    }
}

/// Default path resolution shared by all dialects.
///
/// Strips quote characters and surrounding whitespace, then applies the
/// two-mode addressing rule: a leading `/` makes the path root-relative
/// (joined onto the workspace root), anything else resolves against the
/// directory containing `current_file`. Purely lexical — no filesystem
/// access, so unresolvable `..` chains still produce a candidate path.
pub fn resolve_path(raw: &str, current_file: &Path, root: &Path) -> PathBuf {
    let unquoted = raw.replace(['\'', '"'], "");
    let clean = unquoted.trim();

    if let Some(root_relative) = clean.strip_prefix('/') {
        return normalize_path(&root.join(root_relative));
    }

    let current_dir = current_file.parent().unwrap_or_else(|| Path::new(""));
    normalize_path(&current_dir.join(clean))
}

/// Split `path@repo` at the first `@`. Returns `None` when no `@` is
/// present — such a path is never external.
pub fn split_external(raw: &str) -> Option<ExternalRef> {
    let (path, repo) = raw.split_once('@')?;
    Some(ExternalRef {
        path: path.to_string(),
        repo: repo.to_string(),
    })
}

/// Collapse `.` and `..` components in a path without touching the
/// filesystem. `..` never climbs above the root of an absolute path;
/// leading `..` on a relative path is preserved.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        push_normalized_component(&mut components, component);
    }
    components.iter().collect()
}

/// Handle a single path component during normalization.
fn push_normalized_component<'a>(components: &mut Vec<Component<'a>>, component: Component<'a>) {
    match component {
        Component::CurDir => {},
        Component::ParentDir => match components.last() {
            Some(Component::Normal(_)) => {
                components.pop();
            },
            Some(Component::RootDir | Component::Prefix(_)) => {},
            _ => components.push(component),
        },
        other => components.push(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_slash_resolves_against_workspace_root() {
        assert_eq!(
            resolve_path("/cicd/common/setup.yml", Path::new("/repo/a/b/file.yml"), Path::new("/repo")),
            PathBuf::from("/repo/cicd/common/setup.yml")
        );
    }

    #[test]
    fn parent_segments_resolve_against_containing_directory() {
        assert_eq!(
            resolve_path("../common/setup.yml", Path::new("/repo/a/b/file.yml"), Path::new("/repo")),
            PathBuf::from("/repo/a/common/setup.yml")
        );
    }

    #[test]
    fn current_dir_segment_resolves_in_place() {
        assert_eq!(
            resolve_path("./variables.yaml", Path::new("/repo/a/b/file.yml"), Path::new("/repo")),
            PathBuf::from("/repo/a/b/variables.yaml")
        );
    }

    #[test]
    fn quotes_and_whitespace_are_stripped_before_resolution() {
        assert_eq!(
            resolve_path(" \"templates/build.yml\" ", Path::new("/repo/ci.yml"), Path::new("/repo")),
            PathBuf::from("/repo/templates/build.yml")
        );
        assert_eq!(
            resolve_path("'/x/y.yml'", Path::new("/repo/a/ci.yml"), Path::new("/repo")),
            PathBuf::from("/repo/x/y.yml")
        );
    }

    #[test]
    fn normalization_never_climbs_above_an_absolute_root() {
        assert_eq!(
            normalize_path(Path::new("/repo/../../etc/x.yml")),
            PathBuf::from("/etc/x.yml")
        );
    }

    #[test]
    fn relative_normalization_preserves_leading_parent_dirs() {
        assert_eq!(
            normalize_path(Path::new("../../a/./b.yml")),
            PathBuf::from("../../a/b.yml")
        );
    }

    #[test]
    fn split_external_at_first_at_sign() {
        assert_eq!(
            split_external("templates/build.yml@my-repo"),
            Some(ExternalRef {
                path: "templates/build.yml".to_string(),
                repo: "my-repo".to_string(),
            })
        );
        assert_eq!(
            split_external("a.yml@repo@tag").map(|e| e.repo),
            Some("repo@tag".to_string())
        );
        assert_eq!(split_external("templates/build.yml"), None);
    }
}
