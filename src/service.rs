//! Reference service: orchestrates parser + registry to answer "what
//! reference is under this cursor" and "what references does this document
//! contain," and implements the workspace reverse search.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::parser;
use crate::registry::ProviderRegistry;
use crate::types::{FileReference, Position};

/// Whether a path looks like a YAML document by extension.
pub fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yml" || ext == "yaml")
}

/// The orchestration layer over parser, registry and workspace walk.
///
/// All methods are synchronous, single-threaded CPU work; the reverse
/// search interleaves file reads but never runs extraction concurrently
/// with itself.
pub struct ReferenceService {
    config: Config,
    registry: ProviderRegistry,
    root: PathBuf,
}

impl ReferenceService {
    /// A service over `root` with the built-in provider set.
    pub fn new(root: PathBuf, config: Config) -> Self {
        Self::with_registry(root, config, ProviderRegistry::with_default_providers())
    }

    /// A service with a caller-supplied registry.
    pub fn with_registry(root: PathBuf, config: Config, registry: ProviderRegistry) -> Self {
        ReferenceService {
            config,
            registry,
            root,
        }
    }

    /// The workspace root used for root-relative resolution.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Forward an edit notification: drops the cached provider selection
    /// for the document so the next query re-runs detection.
    pub fn on_document_changed(&mut self, path: &Path) {
        self.registry.invalidate_cache(path);
    }

    /// The reference under `position` in the given document text.
    ///
    /// Provider detection or parse failure yields `None`, never an error:
    /// an unparsable document simply has no references.
    pub fn reference_at_cursor(
        &mut self,
        text: &str,
        path: &Path,
        position: Position,
    ) -> Option<FileReference> {
        let provider = self.registry.detect_provider(text, path)?;
        let document = parser::parse(text, path).ok()?;
        provider.reference_at_position(&document, position, &self.root)
    }

    /// Every reference in the given document text. Detection or parse
    /// failure yields an empty list.
    pub fn all_references(&mut self, text: &str, path: &Path) -> Vec<FileReference> {
        let Some(provider) = self.registry.detect_provider(text, path) else {
            return Vec::new();
        };
        let Ok(document) = parser::parse(text, path) else {
            return Vec::new();
        };
        provider.extract_references(&document, &self.root)
    }

    /// Find every YAML document in the workspace that references `target`,
    /// grouped by source file. `target` must be an absolute path.
    ///
    /// A reference matches when it is not external and either its resolved
    /// path equals the target or its file name equals the target's file
    /// name. The file-name fallback exists because resolution can fail for
    /// templated or ambiguous paths; it trades precision for recall and can
    /// report same-named files from other directories.
    ///
    /// Individual files that cannot be read or parsed are skipped — one bad
    /// file never aborts the scan. Results come back in path order, but
    /// callers must not rely on any particular ordering.
    pub fn find_references_to_file(&mut self, target: &Path) -> BTreeMap<PathBuf, Vec<FileReference>> {
        let root = self.root.clone();
        let target_name = target.file_name().map(OsStr::to_os_string);
        let mut results: BTreeMap<PathBuf, Vec<FileReference>> = BTreeMap::new();

        for entry in WalkDir::new(&root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file() && is_yaml_path(entry.path()))
        {
            let source_path = entry.path().to_path_buf();
            if source_path == target {
                continue;
            }

            let relative = source_path.strip_prefix(&root).unwrap_or(&source_path);
            if !self.config.should_scan(&relative.to_string_lossy()) {
                continue;
            }

            let Ok(text) = std::fs::read_to_string(&source_path) else {
                continue;
            };

            let matching: Vec<FileReference> = self
                .all_references(&text, &source_path)
                .into_iter()
                .filter(|reference| {
                    reference_matches_target(reference, target, target_name.as_deref())
                })
                .collect();

            if !matching.is_empty() {
                results.insert(source_path, matching);
            }
        }

        results
    }
}

/// The reverse-search filter: never external, then resolved-path equality
/// with the file-name fallback.
fn reference_matches_target(
    reference: &FileReference,
    target: &Path,
    target_name: Option<&OsStr>,
) -> bool {
    if reference.is_external {
        return false;
    }
    if reference.resolved_path == target {
        return true;
    }
    match (reference.resolved_path.file_name(), target_name) {
        (Some(name), Some(target_name)) => name == target_name,
        _ => false,
    }
}
