//! Azure Pipelines dialect: `template:` step references and `extends:`
//! templates, including cross-repository `path@repo` addressing.

use std::path::{Path, PathBuf};

use crate::parser::{range_from_offsets, ParsedDocument, ScalarNode, YamlNode};
use crate::providers::{split_external, Provider};
use crate::types::{Detection, ExternalRef, FileReference, ReferenceType};

/// Registry id of the Azure Pipelines provider.
pub const AZURE_PROVIDER_ID: &str = "azure-pipelines";

/// Top-level keys that mark a document as an Azure pipeline. Counted at
/// column zero only; an indented `steps:` inside some other document is not
/// a signal.
const CONTENT_MARKERS: [&str; 9] = [
    "trigger",
    "pool",
    "stages",
    "jobs",
    "steps",
    "variables",
    "parameters",
    "resources",
    "extends",
];

/// Provider for Azure-Pipelines-style YAML.
pub struct AzurePipelinesProvider;

impl AzurePipelinesProvider {
    /// Construct the provider.
    pub fn new() -> Self {
        AzurePipelinesProvider
    }

    fn walk(
        &self,
        node: &YamlNode,
        document: &ParsedDocument,
        root: &Path,
        references: &mut Vec<FileReference>,
    ) {
        match node {
            YamlNode::Mapping(mapping) => {
                for pair in &mapping.pairs {
                    let key = match &pair.key {
                        Some(YamlNode::Scalar(key)) => Some(key.value.as_str()),
                        // Non-scalar keys are structurally odd; skip the
                        // pair's keyword semantics but still walk its value.
                        _ => None,
                    };

                    match (key, &pair.value) {
                        (Some("template"), Some(YamlNode::Scalar(value))) => {
                            references.push(self.create_reference(
                                value,
                                document,
                                ReferenceType::Template,
                                root,
                            ));
                        },
                        (Some("extends"), Some(extends @ YamlNode::Mapping(_))) => {
                            self.collect_extends(extends, document, root, references);
                        },
                        (_, Some(value)) => self.walk(value, document, root, references),
                        (_, None) => {},
                    }
                }
            },
            YamlNode::Sequence(sequence) => {
                for item in &sequence.items {
                    self.walk(item, document, root, references);
                }
            },
            YamlNode::Scalar(_) => {},
        }
    }

    /// Walk an `extends:` subtree. Every `template` key found anywhere in
    /// it emits exactly one `Extends` reference — never an additional
    /// `Template` for the same scalar.
    fn collect_extends(
        &self,
        node: &YamlNode,
        document: &ParsedDocument,
        root: &Path,
        references: &mut Vec<FileReference>,
    ) {
        match node {
            YamlNode::Mapping(mapping) => {
                for pair in &mapping.pairs {
                    let key = match &pair.key {
                        Some(YamlNode::Scalar(key)) => Some(key.value.as_str()),
                        _ => None,
                    };

                    match (key, &pair.value) {
                        (Some("template"), Some(YamlNode::Scalar(value))) => {
                            references.push(self.create_reference(
                                value,
                                document,
                                ReferenceType::Extends,
                                root,
                            ));
                        },
                        (_, Some(value)) => self.collect_extends(value, document, root, references),
                        (_, None) => {},
                    }
                }
            },
            YamlNode::Sequence(sequence) => {
                for item in &sequence.items {
                    self.collect_extends(item, document, root, references);
                }
            },
            YamlNode::Scalar(_) => {},
        }
    }

    fn create_reference(
        &self,
        scalar: &ScalarNode,
        document: &ParsedDocument,
        kind: ReferenceType,
        root: &Path,
    ) -> FileReference {
        let raw = scalar.value.clone();
        let external = self.parse_external_reference(&raw);

        // External targets live in a repository that is not checked out
        // locally; their resolved path stays empty.
        let resolved_path = if external.is_some() {
            PathBuf::new()
        } else {
            self.resolve_path(&raw, &document.path, root)
        };

        FileReference {
            path: raw,
            resolved_path,
            range: range_from_offsets(scalar.span.start, scalar.span.end, &document.text),
            kind,
            is_external: external.is_some(),
            external_repo: external.map(|external| external.repo),
        }
    }
}

impl Default for AzurePipelinesProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for AzurePipelinesProvider {
    fn id(&self) -> &'static str {
        AZURE_PROVIDER_ID
    }

    fn display_name(&self) -> &'static str {
        "Azure Pipelines"
    }

    fn detect(&self, text: &str, path: &Path) -> Detection {
        let file_name = path.to_string_lossy().to_lowercase();
        if file_name.contains("azure-pipelines") {
            return Detection {
                provider: AZURE_PROVIDER_ID.to_string(),
                confidence: 0.95,
                reason: "file name matches Azure Pipelines convention".to_string(),
            };
        }

        let marker_count = CONTENT_MARKERS
            .iter()
            .filter(|marker| has_top_level_key(text, marker))
            .count();

        let (confidence, reason) = if marker_count >= 3 {
            (0.85, format!("found {marker_count} Azure Pipelines markers"))
        } else if marker_count >= 1 {
            (0.5, format!("found {marker_count} Azure Pipelines marker(s)"))
        } else {
            (0.0, "no Azure Pipelines markers found".to_string())
        };

        Detection {
            provider: AZURE_PROVIDER_ID.to_string(),
            confidence,
            reason,
        }
    }

    fn extract_references(&self, document: &ParsedDocument, root: &Path) -> Vec<FileReference> {
        let mut references = Vec::new();
        if let Some(node) = &document.root {
            self.walk(node, document, root, &mut references);
        }
        references
    }

    fn is_external_reference(&self, raw: &str) -> bool {
        raw.contains('@')
    }

    fn parse_external_reference(&self, raw: &str) -> Option<ExternalRef> {
        split_external(raw)
    }
}

/// Whether any line of `text` starts (at column zero) with `key:`.
fn has_top_level_key(text: &str, key: &str) -> bool {
    text.lines()
        .any(|line| line.strip_prefix(key).is_some_and(|rest| rest.starts_with(':')))
}
