//! Generic fallback dialect: a raw-text regex scan for `.yml`/`.yaml`
//! tokens, used when no dialect-specific provider outscores it.

use std::path::Path;

use regex::Regex;

use crate::parser::{range_from_offsets, ParsedDocument};
use crate::providers::Provider;
use crate::types::{Detection, FileReference, ReferenceType};

/// Registry id of the generic fallback provider.
pub const GENERIC_PROVIDER_ID: &str = "generic";

/// The designated fallback provider. Its constant low confidence exists
/// only so it gets selected when nothing scores higher.
pub struct GenericYamlProvider {
    pattern: Regex,
}

impl GenericYamlProvider {
    /// Construct the provider.
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded path regex is invalid (compile-time
    /// invariant).
    pub fn new() -> Self {
        GenericYamlProvider {
            pattern: Regex::new(r#"['"]?([^\s'"]+\.ya?ml)['"]?"#).expect("valid regex"),
        }
    }
}

impl Default for GenericYamlProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for GenericYamlProvider {
    fn id(&self) -> &'static str {
        GENERIC_PROVIDER_ID
    }

    fn display_name(&self) -> &'static str {
        "Generic YAML"
    }

    fn detect(&self, _text: &str, _path: &Path) -> Detection {
        Detection {
            provider: GENERIC_PROVIDER_ID.to_string(),
            confidence: 0.1,
            reason: "fallback generic YAML provider".to_string(),
        }
    }

    /// Scan the raw text rather than the tree: the regex fallback applies
    /// even to documents no dialect understands. Ranges come from the
    /// capture group's own offsets, which exclude any surrounding quotes.
    fn extract_references(&self, document: &ParsedDocument, root: &Path) -> Vec<FileReference> {
        let mut references = Vec::new();

        for captures in self.pattern.captures_iter(&document.text) {
            let Some(matched) = captures.get(1) else {
                continue;
            };
            let raw = matched.as_str();

            references.push(FileReference {
                path: raw.to_string(),
                resolved_path: self.resolve_path(raw, &document.path, root),
                range: range_from_offsets(matched.start(), matched.end(), &document.text),
                kind: ReferenceType::Unknown,
                is_external: false,
                external_repo: None,
            });
        }

        references
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::types::Position;

    fn parse(text: &str) -> ParsedDocument {
        crate::parser::parse(text, Path::new("/repo/conf/app.yml")).unwrap()
    }

    #[test]
    fn constant_fallback_confidence() {
        let provider = GenericYamlProvider::new();
        let detection = provider.detect("trigger:\nstages:\njobs:\n", Path::new("/repo/x.yml"));
        assert_eq!(detection.confidence, 0.1);
    }

    #[test]
    fn extracts_unquoted_and_quoted_yaml_tokens() {
        let provider = GenericYamlProvider::new();
        let document = parse("base: settings/app.yaml\nextra: 'quoted/path.yml'\n");
        let references = provider.extract_references(&document, Path::new("/repo"));

        assert_eq!(references.len(), 2);
        assert_eq!(references[0].path, "settings/app.yaml");
        assert_eq!(references[0].kind, ReferenceType::Unknown);
        assert!(!references[0].is_external);
        assert_eq!(
            references[0].resolved_path,
            PathBuf::from("/repo/conf/settings/app.yaml")
        );

        // Quoted token: the capture group excludes the quotes, so the
        // range starts one past the opening quote.
        assert_eq!(references[1].path, "quoted/path.yml");
        assert_eq!(references[1].range.start, Position::new(1, 8));
        assert_eq!(references[1].range.end, Position::new(1, 23));
    }

    #[test]
    fn ignores_text_without_yaml_extensions() {
        let provider = GenericYamlProvider::new();
        let document = parse("name: build\nscript: make all\n");
        assert!(provider.extract_references(&document, Path::new("/repo")).is_empty());
    }
}
