//! Provider registry: holds the registered dialect strategies, picks the
//! best match per document by confidence, and memoizes the choice per
//! document identity until explicitly invalidated.

use std::collections::HashMap;
use std::path::Path;

use crate::providers::{AzurePipelinesProvider, GenericYamlProvider, Provider};

/// The provider set plus the document→provider selection cache.
///
/// The provider list is populated once at startup and is otherwise
/// append/remove-only; the cache is the only mutable shared state in the
/// system and is written solely by [`detect_provider`](Self::detect_provider)
/// on a miss and [`invalidate_cache`](Self::invalidate_cache) on an edit
/// notification.
pub struct ProviderRegistry {
    /// Cached selection per document identity. `Some(None)` in the outer
    /// map means "detection ran and no provider scored above zero".
    cache: HashMap<String, Option<String>>,
    /// Registered providers in registration order. Re-registering an id
    /// replaces the provider in place, keeping its original position.
    providers: Vec<Box<dyn Provider>>,
}

impl ProviderRegistry {
    /// An empty registry with no providers.
    pub fn new() -> Self {
        ProviderRegistry {
            cache: HashMap::new(),
            providers: Vec::new(),
        }
    }

    /// A registry with the built-in providers: Azure Pipelines first, the
    /// generic fallback last.
    pub fn with_default_providers() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(AzurePipelinesProvider::new()));
        registry.register(Box::new(GenericYamlProvider::new()));
        registry
    }

    /// Register a provider. The last registration for a given id wins.
    pub fn register(&mut self, provider: Box<dyn Provider>) {
        match self.providers.iter_mut().find(|p| p.id() == provider.id()) {
            Some(existing) => *existing = provider,
            None => self.providers.push(provider),
        }
    }

    /// Remove a provider by id. Returns whether anything was removed.
    pub fn unregister(&mut self, id: &str) -> bool {
        let before = self.providers.len();
        self.providers.retain(|provider| provider.id() != id);
        self.providers.len() != before
    }

    /// Look up a provider by id.
    pub fn provider(&self, id: &str) -> Option<&dyn Provider> {
        self.providers
            .iter()
            .find(|provider| provider.id() == id)
            .map(Box::as_ref)
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no providers are registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Select the provider for a document, consulting the cache first.
    ///
    /// On a miss, every provider's `detect` runs and the strictly highest
    /// confidence wins, with first-registered winning ties. A provider must
    /// outscore zero or the result is `None` — and that `None` is cached
    /// too. The host must call [`invalidate_cache`](Self::invalidate_cache)
    /// when the document's content changes, or a content-marker-based
    /// selection can go stale.
    pub fn detect_provider(&mut self, text: &str, path: &Path) -> Option<&dyn Provider> {
        let key = path.to_string_lossy().into_owned();

        let chosen = match self.cache.get(&key).cloned() {
            Some(cached) => cached,
            None => {
                let mut best: Option<(usize, f64)> = None;
                for (index, provider) in self.providers.iter().enumerate() {
                    let detection = provider.detect(text, path);
                    if detection.confidence > best.map_or(0.0, |(_, confidence)| confidence) {
                        best = Some((index, detection.confidence));
                    }
                }
                let id = best.map(|(index, _)| self.providers[index].id().to_string());
                self.cache.insert(key, id.clone());
                id
            },
        };

        chosen.and_then(move |id| self.provider(&id))
    }

    /// Drop the cached selection for one document. Must be called whenever
    /// the document's content changes.
    pub fn invalidate_cache(&mut self, path: &Path) {
        self.cache.remove(path.to_string_lossy().as_ref());
    }

    /// Drop every cached selection.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_default_providers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{AZURE_PROVIDER_ID, GENERIC_PROVIDER_ID};
    use crate::types::Detection;

    const AZURE_TEXT: &str = "trigger:\n  - main\nstages: []\njobs: []\n";
    const PLAIN_TEXT: &str = "name: something\nvalue: 42\n";

    #[test]
    fn azure_markers_beat_the_generic_fallback() {
        let mut registry = ProviderRegistry::with_default_providers();
        let provider = registry
            .detect_provider(AZURE_TEXT, Path::new("/repo/ci.yml"))
            .expect("a provider must match");
        assert_eq!(provider.id(), AZURE_PROVIDER_ID);
    }

    #[test]
    fn plain_yaml_falls_back_to_generic() {
        let mut registry = ProviderRegistry::with_default_providers();
        let provider = registry
            .detect_provider(PLAIN_TEXT, Path::new("/repo/config.yml"))
            .expect("fallback must match");
        assert_eq!(provider.id(), GENERIC_PROVIDER_ID);
    }

    #[test]
    fn no_provider_above_zero_yields_none_and_is_cached() {
        let mut registry = ProviderRegistry::new();
        registry.register(Box::new(crate::providers::AzurePipelinesProvider::new()));

        let path = Path::new("/repo/config.yml");
        assert!(registry.detect_provider(PLAIN_TEXT, path).is_none());
        // Cached null: a second call with azure-looking text still misses
        // until invalidation.
        assert!(registry.detect_provider(AZURE_TEXT, path).is_none());
        registry.invalidate_cache(path);
        assert!(registry.detect_provider(AZURE_TEXT, path).is_some());
    }

    #[test]
    fn stale_selection_survives_until_invalidation() {
        let mut registry = ProviderRegistry::with_default_providers();
        let path = Path::new("/repo/pipeline.yml");

        let first = registry.detect_provider(AZURE_TEXT, path).unwrap().id();
        assert_eq!(first, AZURE_PROVIDER_ID);

        // Content changed, but the cache still answers.
        let stale = registry.detect_provider(PLAIN_TEXT, path).unwrap().id();
        assert_eq!(stale, AZURE_PROVIDER_ID);

        registry.invalidate_cache(path);
        let fresh = registry.detect_provider(PLAIN_TEXT, path).unwrap().id();
        assert_eq!(fresh, GENERIC_PROVIDER_ID);
    }

    struct FixedConfidence {
        id: &'static str,
        confidence: f64,
    }

    impl Provider for FixedConfidence {
        fn id(&self) -> &'static str {
            self.id
        }

        fn display_name(&self) -> &'static str {
            "fixed"
        }

        fn detect(&self, _text: &str, _path: &Path) -> Detection {
            Detection {
                provider: self.id.to_string(),
                confidence: self.confidence,
                reason: "fixed".to_string(),
            }
        }

        fn extract_references(
            &self,
            _document: &crate::parser::ParsedDocument,
            _root: &Path,
        ) -> Vec<crate::types::FileReference> {
            Vec::new()
        }
    }

    #[test]
    fn first_registered_wins_confidence_ties() {
        let mut registry = ProviderRegistry::new();
        registry.register(Box::new(FixedConfidence { id: "first", confidence: 0.6 }));
        registry.register(Box::new(FixedConfidence { id: "second", confidence: 0.6 }));

        let chosen = registry
            .detect_provider("irrelevant", Path::new("/repo/x.yml"))
            .unwrap();
        assert_eq!(chosen.id(), "first");
    }

    #[test]
    fn re_registering_an_id_replaces_in_place() {
        let mut registry = ProviderRegistry::new();
        registry.register(Box::new(FixedConfidence { id: "only", confidence: 0.2 }));
        registry.register(Box::new(FixedConfidence { id: "only", confidence: 0.9 }));
        assert_eq!(registry.len(), 1);

        let chosen = registry
            .detect_provider("irrelevant", Path::new("/repo/y.yml"))
            .unwrap();
        assert_eq!(chosen.id(), "only");

        assert!(registry.unregister("only"));
        assert!(registry.is_empty());
        assert!(!registry.unregister("only"));
    }
}
