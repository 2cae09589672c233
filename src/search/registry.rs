//! Provider registry and selection policy.
//!
//! The [`ProviderRegistry`] always contains the offline demo provider and
//! any number of remote providers registered at startup. It is built once,
//! then shared read-only (typically behind an `Arc`) by every search call.

use std::sync::Arc;

use tracing::warn;

use super::provider::{PersonProvider, ProviderInfo};
use super::providers::DemoProvider;

/// Selector value that picks the best available remote provider.
pub const AUTO: &str = "auto";

/// Append-only collection of person-search providers.
///
/// Providers are kept in registration order; the demo provider is always
/// first.
///
/// # Examples
///
/// ```rust
/// use kinsearch::search::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// assert_eq!(registry.pick("auto").id(), "demo");
/// assert_eq!(registry.pick("missing").id(), "demo");
/// ```
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn PersonProvider>>,
    demo: Arc<dyn PersonProvider>,
}

impl ProviderRegistry {
    /// Create a registry containing only the default demo provider.
    pub fn new() -> Self {
        Self::with_demo(Arc::new(DemoProvider::default()))
    }

    /// Create a registry around a specific demo provider.
    pub fn with_demo(demo: Arc<dyn PersonProvider>) -> Self {
        Self {
            providers: vec![demo.clone()],
            demo,
        }
    }

    /// Register a provider.
    ///
    /// Registration is append-only: a provider whose id is already taken is
    /// ignored and the existing one kept.
    pub fn register(&mut self, provider: Arc<dyn PersonProvider>) {
        if self.contains(provider.id()) {
            warn!(provider = provider.id(), "Provider id already registered; ignoring");
            return;
        }
        self.providers.push(provider);
    }

    /// Look up a provider by id.
    pub fn get(&self, id: &str) -> Option<Arc<dyn PersonProvider>> {
        self.providers.iter().find(|p| p.id() == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.providers.iter().any(|p| p.id() == id)
    }

    /// The always-present offline provider.
    pub fn demo(&self) -> Arc<dyn PersonProvider> {
        self.demo.clone()
    }

    /// Select a provider.
    ///
    /// `"auto"` picks the first registered remote provider, falling back to
    /// the demo provider. Any other value selects the provider with that id,
    /// or the demo provider if none is registered.
    pub fn pick(&self, preferred: &str) -> Arc<dyn PersonProvider> {
        let preferred = preferred.trim();
        let picked = if preferred.eq_ignore_ascii_case(AUTO) {
            self.providers.iter().find(|p| p.is_remote()).cloned()
        } else {
            self.get(preferred)
        };
        picked.unwrap_or_else(|| self.demo())
    }

    /// Id and label of every registered provider, in registration order.
    pub fn list(&self) -> Vec<ProviderInfo> {
        self.providers.iter().map(|p| p.info()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
