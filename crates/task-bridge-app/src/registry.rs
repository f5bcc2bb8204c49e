use std::sync::Arc;

use task_bridge_core::{ProviderCapabilities, ProviderError, ProviderInfo, ProviderKind, ProviderResult, TaskProvider};

/// Set of adapters available to the command layer.
///
/// Built once at startup and shared behind an `Arc`; lookups never mutate it.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn TaskProvider>>,
}

impl ProviderRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an adapter. An adapter of the same kind is replaced in place.
    pub fn register(&mut self, provider: Arc<dyn TaskProvider>) {
        let kind = provider.kind();
        match self.providers.iter_mut().find(|existing| existing.kind() == kind) {
            Some(slot) => *slot = provider,
            None => self.providers.push(provider),
        }
    }

    /// Adapter registered for `kind`.
    ///
    /// # Errors
    /// [`ProviderError::NotFound`] when nothing is registered for `kind`.
    pub fn get(&self, kind: ProviderKind) -> ProviderResult<Arc<dyn TaskProvider>> {
        self.providers
            .iter()
            .find(|provider| provider.kind() == kind)
            .cloned()
            .ok_or(ProviderError::NotFound(kind))
    }

    /// All adapters in registration order.
    pub fn all(&self) -> &[Arc<dyn TaskProvider>] {
        &self.providers
    }

    pub fn infos(&self) -> Vec<ProviderInfo> {
        self.providers.iter().map(|provider| provider.info()).collect()
    }

    pub fn contains(&self, kind: ProviderKind) -> bool {
        self.providers.iter().any(|provider| provider.kind() == kind)
    }

    /// Capability flags of the adapter registered for `kind`.
    ///
    /// # Errors
    /// [`ProviderError::NotFound`] when nothing is registered for `kind`.
    pub fn capabilities(&self, kind: ProviderKind) -> ProviderResult<ProviderCapabilities> {
        self.get(kind).map(|provider| provider.capabilities())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
