//! Registry of discovery sources keyed by [`SourceKind`].

use std::sync::Arc;

use dashmap::DashMap;
use sightline_protocols::{DiscoverySource, SourceKind};
use tracing::debug;

/// Thread-safe map of the sources available on this host.
///
/// Registering a second source of the same kind replaces the first.
pub struct SourceRegistry {
    sources: DashMap<SourceKind, Arc<dyn DiscoverySource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: DashMap::new(),
        }
    }

    /// Register a source, returning the one it replaced.
    pub fn register(&self, source: Arc<dyn DiscoverySource>) -> Option<Arc<dyn DiscoverySource>> {
        let kind = source.kind();
        debug!(%kind, "Registering discovery source");
        self.sources.insert(kind, source)
    }

    pub fn unregister(&self, kind: SourceKind) -> Option<Arc<dyn DiscoverySource>> {
        self.sources.remove(&kind).map(|(_, source)| source)
    }

    pub fn get(&self, kind: SourceKind) -> Option<Arc<dyn DiscoverySource>> {
        self.sources.get(&kind).map(|s| s.value().clone())
    }

    pub fn contains(&self, kind: SourceKind) -> bool {
        self.sources.contains_key(&kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<SourceKind> {
        let mut kinds: Vec<_> = self.sources.iter().map(|e| *e.key()).collect();
        kinds.sort();
        kinds
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
