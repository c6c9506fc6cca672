//! Plugin registry

use std::sync::Arc;

use crate::plugin::traits::{Plugin, PluginInfo};
use crate::plugins;

/// Ordered catalogue of compiled-in plugins.
///
/// Registration order is load order.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginRegistry {
    /// Create an empty plugin registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the plugins that ship with the server.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(plugins::HealthPlugin));
        registry.register(Arc::new(plugins::CatalogPlugin));
        registry
    }

    /// Register a plugin
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        let info = plugin.info();
        tracing::debug!("Registering plugin: {} v{}", info.name, info.version);
        self.plugins.push(plugin);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, plugin: impl Plugin + 'static) -> Self {
        self.register(Arc::new(plugin));
        self
    }

    /// Iterate plugins in load order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Plugin>> {
        self.plugins.iter()
    }

    /// List all registered plugins
    pub fn list(&self) -> Vec<PluginInfo> {
        self.plugins.iter().map(|p| p.info()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
