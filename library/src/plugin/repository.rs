//! Generic plugin repository and registry.

use std::collections::HashMap;
use std::sync::Arc;

use libloading::Library;

use crate::plugin::traits::{ComponentPlugin, Plugin};

/// Generic container for plugins of a specific type.
pub struct PluginRepository<T: ?Sized> {
    pub plugins: HashMap<String, Arc<T>>,
}

impl<T: ?Sized + Plugin> PluginRepository<T> {
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
        }
    }

    /// Returns the plugin previously registered under the same id, if any.
    pub fn register(&mut self, plugin: Arc<T>) -> Option<Arc<T>> {
        self.plugins.insert(plugin.id().to_string(), plugin)
    }

    pub fn get(&self, id: &str) -> Option<&Arc<T>> {
        self.plugins.get(id)
    }

    pub fn values(&self) -> impl Iterator<Item = &Arc<T>> {
        self.plugins.values()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl<T: ?Sized + Plugin> Default for PluginRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Internal registry holding all plugin repositories.
///
/// Field order matters: plugins are dropped before the libraries that
/// contain their code.
pub(crate) struct PluginRegistry {
    pub component_plugins: PluginRepository<dyn ComponentPlugin>,
    pub dynamic_libraries: Vec<Library>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            component_plugins: PluginRepository::new(),
            dynamic_libraries: Vec::new(),
        }
    }
}
