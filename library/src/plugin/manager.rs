//! Plugin manager for registering, loading, and accessing components.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use libloading::{Library, Symbol};
use log::{debug, info, warn};

use crate::error::LibraryError;
use crate::plugin::definition::ComponentDefinition;
use crate::plugin::repository::PluginRegistry;
use crate::plugin::traits::ComponentPlugin;

/// Symbol every dynamically loaded component library must export.
pub const COMPONENT_PLUGIN_SYMBOL: &[u8] = b"create_component_plugin";

/// Main plugin manager.
pub struct PluginManager {
    inner: RwLock<PluginRegistry>,
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginManager {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(PluginRegistry::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, PluginRegistry> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PluginRegistry> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register_component(&self, plugin: Arc<dyn ComponentPlugin>) {
        let id = plugin.id();
        if self.write().component_plugins.register(plugin).is_some() {
            warn!("Component '{}' registered twice; keeping the latest", id);
        } else {
            debug!("PluginManager: registered component '{}'", id);
        }
    }

    pub fn get_component(&self, id: &str) -> Option<Arc<dyn ComponentPlugin>> {
        self.read().component_plugins.get(id).cloned()
    }

    /// Sorted ids of every registered component.
    pub fn component_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.read().component_plugins.plugins.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn definitions(&self) -> Vec<ComponentDefinition> {
        let mut defs: Vec<ComponentDefinition> = self
            .read()
            .component_plugins
            .values()
            .map(|plugin| plugin.definition())
            .collect();
        defs.sort_by(|a, b| a.id.cmp(&b.id));
        defs
    }

    /// Cancel queued work on every task-capable component.
    pub fn request_cancel_all(&self) {
        for plugin in self.read().component_plugins.values() {
            if plugin.is_task_capable() {
                plugin.request_cancel();
            }
        }
    }

    unsafe fn load_plugin_generic<T: ?Sized + 'static>(
        &self,
        path: &Path,
        symbol: &[u8],
        register: impl FnOnce(&mut PluginRegistry, Arc<T>),
    ) -> Result<(), LibraryError> {
        let library = unsafe { Library::new(path)? };
        let constructor: Symbol<unsafe extern "C" fn() -> *mut T> = unsafe { library.get(symbol)? };
        let raw = unsafe { constructor() };
        if raw.is_null() {
            return Err(LibraryError::Plugin(format!(
                "Plugin constructor {} returned null",
                String::from_utf8_lossy(symbol)
            )));
        }
        let plugin = unsafe { Arc::from(Box::from_raw(raw)) };

        let mut inner = self.write();
        register(&mut *inner, plugin);
        inner.dynamic_libraries.push(library);
        Ok(())
    }

    pub fn load_component_plugin_from_file<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<(), LibraryError> {
        unsafe {
            self.load_plugin_generic::<dyn ComponentPlugin>(
                path.as_ref(),
                COMPONENT_PLUGIN_SYMBOL,
                |inner, plugin| {
                    info!("Loaded component '{}' ({})", plugin.id(), plugin.name());
                    inner.component_plugins.register(plugin);
                },
            )
        }
    }

    /// Load every shared library in `dir_path` that exports a component.
    /// Returns how many were loaded; a missing directory loads nothing.
    pub fn load_plugins_from_directory<P: AsRef<Path>>(
        &self,
        dir_path: P,
    ) -> Result<usize, LibraryError> {
        let dir = dir_path.as_ref();
        if !dir.is_dir() {
            warn!("Plugin directory not found: {}", dir.display());
            return Ok(0);
        }

        let mut loaded = 0;
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let extension = path.extension().and_then(|s| s.to_str());
            if !matches!(extension, Some("dll") | Some("so") | Some("dylib")) {
                continue;
            }
            info!("Attempting to load plugin from: {}", path.display());
            match self.load_component_plugin_from_file(&path) {
                Ok(()) => loaded += 1,
                Err(e) => warn!("Not a component plugin: {} ({})", path.display(), e),
            }
        }
        Ok(loaded)
    }
}
