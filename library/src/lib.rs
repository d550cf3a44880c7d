pub mod builtin;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod model;
pub mod plugin;
pub mod util;

use std::sync::Arc;

use log::warn;

pub use cli::run;
pub use config::ForestConfig;
pub use error::LibraryError;
pub use evaluation::{
    Collected, ComputationState, EvaluationDriver, ForestBuilder, PendingComputation, PinValue,
    SolveEngine, build_forest, generate_children,
};
pub use model::{BranchParameters, Forest, Line, Point3, Vector3};
pub use plugin::{ComponentPlugin, DataAccess, PluginManager, SolvePhase};

/// Plugin manager with the built-in components registered and, if
/// configured, every component plugin found in `config.plugin_dir`.
pub fn create_plugin_manager(config: &ForestConfig) -> PluginManager {
    let manager = PluginManager::new();
    manager.register_component(Arc::new(builtin::BranchingTreeComponent::new(
        config.builder(),
    )));

    if let Some(dir) = &config.plugin_dir {
        if let Err(e) = manager.load_plugins_from_directory(dir) {
            warn!("Failed to scan plugin directory {}: {}", dir.display(), e);
        }
    }
    manager
}
