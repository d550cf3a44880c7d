//! Host-facing plugin layer: component traits, pin definitions, data access,
//! the plugin manager and two-phase task support.

pub mod access;
pub mod definition;
pub mod manager;
pub mod repository;
pub mod task;
pub mod traits;

pub use access::{DataAccess, SolvePhase};
pub use definition::{ComponentDefinition, PinAccess, PinDataType, PinDefinition, PinDirection};
pub use manager::PluginManager;
pub use task::{TaskAdapter, TaskOutcome};
pub use traits::{ComponentPlugin, ComponentPluginCreateFn, Plugin};
