//! Core plugin traits.

use crate::error::LibraryError;
use crate::plugin::access::{DataAccess, SolvePhase};
use crate::plugin::definition::ComponentDefinition;

/// Base trait for all plugins.
pub trait Plugin: Send + Sync {
    fn id(&self) -> &'static str;
    fn name(&self) -> String;
    fn category(&self) -> String;
    fn version(&self) -> (u32, u32, u32);
}

/// A solvable component placed on the host canvas.
///
/// The host calls `solve_instance` once per item. Task-capable components
/// are called twice per item: first with `SolvePhase::PreSolve` to queue
/// work, then with `SolvePhase::Solve` to collect it.
pub trait ComponentPlugin: Plugin {
    fn definition(&self) -> ComponentDefinition;

    fn solve_instance(&self, access: &mut DataAccess, phase: SolvePhase)
    -> Result<(), LibraryError>;

    fn is_task_capable(&self) -> bool {
        false
    }

    /// Called once at the start of every evaluation cycle, before any
    /// `solve_instance`. Work left over from an abandoned cycle is dropped here.
    fn begin_cycle(&self) {}

    /// The host abandoned the current solution; drop queued work.
    fn request_cancel(&self) {}
}

// Create function type for dynamic loading
#[allow(improper_ctypes_definitions)]
pub type ComponentPluginCreateFn = unsafe extern "C" fn() -> *mut dyn ComponentPlugin;
