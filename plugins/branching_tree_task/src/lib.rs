use std::sync::Arc;

use branching_tree::builtin::components::{
    branching_tree_inputs, branching_tree_outputs, read_branch_parameters, write_forest,
};
use branching_tree::config::{load_config, ForestConfig};
use branching_tree::plugin::{
    ComponentDefinition, ComponentPlugin, DataAccess, Plugin, SolvePhase, TaskAdapter, TaskOutcome,
};
use branching_tree::{EvaluationDriver, LibraryError};
use log::debug;

/// Branching tree that queues its forests on worker threads during the
/// pre-solve pass and collects them during the solve pass.
pub struct BranchingTreeTaskComponent {
    tasks: TaskAdapter,
}

impl BranchingTreeTaskComponent {
    pub const ID: &'static str = "branching_tree.task";

    pub fn new(driver: Arc<EvaluationDriver>) -> Self {
        Self {
            tasks: TaskAdapter::new(driver),
        }
    }

    pub fn from_config(config: &ForestConfig) -> Self {
        Self::new(Arc::new(EvaluationDriver::new(config.driver_config())))
    }

    pub fn queued(&self) -> usize {
        self.tasks.queued()
    }
}

impl Plugin for BranchingTreeTaskComponent {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> String {
        "Branching Tree (Task)".to_string()
    }

    fn category(&self) -> String {
        "Component".to_string()
    }

    fn version(&self) -> (u32, u32, u32) {
        (0, 1, 0)
    }
}

impl ComponentPlugin for BranchingTreeTaskComponent {
    fn definition(&self) -> ComponentDefinition {
        ComponentDefinition::new(Self::ID, "BranchingTreeBasic_Task", "BTB_t")
            .with_placement("User", "Test")
            .with_description("Multi-threaded branching tree")
            .with_inputs(branching_tree_inputs())
            .with_outputs(branching_tree_outputs())
    }

    fn solve_instance(&self, access: &mut DataAccess, phase: SolvePhase) -> Result<(), LibraryError> {
        // Read inputs in both phases so a skipped item never queues work and
        // never consumes another item's result.
        let params = match read_branch_parameters(access) {
            Ok(params) => params,
            Err(err) if err.is_missing_input() => {
                debug!("Item {}: {}; no output", access.iteration(), err);
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        if phase == SolvePhase::PreSolve {
            return self.tasks.queue(params);
        }

        let forest = match self.tasks.collect() {
            Some(TaskOutcome::Ready(forest)) => forest,
            Some(TaskOutcome::Cancelled) => {
                debug!("Item {}: computation cancelled", access.iteration());
                return Ok(());
            }
            Some(TaskOutcome::NotQueued) | None => {
                self.tasks.driver().solve_synchronously(&params)
            }
        };
        write_forest(access, &forest);
        Ok(())
    }

    fn is_task_capable(&self) -> bool {
        true
    }

    fn begin_cycle(&self) {
        let stale = self.tasks.reset();
        if stale > 0 {
            debug!("Discarded {} computation(s) from an abandoned cycle", stale);
        }
    }

    fn request_cancel(&self) {
        let cancelled = self.tasks.cancel();
        debug!("Cancelled {} queued forest(s)", cancelled);
    }
}

#[allow(improper_ctypes_definitions)]
#[no_mangle]
pub extern "C" fn create_component_plugin() -> *mut dyn ComponentPlugin {
    let plugin: Box<dyn ComponentPlugin> =
        Box::new(BranchingTreeTaskComponent::from_config(&load_config()));
    Box::into_raw(plugin)
}
