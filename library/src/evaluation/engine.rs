//! Solve engine: runs a component over the items of one evaluation cycle.

use log::{debug, error};

use crate::plugin::access::{DataAccess, SolvePhase};
use crate::plugin::traits::ComponentPlugin;
use crate::util::timing::ScopedTimer;

/// Drives `solve_instance` the way the host does.
///
/// With task mode on, a task-capable component sees every item twice: a
/// pre-solve pass over all items, then a solve pass over all items. Any
/// other component (or task mode off) gets a single solve pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolveEngine {
    task_mode: bool,
}

impl SolveEngine {
    pub fn new(task_mode: bool) -> Self {
        Self { task_mode }
    }

    pub fn task_mode(&self) -> bool {
        self.task_mode
    }

    /// Returns how many items produced output. A failing item is logged and
    /// left without output; it never stops the rest of the cycle.
    pub fn solve(&self, component: &dyn ComponentPlugin, items: &mut [DataAccess]) -> usize {
        let _timer = ScopedTimer::debug_lazy(|| {
            format!("Solve '{}' over {} item(s)", component.id(), items.len())
        });

        component.begin_cycle();

        if self.task_mode && component.is_task_capable() {
            debug!("Pre-solving '{}'", component.id());
            for access in items.iter_mut() {
                Self::run_item(component, access, SolvePhase::PreSolve);
                // Pre-solve never publishes data.
                access.clear_outputs();
            }
        }

        for access in items.iter_mut() {
            Self::run_item(component, access, SolvePhase::Solve);
        }

        items.iter().filter(|access| access.has_output()).count()
    }

    fn run_item(component: &dyn ComponentPlugin, access: &mut DataAccess, phase: SolvePhase) {
        if let Err(err) = component.solve_instance(access, phase) {
            error!(
                "Component '{}' failed on item {} ({:?}): {}",
                component.id(),
                access.iteration(),
                phase,
                err
            );
            access.clear_outputs();
        }
    }
}
