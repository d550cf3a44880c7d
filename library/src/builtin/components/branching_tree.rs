use log::debug;

use super::{branching_tree_inputs, branching_tree_outputs, read_branch_parameters, write_forest};
use crate::error::LibraryError;
use crate::evaluation::builder::ForestBuilder;
use crate::plugin::{ComponentDefinition, ComponentPlugin, DataAccess, Plugin, SolvePhase};

/// Computes the forest inline during the solve pass.
#[derive(Default)]
pub struct BranchingTreeComponent {
    builder: ForestBuilder,
}

impl BranchingTreeComponent {
    pub const ID: &'static str = "branching_tree.basic";

    pub fn new(builder: ForestBuilder) -> Self {
        Self { builder }
    }
}

impl Plugin for BranchingTreeComponent {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> String {
        "Branching Tree".to_string()
    }

    fn category(&self) -> String {
        "Component".to_string()
    }

    fn version(&self) -> (u32, u32, u32) {
        (0, 3, 0)
    }
}

impl ComponentPlugin for BranchingTreeComponent {
    fn definition(&self) -> ComponentDefinition {
        ComponentDefinition::new(Self::ID, "BranchingTreeBasic", "BranchingTreeBasic")
            .with_placement("User", "Test")
            .with_description("Symmetric binary branching tree grown from a trunk line")
            .with_inputs(branching_tree_inputs())
            .with_outputs(branching_tree_outputs())
    }

    fn solve_instance(&self, access: &mut DataAccess, phase: SolvePhase) -> Result<(), LibraryError> {
        if phase == SolvePhase::PreSolve {
            return Ok(());
        }

        let params = match read_branch_parameters(access) {
            Ok(params) => params,
            Err(err) if err.is_missing_input() => {
                debug!("Item {}: {}; no output", access.iteration(), err);
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let forest = self.builder.build(&params);
        write_forest(access, &forest);
        Ok(())
    }
}
