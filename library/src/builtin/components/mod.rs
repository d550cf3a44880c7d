//! Built-in components and the pin layout shared by every branching tree
//! variant.

pub mod branching_tree;

pub use branching_tree::BranchingTreeComponent;

use crate::error::LibraryError;
use crate::model::forest::Forest;
use crate::model::parameters::BranchParameters;
use crate::plugin::access::DataAccess;
use crate::plugin::definition::{PinDataType, PinDefinition};

pub const INPUT_LENGTH: usize = 0;
pub const INPUT_ANGLE: usize = 1;
pub const INPUT_SCALE: usize = 2;
pub const INPUT_COUNT: usize = 3;

pub const OUTPUT_COUNT: usize = 0;
pub const OUTPUT_BRANCHES: usize = 1;

pub fn branching_tree_inputs() -> Vec<PinDefinition> {
    use PinDataType::*;

    vec![
        PinDefinition::input("Length", "L", Scalar).with_description("The length of trunk"),
        PinDefinition::input("Branch Angle", "BA", Scalar)
            .with_description("The angle of branches (π/100 rad per unit by default)"),
        PinDefinition::input("Branch Scale", "BS", Scalar).with_description("The scale of branches"),
        PinDefinition::input("Branch Number", "N", Integer)
            .with_description("The number of branching iterations"),
    ]
}

pub fn branching_tree_outputs() -> Vec<PinDefinition> {
    vec![
        PinDefinition::output("Check", "C", PinDataType::Integer)
            .with_description("Number of generated lines"),
        PinDefinition::output("Branches", "B", PinDataType::Line)
            .with_description("Generated branch lines")
            .as_list(),
    ]
}

/// All four inputs, or `LibraryError::MissingInput` naming the first absent one.
pub fn read_branch_parameters(access: &DataAccess) -> Result<BranchParameters, LibraryError> {
    Ok(BranchParameters::new(
        access.get_scalar(INPUT_LENGTH)?,
        access.get_scalar(INPUT_ANGLE)?,
        access.get_scalar(INPUT_SCALE)?,
        access.get_integer(INPUT_COUNT)?,
    ))
}

pub fn write_forest(access: &mut DataAccess, forest: &Forest) {
    access.set_data(OUTPUT_COUNT, forest.count() as i64);
    access.set_data_list(OUTPUT_BRANCHES, forest.segments().to_vec());
}
