//! Built-in plugin implementations.

pub mod components;

pub use components::BranchingTreeComponent;
