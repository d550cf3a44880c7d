//! Forest evaluation.
//!
//! `generator` produces one generation from the previous one, `builder`
//! iterates it into a whole forest, `driver` runs builds on worker threads,
//! and `engine` drives components through the host's solve passes.

pub mod builder;
pub mod driver;
pub mod engine;
pub mod generator;
pub mod output;

pub use builder::{ForestBuilder, build_forest};
pub use driver::{Collected, ComputationState, DriverConfig, EvaluationDriver, PendingComputation};
pub use engine::SolveEngine;
pub use generator::generate_children;
pub use output::PinValue;
