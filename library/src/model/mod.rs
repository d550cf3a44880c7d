pub mod forest;
pub mod geometry;
pub mod parameters;

pub use forest::Forest;
pub use geometry::{Line, Point3, Transform, Vector3};
pub use parameters::{AngleUnit, BranchParameters, ForestKey};
