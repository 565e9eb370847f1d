pub mod types;
pub mod validation;

pub use types::{BoundingBox, Mesh, Triangle, Vector3};
pub use validation::{ValidationReport, validate_mesh};
