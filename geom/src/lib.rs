pub mod mat3;
pub mod ray;
pub mod vec3;

pub use mat3::Mat3;
pub use ray::Ray;
pub use vec3::{v3, Vec3};

/// An enum over the X, Y and Z axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}
