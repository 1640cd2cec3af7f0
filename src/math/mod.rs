pub mod aabb;
pub mod axis;
pub mod polygon;

pub use aabb::Aabb;
pub use axis::Axis;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Default threshold of the concavity predicate between adjacent faces.
///
/// Keeps coplanar and near-flat neighbors out of a patch.
pub const CONCAVITY_TOLERANCE: f64 = 1e-5;
