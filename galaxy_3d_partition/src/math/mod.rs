//! Math module: bounding volumes and rays.
//!
//! Pure value types shared by the octree, the partition manager and
//! the frustum. Vector math comes from `glam`.

mod bound;
mod ray;

pub use bound::Bound;
pub use ray::Ray;
