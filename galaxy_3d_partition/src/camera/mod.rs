//! Camera module: camera basis, view frustum and batched culling.
//!
//! Cameras are plain data owned by the caller. A [`Frustum`] is derived
//! from a camera (or a view-projection matrix) and handed to the spatial
//! queries.

mod camera;
mod frustum;
mod frustum_batch;

pub use camera::{Camera, Handedness};
pub use frustum::{
    Frustum, FrustumTest, Plane,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
pub use frustum_batch::{BoundBatch8, BATCH_WIDTH};
