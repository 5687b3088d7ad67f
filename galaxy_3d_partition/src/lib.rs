/*!
# Galaxy 3D Partition

World-space partitioning for the Galaxy 3D engine: a lazily split octree,
a budgeted re-indexing manager and camera frustum culling.

## Architecture

- **Bound / Ray**: axis-aligned boxes and rays (`glam` vectors)
- **Octree**: loose single-node placement, lazy splits, ray/volume/frustum queries
- **PartitionManager**: owns the octree, de-duplicated dirty queue, per-frame budget
- **Frustum**: six inward planes from a camera or view-projection matrix,
  scalar test plus an 8-wide batch test (AVX when available)

Objects are never owned by this crate. They are addressed by key and read
through the `SpatialSource` trait; `ObjectRegistry` is a slot-map backed
implementation.
*/

// Internal modules
mod error;
pub mod log;
pub mod camera;
pub mod math;
pub mod spatial;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging sub-module (types and configuration, macros live at the crate root)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, set_min_severity, min_severity,
        };
    }

    // Math sub-module
    pub mod math {
        pub use crate::math::*;
    }

    // Camera and culling sub-module
    pub mod camera {
        pub use crate::camera::*;
    }

    // Spatial partition sub-module
    pub mod spatial {
        pub use crate::spatial::*;
    }
}

// Re-export math library at crate root
pub use glam;
