//! Spatial module: octree, dirty queue and the partition manager.
//!
//! The partition manager owns one octree per world and keeps it in sync
//! with objects read through a `SpatialSource`. `ObjectRegistry` is a
//! ready-made source backed by a slot map.

mod debug_draw;
mod dirty_queue;
mod object_registry;
mod octree;
mod partition_manager;

pub use debug_draw::{bound_edges, depth_color, DebugLineSink, LineBuffer, DEPTH_COLORS};
pub use dirty_queue::DirtyQueue;
pub use object_registry::{ObjectFlags, ObjectKey, ObjectRegistry, SpatialObject, SpatialSource};
pub use octree::{NodeId, Octree, OctreeConfig};
pub use partition_manager::{PartitionConfig, PartitionManager, UpdateStats};
