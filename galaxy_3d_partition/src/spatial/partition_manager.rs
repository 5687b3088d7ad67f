/// PartitionManager: owns the world octree and keeps it in sync with
/// moving objects.
///
/// Transform changes are reported through `mark_dirty`, which only enqueues
/// the object. The tree is touched once per frame in `update`, which drains
/// at most `budget` pending objects and re-indexes each one with its current
/// bound. Objects beyond the budget stay queued for the next frame, so a
/// moved object may briefly be found under its previous bound.
///
/// Objects are never owned here. They are identified by key and read
/// through a `SpatialSource` passed into each call that needs bounds.

use std::fmt::Debug;
use std::hash::Hash;
use glam::Vec3;
use rustc_hash::{FxHashMap, FxHashSet};
use crate::camera::Frustum;
use crate::error::{Error, Result};
use crate::math::{Bound, Ray};
use crate::{spatial_debug, spatial_error, spatial_info, spatial_trace, spatial_warn};
use super::debug_draw::DebugLineSink;
use super::dirty_queue::DirtyQueue;
use super::object_registry::SpatialSource;
use super::octree::{Octree, OctreeConfig};

const LOG_SOURCE: &str = "galaxy3d::PartitionManager";

// ===== CONFIGURATION =====

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionConfig {
    /// Root bound of the octree
    pub world_bound: Bound,
    /// Subdivision limits
    pub octree: OctreeConfig,
    /// Budget used by `update_default`
    pub default_update_budget: usize,
}

impl PartitionConfig {
    pub const DEFAULT_WORLD_HALF_EXTENT: f32 = 1000.0;
    pub const DEFAULT_UPDATE_BUDGET: usize = 256;

    /// Check the configuration before a tree is built from it.
    ///
    /// A zero-volume world bound is accepted (every object then stays at
    /// the root); non-finite or inverted bounds are not.
    pub fn validate(&self) -> Result<()> {
        let bound = &self.world_bound;
        if !bound.min.is_finite() || !bound.max.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "world bound must be finite, got min {:?} max {:?}",
                bound.min, bound.max
            )));
        }
        if !bound.is_valid() {
            return Err(Error::InvalidConfig(format!(
                "world bound min {:?} exceeds max {:?}",
                bound.min, bound.max
            )));
        }
        if self.octree.max_objects_per_node == 0 {
            return Err(Error::InvalidConfig(
                "max_objects_per_node must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            world_bound: Bound::new(
                Vec3::splat(-Self::DEFAULT_WORLD_HALF_EXTENT),
                Vec3::splat(Self::DEFAULT_WORLD_HALF_EXTENT),
            ),
            octree: OctreeConfig::default(),
            default_update_budget: Self::DEFAULT_UPDATE_BUDGET,
        }
    }
}

// ===== UPDATE STATS =====

/// Outcome of one `update` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateStats {
    /// Objects re-indexed (or dropped because they stopped being indexable)
    pub processed: usize,
    /// Keys that no longer resolve to an object
    pub stale: usize,
    /// Objects still pending after this call
    pub remaining: usize,
}

impl UpdateStats {
    /// Queue entries consumed by the call.
    pub fn drained(&self) -> usize {
        self.processed + self.stale
    }
}

// ===== PARTITION MANAGER =====

pub struct PartitionManager<K> {
    octree: Octree<K>,
    dirty: DirtyQueue<K>,
    /// Bound each indexed object was last inserted with
    indexed: FxHashMap<K, Bound>,
    config: PartitionConfig,
}

impl<K: Copy + Eq + Hash + Debug> PartitionManager<K> {
    /// Create a manager with an empty tree spanning `config.world_bound`.
    pub fn new(config: PartitionConfig) -> Result<Self> {
        if let Err(err) = config.validate() {
            spatial_error!(LOG_SOURCE, "{}", err);
            return Err(err);
        }

        spatial_debug!(
            LOG_SOURCE,
            "Created partition: world {:?}..{:?}, max depth {}, {} objects per node",
            config.world_bound.min, config.world_bound.max,
            config.octree.max_depth, config.octree.max_objects_per_node
        );

        Ok(Self {
            octree: Octree::new(config.world_bound, config.octree),
            dirty: DirtyQueue::new(),
            indexed: FxHashMap::default(),
            config,
        })
    }

    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Read-only access to the tree for diagnostics.
    pub fn octree(&self) -> &Octree<K> {
        &self.octree
    }

    // ===== LIFECYCLE =====

    /// Queue an object for insertion on the next `update`.
    ///
    /// Objects the source reports as not indexable are ignored. Returns
    /// `true` if the object was newly queued.
    pub fn register<S: SpatialSource<K> + ?Sized>(&mut self, source: &S, key: K) -> bool {
        if !source.is_indexable(key) {
            return false;
        }
        self.dirty.push(key)
    }

    /// Insert many objects at once, bypassing the dirty queue.
    ///
    /// Objects already indexed are moved to their current bound. Returns
    /// the number of objects inserted.
    pub fn bulk_register<S, I>(&mut self, source: &S, keys: I) -> usize
    where
        S: SpatialSource<K> + ?Sized,
        I: IntoIterator<Item = K>,
    {
        let mut batch = Vec::new();
        let mut seen = FxHashSet::default();
        let mut skipped = 0usize;

        for key in keys {
            if !seen.insert(key) {
                skipped += 1;
                continue;
            }
            let bound = match source.bounds(key) {
                Some(bound) if source.is_indexable(key) => bound,
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            // Now up to date, a pending entry would only redo the work
            self.dirty.remove(&key);
            if let Some(old) = self.indexed.insert(key, bound) {
                self.octree.remove(key, &old);
            }
            batch.push((key, bound));
        }

        let count = batch.len();
        self.octree.bulk_insert(batch);

        spatial_info!(
            LOG_SOURCE,
            "Bulk registered {} objects ({} skipped, {} nodes)",
            count, skipped, self.octree.total_node_count()
        );
        count
    }

    /// Remove an object from the tree and from the dirty queue.
    ///
    /// The tree is searched with the bound the object was last indexed with.
    /// Returns `false` if the object was neither indexed nor pending.
    pub fn unregister(&mut self, key: K) -> bool {
        let was_pending = self.dirty.remove(&key);
        let was_indexed = match self.indexed.remove(&key) {
            Some(bound) => {
                self.octree.remove(key, &bound);
                true
            }
            None => false,
        };
        was_pending || was_indexed
    }

    /// Queue an indexable object for re-indexing. O(1), never touches the tree.
    ///
    /// Returns `true` if the object was not already pending.
    pub fn mark_dirty<S: SpatialSource<K> + ?Sized>(&mut self, source: &S, key: K) -> bool {
        if !source.is_indexable(key) {
            return false;
        }
        self.dirty.push(key)
    }

    /// Drain up to `budget` pending objects, oldest first.
    ///
    /// Each drained object is re-inserted with its current bound. Keys the
    /// source no longer knows are removed from the tree using their last
    /// indexed bound and reported as stale; objects that stopped being
    /// indexable are removed the same way. `delta_time` does not affect
    /// the drain.
    pub fn update<S: SpatialSource<K> + ?Sized>(
        &mut self,
        source: &S,
        _delta_time: f32,
        budget: usize,
    ) -> UpdateStats {
        let mut stats = UpdateStats::default();

        while stats.drained() < budget {
            let Some(key) = self.dirty.pop_front() else {
                break;
            };

            match source.bounds(key) {
                None => {
                    stats.stale += 1;
                    if let Some(old) = self.indexed.remove(&key) {
                        self.octree.remove(key, &old);
                    }
                    spatial_warn!(LOG_SOURCE, "Dropped stale handle {:?} from dirty queue", key);
                }
                Some(_) if !source.is_indexable(key) => {
                    stats.processed += 1;
                    if let Some(old) = self.indexed.remove(&key) {
                        self.octree.remove(key, &old);
                    }
                }
                Some(bound) => {
                    stats.processed += 1;
                    match self.indexed.insert(key, bound) {
                        Some(old) => {
                            self.octree.update(key, &old, bound);
                        }
                        None => self.octree.insert(key, bound),
                    }
                }
            }
        }

        stats.remaining = self.dirty.len();
        if stats.drained() > 0 {
            spatial_trace!(
                LOG_SOURCE,
                "Update drained {} ({} stale), {} pending",
                stats.drained(), stats.stale, stats.remaining
            );
        }
        stats
    }

    /// `update` with `config.default_update_budget`.
    pub fn update_default<S: SpatialSource<K> + ?Sized>(&mut self, source: &S, delta_time: f32) -> UpdateStats {
        let budget = self.config.default_update_budget;
        self.update(source, delta_time, budget)
    }

    /// Drop every object, pending entry and tree node.
    pub fn clear(&mut self) {
        self.octree.clear();
        self.dirty.clear();
        self.indexed.clear();
    }

    // ===== QUERIES =====

    pub fn query_ray(&self, ray: &Ray) -> Vec<K> {
        self.octree.query_ray(ray)
    }

    pub fn query_volume(&self, volume: &Bound) -> Vec<K> {
        self.octree.query_volume(volume)
    }

    pub fn query_frustum(&self, frustum: &Frustum) -> Vec<K> {
        self.octree.query_frustum(frustum)
    }

    // ===== STATE =====

    pub fn is_indexed(&self, key: K) -> bool {
        self.indexed.contains_key(&key)
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.dirty.contains(&key)
    }

    /// Bound the object is currently indexed under.
    pub fn indexed_bound(&self, key: K) -> Option<Bound> {
        self.indexed.get(&key).copied()
    }

    pub fn pending_count(&self) -> usize {
        self.dirty.len()
    }

    pub fn indexed_count(&self) -> usize {
        self.indexed.len()
    }

    // ===== DIAGNOSTICS =====

    pub fn total_node_count(&self) -> usize {
        self.octree.total_node_count()
    }

    pub fn total_object_count(&self) -> usize {
        self.octree.total_object_count()
    }

    pub fn max_occupied_depth(&self) -> u32 {
        self.octree.max_occupied_depth()
    }

    pub fn debug_dump(&self) {
        self.octree.debug_dump();
    }

    pub fn debug_draw(&self, sink: &mut dyn DebugLineSink) {
        self.octree.debug_draw(sink);
    }
}

#[cfg(test)]
#[path = "partition_manager_tests.rs"]
mod tests;
