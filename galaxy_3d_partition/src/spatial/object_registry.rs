/// Object registry: handle-based store of spatial objects.
///
/// Objects live in a `SlotMap` and are referenced everywhere else by
/// `ObjectKey`. A key becomes invalid the moment its object is despawned,
/// so looking up a destroyed object is a detectable error rather than a
/// dangling reference.

use bitflags::bitflags;
use slotmap::{new_key_type, SlotMap};
use crate::error::{Error, Result};
use crate::math::Bound;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable key for an object within an `ObjectRegistry`.
    pub struct ObjectKey;
}

// ===== FLAGS =====

bitflags! {
    /// Per-object classification bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ObjectFlags: u32 {
        /// The object has a spatial footprint and belongs in the partition.
        const SPATIAL = 1 << 0;
    }
}

// ===== SPATIAL SOURCE =====

/// Read access to object bounds, consumed by the partition manager.
///
/// Implemented by whatever owns the objects (a scene graph, an ECS world,
/// or `ObjectRegistry`).
pub trait SpatialSource<K> {
    /// Current world-space bound, or `None` if `key` no longer exists.
    fn bounds(&self, key: K) -> Option<Bound>;

    /// Whether `key` should be indexed at all.
    fn is_indexable(&self, key: K) -> bool;
}

// ===== SPATIAL OBJECT =====

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialObject {
    /// World-space bound
    pub bound: Bound,
    /// Classification bits
    pub flags: ObjectFlags,
}

// ===== REGISTRY =====

#[derive(Debug, Default)]
pub struct ObjectRegistry {
    objects: SlotMap<ObjectKey, SpatialObject>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object and return its key.
    pub fn spawn(&mut self, bound: Bound, flags: ObjectFlags) -> ObjectKey {
        self.objects.insert(SpatialObject { bound, flags })
    }

    /// Destroy an object. Returns `false` if the key was already invalid.
    pub fn despawn(&mut self, key: ObjectKey) -> bool {
        self.objects.remove(key).is_some()
    }

    pub fn get(&self, key: ObjectKey) -> Option<&SpatialObject> {
        self.objects.get(key)
    }

    /// Current bound of an object.
    pub fn bound(&self, key: ObjectKey) -> Result<Bound> {
        self.objects
            .get(key)
            .map(|object| object.bound)
            .ok_or_else(|| Error::StaleHandle(format!("{:?}", key)))
    }

    /// Move an object. The caller is responsible for marking it dirty.
    pub fn set_bound(&mut self, key: ObjectKey, bound: Bound) -> Result<()> {
        let object = self
            .objects
            .get_mut(key)
            .ok_or_else(|| Error::StaleHandle(format!("{:?}", key)))?;
        object.bound = bound;
        Ok(())
    }

    /// Current flags of an object.
    pub fn flags(&self, key: ObjectKey) -> Result<ObjectFlags> {
        self.objects
            .get(key)
            .map(|object| object.flags)
            .ok_or_else(|| Error::StaleHandle(format!("{:?}", key)))
    }

    /// Replace an object's flags.
    pub fn set_flags(&mut self, key: ObjectKey, flags: ObjectFlags) -> Result<()> {
        let object = self
            .objects
            .get_mut(key)
            .ok_or_else(|| Error::StaleHandle(format!("{:?}", key)))?;
        object.flags = flags;
        Ok(())
    }

    pub fn contains(&self, key: ObjectKey) -> bool {
        self.objects.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Keys of all live objects (arbitrary order).
    pub fn keys(&self) -> impl Iterator<Item = ObjectKey> + '_ {
        self.objects.keys()
    }
}

impl SpatialSource<ObjectKey> for ObjectRegistry {
    fn bounds(&self, key: ObjectKey) -> Option<Bound> {
        self.objects.get(key).map(|object| object.bound)
    }

    fn is_indexable(&self, key: ObjectKey) -> bool {
        self.objects
            .get(key)
            .is_some_and(|object| object.flags.contains(ObjectFlags::SPATIAL))
    }
}

#[cfg(test)]
#[path = "object_registry_tests.rs"]
mod tests;
