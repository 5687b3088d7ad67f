/// Bound: axis-aligned bounding box.
///
/// Stored as component-wise minimum and maximum corners. Every populated
/// bound satisfies `min <= max` on all three axes; `from_points` enforces
/// this for arbitrary corner pairs.

use glam::Vec3;
use super::ray::Ray;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bound {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl Bound {
    /// Create a bound from already ordered corners.
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a bound from two arbitrary corners (component-wise min/max).
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a bound from a center and a half extent.
    pub fn from_center_half_extent(center: Vec3, half_extent: Vec3) -> Self {
        let half_extent = half_extent.abs();
        Self {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// Center point.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half of the size along each axis.
    pub fn half_extent(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Full size along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// `min <= max` on every axis and every component is finite.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
            && self.min.z <= self.max.z
    }

    /// Test if this bound fully contains another bound (touching faces count).
    pub fn contains(&self, other: &Bound) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x
        && self.min.y <= other.min.y && self.max.y >= other.max.y
        && self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    /// Test if a point lies inside or on the surface of this bound.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.min.x <= point.x && point.x <= self.max.x
        && self.min.y <= point.y && point.y <= self.max.y
        && self.min.z <= point.z && point.z <= self.max.z
    }

    /// Test if this bound intersects (overlaps or touches) another bound.
    pub fn intersects(&self, other: &Bound) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
        && self.min.y <= other.max.y && self.max.y >= other.min.y
        && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Slab test returning the parametric `(enter, exit)` interval.
    ///
    /// `enter` is clamped to 0 when the origin is inside the box.
    /// Returns `None` when the ray misses, when the box lies entirely behind
    /// the origin, or when the entry point is beyond `ray.max_distance`.
    pub fn ray_interval(&self, ray: &Ray) -> Option<(f32, f32)> {
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let slab_min = self.min[axis];
            let slab_max = self.max[axis];

            if direction == 0.0 {
                // Parallel to this slab: only a hit if the origin is already inside it.
                // Tiny non-zero components divide to large or infinite distances.
                if origin < slab_min || origin > slab_max {
                    return None;
                }
                continue;
            }

            let inv_direction = 1.0 / direction;
            let mut t1 = (slab_min - origin) * inv_direction;
            let mut t2 = (slab_max - origin) * inv_direction;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }

            t_enter = t_enter.max(t1);
            t_exit = t_exit.min(t2);
            if t_enter > t_exit {
                return None;
            }
        }

        if t_exit < 0.0 {
            return None;
        }
        let t_enter = t_enter.max(0.0);
        if t_enter > ray.max_distance {
            return None;
        }
        Some((t_enter, t_exit))
    }

    /// Test if the ray hits this bound within `[0, ray.max_distance]`.
    pub fn intersects_ray(&self, ray: &Ray) -> bool {
        self.ray_interval(ray).is_some()
    }

    /// Octant index (0–7) of a point relative to this bound's center.
    ///
    /// Bit layout: bit0 = X, bit1 = Y, bit2 = Z (0 = low, 1 = high).
    pub fn octant_of(&self, point: Vec3) -> usize {
        let center = self.center();
        (point.x >= center.x) as usize
            | (((point.y >= center.y) as usize) << 1)
            | (((point.z >= center.z) as usize) << 2)
    }

    /// Bound of octant `index` (0–7), spanning the center and one corner.
    ///
    /// Uses the same bit layout as `octant_of`. Only the low three bits
    /// of `index` are read.
    pub fn create_octant(&self, index: usize) -> Bound {
        let center = self.center();
        Bound {
            min: Vec3::new(
                if index & 1 == 0 { self.min.x } else { center.x },
                if index & 2 == 0 { self.min.y } else { center.y },
                if index & 4 == 0 { self.min.z } else { center.z },
            ),
            max: Vec3::new(
                if index & 1 == 0 { center.x } else { self.max.x },
                if index & 2 == 0 { center.y } else { self.max.y },
                if index & 4 == 0 { center.z } else { self.max.z },
            ),
        }
    }

    /// The eight corners, indexed with the octant bit layout.
    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| Vec3::new(
            if i & 1 == 0 { self.min.x } else { self.max.x },
            if i & 2 == 0 { self.min.y } else { self.max.y },
            if i & 4 == 0 { self.min.z } else { self.max.z },
        ))
    }
}

#[cfg(test)]
#[path = "bound_tests.rs"]
mod tests;
