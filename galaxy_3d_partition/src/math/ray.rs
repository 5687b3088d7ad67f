/// Ray: origin, direction and an optional maximum distance.
///
/// The direction does not need to be normalized; distances returned by
/// slab tests are expressed in multiples of `direction`.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point
    pub origin: Vec3,
    /// Direction of travel
    pub direction: Vec3,
    /// Hits farther than this parametric distance are ignored
    pub max_distance: f32,
}

impl Ray {
    /// Create an unbounded ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            max_distance: f32::INFINITY,
        }
    }

    /// Create a ray from `from` towards `to`, stopping at `to`.
    pub fn segment(from: Vec3, to: Vec3) -> Self {
        Self {
            origin: from,
            direction: to - from,
            max_distance: 1.0,
        }
    }

    /// Same ray with a maximum parametric distance.
    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Point at parametric distance `t`.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
