/// Frustum: six clipping planes for visibility culling.
///
/// Each plane is a unit normal plus a signed distance from the origin.
/// Normals point inward: a point P is inside the frustum when
/// `dot(normal, P) - distance >= 0` for all six planes.
///
/// A frustum is an immutable value, rebuilt whenever the camera changes.

use glam::{Mat4, Vec3, Vec4};
use crate::math::Bound;
use super::camera::{Camera, Handedness};

/// Result of a 3-way frustum/bound classification.
///
/// Used by the octree for hierarchical culling:
/// - `Outside` → skip the entire subtree
/// - `Inside` → collect all objects without further testing
/// - `Partial` → test individual objects and recurse into children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrustumTest {
    /// Bound is entirely outside the frustum
    Outside,
    /// Bound is entirely inside the frustum
    Inside,
    /// Bound partially overlaps the frustum
    Partial,
}

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// A plane `dot(normal, X) - distance = 0` with a unit (or zero) normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal, pointing into the frustum
    pub normal: Vec3,
    /// Distance from the origin along `normal`
    pub distance: f32,
}

impl Plane {
    /// Plane through `point` with the given (not necessarily unit) normal.
    ///
    /// A zero normal yields a zero plane, which every box passes.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            distance: normal.dot(point),
        }
    }

    /// Plane from homogeneous coefficients `(a, b, c, d)` with
    /// `a*x + b*y + c*z + d >= 0` on the inside.
    pub fn from_coefficients(coefficients: Vec4) -> Self {
        let normal = coefficients.truncate();
        let length = normal.length();
        if length > 0.0 {
            Self {
                normal: normal / length,
                distance: -coefficients.w / length,
            }
        } else {
            Self {
                normal: Vec3::Y,
                distance: 0.0,
            }
        }
    }

    /// Signed distance of a point (positive = inside).
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }

    /// Signed distance of a box center plus the box's projected radius
    /// along the normal. The box is on the inner side (at least partly)
    /// when the result is `>= 0`.
    ///
    /// The arithmetic order here is mirrored lane-for-lane by the 8-wide
    /// batch test so both produce identical bits.
    #[inline]
    pub fn box_distance(&self, center: Vec3, half_extent: Vec3) -> f32 {
        let n = self.normal;
        let distance = n.x * center.x + n.y * center.y + n.z * center.z - self.distance;
        let radius = n.x.abs() * half_extent.x + n.y.abs() * half_extent.y + n.z.abs() * half_extent.z;
        distance + radius
    }

    /// Test a box given by center and half extent against this plane.
    #[inline]
    pub fn intersects_box(&self, center: Vec3, half_extent: Vec3) -> bool {
        self.box_distance(center, half_extent) >= 0.0
    }
}

/// Six frustum planes for culling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Frustum planes: left, right, bottom, top, near, far
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Build the frustum of a perspective camera.
    ///
    /// `aspect_override` replaces the camera aspect ratio when set
    /// (e.g. for an off-screen viewport).
    ///
    /// Near and far planes are offset along forward with opposite
    /// normals. Side planes pass through the camera position; their normals
    /// are cross products of the vector to a far-plane edge and the
    /// matching basis vector. Operand order is fixed for a left-handed basis
    /// (`forward x right = up`); a right-handed basis mirrors every cross
    /// product, so the side normals are negated.
    ///
    /// Camera parameters are not validated: a zero or NaN field of view or
    /// coincident clip distances yield a degenerate frustum.
    pub fn from_camera(camera: &Camera, aspect_override: Option<f32>) -> Self {
        let near = camera.near();
        let far = camera.far();
        let aspect = aspect_override.unwrap_or(camera.aspect());

        let origin = camera.position();
        let forward = camera.forward();
        let right = camera.right();
        let up = camera.up();

        // Half height / half width of the far rectangle
        let half_v = far * (camera.fov_y() * 0.5).tan();
        let half_h = half_v * aspect;
        let far_center = forward * far;

        let mirror = match camera.handedness() {
            Handedness::Left => 1.0,
            Handedness::Right => -1.0,
        };

        let mut planes = [Plane { normal: Vec3::ZERO, distance: 0.0 }; 6];
        planes[PLANE_NEAR] = Plane::from_point_normal(origin + forward * near, forward);
        planes[PLANE_FAR] = Plane::from_point_normal(origin + far_center, -forward);
        planes[PLANE_RIGHT] = Plane::from_point_normal(
            origin,
            (far_center + right * half_h).cross(up) * mirror,
        );
        planes[PLANE_LEFT] = Plane::from_point_normal(
            origin,
            up.cross(far_center - right * half_h) * mirror,
        );
        planes[PLANE_TOP] = Plane::from_point_normal(
            origin,
            right.cross(far_center + up * half_v) * mirror,
        );
        planes[PLANE_BOTTOM] = Plane::from_point_normal(
            origin,
            (far_center - up * half_v).cross(right) * mirror,
        );

        Self { planes }
    }

    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Uses the Gribb & Hartmann method for a 0..1 clip depth range.
    /// Works for both perspective and orthographic projections.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let m = vp.to_cols_array_2d();
        let row = |i: usize| Vec4::new(m[0][i], m[1][i], m[2][i], m[3][i]);
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));

        let mut planes = [Plane { normal: Vec3::ZERO, distance: 0.0 }; 6];
        planes[PLANE_LEFT] = Plane::from_coefficients(r3 + r0);
        planes[PLANE_RIGHT] = Plane::from_coefficients(r3 - r0);
        planes[PLANE_BOTTOM] = Plane::from_coefficients(r3 + r1);
        planes[PLANE_TOP] = Plane::from_coefficients(r3 - r1);
        // 0..1 depth: near is z_clip >= 0
        planes[PLANE_NEAR] = Plane::from_coefficients(r2);
        planes[PLANE_FAR] = Plane::from_coefficients(r3 - r2);

        Self { planes }
    }

    /// Plane by index (`PLANE_LEFT` .. `PLANE_FAR`).
    pub fn plane(&self, index: usize) -> &Plane {
        &self.planes[index]
    }

    /// Test if a point is inside all six planes.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|plane| plane.signed_distance(point) >= 0.0)
    }

    /// Conservative bound visibility test.
    ///
    /// A bound is visible when, for every plane, its center distance plus
    /// its projected radius is non-negative. May return false positives
    /// (a corner grazing the frustum), never false negatives.
    pub fn is_visible(&self, bound: &Bound) -> bool {
        let center = bound.center();
        let half_extent = bound.half_extent();
        self.planes.iter().all(|plane| plane.intersects_box(center, half_extent))
    }

    /// Classify a bound against the frustum (3-way test).
    ///
    /// - Center distance + radius negative on any plane → `Outside`
    /// - Center distance - radius non-negative on every plane → `Inside`
    /// - Otherwise → `Partial`
    pub fn classify(&self, bound: &Bound) -> FrustumTest {
        let center = bound.center();
        let half_extent = bound.half_extent();
        let mut all_inside = true;

        for plane in &self.planes {
            let outer = plane.box_distance(center, half_extent);
            if outer < 0.0 {
                return FrustumTest::Outside;
            }

            let n = plane.normal;
            let radius = n.x.abs() * half_extent.x + n.y.abs() * half_extent.y + n.z.abs() * half_extent.z;
            if plane.signed_distance(center) - radius < 0.0 {
                all_inside = false;
            }
        }

        if all_inside { FrustumTest::Inside } else { FrustumTest::Partial }
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
