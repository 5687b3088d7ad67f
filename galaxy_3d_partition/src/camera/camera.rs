/// Camera: the parameters a frustum is built from.
///
/// A passive value: position, an orthonormal forward/right/up basis,
/// handedness and perspective lens. The engine does NOT store or manage
/// cameras. They are owned and driven by the caller, which rebuilds the
/// frustum whenever the camera changes.

use glam::{Mat4, Vec3};

/// Basis convention of a camera.
///
/// - `Left`: `forward x right = up` (e.g. forward +X, right +Y, up +Z)
/// - `Right`: `right x forward = up` (e.g. forward -Z, right +X, up +Y)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

/// Perspective camera parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    handedness: Handedness,
    /// Vertical field of view, radians
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Camera {
    /// Default vertical field of view (60°).
    pub const DEFAULT_FOV_Y: f32 = std::f32::consts::FRAC_PI_3;
    /// Default aspect ratio (16:9).
    pub const DEFAULT_ASPECT: f32 = 16.0 / 9.0;
    /// Default near clip distance.
    pub const DEFAULT_NEAR: f32 = 0.1;
    /// Default far clip distance.
    pub const DEFAULT_FAR: f32 = 1000.0;

    /// Create a camera from an explicit basis.
    ///
    /// The basis is used as given. It must be orthonormal and match
    /// `handedness`; nothing is validated.
    pub fn from_basis(
        position: Vec3,
        forward: Vec3,
        right: Vec3,
        up: Vec3,
        handedness: Handedness,
    ) -> Self {
        Self {
            position,
            forward,
            right,
            up,
            handedness,
            fov_y: Self::DEFAULT_FOV_Y,
            aspect: Self::DEFAULT_ASPECT,
            near: Self::DEFAULT_NEAR,
            far: Self::DEFAULT_FAR,
        }
    }

    /// Create a camera looking along `direction`, building an orthonormal
    /// basis from `up_hint` for the requested handedness.
    ///
    /// `up_hint` must not be parallel to `direction`.
    pub fn look_to(position: Vec3, direction: Vec3, up_hint: Vec3, handedness: Handedness) -> Self {
        let forward = direction.normalize();
        let (right, up) = match handedness {
            Handedness::Left => {
                let right = up_hint.cross(forward).normalize();
                (right, forward.cross(right))
            }
            Handedness::Right => {
                let right = forward.cross(up_hint).normalize();
                (right, right.cross(forward))
            }
        };
        Self::from_basis(position, forward, right, up, handedness)
    }

    /// Same camera with a different perspective lens.
    pub fn with_perspective(mut self, fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        self.fov_y = fov_y;
        self.aspect = aspect;
        self.near = near;
        self.far = far;
        self
    }

    // ===== GETTERS =====

    /// World-space position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit forward (view) direction.
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Unit right direction.
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Unit up direction.
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Basis convention.
    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    /// Vertical field of view in radians.
    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    /// Width / height.
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Near clip distance.
    pub fn near(&self) -> f32 {
        self.near
    }

    /// Far clip distance.
    pub fn far(&self) -> f32 {
        self.far
    }

    /// View matrix for this camera's handedness.
    pub fn view_matrix(&self) -> Mat4 {
        match self.handedness {
            Handedness::Left => Mat4::look_to_lh(self.position, self.forward, self.up),
            Handedness::Right => Mat4::look_to_rh(self.position, self.forward, self.up),
        }
    }

    /// Perspective projection (depth range 0..1).
    pub fn projection_matrix(&self) -> Mat4 {
        match self.handedness {
            Handedness::Left => Mat4::perspective_lh(self.fov_y, self.aspect, self.near, self.far),
            Handedness::Right => Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far),
        }
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    // ===== SETTERS =====

    /// Move the camera.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Set the aspect ratio (e.g. on viewport resize).
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Set the vertical field of view in radians.
    pub fn set_fov_y(&mut self, fov_y: f32) {
        self.fov_y = fov_y;
    }

    /// Set near and far clip distances.
    pub fn set_clip(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
