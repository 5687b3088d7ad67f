use glam::{Mat4, Vec3};
use crate::math::Bound;
use super::*;

fn lh_camera() -> Camera {
    // Forward +X, right +Y, up +Z
    Camera::look_to(Vec3::ZERO, Vec3::X, Vec3::Z, Handedness::Left)
        .with_perspective(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0)
}

fn rh_camera() -> Camera {
    // Forward -Z, right +X, up +Y
    Camera::look_to(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, Vec3::Y, Handedness::Right)
        .with_perspective(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0)
}

fn cube(center: Vec3, half: f32) -> Bound {
    Bound::from_center_half_extent(center, Vec3::splat(half))
}

// ============================================================================
// Frustum::from_camera: plane orientation
// ============================================================================

#[test]
fn test_planes_are_unit_length() {
    for camera in [lh_camera(), rh_camera()] {
        let frustum = Frustum::from_camera(&camera, None);
        for plane in &frustum.planes {
            assert!((plane.normal.length() - 1.0).abs() < 1e-5, "plane normal should be unit length");
        }
    }
}

#[test]
fn test_known_inside_point_is_non_negative_on_all_planes() {
    for camera in [lh_camera(), rh_camera()] {
        let frustum = Frustum::from_camera(&camera, None);
        let inside = camera.position() + camera.forward() * 10.0;
        for (i, plane) in frustum.planes.iter().enumerate() {
            assert!(
                plane.signed_distance(inside) > 0.0,
                "{:?}: plane {} must face inward",
                camera.handedness(),
                i
            );
        }
    }
}

#[test]
fn test_side_normals_point_inward_left_handed() {
    let frustum = Frustum::from_camera(&lh_camera(), None);
    // Right plane leans towards -right (-Y), left towards +Y
    assert!(frustum.plane(PLANE_RIGHT).normal.y < 0.0);
    assert!(frustum.plane(PLANE_LEFT).normal.y > 0.0);
    assert!(frustum.plane(PLANE_TOP).normal.z < 0.0);
    assert!(frustum.plane(PLANE_BOTTOM).normal.z > 0.0);
    assert!(frustum.plane(PLANE_NEAR).normal.x > 0.0);
    assert!(frustum.plane(PLANE_FAR).normal.x < 0.0);
}

#[test]
fn test_points_outside_each_side() {
    for camera in [lh_camera(), rh_camera()] {
        let frustum = Frustum::from_camera(&camera, None);
        let ahead = camera.position() + camera.forward() * 10.0;
        // 90° FOV, aspect 1: at distance 10 the half width is 10
        assert!(frustum.contains_point(ahead + camera.right() * 9.0));
        assert!(!frustum.contains_point(ahead + camera.right() * 11.0));
        assert!(!frustum.contains_point(ahead - camera.right() * 11.0));
        assert!(!frustum.contains_point(ahead + camera.up() * 11.0));
        assert!(!frustum.contains_point(ahead - camera.up() * 11.0));
        assert!(!frustum.contains_point(camera.position() + camera.forward() * 0.05));
        assert!(!frustum.contains_point(camera.position() + camera.forward() * 101.0));
    }
}

#[test]
fn test_aspect_override_widens_horizontally() {
    let camera = lh_camera();
    let narrow = Frustum::from_camera(&camera, None);
    let wide = Frustum::from_camera(&camera, Some(2.0));
    let point = camera.forward() * 10.0 + camera.right() * 15.0;
    assert!(!narrow.contains_point(point));
    assert!(wide.contains_point(point));
}

#[test]
fn test_far_and_near_plane_distances() {
    let camera = lh_camera();
    let frustum = Frustum::from_camera(&camera, None);
    let near = frustum.plane(PLANE_NEAR);
    let far = frustum.plane(PLANE_FAR);
    assert!((near.signed_distance(Vec3::ZERO) + 0.1).abs() < 1e-6);
    assert!((far.signed_distance(Vec3::ZERO) - 100.0).abs() < 1e-4);
}

// ============================================================================
// Frustum::is_visible
// ============================================================================

#[test]
fn test_box_at_camera_origin_is_visible() {
    for camera in [lh_camera(), rh_camera()] {
        let frustum = Frustum::from_camera(&camera, None);
        assert!(frustum.is_visible(&cube(camera.position(), 1.0)));
    }
}

#[test]
fn test_box_beyond_far_plane_is_not_visible() {
    let camera = lh_camera();
    let frustum = Frustum::from_camera(&camera, None);
    // Radius along forward is 2, so anything centered past 102 is out
    assert!(!frustum.is_visible(&cube(camera.forward() * 103.0, 2.0)));
    assert!(frustum.is_visible(&cube(camera.forward() * 101.0, 2.0)));
}

#[test]
fn test_box_behind_camera_is_not_visible() {
    let camera = rh_camera();
    let frustum = Frustum::from_camera(&camera, None);
    assert!(!frustum.is_visible(&cube(camera.position() - camera.forward() * 10.0, 1.0)));
}

#[test]
fn test_box_straddling_side_plane_is_visible() {
    let camera = lh_camera();
    let frustum = Frustum::from_camera(&camera, None);
    let ahead = camera.forward() * 10.0;
    assert!(frustum.is_visible(&cube(ahead + camera.right() * 10.5, 1.0)));
    assert!(!frustum.is_visible(&cube(ahead + camera.right() * 15.0, 1.0)));
}

// ============================================================================
// Frustum::classify
// ============================================================================

#[test]
fn test_classify() {
    let camera = lh_camera();
    let frustum = Frustum::from_camera(&camera, None);
    let ahead = camera.forward() * 20.0;

    assert_eq!(frustum.classify(&cube(ahead, 1.0)), FrustumTest::Inside);
    assert_eq!(frustum.classify(&cube(ahead + camera.right() * 20.0, 2.0)), FrustumTest::Partial);
    assert_eq!(frustum.classify(&cube(-ahead, 1.0)), FrustumTest::Outside);
}

#[test]
fn test_classify_agrees_with_is_visible() {
    let camera = rh_camera();
    let frustum = Frustum::from_camera(&camera, None);
    for i in -10..10 {
        for j in -10..10 {
            let b = cube(Vec3::new(i as f32 * 7.0, j as f32 * 7.0, -30.0), 2.0);
            let visible = frustum.is_visible(&b);
            let class = frustum.classify(&b);
            assert_eq!(visible, class != FrustumTest::Outside);
        }
    }
}

// ============================================================================
// Frustum::from_view_projection
// ============================================================================

#[test]
fn test_view_projection_planes_are_unit_length() {
    let vp = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0);
    let frustum = Frustum::from_view_projection(&vp);
    for plane in &frustum.planes {
        assert!((plane.normal.length() - 1.0).abs() < 1e-4);
    }
}

#[test]
fn test_view_projection_matches_camera_frustum() {
    for camera in [lh_camera(), rh_camera()] {
        let from_camera = Frustum::from_camera(&camera, None);
        let from_vp = Frustum::from_view_projection(&camera.view_projection_matrix());

        let probes = [
            camera.forward() * 10.0,
            camera.forward() * 50.0 + camera.right() * 20.0,
            camera.forward() * 50.0 + camera.right() * 60.0,
            camera.forward() * 50.0 - camera.up() * 60.0,
            camera.forward() * 0.05,
            camera.forward() * 150.0,
            -camera.forward() * 3.0,
        ];
        for probe in probes {
            let point = camera.position() + probe;
            assert_eq!(
                from_camera.contains_point(point),
                from_vp.contains_point(point),
                "{:?}: disagreement at {:?}",
                camera.handedness(),
                point
            );
        }
    }
}

#[test]
fn test_orthographic_view_projection() {
    let projection = Mat4::orthographic_rh(-5.0, 5.0, -5.0, 5.0, 0.1, 100.0);
    let frustum = Frustum::from_view_projection(&projection);

    // Straddles the right boundary at x = 5
    let straddling = Bound::new(Vec3::new(4.0, 0.0, -10.0), Vec3::new(6.0, 1.0, -5.0));
    let outside = Bound::new(Vec3::new(6.0, 0.0, -10.0), Vec3::new(7.0, 1.0, -5.0));
    assert!(frustum.is_visible(&straddling));
    assert!(!frustum.is_visible(&outside));
}

// ============================================================================
// Plane helpers
// ============================================================================

#[test]
fn test_plane_from_point_normal_normalizes() {
    let plane = Plane::from_point_normal(Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.0, 2.0, 0.0));
    assert_eq!(plane.normal, Vec3::Y);
    assert_eq!(plane.distance, 3.0);
    assert_eq!(plane.signed_distance(Vec3::new(5.0, 4.0, -2.0)), 1.0);
}

#[test]
fn test_plane_box_distance() {
    let plane = Plane::from_point_normal(Vec3::ZERO, Vec3::X);
    assert_eq!(plane.box_distance(Vec3::new(-1.5, 0.0, 0.0), Vec3::ONE), -0.5);
    assert!(!plane.intersects_box(Vec3::new(-1.5, 0.0, 0.0), Vec3::ONE));
    assert!(plane.intersects_box(Vec3::new(-1.0, 0.0, 0.0), Vec3::ONE));
}

#[test]
fn test_plane_constants() {
    assert_eq!(PLANE_LEFT, 0);
    assert_eq!(PLANE_RIGHT, 1);
    assert_eq!(PLANE_BOTTOM, 2);
    assert_eq!(PLANE_TOP, 3);
    assert_eq!(PLANE_NEAR, 4);
    assert_eq!(PLANE_FAR, 5);
}
