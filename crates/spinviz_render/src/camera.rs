//! Orbit/pan/zoom camera
//!
//! The camera orbits a center point. Every interaction re-orthonormalizes the
//! up vector against the forward direction, so the (location, center, up)
//! triple stays a valid view basis across arbitrary command sequences.

use spinviz_input::CameraControl;
use spinviz_math::{mat4, Mat4, Vec3};

/// Orbit rotation per pixel of drag, in degrees
const ORBIT_DEGREES_PER_PIXEL: f32 = 0.1;
/// Pan translation per pixel, as a fraction of the orbit distance
const PAN_RATE: f32 = 0.001;
/// Relative distance change per zoom step
const ZOOM_RATE: f32 = 0.02;
/// Inward zoom stops before the camera reaches this distance to the center
pub const MIN_CAMERA_DISTANCE: f32 = 2.0;

/// Camera state: viewpoint, orbit center, orientation, projection field of
/// view, and clear color
///
/// Invariant: `location != center`. The movement operations preserve it; the
/// zoom floor keeps the camera from crossing through the center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub location: Vec3,
    pub center: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub vertical_fov: f32,
    pub background: [f32; 3],
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            location: Vec3::new(0.0, 0.0, 1.0),
            center: Vec3::ZERO,
            up: Vec3::Y,
            vertical_fov: 45.0,
            background: [0.0, 0.0, 0.0],
        }
    }
}

impl Camera {
    /// Distance from the viewpoint to the orbit center
    pub fn distance(&self) -> f32 {
        (self.center - self.location).length()
    }

    /// View matrix for the current state
    pub fn view_matrix(&self) -> Mat4 {
        mat4::look_at(self.location, self.center, self.up)
    }

    /// Re-orthonormalize up against forward; returns (forward, up, right),
    /// all unit length.
    fn orthonormal_basis(&mut self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.center - self.location).normalized();
        let right = forward.cross(self.up.normalized()).normalized();
        self.up = right.cross(forward).normalized();
        (forward, self.up, right)
    }

    /// Rotate the viewpoint around the center.
    ///
    /// The rotation axis is the drag direction lifted into the view plane;
    /// the angle is 0.1 degrees per pixel of drag length. The distance to the
    /// center is preserved exactly.
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        let length = (delta_x * delta_x + delta_y * delta_y).sqrt();
        if length == 0.0 {
            return;
        }
        let (forward, up, right) = self.orthonormal_basis();
        let axis = up * (delta_x / length) + right * (delta_y / length);
        let rotation = mat4::rotation(axis, (-ORBIT_DEGREES_PER_PIXEL * length).to_radians());

        let distance = self.distance();
        let forward = mat4::transform_direction(rotation, forward);
        self.up = mat4::transform_direction(rotation, up);
        self.location = self.center - forward * distance;
    }

    /// Translate viewpoint and center together in the view plane.
    ///
    /// Pan speed scales with the orbit distance so the motion tracks the
    /// pointer at any zoom level.
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let (_, up, right) = self.orthonormal_basis();
        let translation = (up * delta_y - right * delta_x) * (self.distance() * PAN_RATE);
        self.location += translation;
        self.center += translation;
    }

    /// Move the viewpoint along the view axis.
    ///
    /// Positive deltas increase the distance. An inward zoom that would land
    /// below [`MIN_CAMERA_DISTANCE`] is refused outright.
    pub fn zoom(&mut self, delta: f32) {
        let offset = self.location - self.center;
        let scale = 1.0 + ZOOM_RATE * delta;
        if delta < 0.0 && offset.length() * scale < MIN_CAMERA_DISTANCE {
            return;
        }
        self.location = self.center + offset * scale;
    }
}

impl CameraControl for Camera {
    fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        Camera::orbit(self, delta_x, delta_y);
    }

    fn pan(&mut self, delta_x: f32, delta_y: f32) {
        Camera::pan(self, delta_x, delta_y);
    }

    fn zoom(&mut self, delta: f32) {
        Camera::zoom(self, delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spinviz_math::mat4::transform_point;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn test_camera(distance: f32) -> Camera {
        Camera {
            location: Vec3::new(0.0, 0.0, distance),
            ..Camera::default()
        }
    }

    #[test]
    fn test_zoom_scales_distance() {
        let mut camera = test_camera(10.0);
        camera.zoom(1.0);
        assert!(approx_eq(camera.distance(), 10.2));
        camera.zoom(-1.0);
        assert!(approx_eq(camera.distance(), 10.2 * 0.98));
    }

    #[test]
    fn test_zoom_refuses_below_floor() {
        let mut camera = test_camera(2.0);
        camera.zoom(-1.0);
        assert!(approx_eq(camera.distance(), 2.0));
    }

    #[test]
    fn test_zoom_out_allowed_below_floor() {
        let mut camera = test_camera(1.0);
        camera.zoom(1.0);
        assert!(approx_eq(camera.distance(), 1.02));
    }

    #[test]
    fn test_zoom_keeps_center() {
        let mut camera = test_camera(5.0);
        camera.center = Vec3::new(1.0, 2.0, 3.0);
        camera.location = Vec3::new(1.0, 2.0, 8.0);
        camera.zoom(1.0);
        assert_eq!(camera.center, Vec3::new(1.0, 2.0, 3.0));
        assert!(approx_eq(camera.distance(), 5.1));
    }

    #[test]
    fn test_orbit_preserves_distance() {
        let mut camera = test_camera(7.0);
        camera.orbit(40.0, -25.0);
        camera.orbit(-3.0, 90.0);
        assert!(approx_eq(camera.distance(), 7.0));
    }

    #[test]
    fn test_orbit_keeps_basis_orthonormal() {
        let mut camera = test_camera(5.0);
        camera.up = Vec3::new(0.2, 1.0, 0.1); // deliberately skewed
        camera.orbit(15.0, 10.0);
        let forward = (camera.center - camera.location).normalized();
        assert!(approx_eq(camera.up.length(), 1.0));
        assert!(approx_eq(forward.dot(camera.up), 0.0));
    }

    #[test]
    fn test_orbit_zero_delta_is_noop() {
        let mut camera = test_camera(5.0);
        let before = camera;
        camera.orbit(0.0, 0.0);
        assert_eq!(camera, before);
    }

    #[test]
    fn test_horizontal_orbit_rotates_about_up() {
        let mut camera = test_camera(5.0);
        // 900 px at 0.1 deg/px is a quarter turn about the up axis.
        camera.orbit(900.0, 0.0);
        assert!(approx_eq(camera.distance(), 5.0));
        assert!(approx_eq(camera.location.y, 0.0));
        // Viewpoint swings into the xz-plane's x axis.
        assert!(approx_eq(camera.location.x.abs(), 5.0));
        assert!(camera.location.z.abs() < 0.001);
    }

    #[test]
    fn test_pan_moves_location_and_center_together() {
        let mut camera = test_camera(10.0);
        let offset_before = camera.location - camera.center;
        camera.pan(30.0, -12.0);
        let offset_after = camera.location - camera.center;
        assert!(approx_eq(offset_before.x, offset_after.x));
        assert!(approx_eq(offset_before.y, offset_after.y));
        assert!(approx_eq(offset_before.z, offset_after.z));
        assert!(camera.center != Vec3::ZERO);
    }

    #[test]
    fn test_pan_scales_with_distance() {
        let mut near = test_camera(2.0);
        let mut far = test_camera(20.0);
        near.pan(10.0, 0.0);
        far.pan(10.0, 0.0);
        let near_shift = near.center.length();
        let far_shift = far.center.length();
        assert!(approx_eq(far_shift, near_shift * 10.0));
    }

    #[test]
    fn test_view_matrix_maps_location_to_origin() {
        let camera = Camera {
            location: Vec3::new(4.0, -2.0, 9.0),
            center: Vec3::new(1.0, 1.0, 1.0),
            ..Camera::default()
        };
        let view = camera.view_matrix();
        let mapped = transform_point(view, camera.location);
        assert!(mapped.length() < EPSILON);
    }
}
