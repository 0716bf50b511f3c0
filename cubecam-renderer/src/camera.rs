use cubecam_math::{Mat4, Vec3};

/// Radians of yaw/pitch per pixel of mouse movement.
pub const DEFAULT_LOOK_SENSITIVITY: f32 = 0.0007;
/// Movement speed in world units per second.
pub const DEFAULT_MOVE_SPEED: f32 = 2.5;

/// Discrete movement directions, relative to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Free-look camera driven by yaw/pitch angles.
///
/// The forward vector is derived from the angles as
/// `(cos(pitch)cos(yaw), sin(pitch), cos(pitch)sin(yaw))`, so a yaw of -90°
/// with zero pitch looks down -z. After every update `forward`, `right` and
/// `up` are unit length and mutually orthogonal.
///
/// Pitch is not clamped unless a pitch limit is set: looking past straight
/// up or down flips the view. Exactly ±90° leaves `right` undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    forward: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    look_sensitivity: f32,
    move_speed: f32,
    pitch_limit: Option<f32>,
}

impl Camera {
    /// Creates a camera at `position`; angles are in radians.
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            forward: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw,
            pitch,
            look_sensitivity: DEFAULT_LOOK_SENSITIVITY,
            move_speed: DEFAULT_MOVE_SPEED,
            pitch_limit: None,
        };
        camera.update_basis();
        camera
    }

    pub fn with_look_sensitivity(mut self, sensitivity: f32) -> Self {
        self.look_sensitivity = sensitivity;
        self
    }

    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    /// Clamps pitch to `[-limit, limit]` radians on every look update.
    ///
    /// The sign of `limit` is ignored; a non-finite limit disables clamping.
    pub fn with_pitch_limit(mut self, limit: Option<f32>) -> Self {
        self.pitch_limit = limit.filter(|l| l.is_finite()).map(f32::abs);
        self.clamp_pitch();
        self.update_basis();
        self
    }

    /// Rotates the camera by a mouse delta in pixels; positive `dy` looks up.
    pub fn apply_look(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.look_sensitivity;
        self.pitch += dy * self.look_sensitivity;
        self.clamp_pitch();

        self.update_basis();
    }

    /// Moves the camera by `speed * elapsed_seconds` along its own axes.
    pub fn apply_move(&mut self, direction: Movement, elapsed_seconds: f32) {
        let velocity = self.move_speed * elapsed_seconds;
        match direction {
            Movement::Forward => self.position += self.forward * velocity,
            Movement::Backward => self.position -= self.forward * velocity,
            Movement::Left => self.position -= self.right * velocity,
            Movement::Right => self.position += self.right * velocity,
        }
    }

    /// World-to-camera transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.position + self.forward, self.up)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    fn clamp_pitch(&mut self) {
        if let Some(limit) = self.pitch_limit {
            self.pitch = self.pitch.clamp(-limit, limit);
        }
    }

    fn update_basis(&mut self) {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();

        self.forward = Vec3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize();
        self.right = self.forward.cross(self.world_up).normalize();
        self.up = self.right.cross(self.forward).normalize();
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, TAU};

    use cubecam_math::{approx_eq, EPSILON};

    use super::*;

    fn start() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 4.0), (-90.0_f32).to_radians(), 0.0)
    }

    fn assert_vec3_near(actual: Vec3, expected: Vec3, tolerance: f32) {
        let close = approx_eq(actual.x, expected.x, tolerance)
            && approx_eq(actual.y, expected.y, tolerance)
            && approx_eq(actual.z, expected.z, tolerance);
        assert!(close, "expected {expected:?}, got {actual:?}");
    }

    fn assert_orthonormal(camera: &Camera) {
        let (f, r, u) = (camera.forward(), camera.right(), camera.up());
        for v in [f, r, u] {
            assert!(approx_eq(v.length(), 1.0, EPSILON), "{v:?} not unit length");
        }
        assert!(approx_eq(f.dot(r), 0.0, EPSILON));
        assert!(approx_eq(f.dot(u), 0.0, EPSILON));
        assert!(approx_eq(r.dot(u), 0.0, EPSILON));
    }

    #[test]
    fn test_initial_orientation_looks_down_negative_z() {
        let camera = start();

        assert_vec3_near(camera.forward(), Vec3::new(0.0, 0.0, -1.0), EPSILON);
        assert_vec3_near(camera.right(), Vec3::X, EPSILON);
        assert_vec3_near(camera.up(), Vec3::Y, EPSILON);
    }

    #[test]
    fn test_zero_look_delta_keeps_forward() {
        let mut camera = start();
        let before = camera.forward();

        camera.apply_look(0.0, 0.0);
        assert_eq!(camera.forward(), before);
    }

    #[test]
    fn test_full_yaw_turn_returns_forward() {
        let mut camera = start();
        let before = camera.forward();

        let pixels_per_turn = TAU / DEFAULT_LOOK_SENSITIVITY;
        camera.apply_look(pixels_per_turn, 0.0);
        assert_vec3_near(camera.forward(), before, 1e-3);

        camera.apply_look(pixels_per_turn, 0.0);
        assert_vec3_near(camera.forward(), before, 1e-3);
    }

    #[test]
    fn test_look_accumulates_scaled_deltas() {
        let mut camera = start();
        let yaw = camera.yaw();

        camera.apply_look(100.0, -50.0);
        assert!(approx_eq(camera.yaw(), yaw + 100.0 * DEFAULT_LOOK_SENSITIVITY, EPSILON));
        assert!(approx_eq(camera.pitch(), -50.0 * DEFAULT_LOOK_SENSITIVITY, EPSILON));
        assert!(camera.forward().y < 0.0);
    }

    #[test]
    fn test_basis_stays_orthonormal_while_looking_around() {
        let mut camera = start();
        for (dx, dy) in [(120.0, 300.0), (-800.0, -40.0), (3.0, 1500.0), (50.0, -2900.0)] {
            camera.apply_look(dx, dy);
            assert_orthonormal(&camera);
        }
    }

    #[test]
    fn test_pitch_is_unclamped_by_default() {
        let mut camera = start();
        let past_vertical = (FRAC_PI_2 + 0.2) / DEFAULT_LOOK_SENSITIVITY;

        camera.apply_look(0.0, past_vertical);
        assert!(camera.pitch() > FRAC_PI_2);
        // flipped over the pole: looking backwards towards +z
        assert!(camera.forward().z > 0.0);
    }

    #[test]
    fn test_pitch_limit_clamps() {
        let limit = 89.0_f32.to_radians();
        let mut camera = start().with_pitch_limit(Some(limit));

        camera.apply_look(0.0, 1.0e6);
        assert_eq!(camera.pitch(), limit);
        assert!(camera.forward().z < 0.0);

        camera.apply_look(0.0, -2.0e6);
        assert_eq!(camera.pitch(), -limit);
        assert_orthonormal(&camera);
    }

    #[test]
    fn test_pitch_limit_sign_is_ignored() {
        let limit = 0.5;
        let mut camera = start().with_pitch_limit(Some(-limit));

        camera.apply_look(0.0, 1.0e6);
        assert_eq!(camera.pitch(), limit);

        camera.apply_look(0.0, -2.0e6);
        assert_eq!(camera.pitch(), -limit);
    }

    #[test]
    fn test_non_finite_pitch_limit_disables_clamp() {
        for limit in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let mut camera = start().with_pitch_limit(Some(limit));
            let past_vertical = (FRAC_PI_2 + 0.2) / DEFAULT_LOOK_SENSITIVITY;

            camera.apply_look(0.0, past_vertical);
            assert!(camera.pitch() > FRAC_PI_2);
            assert_orthonormal(&camera);
        }
    }

    #[test]
    fn test_movement_along_camera_axes() {
        let mut camera = start();
        let origin = camera.position();

        camera.apply_move(Movement::Forward, 1.0);
        assert_vec3_near(camera.position(), origin + Vec3::new(0.0, 0.0, -2.5), EPSILON);

        camera.apply_move(Movement::Backward, 1.0);
        assert_vec3_near(camera.position(), origin, EPSILON);

        camera.apply_move(Movement::Right, 0.5);
        assert_vec3_near(camera.position(), origin + Vec3::new(1.25, 0.0, 0.0), EPSILON);

        camera.apply_move(Movement::Left, 0.5);
        assert_vec3_near(camera.position(), origin, EPSILON);
    }

    #[test]
    fn test_move_speed_is_configurable() {
        let mut camera = start().with_move_speed(10.0);

        camera.apply_move(Movement::Forward, 0.1);
        assert_vec3_near(camera.position(), Vec3::new(0.0, 0.0, 3.0), EPSILON);
    }

    #[test]
    fn test_view_matrix_maps_position_to_origin() {
        let mut camera = start();
        camera.apply_look(250.0, 120.0);
        camera.apply_move(Movement::Right, 0.3);

        let view = camera.view_matrix();
        assert_vec3_near(view.transform_point(camera.position()), Vec3::ZERO, 1e-4);

        let ahead = camera.position() + camera.forward() * 2.0;
        assert_vec3_near(view.transform_point(ahead), Vec3::new(0.0, 0.0, -2.0), 1e-4);
    }
}
