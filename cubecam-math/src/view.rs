use crate::{Mat4, Vec3};

impl Mat4 {
    /// Right-handed view matrix for a camera at `eye` looking at `target`.
    ///
    /// The camera looks down its local -z axis. `up` must not be parallel
    /// to `target - eye`; this is not checked.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let z = (eye - target).normalize();
        let x = up.cross(z).normalize();
        let y = z.cross(x);

        Mat4::from_cols([
            [x.x, y.x, z.x, 0.0],
            [x.y, y.y, z.y, 0.0],
            [x.z, y.z, z.z, 0.0],
            [-x.dot(eye), -y.dot(eye), -z.dot(eye), 1.0],
        ])
    }

    /// Perspective projection mapping view depth `[-near, -far]` to clip
    /// depth `[-1, 1]`.
    ///
    /// Requires `far > near > 0`; equal planes divide by zero.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let focal_y = 1.0 / (fov_y * 0.5).tan();
        let focal_x = focal_y / aspect;
        let depth = far - near;

        let mut m = Mat4::ZERO;
        m[0][0] = focal_x;
        m[1][1] = focal_y;
        m[2][2] = -(near + far) / depth;
        m[2][3] = -1.0;
        m[3][2] = -(2.0 * far * near) / depth;
        m
    }
}

#[cfg(test)]
mod tests {
    use crate::{approx_eq, Mat4, Vec3, Vec4, EPSILON};

    fn assert_vec3_eq(actual: Vec3, expected: Vec3) {
        let close = approx_eq(actual.x, expected.x, EPSILON)
            && approx_eq(actual.y, expected.y, EPSILON)
            && approx_eq(actual.z, expected.z, EPSILON);
        assert!(close, "expected {expected:?}, got {actual:?}");
    }

    #[test]
    fn test_look_at_maps_eye_to_origin() {
        let eye = Vec3::new(0.0, 0.0, 4.0);
        let view = Mat4::look_at(eye, eye + Vec3::new(0.0, 0.0, -1.0), Vec3::Y);

        assert_vec3_eq(view.transform_point(eye), Vec3::ZERO);
    }

    #[test]
    fn test_look_at_maps_eye_to_origin_from_oblique_position() {
        let eye = Vec3::new(3.0, -2.0, 7.5);
        let view = Mat4::look_at(eye, Vec3::new(0.5, 1.0, -1.0), Vec3::Y);

        assert_vec3_eq(view.transform_point(eye), Vec3::ZERO);
    }

    #[test]
    fn test_look_at_places_target_on_negative_z() {
        let eye = Vec3::new(0.0, 0.0, 4.0);
        let view = Mat4::look_at(eye, Vec3::ZERO, Vec3::Y);

        assert_vec3_eq(view.transform_point(Vec3::ZERO), Vec3::new(0.0, 0.0, -4.0));
        assert_vec3_eq(view.transform_point(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(1.0, 0.0, -4.0));
        assert_vec3_eq(view.transform_point(Vec3::new(0.0, 1.0, 4.0)), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_look_at_rotation_is_orthonormal() {
        let view = Mat4::look_at(Vec3::new(1.0, 2.0, 3.0), Vec3::new(-2.0, 0.5, 0.0), Vec3::Y);
        let row = |r: usize| Vec3::new(view[0][r], view[1][r], view[2][r]);

        for r in 0..3 {
            assert!(approx_eq(row(r).length(), 1.0, EPSILON));
        }
        assert!(approx_eq(row(0).dot(row(1)), 0.0, EPSILON));
        assert!(approx_eq(row(1).dot(row(2)), 0.0, EPSILON));
        assert!(approx_eq(row(0).dot(row(2)), 0.0, EPSILON));
    }

    #[test]
    fn test_perspective_square_ninety_degrees() {
        let (near, far) = (0.1_f32, 100.0_f32);
        let m = Mat4::perspective(90.0_f32.to_radians(), 1.0, near, far);

        assert!(approx_eq(m[0][0], 1.0, EPSILON));
        assert!(approx_eq(m[1][1], 1.0, EPSILON));
        assert_eq!(m[2][2], -(near + far) / (far - near));
        assert_eq!(m[3][2], -(2.0 * far * near) / (far - near));
        assert_eq!(m[2][3], -1.0);
        assert_eq!(m[3][3], 0.0);
    }

    #[test]
    fn test_perspective_aspect_scales_horizontal_focal() {
        let m = Mat4::perspective(90.0_f32.to_radians(), 2.0, 0.1, 100.0);

        assert!(approx_eq(m[0][0], 0.5, EPSILON));
        assert!(approx_eq(m[1][1], 1.0, EPSILON));
    }

    #[test]
    fn test_perspective_maps_planes_to_ndc_bounds() {
        let (near, far) = (0.5_f32, 20.0_f32);
        let m = Mat4::perspective(60.0_f32.to_radians(), 1.5, near, far);

        let ndc_depth = |z: f32| {
            let clip = m * Vec4::new(0.0, 0.0, z, 1.0);
            clip.z / clip.w
        };
        assert!(approx_eq(ndc_depth(-near), -1.0, 1e-4));
        assert!(approx_eq(ndc_depth(-far), 1.0, 1e-4));
    }
}
