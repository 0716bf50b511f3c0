use cubecam_math::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::{
    camera::{Camera, DEFAULT_LOOK_SENSITIVITY, DEFAULT_MOVE_SPEED},
    error::Error,
};

/// Largest accepted canvas width or height, in pixels.
pub const MAX_CANVAS_DIMENSION: u32 = 16384;

/// Scene settings; every field falls back to its default when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub projection: ProjectionConfig,
    /// Background color, RGB in `[0, 1]`.
    pub clear_color: [f32; 3],
    /// Canvas resolution in pixels; keeps the canvas' own size when unset.
    pub canvas_size: Option<(u32, u32)>,
}

/// Initial camera placement and input response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    /// Radians per pixel of mouse movement.
    pub look_sensitivity: f32,
    /// World units per second.
    pub move_speed: f32,
    /// Clamp pitch to +/- this angle; unclamped when unset.
    pub pitch_limit_degrees: Option<f32>,
}

/// Perspective frustum parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            projection: ProjectionConfig::default(),
            clear_color: [0.1, 0.1, 0.1],
            canvas_size: None,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 4.0),
            yaw_degrees: -90.0,
            pitch_degrees: 0.0,
            look_sensitivity: DEFAULT_LOOK_SENSITIVITY,
            move_speed: DEFAULT_MOVE_SPEED,
            pitch_limit_degrees: None,
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self { fov_y_degrees: 45.0, near: 0.1, far: 100.0 }
    }
}

impl SceneConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: SceneConfig =
            serde_json::from_str(json).map_err(|e| Error::deserialization_failed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the ranges the camera and projection math rely on.
    pub fn validate(&self) -> Result<(), Error> {
        self.camera.validate()?;
        self.projection.validate()?;

        if self.clear_color.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(Error::invalid_config("clear color components must be within [0, 1]"));
        }

        if let Some((width, height)) = self.canvas_size {
            if width == 0 || height == 0 {
                return Err(Error::invalid_config("canvas size must be non-zero"));
            }
            if width > MAX_CANVAS_DIMENSION || height > MAX_CANVAS_DIMENSION {
                return Err(Error::invalid_config("canvas size exceeds 16384 pixels"));
            }
        }

        Ok(())
    }

    /// Configured canvas size as viewport dimensions.
    pub fn canvas_dimensions(&self) -> Option<(i32, i32)> {
        self.canvas_size.map(|(width, height)| {
            let width = width.min(MAX_CANVAS_DIMENSION) as i32;
            let height = height.min(MAX_CANVAS_DIMENSION) as i32;
            (width, height)
        })
    }

    pub fn clear_color_rgb(&self) -> (f32, f32, f32) {
        let [r, g, b] = self.clear_color;
        (r, g, b)
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), Error> {
        let position = self.position.to_array();
        if position.iter().any(|c| !c.is_finite()) {
            return Err(Error::invalid_config("camera position must be finite"));
        }

        if !self.yaw_degrees.is_finite() || !self.pitch_degrees.is_finite() {
            return Err(Error::invalid_config("camera angles must be finite"));
        }

        if !is_positive(self.look_sensitivity) {
            return Err(Error::invalid_config("look sensitivity must be positive"));
        }

        if !is_positive(self.move_speed) {
            return Err(Error::invalid_config("move speed must be positive"));
        }

        if let Some(limit) = self.pitch_limit_degrees {
            if !in_open_range(limit, 0.0, 90.0) {
                return Err(Error::invalid_config("pitch limit must be between 0 and 90 degrees"));
            }
        }

        Ok(())
    }

    /// Creates the camera described by this configuration.
    pub fn build(&self) -> Camera {
        Camera::new(self.position, self.yaw_degrees.to_radians(), self.pitch_degrees.to_radians())
            .with_look_sensitivity(self.look_sensitivity)
            .with_move_speed(self.move_speed)
            .with_pitch_limit(self.pitch_limit_degrees.map(f32::to_radians))
    }
}

impl ProjectionConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if !in_open_range(self.fov_y_degrees, 0.0, 180.0) {
            return Err(Error::invalid_config("vertical field of view must be between 0 and 180 degrees"));
        }

        if !is_positive(self.near) {
            return Err(Error::invalid_config("near plane must be positive"));
        }

        if self.far.is_nan() || self.far <= self.near {
            return Err(Error::invalid_config("far plane must lie beyond the near plane"));
        }

        Ok(())
    }

    /// Projection matrix for the given viewport aspect ratio.
    pub fn matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective(self.fov_y_degrees.to_radians(), aspect_ratio, self.near, self.far)
    }
}

/// Canvas size filling a browser window of the given inner size, rounded and
/// kept within `[1, MAX_CANVAS_DIMENSION]`.
pub fn window_canvas_size(inner_width: f64, inner_height: f64) -> (i32, i32) {
    // NaN casts to 0
    let fit = |v: f64| (v.round() as i32).clamp(1, MAX_CANVAS_DIMENSION as i32);
    (fit(inner_width), fit(inner_height))
}

// NaN fails both checks
fn is_positive(value: f32) -> bool {
    value > 0.0
}

fn in_open_range(value: f32, low: f32, high: f32) -> bool {
    value > low && value < high
}

#[cfg(test)]
mod tests {
    use cubecam_math::{approx_eq, EPSILON};

    use super::*;

    #[test]
    fn test_defaults_match_startup_scene() {
        let config = SceneConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.camera.position, Vec3::new(0.0, 0.0, 4.0));
        assert_eq!(config.camera.yaw_degrees, -90.0);
        assert_eq!(config.projection, ProjectionConfig { fov_y_degrees: 45.0, near: 0.1, far: 100.0 });
        assert_eq!(config.clear_color_rgb(), (0.1, 0.1, 0.1));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "camera": { "move_speed": 5.0, "pitch_limit_degrees": 89.0 },
            "projection": { "fov_y_degrees": 60.0 },
            "canvas_size": [1024, 1024]
        }"#;

        let config = SceneConfig::from_json(json).unwrap();
        assert_eq!(config.camera.move_speed, 5.0);
        assert_eq!(config.camera.pitch_limit_degrees, Some(89.0));
        assert_eq!(config.camera.look_sensitivity, DEFAULT_LOOK_SENSITIVITY);
        assert_eq!(config.projection.fov_y_degrees, 60.0);
        assert_eq!(config.projection.far, 100.0);
        assert_eq!(config.canvas_size, Some((1024, 1024)));
    }

    #[test]
    fn test_camera_position_from_json() {
        let json = r#"{ "camera": { "position": { "x": 1.0, "y": 2.0, "z": 3.0 } } }"#;

        let config = SceneConfig::from_json(json).unwrap();
        assert_eq!(config.camera.build().position(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_malformed_json_is_a_data_error() {
        let err = SceneConfig::from_json("{ \"camera\": 3 }").unwrap_err();
        assert!(matches!(err, Error::Data(_)));
    }

    #[test]
    fn test_invalid_projection_ranges() {
        let mut projection = ProjectionConfig::default();
        projection.far = projection.near;
        assert!(projection.validate().is_err());

        let projection = ProjectionConfig { near: 0.0, ..ProjectionConfig::default() };
        assert!(projection.validate().is_err());

        let projection = ProjectionConfig { fov_y_degrees: 180.0, ..ProjectionConfig::default() };
        assert!(projection.validate().is_err());

        let projection = ProjectionConfig { far: f32::NAN, ..ProjectionConfig::default() };
        assert!(projection.validate().is_err());

        let projection = ProjectionConfig { fov_y_degrees: f32::NAN, ..ProjectionConfig::default() };
        assert!(projection.validate().is_err());
    }

    #[test]
    fn test_invalid_camera_settings() {
        let camera = CameraConfig { move_speed: 0.0, ..CameraConfig::default() };
        assert!(camera.validate().is_err());

        let camera = CameraConfig { look_sensitivity: f32::NAN, ..CameraConfig::default() };
        assert!(camera.validate().is_err());

        let camera = CameraConfig { pitch_limit_degrees: Some(90.0), ..CameraConfig::default() };
        assert!(camera.validate().is_err());

        let camera = CameraConfig { pitch_limit_degrees: Some(f32::NAN), ..CameraConfig::default() };
        assert!(camera.validate().is_err());
    }

    #[test]
    fn test_invalid_config_rejected_by_from_json() {
        let err = SceneConfig::from_json(r#"{ "projection": { "near": 10.0, "far": 1.0 } }"#)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Data error: Invalid configuration: far plane must lie beyond the near plane"
        );

        assert!(SceneConfig::from_json(r#"{ "clear_color": [1.5, 0.0, 0.0] }"#).is_err());
        assert!(SceneConfig::from_json(r#"{ "canvas_size": [0, 600] }"#).is_err());
        assert!(SceneConfig::from_json(r#"{ "canvas_size": [4294967295, 600] }"#).is_err());
    }

    #[test]
    fn test_canvas_dimensions_never_wrap() {
        let config = SceneConfig { canvas_size: Some((1024, 768)), ..SceneConfig::default() };
        assert_eq!(config.canvas_dimensions(), Some((1024, 768)));

        let config = SceneConfig { canvas_size: Some((u32::MAX, 1)), ..SceneConfig::default() };
        assert_eq!(config.canvas_dimensions(), Some((MAX_CANVAS_DIMENSION as i32, 1)));

        assert_eq!(SceneConfig::default().canvas_dimensions(), None);
    }

    #[test]
    fn test_window_canvas_size() {
        assert_eq!(window_canvas_size(1280.0, 719.6), (1280, 720));
        assert_eq!(window_canvas_size(0.0, -20.0), (1, 1));
        assert_eq!(window_canvas_size(1.0e9, f64::NAN), (MAX_CANVAS_DIMENSION as i32, 1));
    }

    #[test]
    fn test_camera_config_builds_configured_camera() {
        let config = CameraConfig {
            pitch_degrees: 10.0,
            pitch_limit_degrees: Some(5.0),
            ..CameraConfig::default()
        };

        let camera = config.build();
        assert!(approx_eq(camera.pitch(), 5.0_f32.to_radians(), EPSILON));
        assert!(approx_eq(camera.yaw(), (-90.0_f32).to_radians(), EPSILON));
    }

    #[test]
    fn test_projection_matrix_uses_radians() {
        let projection = ProjectionConfig { fov_y_degrees: 90.0, near: 0.1, far: 100.0 };
        let m = projection.matrix(1.0);

        assert!(approx_eq(m[0][0], 1.0, EPSILON));
        assert!(approx_eq(m[1][1], 1.0, EPSILON));
        assert_eq!(m[2][3], -1.0);
    }
}
