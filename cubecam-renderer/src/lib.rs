mod clock;
mod config;
mod error;
mod gl;
mod scene;

pub(crate) mod js;

pub mod camera;
pub mod input;
#[cfg(feature = "js-api")]
pub mod wasm;

pub use ::cubecam_math::{Mat4, Vec2, Vec3, Vec4};
pub use camera::{Camera, Movement};
pub use clock::FrameClock;
pub use config::{
    window_canvas_size, CameraConfig, ProjectionConfig, SceneConfig, MAX_CANVAS_DIMENSION,
};
pub use scene::*;

pub use crate::{
    error::Error,
    gl::{
        load_stage_sources, CubeMesh, EmbeddedSource, FileSystemSource, LoadedStage, Renderer,
        ShaderBackend, ShaderDiagnostic, ShaderPaths, ShaderProgram, ShaderSource, StageKind,
        CUBE_FRAGMENT_PATH, CUBE_VERTEX_PATH, CUBE_VERTICES,
    },
};
