mod matrix;
mod vector;
mod view;

pub use matrix::Mat4;
pub use vector::{Vec2, Vec3, Vec4};

/// Tolerance used when comparing floating point results.
pub const EPSILON: f32 = 1e-5;

/// Returns `true` if `a` and `b` differ by at most `tolerance`.
pub fn approx_eq(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}
