use std::ops::{Index, IndexMut, Mul};

use crate::{Vec3, Vec4};

/// 4x4 matrix stored column-major, addressed as `m[column][row]`.
///
/// Follows the column-vector convention of OpenGL: `a * b` applies `b`
/// first, then `a`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    cols: [[f32; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4::from_cols([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    pub const ZERO: Mat4 = Mat4::from_cols([[0.0; 4]; 4]);

    pub const fn from_cols(cols: [[f32; 4]; 4]) -> Self {
        Self { cols }
    }

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Translation by `offset`.
    pub fn from_translation(offset: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m[3] = [offset.x, offset.y, offset.z, 1.0];
        m
    }

    /// Transforms a point (`w = 1`), without perspective division.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        (*self * point.extend(1.0)).truncate()
    }

    /// Column-major floats, as expected by `uniformMatrix4fv` with
    /// `transpose = false`.
    pub fn as_slice(&self) -> &[f32] {
        self.cols.as_flattened()
    }

    pub fn to_cols_array(&self) -> [[f32; 4]; 4] {
        self.cols
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Index<usize> for Mat4 {
    type Output = [f32; 4];

    fn index(&self, col: usize) -> &[f32; 4] {
        &self.cols[col]
    }
}

impl IndexMut<usize> for Mat4 {
    fn index_mut(&mut self, col: usize) -> &mut [f32; 4] {
        &mut self.cols[col]
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut result = Mat4::ZERO;
        for col in 0..4 {
            for row in 0..4 {
                result[col][row] = (0..4).map(|k| self[k][row] * rhs[col][k]).sum();
            }
        }
        result
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Vec4 {
        let row = |r: usize| {
            self[0][r] * v.x + self[1][r] * v.y + self[2][r] * v.z + self[3][r] * v.w
        };
        Vec4::new(row(0), row(1), row(2), row(3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Mat4 {
        Mat4::from_cols([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ])
    }

    #[test]
    fn test_identity_is_neutral() {
        let m = sample();
        assert_eq!(Mat4::identity() * m, m);
        assert_eq!(m * Mat4::identity(), m);
    }

    #[test]
    fn test_identity_layout() {
        let data = Mat4::identity();
        let expected = [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ];
        assert_eq!(data.as_slice(), &expected);
    }

    #[test]
    fn test_multiply_is_column_major_product() {
        let a = sample();
        let b = Mat4::from_cols([
            [2.0, 0.0, 0.0, 0.0],
            [0.0, 3.0, 0.0, 0.0],
            [0.0, 0.0, 4.0, 0.0],
            [1.0, 1.0, 1.0, 1.0],
        ]);

        let r = a * b;
        // R[col][row] = sum_k A[k][row] * B[col][k]
        assert_eq!(r[0], [2.0, 4.0, 6.0, 8.0]);
        assert_eq!(r[1], [15.0, 18.0, 21.0, 24.0]);
        assert_eq!(r[2], [36.0, 40.0, 44.0, 48.0]);
        assert_eq!(r[3], [28.0, 32.0, 36.0, 40.0]);
    }

    #[test]
    fn test_right_operand_applies_first() {
        let translate = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let scale = Mat4::from_cols([
            [2.0, 0.0, 0.0, 0.0],
            [0.0, 2.0, 0.0, 0.0],
            [0.0, 0.0, 2.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);

        let p = Vec3::new(1.0, 1.0, 1.0);
        assert_eq!((translate * scale).transform_point(p), Vec3::new(3.0, 2.0, 2.0));
        assert_eq!((scale * translate).transform_point(p), Vec3::new(4.0, 2.0, 2.0));
    }

    #[test]
    fn test_matrix_vector_product() {
        let v = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(v, Vec4::new(1.0, 2.0, 3.0, 1.0));

        let direction = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)) * Vec4::new(1.0, 0.0, 0.0, 0.0);
        assert_eq!(direction, Vec4::new(1.0, 0.0, 0.0, 0.0));
    }
}
