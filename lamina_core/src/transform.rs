// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal column-major 4×4 transform.
//!
//! This type covers the subset of 3-D affine transforms that the layer tree
//! and the draw pass need (identity, translation, scale, shear, rotation,
//! multiply, orthographic projection) without pulling in a full
//! linear-algebra crate.
//!
//! All constructors agree on one convention: `cols[c][r]` is the element in
//! column `c`, row `r`, and points are column vectors multiplied on the
//! right, so `a * b` applies `b` first.

use core::ops::Mul;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A column-major 4×4 affine transform stored as `[[f64; 4]; 4]`.
///
/// Each inner array is one *column* of the matrix, matching the memory layout
/// GPU APIs expect for `mat4x4` uniforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// The 4×4 matrix with every element set to zero.
    pub const ZERO: Self = Self {
        cols: [[0.0; 4]; 4],
    };

    /// Creates a transform from four column arrays.
    #[inline]
    #[must_use]
    pub const fn from_cols(col0: [f64; 4], col1: [f64; 4], col2: [f64; 4], col3: [f64; 4]) -> Self {
        Self {
            cols: [col0, col1, col2, col3],
        }
    }

    /// Returns column `i` (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    #[must_use]
    pub const fn col(self, i: usize) -> [f64; 4] {
        self.cols[i]
    }

    /// Creates a pure translation transform.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Creates a non-uniform scale transform.
    #[inline]
    #[must_use]
    pub const fn from_scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            cols: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, sz, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a shear transform.
    ///
    /// Each axis shears proportionally to the other two:
    /// `x' = x + sx·y + sx·z`, `y' = sy·x + y + sy·z`, `z' = sz·x + sz·y + z`.
    #[inline]
    #[must_use]
    pub const fn from_shear(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            cols: [
                [1.0, sy, sz, 0.0],
                [sx, 1.0, sz, 0.0],
                [sx, sy, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation around the X axis (radians).
    #[inline]
    #[must_use]
    pub fn from_rotation_x(radians: f64) -> Self {
        let (s, c) = sin_cos(radians);
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, c, s, 0.0],
                [0.0, -s, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation around the Y axis (radians).
    #[inline]
    #[must_use]
    pub fn from_rotation_y(radians: f64) -> Self {
        let (s, c) = sin_cos(radians);
        Self {
            cols: [
                [c, 0.0, -s, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [s, 0.0, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation around the Z axis (radians).
    ///
    /// With a top-left origin and Y pointing down, positive angles turn
    /// clockwise on screen.
    #[inline]
    #[must_use]
    pub fn from_rotation_z(radians: f64) -> Self {
        let (s, c) = sin_cos(radians);
        Self {
            cols: [
                [c, s, 0.0, 0.0],
                [-s, c, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation from per-axis angles (radians).
    ///
    /// The result is `Rx * Ry * Rz`, always composed in that order.
    #[inline]
    #[must_use]
    pub fn from_rotation(x: f64, y: f64, z: f64) -> Self {
        Self::IDENTITY * Self::from_rotation_x(x) * Self::from_rotation_y(y) * Self::from_rotation_z(z)
    }

    /// Creates an orthographic projection.
    ///
    /// Maps `left..right`, `top..bottom` and `near..far` onto `-1..1`. Passing
    /// `top < bottom` yields a Y-down projection.
    #[inline]
    #[must_use]
    pub fn orthographic(left: f64, right: f64, top: f64, bottom: f64, near: f64, far: f64) -> Self {
        Self {
            cols: [
                [2.0 / (right - left), 0.0, 0.0, 0.0],
                [0.0, 2.0 / (top - bottom), 0.0, 0.0],
                [0.0, 0.0, 2.0 / (far - near), 0.0],
                [
                    -(right + left) / (right - left),
                    -(top + bottom) / (top - bottom),
                    -(far + near) / (far - near),
                    1.0,
                ],
            ],
        }
    }

    /// Applies this transform to the point `(x, y, z, 1)`.
    ///
    /// The homogeneous `w` is dropped; every constructor here keeps it at 1.
    #[inline]
    #[must_use]
    pub fn transform_point(&self, x: f64, y: f64, z: f64) -> [f64; 3] {
        let c = &self.cols;
        [
            c[0][0] * x + c[1][0] * y + c[2][0] * z + c[3][0],
            c[0][1] * x + c[1][1] * y + c[2][1] * z + c[3][1],
            c[0][2] * x + c[1][2] * y + c[2][2] * z + c[3][2],
        ]
    }

    /// Returns the elements as sixteen `f32` values in column-major order,
    /// ready for upload as a `mat4x4<f32>`.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "GPU uniforms are single precision."
    )]
    pub fn to_cols_array_f32(&self) -> [f32; 16] {
        let mut out = [0.0_f32; 16];
        for (slot, v) in out.iter_mut().zip(self.cols.iter().flatten()) {
            *slot = *v as f32;
        }
        out
    }

    /// Is this transform [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|v| v.is_finite())
    }

    /// Is this transform [NaN]?
    ///
    /// [NaN]: f64::is_nan
    #[inline]
    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.cols.iter().flatten().any(|v| v.is_nan())
    }
}

impl Default for Transform3d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform3d {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let lhs = &self.cols;
        let mut cols = [[0.0_f64; 4]; 4];
        for (col, r) in cols.iter_mut().zip(&rhs.cols) {
            for (row, out) in col.iter_mut().enumerate() {
                *out = lhs[0][row] * r[0] + lhs[1][row] * r[1] + lhs[2][row] * r[2] + lhs[3][row] * r[3];
            }
        }
        Self { cols }
    }
}

#[inline]
fn sin_cos(radians: f64) -> (f64, f64) {
    #[cfg(feature = "std")]
    let (s, c) = radians.sin_cos();
    #[cfg(not(feature = "std"))]
    let (s, c) = (radians.sin(), radians.cos());
    (s, c)
}
