//! Row-major 4x4 matrix. Element `(row, col)` lives at `m[row * 4 + col]`.

use std::ops::{Add, Mul, Sub};

use crate::linalg::vec4::Vec4;

/// Linear map on 4-vectors and RGBA color tuples.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Mat4(pub [f32; 16]);

impl Mat4 {
    /// Ones on the diagonal, zeros elsewhere.
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    /// Build a matrix from sixteen row-major elements.
    pub const fn from_rows(m: [f32; 16]) -> Self {
        Self(m)
    }

    /// The identity matrix.
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Element at `(row, col)`.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.0[row * 4 + col]
    }

    /// Borrow the row-major elements.
    pub fn as_array(&self) -> &[f32; 16] {
        &self.0
    }

    /// Elementwise sum.
    pub fn add(self, rhs: Self) -> Self {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o += r;
        }
        Self(out)
    }

    /// Elementwise difference.
    pub fn sub(self, rhs: Self) -> Self {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o -= r;
        }
        Self(out)
    }

    /// Multiply all sixteen elements by `s`.
    pub fn scale(self, s: f32) -> Self {
        Self(self.0.map(|v| v * s))
    }

    /// `out[i] = sum_j m[i*4+j] * v[j]`, accumulated left to right.
    pub fn mul_vec(self, v: Vec4) -> Vec4 {
        let mut out = [0.0f32; 4];
        for (i, o) in out.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for j in 0..4 {
                acc += self.at(i, j) * v[j];
            }
            *o = acc;
        }
        Vec4(out)
    }

    /// Standard row-major matrix product `self * rhs`.
    pub fn mul(self, rhs: Self) -> Self {
        let mut out = [0.0f32; 16];
        for row in 0..4 {
            for col in 0..4 {
                let mut acc = 0.0f32;
                for k in 0..4 {
                    acc += self.at(row, k) * rhs.at(k, col);
                }
                out[row * 4 + col] = acc;
            }
        }
        Self(out)
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[f32; 16]> for Mat4 {
    fn from(m: [f32; 16]) -> Self {
        Self(m)
    }
}

impl Add for Mat4 {
    type Output = Mat4;

    fn add(self, rhs: Mat4) -> Mat4 {
        Mat4::add(self, rhs)
    }
}

impl Sub for Mat4 {
    type Output = Mat4;

    fn sub(self, rhs: Mat4) -> Mat4 {
        Mat4::sub(self, rhs)
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        Mat4::mul(self, rhs)
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, rhs: Vec4) -> Vec4 {
        self.mul_vec(rhs)
    }
}

impl Mul<f32> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: f32) -> Mat4 {
        self.scale(rhs)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/linalg/mat4.rs"]
mod tests;
