use std::ops::{Add, Div, Index, Mul, Sub};

/// Four `f32` components; `(R, G, B, A)` when used as a color constant.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec4(pub [f32; 4]);

impl Vec4 {
    /// Build a vector from its four components.
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self([x, y, z, w])
    }

    /// Vector with every component set to `s`.
    pub const fn splat(s: f32) -> Self {
        Self([s, s, s, s])
    }

    /// Borrow the components.
    pub fn as_array(&self) -> &[f32; 4] {
        &self.0
    }

    /// Componentwise sum.
    pub fn add(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a + b)
    }

    /// Componentwise difference.
    pub fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a - b)
    }

    /// Componentwise product.
    pub fn mul(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a * b)
    }

    /// Componentwise quotient. IEEE semantics on zero divisors.
    pub fn div(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a / b)
    }

    /// Multiply every component by `s`.
    pub fn scale(self, s: f32) -> Self {
        Self(self.0.map(|v| v * s))
    }

    fn zip(self, rhs: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        let [a0, a1, a2, a3] = self.0;
        let [b0, b1, b2, b3] = rhs.0;
        Self([f(a0, b0), f(a1, b1), f(a2, b2), f(a3, b3)])
    }
}

impl From<[f32; 4]> for Vec4 {
    fn from(v: [f32; 4]) -> Self {
        Self(v)
    }
}

impl Index<usize> for Vec4 {
    type Output = f32;

    fn index(&self, i: usize) -> &f32 {
        &self.0[i]
    }
}

impl Add for Vec4 {
    type Output = Vec4;

    fn add(self, rhs: Vec4) -> Vec4 {
        Vec4::add(self, rhs)
    }
}

impl Sub for Vec4 {
    type Output = Vec4;

    fn sub(self, rhs: Vec4) -> Vec4 {
        Vec4::sub(self, rhs)
    }
}

impl Mul for Vec4 {
    type Output = Vec4;

    fn mul(self, rhs: Vec4) -> Vec4 {
        Vec4::mul(self, rhs)
    }
}

impl Div for Vec4 {
    type Output = Vec4;

    fn div(self, rhs: Vec4) -> Vec4 {
        Vec4::div(self, rhs)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/linalg/vec4.rs"]
mod tests;
