//! Planar RGBA `f32` raster and its arithmetic kernels.
//!
//! Every operation returns a fresh [`FloatImage`]; inputs are never modified. Binary kernels
//! between two images combine only the top-left overlap and copy the rest of the left image.

use crate::foundation::error::{ImgOpError, ImgOpResult};
use crate::linalg::{mat4::Mat4, vec4::Vec4};

/// One of the four color planes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Red plane.
    R,
    /// Green plane.
    G,
    /// Blue plane.
    B,
    /// Alpha plane.
    A,
}

impl Channel {
    /// Planes in storage order.
    pub const ALL: [Channel; 4] = [Channel::R, Channel::G, Channel::B, Channel::A];

    fn index(self) -> usize {
        match self {
            Channel::R => 0,
            Channel::G => 1,
            Channel::B => 2,
            Channel::A => 3,
        }
    }
}

/// Width x height image with one dense row-major `f32` plane per channel.
///
/// Values are unbounded; `[0, 1]` maps to `[0, 255]` on import and export.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatImage {
    width: u32,
    height: u32,
    planes: [Vec<f32>; 4],
}

impl FloatImage {
    /// Image of the given size with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: Vec4) -> Self {
        let n = pixel_count(width, height);
        Self {
            width,
            height,
            planes: std::array::from_fn(|c| vec![rgba[c]; n]),
        }
    }

    /// Build an image from four raw planes in R, G, B, A order.
    pub fn from_planes(width: u32, height: u32, planes: [Vec<f32>; 4]) -> ImgOpResult<Self> {
        let n = pixel_count(width, height);
        for (ch, p) in Channel::ALL.iter().zip(planes.iter()) {
            if p.len() != n {
                return Err(ImgOpError::validation(format!(
                    "plane {ch:?} has {} samples, expected {width}x{height} = {n}",
                    p.len()
                )));
            }
        }
        Ok(Self {
            width,
            height,
            planes,
        })
    }

    /// Build an image by sampling `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Vec4) -> Self {
        let n = pixel_count(width, height);
        let mut planes: [Vec<f32>; 4] = std::array::from_fn(|_| Vec::with_capacity(n));
        for y in 0..height {
            for x in 0..width {
                let px = f(x, y);
                for (c, plane) in planes.iter_mut().enumerate() {
                    plane.push(px[c]);
                }
            }
        }
        Self {
            width,
            height,
            planes,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels (`width * height`).
    pub fn len(&self) -> usize {
        self.planes[0].len()
    }

    /// Returns `true` for zero-area images.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow one channel plane.
    pub fn plane(&self, ch: Channel) -> &[f32] {
        &self.planes[ch.index()]
    }

    /// RGBA values at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Vec4> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize) * (self.width as usize) + (x as usize);
        Some(Vec4(std::array::from_fn(|c| self.planes[c][i])))
    }

    /// Combine with `other` per channel over the top-left overlap.
    ///
    /// The result has `self`'s dimensions; pixels outside the overlap are copied from `self`.
    pub fn zip_with(&self, other: &FloatImage, f: impl Fn(f32, f32) -> f32) -> FloatImage {
        let mut out = self.clone();
        let dw = self.width.min(other.width) as usize;
        let dh = self.height.min(other.height) as usize;
        let sw = self.width as usize;
        let ow = other.width as usize;
        for (dst, src) in out.planes.iter_mut().zip(other.planes.iter()) {
            for y in 0..dh {
                let d = &mut dst[y * sw..y * sw + dw];
                let s = &src[y * ow..y * ow + dw];
                for (dv, &sv) in d.iter_mut().zip(s) {
                    *dv = f(*dv, sv);
                }
            }
        }
        out
    }

    /// Combine every pixel with the constant `rgba`, one component per channel.
    pub fn map_with(&self, rgba: Vec4, f: impl Fn(f32, f32) -> f32) -> FloatImage {
        let mut out = self.clone();
        for (c, plane) in out.planes.iter_mut().enumerate() {
            let k = rgba[c];
            for v in plane.iter_mut() {
                *v = f(*v, k);
            }
        }
        out
    }

    /// Per-channel sum over the overlap.
    pub fn add(&self, other: &FloatImage) -> FloatImage {
        self.zip_with(other, |a, b| a + b)
    }

    /// Per-channel difference over the overlap.
    pub fn sub(&self, other: &FloatImage) -> FloatImage {
        self.zip_with(other, |a, b| a - b)
    }

    /// Per-channel product over the overlap.
    pub fn mul(&self, other: &FloatImage) -> FloatImage {
        self.zip_with(other, |a, b| a * b)
    }

    /// Per-channel quotient over the overlap.
    pub fn div(&self, other: &FloatImage) -> FloatImage {
        self.zip_with(other, |a, b| a / b)
    }

    /// Per-channel `self^other` over the overlap.
    pub fn pow(&self, other: &FloatImage) -> FloatImage {
        self.zip_with(other, pow_f32)
    }

    /// Add `rgba` to every pixel.
    pub fn add_rgba(&self, rgba: Vec4) -> FloatImage {
        self.map_with(rgba, |a, b| a + b)
    }

    /// Subtract `rgba` from every pixel.
    pub fn sub_rgba(&self, rgba: Vec4) -> FloatImage {
        self.map_with(rgba, |a, b| a - b)
    }

    /// Multiply every pixel by `rgba` componentwise.
    pub fn mul_rgba(&self, rgba: Vec4) -> FloatImage {
        self.map_with(rgba, |a, b| a * b)
    }

    /// Divide every pixel by `rgba` componentwise.
    pub fn div_rgba(&self, rgba: Vec4) -> FloatImage {
        self.map_with(rgba, |a, b| a / b)
    }

    /// Raise every channel to the matching exponent in `rgba`.
    pub fn pow_rgba(&self, rgba: Vec4) -> FloatImage {
        self.map_with(rgba, pow_f32)
    }

    /// Transform each pixel's `(R, G, B, A)` tuple by the row-major matrix `m`.
    ///
    /// `R' = R*m0 + G*m1 + B*m2 + A*m3`, and rows 1..3 likewise for G', B', A'.
    pub fn color_transform(&self, m: &Mat4) -> FloatImage {
        let n = self.len();
        let mut planes: [Vec<f32>; 4] = std::array::from_fn(|_| Vec::with_capacity(n));
        let [r, g, b, a] = &self.planes;
        for i in 0..n {
            let (cr, cg, cb, ca) = (r[i], g[i], b[i], a[i]);
            for (row, plane) in planes.iter_mut().enumerate() {
                plane.push(
                    cr * m.at(row, 0) + cg * m.at(row, 1) + cb * m.at(row, 2) + ca * m.at(row, 3),
                );
            }
        }
        FloatImage {
            width: self.width,
            height: self.height,
            planes,
        }
    }

    /// Clamp each channel to `[lo[c], hi[c]]`.
    ///
    /// Applies `max` then `min` with NaN propagating, so NaN samples stay NaN.
    pub fn clamp(&self, lo: Vec4, hi: Vec4) -> FloatImage {
        let mut out = self.clone();
        for (c, plane) in out.planes.iter_mut().enumerate() {
            let (l, h) = (lo[c], hi[c]);
            for v in plane.iter_mut() {
                *v = nan_min(nan_max(*v, l), h);
            }
        }
        out
    }

    /// Clamp from below; the upper bound is `f32::MAX`, not infinity.
    pub fn clamp_min(&self, lo: Vec4) -> FloatImage {
        self.clamp(lo, Vec4::splat(f32::MAX))
    }

    /// Clamp from above; the lower bound is `-f32::MAX`, not negative infinity.
    pub fn clamp_max(&self, hi: Vec4) -> FloatImage {
        self.clamp(Vec4::splat(-f32::MAX), hi)
    }
}

/// `base^exp` evaluated in `f64` and rounded once back to `f32`.
pub(crate) fn pow_f32(base: f32, exp: f32) -> f32 {
    f64::from(base).powf(f64::from(exp)) as f32
}

fn pixel_count(width: u32, height: u32) -> usize {
    (width as usize) * (height as usize)
}

fn nan_max(a: f32, b: f32) -> f32 {
    if a.is_nan() || b.is_nan() {
        f32::NAN
    } else {
        a.max(b)
    }
}

fn nan_min(a: f32, b: f32) -> f32 {
    if a.is_nan() || b.is_nan() {
        f32::NAN
    } else {
        a.min(b)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/float_image.rs"]
mod tests;
