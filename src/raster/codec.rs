use std::io::Cursor;

use anyhow::Context;

use crate::foundation::error::{ImgOpError, ImgOpResult};
use crate::raster::float_image::{Channel, FloatImage};

/// Map an 8-bit sample to the float range `[0, 1]`.
#[inline]
pub fn normalize(v: u8) -> f32 {
    f32::from(v) / 255.0
}

/// Map a float sample back to 8 bits.
///
/// Negative values reflect (`abs`) rather than clamp to zero, the result saturates at 255 and
/// rounds with `floor(x + 0.5)`. NaN maps to 0.
#[inline]
pub fn denormalize(v: f32) -> u8 {
    let mut x = v * 255.0;
    if x < 0.0 {
        x = -x;
    }
    if x > 255.0 {
        x = 255.0;
    }
    if x.is_nan() {
        return 0;
    }
    (x + 0.5).floor() as u8
}

impl FloatImage {
    /// Build a float image from interleaved RGBA8 samples.
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> ImgOpResult<Self> {
        let n = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| ImgOpError::validation("image dimensions overflow"))?;
        let bytes = n
            .checked_mul(4)
            .ok_or_else(|| ImgOpError::validation("image dimensions overflow"))?;
        if rgba.len() != bytes {
            return Err(ImgOpError::validation(format!(
                "expected {bytes} rgba8 bytes for {width}x{height}, got {}",
                rgba.len()
            )));
        }

        let mut planes: [Vec<f32>; 4] = std::array::from_fn(|_| Vec::with_capacity(n));
        for px in rgba.chunks_exact(4) {
            for (plane, &v) in planes.iter_mut().zip(px) {
                plane.push(normalize(v));
            }
        }
        FloatImage::from_planes(width, height, planes)
    }

    /// Quantize to interleaved RGBA8 samples using [`denormalize`].
    pub fn to_rgba8(&self) -> Vec<u8> {
        let [r, g, b, a] = Channel::ALL.map(|ch| self.plane(ch));
        let mut out = Vec::with_capacity(self.len() * 4);
        for i in 0..self.len() {
            out.extend_from_slice(&[
                denormalize(r[i]),
                denormalize(g[i]),
                denormalize(b[i]),
                denormalize(a[i]),
            ]);
        }
        out
    }
}

/// Decode any format the `image` crate recognizes into a float image.
pub fn decode_image(bytes: &[u8]) -> ImgOpResult<FloatImage> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(ImgOpError::io)?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    FloatImage::from_rgba8(width, height, rgba.as_raw())
}

/// Encode a float image as PNG bytes.
pub fn encode_png(img: &FloatImage) -> ImgOpResult<Vec<u8>> {
    let rgba = image::RgbaImage::from_raw(img.width(), img.height(), img.to_rgba8())
        .ok_or_else(|| ImgOpError::validation("rgba8 buffer does not match image dimensions"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(rgba)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")
        .map_err(ImgOpError::io)?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/codec.rs"]
mod tests;
