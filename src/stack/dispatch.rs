//! Operator dispatch over operand kinds.
//!
//! [`resolve`] is the whole table: it maps `(op, o1 kind, o2 kind)` to the [`Kernel`] that
//! implements it, or `None` when the pair is unsupported. [`apply_binary`] runs the resolved
//! kernel on concrete operands. `o1` is the deeper stack slot, `o2` the top.

use std::fmt;

use crate::foundation::error::ImgOpError;
use crate::linalg::vec4::Vec4;
use crate::program::op::{BinOp, ClampKind};
use crate::raster::float_image::FloatImage;
use crate::stack::operand::{Operand, OperandKind};

/// The numeric routine selected for an operand pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kernel {
    /// Image with image, overlap rule.
    ImageImage,
    /// Image with a scalar broadcast to all four channels.
    ImageScalar,
    /// Image with a per-channel vector.
    ImageVector,
    /// Scalar below an image; computed as `image op scalar`.
    ScalarImage,
    /// Vector below an image; computed as `image op vector`.
    VectorImage,
    /// Plain `f32` arithmetic.
    ScalarScalar,
    /// Componentwise vector arithmetic.
    VectorVector,
    /// Vector divided by a scalar.
    VectorScalar,
    /// Matrix sum, difference or product.
    MatrixMatrix,
    /// Matrix-vector product.
    MatrixVector,
    /// Matrix scaled by a scalar (or its reciprocal).
    MatrixScalar,
    /// Per-pixel 4x4 color transform, either operand order.
    ColorTransform,
}

/// Look up the kernel for `o1 op o2`.
pub fn resolve(op: BinOp, o1: OperandKind, o2: OperandKind) -> Option<Kernel> {
    use BinOp::{Add, Div, Mul, Pow, Sub};
    use OperandKind::{Image, Matrix, Scalar, Vector};

    match (o1, o2) {
        (Image, Image) => Some(Kernel::ImageImage),
        (Image, Scalar) => Some(Kernel::ImageScalar),
        (Image, Vector) => Some(Kernel::ImageVector),
        (Image, Matrix) => (op == Mul).then_some(Kernel::ColorTransform),

        (Scalar, Image) => (op != Pow).then_some(Kernel::ScalarImage),
        (Vector, Image) => (op != Pow).then_some(Kernel::VectorImage),
        (Matrix, Image) => (op == Mul).then_some(Kernel::ColorTransform),

        (Scalar, Scalar) => Some(Kernel::ScalarScalar),
        (Vector, Vector) => (op != Pow).then_some(Kernel::VectorVector),
        (Vector, Scalar) => (op == Div).then_some(Kernel::VectorScalar),
        (Matrix, Matrix) => matches!(op, Add | Sub | Mul).then_some(Kernel::MatrixMatrix),
        (Matrix, Vector) => (op == Mul).then_some(Kernel::MatrixVector),
        (Matrix, Scalar) => matches!(op, Mul | Div).then_some(Kernel::MatrixScalar),

        (Scalar, Vector) | (Scalar, Matrix) | (Vector, Matrix) => None,
    }
}

/// An operator applied to operand kinds with no table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Unsupported {
    /// Operator name.
    pub op: &'static str,
    /// Kind of the deeper operand.
    pub o1: OperandKind,
    /// Kind of the top operand.
    pub o2: OperandKind,
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} and {}", self.op, self.o1, self.o2)
    }
}

impl From<Unsupported> for ImgOpError {
    fn from(u: Unsupported) -> Self {
        ImgOpError::unsupported(u.to_string())
    }
}

/// Apply `o1 op o2`.
pub fn apply_binary(op: BinOp, o1: Operand, o2: Operand) -> Result<Operand, Unsupported> {
    let unsupported = Unsupported {
        op: op.name(),
        o1: o1.kind(),
        o2: o2.kind(),
    };
    let kernel = resolve(op, o1.kind(), o2.kind()).ok_or(unsupported)?;

    let out = match (kernel, o1, o2) {
        (Kernel::ImageImage, Operand::Image(a), Operand::Image(b)) => {
            Operand::image(image_image(op, &a, &b))
        }
        (Kernel::ImageScalar, Operand::Image(img), Operand::Scalar(s))
        | (Kernel::ScalarImage, Operand::Scalar(s), Operand::Image(img)) => {
            Operand::image(image_rgba(op, &img, Vec4::splat(s)))
        }
        (Kernel::ImageVector, Operand::Image(img), Operand::Vector(v))
        | (Kernel::VectorImage, Operand::Vector(v), Operand::Image(img)) => {
            Operand::image(image_rgba(op, &img, v))
        }
        (Kernel::ColorTransform, Operand::Image(img), Operand::Matrix(m))
        | (Kernel::ColorTransform, Operand::Matrix(m), Operand::Image(img)) => {
            Operand::image(img.color_transform(&m))
        }
        (Kernel::ScalarScalar, Operand::Scalar(a), Operand::Scalar(b)) => {
            Operand::Scalar(op.apply_f32(a, b))
        }
        (Kernel::VectorVector, Operand::Vector(a), Operand::Vector(b)) => match op {
            BinOp::Add => Operand::Vector(a.add(b)),
            BinOp::Sub => Operand::Vector(a.sub(b)),
            BinOp::Mul => Operand::Vector(a.mul(b)),
            BinOp::Div => Operand::Vector(a.div(b)),
            BinOp::Pow => return Err(unsupported),
        },
        (Kernel::VectorScalar, Operand::Vector(v), Operand::Scalar(s)) => {
            Operand::Vector(v.scale(1.0 / s))
        }
        (Kernel::MatrixMatrix, Operand::Matrix(a), Operand::Matrix(b)) => match op {
            BinOp::Add => Operand::Matrix(a.add(b)),
            BinOp::Sub => Operand::Matrix(a.sub(b)),
            BinOp::Mul => Operand::Matrix(a.mul(b)),
            BinOp::Div | BinOp::Pow => return Err(unsupported),
        },
        (Kernel::MatrixVector, Operand::Matrix(m), Operand::Vector(v)) => {
            Operand::Vector(m.mul_vec(v))
        }
        (Kernel::MatrixScalar, Operand::Matrix(m), Operand::Scalar(s)) => match op {
            BinOp::Mul => Operand::Matrix(m.scale(s)),
            BinOp::Div => Operand::Matrix(m.scale(1.0 / s)),
            BinOp::Add | BinOp::Sub | BinOp::Pow => return Err(unsupported),
        },
        _ => return Err(unsupported),
    };
    Ok(out)
}

/// Apply a clamp. Only `(Image, Vector)` is accepted.
pub fn apply_clamp(kind: ClampKind, o1: Operand, o2: Operand) -> Result<Operand, Unsupported> {
    match (o1, o2) {
        (Operand::Image(img), Operand::Vector(bound)) => Ok(Operand::image(match kind {
            ClampKind::Min => img.clamp_min(bound),
            ClampKind::Max => img.clamp_max(bound),
        })),
        (o1, o2) => Err(Unsupported {
            op: kind.name(),
            o1: o1.kind(),
            o2: o2.kind(),
        }),
    }
}

fn image_image(op: BinOp, a: &FloatImage, b: &FloatImage) -> FloatImage {
    match op {
        BinOp::Add => a.add(b),
        BinOp::Sub => a.sub(b),
        BinOp::Mul => a.mul(b),
        BinOp::Div => a.div(b),
        BinOp::Pow => a.pow(b),
    }
}

fn image_rgba(op: BinOp, img: &FloatImage, rgba: Vec4) -> FloatImage {
    match op {
        BinOp::Add => img.add_rgba(rgba),
        BinOp::Sub => img.sub_rgba(rgba),
        BinOp::Mul => img.mul_rgba(rgba),
        BinOp::Div => img.div_rgba(rgba),
        BinOp::Pow => img.pow_rgba(rgba),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stack/dispatch.rs"]
mod tests;
