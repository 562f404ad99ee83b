use std::fmt;
use std::sync::Arc;

use crate::linalg::{mat4::Mat4, vec4::Vec4};
use crate::raster::float_image::FloatImage;

/// A value on the operand stack.
///
/// Images sit behind an [`Arc`] so `duplicate` can share one immutable raster between two
/// stack slots; no operation ever writes through it.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    /// A single `f32`.
    Scalar(f32),
    /// Four components, RGBA when used as a color.
    Vector(Vec4),
    /// Row-major 4x4 matrix.
    Matrix(Mat4),
    /// Planar RGBA float image.
    Image(Arc<FloatImage>),
}

/// Fieldless tag of an [`Operand`]; the dispatch table is keyed on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandKind {
    /// [`Operand::Scalar`]
    Scalar,
    /// [`Operand::Vector`]
    Vector,
    /// [`Operand::Matrix`]
    Matrix,
    /// [`Operand::Image`]
    Image,
}

impl OperandKind {
    /// Every kind.
    pub const ALL: [OperandKind; 4] = [
        OperandKind::Scalar,
        OperandKind::Vector,
        OperandKind::Matrix,
        OperandKind::Image,
    ];

    /// Lowercase name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            OperandKind::Scalar => "scalar",
            OperandKind::Vector => "vector",
            OperandKind::Matrix => "matrix",
            OperandKind::Image => "image",
        }
    }
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Operand {
    /// Tag of this operand.
    pub fn kind(&self) -> OperandKind {
        match self {
            Operand::Scalar(_) => OperandKind::Scalar,
            Operand::Vector(_) => OperandKind::Vector,
            Operand::Matrix(_) => OperandKind::Matrix,
            Operand::Image(_) => OperandKind::Image,
        }
    }

    /// Wrap an owned image.
    pub fn image(img: FloatImage) -> Self {
        Operand::Image(Arc::new(img))
    }

    /// The scalar value, if this is a scalar.
    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            Operand::Scalar(s) => Some(*s),
            _ => None,
        }
    }

    /// The vector value, if this is a vector.
    pub fn as_vector(&self) -> Option<Vec4> {
        match self {
            Operand::Vector(v) => Some(*v),
            _ => None,
        }
    }

    /// The matrix value, if this is a matrix.
    pub fn as_matrix(&self) -> Option<Mat4> {
        match self {
            Operand::Matrix(m) => Some(*m),
            _ => None,
        }
    }

    /// The image, if this is an image.
    pub fn as_image(&self) -> Option<&FloatImage> {
        match self {
            Operand::Image(img) => Some(img),
            _ => None,
        }
    }

    /// Serializable description used by run reports.
    pub fn summary(&self) -> OperandSummary {
        match self {
            Operand::Scalar(s) => OperandSummary::Scalar { value: *s },
            Operand::Vector(v) => OperandSummary::Vector { value: *v.as_array() },
            Operand::Matrix(m) => OperandSummary::Matrix { value: *m.as_array() },
            Operand::Image(img) => OperandSummary::Image {
                width: img.width(),
                height: img.height(),
            },
        }
    }
}

impl From<f32> for Operand {
    fn from(s: f32) -> Self {
        Operand::Scalar(s)
    }
}

impl From<Vec4> for Operand {
    fn from(v: Vec4) -> Self {
        Operand::Vector(v)
    }
}

impl From<Mat4> for Operand {
    fn from(m: Mat4) -> Self {
        Operand::Matrix(m)
    }
}

impl From<FloatImage> for Operand {
    fn from(img: FloatImage) -> Self {
        Operand::image(img)
    }
}

/// Pixel-free view of an operand for reports.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperandSummary {
    /// Scalar value.
    Scalar {
        /// The value.
        value: f32,
    },
    /// Vector components.
    Vector {
        /// The four components.
        value: [f32; 4],
    },
    /// Matrix elements, row-major.
    Matrix {
        /// The sixteen elements.
        value: [f32; 16],
    },
    /// Image dimensions only.
    Image {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
}

impl fmt::Display for OperandSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandSummary::Scalar { value } => write!(f, "scalar {value}"),
            OperandSummary::Vector { value } => write!(f, "vector {value:?}"),
            OperandSummary::Matrix { value } => write!(f, "matrix {value:?}"),
            OperandSummary::Image { width, height } => write!(f, "image {width}x{height}"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stack/operand.rs"]
mod tests;
