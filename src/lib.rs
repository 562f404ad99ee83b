//! imgop is a small stack machine for image arithmetic.
//!
//! A program is a flat list of one-character commands in reverse Polish notation. Operands
//! are scalars, 4-component vectors, row-major 4x4 matrices and planar RGBA `f32` images;
//! the binary operators dispatch on the kinds of the two topmost operands.
//!
//! - Parse tokens or a script into a [`Program`]
//! - Create a [`Machine`] over an [`ImageStore`]
//! - [`Machine::run`] the program and inspect the [`RunReport`]
//!
//! Images are decoded into `[0, 1]` floats on load and quantized back to 8-bit on store
//! (see [`normalize`] and [`denormalize`]).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod linalg;
pub(crate) mod program;
pub(crate) mod raster;
pub(crate) mod stack;

pub use crate::foundation::error::{ImgOpError, ImgOpResult};

pub use crate::linalg::mat4::Mat4;
pub use crate::linalg::vec4::Vec4;
pub use crate::program::op::{BinOp, ClampKind, Op, Program};
pub use crate::program::parse::{parse_tokens, tokenize_script};
pub use crate::raster::codec::{decode_image, denormalize, encode_png, normalize};
pub use crate::raster::float_image::{Channel, FloatImage};
pub use crate::raster::store::{FsImageStore, ImageStore, InMemoryImageStore};
pub use crate::stack::dispatch::{Kernel, Unsupported, apply_binary, apply_clamp, resolve};
pub use crate::stack::machine::{
    DiscardedPair, EvalOpts, Machine, OperandStack, RunReport, RunSummary, UnsupportedPolicy,
};
pub use crate::stack::operand::{Operand, OperandKind, OperandSummary};
