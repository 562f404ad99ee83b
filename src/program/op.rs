use std::fmt;
use std::path::PathBuf;

use crate::linalg::{mat4::Mat4, vec4::Vec4};

/// Binary arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinOp {
    /// `a` / `+`
    Add,
    /// `s` / `-`
    Sub,
    /// `m` / `*`
    Mul,
    /// `d` / `/`
    Div,
    /// `p` / `^`
    Pow,
}

impl BinOp {
    /// Every binary operator, in opcode-table order.
    pub const ALL: [BinOp; 5] = [BinOp::Add, BinOp::Sub, BinOp::Mul, BinOp::Div, BinOp::Pow];

    /// Scalar meaning of the operator.
    pub fn apply_f32(self, a: f32, b: f32) -> f32 {
        match self {
            BinOp::Add => a + b,
            BinOp::Sub => a - b,
            BinOp::Mul => a * b,
            BinOp::Div => a / b,
            BinOp::Pow => crate::raster::float_image::pow_f32(a, b),
        }
    }

    /// Lowercase operator name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::Div => "div",
            BinOp::Pow => "pow",
        }
    }

    fn opcode(self) -> char {
        match self {
            BinOp::Add => 'a',
            BinOp::Sub => 's',
            BinOp::Mul => 'm',
            BinOp::Div => 'd',
            BinOp::Pow => 'p',
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which side of the range a clamp operator bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampKind {
    /// `c`: lower bound per channel, upper bound `f32::MAX`.
    Min,
    /// `C`: upper bound per channel, lower bound `-f32::MAX`.
    Max,
}

impl ClampKind {
    /// Operator name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ClampKind::Min => "clamp_min",
            ClampKind::Max => "clamp_max",
        }
    }
}

/// One parsed instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    /// `n <f>`
    PushScalar(f32),
    /// `v <f> <f> <f> <f>`
    PushVector(Vec4),
    /// `x <f>{16}`, row-major.
    PushMatrix(Mat4),
    /// `i <path>`
    Load(PathBuf),
    /// `o <path>`
    Store(PathBuf),
    /// `u`
    Duplicate,
    /// `w`
    Swap,
    /// `c` / `C`
    Clamp(ClampKind),
    /// Arithmetic.
    Binary(BinOp),
}

impl Op {
    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Op::PushScalar(_) => "push_scalar",
            Op::PushVector(_) => "push_vector",
            Op::PushMatrix(_) => "push_matrix",
            Op::Load(_) => "load",
            Op::Store(_) => "store",
            Op::Duplicate => "duplicate",
            Op::Swap => "swap",
            Op::Clamp(k) => k.name(),
            Op::Binary(b) => b.name(),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::PushScalar(s) => write!(f, "n {s}"),
            Op::PushVector(v) => {
                f.write_str("v")?;
                for c in v.as_array() {
                    write!(f, " {c}")?;
                }
                Ok(())
            }
            Op::PushMatrix(m) => {
                f.write_str("x")?;
                for c in m.as_array() {
                    write!(f, " {c}")?;
                }
                Ok(())
            }
            Op::Load(p) => write!(f, "i {}", p.display()),
            Op::Store(p) => write!(f, "o {}", p.display()),
            Op::Duplicate => f.write_str("u"),
            Op::Swap => f.write_str("w"),
            Op::Clamp(ClampKind::Min) => f.write_str("c"),
            Op::Clamp(ClampKind::Max) => f.write_str("C"),
            Op::Binary(b) => write!(f, "{}", b.opcode()),
        }
    }
}

/// A parsed program: the ops in execution order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub(crate) ops: Vec<Op>,
}

impl Program {
    /// Wrap an already-built op list.
    pub fn from_ops(ops: Vec<Op>) -> Self {
        Self { ops }
    }

    /// Borrow the ops.
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Number of ops.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` for an empty program.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{op}")?;
        }
        Ok(())
    }
}
