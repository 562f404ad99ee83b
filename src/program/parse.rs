//! Token list to [`Program`].
//!
//! The whole program is parsed before anything runs, so a malformed tail never leaves behind
//! half-written outputs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{ImgOpError, ImgOpResult};
use crate::linalg::{mat4::Mat4, vec4::Vec4};
use crate::program::op::{BinOp, ClampKind, Op, Program};

/// Parse whitespace-free tokens into a program.
pub fn parse_tokens<S: AsRef<str>>(tokens: &[S]) -> ImgOpResult<Program> {
    let mut cursor = Cursor { tokens, pos: 0 };
    let mut ops = Vec::new();

    while let Some((at, tok)) = cursor.next() {
        let mut chars = tok.chars();
        let (Some(cmd), None) = (chars.next(), chars.next()) else {
            return Err(ImgOpError::program(format!(
                "token {at}: expected a single-character opcode, got '{tok}'"
            )));
        };

        let op = match cmd {
            'a' | '+' => Op::Binary(BinOp::Add),
            's' | '-' => Op::Binary(BinOp::Sub),
            'm' | '*' => Op::Binary(BinOp::Mul),
            'd' | '/' => Op::Binary(BinOp::Div),
            'p' | '^' => Op::Binary(BinOp::Pow),
            'c' => Op::Clamp(ClampKind::Min),
            'C' => Op::Clamp(ClampKind::Max),
            'u' => Op::Duplicate,
            'w' => Op::Swap,
            'n' => Op::PushScalar(cursor.float(cmd)?),
            'v' => {
                let mut v = [0.0f32; 4];
                for slot in v.iter_mut() {
                    *slot = cursor.float(cmd)?;
                }
                Op::PushVector(Vec4(v))
            }
            'x' => {
                let mut m = [0.0f32; 16];
                for slot in m.iter_mut() {
                    *slot = cursor.float(cmd)?;
                }
                Op::PushMatrix(Mat4(m))
            }
            'i' => Op::Load(cursor.path(cmd)?),
            'o' => Op::Store(cursor.path(cmd)?),
            other => {
                return Err(ImgOpError::program(format!(
                    "token {at}: unknown command '{other}'"
                )));
            }
        };
        ops.push(op);
    }

    Ok(Program::from_ops(ops))
}

/// Split script text into whitespace-separated tokens.
///
/// A token starting with `#` begins a comment that runs to the end of the line; a `#` inside a
/// token (`img#1.png`) is kept. Tokens cannot contain whitespace, so paths with spaces must be
/// passed as command-line tokens instead.
pub fn tokenize_script(src: &str) -> Vec<String> {
    src.lines()
        .flat_map(|line| {
            line.split_whitespace()
                .take_while(|tok| !tok.starts_with('#'))
        })
        .map(str::to_owned)
        .collect()
}

impl Program {
    /// Parse a program from script text, see [`tokenize_script`].
    pub fn from_script(src: &str) -> ImgOpResult<Self> {
        parse_tokens(&tokenize_script(src))
    }

    /// Parse a program from a script file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ImgOpResult<Self> {
        let path = path.as_ref();
        let src = fs::read_to_string(path)
            .with_context(|| format!("read script '{}'", path.display()))
            .map_err(ImgOpError::io)?;
        Self::from_script(&src)
    }
}

struct Cursor<'a, S> {
    tokens: &'a [S],
    pos: usize,
}

impl<'a, S: AsRef<str>> Cursor<'a, S> {
    fn next(&mut self) -> Option<(usize, &'a str)> {
        let tok = self.tokens.get(self.pos)?;
        let at = self.pos;
        self.pos += 1;
        Some((at, tok.as_ref()))
    }

    fn operand(&mut self, cmd: char, what: &str) -> ImgOpResult<(usize, &'a str)> {
        self.next().ok_or_else(|| {
            ImgOpError::program(format!(
                "token {}: '{cmd}' expects {what}, but the program ended",
                self.pos
            ))
        })
    }

    fn float(&mut self, cmd: char) -> ImgOpResult<f32> {
        let (at, tok) = self.operand(cmd, "a number")?;
        tok.parse::<f32>().map_err(|e| {
            ImgOpError::program(format!(
                "token {at}: '{cmd}' expects a number, got '{tok}' ({e})"
            ))
        })
    }

    fn path(&mut self, cmd: char) -> ImgOpResult<PathBuf> {
        let (_, tok) = self.operand(cmd, "a path")?;
        Ok(PathBuf::from(tok))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/program/parse.rs"]
mod tests;
