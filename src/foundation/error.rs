/// Convenience result type used across imgop.
pub type ImgOpResult<T> = Result<T, ImgOpError>;

/// Top-level error taxonomy used by evaluator and codec APIs.
#[derive(thiserror::Error, Debug)]
pub enum ImgOpError {
    /// Malformed token program (arity, numeric literal, unknown opcode).
    #[error("program error: {0}")]
    Program(String),

    /// An operator tried to pop from an empty stack.
    #[error("stack underflow: {0}")]
    StackUnderflow(String),

    /// Operand kinds with no entry in the dispatch table.
    #[error("unsupported operands: {0}")]
    UnsupportedOperands(String),

    /// Operand of the wrong kind for a non-arithmetic operator.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// Invalid user-provided data, such as mismatched plane lengths.
    #[error("validation error: {0}")]
    Validation(String),

    /// Image decode, encode or filesystem failure.
    #[error("io error: {0:#}")]
    Io(anyhow::Error),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImgOpError {
    /// Build a [`ImgOpError::Program`] value.
    pub fn program(msg: impl Into<String>) -> Self {
        Self::Program(msg.into())
    }

    /// Build a [`ImgOpError::StackUnderflow`] value.
    pub fn stack_underflow(msg: impl Into<String>) -> Self {
        Self::StackUnderflow(msg.into())
    }

    /// Build a [`ImgOpError::UnsupportedOperands`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedOperands(msg.into())
    }

    /// Build a [`ImgOpError::TypeMismatch`] value.
    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Self::TypeMismatch(msg.into())
    }

    /// Build a [`ImgOpError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Wrap a contextualized I/O or codec failure.
    pub fn io(err: impl Into<anyhow::Error>) -> Self {
        Self::Io(err.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
