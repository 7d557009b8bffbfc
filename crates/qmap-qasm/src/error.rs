//! Error types for the QASM front-end and back-end.

use qmap_core::MapError;
use thiserror::Error;

/// Errors that can occur while parsing or remapping a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QasmError {
    /// Lexer error (invalid token).
    #[error("Lexer error at line {line}: {message}")]
    LexerError { line: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// Only `OPENQASM 2.x` is accepted.
    #[error("Invalid OPENQASM version: {0}")]
    InvalidVersion(String),

    /// A construct outside the supported subset.
    #[error("Unsupported at line {line}: {message}")]
    Unsupported { line: usize, message: String },

    /// Register element out of range.
    #[error("Index {index} out of bounds for register '{register}' of size {size}")]
    IndexOutOfBounds {
        register: String,
        index: u32,
        size: u32,
    },

    /// Broadcast operands of different register sizes.
    #[error("Register size mismatch: '{left}' has {left_size} elements, '{right}' has {right_size}")]
    SizeMismatch {
        left: String,
        left_size: usize,
        right: String,
        right_size: usize,
    },

    /// Placement or routing failed.
    #[error("Mapping error: {0}")]
    Map(#[from] MapError),
}

/// Result type for QASM operations.
pub type QasmResult<T> = Result<T, QasmError>;
