//! Error handling for hierarchical key derivation

use thiserror::Error;

/// Derivation errors
///
/// Every variant is a caller or input error. None of them are transient and
/// none are retried. A failed lineage check is not an error, it is `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HdError {
    /// Value cannot be normalized into bytes
    #[error("Invalid input type: expected string, integer or bytes, got {0}")]
    InvalidInputType(String),

    /// Split sizes exceed the available material
    #[error("Insufficient material: requested {requested} bytes, {available} available")]
    InsufficientMaterial {
        /// Total bytes requested by the split
        requested: usize,
        /// Bytes actually available
        available: usize,
    },

    /// Index resolution mode is not one of `num`, `str`, `any`
    #[error("Invalid index mode: {0}")]
    InvalidMode(String),

    /// Token is not a decimal literal
    #[error("Invalid numeric index: {0:?}")]
    InvalidNumericIndex(String),

    /// Token is not an alphabetic name
    #[error("Invalid string index: {0:?}")]
    InvalidStringIndex(String),

    /// Token matches neither the numeric nor the alphabetic form
    #[error("Invalid index: {0}")]
    InvalidIndex(String),

    /// Index lies outside `[0, 2^31 - 1]`
    #[error("Index out of range: {0} (expected 0..=2147483647)")]
    IndexOutOfRange(String),

    /// Path derivation was given no indices
    #[error("Empty derivation path")]
    EmptyPath,

    /// Path string does not match `m(/segment)*`
    #[error("Invalid derivation path: {0:?}")]
    InvalidPath(String),

    /// The KDF rejected its parameters
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// Keyed hash called with a key over 64 bytes or a length outside `1..=64`
    #[error("Invalid MAC parameters: key of {key_len} bytes, output of {output_len} bytes")]
    InvalidMacParameters {
        /// Key length in bytes
        key_len: usize,
        /// Requested digest length in bytes
        output_len: usize,
    },

    /// A token pattern failed to compile
    #[error("Invalid token pattern: {0}")]
    InvalidPattern(String),
}

impl HdError {
    /// Create an `IndexOutOfRange` error from any displayable value
    pub fn out_of_range(value: impl std::fmt::Display) -> Self {
        Self::IndexOutOfRange(value.to_string())
    }

    /// Create a `KeyDerivation` error
    pub fn derivation(msg: impl Into<String>) -> Self {
        Self::KeyDerivation(msg.into())
    }
}

/// Result type for derivation operations
pub type Result<T> = std::result::Result<T, HdError>;
