//! Byte normalization helpers
//!
//! Strings, integers and byte buffers all feed the derivation functions as
//! plain bytes. Strings that look like hex (even length, hex digits only)
//! are decoded as hex, everything else is taken as UTF-8 text.

use crate::{HdError, Result};
use serde_json::Value;

/// A value that can be normalized into bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteInput {
    /// Hex or UTF-8 text
    Text(String),
    /// Integer, encoded as its low 32 bits big-endian
    Integer(i64),
    /// Raw bytes, passed through
    Bytes(Vec<u8>),
}

impl From<&str> for ByteInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ByteInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ByteInput {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ByteInput {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for ByteInput {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u64> for ByteInput {
    fn from(value: u64) -> Self {
        // only the low 32 bits are ever encoded
        Self::Integer(value as i64)
    }
}

impl From<&[u8]> for ByteInput {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for ByteInput {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl<const N: usize> From<[u8; N]> for ByteInput {
    fn from(value: [u8; N]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for ByteInput {
    fn from(value: &[u8; N]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl TryFrom<&Value> for ByteInput {
    type Error = HdError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_u64().map(Self::from))
                .ok_or_else(|| HdError::InvalidInputType(format!("number {n}"))),
            Value::Null => Err(HdError::InvalidInputType("null".into())),
            Value::Bool(_) => Err(HdError::InvalidInputType("bool".into())),
            Value::Array(_) => Err(HdError::InvalidInputType("array".into())),
            Value::Object(_) => Err(HdError::InvalidInputType("object".into())),
        }
    }
}

fn is_hex(s: &str) -> bool {
    s.len() % 2 == 0 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Normalize a value into bytes
#[must_use]
pub fn to_bytes(value: impl Into<ByteInput>) -> Vec<u8> {
    match value.into() {
        ByteInput::Text(s) if is_hex(&s) => hex::decode(&s).unwrap_or_else(|_| s.into_bytes()),
        ByteInput::Text(s) => s.into_bytes(),
        ByteInput::Integer(n) => encode32(n).to_vec(),
        ByteInput::Bytes(b) => b,
    }
}

/// Low 32 bits of `n`, big-endian
#[must_use]
#[inline]
pub fn encode32(n: i64) -> [u8; 4] {
    // two's-complement truncation
    (n as u32).to_be_bytes()
}

/// `a` followed by `b` in a fresh buffer
#[must_use]
pub fn concat_bytes(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    out
}

/// Split `bytes` into consecutive, non-overlapping slices of the given sizes.
///
/// # Errors
///
/// Returns `InsufficientMaterial` if the sizes sum to more than `bytes.len()`.
pub fn split_ikm<'a>(bytes: &'a [u8], sizes: &[usize]) -> Result<Vec<&'a [u8]>> {
    let requested = sizes
        .iter()
        .try_fold(0usize, |acc, &n| acc.checked_add(n))
        .unwrap_or(usize::MAX);
    if requested > bytes.len() {
        return Err(HdError::InsufficientMaterial {
            requested,
            available: bytes.len(),
        });
    }

    let mut rest = bytes;
    let mut parts = Vec::with_capacity(sizes.len());
    for &size in sizes {
        let (head, tail) = rest.split_at(size);
        parts.push(head);
        rest = tail;
    }
    Ok(parts)
}
