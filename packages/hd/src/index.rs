//! Child index resolution
//!
//! Indices are 31-bit unsigned integers. A token is resolved by one of three
//! rules: a decimal literal (`num`), a hashed alphabetic name (`str`), or
//! whichever of the two matches first (`any`).

use crate::primitives::keyed_hash;
use crate::{HdError, Result};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

static NUMERIC: OnceCell<Regex> = OnceCell::new();
static ALPHABETIC: OnceCell<Regex> = OnceCell::new();

/// Compile `pattern` into `cell` on first use and test `token` against it
pub(crate) fn pattern_matches(cell: &'static OnceCell<Regex>, pattern: &str, token: &str) -> Result<bool> {
    let regex = cell
        .get_or_try_init(|| Regex::new(pattern))
        .map_err(|e| HdError::InvalidPattern(e.to_string()))?;
    Ok(regex.is_match(token))
}

fn is_numeric(token: &str) -> Result<bool> {
    pattern_matches(&NUMERIC, r"^[0-9]+$", token)
}

fn is_alphabetic(token: &str) -> Result<bool> {
    pattern_matches(&ALPHABETIC, r"^[A-Za-z-]+$", token)
}

/// A validated child index in `[0, 2^31 - 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChildIndex(u32);

impl ChildIndex {
    /// Largest valid index, `2^31 - 1`
    pub const MAX: u32 = 0x7fff_ffff;

    /// Validate a raw integer as a child index
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `value` is negative or above [`Self::MAX`].
    pub fn new(value: i64) -> Result<Self> {
        u32::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX)
            .map(Self)
            .ok_or_else(|| HdError::out_of_range(value))
    }

    /// The index as an integer
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Four-byte big-endian encoding used in child salts
    #[must_use]
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl TryFrom<u32> for ChildIndex {
    type Error = HdError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(i64::from(value))
    }
}

impl TryFrom<i64> for ChildIndex {
    type Error = HdError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ChildIndex> for u32 {
    fn from(index: ChildIndex) -> Self {
        index.0
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which token forms [`get_index`] accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexMode {
    /// Decimal literal only
    Num,
    /// Alphabetic name only, hashed into range
    Str,
    /// Decimal literal, falling back to alphabetic name
    #[default]
    Any,
}

impl FromStr for IndexMode {
    type Err = HdError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "num" => Ok(Self::Num),
            "str" => Ok(Self::Str),
            "any" => Ok(Self::Any),
            other => Err(HdError::InvalidMode(other.to_owned())),
        }
    }
}

impl fmt::Display for IndexMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Num => "num",
            Self::Str => "str",
            Self::Any => "any",
        })
    }
}

/// An index as handed to child derivation: an integer or a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexInput {
    /// Integer index, range checked
    Number(i64),
    /// Alphabetic name, resolved with [`IndexMode::Str`]
    Name(String),
}

impl IndexInput {
    /// Resolve into a validated index
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` for numbers outside the 31-bit range and
    /// `InvalidStringIndex` for names that are not alphabetic.
    pub fn resolve(&self) -> Result<ChildIndex> {
        match self {
            Self::Number(n) => ChildIndex::new(*n),
            Self::Name(name) => get_index(name, IndexMode::Str),
        }
    }
}

impl From<ChildIndex> for IndexInput {
    fn from(index: ChildIndex) -> Self {
        Self::Number(i64::from(index.0))
    }
}

impl From<u32> for IndexInput {
    fn from(value: u32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<i32> for IndexInput {
    fn from(value: i32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<i64> for IndexInput {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for IndexInput {
    fn from(value: &str) -> Self {
        Self::Name(value.to_owned())
    }
}

impl From<String> for IndexInput {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

impl TryFrom<&Value> for IndexInput {
    type Error = HdError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Self::Name(s.clone())),
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Ok(Self::Number(i)),
                (None, Some(u)) => Err(HdError::out_of_range(u)),
                (None, None) => Err(HdError::InvalidIndex(n.to_string())),
            },
            other => Err(HdError::InvalidIndex(other.to_string())),
        }
    }
}

/// Hash a name into the index range.
///
/// Takes the first four bytes of the unkeyed 32-byte BLAKE2b digest of the
/// UTF-8 name as a big-endian `u32`, reduced modulo `2^31`.
///
/// # Errors
///
/// Propagates keyed-hash parameter errors, which the fixed 32-byte unkeyed
/// digest never triggers.
pub fn str_to_index(name: &str) -> Result<ChildIndex> {
    let digest = keyed_hash(name.as_bytes(), &[], 32)?;
    let head = [digest[0], digest[1], digest[2], digest[3]];
    Ok(ChildIndex(u32::from_be_bytes(head) & ChildIndex::MAX))
}

fn parse_numeric(token: &str) -> Result<ChildIndex> {
    // the pattern already guarantees digits, so a parse failure is overflow
    let value: u64 = token.parse().map_err(|_| HdError::out_of_range(token))?;
    i64::try_from(value)
        .map_err(|_| HdError::out_of_range(token))
        .and_then(ChildIndex::new)
}

/// Resolve a textual token into a child index under `mode`.
///
/// # Errors
///
/// - `InvalidNumericIndex` if `mode` is `Num` and the token is not decimal
/// - `InvalidStringIndex` if `mode` is `Str` and the token is not alphabetic
/// - `InvalidIndex` if `mode` is `Any` and the token is neither
/// - `IndexOutOfRange` if a decimal token exceeds `2^31 - 1`
pub fn get_index(token: &str, mode: IndexMode) -> Result<ChildIndex> {
    match mode {
        IndexMode::Num if is_numeric(token)? => parse_numeric(token),
        IndexMode::Num => Err(HdError::InvalidNumericIndex(token.to_owned())),
        IndexMode::Str if is_alphabetic(token)? => str_to_index(token),
        IndexMode::Str => Err(HdError::InvalidStringIndex(token.to_owned())),
        IndexMode::Any if is_numeric(token)? => parse_numeric(token),
        IndexMode::Any if is_alphabetic(token)? => str_to_index(token),
        IndexMode::Any => Err(HdError::InvalidIndex(token.to_owned())),
    }
}
