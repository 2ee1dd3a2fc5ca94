//! Immutable derived key records

use crate::fingerprint::{Fingerprint, verify_fp};
use crate::index::{ChildIndex, IndexInput};
use crate::path::DerivationPath;
use crate::{Result, derive};
use std::fmt;
use subtle::{Choice, ConstantTimeEq};
use zeroize::ZeroizeOnDrop;

/// Length of key material and chain codes in bytes
pub const KEY_LEN: usize = 32;

/// Path of every master record
pub const MASTER_PATH: &str = "m";

/// A node in the key tree
///
/// Records are only created by master or child derivation and never change
/// afterwards. Key material and chain code are wiped when the record drops.
#[derive(Clone, ZeroizeOnDrop)]
pub struct KeyRecord {
    key: [u8; KEY_LEN],
    code: [u8; KEY_LEN],
    depth: u32,
    path: String,
    fingerprint: Fingerprint,
}

impl KeyRecord {
    pub(crate) fn from_parts(
        key: &[u8],
        code: &[u8],
        depth: u32,
        path: String,
        fingerprint: Fingerprint,
    ) -> Self {
        let mut record = Self {
            key: [0u8; KEY_LEN],
            code: [0u8; KEY_LEN],
            depth,
            path,
            fingerprint,
        };
        record.key.copy_from_slice(key);
        record.code.copy_from_slice(code);
        record
    }

    /// Derive a master record from a secret with the standard domain.
    ///
    /// # Errors
    ///
    /// Propagates KDF failures.
    pub fn from_secret(secret: &[u8]) -> Result<Self> {
        derive::derive_master(secret)
    }

    /// Secret key material
    #[must_use]
    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    /// Chain code, used only to derive this record's children
    #[must_use]
    pub fn code(&self) -> &[u8; KEY_LEN] {
        &self.code
    }

    /// Number of derivation steps from the master record
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Derivation path, `m` for the master record
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fingerprint binding this record to its parent
    #[must_use]
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Whether this is a master record
    #[must_use]
    pub fn is_master(&self) -> bool {
        self.depth == 0
    }

    /// Hex-encoded key material
    #[must_use]
    pub fn key_hex(&self) -> String {
        hex::encode(self.key)
    }

    /// Hex-encoded chain code
    #[must_use]
    pub fn code_hex(&self) -> String {
        hex::encode(self.code)
    }

    /// Hex-encoded fingerprint
    #[must_use]
    pub fn fingerprint_hex(&self) -> String {
        hex::encode(self.fingerprint)
    }

    /// Derive the child at `index`
    ///
    /// # Errors
    ///
    /// Fails if the index does not resolve into the 31-bit range.
    pub fn derive(&self, index: impl Into<IndexInput>) -> Result<Self> {
        derive::derive_child(self, index)
    }

    /// Derive the descendant reached by `indices`
    ///
    /// # Errors
    ///
    /// `EmptyPath` if `indices` is empty.
    pub fn derive_path(&self, indices: &[ChildIndex]) -> Result<Self> {
        derive::derive_path(self, indices)
    }

    /// Parse a path such as `m/42/account` and derive along it from `self`
    ///
    /// # Errors
    ///
    /// `InvalidPath` or an index error for malformed paths, `EmptyPath`
    /// for a bare `m`.
    pub fn derive_path_str(&self, path: &str) -> Result<Self> {
        let parsed: DerivationPath = path.parse()?;
        self.derive_path(&parsed)
    }

    /// Whether `parent` is this record's immediate parent
    #[must_use]
    pub fn lineage(&self, parent: &KeyRecord) -> bool {
        verify_fp(self, parent)
    }
}

impl ConstantTimeEq for KeyRecord {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.key.as_slice().ct_eq(other.key.as_slice())
            & self.code.as_slice().ct_eq(other.code.as_slice())
            & self.fingerprint.as_slice().ct_eq(other.fingerprint.as_slice())
    }
}

impl PartialEq for KeyRecord {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other)) && self.depth == other.depth && self.path == other.path
    }
}

impl Eq for KeyRecord {}

impl fmt::Debug for KeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyRecord")
            .field("key", &"[REDACTED]")
            .field("code", &"[REDACTED]")
            .field("depth", &self.depth)
            .field("path", &self.path)
            .field("fingerprint", &self.fingerprint_hex())
            .finish()
    }
}
