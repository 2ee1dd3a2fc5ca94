//! Master, child and path derivation
//!
//! Master derivation draws entropy from the secret and salts with a
//! secret-derived salt. Child derivation draws entropy from the parent's
//! chain code and salts with `parent.key || index`, so a leaked chain code
//! alone cannot forge fingerprints.

use crate::bytes::{ByteInput, concat_bytes, split_ikm, to_bytes};
use crate::domain::Domain;
use crate::fingerprint::{Fingerprint, fingerprint_in, salt_in, verify_in};
use crate::index::{ChildIndex, IndexInput};
use crate::path::DerivationPath;
use crate::primitives::hkdf;
use crate::record::{KEY_LEN, KeyRecord, MASTER_PATH};
use crate::{HdError, Result};
use tracing::{debug, trace};
use zeroize::Zeroizing;

const IKM_LEN: usize = 2 * KEY_LEN;

/// Derivation context bound to one [`Domain`]
///
/// The free functions in this module use [`Deriver::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deriver {
    domain: Domain,
}

impl Deriver {
    /// Create a deriver for `domain`
    #[must_use]
    pub fn new(domain: Domain) -> Self {
        Self { domain }
    }

    /// The labels this deriver uses
    #[must_use]
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Salt for `input` under this domain
    ///
    /// # Errors
    ///
    /// Returns `InvalidMacParameters` if the domain's salt label is longer
    /// than 64 bytes.
    pub fn salt(&self, input: &[u8]) -> Result<Vec<u8>> {
        salt_in(&self.domain, input)
    }

    /// Fingerprint binding `child_key` to `parent_key` under this domain
    ///
    /// # Errors
    ///
    /// Propagates KDF failures.
    pub fn fingerprint(&self, parent_key: &[u8], child_key: &[u8]) -> Result<Fingerprint> {
        fingerprint_in(&self.domain, parent_key, child_key)
    }

    /// Derive the master record for `secret`.
    ///
    /// Hex strings are decoded, other strings are taken as UTF-8, integers as
    /// four big-endian bytes.
    ///
    /// # Errors
    ///
    /// Propagates KDF failures.
    pub fn master(&self, secret: impl Into<ByteInput>) -> Result<KeyRecord> {
        let secret = Zeroizing::new(to_bytes(secret));

        let salt = salt_in(&self.domain, &secret)?;
        let ikm = hkdf(&secret, &salt, self.domain.master_info(), IKM_LEN)?;
        let (key, code) = split_pair(&ikm)?;
        let fp = fingerprint_in(&self.domain, &secret, key)?;

        debug!("derived master key");
        Ok(KeyRecord::from_parts(key, code, 0, MASTER_PATH.to_owned(), fp))
    }

    /// Derive the child of `parent` at `index`.
    ///
    /// Integer indices must lie in `[0, 2^31 - 1]`; names are hashed into
    /// that range.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` or `InvalidStringIndex` for bad indices, or a KDF
    /// failure.
    pub fn child(&self, parent: &KeyRecord, index: impl Into<IndexInput>) -> Result<KeyRecord> {
        let index = index.into().resolve()?;
        self.child_at(parent, index)
    }

    fn child_at(&self, parent: &KeyRecord, index: ChildIndex) -> Result<KeyRecord> {
        let salt = Zeroizing::new(concat_bytes(parent.key(), &index.to_be_bytes()));
        let ikm = hkdf(parent.code(), &salt, self.domain.child_info(), IKM_LEN)?;
        let (key, code) = split_pair(&ikm)?;
        let fp = fingerprint_in(&self.domain, parent.key(), key)?;

        let depth = parent.depth() + 1;
        let path = format!("{}/{index}", parent.path());
        trace!(depth, path = %path, "derived child key");
        Ok(KeyRecord::from_parts(key, code, depth, path, fp))
    }

    /// Apply child derivation once per index, left to right.
    ///
    /// # Errors
    ///
    /// `EmptyPath` if `indices` is empty.
    pub fn path(&self, start: &KeyRecord, indices: &[ChildIndex]) -> Result<KeyRecord> {
        let (first, rest) = indices.split_first().ok_or(HdError::EmptyPath)?;

        let mut current = self.child_at(start, *first)?;
        for index in rest {
            current = self.child_at(&current, *index)?;
        }
        debug!(steps = indices.len(), path = %current.path(), "derived path");
        Ok(current)
    }

    /// Parse `path` (`m/...`) and derive along it from `start`
    ///
    /// # Errors
    ///
    /// Path parsing errors, or `EmptyPath` for a bare `m`.
    pub fn path_str(&self, start: &KeyRecord, path: &str) -> Result<KeyRecord> {
        let parsed: DerivationPath = path.parse()?;
        self.path(start, &parsed)
    }

    /// Whether `candidate` carries a fingerprint derived from `parent`
    #[must_use]
    pub fn verify(&self, candidate: &KeyRecord, parent: &KeyRecord) -> bool {
        verify_in(&self.domain, candidate, parent)
    }
}

fn split_pair(ikm: &[u8]) -> Result<(&[u8], &[u8])> {
    match split_ikm(ikm, &[KEY_LEN, KEY_LEN])?.as_slice() {
        [key, code] => Ok((*key, *code)),
        _ => Err(HdError::InsufficientMaterial {
            requested: IKM_LEN,
            available: ikm.len(),
        }),
    }
}

/// Derive a master record with the standard domain
///
/// # Errors
///
/// Propagates KDF failures.
pub fn derive_master(secret: impl Into<ByteInput>) -> Result<KeyRecord> {
    Deriver::default().master(secret)
}

/// Derive a child record with the standard domain
///
/// # Errors
///
/// See [`Deriver::child`].
pub fn derive_child(parent: &KeyRecord, index: impl Into<IndexInput>) -> Result<KeyRecord> {
    Deriver::default().child(parent, index)
}

/// Derive along `indices` with the standard domain
///
/// # Errors
///
/// `EmptyPath` if `indices` is empty.
pub fn derive_path(start: &KeyRecord, indices: &[ChildIndex]) -> Result<KeyRecord> {
    Deriver::default().path(start, indices)
}
