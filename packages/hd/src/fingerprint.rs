//! Salts and lineage fingerprints
//!
//! A fingerprint binds a child key to the key of its immediate parent:
//!
//! ```text
//! salt   = label || BLAKE2b-16(key = label, parent)
//! fp_key = HKDF(parent, salt, info = fingerprint label, 32)
//! fp     = BLAKE2b-16(key = fp_key, child)
//! ```
//!
//! Only key material enters the computation, never chain codes or paths.

use crate::domain::Domain;
use crate::primitives::{hkdf, keyed_hash};
use crate::record::KeyRecord;
use crate::Result;
use subtle::ConstantTimeEq;

/// Fingerprint length in bytes
pub const FINGERPRINT_LEN: usize = 16;

/// A lineage fingerprint
pub type Fingerprint = [u8; FINGERPRINT_LEN];

const SALT_MAC_LEN: usize = 16;
const FINGERPRINT_KEY_LEN: usize = 32;

pub(crate) fn salt_in(domain: &Domain, input: &[u8]) -> Result<Vec<u8>> {
    let label = domain.salt_label();
    let mac = keyed_hash(input, label, SALT_MAC_LEN)?;

    let mut salt = Vec::with_capacity(label.len() + SALT_MAC_LEN);
    salt.extend_from_slice(label);
    salt.extend_from_slice(&mac);
    Ok(salt)
}

pub(crate) fn fingerprint_in(domain: &Domain, parent_key: &[u8], child_key: &[u8]) -> Result<Fingerprint> {
    let salt = salt_in(domain, parent_key)?;
    let fp_key = hkdf(parent_key, &salt, domain.fingerprint_info(), FINGERPRINT_KEY_LEN)?;
    let mac = keyed_hash(child_key, &fp_key, FINGERPRINT_LEN)?;

    let mut fp = [0u8; FINGERPRINT_LEN];
    fp.copy_from_slice(&mac);
    Ok(fp)
}

pub(crate) fn verify_in(domain: &Domain, child: &KeyRecord, parent: &KeyRecord) -> bool {
    let Ok(expected) = fingerprint_in(domain, parent.key(), child.key()) else {
        return false;
    };
    let verified: bool = expected.as_slice().ct_eq(child.fingerprint().as_slice()).into();
    tracing::trace!(child = %child.path(), parent = %parent.path(), verified, "lineage check");
    verified
}

/// Deterministic salt for `input`: the salt label followed by a 16-byte
/// keyed hash of `input` under that label.
///
/// # Errors
///
/// Propagates keyed-hash parameter errors, which the standard label never
/// triggers.
pub fn calc_salt(input: &[u8]) -> Result<Vec<u8>> {
    salt_in(&Domain::standard(), input)
}

/// Fingerprint binding `child_key` to `parent_key`
///
/// # Errors
///
/// Propagates KDF and keyed-hash failures, which do not occur for the fixed
/// lengths used here.
pub fn fingerprint(parent_key: &[u8], child_key: &[u8]) -> Result<Fingerprint> {
    fingerprint_in(&Domain::standard(), parent_key, child_key)
}

/// Check that `candidate` was derived from `parent`.
///
/// Recomputes the fingerprint from `parent`'s key and compares it with the
/// one carried by `candidate` in constant time over the full length.
#[must_use]
pub fn verify_fp(candidate: &KeyRecord, parent: &KeyRecord) -> bool {
    verify_in(&Domain::standard(), candidate, parent)
}
