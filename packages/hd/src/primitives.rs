//! BLAKE2b keyed hash and HKDF bindings
//!
//! The derivation core only talks to these two functions.

use crate::{HdError, Result};
use blake2::Blake2b512;
use hkdf::SimpleHkdf;
use zeroize::Zeroizing;

/// Largest BLAKE2b digest and key length in bytes
pub const BLAKE2B_MAX_LEN: usize = 64;

/// Keyed BLAKE2b of `message` with a digest of `output_len` bytes.
///
/// An empty `key` gives the plain (unkeyed) hash.
///
/// # Errors
///
/// Returns `InvalidMacParameters` if `key` is longer than 64 bytes or
/// `output_len` is outside `1..=64`.
pub fn keyed_hash(message: &[u8], key: &[u8], output_len: usize) -> Result<Vec<u8>> {
    if key.len() > BLAKE2B_MAX_LEN || !(1..=BLAKE2B_MAX_LEN).contains(&output_len) {
        return Err(HdError::InvalidMacParameters {
            key_len: key.len(),
            output_len,
        });
    }

    Ok(blake2b_simd::Params::new()
        .hash_length(output_len)
        .key(key)
        .hash(message)
        .as_bytes()
        .to_vec())
}

/// HKDF extract-and-expand over BLAKE2b-512.
///
/// BLAKE2b buffers its final block lazily, so the simple HMAC construction
/// backs the extract step.
///
/// # Errors
///
/// Returns `KeyDerivation` if `output_len` exceeds 255 digest blocks.
pub fn hkdf(ikm: &[u8], salt: &[u8], info: &[u8], output_len: usize) -> Result<Zeroizing<Vec<u8>>> {
    let hk = SimpleHkdf::<Blake2b512>::new(Some(salt), ikm);
    let mut okm = Zeroizing::new(vec![0u8; output_len]);

    hk.expand(info, &mut okm)
        .map_err(|e| HdError::derivation(format!("HKDF-BLAKE2b expansion failed: {e}")))?;

    Ok(okm)
}
