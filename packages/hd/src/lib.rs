//! # Cyrup Hierarchical Symmetric Keys
//!
//! Deterministic trees of 32-byte symmetric keys derived from a single secret.
//!
//! A master record is derived from the secret; every other record is derived
//! from its parent and a 31-bit index. Each record carries a chain code for
//! further derivation, its depth, its path (`m/42/0`) and a fingerprint that
//! lets anyone holding the parent verify the child's lineage.
//!
//! ## Quick Start
//!
//! ```rust
//! use cryypt_hd::{derive_master, derive_child};
//!
//! # fn main() -> cryypt_hd::Result<()> {
//! let master = derive_master([0u8; 32])?;
//! let account = derive_child(&master, "account")?;
//! let leaf = account.derive(0u32)?;
//!
//! assert!(leaf.lineage(&account));
//! assert!(!leaf.lineage(&master));
//! assert_eq!(master.derive_path_str("m/account/0")?, leaf);
//! # Ok(())
//! # }
//! ```
//!
//! Key material is wiped when a [`KeyRecord`] drops. Copies taken through
//! [`KeyRecord::key`] or [`KeyRecord::key_hex`] are the caller's to dispose of.

pub mod bytes;
pub mod derive;
pub mod domain;
pub mod error;
pub mod fingerprint;
pub mod index;
pub mod path;
pub mod primitives;
pub mod record;

pub use bytes::{ByteInput, concat_bytes, split_ikm, to_bytes};
pub use derive::{Deriver, derive_child, derive_master, derive_path};
pub use domain::Domain;
pub use error::{HdError, Result};
pub use fingerprint::{Fingerprint, calc_salt, fingerprint, verify_fp};
pub use index::{ChildIndex, IndexInput, IndexMode, get_index, str_to_index};
pub use path::DerivationPath;
pub use record::KeyRecord;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ChildIndex, DerivationPath, Deriver, Domain, HdError, IndexMode, KeyRecord, Result,
        derive_child, derive_master, derive_path, verify_fp,
    };
}
