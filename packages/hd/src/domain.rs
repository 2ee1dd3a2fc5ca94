//! Domain separation labels
//!
//! Each derivation purpose feeds a distinct label into the KDF so that
//! structurally identical computations never collide across purposes.

use std::borrow::Cow;

/// Default label prefix
pub const DEFAULT_PREFIX: &str = "symmetric_hd";

/// Label set for one key tree
///
/// Two trees derived under different domains share no keys, even from the
/// same secret.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain {
    salt: Cow<'static, str>,
    master: Cow<'static, str>,
    child: Cow<'static, str>,
    fingerprint: Cow<'static, str>,
}

impl Domain {
    /// The `symmetric_hd/*` labels
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            salt: Cow::Borrowed("symmetric_hd/salt"),
            master: Cow::Borrowed("symmetric_hd/master"),
            child: Cow::Borrowed("symmetric_hd/child"),
            fingerprint: Cow::Borrowed("symmetric_hd/fingerprint"),
        }
    }

    /// Labels of the form `<prefix>/salt`, `<prefix>/master`, ...
    ///
    /// `with_prefix("symmetric_hd")` equals [`Domain::standard`].
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            salt: Cow::Owned(format!("{prefix}/salt")),
            master: Cow::Owned(format!("{prefix}/master")),
            child: Cow::Owned(format!("{prefix}/child")),
            fingerprint: Cow::Owned(format!("{prefix}/fingerprint")),
        }
    }

    /// MAC key used to build salts
    #[must_use]
    pub fn salt_label(&self) -> &[u8] {
        self.salt.as_bytes()
    }

    /// KDF info for master derivation
    #[must_use]
    pub fn master_info(&self) -> &[u8] {
        self.master.as_bytes()
    }

    /// KDF info for child derivation
    #[must_use]
    pub fn child_info(&self) -> &[u8] {
        self.child.as_bytes()
    }

    /// KDF info for fingerprint keys
    #[must_use]
    pub fn fingerprint_info(&self) -> &[u8] {
        self.fingerprint.as_bytes()
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::standard()
    }
}
