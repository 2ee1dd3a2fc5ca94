//! Textual derivation paths
//!
//! `m/42/account/0` parses into the resolved index sequence. Each segment is
//! resolved with [`IndexMode::Any`], so `account` becomes its hashed index.

use crate::index::{ChildIndex, IndexMode, get_index, pattern_matches};
use crate::record::MASTER_PATH;
use crate::{HdError, Result};
use once_cell::sync::OnceCell;
use regex::Regex;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

static PATH: OnceCell<Regex> = OnceCell::new();

/// An ordered sequence of resolved child indices
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<ChildIndex>);

impl DerivationPath {
    /// Resolved indices, root first
    #[must_use]
    pub fn indices(&self) -> &[ChildIndex] {
        &self.0
    }

    /// Extend the path by one index
    #[must_use]
    pub fn child(&self, index: ChildIndex) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }
}

impl Deref for DerivationPath {
    type Target = [ChildIndex];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<ChildIndex>> for DerivationPath {
    fn from(indices: Vec<ChildIndex>) -> Self {
        Self(indices)
    }
}

impl FromIterator<ChildIndex> for DerivationPath {
    fn from_iter<I: IntoIterator<Item = ChildIndex>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for DerivationPath {
    type Err = HdError;

    fn from_str(s: &str) -> Result<Self> {
        if !pattern_matches(&PATH, r"^m(/[0-9A-Za-z-]+)*$", s)? {
            return Err(HdError::InvalidPath(s.to_owned()));
        }
        s.split('/')
            .skip(1)
            .map(|segment| get_index(segment, IndexMode::Any))
            .collect()
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASTER_PATH)?;
        for index in &self.0 {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::str_to_index;

    fn idx(n: i64) -> ChildIndex {
        ChildIndex::new(n).expect("in range")
    }

    #[test]
    fn parses_numeric_segments() -> Result<()> {
        let path: DerivationPath = "m/42/0".parse()?;
        assert_eq!(path.indices(), &[idx(42), idx(0)]);
        assert_eq!(path.to_string(), "m/42/0");
        Ok(())
    }

    #[test]
    fn parses_named_segments() -> Result<()> {
        let path: DerivationPath = "m/account/7".parse()?;
        assert_eq!(path.indices(), &[str_to_index("account")?, idx(7)]);
        Ok(())
    }

    #[test]
    fn bare_master_is_empty() -> Result<()> {
        let path: DerivationPath = "m".parse()?;
        assert!(path.is_empty());
        assert_eq!(path.to_string(), "m");
        Ok(())
    }

    #[test]
    fn rejects_malformed_paths() {
        for bad in ["", "m/", "/0", "M/0", "m//0", "m/0/", "m/a b", "x/0"] {
            assert_eq!(
                bad.parse::<DerivationPath>(),
                Err(HdError::InvalidPath(bad.to_owned())),
                "{bad}"
            );
        }
    }

    #[test]
    fn segment_errors_propagate() {
        assert!(matches!(
            "m/a1".parse::<DerivationPath>(),
            Err(HdError::InvalidIndex(_))
        ));
        assert!(matches!(
            "m/2147483648".parse::<DerivationPath>(),
            Err(HdError::IndexOutOfRange(_))
        ));
    }

    #[test]
    fn child_extends() {
        let path = DerivationPath::default().child(idx(1)).child(idx(2));
        assert_eq!(path.to_string(), "m/1/2");
    }
}
