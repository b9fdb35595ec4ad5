// src/version.rs
//! Epoch/version/release ordering key for artifact entries
//!
//! Ordering is the lexicographic triple (epoch, version, release):
//! epoch dominates, then plain string ordering on version and release.
//! This matches the repository's publishing conventions and is
//! deliberately not a semantic-version comparison.

use std::fmt;

/// The version key of one published artifact entry.
///
/// `Ord` derives field order: epoch first, then `ver`, then `rel`,
/// both compared as ordinary strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Evr {
    pub epoch: u64,
    pub ver: String,
    pub rel: String,
}

impl Evr {
    pub fn new(epoch: u64, ver: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            epoch,
            ver: ver.into(),
            rel: rel.into(),
        }
    }
}

impl fmt::Display for Evr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}:{}-{}", self.epoch, self.ver, self.rel)
        } else {
            write!(f, "{}-{}", self.ver, self.rel)
        }
    }
}
