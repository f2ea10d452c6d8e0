//! Content fingerprint
//!
//! A short hash of the meaningful content of a model file. Blank lines, comment lines and
//! the amount of whitespace between tokens do not contribute, so reformatting a model
//! leaves its fingerprint untouched while any token edit changes it.
//!
//! The digest is MD5 over the canonical text, matching documents produced by earlier
//! generators; it is used for change detection only.

use super::sections::{source_lines, COMMENT_MARKER};
use md5::{Digest, Md5};
use std::fmt;

/// Hex-encoded 128-bit content digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonical form of `source`: trimmed non-comment lines, whitespace runs collapsed to a
/// single space, joined with `\n`.
pub fn canonicalize(source: &str) -> String {
    source_lines(source)
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_MARKER))
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fingerprint of `source`.
pub fn fingerprint(source: &str) -> Fingerprint {
    let digest = Md5::digest(canonicalize(source).as_bytes());
    Fingerprint(hex::encode(digest))
}
