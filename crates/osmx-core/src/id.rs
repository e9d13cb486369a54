//! Strongly-typed identifiers for OSM objects, changesets and users.
//!
//! Attribute text is converted with the permissive policy used throughout
//! the reader: text that does not parse yields the zero value instead of
//! an error.

use std::fmt;

/// Identifies a node, way or relation.
///
/// Ids are signed: negative ids are used by editors for objects that
/// have not been uploaded yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub i64);

impl ObjectId {
    /// Parse attribute text, yielding `ObjectId(0)` for invalid input.
    pub fn parse_lossy(text: &str) -> Self {
        Self(text.trim().parse().unwrap_or(0))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ObjectId {
    fn from(v: i64) -> Self {
        Self(v)
    }
}

/// Identifies the changeset an object version was uploaded in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChangesetId(pub u32);

impl ChangesetId {
    /// Parse attribute text, yielding `ChangesetId(0)` for invalid input.
    pub fn parse_lossy(text: &str) -> Self {
        Self(parse_u32_lossy(text))
    }
}

impl fmt::Display for ChangesetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ChangesetId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Numeric id of the user who last edited an object.
///
/// `UserId(0)` is used for anonymous edits and for missing attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub u32);

impl UserId {
    /// Parse attribute text, yielding `UserId(0)` for invalid input.
    pub fn parse_lossy(text: &str) -> Self {
        Self(parse_u32_lossy(text))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for UserId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Parse an unsigned 32-bit attribute, yielding 0 for invalid input.
pub fn parse_u32_lossy(text: &str) -> u32 {
    text.trim().parse().unwrap_or(0)
}
