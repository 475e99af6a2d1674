//! Descriptive string labels attached to model nodes.
//!
//! Tags are written as a single whitespace-separated string (`"rod spine A"`)
//! and stored as an ordered set, so duplicates collapse and the display order
//! is deterministic.  The tree never consults tags for traversal or
//! lifecycle decisions; they exist for diagnostics and tag queries.

use std::collections::BTreeSet;
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tags(BTreeSet<String>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one label.  Returns `false` if it was already present.
    ///
    /// Whitespace inside `tag` is not split; use `Tags::from` for that.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        self.0.insert(tag.into())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    /// `true` if every label in `other` is also in `self`.  The empty set is
    /// contained in everything.
    pub fn contains_all(&self, other: &Tags) -> bool {
        other.0.is_subset(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<&str> for Tags {
    fn from(s: &str) -> Self {
        Tags(s.split_whitespace().map(str::to_owned).collect())
    }
}

impl From<String> for Tags {
    fn from(s: String) -> Self {
        Tags::from(s.as_str())
    }
}

impl<S: Into<String>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Tags(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for tag in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(tag)?;
            first = false;
        }
        Ok(())
    }
}
