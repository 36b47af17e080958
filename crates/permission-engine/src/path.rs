//! # Permission Paths
//!
//! A permission path is a dot-separated sequence of segments such as
//! `content.manga.publish`. Each segment is either a literal token made of
//! lowercase ASCII letters, digits and hyphens, or the wildcard `*`.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PermissionError, PermissionResult};

/// The wildcard segment literal.
pub const WILDCARD: &str = "*";

/// One segment of a permission path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A literal token (`[a-z0-9-]+`).
    Literal(String),
    /// The `*` wildcard.
    Wildcard,
}

impl Segment {
    /// Parse a single segment. `path` is only used for error messages.
    fn parse(segment: &str, path: &str) -> PermissionResult<Self> {
        if segment.is_empty() {
            return Err(PermissionError::EmptySegment {
                path: path.to_string(),
            });
        }

        if segment == WILDCARD {
            return Ok(Segment::Wildcard);
        }

        if segment.contains('*') {
            return Err(PermissionError::MisplacedWildcard {
                path: path.to_string(),
            });
        }

        if let Some(character) = segment
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(PermissionError::InvalidCharacter {
                path: path.to_string(),
                character,
            });
        }

        Ok(Segment::Literal(segment.to_string()))
    }

    /// Check if this is the `*` segment.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Segment::Wildcard)
    }

    /// Get the string form of the segment.
    pub fn as_str(&self) -> &str {
        match self {
            Segment::Literal(token) => token,
            Segment::Wildcard => WILDCARD,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated permission path.
///
/// The canonical string form and the segment form are both kept so matching
/// never has to re-split strings. Equality and hashing use the string form,
/// which lets maps keyed by paths be queried with plain `&str`.
///
/// # Example
///
/// ```
/// use permission_engine::PermissionPath;
///
/// let path: PermissionPath = "content.*.publish".parse().unwrap();
/// assert_eq!(path.len(), 3);
/// assert!(path.has_wildcard());
/// assert_eq!(path.to_string(), "content.*.publish");
///
/// assert!("content..publish".parse::<PermissionPath>().is_err());
/// assert!("content.man*".parse::<PermissionPath>().is_err());
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionPath {
    raw: String,
    segments: Vec<Segment>,
}

impl PermissionPath {
    /// Parse and validate a path string.
    pub fn parse(s: &str) -> PermissionResult<Self> {
        if s.is_empty() {
            return Err(PermissionError::EmptyPath);
        }

        let segments = s
            .split('.')
            .map(|segment| Segment::parse(segment, s))
            .collect::<PermissionResult<Vec<_>>>()?;

        Ok(Self {
            raw: s.to_string(),
            segments,
        })
    }

    /// The global wildcard path `*`.
    pub fn global() -> Self {
        Self {
            raw: WILDCARD.to_string(),
            segments: vec![Segment::Wildcard],
        }
    }

    /// Extend this path with one more segment.
    ///
    /// # Example
    ///
    /// ```
    /// use permission_engine::PermissionPath;
    ///
    /// let user: PermissionPath = "user".parse().unwrap();
    /// let own = user.child("own").unwrap();
    /// assert_eq!(own.as_str(), "user.own");
    /// ```
    pub fn child(&self, segment: &str) -> PermissionResult<Self> {
        let raw = format!("{}.{}", self.raw, segment);
        let parsed = Segment::parse(segment, &raw)?;
        let mut segments = self.segments.clone();
        segments.push(parsed);
        Ok(Self { raw, segments })
    }

    /// Canonical string form.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Segment form.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments (always at least one).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Paths are never empty; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Check if this is exactly `*`.
    pub fn is_global(&self) -> bool {
        self.segments.len() == 1 && self.segments[0].is_wildcard()
    }

    /// Check if any segment is `*`.
    pub fn has_wildcard(&self) -> bool {
        self.segments.iter().any(Segment::is_wildcard)
    }

    /// Count of literal segments.
    pub fn literal_count(&self) -> usize {
        self.segments.iter().filter(|s| !s.is_wildcard()).count()
    }

    /// Ordering key for "more specific pattern" comparisons.
    ///
    /// More literal segments is more specific; with equal counts a
    /// wildcard-free pattern beats one with a wildcard. Every literal counts,
    /// which matches `FullSuffix` matching; see `MatchMode::specificity`.
    pub fn specificity(&self) -> (usize, bool) {
        (self.literal_count(), !self.has_wildcard())
    }
}

impl PartialEq for PermissionPath {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for PermissionPath {}

impl Hash for PermissionPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl Borrow<str> for PermissionPath {
    fn borrow(&self) -> &str {
        &self.raw
    }
}

impl fmt::Debug for PermissionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PermissionPath({:?})", self.raw)
    }
}

impl fmt::Display for PermissionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for PermissionPath {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PermissionPath {
    type Error = PermissionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for PermissionPath {
    type Error = PermissionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PermissionPath> for String {
    fn from(path: PermissionPath) -> Self {
        path.raw
    }
}

impl AsRef<str> for PermissionPath {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}
