//! # Required Permissions
//!
//! What an operation asks for. An entry is either one path or an "any-of"
//! group written with `|`, e.g. `user.own.update-info | user.update-info`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PermissionError, PermissionResult};
use crate::path::PermissionPath;

/// One required-permission entry.
///
/// # Example
///
/// ```
/// use permission_engine::RequiredEntry;
///
/// let entry: RequiredEntry = "user.own.update-info | user.update-info".parse().unwrap();
/// assert_eq!(entry.alternatives().len(), 2);
/// assert!(entry.is_any_of());
/// assert_eq!(entry.to_string(), "user.own.update-info | user.update-info");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequiredEntry {
    alternatives: Vec<PermissionPath>,
}

impl RequiredEntry {
    /// Entry satisfied by a single path.
    pub fn single(path: PermissionPath) -> Self {
        Self {
            alternatives: vec![path],
        }
    }

    /// Entry satisfied by any of the given paths.
    ///
    /// Returns [`PermissionError::EmptyPath`] for an empty group.
    pub fn any_of<I>(paths: I) -> PermissionResult<Self>
    where
        I: IntoIterator<Item = PermissionPath>,
    {
        let alternatives: Vec<_> = paths.into_iter().collect();
        if alternatives.is_empty() {
            return Err(PermissionError::EmptyPath);
        }
        Ok(Self { alternatives })
    }

    /// Add another alternative (the `|` operator on permissions).
    pub fn or(mut self, path: PermissionPath) -> Self {
        self.alternatives.push(path);
        self
    }

    /// Alternatives in declaration order.
    pub fn alternatives(&self) -> &[PermissionPath] {
        &self.alternatives
    }

    /// Check if the entry has more than one alternative.
    pub fn is_any_of(&self) -> bool {
        self.alternatives.len() > 1
    }
}

/// Parse a list of entry strings, e.g. the arguments of an endpoint guard.
pub fn parse_required<I, S>(entries: I) -> PermissionResult<Vec<RequiredEntry>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries.into_iter().map(|s| s.as_ref().parse()).collect()
}

impl From<PermissionPath> for RequiredEntry {
    fn from(path: PermissionPath) -> Self {
        Self::single(path)
    }
}

impl FromStr for RequiredEntry {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let alternatives = s
            .split('|')
            .map(|alternative| PermissionPath::parse(alternative.trim()))
            .collect::<PermissionResult<Vec<_>>>()?;
        Ok(Self { alternatives })
    }
}

impl TryFrom<String> for RequiredEntry {
    type Error = PermissionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RequiredEntry> for String {
    fn from(entry: RequiredEntry) -> Self {
        entry.to_string()
    }
}

impl fmt::Display for RequiredEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, path) in self.alternatives.iter().enumerate() {
            if index > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{path}")?;
        }
        Ok(())
    }
}
