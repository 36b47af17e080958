//! # Matching
//!
//! Decides whether a single granted pattern covers a single required path.

use serde::{Deserialize, Serialize};

use crate::path::{PermissionPath, Segment};

/// How wildcard segments inside a granted pattern are interpreted.
///
/// - **ShortCircuit**: the first `*` grants everything at and below that
///   position. Segments after it in the granted pattern are never compared,
///   so `content.*.publish` covers `content.manga.delete`.
/// - **FullSuffix**: a non-trailing `*` stands for exactly one segment and the
///   rest of the pattern must still match; a trailing `*` covers whatever
///   follows. `content.*.publish` covers `content.manga.publish` only.
///
/// `*` on its own covers every path in both modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// Stop at the first wildcard segment.
    #[default]
    ShortCircuit,
    /// Validate every segment after a non-trailing wildcard.
    FullSuffix,
}

impl MatchMode {
    /// Parse from the configuration spelling (`short-circuit` / `full-suffix`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "short-circuit" => Some(Self::ShortCircuit),
            "full-suffix" => Some(Self::FullSuffix),
            _ => None,
        }
    }

    /// Configuration spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortCircuit => "short-circuit",
            Self::FullSuffix => "full-suffix",
        }
    }

    /// Ordering key for "more specific pattern" comparisons under this mode.
    ///
    /// Only segments the matcher actually compares count. Under
    /// `ShortCircuit` that is the literal prefix before the first `*`, so
    /// `content.*.publish` ranks the same as `content.*`. Under `FullSuffix`
    /// every literal segment counts. With equal counts a wildcard-free
    /// pattern beats one with a wildcard.
    pub fn specificity(self, pattern: &PermissionPath) -> (usize, bool) {
        match self {
            Self::ShortCircuit => {
                let prefix = pattern
                    .segments()
                    .iter()
                    .take_while(|segment| !segment.is_wildcard())
                    .count();
                (prefix, !pattern.has_wildcard())
            }
            Self::FullSuffix => pattern.specificity(),
        }
    }

    /// Check whether `available` covers `required` under this mode.
    pub fn satisfies(self, available: &PermissionPath, required: &PermissionPath) -> bool {
        if available.is_global() {
            return true;
        }

        match self {
            Self::ShortCircuit => short_circuit(available.segments(), required.segments()),
            Self::FullSuffix => full_suffix(available.segments(), required.segments()),
        }
    }
}

/// Check whether the granted pattern `available` covers `required`.
///
/// Uses [`MatchMode::ShortCircuit`].
///
/// # Example
///
/// ```
/// use permission_engine::{satisfies, PermissionPath};
///
/// let p = |s: &str| s.parse::<PermissionPath>().unwrap();
///
/// assert!(satisfies(&p("*"), &p("user.own.update-info")));
/// assert!(satisfies(&p("user.*"), &p("user.own.update-info")));
/// assert!(satisfies(&p("user.own.*"), &p("user.own.update-info")));
/// assert!(satisfies(&p("user.own.update-info"), &p("user.own.update-info")));
/// assert!(!satisfies(&p("user.own.update-nickname"), &p("user.own.update-info")));
/// assert!(!satisfies(&p("content.manga.publish"), &p("content.*")));
/// ```
pub fn satisfies(available: &PermissionPath, required: &PermissionPath) -> bool {
    MatchMode::ShortCircuit.satisfies(available, required)
}

fn short_circuit(available: &[Segment], required: &[Segment]) -> bool {
    if available.len() != required.len() && !available.iter().any(Segment::is_wildcard) {
        return false;
    }

    for (index, segment) in available.iter().enumerate() {
        if segment.is_wildcard() {
            return true;
        }

        match required.get(index) {
            Some(other) if other == segment => continue,
            _ => return false,
        }
    }

    true
}

fn full_suffix(available: &[Segment], required: &[Segment]) -> bool {
    let last = available.len() - 1;

    for (index, segment) in available.iter().enumerate() {
        match (segment, required.get(index)) {
            (Segment::Wildcard, _) if index == last => return true,
            (Segment::Wildcard, Some(_)) => continue,
            (Segment::Literal(_), Some(other)) if other == segment => continue,
            _ => return false,
        }
    }

    available.len() == required.len()
}
