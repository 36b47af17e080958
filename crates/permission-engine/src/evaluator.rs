//! # Evaluator
//!
//! Bundles a match mode and a precedence so callers configured once at
//! startup get consistent matching, merging and checking everywhere.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::check::{check_with, Precedence};
use crate::config::EngineConfig;
use crate::error::{PermissionError, PermissionResult};
use crate::grants::GrantMapping;
use crate::matching::MatchMode;
use crate::merge::merge_with_mode;
use crate::path::PermissionPath;
use crate::required::RequiredEntry;

/// Configured matcher, merger and checker.
///
/// `Evaluator` is `Copy` and holds no state besides its two settings, so it
/// can be shared freely across threads and requests.
///
/// # Example
///
/// ```
/// use permission_engine::{Evaluator, GrantMapping, MatchMode, Precedence, parse_required};
///
/// let evaluator = Evaluator::new(MatchMode::FullSuffix, Precedence::MostSpecific);
/// let grants = GrantMapping::from_pairs([("content.*", true), ("content.manga.delete", false)]).unwrap();
///
/// assert!(evaluator.check(&parse_required(["content.manga.publish"]).unwrap(), &grants));
/// assert!(evaluator.authorize(&parse_required(["content.manga.delete"]).unwrap(), &grants).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluator {
    /// Wildcard interpretation.
    pub mode: MatchMode,
    /// Conflict resolution between overlapping entries.
    pub precedence: Precedence,
}

impl Evaluator {
    /// Create an evaluator with explicit settings.
    pub fn new(mode: MatchMode, precedence: Precedence) -> Self {
        Self { mode, precedence }
    }

    /// Create an evaluator from engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.match_mode, config.precedence)
    }

    /// Check whether `available` covers `required`.
    pub fn satisfies(&self, available: &PermissionPath, required: &PermissionPath) -> bool {
        self.mode.satisfies(available, required)
    }

    /// Merge `second` into `first`.
    pub fn merge(&self, first: &GrantMapping, second: &GrantMapping) -> GrantMapping {
        merge_with_mode(self.mode, first, second)
    }

    /// Check required entries against a grant mapping.
    pub fn check(&self, required: &[RequiredEntry], available: &GrantMapping) -> bool {
        check_with(self.mode, self.precedence, required, available)
    }

    /// Like [`Evaluator::check`], but a denial becomes
    /// [`PermissionError::PermissionDenied`] carrying the required entries.
    pub fn authorize(&self, required: &[RequiredEntry], available: &GrantMapping) -> PermissionResult<()> {
        if self.check(required, available) {
            return Ok(());
        }

        debug!(
            required = %required.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
            grants = available.len(),
            "Permission denied"
        );

        Err(PermissionError::PermissionDenied {
            required: required.to_vec(),
        })
    }
}

/// Authorize with the default evaluator.
pub fn authorize(required: &[RequiredEntry], available: &GrantMapping) -> PermissionResult<()> {
    Evaluator::default().authorize(required, available)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::required::parse_required;

    #[test]
    fn test_default_is_short_circuit_insertion_order() {
        let evaluator = Evaluator::default();
        assert_eq!(evaluator.mode, MatchMode::ShortCircuit);
        assert_eq!(evaluator.precedence, Precedence::InsertionOrder);
    }

    #[test]
    fn test_authorize_denial_carries_required() {
        let required = parse_required(["team.create", "user.update-info | user.own.update-info"]).unwrap();
        let grants = GrantMapping::from_pairs([("team.create", true)]).unwrap();

        match authorize(&required, &grants) {
            Err(PermissionError::PermissionDenied { required: denied }) => assert_eq!(denied, required),
            other => panic!("expected denial, got {other:?}"),
        }
    }

    #[test]
    fn test_authorize_grants() {
        let required = parse_required(["team.create"]).unwrap();
        let grants = GrantMapping::from_pairs([("team.*", true)]).unwrap();
        assert!(authorize(&required, &grants).is_ok());
    }

    #[test]
    fn test_from_config() {
        let config = EngineConfig {
            match_mode: MatchMode::FullSuffix,
            precedence: Precedence::MostSpecific,
            ..EngineConfig::default()
        };
        let evaluator = Evaluator::from_config(&config);
        assert_eq!(evaluator, Evaluator::new(MatchMode::FullSuffix, Precedence::MostSpecific));
    }

    #[test]
    fn test_merge_uses_mode() {
        let first = GrantMapping::from_pairs([("content.manga.delete", true)]).unwrap();
        let second = GrantMapping::from_pairs([("content.*.publish", false)]).unwrap();
        let evaluator = Evaluator::new(MatchMode::FullSuffix, Precedence::InsertionOrder);
        assert_eq!(evaluator.merge(&first, &second).len(), 2);
        assert_eq!(Evaluator::default().merge(&first, &second).len(), 1);
    }
}
