//! # Merging
//!
//! Combines two grant mappings so that `second` takes precedence over `first`
//! wherever one of its patterns covers an entry of `first`. Used to inherit
//! grants along the role hierarchy and to apply `merge = true` updates of
//! local permissions.

use tracing::trace;

use crate::grants::GrantMapping;
use crate::matching::MatchMode;

/// Merge `second` into `first` using [`MatchMode::ShortCircuit`].
///
/// 1. Every entry of `first` covered by some pattern of `second` is replaced
///    by the first such pattern (added once); uncovered entries are kept.
/// 2. Remaining entries of `second` are appended unless something already in
///    the result covers them.
///
/// # Example
///
/// ```
/// use permission_engine::{merge_permissions, GrantMapping};
///
/// let first = GrantMapping::from_pairs([("a.b", true), ("c.d", true)]).unwrap();
/// let second = GrantMapping::from_pairs([("a.*", false)]).unwrap();
///
/// let merged = merge_permissions(&first, &second);
/// let expected = GrantMapping::from_pairs([("a.*", false), ("c.d", true)]).unwrap();
/// assert!(merged.same_order(&expected));
/// ```
pub fn merge_permissions(first: &GrantMapping, second: &GrantMapping) -> GrantMapping {
    merge_with_mode(MatchMode::ShortCircuit, first, second)
}

/// Merge `second` into `first` under an explicit match mode.
pub fn merge_with_mode(mode: MatchMode, first: &GrantMapping, second: &GrantMapping) -> GrantMapping {
    let mut result = GrantMapping::new();

    for (first_path, first_allowed) in first.iter() {
        let covering = second
            .iter()
            .find(|(second_path, _)| mode.satisfies(second_path, first_path));

        match covering {
            Some((second_path, second_allowed)) => {
                result.insert_if_absent(second_path.clone(), second_allowed);
            }
            None => {
                result.insert(first_path.clone(), first_allowed);
            }
        }
    }

    for (extra_path, allowed) in second.iter() {
        let covered = result
            .keys()
            .any(|available| mode.satisfies(available, extra_path));

        if covered {
            trace!(permission = %extra_path, "Skipping redundant permission during merge");
            continue;
        }

        result.insert(extra_path.clone(), allowed);
    }

    result
}
