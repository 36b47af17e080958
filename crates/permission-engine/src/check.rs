//! # Checking
//!
//! Evaluates required-permission entries against a grant mapping.

use serde::{Deserialize, Serialize};

use crate::grants::GrantMapping;
use crate::matching::MatchMode;
use crate::path::PermissionPath;
use crate::required::RequiredEntry;

/// How overlapping grant entries are resolved for one required path.
///
/// - **InsertionOrder**: the path is granted if any covering entry is an
///   allow. Entries are scanned in mapping order and the scan stops at the
///   first covering allow; explicit denies never take effect on their own
///   (only a `*` key can deny globally).
/// - **MostSpecific**: the most specific covering entry decides, allow or
///   deny. Equally specific allow and deny entries resolve to deny.
///   Specificity only counts segments the match mode compares; see
///   [`MatchMode::specificity`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Precedence {
    /// First covering allow in mapping order wins.
    #[default]
    InsertionOrder,
    /// Most specific covering entry wins.
    MostSpecific,
}

impl Precedence {
    /// Parse from the configuration spelling (`insertion-order` / `most-specific`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "insertion-order" => Some(Self::InsertionOrder),
            "most-specific" => Some(Self::MostSpecific),
            _ => None,
        }
    }

    /// Configuration spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsertionOrder => "insertion-order",
            Self::MostSpecific => "most-specific",
        }
    }
}

/// Check `required` against `available` with the default match mode and precedence.
///
/// A `*` key in `available` decides the outcome on its own. Otherwise every
/// entry must be satisfied; an any-of entry needs only one alternative.
///
/// # Example
///
/// ```
/// use permission_engine::{check_permissions, parse_required, GrantMapping};
///
/// let grants = GrantMapping::from_pairs([("content.*", true)]).unwrap();
///
/// let required = parse_required(["content.manga.publish"]).unwrap();
/// assert!(check_permissions(&required, &grants));
///
/// let required = parse_required(["team.create | content.manga.delete"]).unwrap();
/// assert!(check_permissions(&required, &grants));
///
/// let required = parse_required(["team.create"]).unwrap();
/// assert!(!check_permissions(&required, &grants));
/// ```
pub fn check_permissions(required: &[RequiredEntry], available: &GrantMapping) -> bool {
    check_with(MatchMode::default(), Precedence::default(), required, available)
}

/// Check `required` against `available` under an explicit mode and precedence.
pub fn check_with(
    mode: MatchMode,
    precedence: Precedence,
    required: &[RequiredEntry],
    available: &GrantMapping,
) -> bool {
    if let Some(allowed) = available.global() {
        return allowed;
    }

    required.iter().all(|entry| {
        entry
            .alternatives()
            .iter()
            .any(|path| path_granted(mode, precedence, path, available))
    })
}

fn path_granted(
    mode: MatchMode,
    precedence: Precedence,
    required: &PermissionPath,
    available: &GrantMapping,
) -> bool {
    match precedence {
        Precedence::InsertionOrder => available
            .iter()
            .any(|(granted, allowed)| allowed && mode.satisfies(granted, required)),
        Precedence::MostSpecific => {
            let mut decision: Option<((usize, bool), bool)> = None;

            for (granted, allowed) in available.iter() {
                if !mode.satisfies(granted, required) {
                    continue;
                }

                let specificity = mode.specificity(granted);
                decision = match decision {
                    Some((best, _)) if specificity > best => Some((specificity, allowed)),
                    Some((best, current)) if specificity == best => Some((best, current && allowed)),
                    Some(kept) => Some(kept),
                    None => Some((specificity, allowed)),
                };
            }

            decision.map(|(_, allowed)| allowed).unwrap_or(false)
        }
    }
}
