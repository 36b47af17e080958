//! # Grant Mappings
//!
//! An ordered mapping from permission path to allow (`true`) or explicit deny
//! (`false`). Insertion order is part of the semantics: merge and check walk
//! entries in the order they were declared.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::PermissionResult;
use crate::path::{PermissionPath, WILDCARD};

/// Grants held by one principal or role.
///
/// Serializes as a plain JSON object, e.g. `{"content.*": true, "team.create": false}`.
/// The key `*` is special: when present its value decides every check.
///
/// `==` compares entries as a set and ignores order; use
/// [`GrantMapping::same_order`] where order matters.
///
/// # Example
///
/// ```
/// use permission_engine::GrantMapping;
///
/// let grants = GrantMapping::from_pairs([("content.*", true), ("team.create", false)]).unwrap();
/// assert_eq!(grants.len(), 2);
/// assert_eq!(grants.get("team.create"), Some(false));
/// assert_eq!(grants.global(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantMapping {
    entries: IndexMap<PermissionPath, bool>,
}

impl GrantMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Build a mapping from string keys, validating each one.
    pub fn from_pairs<I, S>(pairs: I) -> PermissionResult<Self>
    where
        I: IntoIterator<Item = (S, bool)>,
        S: AsRef<str>,
    {
        let mut mapping = Self::new();
        for (key, allowed) in pairs {
            mapping.insert(PermissionPath::parse(key.as_ref())?, allowed);
        }
        Ok(mapping)
    }

    /// Insert or overwrite an entry.
    ///
    /// Overwriting keeps the entry's original position.
    pub fn insert(&mut self, path: PermissionPath, allowed: bool) -> Option<bool> {
        self.entries.insert(path, allowed)
    }

    /// Insert only if the key is not present yet.
    pub fn insert_if_absent(&mut self, path: PermissionPath, allowed: bool) {
        self.entries.entry(path).or_insert(allowed);
    }

    /// Remove an entry, keeping the order of the rest.
    pub fn remove(&mut self, path: &str) -> Option<bool> {
        self.entries.shift_remove(path)
    }

    /// Look up an exact key.
    pub fn get(&self, path: &str) -> Option<bool> {
        self.entries.get(path).copied()
    }

    /// Check for an exact key.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Value of the `*` entry, if any.
    pub fn global(&self) -> Option<bool> {
        self.get(WILDCARD)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&PermissionPath, bool)> + '_ {
        self.entries.iter().map(|(path, allowed)| (path, *allowed))
    }

    /// Iterate keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &PermissionPath> + '_ {
        self.entries.keys()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check that both mappings hold the same entries in the same order.
    pub fn same_order(&self, other: &GrantMapping) -> bool {
        self.entries.iter().eq(other.entries.iter())
    }
}

impl FromIterator<(PermissionPath, bool)> for GrantMapping {
    fn from_iter<T: IntoIterator<Item = (PermissionPath, bool)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for GrantMapping {
    type Item = (PermissionPath, bool);
    type IntoIter = indexmap::map::IntoIter<PermissionPath, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a GrantMapping {
    type Item = (&'a PermissionPath, &'a bool);
    type IntoIter = indexmap::map::Iter<'a, PermissionPath, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_kept() {
        let mut grants = GrantMapping::new();
        grants.insert("team.create".parse().unwrap(), true);
        grants.insert("content.*".parse().unwrap(), true);
        grants.insert("team.create".parse().unwrap(), false);

        let keys: Vec<_> = grants.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["team.create", "content.*"]);
        assert_eq!(grants.get("team.create"), Some(false));
    }

    #[test]
    fn test_insert_if_absent() {
        let mut grants = GrantMapping::from_pairs([("a.b", true)]).unwrap();
        grants.insert_if_absent("a.b".parse().unwrap(), false);
        grants.insert_if_absent("a.c".parse().unwrap(), false);
        assert_eq!(grants.get("a.b"), Some(true));
        assert_eq!(grants.get("a.c"), Some(false));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut grants = GrantMapping::from_pairs([("a", true), ("b", true), ("c", true)]).unwrap();
        assert_eq!(grants.remove("b"), Some(true));
        let keys: Vec<_> = grants.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_global_entry() {
        let grants = GrantMapping::from_pairs([("user.*", true), ("*", false)]).unwrap();
        assert_eq!(grants.global(), Some(false));
    }

    #[test]
    fn test_from_pairs_rejects_bad_keys() {
        assert!(GrantMapping::from_pairs([("user.update_info", true)]).is_err());
    }

    #[test]
    fn test_same_order() {
        let a = GrantMapping::from_pairs([("a", true), ("b", false)]).unwrap();
        let b = GrantMapping::from_pairs([("b", false), ("a", true)]).unwrap();
        assert_eq!(a, b);
        assert!(!a.same_order(&b));
        assert!(a.same_order(&a.clone()));
    }

    #[test]
    fn test_json_round_trip_keeps_order() {
        let json = r#"{"user.own.update-info":true,"team.create":true,"*":false}"#;
        let grants: GrantMapping = serde_json::from_str(json).unwrap();
        let keys: Vec<_> = grants.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["user.own.update-info", "team.create", "*"]);
        assert_eq!(serde_json::to_string(&grants).unwrap(), json);

        assert!(serde_json::from_str::<GrantMapping>(r#"{"bad key":true}"#).is_err());
    }
}
