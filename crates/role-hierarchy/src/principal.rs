//! Principals and grant updates
//!
//! A principal is a user or a team member: a role from one group plus local
//! grants layered on top. Local grants override the role's grants through the
//! same merge the hierarchy uses for inheritance.

use permission_engine::{Evaluator, GrantMapping, PermissionSchema, RequiredEntry};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RoleResult;
use crate::role::{EffectiveRole, RoleGroup};

/// Effective grants of a principal: role grants overridden by local grants.
pub fn effective_grants(evaluator: Evaluator, role: &GrantMapping, local: &GrantMapping) -> GrantMapping {
    evaluator.merge(role, local)
}

/// Grants of a role created from `base` with its own declared grants.
pub fn derive_from_base(evaluator: Evaluator, base: &EffectiveRole, own: &GrantMapping) -> GrantMapping {
    evaluator.merge(&base.permissions, own)
}

/// An administrative change to a grant mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", content = "permissions", rename_all = "snake_case")]
pub enum GrantUpdate {
    /// Discard the current grants and use these
    Replace(GrantMapping),

    /// Merge these over the current grants
    Merge(GrantMapping),
}

impl GrantUpdate {
    /// Build an update from an incoming mapping and a merge flag.
    pub fn new(grants: GrantMapping, merge: bool) -> Self {
        if merge {
            Self::Merge(grants)
        } else {
            Self::Replace(grants)
        }
    }

    /// The incoming grants.
    pub fn grants(&self) -> &GrantMapping {
        match self {
            Self::Replace(grants) | Self::Merge(grants) => grants,
        }
    }
}

/// Validate an update against `schema` and produce the new mapping.
///
/// `current` is never modified; unknown keys fail with
/// [`PermissionError::UnknownPermission`](permission_engine::PermissionError::UnknownPermission).
///
/// # Arguments
///
/// * `evaluator` - Match mode used when merging
/// * `schema` - Schema of the group the grants belong to
/// * `current` - Grants before the update
/// * `update` - Incoming grants and whether to replace or merge them
///
/// # Examples
///
/// ```
/// use permission_engine::{global_schema, Evaluator, GrantMapping};
/// use role_hierarchy::{apply_update, GrantUpdate};
///
/// let schema = global_schema().unwrap();
/// let current = GrantMapping::from_pairs([("team.create", true)]).unwrap();
/// let incoming = GrantMapping::from_pairs([("user.update-info", true)]).unwrap();
///
/// let merged = apply_update(Evaluator::default(), &schema, &current, GrantUpdate::Merge(incoming)).unwrap();
/// assert_eq!(merged.len(), 2);
/// ```
pub fn apply_update(
    evaluator: Evaluator,
    schema: &PermissionSchema,
    current: &GrantMapping,
    update: GrantUpdate,
) -> RoleResult<GrantMapping> {
    schema.validate_grants(update.grants())?;

    let updated = match update {
        GrantUpdate::Replace(grants) => grants,
        GrantUpdate::Merge(grants) => evaluator.merge(current, &grants),
    };

    debug!(before = current.len(), after = updated.len(), "Applied grant update");
    Ok(updated)
}

/// A user or team member with a role and local grants.
///
/// # Examples
///
/// ```
/// use permission_engine::{parse_required, Evaluator, GrantMapping};
/// use role_hierarchy::{Principal, RoleDefinition, RoleHierarchy};
///
/// let roles = vec![RoleDefinition::global("user", "User", 20)
///     .with_grants([("team.create", true)])
///     .unwrap()];
/// let hierarchy = RoleHierarchy::build(&roles).unwrap();
///
/// let local = GrantMapping::from_pairs([("team.*", false)]).unwrap();
/// let principal = Principal::for_role(hierarchy.role("user").unwrap(), local);
///
/// let required = parse_required(["team.create"]).unwrap();
/// assert!(principal.authorize(Evaluator::default(), &required).is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    /// Group of the assigned role
    pub group: RoleGroup,

    /// Assigned role name
    pub role: String,

    /// Effective grants of the assigned role
    pub role_permissions: GrantMapping,

    /// Grants set on the principal itself
    #[serde(default)]
    pub local_permissions: GrantMapping,
}

impl Principal {
    /// Assign `role` with the given local grants.
    ///
    /// # Arguments
    ///
    /// * `role` - Effective role; its grants are copied into the principal
    /// * `local_permissions` - Grants set on the principal, already validated
    pub fn for_role(role: &EffectiveRole, local_permissions: GrantMapping) -> Self {
        Self {
            group: role.group(),
            role: role.name.clone(),
            role_permissions: role.permissions.clone(),
            local_permissions,
        }
    }

    /// Effective grants of this principal.
    pub fn permissions(&self, evaluator: Evaluator) -> GrantMapping {
        effective_grants(evaluator, &self.role_permissions, &self.local_permissions)
    }

    /// Fail with `PermissionDenied` unless the effective grants cover `required`.
    pub fn authorize(&self, evaluator: Evaluator, required: &[RequiredEntry]) -> RoleResult<()> {
        evaluator.authorize(required, &self.permissions(evaluator))?;
        Ok(())
    }

    /// Return a copy with local grants updated.
    pub fn with_update(
        &self,
        evaluator: Evaluator,
        schema: &PermissionSchema,
        update: GrantUpdate,
    ) -> RoleResult<Self> {
        let local_permissions = apply_update(evaluator, schema, &self.local_permissions, update)?;
        Ok(Self {
            local_permissions,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RoleError;
    use permission_engine::{parse_required, parse_schema, MatchMode, PermissionError, Precedence};

    fn grants(pairs: &[(&str, bool)]) -> GrantMapping {
        GrantMapping::from_pairs(pairs.iter().copied()).unwrap()
    }

    fn keys(grants: &GrantMapping) -> Vec<&str> {
        grants.keys().map(|k| k.as_str()).collect()
    }

    fn schema() -> PermissionSchema {
        parse_schema(
            "*\nteam.*\nteam.create\nteam.verify\nuser.*\nuser.update-info\ncontent.*\ncontent.*.publish",
        )
        .unwrap()
    }

    fn user_role() -> EffectiveRole {
        EffectiveRole {
            name: "user".into(),
            title: "User".into(),
            weight: 20,
            team_member_role: false,
            permissions: grants(&[("team.create", true), ("content.*.publish", true)]),
        }
    }

    #[test]
    fn test_local_grants_override_role() {
        let principal = Principal::for_role(&user_role(), grants(&[("team.*", false)]));
        let effective = principal.permissions(Evaluator::default());
        assert_eq!(keys(&effective), vec!["team.*", "content.*.publish"]);
        assert_eq!(effective.get("team.*"), Some(false));
        assert_eq!(principal.group, RoleGroup::Global);
    }

    #[test]
    fn test_authorize_uses_effective_grants() {
        let evaluator = Evaluator::default();
        let principal = Principal::for_role(&user_role(), grants(&[("user.update-info", true)]));

        principal
            .authorize(evaluator, &parse_required(["user.update-info"]).unwrap())
            .unwrap();
        principal
            .authorize(evaluator, &parse_required(["content.manga.publish"]).unwrap())
            .unwrap();

        let denied = principal
            .authorize(evaluator, &parse_required(["team.verify"]).unwrap())
            .unwrap_err();
        assert!(matches!(
            denied,
            RoleError::Permission(PermissionError::PermissionDenied { .. })
        ));
        assert_eq!(denied.status_code(), 403);
    }

    #[test]
    fn test_replace_update() {
        let current = grants(&[("team.create", true)]);
        let updated = apply_update(
            Evaluator::default(),
            &schema(),
            &current,
            GrantUpdate::new(grants(&[("user.update-info", true)]), false),
        )
        .unwrap();
        assert_eq!(keys(&updated), vec!["user.update-info"]);
        assert_eq!(keys(&current), vec!["team.create"]);
    }

    #[test]
    fn test_merge_update() {
        let current = grants(&[("team.create", true), ("user.update-info", true)]);
        let updated = apply_update(
            Evaluator::default(),
            &schema(),
            &current,
            GrantUpdate::new(grants(&[("team.*", false)]), true),
        )
        .unwrap();
        assert_eq!(keys(&updated), vec!["team.*", "user.update-info"]);
        assert_eq!(updated.get("team.*"), Some(false));
    }

    #[test]
    fn test_update_rejects_unknown_keys() {
        let result = apply_update(
            Evaluator::default(),
            &schema(),
            &GrantMapping::new(),
            GrantUpdate::Merge(grants(&[("team.disband", true)])),
        );
        match result {
            Err(RoleError::Permission(PermissionError::UnknownPermission(key))) => {
                assert_eq!(key, "team.disband")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_principal_update_keeps_role() {
        let principal = Principal::for_role(&user_role(), GrantMapping::new());
        let updated = principal
            .with_update(
                Evaluator::default(),
                &schema(),
                GrantUpdate::Merge(grants(&[("team.verify", true)])),
            )
            .unwrap();
        assert_eq!(updated.role, "user");
        assert!(updated.role_permissions.same_order(&principal.role_permissions));
        assert_eq!(keys(&updated.local_permissions), vec!["team.verify"]);
        assert!(principal.local_permissions.is_empty());
    }

    #[test]
    fn test_derive_from_base() {
        let derived = derive_from_base(
            Evaluator::default(),
            &user_role(),
            &grants(&[("team.verify", true), ("content.*", false)]),
        );
        assert_eq!(keys(&derived), vec!["team.create", "content.*", "team.verify"]);
        assert_eq!(derived.get("content.*"), Some(false));
    }

    #[test]
    fn test_full_suffix_keeps_sibling_grants() {
        let base = grants(&[("content.manga.delete", true)]);
        let local = grants(&[("content.*.publish", true)]);

        let short = effective_grants(Evaluator::default(), &base, &local);
        assert_eq!(keys(&short), vec!["content.*.publish"]);

        let full = effective_grants(
            Evaluator::new(MatchMode::FullSuffix, Precedence::InsertionOrder),
            &base,
            &local,
        );
        assert_eq!(keys(&full), vec!["content.manga.delete", "content.*.publish"]);
    }

    #[test]
    fn test_update_serde_shape() {
        let update: GrantUpdate =
            serde_json::from_str(r#"{"mode": "merge", "permissions": {"team.create": true}}"#).unwrap();
        assert_eq!(update, GrantUpdate::Merge(grants(&[("team.create", true)])));
    }
}
