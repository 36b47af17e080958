//! Seed reconciliation
//!
//! Compares the computed hierarchy with a snapshot of stored roles and plans
//! the writes that bring storage in line. Planning does no I/O; the caller
//! applies the plan.

use std::collections::HashMap;
use std::fmt;

use permission_engine::GrantMapping;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::hierarchy::RoleHierarchy;
use crate::role::EffectiveRole;

/// A role as persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredRole {
    /// Storage ID
    pub id: Uuid,

    /// Unique role name
    pub name: String,

    /// Human-readable title
    pub title: String,

    /// Privilege ordering within the group
    pub weight: i32,

    /// Whether the role belongs to the team hierarchy
    pub team_member_role: bool,

    /// Stored grants
    #[serde(default)]
    pub permissions: GrantMapping,

    /// Whether the role was created by seeding
    #[serde(default)]
    pub default: bool,
}

impl StoredRole {
    /// Create a new seeded record for an effective role.
    pub fn from_effective(role: &EffectiveRole) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: role.name.clone(),
            title: role.title.clone(),
            weight: role.weight,
            team_member_role: role.team_member_role,
            permissions: role.permissions.clone(),
            default: true,
        }
    }
}

/// A stored role field that differs from the computed role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RoleField {
    /// Title changed
    Title,
    /// Weight changed
    Weight,
    /// Some computed grant is missing or has another value
    Permissions,
    /// `team_member_role` does not match the role's group
    Group,
}

impl RoleField {
    /// Get string representation of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Weight => "weight",
            Self::Permissions => "permissions",
            Self::Group => "group",
        }
    }
}

impl fmt::Display for RoleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Planned update of a stored role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleUpdate {
    /// Storage ID of the role
    pub id: Uuid,

    /// Role name
    pub name: String,

    /// Fields that drifted
    pub changed: Vec<RoleField>,

    /// The record to write back
    pub role: StoredRole,
}

/// Writes needed to bring storage in line with the hierarchy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Roles missing from storage
    pub create: Vec<StoredRole>,

    /// Stored roles that drifted
    pub update: Vec<RoleUpdate>,
}

impl ReconcilePlan {
    /// Check if storage is already up to date.
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty()
    }
}

/// Plan seed writes for `hierarchy` against stored roles.
///
/// Title, weight, group and permissions are compared. Stored roles the
/// hierarchy does not know are left alone. Stored grants
/// are compared by coverage of the computed entries only; extra stored keys
/// are not drift, but on drift the whole mapping is replaced.
///
/// # Examples
///
/// ```
/// use role_hierarchy::{default_roles, plan_reconciliation, RoleHierarchy};
///
/// let hierarchy = RoleHierarchy::build(&default_roles().unwrap()).unwrap();
/// let plan = plan_reconciliation(&hierarchy, &[]);
/// assert_eq!(plan.create.len(), hierarchy.len());
///
/// let plan = plan_reconciliation(&hierarchy, &plan.create);
/// assert!(plan.is_empty());
/// ```
pub fn plan_reconciliation(hierarchy: &RoleHierarchy, existing: &[StoredRole]) -> ReconcilePlan {
    let stored: HashMap<&str, &StoredRole> = existing.iter().map(|role| (role.name.as_str(), role)).collect();

    let mut plan = ReconcilePlan::default();

    for role in hierarchy.iter() {
        let Some(current) = stored.get(role.name.as_str()) else {
            plan.create.push(StoredRole::from_effective(role));
            continue;
        };

        let changed = drifted_fields(role, current);
        if changed.is_empty() {
            continue;
        }

        plan.update.push(RoleUpdate {
            id: current.id,
            name: role.name.clone(),
            changed,
            role: StoredRole {
                title: role.title.clone(),
                weight: role.weight,
                team_member_role: role.team_member_role,
                permissions: role.permissions.clone(),
                ..(*current).clone()
            },
        });
    }

    if !plan.is_empty() {
        info!(
            created = plan.create.len(),
            updated = plan.update.len(),
            "Planned default role reconciliation"
        );
    }

    plan
}

fn drifted_fields(role: &EffectiveRole, stored: &StoredRole) -> Vec<RoleField> {
    let mut changed = Vec::new();

    let permissions_drifted = role
        .permissions
        .iter()
        .any(|(path, allowed)| stored.permissions.get(path.as_str()) != Some(allowed));
    if permissions_drifted {
        changed.push(RoleField::Permissions);
    }

    if stored.weight != role.weight {
        changed.push(RoleField::Weight);
    }

    if stored.title != role.title {
        changed.push(RoleField::Title);
    }

    if stored.team_member_role != role.team_member_role {
        changed.push(RoleField::Group);
    }

    changed
}
