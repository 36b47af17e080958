//! Role definitions
//!
//! A role is declared with its own grants and a weight. The hierarchy builder
//! turns declarations into effective roles by inheriting grants from
//! lower-weight roles of the same group.

use std::fmt;

use permission_engine::{GrantMapping, PermissionResult, PermissionSchema};
use serde::{Deserialize, Serialize};

use crate::error::{RoleError, RoleResult};

/// Which of the two independent hierarchies a role belongs to.
///
/// Global roles are assigned to users; team roles are assigned to team
/// members. Grants never propagate between groups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RoleGroup {
    /// User roles
    Global,

    /// Team member roles
    Team,
}

impl RoleGroup {
    /// Map the stored `team_member_role` flag to a group.
    pub fn from_team_member_role(team_member_role: bool) -> Self {
        if team_member_role {
            Self::Team
        } else {
            Self::Global
        }
    }

    /// Check if this is the team group.
    pub fn is_team(&self) -> bool {
        matches!(self, Self::Team)
    }

    /// Get string representation of the group.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Team => "team",
        }
    }
}

impl fmt::Display for RoleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_propagate() -> bool {
    true
}

/// A statically declared role.
///
/// # Examples
///
/// ```
/// use role_hierarchy::{RoleDefinition, RoleGroup};
///
/// let publisher = RoleDefinition::global("publisher", "Publisher", 30)
///     .with_grants([("content.*.publish", true)])
///     .unwrap()
///     .without_propagation();
///
/// assert_eq!(publisher.group(), RoleGroup::Global);
/// assert!(!publisher.propagate);
/// assert_eq!(publisher.permissions.get("content.*.publish"), Some(true));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleDefinition {
    /// Unique role name
    pub name: String,

    /// Human-readable title
    pub title: String,

    /// Privilege ordering within the group; higher inherits from lower
    pub weight: i32,

    /// Whether the role belongs to the team hierarchy
    pub team_member_role: bool,

    /// Whether higher-weight roles inherit from this one
    #[serde(default = "default_propagate")]
    pub propagate: bool,

    /// Grants declared by the role itself
    #[serde(default)]
    pub permissions: GrantMapping,
}

impl RoleDefinition {
    /// Declare a global (user) role with no grants.
    ///
    /// Grants default to propagating to higher-weight roles.
    ///
    /// # Arguments
    ///
    /// * `name` - Unique role name, used to look the role up in storage
    /// * `title` - Human-readable title
    /// * `weight` - Position in the global hierarchy; higher inherits from lower
    pub fn global(name: impl Into<String>, title: impl Into<String>, weight: i32) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            weight,
            team_member_role: false,
            propagate: true,
            permissions: GrantMapping::new(),
        }
    }

    /// Declare a team member role with no grants.
    ///
    /// # Arguments
    ///
    /// * `name` - Unique role name, shared with global roles
    /// * `title` - Human-readable title
    /// * `weight` - Position in the team hierarchy
    pub fn team(name: impl Into<String>, title: impl Into<String>, weight: i32) -> Self {
        Self {
            team_member_role: true,
            ..Self::global(name, title, weight)
        }
    }

    /// Set the declared grants from string keys.
    pub fn with_grants<I, S>(mut self, pairs: I) -> PermissionResult<Self>
    where
        I: IntoIterator<Item = (S, bool)>,
        S: AsRef<str>,
    {
        self.permissions = GrantMapping::from_pairs(pairs)?;
        Ok(self)
    }

    /// Set the declared grants.
    pub fn with_permissions(mut self, permissions: GrantMapping) -> Self {
        self.permissions = permissions;
        self
    }

    /// Keep inheriting, but stop passing grants to higher-weight roles.
    pub fn without_propagation(mut self) -> Self {
        self.propagate = false;
        self
    }

    /// The hierarchy this role belongs to.
    pub fn group(&self) -> RoleGroup {
        RoleGroup::from_team_member_role(self.team_member_role)
    }

    /// Reject grants that are not declared in `schema`.
    pub fn validate(&self, schema: &PermissionSchema) -> RoleResult<()> {
        match self.permissions.keys().find(|key| !schema.contains(key.as_str())) {
            Some(unknown) => Err(RoleError::UnknownGrant {
                role: self.name.clone(),
                permission: unknown.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// A role after inheritance has been applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EffectiveRole {
    /// Unique role name
    pub name: String,

    /// Human-readable title
    pub title: String,

    /// Privilege ordering within the group
    pub weight: i32,

    /// Whether the role belongs to the team hierarchy
    pub team_member_role: bool,

    /// Declared grants merged over inherited ones
    pub permissions: GrantMapping,
}

impl EffectiveRole {
    /// The hierarchy this role belongs to.
    pub fn group(&self) -> RoleGroup {
        RoleGroup::from_team_member_role(self.team_member_role)
    }
}
