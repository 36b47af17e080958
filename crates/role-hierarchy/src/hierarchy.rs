//! Role hierarchy builder
//!
//! Orders roles by weight inside each group and lets every role inherit the
//! effective grants of the closest lower-weight role that propagates.
//!
//! ```text
//! Global:  unverified(0) ─▶ user(20) ─┬─▶ moderator(40) ─▶ administrator(50) ─▶ root(666)
//!                                     └─▶ publisher(30)  (propagate = false)
//! Team:    team-member(0) ─▶ team-owner(50)
//! ```

use std::collections::HashSet;

use permission_engine::{Evaluator, GrantMapping};
use tracing::{debug, warn};

use crate::error::{RoleError, RoleResult};
use crate::role::{EffectiveRole, RoleDefinition, RoleGroup};

/// Effective roles of both groups, each ordered by ascending weight.
///
/// # Examples
///
/// ```
/// use role_hierarchy::{RoleDefinition, RoleGroup, RoleHierarchy};
///
/// let roles = vec![
///     RoleDefinition::global("admin", "Admin", 50).with_grants([("user.*", true)]).unwrap(),
///     RoleDefinition::global("user", "User", 20).with_grants([("team.create", true)]).unwrap(),
/// ];
///
/// let hierarchy = RoleHierarchy::build(&roles).unwrap();
/// let admin = hierarchy.role("admin").unwrap();
/// assert_eq!(admin.permissions.get("team.create"), Some(true));
/// assert_eq!(admin.permissions.get("user.*"), Some(true));
/// assert_eq!(hierarchy.default_role(RoleGroup::Global).unwrap().name, "user");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleHierarchy {
    global: Vec<EffectiveRole>,
    team: Vec<EffectiveRole>,
}

impl RoleHierarchy {
    /// Build with the default evaluator.
    pub fn build(roles: &[RoleDefinition]) -> RoleResult<Self> {
        Self::build_with(Evaluator::default(), roles)
    }

    /// Build with an explicit evaluator.
    ///
    /// Roles sharing a weight keep their declaration order. Duplicate names
    /// are rejected.
    pub fn build_with(evaluator: Evaluator, roles: &[RoleDefinition]) -> RoleResult<Self> {
        let mut names = HashSet::new();
        for role in roles {
            if !names.insert(role.name.as_str()) {
                return Err(RoleError::DuplicateRole(role.name.clone()));
            }
        }

        let (team, global): (Vec<_>, Vec<_>) = roles.iter().partition(|role| role.team_member_role);

        Ok(Self {
            global: propagate(evaluator, RoleGroup::Global, global),
            team: propagate(evaluator, RoleGroup::Team, team),
        })
    }

    /// Roles of one group, lowest weight first.
    pub fn group(&self, group: RoleGroup) -> &[EffectiveRole] {
        match group {
            RoleGroup::Global => &self.global,
            RoleGroup::Team => &self.team,
        }
    }

    /// Find a role by name in either group.
    pub fn role(&self, name: &str) -> Option<&EffectiveRole> {
        self.iter().find(|role| role.name == name)
    }

    /// Lowest-weight role of a group, assigned to new principals by default.
    pub fn default_role(&self, group: RoleGroup) -> Option<&EffectiveRole> {
        self.group(group).first()
    }

    /// All roles: the global group first, then the team group.
    pub fn iter(&self) -> impl Iterator<Item = &EffectiveRole> + '_ {
        self.global.iter().chain(self.team.iter())
    }

    /// Total number of roles.
    pub fn len(&self) -> usize {
        self.global.len() + self.team.len()
    }

    /// Check if no roles were declared.
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.team.is_empty()
    }
}

fn propagate(evaluator: Evaluator, group: RoleGroup, mut roles: Vec<&RoleDefinition>) -> Vec<EffectiveRole> {
    // Stable sort: equal weights stay in declaration order.
    roles.sort_by_key(|role| role.weight);

    for pair in roles.windows(2) {
        if pair[0].weight == pair[1].weight {
            warn!(
                group = %group,
                weight = pair[0].weight,
                first = %pair[0].name,
                second = %pair[1].name,
                "Roles share a weight; declaration order decides inheritance"
            );
        }
    }

    let mut source: Option<GrantMapping> = None;
    let mut effective_roles = Vec::with_capacity(roles.len());

    for role in roles {
        let permissions = match &source {
            Some(inherited) => evaluator.merge(inherited, &role.permissions),
            None => role.permissions.clone(),
        };

        debug!(
            group = %group,
            role = %role.name,
            weight = role.weight,
            propagate = role.propagate,
            permissions = permissions.len(),
            "Resolved role permissions"
        );

        if role.propagate {
            source = Some(permissions.clone());
        }

        effective_roles.push(EffectiveRole {
            name: role.name.clone(),
            title: role.title.clone(),
            weight: role.weight,
            team_member_role: role.team_member_role,
            permissions,
        });
    }

    effective_roles
}

#[cfg(test)]
mod tests {
    use super::*;
    use permission_engine::{MatchMode, Precedence};

    fn role(name: &str, weight: i32, grants: &[(&str, bool)]) -> RoleDefinition {
        RoleDefinition::global(name, name, weight)
            .with_grants(grants.iter().copied())
            .unwrap()
    }

    fn team_role(name: &str, weight: i32, grants: &[(&str, bool)]) -> RoleDefinition {
        RoleDefinition::team(name, name, weight)
            .with_grants(grants.iter().copied())
            .unwrap()
    }

    fn names(roles: &[EffectiveRole]) -> Vec<&str> {
        roles.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_chain_propagates() {
        let roles = vec![
            role("base", 0, &[("a.read", true)]),
            role("middle", 10, &[("x.extra", true)]),
            role("top", 20, &[("b.write", true)]),
        ];
        let hierarchy = RoleHierarchy::build(&roles).unwrap();
        let top = hierarchy.role("top").unwrap();
        assert_eq!(top.permissions.get("x.extra"), Some(true));
        assert_eq!(top.permissions.get("a.read"), Some(true));
        assert_eq!(top.permissions.get("b.write"), Some(true));
    }

    #[test]
    fn test_non_propagating_role_is_skipped_as_source() {
        let roles = vec![
            role("base", 0, &[("a.read", true)]),
            role("middle", 10, &[("x.extra", true)]).without_propagation(),
            role("top", 20, &[("b.write", true)]),
        ];
        let hierarchy = RoleHierarchy::build(&roles).unwrap();

        let middle = hierarchy.role("middle").unwrap();
        assert_eq!(middle.permissions.get("a.read"), Some(true));
        assert_eq!(middle.permissions.get("x.extra"), Some(true));

        let top = hierarchy.role("top").unwrap();
        assert_eq!(top.permissions.get("x.extra"), None);
        assert_eq!(top.permissions.get("a.read"), Some(true));
    }

    #[test]
    fn test_first_role_without_propagation_leaves_no_source() {
        let roles = vec![
            role("base", 0, &[("a.read", true)]).without_propagation(),
            role("top", 10, &[("b.write", true)]),
        ];
        let hierarchy = RoleHierarchy::build(&roles).unwrap();
        let top = hierarchy.role("top").unwrap();
        assert_eq!(top.permissions.len(), 1);
        assert_eq!(top.permissions.get("b.write"), Some(true));
    }

    #[test]
    fn test_declaration_order_is_irrelevant_to_weight_order() {
        let roles = vec![
            role("top", 20, &[]),
            role("base", 0, &[]),
            role("middle", 10, &[]),
        ];
        let hierarchy = RoleHierarchy::build(&roles).unwrap();
        assert_eq!(names(hierarchy.group(RoleGroup::Global)), vec!["base", "middle", "top"]);
    }

    #[test]
    fn test_own_grants_override_inherited() {
        let roles = vec![
            role("base", 0, &[("content.manga.publish", true)]),
            role("restricted", 10, &[("content.*", false)]),
        ];
        let hierarchy = RoleHierarchy::build(&roles).unwrap();
        let restricted = hierarchy.role("restricted").unwrap();
        assert!(restricted
            .permissions
            .same_order(&GrantMapping::from_pairs([("content.*", false)]).unwrap()));
    }

    #[test]
    fn test_groups_are_independent() {
        let roles = vec![
            team_role("owner", 50, &[("team.disband", true)]),
            role("user", 20, &[("team.create", true)]),
            team_role("member", 0, &[("volume.create", true)]),
            role("admin", 50, &[("user.*", true)]),
        ];
        let hierarchy = RoleHierarchy::build(&roles).unwrap();

        assert_eq!(names(hierarchy.group(RoleGroup::Global)), vec!["user", "admin"]);
        assert_eq!(names(hierarchy.group(RoleGroup::Team)), vec!["member", "owner"]);

        let owner = hierarchy.role("owner").unwrap();
        assert_eq!(owner.permissions.get("volume.create"), Some(true));
        assert_eq!(owner.permissions.get("team.create"), None);

        let admin = hierarchy.role("admin").unwrap();
        assert_eq!(admin.permissions.get("volume.create"), None);
        assert_eq!(admin.permissions.get("team.create"), Some(true));
    }

    #[test]
    fn test_weight_ties_follow_declaration_order() {
        let roles = vec![
            role("base", 0, &[("a.read", true)]),
            role("first", 10, &[("b.read", true)]),
            role("second", 10, &[("c.read", true)]),
        ];
        let hierarchy = RoleHierarchy::build(&roles).unwrap();
        assert_eq!(names(hierarchy.group(RoleGroup::Global)), vec!["base", "first", "second"]);

        let second = hierarchy.role("second").unwrap();
        assert_eq!(second.permissions.get("b.read"), Some(true));

        let swapped = vec![roles[0].clone(), roles[2].clone(), roles[1].clone()];
        let hierarchy = RoleHierarchy::build(&swapped).unwrap();
        assert_eq!(names(hierarchy.group(RoleGroup::Global)), vec!["base", "second", "first"]);
        assert_eq!(hierarchy.role("first").unwrap().permissions.get("c.read"), Some(true));
        assert_eq!(hierarchy.role("second").unwrap().permissions.get("b.read"), None);
    }

    #[test]
    fn test_negative_weights_sort_first() {
        let roles = vec![role("user", 0, &[]), role("banned", -10, &[("*", false)])];
        let hierarchy = RoleHierarchy::build(&roles).unwrap();
        assert_eq!(hierarchy.default_role(RoleGroup::Global).unwrap().name, "banned");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let roles = vec![role("user", 0, &[]), team_role("user", 0, &[])];
        assert!(matches!(
            RoleHierarchy::build(&roles),
            Err(RoleError::DuplicateRole(name)) if name == "user"
        ));
    }

    #[test]
    fn test_empty_hierarchy() {
        let hierarchy = RoleHierarchy::build(&[]).unwrap();
        assert!(hierarchy.is_empty());
        assert!(hierarchy.default_role(RoleGroup::Team).is_none());
    }

    #[test]
    fn test_evaluator_mode_is_used_for_inheritance() {
        let roles = vec![
            role("base", 0, &[("content.manga.delete", true)]),
            role("publisher", 10, &[("content.*.publish", true)]),
        ];

        let short = RoleHierarchy::build(&roles).unwrap();
        assert_eq!(short.role("publisher").unwrap().permissions.len(), 1);

        let full = RoleHierarchy::build_with(
            Evaluator::new(MatchMode::FullSuffix, Precedence::InsertionOrder),
            &roles,
        )
        .unwrap();
        let publisher = full.role("publisher").unwrap();
        assert_eq!(publisher.permissions.get("content.manga.delete"), Some(true));
        assert_eq!(publisher.permissions.get("content.*.publish"), Some(true));
    }
}
