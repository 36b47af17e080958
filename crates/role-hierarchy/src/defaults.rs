//! Bundled role definitions
//!
//! The roles every deployment starts with. They are reconciled into storage
//! at startup; administrators can add more roles at runtime.

use crate::error::RoleResult;
use crate::role::RoleDefinition;

/// Global role with every permission.
pub const ROLE_ROOT: &str = "root";
/// Global role administering users and content.
pub const ROLE_ADMINISTRATOR: &str = "administrator";
/// Global role moderating content and users.
pub const ROLE_MODERATOR: &str = "moderator";
/// Global role allowed to publish content; does not propagate.
pub const ROLE_PUBLISHER: &str = "publisher";
/// Global role of a verified user.
pub const ROLE_USER: &str = "user";
/// Global role of a user who has not verified their account.
pub const ROLE_UNVERIFIED: &str = "unverified";
/// Team role of the team owner.
pub const ROLE_TEAM_OWNER: &str = "team-owner";
/// Team role of a regular team member.
pub const ROLE_TEAM_MEMBER: &str = "team-member";

/// Declare the bundled roles.
///
/// Grant keys refer to the bundled global and team schemas.
pub fn default_roles() -> RoleResult<Vec<RoleDefinition>> {
    Ok(vec![
        RoleDefinition::team(ROLE_TEAM_OWNER, "Team owner", 50).with_grants([
            ("content-variant.*", true),
            ("volume.*", true),
            ("chapter.*", true),
            ("page.*.*", true),
            ("team.disband", true),
            ("team.update", true),
            ("member.manage-roles", true),
            ("member.manage-permissions", true),
            ("member.kick", true),
            ("join.list", true),
            ("join.accept", true),
            ("join.reject", true),
        ])?,
        RoleDefinition::team(ROLE_TEAM_MEMBER, "Team member", 0).with_grants([
            ("volume.create", true),
            ("chapter.create", true),
            ("page.*.create", true),
        ])?,
        RoleDefinition::global(ROLE_ROOT, "Root", 666).with_grants([("*", true)])?,
        RoleDefinition::global(ROLE_ADMINISTRATOR, "Administrator", 50).with_grants([
            ("content.*.*", true),
            ("user.permission-management", true),
        ])?,
        RoleDefinition::global(ROLE_MODERATOR, "Moderator", 40).with_grants([
            ("content.*.delete", true),
            ("user.update-info", true),
            ("team.verify", true),
        ])?,
        RoleDefinition::global(ROLE_PUBLISHER, "Publisher", 30)
            .with_grants([
                ("content.*.publish", true),
                ("content.*.update", true),
                ("content.*.delete", true),
            ])?
            .without_propagation(),
        RoleDefinition::global(ROLE_USER, "User", 20).with_grants([
            ("user.own.update-info", true),
            ("team.create", true),
        ])?,
        RoleDefinition::global(ROLE_UNVERIFIED, "Unverified", 0),
    ])
}
