//! Access registry
//!
//! Everything a service needs to authorize requests, built once at startup
//! and passed by reference: both permission schemas, the role hierarchy and
//! the configured evaluator.

use permission_engine::{
    configured_global_schema, configured_team_schema, EngineConfig, Evaluator, GrantMapping, PermissionSchema,
    RequiredEntry,
};
use tracing::info;

use crate::defaults::default_roles;
use crate::error::{RoleError, RoleResult};
use crate::hierarchy::RoleHierarchy;
use crate::principal::{apply_update, GrantUpdate, Principal};
use crate::role::{EffectiveRole, RoleDefinition, RoleGroup};
use crate::seed::{plan_reconciliation, ReconcilePlan, StoredRole};

/// Immutable authorization state.
///
/// # Examples
///
/// ```
/// use permission_engine::{parse_required, EngineConfig, GrantMapping};
/// use role_hierarchy::AccessRegistry;
///
/// let registry = AccessRegistry::load(EngineConfig::default()).unwrap();
/// let user = registry.principal("user", GrantMapping::new()).unwrap();
///
/// let required = parse_required(["team.create"]).unwrap();
/// assert!(registry.authorize(&user, &required).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct AccessRegistry {
    config: EngineConfig,
    evaluator: Evaluator,
    global: PermissionSchema,
    team: PermissionSchema,
    roles: RoleHierarchy,
}

impl AccessRegistry {
    /// Build from configuration with the bundled default roles.
    pub fn load(config: EngineConfig) -> RoleResult<Self> {
        let global = configured_global_schema(&config)?;
        let team = configured_team_schema(&config)?;
        let roles = default_roles()?;
        Self::from_parts(config, global, team, &roles)
    }

    /// Build from environment configuration with the bundled default roles.
    pub fn from_env() -> RoleResult<Self> {
        Self::load(EngineConfig::from_env()?)
    }

    /// Build from explicit schemas and role declarations.
    ///
    /// Every role is validated against its group's schema before the
    /// hierarchy is built.
    ///
    /// # Arguments
    ///
    /// * `config` - Engine configuration; selects the evaluator
    /// * `global` - Schema for global roles and user grants
    /// * `team` - Schema for team roles and member grants
    /// * `roles` - Role declarations of both groups
    pub fn from_parts(
        config: EngineConfig,
        global: PermissionSchema,
        team: PermissionSchema,
        roles: &[RoleDefinition],
    ) -> RoleResult<Self> {
        config.validate()?;

        for role in roles {
            let schema = match role.group() {
                RoleGroup::Global => &global,
                RoleGroup::Team => &team,
            };
            role.validate(schema)?;
        }

        let evaluator = Evaluator::from_config(&config);
        let hierarchy = RoleHierarchy::build_with(evaluator, roles)?;

        info!(
            match_mode = %evaluator.mode.as_str(),
            precedence = %evaluator.precedence.as_str(),
            global_permissions = global.len(),
            team_permissions = team.len(),
            global_roles = hierarchy.group(RoleGroup::Global).len(),
            team_roles = hierarchy.group(RoleGroup::Team).len(),
            "Access registry loaded"
        );

        Ok(Self {
            config,
            evaluator,
            global,
            team,
            roles: hierarchy,
        })
    }

    /// Configuration the registry was built from.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Configured evaluator.
    pub fn evaluator(&self) -> Evaluator {
        self.evaluator
    }

    /// Permission schema of a group.
    pub fn schema(&self, group: RoleGroup) -> &PermissionSchema {
        match group {
            RoleGroup::Global => &self.global,
            RoleGroup::Team => &self.team,
        }
    }

    /// The built role hierarchy.
    pub fn roles(&self) -> &RoleHierarchy {
        &self.roles
    }

    /// Find a role by name.
    pub fn role(&self, name: &str) -> RoleResult<&EffectiveRole> {
        self.roles
            .role(name)
            .ok_or_else(|| RoleError::UnknownRole(name.to_string()))
    }

    /// Role assigned to new principals of a group.
    pub fn default_role(&self, group: RoleGroup) -> Option<&EffectiveRole> {
        self.roles.default_role(group)
    }

    /// Assign a role to a principal with validated local grants.
    pub fn principal(&self, role: &str, local_permissions: GrantMapping) -> RoleResult<Principal> {
        let role = self.role(role)?;
        self.schema(role.group()).validate_grants(&local_permissions)?;
        Ok(Principal::for_role(role, local_permissions))
    }

    /// Apply an administrative update to grants of the given group.
    pub fn apply_update(
        &self,
        group: RoleGroup,
        current: &GrantMapping,
        update: GrantUpdate,
    ) -> RoleResult<GrantMapping> {
        apply_update(self.evaluator, self.schema(group), current, update)
    }

    /// Reject required entries not declared in the group's schema.
    ///
    /// Run this once per endpoint at startup.
    pub fn validate_required(&self, group: RoleGroup, required: &[RequiredEntry]) -> RoleResult<()> {
        self.schema(group).validate_required(required)?;
        Ok(())
    }

    /// Authorize a principal against required entries.
    pub fn authorize(&self, principal: &Principal, required: &[RequiredEntry]) -> RoleResult<()> {
        principal.authorize(self.evaluator, required)
    }

    /// Plan seed writes against stored roles.
    pub fn reconcile(&self, existing: &[StoredRole]) -> ReconcilePlan {
        plan_reconciliation(&self.roles, existing)
    }
}
