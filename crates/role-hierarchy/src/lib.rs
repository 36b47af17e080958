//! # Role Hierarchy
//!
//! This crate turns statically declared roles into effective roles and
//! resolves what a user or team member may do. It builds on
//! `permission-engine` for matching, merging and checking.
//!
//! ## Overview
//!
//! The role-hierarchy crate handles:
//! - **Roles**: declarations with a weight, a group and their own grants
//! - **Hierarchy**: weight-ordered inheritance inside each group
//! - **Principals**: a role plus local grant overrides
//! - **Updates**: validated replace-or-merge changes to grant mappings
//! - **Seeding**: planning writes that bring stored roles up to date
//! - **Registry**: schemas, roles and evaluator loaded once at startup
//!
//! ## Architecture
//!
//! ```text
//! EngineConfig ──▶ AccessRegistry
//!                    ├─ PermissionSchema (global, team)
//!                    ├─ Evaluator (match mode, precedence)
//!                    └─ RoleHierarchy
//!                          ├─ Global: unverified ─▶ user ─▶ moderator ─▶ administrator ─▶ root
//!                          └─ Team:   team-member ─▶ team-owner
//!
//! Principal = EffectiveRole.permissions ⊕ local_permissions
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use permission_engine::{parse_required, EngineConfig, GrantMapping};
//! use role_hierarchy::{AccessRegistry, GrantUpdate, RoleGroup};
//!
//! let registry = AccessRegistry::load(EngineConfig::default()).unwrap();
//!
//! // A moderator whose team verification right was taken away
//! let local = GrantMapping::from_pairs([("team.verify", false)]).unwrap();
//! let moderator = registry.principal("moderator", local).unwrap();
//!
//! let required = parse_required(["user.update-info"]).unwrap();
//! registry.validate_required(RoleGroup::Global, &required).unwrap();
//! assert!(registry.authorize(&moderator, &required).is_ok());
//! assert!(registry.authorize(&moderator, &parse_required(["team.verify"]).unwrap()).is_err());
//!
//! // Restore it through an administrative update
//! let restore = GrantMapping::from_pairs([("team.verify", true)]).unwrap();
//! let moderator = moderator
//!     .with_update(registry.evaluator(), registry.schema(RoleGroup::Global), GrantUpdate::Merge(restore))
//!     .unwrap();
//! assert!(registry.authorize(&moderator, &parse_required(["team.verify"]).unwrap()).is_ok());
//! ```

pub mod defaults;
pub mod error;
pub mod hierarchy;
pub mod principal;
pub mod registry;
pub mod role;
pub mod seed;

// Re-export main types for convenience
pub use defaults::{
    default_roles, ROLE_ADMINISTRATOR, ROLE_MODERATOR, ROLE_PUBLISHER, ROLE_ROOT, ROLE_TEAM_MEMBER, ROLE_TEAM_OWNER,
    ROLE_UNVERIFIED, ROLE_USER,
};
pub use error::{RoleError, RoleResult};
pub use hierarchy::RoleHierarchy;
pub use principal::{apply_update, derive_from_base, effective_grants, GrantUpdate, Principal};
pub use registry::AccessRegistry;
pub use role::{EffectiveRole, RoleDefinition, RoleGroup};
pub use seed::{plan_reconciliation, ReconcilePlan, RoleField, RoleUpdate, StoredRole};
