//! # Permission Engine
//!
//! This crate decides whether a set of granted permissions covers what an
//! operation requires. It is shared by the reader service and its admin
//! tooling.
//!
//! ## Overview
//!
//! The permission-engine crate handles:
//! - **Paths**: dot-separated permission identifiers with `*` wildcard segments
//! - **Schemas**: the declared set of valid paths, parsed from text or built in code
//! - **Matching**: whether one granted pattern covers one required path
//! - **Grant Mappings**: ordered path → allow/deny maps held by roles and principals
//! - **Merging**: combining two mappings with precedence for the second
//! - **Checking**: evaluating required entries (with any-of groups) against a mapping
//!
//! ## Architecture
//!
//! ```text
//! Schema text ──parse──▶ PermissionSchema ──validates──▶ GrantMapping keys
//!                                                        RequiredEntry paths
//!
//! GrantMapping ⊕ GrantMapping ──merge──▶ GrantMapping
//! [RequiredEntry] × GrantMapping ──check──▶ bool / PermissionDenied
//!
//! Examples:
//!   "*"                        - Everything
//!   "content.*"                - Everything under content
//!   "content.*.publish"        - Publish any content type
//!   "user.own.update-info"     - One capability
//!   "user.own.update-info | user.update-info" - Either of two
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use permission_engine::{check_permissions, merge_permissions, parse_required, GrantMapping};
//!
//! let role = GrantMapping::from_pairs([("content.*", true), ("team.create", true)]).unwrap();
//! let local = GrantMapping::from_pairs([("team.*", false)]).unwrap();
//! let effective = merge_permissions(&role, &local);
//!
//! assert!(check_permissions(&parse_required(["content.manga.publish"]).unwrap(), &effective));
//! assert!(!check_permissions(&parse_required(["team.create"]).unwrap(), &effective));
//! ```
//!
//! ## Concurrency
//!
//! Every operation is a pure function over immutable inputs. Schemas and
//! mappings are `Send + Sync` and can be shared behind `Arc` by any number of
//! concurrent requests; updates always produce new mappings.

pub mod check;
pub mod config;
pub mod definitions;
pub mod error;
pub mod evaluator;
pub mod grants;
pub mod matching;
pub mod merge;
pub mod path;
pub mod required;
pub mod schema;

// Re-export main types for convenience
pub use check::{check_permissions, check_with, Precedence};
pub use config::{ConfigError, EngineConfig};
pub use definitions::{
    configured_global_schema, configured_team_schema, global_schema, team_schema, GLOBAL_SCHEMA, TEAM_SCHEMA,
};
pub use error::{PermissionError, PermissionResult};
pub use evaluator::{authorize, Evaluator};
pub use grants::GrantMapping;
pub use matching::{satisfies, MatchMode};
pub use merge::{merge_permissions, merge_with_mode};
pub use path::{PermissionPath, Segment, WILDCARD};
pub use required::{parse_required, RequiredEntry};
pub use schema::{parse_schema, PermissionSchema, SchemaBuilder};
