//! Bundled schema definitions.
//!
//! The global schema covers user, team and content administration; the team
//! schema covers what members can do inside a single team. Both are plain
//! text compiled into the binary and can be replaced through configuration.

use crate::config::EngineConfig;
use crate::error::PermissionResult;
use crate::schema::{parse_schema, PermissionSchema};

/// Text of the bundled global schema.
pub const GLOBAL_SCHEMA: &str = include_str!("../schemas/global.perms");

/// Text of the bundled team schema.
pub const TEAM_SCHEMA: &str = include_str!("../schemas/team.perms");

/// Parse the bundled global schema.
pub fn global_schema() -> PermissionResult<PermissionSchema> {
    parse_schema(GLOBAL_SCHEMA)
}

/// Parse the bundled team schema.
pub fn team_schema() -> PermissionResult<PermissionSchema> {
    parse_schema(TEAM_SCHEMA)
}

/// Global schema from the configured file, or the bundled one.
pub fn configured_global_schema(config: &EngineConfig) -> PermissionResult<PermissionSchema> {
    match &config.schema_path {
        Some(path) => PermissionSchema::load(path),
        None => global_schema(),
    }
}

/// Team schema from the configured file, or the bundled one.
pub fn configured_team_schema(config: &EngineConfig) -> PermissionResult<PermissionSchema> {
    match &config.team_schema_path {
        Some(path) => PermissionSchema::load(path),
        None => team_schema(),
    }
}
