//! Error types for role operations

use permission_engine::{ConfigError, PermissionError};
use thiserror::Error;

/// Role error types.
///
/// Declaration errors (`DuplicateRole`, `UnknownGrant`) come from static role
/// definitions and are fatal at startup. `UnknownRole` and wrapped
/// `Permission` validation errors come from administrative input.
#[derive(Debug, Error)]
pub enum RoleError {
    /// Two roles were declared with the same name
    #[error("Duplicate role: {0}")]
    DuplicateRole(String),

    /// A role name does not exist in the hierarchy
    #[error("Role not exist: {0}")]
    UnknownRole(String),

    /// A declared role grants a permission missing from its group's schema
    #[error("Role {role} grants undeclared permission {permission}")]
    UnknownGrant {
        /// Role name
        role: String,
        /// Undeclared permission
        permission: String,
    },

    /// Permission parsing, schema or authorization error
    #[error(transparent)]
    Permission(#[from] PermissionError),

    /// Engine configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for role operations.
pub type RoleResult<T> = Result<T, RoleError>;

impl RoleError {
    /// Check if this error should stop the process from starting.
    pub fn is_config_error(&self) -> bool {
        match self {
            RoleError::DuplicateRole(_) | RoleError::UnknownGrant { .. } | RoleError::Config(_) => true,
            RoleError::Permission(err) => err.is_config_error(),
            RoleError::UnknownRole(_) => false,
        }
    }

    /// Check if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            RoleError::UnknownRole(_) => 404,
            RoleError::Permission(err) => err.status_code(),
            RoleError::DuplicateRole(_) | RoleError::UnknownGrant { .. } | RoleError::Config(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            RoleError::DuplicateRole(_) => "DUPLICATE_ROLE",
            RoleError::UnknownRole(_) => "ROLE_NOT_EXIST",
            RoleError::UnknownGrant { .. } => "UNKNOWN_GRANT",
            RoleError::Permission(err) => err.error_code(),
            RoleError::Config(_) => "CONFIG_ERROR",
        }
    }
}
