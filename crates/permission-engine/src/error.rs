//! Error types for permission operations
//!
//! This module defines the errors raised while parsing permission paths,
//! loading schemas, validating caller input and denying access.

use std::path::PathBuf;

use thiserror::Error;

use crate::required::RequiredEntry;

/// Permission error types.
///
/// Parse and schema errors are configuration errors and are fatal at load time.
/// `UnknownPermission` is a validation error at the boundary that accepts input.
/// `PermissionDenied` is the structured form of a `false` check result.
#[derive(Debug, Error)]
pub enum PermissionError {
    /// The path string has no segments at all
    #[error("Permission path is empty")]
    EmptyPath,

    /// Two dots in a row, or a leading/trailing dot
    #[error("Empty segment in permission path: {path:?}")]
    EmptySegment {
        /// The offending path
        path: String,
    },

    /// A segment contains something other than `[a-z0-9-]`
    #[error("Invalid character {character:?} in permission path: {path:?}")]
    InvalidCharacter {
        /// The offending path
        path: String,
        /// First disallowed character
        character: char,
    },

    /// A `*` glued to other characters, e.g. `content.manga*`
    #[error("Wildcard must be a whole segment in permission path: {path:?}")]
    MisplacedWildcard {
        /// The offending path
        path: String,
    },

    /// A schema line failed to parse
    #[error("Schema line {line}: {source}")]
    SchemaLine {
        /// 1-based line number
        line: usize,
        /// Underlying path error
        #[source]
        source: Box<PermissionError>,
    },

    /// A schema file could not be read
    #[error("Failed to read schema {path}: {source}")]
    SchemaIo {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Permission is syntactically valid but not declared in the schema
    #[error("Permission not defined: {0}")]
    UnknownPermission(String),

    /// Required permissions are not granted
    #[error("Permission denied: required permissions: {}", join_required(.required))]
    PermissionDenied {
        /// Entries that were required for the operation
        required: Vec<RequiredEntry>,
    },
}

/// Result type for permission operations.
pub type PermissionResult<T> = Result<T, PermissionError>;

fn join_required(required: &[RequiredEntry]) -> String {
    required
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl PermissionError {
    /// Check if this error is a startup/configuration failure.
    ///
    /// Configuration errors should stop the process from starting instead of
    /// running with an unvalidated schema.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            PermissionError::SchemaLine { .. } | PermissionError::SchemaIo { .. }
        )
    }

    /// Check if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        self.is_config_error()
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            PermissionError::EmptyPath
            | PermissionError::EmptySegment { .. }
            | PermissionError::InvalidCharacter { .. }
            | PermissionError::MisplacedWildcard { .. }
            | PermissionError::UnknownPermission(_) => 400,

            PermissionError::PermissionDenied { .. } => 403,

            PermissionError::SchemaLine { .. } | PermissionError::SchemaIo { .. } => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            PermissionError::EmptyPath => "EMPTY_PATH",
            PermissionError::EmptySegment { .. } => "EMPTY_SEGMENT",
            PermissionError::InvalidCharacter { .. } => "INVALID_CHARACTER",
            PermissionError::MisplacedWildcard { .. } => "MISPLACED_WILDCARD",
            PermissionError::SchemaLine { .. } => "SCHEMA_ERROR",
            PermissionError::SchemaIo { .. } => "SCHEMA_IO_ERROR",
            PermissionError::UnknownPermission(_) => "UNKNOWN_PERMISSION",
            PermissionError::PermissionDenied { .. } => "PERMISSION_DENIED",
        }
    }
}
