//! Engine configuration.
//!
//! Selects the matching and precedence behavior and optionally points the
//! schemas at files instead of the bundled definitions. Configuration is
//! loaded from environment variables or JSON, with defaults that reproduce
//! the observed production behavior.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::check::Precedence;
use crate::matching::MatchMode;

/// Environment variable selecting the match mode.
pub const ENV_MATCH_MODE: &str = "PERMISSIONS_MATCH_MODE";
/// Environment variable selecting the precedence.
pub const ENV_PRECEDENCE: &str = "PERMISSIONS_PRECEDENCE";
/// Environment variable pointing at a global schema file.
pub const ENV_SCHEMA_PATH: &str = "PERMISSIONS_SCHEMA_PATH";
/// Environment variable pointing at a team schema file.
pub const ENV_TEAM_SCHEMA_PATH: &str = "PERMISSIONS_TEAM_SCHEMA_PATH";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },

    /// Configuration document could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Permission engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Wildcard interpretation for matching, merging and checking.
    pub match_mode: MatchMode,

    /// Conflict resolution between overlapping grant entries.
    pub precedence: Precedence,

    /// Global schema file; the bundled schema is used when unset.
    pub schema_path: Option<PathBuf>,

    /// Team schema file; the bundled schema is used when unset.
    pub team_schema_path: Option<PathBuf>,
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PERMISSIONS_MATCH_MODE`: `short-circuit` (default) or `full-suffix`
    /// - `PERMISSIONS_PRECEDENCE`: `insertion-order` (default) or `most-specific`
    /// - `PERMISSIONS_SCHEMA_PATH`: global schema file
    /// - `PERMISSIONS_TEAM_SCHEMA_PATH`: team schema file
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        let match_mode = match lookup(ENV_MATCH_MODE) {
            Some(value) => MatchMode::parse(&value).ok_or_else(|| ConfigError::InvalidValue {
                key: ENV_MATCH_MODE.to_string(),
                message: format!("expected short-circuit or full-suffix, got {value:?}"),
            })?,
            None => default.match_mode,
        };

        let precedence = match lookup(ENV_PRECEDENCE) {
            Some(value) => Precedence::parse(&value).ok_or_else(|| ConfigError::InvalidValue {
                key: ENV_PRECEDENCE.to_string(),
                message: format!("expected insertion-order or most-specific, got {value:?}"),
            })?,
            None => default.precedence,
        };

        let config = Self {
            match_mode,
            precedence,
            schema_path: lookup(ENV_SCHEMA_PATH).map(PathBuf::from),
            team_schema_path: lookup(ENV_TEAM_SCHEMA_PATH).map(PathBuf::from),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON document. Missing fields use defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate path settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, path) in [
            (ENV_SCHEMA_PATH, &self.schema_path),
            (ENV_TEAM_SCHEMA_PATH, &self.team_schema_path),
        ] {
            if matches!(path, Some(p) if p.as_os_str().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "path is empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.match_mode, MatchMode::ShortCircuit);
        assert_eq!(config.precedence, Precedence::InsertionOrder);
        assert!(config.schema_path.is_none());
        assert!(config.team_schema_path.is_none());
    }

    #[test]
    fn test_from_lookup_empty_is_default() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_from_lookup_values() {
        let config = EngineConfig::from_lookup(lookup(&[
            (ENV_MATCH_MODE, "full-suffix"),
            (ENV_PRECEDENCE, "most-specific"),
            (ENV_SCHEMA_PATH, "/etc/perms/global.perms"),
        ]))
        .unwrap();
        assert_eq!(config.match_mode, MatchMode::FullSuffix);
        assert_eq!(config.precedence, Precedence::MostSpecific);
        assert_eq!(config.schema_path, Some(PathBuf::from("/etc/perms/global.perms")));
        assert!(config.team_schema_path.is_none());
    }

    #[test]
    fn test_from_lookup_rejects_unknown_mode() {
        let err = EngineConfig::from_lookup(lookup(&[(ENV_MATCH_MODE, "fuzzy")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_MATCH_MODE));

        let err = EngineConfig::from_lookup(lookup(&[(ENV_PRECEDENCE, "random")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_PRECEDENCE));
    }

    #[test]
    fn test_from_lookup_rejects_empty_path() {
        assert!(EngineConfig::from_lookup(lookup(&[(ENV_TEAM_SCHEMA_PATH, "")])).is_err());
    }

    #[test]
    fn test_from_json() {
        let config = EngineConfig::from_json_str(r#"{"match_mode": "full-suffix"}"#).unwrap();
        assert_eq!(config.match_mode, MatchMode::FullSuffix);
        assert_eq!(config.precedence, Precedence::InsertionOrder);

        assert!(matches!(
            EngineConfig::from_json_str(r#"{"precedence": "loudest"}"#),
            Err(ConfigError::Parse(_))
        ));
    }
}
