//! Configuration error types.
//!
//! Gameplay operations never return errors: rejected casts and missing
//! entities are ordinary outcomes. The only fallible surface is loading and
//! validating a [`crate::GameConfig`].

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The JSON was malformed or had fields of the wrong type.
    Parse(serde_json::Error),

    /// A tuning value is outside the range the simulation can handle.
    Invalid {
        /// Dotted field path, e.g. `enemy.spawn_interval`.
        field: &'static str,
        /// The rejected value.
        value: f32,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {}", path.display(), source)
            }
            ConfigError::Parse(err) => write!(f, "invalid config JSON: {err}"),
            ConfigError::Invalid {
                field,
                value,
                expected,
            } => write!(f, "config field `{field}` = {value} (expected {expected})"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_display_names_field() {
        let err = ConfigError::Invalid {
            field: "player.base_speed",
            value: -1.0,
            expected: "> 0",
        };
        let msg = err.to_string();
        assert!(msg.contains("player.base_speed"));
        assert!(msg.contains("-1"));
    }

    #[test]
    fn test_parse_error_has_source() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = ConfigError::from(json_err);
        assert!(std::error::Error::source(&err).is_some());
    }
}
