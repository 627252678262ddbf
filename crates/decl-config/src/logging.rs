//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Levels accepted by [`LogConfig::level`].
pub const LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

fn default_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogConfig {
    /// Default filter level when `DECL_LOG` is unset and neither `--quiet`
    /// nor `--verbose` is given.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn is_valid_level(&self) -> bool {
        LEVELS.contains(&self.level.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = LogConfig::default();
        assert_eq!(config.level, "warn");
        assert!(config.is_valid_level());
    }

    #[test]
    fn unknown_level_is_invalid() {
        let config = LogConfig {
            level: "loud".to_string(),
        };
        assert!(!config.is_valid_level());
    }
}
