//! Adjuster Configuration
//!
//! Names the meta tag and the directive keys the adjuster works with.
//! The defaults match the polyfill's published markup.

use crate::host::viewport_selector;
use serde::{Deserialize, Serialize};

/// Adjuster configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjusterConfig {
    /// `name` attribute of the meta tag to manage
    /// Default: `viewport`
    pub meta_name: String,

    /// Directive carrying the minimum width
    /// Default: `min-width`
    pub min_width_key: String,

    /// Directive rewritten to the minimum width
    /// Default: `width`
    pub width_key: String,
}

impl Default for AdjusterConfig {
    fn default() -> Self {
        Self {
            meta_name: String::from("viewport"),
            min_width_key: String::from("min-width"),
            width_key: String::from("width"),
        }
    }
}

impl AdjusterConfig {
    /// Load configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// CSS selector for the managed meta tag
    pub fn selector(&self) -> String {
        viewport_selector(&self.meta_name)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.meta_name.is_empty() || self.meta_name.contains(['"', '\\']) {
            return Err(ConfigError::InvalidMetaName(self.meta_name.clone()));
        }
        for key in [&self.min_width_key, &self.width_key] {
            if key.is_empty() || key.contains(|c: char| c == '=' || c == ',' || c.is_whitespace()) {
                return Err(ConfigError::InvalidKey(key.clone()));
            }
        }
        if self.min_width_key == self.width_key {
            return Err(ConfigError::SameKey(self.width_key.clone()));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid meta tag name: {0:?}")]
    InvalidMetaName(String),

    #[error("Directive key {0:?} must be non-empty without '=', ',' or whitespace")]
    InvalidKey(String),

    #[error("Width and minimum width cannot share the key {0:?}")]
    SameKey(String),

    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdjusterConfig::default();

        assert_eq!(config.selector(), "meta[name=\"viewport\"]");
        assert_eq!(config.min_width_key, "min-width");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AdjusterConfig::default();
        config.min_width_key = String::from("min,width");
        assert!(matches!(config.validate(), Err(ConfigError::InvalidKey(_))));

        let mut config = AdjusterConfig::default();
        config.width_key = String::from("min-width");
        assert!(matches!(config.validate(), Err(ConfigError::SameKey(_))));

        let mut config = AdjusterConfig::default();
        config.meta_name = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidMetaName(_))));
    }

    #[test]
    fn test_from_json_partial() {
        let config = AdjusterConfig::from_json(r#"{ "min_width_key": "data-min-width" }"#).unwrap();

        assert_eq!(config.min_width_key, "data-min-width");
        assert_eq!(config.width_key, "width");
    }

    #[test]
    fn test_from_json_rejects_bad_key() {
        assert!(AdjusterConfig::from_json(r#"{ "width_key": "" }"#).is_err());
        assert!(matches!(
            AdjusterConfig::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
