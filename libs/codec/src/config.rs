//! # Decoder Configuration
//!
//! Field and frame bounds used while decoding replies. Defaults match what the
//! capture tooling has always used. Deployments can override them from a TOML
//! file or from environment variables.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Placeholder substituted for string fields that exceed `max_string_len`
pub const DEFAULT_PLACEHOLDER: &str = "path-too-long";

/// Bounds applied by the reply decoder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Longest string field (paths) decoded verbatim, in bytes
    pub max_string_len: usize,

    /// Longest opaque buffer (session password) decoded verbatim, in bytes
    pub max_buffer_len: usize,

    /// Largest outer length prefix accepted; unbounded when `None`
    pub max_frame_len: Option<usize>,

    /// Value used in place of an oversized string field
    pub placeholder: String,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_string_len: 1024,
            max_buffer_len: 1024,
            max_frame_len: None,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl DecoderConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `ZK_*` environment overrides on top of `self`
    ///
    /// Unparseable values are ignored and the current value is kept.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("ZK_MAX_STRING_LEN") {
            if let Ok(len) = val.parse() {
                self.max_string_len = len;
            }
        }

        if let Ok(val) = std::env::var("ZK_MAX_BUFFER_LEN") {
            if let Ok(len) = val.parse() {
                self.max_buffer_len = len;
            }
        }

        if let Ok(val) = std::env::var("ZK_MAX_FRAME_LEN") {
            if let Ok(len) = val.parse() {
                self.max_frame_len = Some(len);
            }
        }

        if let Ok(val) = std::env::var("ZK_STRING_PLACEHOLDER") {
            self.placeholder = val;
        }

        self
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading decoder config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Reject bounds that would make every field oversized
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_string_len == 0 {
            return Err(ConfigError::Invalid {
                field: "max_string_len",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.max_buffer_len == 0 {
            return Err(ConfigError::Invalid {
                field: "max_buffer_len",
                reason: "must be greater than zero".to_string(),
            });
        }
        if let Some(limit) = self.max_frame_len {
            if limit == 0 || limit > i32::MAX as usize {
                return Err(ConfigError::Invalid {
                    field: "max_frame_len",
                    reason: format!("must be between 1 and {}", i32::MAX),
                });
            }
        }
        Ok(())
    }

    /// Tight bounds for inspecting untrusted or noisy captures
    pub fn strict() -> Self {
        Self {
            max_string_len: 256,
            max_buffer_len: 64,
            max_frame_len: Some(64 * 1024),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}
