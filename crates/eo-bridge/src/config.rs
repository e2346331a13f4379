//! Configuration for discovery and loading.
//!
//! Defaults suit interactive use; every field can be overridden from the
//! environment or a YAML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// Bridge-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Upper bound on bytes read from any header or manifest.
    pub header_read_limit: usize,

    /// Maximum directory depth when listing a root (`None` = unlimited).
    pub max_depth: Option<usize>,

    /// Follow symbolic links while listing.
    pub follow_symlinks: bool,

    /// Log and skip malformed products while listing instead of failing.
    pub skip_malformed: bool,

    pub logging: LoggingConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            header_read_limit: 64 * 1024,
            max_depth: None,
            follow_symlinks: false,
            skip_malformed: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from environment variables on top of the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("EO_BRIDGE_HEADER_LIMIT") {
            if let Ok(limit) = val.parse() {
                config.header_read_limit = limit;
            }
        }

        if let Ok(val) = std::env::var("EO_BRIDGE_MAX_DEPTH") {
            if let Ok(depth) = val.parse() {
                config.max_depth = Some(depth);
            }
        }

        if let Ok(val) = std::env::var("EO_BRIDGE_FOLLOW_SYMLINKS") {
            config.follow_symlinks = parse_flag(&val);
        }

        if let Ok(val) = std::env::var("EO_BRIDGE_SKIP_MALFORMED") {
            config.skip_malformed = parse_flag(&val);
        }

        if let Ok(val) = std::env::var("EO_BRIDGE_LOG_LEVEL") {
            config.logging.level = val;
        }

        if let Ok(val) = std::env::var("EO_BRIDGE_LOG_FORMAT") {
            config.logging.format = LogFormat::from_str(&val);
        }

        config
    }

    /// Load configuration from a YAML file. Missing keys take their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| BridgeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)
            .map_err(|e| BridgeError::Config(format!("invalid YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.header_read_limit == 0 {
            return Err(BridgeError::Config(
                "header_read_limit must be > 0".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(BridgeError::Config(
                "max_depth must be > 0 when set".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(BridgeError::Config("logging.level is empty".to_string()));
        }
        Ok(())
    }
}

fn parse_flag(val: &str) -> bool {
    val.eq_ignore_ascii_case("true") || val == "1"
}

/// Logging settings used by [`crate::telemetry::init_logging`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `eo_bridge=debug`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Parse from a string, falling back to text.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}
