//! Configuration for the orgflow handlers
//!
//! Settings come from an optional YAML file, overlaid with `ORGFLOW_*`
//! environment variables. A missing file is not an error: every setting has a
//! default.

pub mod error;

pub use error::*;

use orgflow_cloud::HandlerSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const CONFIG_FILE: &str = "orgflow.yaml";

/// Log output format of the entry process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::InvalidValue {
                key: "log_format",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// AWS region. Falls back to the SDK's own resolution when unset.
    pub region: Option<String>,

    /// Default tracing filter, used when `RUST_LOG` is unset
    pub log_level: String,

    pub log_format: LogFormat,

    pub record_ttl_secs: u64,

    pub verification_timeout_secs: u64,

    pub role_session_name: String,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        let settings = HandlerSettings::default();
        Self {
            region: None,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            record_ttl_secs: settings.record_ttl_secs,
            verification_timeout_secs: settings.verification_timeout_secs,
            role_session_name: settings.role_session_name,
        }
    }
}

impl HandlerConfig {
    /// Load the configuration for one invocation.
    ///
    /// An explicit path must exist. Without one, the discovery order of
    /// [`find_config_file`] applies, and finding nothing yields defaults.
    /// Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_config_file()?,
        };

        let mut config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path));
                }
                tracing::debug!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay `ORGFLOW_REGION`, `ORGFLOW_LOG_LEVEL` and `ORGFLOW_LOG_FORMAT`.
    /// `AWS_REGION` only fills a region nothing else set.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(region) = env_value("ORGFLOW_REGION") {
            self.region = Some(region);
        } else if self.region.is_none() {
            self.region = env_value("AWS_REGION");
        }

        if let Some(level) = env_value("ORGFLOW_LOG_LEVEL") {
            self.log_level = level;
        }

        if let Some(format) = env_value("ORGFLOW_LOG_FORMAT") {
            self.log_format = format.parse()?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.record_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "record_ttl_secs",
                value: "0".to_string(),
            });
        }

        if self.verification_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "verification_timeout_secs",
                value: "0".to_string(),
            });
        }

        // STS: 2-64 chars of [\w+=,.@-]
        let name = &self.role_session_name;
        let valid_chars = name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_+=,.@-".contains(c));
        if !(2..=64).contains(&name.len()) || !valid_chars {
            return Err(ConfigError::InvalidValue {
                key: "role_session_name",
                value: name.clone(),
            });
        }

        Ok(())
    }

    /// Handler-facing part of the configuration
    pub fn settings(&self) -> HandlerSettings {
        HandlerSettings {
            record_ttl_secs: self.record_ttl_secs,
            verification_timeout_secs: self.verification_timeout_secs,
            role_session_name: self.role_session_name.clone(),
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Find the orgflow config file
///
/// Search order:
/// 1. `ORGFLOW_CONFIG_PATH` (returned even if it does not exist)
/// 2. `./orgflow.yaml`
/// 3. `./.orgflow/orgflow.yaml`
/// 4. `<config dir>/orgflow/orgflow.yaml`
pub fn find_config_file() -> Result<Option<PathBuf>> {
    if let Some(config_path) = env_value("ORGFLOW_CONFIG_PATH") {
        return Ok(Some(PathBuf::from(config_path)));
    }

    let current_dir = std::env::current_dir()?;

    let path = current_dir.join(CONFIG_FILE);
    if path.exists() {
        return Ok(Some(path));
    }

    let path = current_dir.join(".orgflow").join(CONFIG_FILE);
    if path.exists() {
        return Ok(Some(path));
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("orgflow").join(CONFIG_FILE);
        if global_config.exists() {
            return Ok(Some(global_config));
        }
    }

    Ok(None)
}
