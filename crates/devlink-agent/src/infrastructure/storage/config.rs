//! TOML-based configuration for the agent.
//!
//! Reads `AgentConfig` from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\devlink\config.toml`
//! - Unix:     `$XDG_CONFIG_HOME/devlink/config.toml` (or `~/.config/...`)
//!
//! Every field carries a serde default so the agent runs correctly on first
//! start, before any config file exists, and keeps working when an older
//! file is missing newer fields.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level agent configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AgentConfig {
    #[serde(default)]
    pub agent: AgentSection,
    #[serde(default)]
    pub network: NetworkSection,
    #[serde(default)]
    pub clipboard: ClipboardSection,
}

/// General agent behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentSection {
    /// Human-readable name of this device, used in log output.
    #[serde(default = "default_device_name")]
    pub device_name: String,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    /// `RUST_LOG` overrides this when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Controller connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkSection {
    /// `host:port` of the controller's TCP control channel.
    #[serde(default = "default_controller_addr")]
    pub controller_addr: String,
    /// Seconds between reconnect attempts when the connection drops.
    #[serde(default = "default_reconnect_interval_secs")]
    pub reconnect_interval_secs: u64,
}

/// Clipboard sync settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClipboardSection {
    /// Whether clipboard changes are reported at all.
    #[serde(default = "default_true")]
    pub sync_enabled: bool,
    /// Milliseconds between clipboard polls.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_device_name() -> String {
    "devlink-agent".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_controller_addr() -> String {
    "127.0.0.1:27183".to_string()
}

fn default_reconnect_interval_secs() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    500
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            device_name: default_device_name(),
            log_level: default_log_level(),
        }
    }
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self {
            controller_addr: default_controller_addr(),
            reconnect_interval_secs: default_reconnect_interval_secs(),
        }
    }
}

impl Default for ClipboardSection {
    fn default() -> Self {
        Self {
            sync_enabled: default_true(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Returns the platform-appropriate path of the agent config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when neither the platform
/// config variable nor `HOME` is set.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let base = if cfg!(target_os = "windows") {
        std::env::var_os("APPDATA").map(PathBuf::from)
    } else {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
    };
    let base = base.ok_or(ConfigError::NoPlatformConfigDir)?;
    Ok(base.join("devlink").join("config.toml"))
}

impl AgentConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid TOML.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads the config from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Loads the config from `path`, falling back to defaults when the file
    /// does not exist. A file that exists but cannot be read or parsed is
    /// still an error; a broken config should be fixed, not ignored.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
