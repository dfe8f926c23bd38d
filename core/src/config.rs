//! Netplay settings (~/.config/Netplay/netplay.toml)
//!
//! Handles loading, saving, and providing defaults for the settings the
//! session core reads when a session is created.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::DEFAULT_NETPLAY_PORT;

const SETTINGS_FILE: &str = "netplay.toml";

/// Netplay settings.
///
/// Serialized to/from TOML format for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NetplaySettings {
    /// Connection settings
    #[serde(default)]
    pub netplay: ConnectionConfig,
    /// Local input settings
    #[serde(default)]
    pub input: InputConfig,
    /// Rewind buffer settings
    #[serde(default)]
    pub rewind: RewindConfig,
}

/// Connection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// UDP port to host on or connect to (default: 55435)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Local port a client binds (default: same as `port`)
    #[serde(default)]
    pub bind_port: Option<u16>,
    /// Server to connect to as a client (default: empty)
    #[serde(default)]
    pub server: String,
    /// Session password, forwarded to relay-aware backends
    #[serde(default)]
    pub password: String,
    /// Preferred MITM relay id (default: "nyc")
    #[serde(default = "default_mitm_server")]
    pub mitm_server: String,
    /// Exchange state checksums with peers (default: true)
    #[serde(default = "default_true")]
    pub desync_detection: bool,
}

/// Input configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Number of configured local users (default: 2)
    #[serde(default = "default_max_users")]
    pub max_users: u32,
}

/// Rewind buffer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewindConfig {
    /// Per-player state buffer size in KB (default: 20480)
    #[serde(default = "default_buffer_size_kb")]
    pub buffer_size_kb: u32,
}

fn default_port() -> u16 {
    DEFAULT_NETPLAY_PORT
}
fn default_mitm_server() -> String {
    "nyc".to_string()
}
fn default_true() -> bool {
    true
}
fn default_max_users() -> u32 {
    2
}
fn default_buffer_size_kb() -> u32 {
    20 * 1024
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_port: None,
            server: String::new(),
            password: String::new(),
            mitm_server: default_mitm_server(),
            desync_detection: default_true(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_users: default_max_users(),
        }
    }
}

impl Default for RewindConfig {
    fn default() -> Self {
        Self {
            buffer_size_kb: default_buffer_size_kb(),
        }
    }
}

/// Errors from reading or writing the settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Netplay\config`
/// On macOS: `~/Library/Application Support/io.netplay.Netplay`
/// On Linux: `~/.config/Netplay`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.netplay", "", "Netplay")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Loads the settings from the platform configuration directory.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> NetplaySettings {
    let Some(path) = config_dir().map(|dir| dir.join(SETTINGS_FILE)) else {
        return NetplaySettings::default();
    };

    match load_from(&path) {
        Ok(settings) => settings,
        Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            NetplaySettings::default()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Using default netplay settings");
            NetplaySettings::default()
        }
    }
}

/// Loads settings from an explicit path.
pub fn load_from(path: &Path) -> Result<NetplaySettings, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Saves settings to an explicit path, creating parent directories.
pub fn save_to(settings: &NetplaySettings, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Saves settings to the platform configuration directory.
///
/// Does nothing if the home directory cannot be determined.
pub fn save(settings: &NetplaySettings) -> Result<(), ConfigError> {
    match config_dir() {
        Some(dir) => save_to(settings, &dir.join(SETTINGS_FILE)),
        None => Ok(()),
    }
}
