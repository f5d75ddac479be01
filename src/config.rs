//! Configuration management for the PS/2 keyboard core
//!
//! Configuration is read from a platform-specific config file. A missing
//! file means defaults.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/ps2kbd/config.toml` |
//! | macOS | `~/Library/Application Support/ps2kbd/config.toml` |
//! | Windows | `%APPDATA%\ps2kbd\config.toml` |
//!
//! ## Example
//!
//! ```no_run
//! use ps2_keyboard::Config;
//!
//! let mut config = Config::load().unwrap_or_default();
//! config.line_editor.echo = false;
//! config.save().expect("Failed to save config");
//! ```

use crate::keyboard::ScancodeTranslator;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Could not determine config directory")]
    NoConfigDir,
    /// IO error reading or writing config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse config file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize config
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Returns the path to the config file.
///
/// Creates the config directory if it doesn't exist.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = config_dir.join("ps2kbd");

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir.join("config.toml"))
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Driver bring-up settings
    #[serde(default)]
    pub driver: DriverConfig,
    /// Scancode translation settings
    #[serde(default)]
    pub translator: TranslatorConfig,
    /// Line editor settings
    #[serde(default)]
    pub line_editor: LineEditorConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Driver bring-up configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Name of the input pump thread, also the keypress channel owner
    pub thread_name: String,
    /// Send the scancode-set-2 / enable-scanning handshake on startup
    pub handshake: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            thread_name: "ps2kb_in".to_string(),
            handshake: true,
        }
    }
}

/// Scancode translation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Log bytes that fall outside the scancode tables
    pub log_unknown_scancodes: bool,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            log_unknown_scancodes: true,
        }
    }
}

impl TranslatorConfig {
    /// Build a translator with these settings
    pub fn translator(&self) -> ScancodeTranslator {
        ScancodeTranslator::new().with_unknown_logging(self.log_unknown_scancodes)
    }
}

/// Line editor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineEditorConfig {
    /// Echo typed characters to the console
    pub echo: bool,
}

impl Default for LineEditorConfig {
    fn default() -> Self {
        Self { echo: true }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter, overridden by `RUST_LOG`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
