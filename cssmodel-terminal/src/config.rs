//! Terminal front-end configuration
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the config file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "cssmodel.toml";

/// Settings read from `cssmodel.toml`; every field is optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Target redraw rate in frames per second
    pub frame_rate: u32,
    /// CSS pixels covered by one character cell horizontally
    pub px_per_column: f32,
    /// CSS pixels covered by one character cell vertically
    pub px_per_row: f32,
    /// Directory exported documents are written to
    pub export_dir: PathBuf,
    /// Log output; the terminal itself is taken by the editor
    pub log_file: PathBuf,
    /// `env_logger` filter, overridden by `RUST_LOG`
    pub log_filter: String,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30,
            px_per_column: 8.0,
            px_per_row: 16.0,
            export_dir: PathBuf::from("."),
            log_file: PathBuf::from("cssmodel.log"),
            log_filter: "info".to_string(),
        }
    }
}

impl TerminalConfig {
    /// Load from a TOML file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the settings out as TOML
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_rate == 0 {
            return Err(ConfigError::Invalid("frame_rate must be at least 1".to_string()));
        }
        let cell = [self.px_per_column, self.px_per_row];
        if cell.iter().any(|px| !px.is_finite() || *px <= 0.0) {
            return Err(ConfigError::Invalid("cell size must be positive".to_string()));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Out-of-range value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
