//! cmtport Configuration
//!
//! Loads the translator configuration (`cmtport.toml`) and applies
//! environment overrides.
//!
//! # Configuration Hierarchy
//!
//! Later sources override earlier ones:
//! 1. Built-in defaults
//! 2. Project config (`cmtport.toml`, found by walking up from the scan root)
//! 3. Environment variables (`CMTPORT_PROFILE`, `CMTPORT_JOBS`)
//! 4. CLI flags (applied by the caller)
//!
//! # Example
//!
//! ```no_run
//! use cmtport_config::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::new().load_from_directory(Path::new(".")).unwrap();
//! println!("profile: {}", config.project.profile());
//! ```

pub mod loader;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Unknown profile '{name}' (available: {})", available.join(", "))]
    UnknownProfile { name: String, available: Vec<String> },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use loader::{Config, ConfigLoader, CONFIG_FILE, ENV_JOBS, ENV_PROFILE};
pub use project::{
    OutputsConfig, ProfileConfig, ProjectConfig, TranslateConfig, DEFAULT_OUTPUT_FILES,
    DEFAULT_PROFILE_NAME, DEFAULT_SENTINEL,
};
