//! Configuration Loader
//!
//! Finds `cmtport.toml` and layers environment overrides on top of it.

use crate::project::ProjectConfig;
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// Project configuration file name
pub const CONFIG_FILE: &str = "cmtport.toml";

/// Overrides `[translate] profile`
pub const ENV_PROFILE: &str = "CMTPORT_PROFILE";

/// Overrides `[translate] jobs`
pub const ENV_JOBS: &str = "CMTPORT_JOBS";

/// Configuration loader
///
/// Precedence, lowest first:
/// 1. Built-in defaults
/// 2. Project config (`cmtport.toml`)
/// 3. Environment variables (`CMTPORT_*`)
/// 4. CLI flags (handled by caller)
#[derive(Debug, Default)]
pub struct ConfigLoader;

/// Loaded configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub project: ProjectConfig,

    /// Path of the `cmtport.toml` that was read, if any
    pub source: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find cmtport.toml; built-in defaults
    /// are used when none exists.
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<Config> {
        let (source, project) = self.find_project_config(start_dir)?;
        let project = self.apply_env_overrides(project)?;
        Ok(Config { project, source })
    }

    /// Load configuration from a specific file
    pub fn load_from_file(&self, config_path: &Path) -> ConfigResult<Config> {
        let project = ProjectConfig::load_from_file(config_path)?;
        let project = self.apply_env_overrides(project)?;
        Ok(Config {
            project,
            source: Some(config_path.to_path_buf()),
        })
    }

    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE);

            if config_path.is_file() {
                log::debug!("using configuration {}", config_path.display());
                let project = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(config_path), project));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, ProjectConfig::default())),
            }
        }
    }

    /// Apply `CMTPORT_*` variables to the project config
    fn apply_env_overrides(&self, mut config: ProjectConfig) -> ConfigResult<ProjectConfig> {
        if let Ok(profile) = env::var(ENV_PROFILE) {
            if !profile.is_empty() {
                config.set_profile(profile);
            }
        }

        if let Ok(jobs) = env::var(ENV_JOBS) {
            let jobs = jobs.trim().parse::<usize>().map_err(|e| {
                ConfigError::invalid(ENV_JOBS, format!("'{jobs}' is not a thread count ({e})"))
            })?;
            config.set_jobs(jobs);
        }

        Ok(config)
    }
}
