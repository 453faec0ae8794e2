//! Project Configuration (cmtport.toml)

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Profile used when neither file, environment nor flags name one
pub const DEFAULT_PROFILE_NAME: &str = "atlasoff";

/// Header comment carried by every generated output file
pub const DEFAULT_SENTINEL: &str = "## automatically generated by cmt2yml";

/// Output files checked before a package is translated
pub const DEFAULT_OUTPUT_FILES: &[&str] = &["hscript.yml", "wscript"];

/// Configuration from cmtport.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translate: Option<TranslateConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<OutputsConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileConfig>,
}

/// `[translate]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct TranslateConfig {
    /// Profile name (default: "atlasoff")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Worker thread cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

/// `[outputs]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentinel: Option<String>,
}

/// `[profile]` section, merged over the selected profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    /// Extra or replacement remap entries; an empty list drops the package
    #[serde(default)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub remap: BTreeMap<String, Vec<String>>,

    /// Replaces the profile's imperative-dialect prefixes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imperative_prefixes: Option<Vec<String>>,
}

impl ProjectConfig {
    /// Load project configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path.to_path_buf())
    }

    /// Parse configuration text; `file` is only used for diagnostics
    pub fn parse(content: &str, file: PathBuf) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|error| ConfigError::TomlParseError { file, error })
    }

    /// Check values that the TOML schema alone cannot
    pub fn validate(&self, known_profiles: &[String]) -> ConfigResult<()> {
        let profile = self.profile();
        if !known_profiles.iter().any(|p| p == profile) {
            return Err(ConfigError::UnknownProfile {
                name: profile.to_string(),
                available: known_profiles.to_vec(),
            });
        }

        if self.jobs() == Some(0) {
            return Err(ConfigError::invalid("translate.jobs", "must be at least 1"));
        }

        if let Some(sentinel) = self.outputs.as_ref().and_then(|o| o.sentinel.as_deref()) {
            if sentinel.trim().is_empty() {
                return Err(ConfigError::invalid("outputs.sentinel", "must not be empty"));
            }
        }

        if let Some(files) = self.outputs.as_ref().and_then(|o| o.files.as_ref()) {
            if files.iter().any(|f| f.trim().is_empty()) {
                return Err(ConfigError::invalid("outputs.files", "file names must not be empty"));
            }
        }

        Ok(())
    }

    /// Selected profile name
    pub fn profile(&self) -> &str {
        self.translate
            .as_ref()
            .and_then(|t| t.profile.as_deref())
            .unwrap_or(DEFAULT_PROFILE_NAME)
    }

    /// Worker thread cap, if any
    pub fn jobs(&self) -> Option<usize> {
        self.translate.as_ref().and_then(|t| t.jobs)
    }

    /// Generated-file sentinel
    pub fn sentinel(&self) -> &str {
        self.outputs
            .as_ref()
            .and_then(|o| o.sentinel.as_deref())
            .unwrap_or(DEFAULT_SENTINEL)
    }

    /// Output file names checked for hand-written content
    pub fn output_files(&self) -> Vec<String> {
        match self.outputs.as_ref().and_then(|o| o.files.as_ref()) {
            Some(files) => files.clone(),
            None => DEFAULT_OUTPUT_FILES.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Remap entries merged over the profile's table
    pub fn remap(&self) -> BTreeMap<String, Vec<String>> {
        self.profile
            .as_ref()
            .map(|p| p.remap.clone())
            .unwrap_or_default()
    }

    /// Imperative prefixes replacing the profile's own
    pub fn imperative_prefixes(&self) -> Option<&[String]> {
        self.profile
            .as_ref()
            .and_then(|p| p.imperative_prefixes.as_deref())
    }

    /// Override the profile name
    pub fn set_profile(&mut self, name: impl Into<String>) {
        self.translate.get_or_insert_with(Default::default).profile = Some(name.into());
    }

    /// Override the worker thread cap
    pub fn set_jobs(&mut self, jobs: usize) {
        self.translate.get_or_insert_with(Default::default).jobs = Some(jobs);
    }
}
