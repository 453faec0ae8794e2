//! Translation profiles
//!
//! A profile bundles what differs between source trees: the converter for
//! each known pattern name, the package → library remap table, the default
//! feature of `library`/`application` targets and the package prefixes that
//! always need the imperative dialect. One profile is selected per run and
//! passed by reference into every analysis.

use crate::converters::{self, Converter};
use crate::error::{ConvertError, ConvertResult};
use crate::targets::Feature;
use std::collections::{BTreeMap, HashMap};

/// Profile used when none is configured
pub const DEFAULT_PROFILE: &str = "atlasoff";

/// Package → library names; an empty list drops the dependency
const REMAP: &[(&str, &[&str])] = &[
    ("AtlasAIDA", &["AIDA"]),
    ("AtlasBoost", &["AtlasBoost"]),
    ("AtlasCLHEP", &["CLHEP"]),
    ("AtlasCOOL", &["COOL"]),
    ("AtlasCORAL", &["CORAL"]),
    ("AtlasCppUnit", &["CppUnit"]),
    ("AtlasCxxPolicy", &[]),
    ("AtlasFortranPolicy", &[]),
    ("AtlasGdb", &["bfd"]),
    ("AtlasPOOL", &["POOL"]),
    ("AtlasPolicy", &[]),
    ("AtlasPython", &["AtlasPython"]),
    ("AtlasPyROOT", &["PyROOT"]),
    ("AtlasROOT", &["ROOT"]),
    ("AtlasReflex", &["Reflex"]),
    ("AtlasTBB", &["tbb"]),
    ("AtlasValgrind", &["valgrind"]),
    ("DetCommonPolicy", &[]),
    ("ExternalPolicy", &[]),
    ("GaudiInterface", &["GaudiKernel"]),
];

/// Statement kind a default feature is looked up for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Library,
    Application,
}

/// Per-run adjustments merged over a built-in profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileOverrides {
    /// Extra or replacement remap entries
    pub remap: BTreeMap<String, Vec<String>>,
    /// Replaces the profile's imperative prefixes when set
    pub imperative_prefixes: Option<Vec<String>>,
}

/// Translation profile
#[derive(Clone)]
pub struct Profile {
    name: String,
    library_feature: Feature,
    application_feature: Feature,
    converters: BTreeMap<&'static str, Converter>,
    remap: HashMap<String, Vec<String>>,
    imperative_prefixes: Vec<String>,
}

impl Profile {
    fn builtin(
        name: &str,
        library_feature: Feature,
        application_feature: Feature,
        tables: &[&[(&'static str, Converter)]],
        imperative_prefix: &str,
    ) -> Self {
        let converters = tables.iter().flat_map(|t| t.iter().copied()).collect();
        let remap = REMAP
            .iter()
            .map(|(pkg, libs)| (pkg.to_string(), libs.iter().map(|l| l.to_string()).collect()))
            .collect();
        Self {
            name: name.to_string(),
            library_feature,
            application_feature,
            converters,
            remap,
            imperative_prefixes: vec![imperative_prefix.to_string()],
        }
    }

    /// Offline software profile, DetCommon patterns included
    pub fn atlasoff() -> Self {
        Self::builtin(
            "atlasoff",
            Feature::AtlasLibrary,
            Feature::AtlasApplication,
            &[converters::atlasoff::CONVERTERS, converters::detcommon::CONVERTERS],
            "External/",
        )
    }

    /// Online software profile
    pub fn tdaq() -> Self {
        Self::builtin(
            "tdaq",
            Feature::TdaqLibrary,
            Feature::TdaqApplication,
            &[converters::tdaq::CONVERTERS],
            "TDAQCExternal",
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Feature of targets declared by a `library` or `application` statement
    pub fn default_feature(&self, kind: TargetKind) -> Feature {
        match kind {
            TargetKind::Library => self.library_feature,
            TargetKind::Application => self.application_feature,
        }
    }

    /// Converter registered for a pattern name
    pub fn converter(&self, pattern: &str) -> Option<Converter> {
        self.converters.get(pattern).copied()
    }

    /// Pattern names with a converter, sorted
    pub fn pattern_names(&self) -> Vec<&'static str> {
        self.converters.keys().copied().collect()
    }

    /// Library names a package maps to; unlisted packages map to themselves
    pub fn remap(&self, package: &str) -> Vec<String> {
        self.remap
            .get(package)
            .cloned()
            .unwrap_or_else(|| vec![package.to_string()])
    }

    pub fn imperative_prefixes(&self) -> &[String] {
        &self.imperative_prefixes
    }

    /// Whether a package always needs the imperative dialect
    ///
    /// A prefix matches the package name, or the package path at any
    /// component boundary.
    pub fn forces_imperative(&self, package_path: &str, package_name: &str) -> bool {
        self.imperative_prefixes.iter().any(|p| {
            package_name.starts_with(p.as_str())
                || package_path.starts_with(p.as_str())
                || package_path.contains(&format!("/{p}"))
        })
    }

    /// Merge per-run overrides
    pub fn apply_overrides(&mut self, overrides: &ProfileOverrides) {
        for (pkg, libs) in &overrides.remap {
            self.remap.insert(pkg.clone(), libs.clone());
        }
        if let Some(prefixes) = &overrides.imperative_prefixes {
            self.imperative_prefixes = prefixes.clone();
        }
    }
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("name", &self.name)
            .field("library_feature", &self.library_feature)
            .field("application_feature", &self.application_feature)
            .field("patterns", &self.pattern_names())
            .field("remap", &self.remap.len())
            .field("imperative_prefixes", &self.imperative_prefixes)
            .finish()
    }
}

/// Registry of built-in profiles
pub struct ProfileRegistry {
    profiles: BTreeMap<String, Profile>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        let mut profiles = BTreeMap::new();
        for profile in [Profile::atlasoff(), Profile::tdaq()] {
            profiles.insert(profile.name.clone(), profile);
        }
        Self { profiles }
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    pub fn has_profile(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// Names of all registered profiles, sorted
    pub fn names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    /// Select the profile for a run, with overrides merged in
    pub fn select(&self, name: &str, overrides: &ProfileOverrides) -> ConvertResult<Profile> {
        let mut profile = self
            .get(name)
            .cloned()
            .ok_or_else(|| ConvertError::UnknownProfile {
                name: name.to_string(),
                available: self.names(),
            })?;
        profile.apply_overrides(overrides);
        log::debug!("selected profile {}", profile.name);
        Ok(profile)
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}
