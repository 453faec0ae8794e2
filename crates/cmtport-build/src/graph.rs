//! Build graph synthesized for one package
//!
//! The graph is the only output of analysis: package metadata, declared
//! dependencies, build targets, the ordered configuration entries that have
//! no target-level meaning, unresolved pattern applications and the chosen
//! output dialect.

use crate::targets::TargetSet;
use cmtport_syntax::{ApplyPattern, Statement, Visibility};
use serde::Serialize;

/// Package metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageMeta {
    /// Resolved package name
    pub name: String,
    /// Package directory, `/`-separated
    pub path: String,
    pub authors: Vec<String>,
    pub managers: Vec<String>,
    pub version: Option<String>,
}

/// A declared `use` dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    /// Package name joined with its path prefix
    pub name: String,
    pub version: Option<String>,
    pub visibility: Visibility,
    /// Needed at runtime only
    pub runtime: bool,
    pub switches: Vec<String>,
}

/// Output representation required by a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Plain target descriptions (`hscript.yml`)
    Declarative,
    /// Build script (`wscript`)
    Imperative,
}

impl Dialect {
    /// Name of the file rendered for this dialect
    pub fn output_file(&self) -> &'static str {
        match self {
            Self::Declarative => "hscript.yml",
            Self::Imperative => "wscript",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Declarative => write!(f, "declarative"),
            Self::Imperative => write!(f, "imperative"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageGraph {
    pub package: PackageMeta,
    pub deps: Vec<Dependency>,
    pub targets: TargetSet,
    /// Statements passed through to the renderer, in source order
    pub configuration: Vec<Statement>,
    /// `apply_pattern` statements the active profile has no converter for
    pub pending_patterns: Vec<ApplyPattern>,
    pub dialect: Dialect,
}

impl PackageGraph {
    pub fn new(package: PackageMeta) -> Self {
        Self {
            package,
            deps: Vec::new(),
            targets: TargetSet::new(),
            configuration: Vec::new(),
            pending_patterns: Vec::new(),
            dialect: Dialect::Declarative,
        }
    }

    /// Render the graph as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
