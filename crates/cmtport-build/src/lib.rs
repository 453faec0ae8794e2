//! Build-target analysis for CMT packages
//!
//! Turns parsed requirements into a per-package build graph:
//! - Target discovery and macro folding into compile/link flag lists
//! - Profile-driven expansion of `apply_pattern` statements
//! - Dependency and visibility tracking
//! - Output dialect selection

pub mod analyzer;
pub mod converters;
pub mod error;
pub mod folder;
pub mod graph;
pub mod profile;
pub mod sources;
pub mod targets;

// Re-export main types
pub use analyzer::{analyze, fixup, needs_imperative, translate_file, translate_str};
pub use converters::{Converter, PatternArgs, PatternContext};
pub use error::{ConvertError, ConvertResult};
pub use folder::{fold_target, link_token, MacroBuckets, MacroOp, TargetMacro};
pub use graph::{Dependency, Dialect, PackageGraph, PackageMeta};
pub use profile::{Profile, ProfileOverrides, ProfileRegistry, TargetKind, DEFAULT_PROFILE};
pub use sources::{sanitize_sources, SanitizedSources, DEFAULT_SOURCE_DIR};
pub use targets::{BuildTarget, Feature, TargetId, TargetSet};
