//! Target analysis
//!
//! Turns a parsed requirements file into a [`PackageGraph`] in a fixed
//! sequence of passes:
//! 1. discover target names declared by `library`/`application`
//! 2. file target-scoped macros under their target
//! 3. materialize declared targets and fold their macros
//! 4. dispatch every other statement in source order; a pattern sees only
//!    the `use` statements above it
//! 5. rewrite known irregular library names in uses lists
//! 6. pick the output dialect
//!
//! Any error aborts the file; no partial graph is returned.

use crate::converters::{base_name, remapped_uses, PatternContext};
use crate::error::ConvertResult;
use crate::folder::{fold_target, MacroBuckets};
use crate::graph::{Dependency, Dialect, PackageGraph, PackageMeta};
use crate::profile::{Profile, TargetKind};
use crate::sources::{sanitize_sources, DEFAULT_SOURCE_DIR};
use crate::targets::{BuildTarget, SWITCHES_KWARG};
use cmtport_syntax::{parse_file, parse_str, ReqFile, Statement, TargetDecl};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Rewrites applied to every uses entry
const FIXUPS: &[(&str, &str)] = &[("-${boost_libsuffix}", ""), ("boost_", "boost-")];

/// Parse and analyze the requirements file at `path`
pub fn translate_file(path: &Path, profile: &Profile) -> ConvertResult<PackageGraph> {
    let req = parse_file(path)?;
    analyze(&req, profile).map_err(|e| e.in_file(path))
}

/// Parse and analyze requirements text attributed to `path`
pub fn translate_str(
    path: impl Into<PathBuf>,
    source: &str,
    profile: &Profile,
) -> ConvertResult<PackageGraph> {
    let path = path.into();
    let req = parse_str(path.clone(), source)?;
    analyze(&req, profile).map_err(|e| e.in_file(&path))
}

/// Build the package graph of a parsed requirements file
pub fn analyze(req: &ReqFile, profile: &Profile) -> ConvertResult<PackageGraph> {
    let mut analyzer = Analyzer::new(req, profile);
    analyzer.materialize_targets();
    analyzer.dispatch()?;
    analyzer.apply_fixups();
    analyzer.decide_dialect();
    log::debug!(
        "{}: {} targets, {} configuration entries, {} dialect",
        req.path.display(),
        analyzer.graph.targets.len(),
        analyzer.graph.configuration.len(),
        analyzer.graph.dialect
    );
    Ok(analyzer.graph)
}

struct Analyzer<'a> {
    req: &'a ReqFile,
    profile: &'a Profile,
    graph: PackageGraph,
    /// Indices of statements folded into a target
    folded: HashSet<usize>,
}

impl<'a> Analyzer<'a> {
    fn new(req: &'a ReqFile, profile: &'a Profile) -> Self {
        let package = PackageMeta {
            name: req.package.clone(),
            path: req.package_path(),
            ..PackageMeta::default()
        };
        Self {
            req,
            profile,
            graph: PackageGraph::new(package),
            folded: HashSet::new(),
        }
    }

    /// Passes 1 to 3
    fn materialize_targets(&mut self) {
        let req = self.req;
        let mut names: Vec<&str> = Vec::new();
        for (_, decl) in declarations(req) {
            if !names.contains(&decl.name.as_str()) {
                names.push(&decl.name);
            }
        }
        let buckets = MacroBuckets::collect(&req.statements, &names);

        for (kind, decl) in declarations(req) {
            let sanitized = sanitize_sources(&decl.sources, Some(DEFAULT_SOURCE_DIR));

            if let Some(id) = self.graph.targets.find(&decl.name) {
                log::debug!("{} declared again, extending its sources", decl.name);
                let target = &mut self.graph.targets[id];
                target.sources.extend(sanitized.sources);
                if !sanitized.switches.is_empty() {
                    target
                        .kwargs
                        .entry(SWITCHES_KWARG.to_string())
                        .or_default()
                        .extend(sanitized.switches);
                }
                continue;
            }

            let mut target = BuildTarget::new(&decl.name, self.profile.default_feature(kind))
                .with_sources(sanitized.sources);
            if !sanitized.switches.is_empty() {
                target.kwargs.insert(SWITCHES_KWARG.to_string(), sanitized.switches);
            }
            self.folded
                .extend(fold_target(&mut target, buckets.for_target(&decl.name)));
            self.graph.targets.insert(target);
        }
    }

    /// Pass 4
    fn dispatch(&mut self) -> ConvertResult<()> {
        let req = self.req;
        let package = base_name(&req.package);
        // Remapped uses of the `use` statements seen so far
        let mut uses: Vec<String> = Vec::new();

        for (index, stmt) in req.statements.iter().enumerate() {
            match stmt {
                Statement::Package(_) | Statement::Library(_) | Statement::Application(_) => {}
                s if s.is_section_marker() => {}
                Statement::Author(name) => self.graph.package.authors.push(name.clone()),
                Statement::Manager(name) => self.graph.package.managers.push(name.clone()),
                Statement::Version(version) => self.graph.package.version = Some(version.clone()),
                Statement::Use(u) => {
                    let name = u.qualified_name();
                    uses.extend(remapped_uses(self.profile, [name.as_str()]));
                    self.graph.deps.push(Dependency {
                        name,
                        version: u.version.clone(),
                        visibility: u.visibility,
                        runtime: u.is_runtime(),
                        switches: u.switches.clone(),
                    });
                }
                Statement::ApplyPattern(pattern) => match self.profile.converter(&pattern.name) {
                    Some(convert) => {
                        log::debug!("converting pattern {}", pattern.name);
                        let ctx = PatternContext {
                            package,
                            uses: &uses,
                            profile: self.profile,
                        };
                        convert(&mut self.graph.targets, &ctx, pattern)?;
                    }
                    None => {
                        log::info!(
                            "{}: no converter for pattern '{}', keeping it as is",
                            req.package,
                            pattern.name
                        );
                        self.graph.pending_patterns.push(pattern.clone());
                    }
                },
                _ if self.folded.contains(&index) => {}
                other => self.graph.configuration.push(other.clone()),
            }
        }
        Ok(())
    }

    /// Pass 5
    fn apply_fixups(&mut self) {
        for target in self.graph.targets.iter_mut() {
            for entry in &mut target.uses {
                *entry = fixup(entry);
            }
        }
    }

    /// Pass 6
    fn decide_dialect(&mut self) {
        let package = &self.graph.package;
        let forced = self.profile.forces_imperative(&package.path, &package.name);
        if forced || needs_imperative(&self.req.statements) {
            self.graph.dialect = Dialect::Imperative;
        }
    }
}

fn declarations(req: &ReqFile) -> impl Iterator<Item = (TargetKind, &TargetDecl)> {
    req.statements.iter().filter_map(|stmt| match stmt {
        Statement::Library(decl) => Some((TargetKind::Library, decl)),
        Statement::Application(decl) => Some((TargetKind::Application, decl)),
        _ => None,
    })
}

/// Apply the fixup table to one uses entry
pub fn fixup(entry: &str) -> String {
    FIXUPS
        .iter()
        .fold(entry.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Whether a statement list cannot be expressed declaratively
pub fn needs_imperative(statements: &[Statement]) -> bool {
    statements.iter().any(|stmt| match stmt {
        Statement::PathRemove(_)
        | Statement::MakeFragment(_)
        | Statement::Pattern(_)
        | Statement::MacroRemove(_) => true,
        Statement::Macro(value) => value.is_tag_conditioned(),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmtport_syntax::ConditionalValue;

    #[test]
    fn test_fixup_table() {
        assert_eq!(fixup("boost_thread-${boost_libsuffix}"), "boost-thread");
        assert_eq!(fixup("boost_filesystem"), "boost-filesystem");
        assert_eq!(fixup("ROOT"), "ROOT");
    }

    #[test]
    fn test_needs_imperative() {
        let plain = vec![Statement::Macro(ConditionalValue::new("x", "1"))];
        assert!(!needs_imperative(&plain));

        let tagged = vec![Statement::Macro(
            ConditionalValue::new("x", "1").with_branch("opt", "2"),
        )];
        assert!(needs_imperative(&tagged));

        let removal = vec![Statement::MacroRemove(ConditionalValue::new("x", "1"))];
        assert!(needs_imperative(&removal));
    }
}
