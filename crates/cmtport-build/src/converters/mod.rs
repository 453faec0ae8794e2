//! Pattern converters
//!
//! A converter expands one `apply_pattern` statement into build targets.
//! Converters are plain functions registered by pattern name in a
//! [`Profile`](crate::profile::Profile); several names may share one.

pub mod args;
pub mod atlasoff;
pub mod detcommon;
pub mod tdaq;

pub use args::{split_arg, PatternArgs};

use crate::error::{ConvertError, ConvertResult};
use crate::profile::Profile;
use crate::targets::{BuildTarget, Feature, TargetSet};
use cmtport_syntax::ApplyPattern;

/// Expands one pattern application into the target set
pub type Converter = fn(&mut TargetSet, &PatternContext<'_>, &ApplyPattern) -> ConvertResult<()>;

/// Package-level facts a converter may read
#[derive(Debug, Clone, Copy)]
pub struct PatternContext<'a> {
    /// Package base name
    pub package: &'a str,
    /// Remapped library names of the `use` statements seen so far
    pub uses: &'a [String],
    pub profile: &'a Profile,
}

impl<'a> PatternContext<'a> {
    /// Fail when a derived target name is empty
    pub fn require_name(&self, name: String, stmt: &ApplyPattern) -> ConvertResult<String> {
        if name.is_empty() {
            return Err(ConvertError::empty_target(&stmt.name, self.package, &stmt.args));
        }
        Ok(name)
    }

    /// `<package>-<suffix>`
    pub fn package_target(&self, suffix: &str) -> String {
        format!("{}-{}", self.package, suffix)
    }
}

/// Remapped uses of the given packages; dropped packages contribute nothing
pub fn remapped_uses<'u>(
    profile: &Profile,
    deps: impl IntoIterator<Item = &'u str>,
) -> Vec<String> {
    deps.into_iter()
        .flat_map(|dep| profile.remap(base_name(dep)))
        .collect()
}

/// Last `/`-separated component of a package name
pub fn base_name(name: &str) -> &str {
    name.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(name)
}

/// Set the target's uses list unless it would be empty
pub(crate) fn attach_uses(target: &mut BuildTarget, uses: &[String]) {
    if !uses.is_empty() {
        target.uses = uses.to_vec();
    }
}

/// Library-like pattern: target name from `key=` or the package name
pub(crate) fn library_like(
    targets: &mut TargetSet,
    ctx: &PatternContext<'_>,
    stmt: &ApplyPattern,
    key: &str,
    feature: Feature,
    fallback_to_package: bool,
) -> ConvertResult<()> {
    let name = if stmt.args.is_empty() {
        ctx.package.to_string()
    } else {
        let args = PatternArgs::parse(ctx, stmt)?;
        match args.get(key) {
            Some(name) => name.to_string(),
            None if fallback_to_package => ctx.package.to_string(),
            None => String::new(),
        }
    };
    let name = ctx.require_name(name, stmt)?;

    let target = targets.find_or_create(&name, feature);
    attach_uses(target, ctx.uses);
    Ok(())
}

/// Install pattern with a fixed glob set: `<package>-<suffix>`
pub(crate) fn fixed_install(
    targets: &mut TargetSet,
    ctx: &PatternContext<'_>,
    suffix: &str,
    feature: Feature,
    globs: &[&str],
) -> ConvertResult<()> {
    let target = targets.find_or_create(&ctx.package_target(suffix), feature);
    if !globs.is_empty() {
        target.sources = globs.iter().map(|g| g.to_string()).collect();
    }
    Ok(())
}

/// `<package>-generic-install-<name>-<kind>` from `files=`, `prefix=`
pub(crate) fn generic_install(
    targets: &mut TargetSet,
    ctx: &PatternContext<'_>,
    stmt: &ApplyPattern,
    feature: Feature,
) -> ConvertResult<()> {
    let args = PatternArgs::parse(ctx, stmt)?;
    let name = format!(
        "{}-generic-install-{}-{}",
        ctx.package,
        args.value("name"),
        args.value("kind")
    );

    let files = args.value("files");
    if files.is_empty() {
        log::warn!(
            "{}: {} without files=, {name} gets an empty source entry",
            ctx.package,
            stmt.name
        );
    }

    let target = targets.find_or_create(&name, feature);
    target.sources = vec![files.to_string()];
    if let Some(prefix) = args.get("prefix") {
        target.set_kwarg("install_prefix", prefix);
    }
    Ok(())
}
