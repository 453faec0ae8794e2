//! DetCommon policy patterns, registered with the offline profile

use super::{attach_uses, fixed_install, generic_install, Converter, PatternArgs, PatternContext};
use crate::error::ConvertResult;
use crate::targets::{Feature, TargetSet};
use cmtport_syntax::ApplyPattern;

pub const CONVERTERS: &[(&str, Converter)] = &[
    ("detcommon_shared_library", shared_library),
    ("detcommon_shared_generic_library", shared_library),
    ("detcommon_shared_named_library", shared_library),
    ("detcommon_header_installer", header_installer),
    ("trigconf_application", trigconf_application),
    ("trigconf_generic_application", trigconf_application),
    ("detcommon_generic_install", generic),
    ("detcommon_link_files", generic),
    ("detcommon_copy_files", generic),
    ("detcommon_install_docs", generic),
];

/// `library=` (default: package) with `files=` (default: `src/*.cxx`)
fn shared_library(
    targets: &mut TargetSet,
    ctx: &PatternContext<'_>,
    stmt: &ApplyPattern,
) -> ConvertResult<()> {
    let args = PatternArgs::parse(ctx, stmt)?;
    let name = ctx.require_name(args.get("library").unwrap_or(ctx.package).to_string(), stmt)?;
    let sources = args.get("files").unwrap_or("src/*.cxx").to_string();

    let target = targets.find_or_create(&name, Feature::AtlasLibrary);
    attach_uses(target, ctx.uses);
    target.sources = vec![sources];
    Ok(())
}

fn header_installer(
    targets: &mut TargetSet,
    ctx: &PatternContext<'_>,
    _: &ApplyPattern,
) -> ConvertResult<()> {
    fixed_install(targets, ctx, "install-headers", Feature::DetcommonInstallHeaders, &[])
}

/// `TrigConf<name>` built from `src/test/<name>.cxx`
fn trigconf_application(
    targets: &mut TargetSet,
    ctx: &PatternContext<'_>,
    stmt: &ApplyPattern,
) -> ConvertResult<()> {
    let args = PatternArgs::parse(ctx, stmt)?;
    let app = ctx.require_name(args.value("name").to_string(), stmt)?;

    let target = targets.find_or_create(&format!("TrigConf{app}"), Feature::TrigconfApplication);
    target.sources = vec![format!("src/test/{app}.cxx")];
    let mut uses = vec![ctx.package.to_string(), "boost-thread".to_string()];
    uses.extend(ctx.uses.iter().cloned());
    target.uses = uses;
    Ok(())
}

fn generic(
    targets: &mut TargetSet,
    ctx: &PatternContext<'_>,
    stmt: &ApplyPattern,
) -> ConvertResult<()> {
    generic_install(targets, ctx, stmt, Feature::DetcommonGenericInstall)
}
