//! Offline software policy patterns

use super::{
    attach_uses, fixed_install, generic_install, library_like, Converter, PatternArgs,
    PatternContext,
};
use crate::error::ConvertResult;
use crate::sources::sanitize_sources;
use crate::targets::{Feature, TargetSet};
use cmtport_syntax::ApplyPattern;

pub const CONVERTERS: &[(&str, Converter)] = &[
    ("installed_library", installed_library),
    ("named_installed_library", installed_library),
    ("component_library", component_library),
    ("named_component_library", component_library),
    ("dual_use_library", dual_use_library),
    ("named_dual_use_library", dual_use_library),
    ("tpcnv_library", tpcnv_library),
    ("named_tpcnv_library", tpcnv_library),
    ("declare_joboptions", declare_joboptions),
    ("declare_python_modules", declare_python_modules),
    ("declare_scripts", declare_scripts),
    ("declare_xmls", declare_xmls),
    ("declare_data", declare_data),
    ("generic_declare_for_link", generic_declare_for_link),
    ("UnitTest_run", unit_test),
    ("athenarun_test", athenarun_test),
    ("lcgdict", dictionary),
    ("declare_job_transforms", job_transforms),
];

fn installed_library(
    t: &mut TargetSet,
    ctx: &PatternContext<'_>,
    stmt: &ApplyPattern,
) -> ConvertResult<()> {
    library_like(t, ctx, stmt, "library", Feature::AtlasLibrary, false)
}

fn component_library(
    t: &mut TargetSet,
    ctx: &PatternContext<'_>,
    stmt: &ApplyPattern,
) -> ConvertResult<()> {
    library_like(t, ctx, stmt, "library", Feature::AtlasComponent, false)
}

fn dual_use_library(
    t: &mut TargetSet,
    ctx: &PatternContext<'_>,
    stmt: &ApplyPattern,
) -> ConvertResult<()> {
    library_like(t, ctx, stmt, "library", Feature::AtlasDualUseLibrary, true)
}

fn tpcnv_library(
    t: &mut TargetSet,
    ctx: &PatternContext<'_>,
    stmt: &ApplyPattern,
) -> ConvertResult<()> {
    library_like(t, ctx, stmt, "name", Feature::AtlasTpcnv, false)
}

/// Arguments are ignored
fn declare_joboptions(
    t: &mut TargetSet,
    ctx: &PatternContext<'_>,
    _: &ApplyPattern,
) -> ConvertResult<()> {
    fixed_install(
        t,
        ctx,
        "install-jobos",
        Feature::AtlasInstallJoboptions,
        &["share/*.py", "share/*.txt"],
    )
}

fn declare_python_modules(
    t: &mut TargetSet,
    ctx: &PatternContext<'_>,
    _: &ApplyPattern,
) -> ConvertResult<()> {
    fixed_install(t, ctx, "install-py", Feature::AtlasInstallPythonModules, &["python/*.py"])
}

fn declare_scripts(
    t: &mut TargetSet,
    ctx: &PatternContext<'_>,
    _: &ApplyPattern,
) -> ConvertResult<()> {
    fixed_install(t, ctx, "install-scripts", Feature::AtlasInstallScripts, &["scripts/*"])
}

fn declare_xmls(
    t: &mut TargetSet,
    ctx: &PatternContext<'_>,
    _: &ApplyPattern,
) -> ConvertResult<()> {
    fixed_install(t, ctx, "install-xmls", Feature::AtlasInstallXmls, &["xml/*"])
}

fn declare_data(
    t: &mut TargetSet,
    ctx: &PatternContext<'_>,
    _: &ApplyPattern,
) -> ConvertResult<()> {
    fixed_install(t, ctx, "install-data", Feature::AtlasInstallData, &["data/*"])
}

fn generic_declare_for_link(
    t: &mut TargetSet,
    ctx: &PatternContext<'_>,
    stmt: &ApplyPattern,
) -> ConvertResult<()> {
    generic_install(t, ctx, stmt, Feature::AtlasGenericInstall)
}

/// `UnitTest_run unit_test=<name> [extrapatterns=<re>]`
fn unit_test(
    targets: &mut TargetSet,
    ctx: &PatternContext<'_>,
    stmt: &ApplyPattern,
) -> ConvertResult<()> {
    let args = PatternArgs::parse(ctx, stmt)?;
    let test = args.value("unit_test");
    let name = ctx.package_target(&format!("test-{test}"));

    let target = targets.find_or_create(&name, Feature::AtlasUnittest);
    target.sources = vec![format!("test/{test}_test.cxx")];
    if let Some(extra) = args.get("extrapatterns") {
        target.set_kwarg("extrapatterns", extra);
    }
    attach_uses(target, ctx.uses);
    Ok(())
}

/// `athenarun_test name=<n> options=<jo> [post_script=<s>]`
fn athenarun_test(
    targets: &mut TargetSet,
    ctx: &PatternContext<'_>,
    stmt: &ApplyPattern,
) -> ConvertResult<()> {
    let args = PatternArgs::parse(ctx, stmt)?;
    let name = ctx.package_target(&format!("runtest-{}", args.value("name")));

    let target = targets.find_or_create(&name, Feature::AtlasAthenarunTest);
    if let Some(options) = args.get("options") {
        target.set_kwarg("joboptions", options);
    }
    if let Some(post) = args.get("post_script") {
        target.set_kwarg("post_script", post);
    }
    target.uses = vec![ctx.package.to_string()];
    Ok(())
}

/// `lcgdict dict=<d> selectionfile=<xml> headerfiles=<h...>`
fn dictionary(
    targets: &mut TargetSet,
    ctx: &PatternContext<'_>,
    stmt: &ApplyPattern,
) -> ConvertResult<()> {
    let args = PatternArgs::parse(ctx, stmt)?;
    let name = format!("{}Dict", args.value("dict"));
    let headers: Vec<String> = args
        .value("headerfiles")
        .split_whitespace()
        .map(str::to_string)
        .collect();
    let headers = sanitize_sources(&headers, None);

    let target = targets.find_or_create(&name, Feature::AtlasDictionary);
    target.sources = headers.sources;
    target.set_kwarg(
        "selection_file",
        format!("{}/{}", ctx.package, args.value("selectionfile")),
    );
    attach_uses(target, ctx.uses);
    Ok(())
}

/// `declare_job_transforms jo=<glob> tfs=<glob>`
fn job_transforms(
    targets: &mut TargetSet,
    ctx: &PatternContext<'_>,
    stmt: &ApplyPattern,
) -> ConvertResult<()> {
    let args = PatternArgs::parse(ctx, stmt)?;

    let target =
        targets.find_or_create(&ctx.package_target("install-trfs"), Feature::AtlasInstallTrfs);
    target.sources.clear();
    if let Some(jo) = args.get("jo") {
        target.set_kwarg("trf_jo", jo);
    }
    if let Some(tfs) = args.get("tfs") {
        target.set_kwarg("trf_tfs", tfs);
    }
    Ok(())
}
