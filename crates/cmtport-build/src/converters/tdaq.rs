//! Online software policy patterns
//!
//! Only the install patterns with a direct target equivalent are converted;
//! every other policy pattern is left for the renderer.

use super::{fixed_install, Converter, PatternContext};
use crate::error::ConvertResult;
use crate::targets::{Feature, TargetSet};
use cmtport_syntax::ApplyPattern;

pub const CONVERTERS: &[(&str, Converter)] = &[
    ("install_data", install_data),
    ("install_headers", install_headers),
    ("install_scripts", install_scripts),
];

fn install_data(
    t: &mut TargetSet,
    ctx: &PatternContext<'_>,
    _: &ApplyPattern,
) -> ConvertResult<()> {
    fixed_install(t, ctx, "install-data", Feature::TdaqInstallData, &["data/*"])
}

fn install_headers(
    t: &mut TargetSet,
    ctx: &PatternContext<'_>,
    _: &ApplyPattern,
) -> ConvertResult<()> {
    fixed_install(t, ctx, "install-headers", Feature::TdaqInstallHeaders, &[])
}

fn install_scripts(
    t: &mut TargetSet,
    ctx: &PatternContext<'_>,
    _: &ApplyPattern,
) -> ConvertResult<()> {
    fixed_install(t, ctx, "install-scripts", Feature::TdaqInstallScripts, &["scripts/*"])
}
