//! Profiles command - list built-in profiles

use anyhow::Result;
use cmtport_build::{ProfileRegistry, TargetKind};
use colored::*;

pub fn run(json: bool) -> Result<()> {
    let registry = ProfileRegistry::new();

    if json {
        let profiles: Vec<_> = registry
            .iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.name(),
                    "library": p.default_feature(TargetKind::Library).name(),
                    "application": p.default_feature(TargetKind::Application).name(),
                    "imperative_prefixes": p.imperative_prefixes(),
                    "patterns": p.pattern_names(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&profiles)?);
        return Ok(());
    }

    for profile in registry.iter() {
        println!(
            "{} (library: {}, application: {})",
            profile.name().bold(),
            profile.default_feature(TargetKind::Library),
            profile.default_feature(TargetKind::Application)
        );
        for pattern in profile.pattern_names() {
            println!("    {pattern}");
        }
    }

    Ok(())
}
