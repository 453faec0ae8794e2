//! Convert command - translate a tree of requirements files

use crate::detector::OutputDetector;
use crate::discovery::discover;
use crate::driver::{Driver, FileOutcome, Outcome};
use anyhow::{Context, Result};
use cmtport_build::{PackageGraph, ProfileOverrides, ProfileRegistry};
use cmtport_config::{ConfigLoader, ProjectConfig};
use colored::*;
use std::error::Error as _;
use std::path::PathBuf;

/// Arguments for the convert command
pub struct ConvertArgs {
    /// Directory to scan
    pub dir: PathBuf,
    /// Profile name, overrides configuration
    pub profile: Option<String>,
    /// Print graphs as JSON
    pub json: bool,
    /// Worker thread cap, overrides configuration
    pub jobs: Option<usize>,
    pub no_color: bool,
    /// Only report failures
    pub quiet: bool,
}

impl Default for ConvertArgs {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            profile: None,
            json: false,
            jobs: None,
            no_color: false,
            quiet: false,
        }
    }
}

/// Build the effective configuration: file, then environment, then flags
fn effective_config(args: &ConvertArgs, registry: &ProfileRegistry) -> Result<ProjectConfig> {
    let config = ConfigLoader::new()
        .load_from_directory(&args.dir)
        .context("Failed to load cmtport.toml")?;

    let mut project = config.project;
    if let Some(profile) = &args.profile {
        project.set_profile(profile.clone());
    }
    if let Some(jobs) = args.jobs {
        project.set_jobs(jobs);
    }

    project
        .validate(&registry.names())
        .context("Invalid configuration")?;
    Ok(project)
}

fn overrides(project: &ProjectConfig) -> ProfileOverrides {
    ProfileOverrides {
        remap: project.remap(),
        imperative_prefixes: project.imperative_prefixes().map(<[String]>::to_vec),
    }
}

/// Run the convert command
///
/// Returns `false` when any file failed to translate.
pub fn run(args: ConvertArgs) -> Result<bool> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let result = convert(&args);

    if args.no_color {
        colored::control::unset_override();
    }

    result
}

fn convert(args: &ConvertArgs) -> Result<bool> {
    let registry = ProfileRegistry::new();
    let project = effective_config(args, &registry)?;
    let profile = registry.select(project.profile(), &overrides(&project))?;
    let detector = OutputDetector::new(project.output_files(), project.sentinel());

    let files = discover(&args.dir);
    if files.is_empty() {
        if args.json {
            println!("[]");
        } else if !args.quiet {
            println!(
                "{} below {}",
                "No requirements files found".yellow(),
                args.dir.display()
            );
        }
        return Ok(true);
    }

    if !args.json && !args.quiet {
        println!(
            "Converting {} file{} with profile {}",
            files.len().to_string().bold(),
            if files.len() == 1 { "" } else { "s" },
            profile.name().bold()
        );
    }

    let outcomes = Driver::new(&profile, &detector)
        .with_jobs(project.jobs())
        .run(&files)?;

    if args.json {
        print_json(&outcomes)?;
    } else {
        report(&outcomes, args.quiet);
    }

    Ok(!outcomes.iter().any(FileOutcome::is_failure))
}

/// Print converted graphs to stdout and failures to stderr
fn print_json(outcomes: &[FileOutcome]) -> Result<()> {
    let graphs: Vec<&PackageGraph> = outcomes
        .iter()
        .filter_map(|o| match &o.outcome {
            Outcome::Converted(graph) => Some(graph.as_ref()),
            _ => None,
        })
        .collect();

    for failure in outcomes.iter().filter(|o| o.is_failure()) {
        if let Outcome::Failed(err) = &failure.outcome {
            eprintln!("{}", describe(err));
        }
    }

    println!("{}", serde_json::to_string_pretty(&graphs)?);
    Ok(())
}

fn report(outcomes: &[FileOutcome], quiet: bool) {
    for run in outcomes {
        match &run.outcome {
            Outcome::Converted(graph) if !quiet => println!(
                "{} {} ({} target{}, {})",
                "OK".green().bold(),
                run.path.display(),
                graph.targets.len(),
                if graph.targets.len() == 1 { "" } else { "s" },
                graph.dialect.output_file()
            ),
            Outcome::Skipped { existing } if !quiet => println!(
                "{} {} (hand-written {})",
                "SKIP".yellow().bold(),
                run.path.display(),
                existing.display()
            ),
            Outcome::Failed(err) => {
                println!("{} {}", "FAIL".red().bold(), run.path.display());
                println!("    {}", describe(err).dimmed());
            }
            _ => {}
        }
    }

    let converted = outcomes
        .iter()
        .filter(|o| matches!(o.outcome, Outcome::Converted(_)))
        .count();
    let skipped = outcomes
        .iter()
        .filter(|o| matches!(o.outcome, Outcome::Skipped { .. }))
        .count();
    let failed = outcomes.iter().filter(|o| o.is_failure()).count();

    println!();
    let status = if failed > 0 {
        "FAILED".red().bold()
    } else {
        "OK".green().bold()
    };
    println!(
        "Conversion result: {} | {} converted, {} skipped, {} failed",
        status,
        converted.to_string().green().bold(),
        skipped.to_string().yellow(),
        if failed > 0 {
            failed.to_string().red().bold()
        } else {
            failed.to_string().normal()
        }
    );
}

/// Error message with its source chain
fn describe(err: &cmtport_build::ConvertError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
