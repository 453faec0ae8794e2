use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod detector;
mod discovery;
mod driver;

/// Translate CMT requirements files into build-target graphs.
///
/// Every `requirements` file below the scanned directory is parsed and
/// analyzed with the selected profile. Packages whose build script was
/// written by hand are left alone.
///
/// EXAMPLES:
///     cmtport convert                    Convert every package below .
///     cmtport convert src --json         Print the graphs as JSON
///     cmtport convert -j 4 --profile tdaq
///     cmtport profiles                   List built-in profiles
///     cmtport parse cmt/requirements     Dump parsed statements
///
/// ENVIRONMENT VARIABLES:
///     CMTPORT_PROFILE   Profile used when --profile is absent
///     CMTPORT_JOBS      Worker thread cap used when --jobs is absent
///     RUST_LOG          Log filter, overrides -v and -q
///     NO_COLOR          Set to disable colored output
#[derive(Parser)]
#[command(name = "cmtport")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    /// Quiet output (errors only)
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every requirements file below a directory
    ///
    /// Settings come from the nearest cmtport.toml, then CMTPORT_*
    /// variables, then flags. Exits with status 1 if any file failed.
    ///
    /// EXAMPLES:
    ///     cmtport convert Event/         Convert one project area
    ///     cmtport convert --json > out.json
    #[command(visible_alias = "c")]
    Convert {
        /// Directory to scan (default: current directory)
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Pattern profile (atlasoff, tdaq)
        #[arg(long, short = 'p')]
        profile: Option<String>,
        /// Print the package graphs as a JSON array
        #[arg(long)]
        json: bool,
        /// Worker thread cap
        #[arg(long, short = 'j')]
        jobs: Option<usize>,
        /// Disable colored output
        #[arg(long, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
        no_color: bool,
    },

    /// List built-in profiles and the patterns they convert
    Profiles {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Dump the parsed statements of one requirements file as JSON
    ///
    /// EXAMPLES:
    ///     cmtport parse Event/EventInfo/cmt/requirements | jq
    Parse {
        /// Path to the requirements file
        file: PathBuf,
    },
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Convert {
            dir,
            profile,
            json,
            jobs,
            no_color,
        } => {
            let args = commands::convert::ConvertArgs {
                dir,
                profile,
                json,
                jobs,
                no_color,
                quiet: cli.quiet,
            };
            if !commands::convert::run(args)? {
                std::process::exit(1);
            }
        }
        Commands::Profiles { json } => {
            commands::profiles::run(json)?;
        }
        Commands::Parse { file } => {
            commands::parse::run(&file)?;
        }
    }

    Ok(())
}
