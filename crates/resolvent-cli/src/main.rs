#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod logging;

use clap::Parser;
use miette::Result;
use resolvent_core::{BuildConfig, MainField, OutputFormat, Platform};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "resolvent")]
#[command(author, version, about = "Explain how bundlers pick package entry points", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Explain which entry file a specifier resolves to
    Explain {
        /// The specifier to explain (e.g., "lodash", "@scope/pkg/feature", "./button")
        specifier: String,

        /// Path to the package manifest (defaults to <cwd>/package.json)
        #[arg(long, value_name = "FILE")]
        manifest: Option<PathBuf>,

        /// Target platform: "browser", "node", or "neutral"
        #[arg(long, default_value = "browser")]
        platform: String,

        /// Output format: "esm" or "cjs"
        #[arg(long, default_value = "esm")]
        format: String,

        /// Replace the derived condition order (comma-separated)
        #[arg(long, value_delimiter = ',', value_name = "NAMES")]
        conditions: Vec<String>,

        /// Replace the derived main-field order (comma-separated)
        #[arg(long = "main-fields", value_delimiter = ',', value_name = "FIELDS")]
        main_fields: Vec<String>,
    },

    /// Show the derived main-field and condition orders
    Defaults {
        /// Limit output to one platform: "browser", "node", or "neutral"
        #[arg(long, requires = "format")]
        platform: Option<String>,

        /// Limit output to one format: "esm" or "cjs"
        #[arg(long, requires = "platform")]
        format: Option<String>,
    },
}

/// Parse a flag value through `FromStr`, exiting with a usage error on failure.
fn parse_flag<T>(value: &str) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().unwrap_or_else(|err| {
        eprintln!("error: {err}");
        std::process::exit(2);
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    // Logs go to stderr, so this is safe for JSON-printing commands too
    logging::init(cli.verbose, cli.json);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(),
        Some(Commands::Explain {
            specifier,
            manifest,
            platform,
            format,
            conditions,
            main_fields,
        }) => {
            let mut config = BuildConfig::new(
                parse_flag::<Platform>(&platform),
                parse_flag::<OutputFormat>(&format),
            );
            if !main_fields.is_empty() {
                let fields = main_fields
                    .iter()
                    .map(|field| parse_flag::<MainField>(field))
                    .collect();
                config = config.with_main_fields(fields);
            }
            if !conditions.is_empty() {
                config = config.with_conditions(conditions);
            }

            let span = tracing::info_span!("explain", cmd = "explain", cwd = %cwd.display());
            let _guard = span.enter();
            commands::explain::run(&cwd, &specifier, manifest.as_deref(), &config, cli.json)
        }
        Some(Commands::Defaults { platform, format }) => {
            // clap's `requires` guarantees both flags arrive together
            let target = match (platform, format) {
                (Some(platform), Some(format)) => Some((
                    parse_flag::<Platform>(&platform),
                    parse_flag::<OutputFormat>(&format),
                )),
                _ => None,
            };
            commands::defaults::run(target, cli.json)
        }
    }
}
