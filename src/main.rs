//! # Course Index CLI (`cidx`)
//!
//! Validates the navigation chain of a numbered Markdown corpus and
//! regenerates its table of contents.
//!
//! ## Usage
//!
//! ```bash
//! cidx --config ./course-index.toml <command>
//! cidx --source-dir ./notes --output ./notes/INDEX.md
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cidx build` | Validate, then write the manifest (default command) |
//! | `cidx check` | Validate and print the report |
//! | `cidx list` | Print a table of the loaded documents |
//! | `cidx export` | Write the course index as JSON |
//!
//! ## Exit codes
//!
//! `0` clean, `1` inconsistencies found, `2` fatal error (I/O, config).

use clap::{Parser, Subcommand};
use course_index::build::{self, Status};
use course_index::config::{self, Config};
use course_index::progress::ProgressMode;
use course_index::{export, list};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const DEFAULT_CONFIG: &str = "./course-index.toml";

/// Course Index CLI — validate and index a numbered Markdown corpus.
#[derive(Parser)]
#[command(
    name = "cidx",
    about = "Validate and index a numbered Markdown study-notes corpus",
    version,
    long_about = "Loads `<NN>-<Slug>.md` documents, checks that their Next/Previous \
    navigation links follow the numeric order, and regenerates a table of contents \
    grouped into levels. Exit code 0 means clean, 1 means inconsistencies were found, \
    2 means a fatal I/O or configuration error."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Optional when left at the default: a missing `./course-index.toml`
    /// falls back to built-in settings.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Directory holding the numbered documents. Overrides `corpus.source_dir`.
    #[arg(long, global = true)]
    source_dir: Option<PathBuf>,

    /// Progress on stderr: `off`, `human`, or `json`. Defaults to `human` on a TTY.
    #[arg(long, global = true, value_enum)]
    progress: Option<ProgressMode>,

    /// Manifest path when no subcommand is given (same as `build --output`).
    #[arg(long)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Validate the corpus, then generate the manifest.
    ///
    /// Writes to `--output` (or `manifest.output`), or stdout when neither
    /// is set. Validation warnings are printed on stderr.
    Build {
        /// Manifest path. Overrides `manifest.output`.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write nothing; exit 1 if the manifest on disk is out of date.
        #[arg(long)]
        check: bool,
    },

    /// Validate the navigation chain and print the report.
    ///
    /// Prints one warning line per inconsistency. Manifest level
    /// configuration is not needed.
    Check {
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List loaded documents with their titles and links.
    List,

    /// Export the course index as JSON.
    Export {
        /// Output file. Writes to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn load(
    cli_config: &Path,
    source_dir: Option<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<Config> {
    let cfg = if cli_config == Path::new(DEFAULT_CONFIG) && !cli_config.exists() {
        Config::minimal()
    } else {
        config::load_config(cli_config)?
    };
    Ok(cfg.with_overrides(source_dir, output))
}

fn run(cli: Cli) -> anyhow::Result<Status> {
    let mode = cli.progress.unwrap_or_else(ProgressMode::default_for_tty);
    let reporter = mode.reporter();

    match cli.command {
        None => {
            let cfg = load(&cli.config, cli.source_dir, cli.output)?;
            build::run_build(&cfg, false, reporter.as_ref())
        }
        Some(Commands::Build { output, check }) => {
            let cfg = load(&cli.config, cli.source_dir, output.or(cli.output))?;
            build::run_build(&cfg, check, reporter.as_ref())
        }
        Some(Commands::Check { json }) => {
            let cfg = load(&cli.config, cli.source_dir, None)?;
            build::run_check(&cfg, json, reporter.as_ref())
        }
        Some(Commands::List) => {
            let cfg = load(&cli.config, cli.source_dir, None)?;
            list::run_list(&cfg, reporter.as_ref())?;
            Ok(Status::Clean)
        }
        Some(Commands::Export { output }) => {
            let cfg = load(&cli.config, cli.source_dir, None)?;
            export::run_export(&cfg, output.as_deref(), reporter.as_ref())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(Status::Clean) => ExitCode::SUCCESS,
        Ok(Status::Inconsistent) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
