//! Pipeline orchestration.
//!
//! Coordinates load → validate → generate for the `build` and `check`
//! commands. Inconsistencies never abort a run; they are reported and folded
//! into the returned [`Status`] so the CLI can pick an exit code.

use anyhow::{bail, Result};

use crate::config::Config;
use crate::loader::{load_corpus, LoadOutcome};
use crate::manifest::{build_index, check_manifest, render_markdown, write_manifest};
use crate::progress::{display_path, ProgressEvent, ProgressReporter};
use crate::validate::{validate, Report};

/// Outcome of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No inconsistencies.
    Clean,
    /// The run finished but found inconsistencies.
    Inconsistent,
}

impl Status {
    fn from_clean(clean: bool) -> Self {
        if clean {
            Status::Clean
        } else {
            Status::Inconsistent
        }
    }
}

fn load_and_validate(
    config: &Config,
    reporter: &dyn ProgressReporter,
) -> Result<(LoadOutcome, Report)> {
    let loaded = load_corpus(&config.corpus, reporter)?;
    let report = validate(
        &loaded.documents,
        &loaded.failures,
        (&config.validation).into(),
    );
    Ok((loaded, report))
}

/// Validate only and print the report on stdout.
///
/// The text report is one warning line per issue, so a clean corpus prints
/// nothing on stdout. A one-line summary goes to stderr.
pub fn run_check(config: &Config, json: bool, reporter: &dyn ProgressReporter) -> Result<Status> {
    let (loaded, report) = load_and_validate(config, reporter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
        eprintln!(
            "check {}: {} documents, {} issues, chain {} hops",
            display_path(&config.corpus.source_dir),
            loaded.documents.len(),
            report.issues.len(),
            report.chain.hops
        );
    }

    Ok(Status::from_clean(report.is_clean()))
}

/// Validate, then generate the manifest.
///
/// Validation warnings go to stderr. The manifest goes to
/// `config.manifest.output`, or stdout when no output is configured. With
/// `check` nothing is written and an out-of-date manifest counts as an
/// inconsistency.
pub fn run_build(config: &Config, check: bool, reporter: &dyn ProgressReporter) -> Result<Status> {
    let (loaded, report) = load_and_validate(config, reporter)?;
    eprint!("{}", report.render_text());

    let index = build_index(&loaded.documents, &config.levels)?;
    let text = render_markdown(&index, &config.manifest.title, &config.manifest.link_prefix);

    let mut clean = report.is_clean();

    match (&config.manifest.output, check) {
        (Some(path), true) => {
            if !check_manifest(path, &text)? {
                eprintln!("warning: {} is out of date", path.display());
                clean = false;
            }
        }
        (None, true) => bail!("--check needs a manifest output path (--output or manifest.output)"),
        (Some(path), false) => {
            write_manifest(path, &text)?;
            reporter.report(ProgressEvent::Wrote {
                path: display_path(path),
                documents: index.len() as u64,
            });
        }
        (None, false) => print!("{}", text),
    }

    Ok(Status::from_clean(clean))
}
