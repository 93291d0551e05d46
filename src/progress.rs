//! Progress and diagnostics reporting.
//!
//! Reports what the loader is scanning, which files it skipped, and where the
//! manifest was written. Everything goes to **stderr** so stdout stays
//! parseable (manifest text, reports, JSON export).

use std::io::Write;
use std::path::Path;

/// A single progress event.
#[derive(Clone, Debug)]
pub enum ProgressEvent {
    /// Walking the source directory. Total unknown.
    Discovering { dir: String },
    /// n documents read out of total candidates.
    Loading { n: u64, total: u64 },
    /// A file was ignored (name does not follow `<NN>-<Slug>.md`).
    Skipped { file: String, reason: String },
    /// A document could not be parsed and is excluded from the manifest.
    ParseFailed { file: String, reason: String },
    /// An output file was written.
    Wrote { path: String, documents: u64 },
}

/// Reports progress. Implementations write to stderr (human or JSON).
pub trait ProgressReporter {
    fn report(&self, event: ProgressEvent);
}

/// Human-friendly progress on stderr: "load  12 / 40 documents".
pub struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn report(&self, event: ProgressEvent) {
        let line = match &event {
            ProgressEvent::Discovering { dir } => format!("scan {}  discovering...\n", dir),
            ProgressEvent::Loading { n, total } => format!(
                "load  {} / {} documents\n",
                format_number(*n),
                format_number(*total)
            ),
            ProgressEvent::Skipped { file, reason } => format!("skip {}  ({})\n", file, reason),
            ProgressEvent::ParseFailed { file, reason } => {
                format!("Warning: {}: {}\n", file, reason)
            }
            ProgressEvent::Wrote { path, documents } => format!(
                "wrote {} ({} documents)\n",
                path,
                format_number(*documents)
            ),
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl ProgressReporter for JsonProgress {
    fn report(&self, event: ProgressEvent) {
        let obj = match &event {
            ProgressEvent::Discovering { dir } => serde_json::json!({
                "event": "progress",
                "phase": "discovering",
                "dir": dir
            }),
            ProgressEvent::Loading { n, total } => serde_json::json!({
                "event": "progress",
                "phase": "loading",
                "n": n,
                "total": total
            }),
            ProgressEvent::Skipped { file, reason } => serde_json::json!({
                "event": "skipped",
                "file": file,
                "reason": reason
            }),
            ProgressEvent::ParseFailed { file, reason } => serde_json::json!({
                "event": "parse_error",
                "file": file,
                "reason": reason
            }),
            ProgressEvent::Wrote { path, documents } => serde_json::json!({
                "event": "wrote",
                "path": path,
                "documents": documents
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _event: ProgressEvent) {}
}

pub(crate) fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn reporter(&self) -> Box<dyn ProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
