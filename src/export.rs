//! Export the course index as JSON.
//!
//! Produces the same grouping as the Markdown manifest, plus per-document
//! sections, navigation links and content hashes, for tooling that wants
//! structured data instead of a rendered table of contents.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::build::Status;
use crate::config::Config;
use crate::loader::load_corpus;
use crate::manifest::{build_index, write_manifest};
use crate::models::{CourseIndex, Document, NavigationLink};
use crate::progress::{display_path, ProgressEvent, ProgressReporter};
use crate::validate::unparseable;

#[derive(Serialize)]
struct ExportData<'a> {
    title: &'a str,
    documents: usize,
    levels: Vec<ExportLevel<'a>>,
}

#[derive(Serialize)]
struct ExportLevel<'a> {
    name: Option<&'a str>,
    documents: Vec<ExportDocument<'a>>,
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    sequence: u32,
    slug: &'a str,
    file_name: &'a str,
    title: &'a str,
    sections: &'a [String],
    next: Option<&'a NavigationLink>,
    previous: Option<&'a NavigationLink>,
    content_hash: &'a str,
}

impl<'a> From<&'a Document> for ExportDocument<'a> {
    fn from(doc: &'a Document) -> Self {
        Self {
            sequence: doc.sequence,
            slug: &doc.slug,
            file_name: &doc.file_name,
            title: &doc.title,
            sections: &doc.sections,
            next: doc.next.as_ref(),
            previous: doc.previous.as_ref(),
            content_hash: &doc.content_hash,
        }
    }
}

/// Serialize an index as pretty-printed JSON.
pub fn index_to_json(index: &CourseIndex, title: &str) -> serde_json::Result<String> {
    let data = ExportData {
        title,
        documents: index.len(),
        levels: index
            .levels
            .iter()
            .map(|level| ExportLevel {
                name: level.name.as_deref(),
                documents: level.documents.iter().map(ExportDocument::from).collect(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&data)
}

/// Load the corpus and export it as JSON.
///
/// If `output` is `Some`, writes to that file path. Otherwise writes
/// to stdout for piping. Files that failed to parse are left out of the
/// export, warned about on stderr, and make the run inconsistent.
pub fn run_export(
    config: &Config,
    output: Option<&Path>,
    reporter: &dyn ProgressReporter,
) -> Result<Status> {
    let loaded = load_corpus(&config.corpus, reporter)?;
    let index = build_index(&loaded.documents, &config.levels)?;
    let json = index_to_json(&index, &config.manifest.title)?;

    let excluded = unparseable(&loaded.failures);
    for issue in &excluded {
        eprintln!("warning: {}", issue);
    }

    match output {
        Some(path) => {
            write_manifest(path, &format!("{}\n", json))
                .with_context(|| format!("Failed to write export {}", path.display()))?;
            reporter.report(ProgressEvent::Wrote {
                path: display_path(path),
                documents: index.len() as u64,
            });
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(if excluded.is_empty() {
        Status::Clean
    } else {
        Status::Inconsistent
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, Level};
    use std::path::PathBuf;

    #[test]
    fn test_json_shape() {
        let doc = Document {
            sequence: 1,
            slug: "A".to_string(),
            file_name: "01-A.md".to_string(),
            path: PathBuf::from("01-A.md"),
            title: "Intro".to_string(),
            sections: vec!["Setup".to_string()],
            next: Some(NavigationLink {
                direction: Direction::Next,
                target: "02-B.md".to_string(),
                line: 9,
            }),
            previous: None,
            content_hash: "abc".to_string(),
            modified: 0,
        };
        let levels = vec![Level {
            name: "Basics".to_string(),
            first: 1,
            last: 9,
        }];
        let index = build_index(&[doc], &levels).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&index_to_json(&index, "Notes").unwrap()).unwrap();

        assert_eq!(json["title"], "Notes");
        assert_eq!(json["documents"], 1);
        assert_eq!(json["levels"][0]["name"], "Basics");
        let d = &json["levels"][0]["documents"][0];
        assert_eq!(d["file_name"], "01-A.md");
        assert_eq!(d["sections"][0], "Setup");
        assert_eq!(d["next"]["direction"], "next");
        assert_eq!(d["next"]["target"], "02-B.md");
        assert!(d["previous"].is_null());
        assert!(d.get("path").is_none());
    }

    #[test]
    fn test_run_export_flags_untitled_document() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("01-A.md"), "# A\n").unwrap();
        std::fs::write(tmp.path().join("02-B.md"), "no heading\n").unwrap();
        let out = tmp.path().join("out/index.json");
        let cfg = Config::minimal().with_overrides(Some(tmp.path().to_path_buf()), None);

        let status = run_export(&cfg, Some(&out), &crate::progress::NoProgress).unwrap();
        assert_eq!(status, Status::Inconsistent);
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(json["documents"], 1);
    }

    #[test]
    fn test_run_export_write_error_names_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("01-A.md"), "# A\n").unwrap();
        std::fs::write(tmp.path().join("blocker"), "file, not a directory").unwrap();
        let out = tmp.path().join("blocker/index.json");
        let cfg = Config::minimal().with_overrides(Some(tmp.path().to_path_buf()), None);

        let err = run_export(&cfg, Some(&out), &crate::progress::NoProgress).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("blocker"), "message: {}", message);
    }
}
