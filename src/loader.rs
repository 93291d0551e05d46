//! Document loader.
//!
//! Walks the source directory, keeps files that match the include globs and
//! follow the `<NN>-<Slug>.md` naming scheme, and turns each one into a
//! [`Document`]. A file without a title is recorded as a parse failure and
//! the batch continues; anything that cannot be read aborts the load.

use globset::{Glob, GlobSet, GlobSetBuilder};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::CorpusConfig;
use crate::error::{CorpusError, Result};
use crate::models::Document;
use crate::parse::{parse_file_name, parse_markdown};
use crate::progress::{display_path, NoProgress, ProgressEvent, ProgressReporter};

/// Everything the loader found.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Parsed documents sorted by `(sequence, file_name)`.
    pub documents: Vec<Document>,
    /// One [`CorpusError::Parse`] per file without a discoverable title.
    pub failures: Vec<CorpusError>,
    /// Files matched by the globs whose names are not `<NN>-<Slug>.md`.
    pub skipped: Vec<PathBuf>,
}

/// Load a directory with the default corpus settings and no progress output.
pub fn load_dir(dir: &Path) -> Result<LoadOutcome> {
    let cfg = CorpusConfig {
        source_dir: dir.to_path_buf(),
        ..CorpusConfig::default()
    };
    load_corpus(&cfg, &NoProgress)
}

pub fn load_corpus(cfg: &CorpusConfig, reporter: &dyn ProgressReporter) -> Result<LoadOutcome> {
    let root = &cfg.source_dir;
    let meta = std::fs::metadata(root).map_err(|e| CorpusError::io(root, e))?;
    if !meta.is_dir() {
        return Err(CorpusError::io(
            root,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }

    let include_set = build_globset(&cfg.include_globs)?;
    let exclude_set = build_globset(&cfg.exclude_globs)?;

    reporter.report(ProgressEvent::Discovering {
        dir: display_path(root),
    });

    let mut candidates = Vec::new();
    let walker = WalkDir::new(root)
        .max_depth(cfg.max_depth)
        .follow_links(cfg.follow_symlinks)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
            CorpusError::io(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if exclude_set.is_match(&rel_str) {
            continue;
        }
        if !include_set.is_match(&rel_str) {
            continue;
        }
        candidates.push(path.to_path_buf());
    }

    let mut outcome = LoadOutcome::default();
    let total = candidates.len() as u64;

    for (i, path) in candidates.into_iter().enumerate() {
        match load_document(&path) {
            Ok(Some(doc)) => outcome.documents.push(doc),
            Ok(None) => {
                reporter.report(ProgressEvent::Skipped {
                    file: display_path(&path),
                    reason: "name is not <NN>-<Slug>.md".to_string(),
                });
                outcome.skipped.push(path);
            }
            Err(err @ CorpusError::Parse { .. }) => {
                reporter.report(ProgressEvent::ParseFailed {
                    file: display_path(&path),
                    reason: err.to_string(),
                });
                outcome.failures.push(err);
            }
            Err(err) => return Err(err),
        }
        reporter.report(ProgressEvent::Loading {
            n: i as u64 + 1,
            total,
        });
    }

    outcome
        .documents
        .sort_by(|a, b| (a.sequence, &a.file_name).cmp(&(b.sequence, &b.file_name)));

    Ok(outcome)
}

/// Read and parse a single file.
///
/// Returns `Ok(None)` when the file name does not follow the numbering
/// scheme and [`CorpusError::Parse`] when the body has no title heading.
pub fn load_document(path: &Path) -> Result<Option<Document>> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let Some(name) = parse_file_name(&file_name) else {
        return Ok(None);
    };

    let bytes = std::fs::read(path).map_err(|e| CorpusError::io(path, e))?;
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let content_hash = format!("{:x}", hasher.finalize());

    let text = String::from_utf8_lossy(&bytes);
    let parsed = parse_markdown(&text);
    let Some(title) = parsed.title else {
        return Err(CorpusError::Parse {
            path: path.to_path_buf(),
            reason: "no title heading found".to_string(),
        });
    };

    Ok(Some(Document {
        sequence: name.sequence,
        slug: name.slug,
        file_name,
        path: path.to_path_buf(),
        title,
        sections: parsed.sections,
        next: parsed.next,
        previous: parsed.previous,
        content_hash,
        modified,
    }))
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| CorpusError::Config(format!("invalid glob '{}': {}", pattern, e)))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| CorpusError::Config(format!("invalid glob set: {}", e)))
}
