//! Manifest (table of contents) generation.
//!
//! Groups documents into the configured levels and renders them as a nested
//! Markdown list. Rendering is a pure function of its input, so an unchanged
//! corpus always produces byte-identical output and `build --check` can
//! compare against the file on disk.

use std::path::Path;

use crate::error::{CorpusError, Result};
use crate::models::{CourseIndex, Document, Level, LevelEntry};

/// Reject blank names, inverted or zero-based ranges, and overlapping levels.
pub fn validate_levels(levels: &[Level]) -> Result<()> {
    for level in levels {
        if level.name.trim().is_empty() {
            return Err(CorpusError::Config(format!(
                "level {}..={} has an empty name",
                level.first, level.last
            )));
        }
        if level.first == 0 {
            return Err(CorpusError::Config(format!(
                "level '{}' starts at 0; sequence numbers start at 1",
                level.name
            )));
        }
        if level.first > level.last {
            return Err(CorpusError::Config(format!(
                "level '{}' has first ({}) > last ({})",
                level.name, level.first, level.last
            )));
        }
    }

    let mut sorted: Vec<&Level> = levels.iter().collect();
    sorted.sort_by_key(|l| l.first);
    for pair in sorted.windows(2) {
        if pair[1].first <= pair[0].last {
            return Err(CorpusError::Config(format!(
                "levels '{}' and '{}' overlap",
                pair[0].name, pair[1].name
            )));
        }
    }

    Ok(())
}

/// Group documents into levels.
///
/// With no levels configured every document lands in one unnamed group.
/// Levels keep their configured order; levels without documents are
/// dropped. A document outside every range is a [`CorpusError::Config`].
pub fn build_index(documents: &[Document], levels: &[Level]) -> Result<CourseIndex> {
    validate_levels(levels)?;

    let mut ordered: Vec<Document> = documents.to_vec();
    ordered.sort_by(|a, b| (a.sequence, &a.file_name).cmp(&(b.sequence, &b.file_name)));

    if levels.is_empty() {
        return Ok(CourseIndex {
            levels: vec![LevelEntry {
                name: None,
                documents: ordered,
            }],
        });
    }

    let mut groups: Vec<Vec<Document>> = vec![Vec::new(); levels.len()];
    for doc in ordered {
        let Some(slot) = levels.iter().position(|l| l.contains(doc.sequence)) else {
            return Err(CorpusError::Config(format!(
                "{} (sequence {}) falls outside every configured level",
                doc.file_name, doc.sequence
            )));
        };
        groups[slot].push(doc);
    }

    let levels = levels
        .iter()
        .zip(groups)
        .filter(|(_, docs)| !docs.is_empty())
        .map(|(level, docs)| LevelEntry {
            name: Some(level.name.clone()),
            documents: docs,
        })
        .collect();

    Ok(CourseIndex { levels })
}

/// Render the index as Markdown.
///
/// `link_prefix` is prepended to every file name, for manifests written
/// outside the source directory.
pub fn render_markdown(index: &CourseIndex, title: &str, link_prefix: &str) -> String {
    let mut out = format!("# {}\n\n", title);

    for level in &index.levels {
        let indent = match &level.name {
            Some(name) => {
                out.push_str(&format!("- **{}**\n", name));
                "  "
            }
            None => "",
        };
        for doc in &level.documents {
            out.push_str(&format!(
                "{}- [{}]({})\n",
                indent,
                escape_link_text(&doc.title),
                link_target(link_prefix, &doc.file_name)
            ));
        }
    }

    out
}

fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

fn link_target(prefix: &str, file_name: &str) -> String {
    let target = format!("{}{}", prefix, file_name);
    if target.contains(' ') {
        format!("<{}>", target)
    } else {
        target
    }
}

/// Write the manifest, creating parent directories as needed.
pub fn write_manifest(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CorpusError::io(parent, e))?;
    }
    std::fs::write(path, text).map_err(|e| CorpusError::io(path, e))
}

/// Whether the file at `path` already holds exactly `text`. A missing file
/// counts as stale.
pub fn check_manifest(path: &Path, text: &str) -> Result<bool> {
    match std::fs::read_to_string(path) {
        Ok(existing) => Ok(existing == text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CorpusError::io(path, e)),
    }
}
