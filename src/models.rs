//! Core data models used throughout the course index.
//!
//! These types represent the documents, navigation links, and level groupings
//! that flow through the load → validate → generate pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Which way a navigation reference points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Previous,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Next => write!(f, "Next"),
            Direction::Previous => write!(f, "Previous"),
        }
    }
}

/// A "Next:" or "Previous:" reference found in a document's body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationLink {
    pub direction: Direction,
    /// Linked file name, e.g. `02-B.md`.
    pub target: String,
    /// 1-based line the reference was found on.
    pub line: usize,
}

/// A single numbered Markdown file in the corpus.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub sequence: u32,
    pub slug: String,
    pub file_name: String,
    #[serde(skip)]
    pub path: PathBuf,
    pub title: String,
    pub sections: Vec<String>,
    pub next: Option<NavigationLink>,
    pub previous: Option<NavigationLink>,
    /// SHA-256 of the raw file contents.
    pub content_hash: String,
    /// Modification time, seconds since the Unix epoch.
    #[serde(skip)]
    pub modified: i64,
}

impl Document {
    pub fn link(&self, direction: Direction) -> Option<&NavigationLink> {
        match direction {
            Direction::Next => self.next.as_ref(),
            Direction::Previous => self.previous.as_ref(),
        }
    }
}

/// A named, inclusive range of sequence numbers representing a learning stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub first: u32,
    pub last: u32,
}

impl Level {
    pub fn contains(&self, sequence: u32) -> bool {
        (self.first..=self.last).contains(&sequence)
    }
}

/// One group of the generated table of contents.
///
/// `name` is `None` when no levels are configured and every document lands
/// in a single implicit group.
#[derive(Debug, Clone, Serialize)]
pub struct LevelEntry {
    pub name: Option<String>,
    pub documents: Vec<Document>,
}

/// The generated table of contents: documents in learning order, grouped into levels.
#[derive(Debug, Clone, Serialize)]
pub struct CourseIndex {
    pub levels: Vec<LevelEntry>,
}

impl CourseIndex {
    /// All documents in manifest order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.levels.iter().flat_map(|l| l.documents.iter())
    }

    pub fn len(&self) -> usize {
        self.levels.iter().map(|l| l.documents.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
