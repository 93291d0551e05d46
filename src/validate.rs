//! Link graph validation.
//!
//! Checks that the chain implied by `Next:` / `Previous:` references matches
//! the numeric order of the documents. Validation never fails: every
//! deviation becomes an [`Issue`] in the returned [`Report`], and the caller
//! decides what an unclean report means (the CLI exits with status 1).

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::path::Path;

use crate::config::ValidationConfig;
use crate::error::CorpusError;
use crate::models::{Direction, Document};

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationOptions {
    /// Flag documents other than the first that have no `Previous:` link.
    pub require_previous: bool,
}

impl From<&ValidationConfig> for ValidationOptions {
    fn from(cfg: &ValidationConfig) -> Self {
        Self {
            require_previous: cfg.require_previous,
        }
    }
}

/// One inconsistency found in the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    /// A file has no title and was left out of the index.
    Unparseable { file: String, reason: String },
    /// Two or more files share a sequence number.
    DuplicateSequence { sequence: u32, files: Vec<String> },
    /// Numbers between `after` and `before` are missing.
    SequenceGap { after: u32, before: u32 },
    /// A link the chain needs is absent.
    MissingLink {
        file: String,
        direction: Direction,
        expected: String,
    },
    /// A link names a file that is not in the corpus.
    DanglingLink {
        file: String,
        direction: Direction,
        target: String,
        line: usize,
    },
    /// A link resolves, but not to the neighbouring document.
    /// `expected` is `None` when no link should exist in that direction.
    OrderMismatch {
        file: String,
        direction: Direction,
        target: String,
        expected: Option<String>,
        line: usize,
    },
    /// Following `Next` links returned to an already visited document.
    Cycle { file: String },
    /// No document links to this one and the chain walk never reached it.
    /// Not reported for duplicated sequence numbers.
    Unreachable { file: String },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::Unparseable { file, reason } => {
                write!(f, "{}: excluded from index: {}", file, reason)
            }
            Issue::DuplicateSequence { sequence, files } => write!(
                f,
                "duplicate sequence number {}: {}",
                sequence,
                files.join(", ")
            ),
            Issue::SequenceGap { after, before } => {
                if before - after == 2 {
                    write!(f, "gap in sequence: {} is missing", after + 1)
                } else {
                    write!(
                        f,
                        "gap in sequence: {} to {} are missing",
                        after + 1,
                        before - 1
                    )
                }
            }
            Issue::MissingLink {
                file,
                direction,
                expected,
            } => write!(f, "{}: no {} link (expected {})", file, direction, expected),
            Issue::DanglingLink {
                file,
                direction,
                target,
                line,
            } => write!(
                f,
                "{}:{}: {} link points to {}, which is not in the corpus",
                file, line, direction, target
            ),
            Issue::OrderMismatch {
                file,
                direction,
                target,
                expected,
                line,
            } => match expected {
                Some(expected) => write!(
                    f,
                    "{}:{}: {} link points to {}, expected {}",
                    file, line, direction, target, expected
                ),
                None => write!(
                    f,
                    "{}:{}: {} link points to {}, expected none",
                    file, line, direction, target
                ),
            },
            Issue::Cycle { file } => {
                write!(f, "cycle: navigation chain returns to {}", file)
            }
            Issue::Unreachable { file } => write!(
                f,
                "{}: not reachable from the start of the navigation chain",
                file
            ),
        }
    }
}

/// Result of following `Next` links from the lowest-numbered document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChainWalk {
    /// File names in visiting order.
    pub path: Vec<String>,
    pub hops: usize,
    /// Every document was visited exactly once.
    pub complete: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub issues: Vec<Issue>,
    pub chain: ChainWalk,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// One warning line per issue; empty when clean.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for issue in &self.issues {
            out.push_str("warning: ");
            out.push_str(&issue.to_string());
            out.push('\n');
        }
        out
    }
}

/// One [`Issue::Unparseable`] per parse failure, in load order.
pub fn unparseable(failures: &[CorpusError]) -> Vec<Issue> {
    failures
        .iter()
        .filter_map(|failure| match failure {
            CorpusError::Parse { path, reason } => Some(Issue::Unparseable {
                file: file_name(path),
                reason: reason.clone(),
            }),
            _ => None,
        })
        .collect()
}

/// Validate the navigation graph of the loaded documents.
///
/// `failures` are the per-file parse errors from the loader; they become
/// [`Issue::Unparseable`] and links pointing at those files are not
/// reported as dangling.
pub fn validate(
    documents: &[Document],
    failures: &[CorpusError],
    options: ValidationOptions,
) -> Report {
    let mut issues = unparseable(failures);
    let failed_files: HashSet<String> = issues
        .iter()
        .filter_map(|issue| match issue {
            Issue::Unparseable { file, .. } => Some(file.clone()),
            _ => None,
        })
        .collect();

    let mut by_sequence: BTreeMap<u32, Vec<&Document>> = BTreeMap::new();
    for doc in documents {
        by_sequence.entry(doc.sequence).or_default().push(doc);
    }
    for group in by_sequence.values_mut() {
        group.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    }
    let by_name: HashMap<&str, &Document> = documents
        .iter()
        .map(|d| (d.file_name.as_str(), d))
        .collect();

    for (sequence, group) in &by_sequence {
        if group.len() > 1 {
            issues.push(Issue::DuplicateSequence {
                sequence: *sequence,
                files: group.iter().map(|d| d.file_name.clone()).collect(),
            });
        }
    }

    let sequences: Vec<u32> = by_sequence.keys().copied().collect();
    for pair in sequences.windows(2) {
        if pair[1] > pair[0] + 1 {
            issues.push(Issue::SequenceGap {
                after: pair[0],
                before: pair[1],
            });
        }
    }

    let neighbour = |sequence: u32, direction: Direction| -> Option<u32> {
        let pos = sequences.binary_search(&sequence).ok()?;
        match direction {
            Direction::Next => sequences.get(pos + 1).copied(),
            Direction::Previous => pos.checked_sub(1).and_then(|p| sequences.get(p).copied()),
        }
    };

    let mut ordered: Vec<&Document> = documents.iter().collect();
    ordered.sort_by(|a, b| (a.sequence, &a.file_name).cmp(&(b.sequence, &b.file_name)));

    for doc in &ordered {
        for direction in [Direction::Next, Direction::Previous] {
            let expected_seq = neighbour(doc.sequence, direction);
            let expected_name = expected_seq
                .and_then(|s| by_sequence.get(&s))
                .and_then(|g| g.first())
                .map(|d| d.file_name.clone());

            let Some(link) = doc.link(direction) else {
                let required = direction == Direction::Next || options.require_previous;
                if let (true, Some(expected)) = (required, expected_name) {
                    issues.push(Issue::MissingLink {
                        file: doc.file_name.clone(),
                        direction,
                        expected,
                    });
                }
                continue;
            };

            let Some(target) = by_name.get(link.target.as_str()) else {
                if !failed_files.contains(&link.target) {
                    issues.push(Issue::DanglingLink {
                        file: doc.file_name.clone(),
                        direction,
                        target: link.target.clone(),
                        line: link.line,
                    });
                }
                continue;
            };

            if Some(target.sequence) != expected_seq {
                issues.push(Issue::OrderMismatch {
                    file: doc.file_name.clone(),
                    direction,
                    target: link.target.clone(),
                    expected: expected_name,
                    line: link.line,
                });
            }
        }
    }

    let (chain, cycle) = walk_chain(&ordered, &by_name);
    if let Some(file) = cycle {
        issues.push(Issue::Cycle { file });
    }

    let visited: HashSet<&str> = chain.path.iter().map(String::as_str).collect();
    let linked: HashSet<&str> = documents
        .iter()
        .filter_map(|d| d.next.as_ref())
        .map(|l| l.target.as_str())
        .collect();
    for doc in &ordered {
        let name = doc.file_name.as_str();
        let duplicated = by_sequence.get(&doc.sequence).map_or(false, |g| g.len() > 1);
        if !duplicated && !visited.contains(name) && !linked.contains(name) {
            issues.push(Issue::Unreachable {
                file: doc.file_name.clone(),
            });
        }
    }

    Report { issues, chain }
}

/// Follow `Next` links from the first document. Returns the walk and, if the
/// walk looped, the file it looped back to.
fn walk_chain<'a>(
    ordered: &[&'a Document],
    by_name: &HashMap<&str, &'a Document>,
) -> (ChainWalk, Option<String>) {
    let Some(first) = ordered.first() else {
        return (
            ChainWalk {
                complete: true,
                ..ChainWalk::default()
            },
            None,
        );
    };

    let mut walk = ChainWalk::default();
    let mut seen = HashSet::new();
    let mut current = *first;
    let mut cycle = None;

    loop {
        seen.insert(current.file_name.as_str());
        walk.path.push(current.file_name.clone());

        let Some(next) = current
            .next
            .as_ref()
            .and_then(|l| by_name.get(l.target.as_str()).copied())
        else {
            break;
        };
        if seen.contains(next.file_name.as_str()) {
            cycle = Some(next.file_name.clone());
            break;
        }
        current = next;
        walk.hops += 1;
    }

    walk.complete = walk.path.len() == ordered.len();
    (walk, cycle)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
