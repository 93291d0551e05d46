//! Markdown metadata extraction.
//!
//! Parses `<NN>-<Slug>.md` file names and pulls the title, section headings,
//! and trailing navigation references out of a document body. Headings and
//! references inside fenced code blocks are ignored, since the notes embed
//! plenty of source snippets.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{Direction, NavigationLink};

/// Sequence number and slug decoded from a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileName {
    pub sequence: u32,
    pub slug: String,
}

/// Metadata extracted from a document body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markdown {
    pub title: Option<String>,
    pub sections: Vec<String>,
    pub next: Option<NavigationLink>,
    pub previous: Option<NavigationLink>,
}

fn file_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)-(.+)\.md$").expect("valid file name pattern"))
}

fn nav_keyword_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(next|previous|prev)\b[^:\n]{0,24}:")
            .expect("valid navigation keyword pattern")
    })
}

fn link_target_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // `<...>` targets may contain spaces; bare targets end at whitespace.
        Regex::new(r#"<(?:[^<>\n]*/)?(\d+-[^<>/\n]+?\.md)>|(\d+-[^\s()\[\]<>"'`/|]+?\.md)\b"#)
            .expect("valid link target pattern")
    })
}

/// Decode `<NN>-<Slug>.md`. Returns `None` for anything else, including a
/// zero sequence number.
pub fn parse_file_name(name: &str) -> Option<FileName> {
    let caps = file_name_re().captures(name)?;
    let sequence: u32 = caps[1].parse().ok()?;
    if sequence == 0 {
        return None;
    }
    Some(FileName {
        sequence,
        slug: caps[2].to_string(),
    })
}

/// Extract title, sections, and navigation links from a Markdown body.
///
/// The title is the first ATX heading. Every later heading becomes a section.
/// When a document carries several `Next:` (or `Previous:`) references the
/// last one wins, since navigation lives at the end of the file.
pub fn parse_markdown(text: &str) -> Markdown {
    let mut out = Markdown::default();
    let mut fence: Option<(char, usize)> = None;

    for (idx, line) in text.lines().enumerate() {
        if let Some(marker) = fence_marker(line) {
            match fence {
                None => fence = Some(marker),
                Some((ch, len)) if ch == marker.0 && marker.1 >= len => fence = None,
                Some(_) => {}
            }
            continue;
        }
        if fence.is_some() {
            continue;
        }

        let links = navigation_links(line, idx + 1);
        if links.is_empty() {
            if let Some(heading) = atx_heading(line) {
                if out.title.is_none() {
                    out.title = Some(heading);
                } else {
                    out.sections.push(heading);
                }
            }
            continue;
        }

        // Navigation written as a heading (`## Next: ...`) is a link, not a section.
        for link in links {
            match link.direction {
                Direction::Next => out.next = Some(link),
                Direction::Previous => out.previous = Some(link),
            }
        }
    }

    out
}

/// Opening or closing code fence: at most three spaces of indent, then three
/// or more backticks or tildes.
fn fence_marker(line: &str) -> Option<(char, usize)> {
    let stripped = line.trim_start_matches(' ');
    if line.len() - stripped.len() > 3 {
        return None;
    }
    let ch = stripped.chars().next()?;
    if ch != '`' && ch != '~' {
        return None;
    }
    let len = stripped.chars().take_while(|c| *c == ch).count();
    (len >= 3).then_some((ch, len))
}

/// Text of an ATX heading (`#` through `######`), closing hashes removed.
fn atx_heading(line: &str) -> Option<String> {
    let stripped = line.trim_start_matches(' ');
    if line.len() - stripped.len() > 3 {
        return None;
    }
    let hashes = stripped.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &stripped[hashes..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }
    let mut text = rest.trim();
    let closing = text.trim_end_matches('#');
    if closing.is_empty() || closing.ends_with([' ', '\t']) {
        text = closing.trim_end();
    }
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// All navigation references on one line.
///
/// Targets are bare (`02-B.md`, `./02-B.md`), inside `[..](..)`, or wrapped
/// in angle brackets when the file name contains spaces (`<02-My Notes.md>`),
/// which is how manifests write such names.
///
/// A line may hold both directions (`Previous: 01-A.md | Next: 03-C.md`), so
/// each keyword only claims the first file name between itself and the next
/// keyword.
fn navigation_links(line: &str, line_no: usize) -> Vec<NavigationLink> {
    let keywords: Vec<_> = nav_keyword_re().captures_iter(line).collect();
    let mut links = Vec::new();

    for (i, caps) in keywords.iter().enumerate() {
        let (Some(whole), Some(word)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = keywords
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(line.len());
        let segment = &line[whole.end()..end];
        let Some(target) = link_target_re()
            .captures(segment)
            .and_then(|c| c.get(1).or_else(|| c.get(2)))
            .map(|m| m.as_str().to_string())
        else {
            continue;
        };
        let direction = if word.as_str().eq_ignore_ascii_case("next") {
            Direction::Next
        } else {
            Direction::Previous
        };
        links.push(NavigationLink {
            direction,
            target,
            line: line_no,
        });
    }

    links
}
