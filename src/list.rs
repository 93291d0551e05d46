use anyhow::Result;

use crate::config::Config;
use crate::loader::load_corpus;
use crate::models::Document;
use crate::progress::ProgressReporter;

pub fn run_list(config: &Config, reporter: &dyn ProgressReporter) -> Result<()> {
    let loaded = load_corpus(&config.corpus, reporter)?;

    println!(
        "{:>4}  {:<40} {:<40} {:>8}  {:<16}  NEXT",
        "SEQ", "FILE", "TITLE", "SECTIONS", "MODIFIED"
    );
    for doc in &loaded.documents {
        println!("{}", format_row(doc));
    }

    if !loaded.failures.is_empty() || !loaded.skipped.is_empty() {
        println!();
        println!(
            "{} documents, {} unparseable, {} skipped",
            loaded.documents.len(),
            loaded.failures.len(),
            loaded.skipped.len()
        );
    }

    Ok(())
}

fn format_row(doc: &Document) -> String {
    let next = doc
        .next
        .as_ref()
        .map(|l| l.target.as_str())
        .unwrap_or("-");
    format!(
        "{:>4}  {:<40} {:<40} {:>8}  {:<16}  {}",
        doc.sequence,
        truncate(&doc.file_name, 40),
        truncate(&doc.title, 40),
        doc.sections.len(),
        format_ts_iso(doc.modified),
        next
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('…');
        out
    }
}

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_format_ts_iso() {
        assert_eq!(format_ts_iso(0), "1970-01-01 00:00");
    }
}
