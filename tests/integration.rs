use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn cidx_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("cidx");
    path
}

/// Five well-linked notes plus a README, and a config grouping them into two levels.
fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let notes = root.join("notes");
    fs::create_dir_all(&notes).unwrap();

    let topics = [
        "Java-Basics-Fundamentals",
        "OOP-Principles",
        "Collections",
        "Generics",
        "Streams",
    ];
    for (i, slug) in topics.iter().enumerate() {
        let n = i + 1;
        let mut body = format!(
            "# {}\n\n## Overview\n\nNotes about {}.\n\n```java\n// Next: not-a-link.md\n```\n\n---\n",
            slug.replace('-', " "),
            slug
        );
        if n > 1 {
            body.push_str(&format!(
                "**Previous:** [{}]({:02}-{}.md)\n",
                topics[i - 1],
                n - 1,
                topics[i - 1]
            ));
        }
        if n < topics.len() {
            body.push_str(&format!(
                "**Next:** [{}]({:02}-{}.md)\n",
                topics[i + 1],
                n + 1,
                topics[i + 1]
            ));
        }
        fs::write(notes.join(format!("{:02}-{}.md", n, slug)), body).unwrap();
    }
    fs::write(notes.join("README.md"), "# Java Notes\n").unwrap();

    let config_content = format!(
        r#"[corpus]
source_dir = "{}/notes"

[manifest]
output = "{}/notes/INDEX.md"
title = "Java Study Notes"

[validation]
require_previous = true

[[levels]]
name = "Level 1: Foundations"
first = 1
last = 2

[[levels]]
name = "Level 2: Core APIs"
first = 3
last = 10
"#,
        root.display(),
        root.display()
    );

    let config_path = root.join("course-index.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_cidx(config_path: &Path, args: &[&str]) -> (String, String, Option<i32>) {
    let binary = cidx_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("--progress")
        .arg("off")
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run cidx binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code())
}

#[test]
fn test_check_clean_corpus() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, code) = run_cidx(&config_path, &["check"]);
    assert_eq!(code, Some(0), "check failed: stdout={}, stderr={}", stdout, stderr);
    assert_eq!(stdout, "", "a clean report is empty");
    assert!(stderr.contains("5 documents, 0 issues, chain 4 hops"));
}

#[test]
fn test_build_writes_grouped_manifest() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, code) = run_cidx(&config_path, &["build"]);
    assert_eq!(code, Some(0), "build failed: stdout={}, stderr={}", stdout, stderr);

    let manifest = fs::read_to_string(tmp.path().join("notes/INDEX.md")).unwrap();
    assert_eq!(
        manifest,
        "# Java Study Notes\n\n\
         - **Level 1: Foundations**\n  \
           - [Java Basics Fundamentals](01-Java-Basics-Fundamentals.md)\n  \
           - [OOP Principles](02-OOP-Principles.md)\n\
         - **Level 2: Core APIs**\n  \
           - [Collections](03-Collections.md)\n  \
           - [Generics](04-Generics.md)\n  \
           - [Streams](05-Streams.md)\n"
    );
}

#[test]
fn test_build_idempotent() {
    let (tmp, config_path) = setup_test_env();
    let manifest_path = tmp.path().join("notes/INDEX.md");

    run_cidx(&config_path, &["build"]);
    let first = fs::read(&manifest_path).unwrap();
    run_cidx(&config_path, &["build"]);
    let second = fs::read(&manifest_path).unwrap();
    assert_eq!(first, second);

    let (_, stderr, code) = run_cidx(&config_path, &["build", "--check"]);
    assert_eq!(code, Some(0), "stale after rebuild: {}", stderr);
}

#[test]
fn test_build_check_detects_stale_manifest() {
    let (tmp, config_path) = setup_test_env();
    run_cidx(&config_path, &["build"]);

    fs::write(
        tmp.path().join("notes/06-Concurrency.md"),
        "# Concurrency\n\n**Previous:** [Streams](05-Streams.md)\n",
    )
    .unwrap();

    let (_, stderr, code) = run_cidx(&config_path, &["build", "--check"]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("out of date"), "stderr: {}", stderr);
}

#[test]
fn test_duplicate_sequence_exit_code() {
    let (tmp, config_path) = setup_test_env();
    fs::write(
        tmp.path().join("notes/03-Collections-Draft.md"),
        "# Collections (draft)\n",
    )
    .unwrap();

    let (stdout, _, code) = run_cidx(&config_path, &["check"]);
    assert_eq!(code, Some(1));
    assert!(
        stdout.contains(
            "warning: duplicate sequence number 3: 03-Collections-Draft.md, 03-Collections.md"
        ),
        "stdout: {}",
        stdout
    );
}

#[test]
fn test_check_json_report() {
    let (tmp, config_path) = setup_test_env();
    fs::remove_file(tmp.path().join("notes/04-Generics.md")).unwrap();

    let (stdout, _, code) = run_cidx(&config_path, &["check", "--json"]);
    assert_eq!(code, Some(1));
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let kinds: Vec<&str> = report["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["kind"].as_str().unwrap())
        .collect();
    assert!(kinds.contains(&"sequence_gap"));
    assert!(kinds.contains(&"dangling_link"));
}

#[test]
fn test_untitled_document_excluded_and_flagged() {
    let (tmp, config_path) = setup_test_env();
    fs::write(
        tmp.path().join("notes/05-Streams.md"),
        "no heading at all\n\n**Previous:** [Generics](04-Generics.md)\n",
    )
    .unwrap();

    let (stdout, stderr, code) = run_cidx(&config_path, &["build"]);
    assert_eq!(code, Some(1), "stdout={}, stderr={}", stdout, stderr);
    assert!(stderr.contains("05-Streams.md: excluded from index"));

    let manifest = fs::read_to_string(tmp.path().join("notes/INDEX.md")).unwrap();
    assert!(!manifest.contains("05-Streams.md"));
    assert!(manifest.contains("04-Generics.md"));
}

#[test]
fn test_missing_source_dir_exit_2() {
    let (tmp, config_path) = setup_test_env();
    let missing = tmp.path().join("nowhere");

    let (_, stderr, code) = run_cidx(
        &config_path,
        &["--source-dir", missing.to_str().unwrap(), "check"],
    );
    assert_eq!(code, Some(2));
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_document_outside_levels_exit_2() {
    let (tmp, config_path) = setup_test_env();
    fs::write(tmp.path().join("notes/42-Extra.md"), "# Extra\n").unwrap();

    let (_, stderr, code) = run_cidx(&config_path, &["build"]);
    assert_eq!(code, Some(2));
    assert!(stderr.contains("42-Extra.md"), "stderr: {}", stderr);

    // Validation alone does not need level coverage.
    let (_, _, code) = run_cidx(&config_path, &["check"]);
    assert_eq!(code, Some(1));
}

#[test]
fn test_flat_invocation_with_source_and_output() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("01-A.md"), "# A\n\nNext: 02-B.md\n").unwrap();
    fs::write(src.join("02-B.md"), "# B\n\nPrevious: 01-A.md\n").unwrap();
    let out = tmp.path().join("out/TOC.md");

    let output = Command::new(cidx_binary())
        .current_dir(tmp.path())
        .args(["--progress", "off", "--source-dir"])
        .arg(&src)
        .arg("--output")
        .arg(&out)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert!(output.stderr.is_empty());
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "# Table of Contents\n\n- [A](01-A.md)\n- [B](02-B.md)\n"
    );
}

#[test]
fn test_explicit_missing_config_exit_2() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, code) = run_cidx(&tmp.path().join("absent.toml"), &["check"]);
    assert_eq!(code, Some(2));
    assert!(stderr.contains("Failed to read config file"));
}

#[test]
fn test_list_and_export() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, _, code) = run_cidx(&config_path, &["list"]);
    assert_eq!(code, Some(0));
    assert!(stdout.contains("SEQ"));
    assert!(stdout.contains("03-Collections.md"));

    let json_path = tmp.path().join("index.json");
    let (_, _, code) = run_cidx(
        &config_path,
        &["export", "--output", json_path.to_str().unwrap()],
    );
    assert_eq!(code, Some(0));
    let data: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(data["documents"], 5);
    assert_eq!(data["levels"][1]["documents"][0]["title"], "Collections");
}

#[test]
fn test_export_flags_untitled_document() {
    let (tmp, config_path) = setup_test_env();
    fs::write(
        tmp.path().join("notes/05-Streams.md"),
        "no heading at all\n\n**Previous:** [Generics](04-Generics.md)\n",
    )
    .unwrap();

    let (stdout, stderr, code) = run_cidx(&config_path, &["export"]);
    assert_eq!(code, Some(1), "stderr: {}", stderr);
    assert!(stderr.contains("warning: 05-Streams.md: excluded from index"));
    let data: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(data["documents"], 4);
}

#[test]
fn test_export_unwritable_output_names_path() {
    let (tmp, config_path) = setup_test_env();
    let blocker = tmp.path().join("not-a-dir");
    fs::write(&blocker, "plain file").unwrap();
    let target = blocker.join("index.json");

    let (_, stderr, code) = run_cidx(&config_path, &["export", "--output", target.to_str().unwrap()]);
    assert_eq!(code, Some(2));
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("not-a-dir"), "stderr: {}", stderr);
}

#[test]
fn test_heading_style_navigation_links() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("notes");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("01-A.md"), "# A\n\n## Basics\n\n## Next: [B](02-B.md)\n").unwrap();
    fs::write(src.join("02-B.md"), "# B\n\n### ⬅️ Previous: [A](01-A.md)\n").unwrap();

    let output = Command::new(cidx_binary())
        .current_dir(tmp.path())
        .args(["--progress", "off", "--source-dir"])
        .arg(&src)
        .arg("check")
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout);
    assert_eq!(stdout, "");
}
