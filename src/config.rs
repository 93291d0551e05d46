//! TOML configuration.
//!
//! Every section is optional; a missing file at the default path yields
//! [`Config::minimal`]. CLI flags such as `--source-dir` and `--output`
//! override the values read here.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::manifest::validate_levels;
use crate::models::Level;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub manifest: ManifestConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub levels: Vec<Level>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorpusConfig {
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default = "default_exclude_globs")]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            include_globs: default_include_globs(),
            exclude_globs: default_exclude_globs(),
            follow_symlinks: false,
            max_depth: default_max_depth(),
        }
    }
}

fn default_source_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_include_globs() -> Vec<String> {
    vec!["*.md".to_string()]
}
fn default_exclude_globs() -> Vec<String> {
    vec!["README.md".to_string()]
}
fn default_max_depth() -> usize {
    1
}

#[derive(Debug, Deserialize, Clone)]
pub struct ManifestConfig {
    /// Where `build` writes the manifest. `None` prints to stdout.
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_title")]
    pub title: String,
    /// Prepended to each linked file name.
    #[serde(default)]
    pub link_prefix: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            output: None,
            title: default_title(),
            link_prefix: String::new(),
        }
    }
}

fn default_title() -> String {
    "Table of Contents".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ValidationConfig {
    /// Flag non-first documents that carry no `Previous:` reference.
    #[serde(default)]
    pub require_previous: bool,
}

impl Config {
    /// Built-in defaults, used when no config file exists.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, source_dir: Option<PathBuf>, output: Option<PathBuf>) -> Self {
        if let Some(dir) = source_dir {
            self.corpus.source_dir = dir;
        }
        if let Some(out) = output {
            self.manifest.output = Some(out);
        }
        self
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.corpus.max_depth == 0 {
        anyhow::bail!("corpus.max_depth must be >= 1");
    }

    if config.corpus.include_globs.is_empty() {
        anyhow::bail!("corpus.include_globs must not be empty");
    }

    validate_levels(&config.levels)?;

    Ok(config)
}
