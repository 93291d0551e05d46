//! # Course Index
//!
//! Validate and index a numbered Markdown study-notes corpus.
//!
//! A corpus is a directory of files named `<NN>-<Slug>.md`, each with a title
//! heading and trailing `Previous:` / `Next:` references to its neighbours.
//! Course Index loads those files, checks that the navigation chain matches
//! the numeric order, and regenerates a table of contents grouped into
//! learning levels.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌────────────┐   ┌────────────┐
//! │   Loader   │──▶│ Validator  │──▶│  Manifest  │
//! │ walk+parse │   │ link graph │   │ TOC / JSON │
//! └────────────┘   └────────────┘   └────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! cidx --source-dir ./notes --output ./notes/INDEX.md   # validate + generate
//! cidx check                                            # report only
//! cidx build --check                                    # fail if INDEX.md is stale
//! cidx export --output index.json
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`parse`] | File name and Markdown metadata extraction |
//! | [`loader`] | Directory scanning into documents |
//! | [`validate`] | Navigation chain checks |
//! | [`manifest`] | Level grouping and TOC rendering |
//! | [`build`] | `build` / `check` pipelines |
//! | [`export`] | JSON export |
//! | [`list`] | Document table |
//! | [`progress`] | stderr progress reporting |
//! | [`error`] | Error types |

pub mod build;
pub mod config;
pub mod error;
pub mod export;
pub mod list;
pub mod loader;
pub mod manifest;
pub mod models;
pub mod parse;
pub mod progress;
pub mod validate;
