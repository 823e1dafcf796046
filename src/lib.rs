//! # Doc Harness
//!
//! A local document corpus with multi-format text extraction and
//! context-window search.
//!
//! Documents (plain text, PDF, DOCX, XLSX/XLS) are stored as files in one
//! directory. Every search re-extracts the corpus; there is no index.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌─────────────┐   ┌──────────┐
//! │ FsStore  │──▶│ Format   │──▶│ Evaluator + │──▶│ Renderer │
//! │ (docs/)  │   │ Extractor│   │ Locator     │   │ (budget) │
//! └──────────┘   └──────────┘   └─────────────┘   └──────────┘
//! ```
//!
//! The pure engine (settings, locator, evaluator, renderer, store trait)
//! lives in `doc-harness-core`; this crate provides the filesystem store,
//! the format extractor, persisted settings, and the `dh` CLI.
//!
//! ## Quick Start
//!
//! ```bash
//! dh add reports/q1.pdf notes.txt
//! dh search "revenue"
//! dh search "cat and dog" --mode boolean
//! dh settings set context_size 150
//! dh clear
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`fs_store`] | Directory-backed corpus store |
//! | [`extract`] | Text extraction for every supported format |
//! | [`settings_file`] | Persisted search settings |
//! | [`ingest`] | `dh add` |
//! | [`documents`] | `dh list`, `dh clear`, `dh show` |
//! | [`search`] | `dh search` |
//! | [`settings_cmd`] | `dh settings` |
//! | [`logging`] | Tracing subscriber setup |

pub mod config;
pub mod documents;
pub mod extract;
pub mod fs_store;
pub mod ingest;
pub mod logging;
pub mod search;
pub mod settings_cmd;
pub mod settings_file;
