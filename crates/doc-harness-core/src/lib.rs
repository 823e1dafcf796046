//! # Doc Harness Core
//!
//! Shared logic for Doc Harness: data models, search settings, the match
//! locator, query evaluation, result rendering, the extractor seam, and the
//! corpus store abstraction.
//!
//! This crate performs no filesystem I/O and pulls in no async runtime. The
//! application crate supplies a directory-backed [`store::Store`] and a
//! multi-format [`extract::Extractor`]; everything between "list the corpus"
//! and "produce a response" happens here.
//!
//! ## Pipeline
//!
//! ```text
//! Store::list ─▶ Store::read ─▶ Extractor ─▶ query::evaluate ─▶ render
//!                                               │
//!                                               └─▶ locate::find_all
//! ```

pub mod error;
pub mod extract;
pub mod locate;
pub mod models;
pub mod query;
pub mod render;
pub mod search;
pub mod settings;
pub mod store;

pub use error::{HarnessError, Result};
