//! Result rendering under an output-size budget.
//!
//! Rendering never fails. When the full response is larger than
//! [`RenderBudget::max_chars`] it is degraded in stages:
//!
//! 1. Full: every matched document with every match.
//! 2. Compact: the first `compact_documents` documents, the first
//!    `compact_matches` matches of each, every snippet cut to
//!    `compact_snippet_chars` and ended with `...`, plus a note counting
//!    omitted documents.
//! 3. Greedy: while still over budget, drop matches per document (down to
//!    one), then documents (down to one), then halve snippet length (down to
//!    [`MIN_SNIPPET_CHARS`]).
//! 4. Cut: the body is truncated at a character boundary.
//!
//! Every response ends with the query and the settings that produced it.
//! Lengths are counted in characters.

use serde::{Deserialize, Serialize};

use crate::locate::ELLIPSIS;
use crate::models::{DocumentMatches, SearchResult};
use crate::settings::{QueryMode, SearchSettings};

/// Snippets are never shortened below this many characters by the greedy stage.
pub const MIN_SNIPPET_CHARS: usize = 20;

/// Output-size limits and the compact-tier shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderBudget {
    pub max_chars: usize,
    pub compact_documents: usize,
    pub compact_matches: usize,
    pub compact_snippet_chars: usize,
}

impl Default for RenderBudget {
    fn default() -> Self {
        Self {
            max_chars: 4000,
            compact_documents: 2,
            compact_matches: 3,
            compact_snippet_chars: 150,
        }
    }
}

/// How much of a result to show. `None` means unlimited.
#[derive(Debug, Clone, Copy)]
struct Shape {
    documents: Option<usize>,
    matches: Option<usize>,
    snippet_chars: Option<usize>,
}

impl Shape {
    const FULL: Shape = Shape {
        documents: None,
        matches: None,
        snippet_chars: None,
    };
}

/// Render `result` into a single text block that fits `budget` when possible.
pub fn render(result: &SearchResult, settings: &SearchSettings, budget: &RenderBudget) -> String {
    let footer = footer(result, settings);

    if result.is_empty() {
        return format!("No matches for '{}'.\n\n{}", result.query, footer);
    }

    let full = render_shape(result, settings, Shape::FULL, &footer);
    if char_len(&full) <= budget.max_chars {
        return full;
    }

    let mut documents = budget.compact_documents.max(1);
    let mut matches = budget.compact_matches.max(1);
    let mut snippet = budget.compact_snippet_chars.max(1);
    loop {
        let shape = Shape {
            documents: Some(documents),
            matches: Some(matches),
            snippet_chars: Some(snippet),
        };
        let out = render_shape(result, settings, shape, &footer);
        if char_len(&out) <= budget.max_chars {
            return out;
        }

        if matches > 1 {
            matches -= 1;
        } else if documents > 1 {
            documents -= 1;
        } else if snippet > MIN_SNIPPET_CHARS {
            snippet = (snippet / 2).max(MIN_SNIPPET_CHARS);
        } else {
            return cut_to_budget(&out, &footer, budget.max_chars);
        }
    }
}

fn render_shape(
    result: &SearchResult,
    settings: &SearchSettings,
    shape: Shape,
    footer: &str,
) -> String {
    let matched_docs = result.documents.len();
    let shown = shape.documents.unwrap_or(matched_docs).min(matched_docs);
    let mut out = header(result);

    for doc in &result.documents[..shown] {
        render_document(&mut out, doc, result.mode, settings, shape);
    }

    if shown < matched_docs {
        out.push_str(&format!(
            "{} {} of {} matched {} omitted\n\n",
            ELLIPSIS,
            matched_docs - shown,
            matched_docs,
            plural(matched_docs, "document", "documents"),
        ));
    }

    out.push_str(footer);
    out
}

fn header(result: &SearchResult) -> String {
    let docs = result.documents.len();
    match result.mode {
        QueryMode::Boolean => format!(
            "{} {} {}:\n\n",
            docs,
            plural(docs, "document", "documents"),
            plural(docs, "matches", "match"),
        ),
        _ => format!(
            "Found {} {} in {} {}:\n\n",
            result.total_matches,
            plural(result.total_matches, "match", "matches"),
            docs,
            plural(docs, "document", "documents"),
        ),
    }
}

fn render_document(
    out: &mut String,
    doc: &DocumentMatches,
    mode: QueryMode,
    settings: &SearchSettings,
    shape: Shape,
) {
    if mode == QueryMode::Boolean {
        out.push_str(&format!("- {}\n", doc.document));
        return;
    }

    let count = doc.match_count();
    out.push_str(&format!(
        "{} ({} {})\n",
        doc.document,
        count,
        plural(count, "match", "matches")
    ));
    if !settings.show_preview {
        return;
    }

    let limit = shape.matches.unwrap_or(count).min(count);
    for (i, m) in doc.matches[..limit].iter().enumerate() {
        let snippet = match shape.snippet_chars {
            Some(max) => compact_snippet(&m.context, max),
            None => m.context.clone(),
        };
        out.push_str(&format!("  [{}] {}\n", i + 1, snippet));
    }
    out.push('\n');
}

fn footer(result: &SearchResult, settings: &SearchSettings) -> String {
    format!(
        "Query: '{}' | mode: {} | context: {} | max matches per file: {}",
        result.query, result.mode, settings.context_size, settings.max_matches_per_file
    )
}

/// Last resort: keep as much of the body as fits, then the footer.
fn cut_to_budget(rendered: &str, footer: &str, max_chars: usize) -> String {
    let body = rendered.strip_suffix(footer).unwrap_or(rendered);
    let reserved = char_len(footer) + ELLIPSIS.len() + 2;
    let keep = max_chars.saturating_sub(reserved);
    if keep == 0 {
        return footer.to_string();
    }
    let cut: String = body.chars().take(keep).collect();
    format!("{}{}\n\n{}", cut.trim_end(), ELLIPSIS, footer)
}

/// First `max` characters of `s`, with an ellipsis if anything was dropped.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}{}", &s[..idx], ELLIPSIS),
        None => s.to_string(),
    }
}

/// At most `max` characters, always ending in one ellipsis.
fn compact_snippet(s: &str, max: usize) -> String {
    let clipped = truncate_chars(s, max);
    if clipped.ends_with(ELLIPSIS) {
        clipped
    } else {
        format!("{}{}", clipped, ELLIPSIS)
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}
