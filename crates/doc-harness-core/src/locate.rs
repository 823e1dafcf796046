//! Match locator: every case-insensitive occurrence of a literal query, with
//! a bounded context window around each.
//!
//! Matching is done on characters, not bytes. Each character is folded to a
//! single lower-case character so offsets in the folded text line up 1:1
//! with the source text; characters whose lower-case form is longer than one
//! character (e.g. `İ`) are left as they are.
//!
//! The scan is left to right and overlap-permitted: after an occurrence at
//! `p` the cursor moves to `p + 1`, so `"aa"` is found three times in
//! `"aaaa"`.

use crate::models::Match;

/// Marker placed where a context window was cut short of the text bounds.
pub const ELLIPSIS: &str = "...";

/// Fold a single character for case-insensitive comparison.
pub fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Fold a string into comparable characters.
pub fn fold(s: &str) -> Vec<char> {
    s.chars().map(fold_char).collect()
}

/// Normalized text prepared for repeated case-insensitive scans.
///
/// Built once per document per search and shared by every query word.
#[derive(Debug, Clone)]
pub struct FoldedText {
    chars: Vec<char>,
    folded: Vec<char>,
}

impl FoldedText {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let folded = chars.iter().copied().map(fold_char).collect();
        Self { chars, folded }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Whether the folded needle occurs anywhere. An empty needle matches.
    pub fn contains(&self, needle: &[char]) -> bool {
        needle.is_empty() || self.find_from(needle, 0).is_some()
    }

    /// First occurrence of `needle` at or after character `from`.
    pub fn find_from(&self, needle: &[char], from: usize) -> Option<usize> {
        if needle.is_empty() || from >= self.folded.len() {
            return None;
        }
        self.folded[from..]
            .windows(needle.len())
            .position(|w| w == needle)
            .map(|i| i + from)
    }

    /// Unfolded characters in `[start, end)`, clamped to the text.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }
}

/// Locate up to `max_matches` occurrences of `query` in `text`.
///
/// Each window spans `context_size` characters either side of the
/// occurrence, clamped to `[0, len]`. An empty query finds nothing.
///
/// `...` is added only on a side where the window stops short of the text,
/// so a match near offset 0 renders as `>>> REVENUE <<< grew...`.
pub fn find_all(
    document: &str,
    text: &FoldedText,
    query: &str,
    max_matches: usize,
    context_size: usize,
) -> Vec<Match> {
    let needle = fold(query);
    let mut matches = Vec::new();
    if needle.is_empty() || max_matches == 0 {
        return matches;
    }

    let mut cursor = 0;
    while matches.len() < max_matches {
        let Some(pos) = text.find_from(&needle, cursor) else {
            break;
        };
        matches.push(build_match(document, text, pos, needle.len(), context_size));
        cursor = pos + 1;
    }
    matches
}

fn build_match(
    document: &str,
    text: &FoldedText,
    pos: usize,
    len: usize,
    context_size: usize,
) -> Match {
    let window_start = pos.saturating_sub(context_size);
    let window_end = (pos + len + context_size).min(text.len());
    let leading_ellipsis = window_start > 0;
    let trailing_ellipsis = window_end < text.len();

    let mut context = String::new();
    if leading_ellipsis {
        context.push_str(ELLIPSIS);
    }
    context.push_str(&text.slice(window_start, pos));
    context.push_str(">>> ");
    context.push_str(&text.slice(pos, pos + len).to_uppercase());
    context.push_str(" <<<");
    context.push_str(&text.slice(pos + len, window_end));
    if trailing_ellipsis {
        context.push_str(ELLIPSIS);
    }

    Match {
        document: document.to_string(),
        context,
        match_offset: pos,
        window_start,
        window_end,
        leading_ellipsis,
        trailing_ellipsis,
    }
}
