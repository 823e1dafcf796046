//! Query evaluation: decides whether a document matches and, for the
//! positional modes, which occurrences to report.
//!
//! # Boolean operator precedence
//!
//! Only one operator kind is honored per query. The separators are tried in
//! the fixed order `" and "`, `" or "`, `" not "` (case-insensitive) and the
//! first one present wins. Any other operator words left in the terms are
//! matched literally, so `"a and b or c"` requires both `a` and `b or c`.
//! For `not`, the query is split at the first separator only.

use crate::locate::{find_all, fold, FoldedText};
use crate::models::{DocumentMatches, Match};
use crate::settings::{QueryMode, SearchSettings};

/// A parsed boolean-mode query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BooleanQuery {
    /// Every term must occur.
    All(Vec<String>),
    /// At least one term must occur.
    Any(Vec<String>),
    /// `include` occurs and `exclude` does not.
    Without { include: String, exclude: String },
    /// No operator: plain containment of the whole query.
    Contains(String),
}

impl BooleanQuery {
    /// Parse a boolean query. Operators are found case-insensitively; the
    /// terms keep the case they were written in and are folded on matching.
    pub fn parse(query: &str) -> Self {
        let q = FoldedText::new(query.trim());
        let all = split_on(&q, " and ", usize::MAX);
        if !all.is_empty() {
            return BooleanQuery::All(non_empty(all));
        }
        let any = split_on(&q, " or ", usize::MAX);
        if !any.is_empty() {
            return BooleanQuery::Any(non_empty(any));
        }
        if let [include, exclude] = split_on(&q, " not ", 1).as_slice() {
            return BooleanQuery::Without {
                include: include.trim().to_string(),
                exclude: exclude.trim().to_string(),
            };
        }
        BooleanQuery::Contains(q.slice(0, q.len()))
    }

    pub fn matches(&self, text: &FoldedText) -> bool {
        let has = |term: &str| text.contains(&fold(term));
        match self {
            BooleanQuery::All(terms) => {
                !terms.is_empty() && terms.iter().all(|t| has(t.as_str()))
            }
            BooleanQuery::Any(terms) => terms.iter().any(|t| has(t.as_str())),
            BooleanQuery::Without { include, exclude } => {
                has(include.as_str()) && !has(exclude.as_str())
            }
            BooleanQuery::Contains(term) => !term.is_empty() && has(term.as_str()),
        }
    }
}

/// Split at up to `max_splits` folded occurrences of `sep`, slicing the
/// unfolded text. Empty when `sep` does not occur.
fn split_on(query: &FoldedText, sep: &str, max_splits: usize) -> Vec<String> {
    let needle = fold(sep);
    let mut parts = Vec::new();
    let mut start = 0;
    while parts.len() < max_splits {
        let Some(at) = query.find_from(&needle, start) else {
            break;
        };
        parts.push(query.slice(start, at));
        start = at + needle.len();
    }
    if !parts.is_empty() {
        parts.push(query.slice(start, query.len()));
    }
    parts
}

fn non_empty(terms: Vec<String>) -> Vec<String> {
    terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Document-level boolean evaluation over raw text.
pub fn boolean_search(query: &str, text: &str) -> bool {
    BooleanQuery::parse(query).matches(&FoldedText::new(text))
}

/// Evaluate `query` against one document's normalized text.
///
/// Returns `None` when the document is excluded. In boolean mode an included
/// document carries no positional matches.
pub fn evaluate(
    document: &str,
    text: &str,
    query: &str,
    settings: &SearchSettings,
) -> Option<DocumentMatches> {
    let query = query.trim();
    if query.is_empty() || text.is_empty() {
        return None;
    }
    let folded = FoldedText::new(text);

    let matches = match settings.query_mode {
        QueryMode::Exact => {
            if !folded.contains(&fold(query)) {
                return None;
            }
            find_all(
                document,
                &folded,
                query,
                settings.max_matches_per_file,
                settings.context_size,
            )
        }
        QueryMode::PerWord => per_word_matches(document, &folded, query, settings),
        QueryMode::Boolean => {
            if !BooleanQuery::parse(query).matches(&folded) {
                return None;
            }
            return Some(DocumentMatches {
                document: document.to_string(),
                matches: Vec::new(),
            });
        }
    };

    if matches.is_empty() {
        return None;
    }
    Some(DocumentMatches {
        document: document.to_string(),
        matches,
    })
}

/// Locate each distinct word on its own, then merge in text order.
fn per_word_matches(
    document: &str,
    text: &FoldedText,
    query: &str,
    settings: &SearchSettings,
) -> Vec<Match> {
    let mut seen: Vec<Vec<char>> = Vec::new();
    let mut located: Vec<(usize, usize, Match)> = Vec::new();

    for word in query.split_whitespace() {
        let key = fold(word);
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        let word_index = seen.len();
        for m in find_all(
            document,
            text,
            word,
            settings.max_matches_per_file,
            settings.context_size,
        ) {
            located.push((m.match_offset, word_index, m));
        }
    }

    located.sort_by_key(|(offset, word_index, _)| (*offset, *word_index));
    located.truncate(settings.max_matches_per_file);
    located.into_iter().map(|(_, _, m)| m).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(mode: QueryMode) -> SearchSettings {
        SearchSettings {
            query_mode: mode,
            ..SearchSettings::default()
        }
    }

    #[test]
    fn boolean_and_requires_every_term() {
        assert!(boolean_search("cat and dog", "The Dog chased the CAT"));
        assert!(!boolean_search("cat and dog", "only a cat here"));
        assert!(!boolean_search("cat and dog", "only a dog here"));
    }

    #[test]
    fn boolean_or_requires_any_term() {
        assert!(boolean_search("cat or dog", "a dog"));
        assert!(boolean_search("cat or dog", "a cat"));
        assert!(!boolean_search("cat or dog", "a bird"));
    }

    #[test]
    fn boolean_not_excludes_second_term() {
        assert!(boolean_search("cat not dog", "just a cat"));
        assert!(!boolean_search("cat not dog", "cat and dog"));
        assert!(!boolean_search("cat not dog", "just a dog"));
    }

    #[test]
    fn boolean_without_operator_is_containment() {
        assert!(boolean_search("Quarterly Report", "the quarterly report is due"));
        assert!(!boolean_search("quarterly report", "the report is quarterly"));
    }

    #[test]
    fn boolean_operators_are_case_insensitive() {
        assert!(boolean_search("cat AND dog", "dog, cat"));
        assert!(boolean_search("cat Or dog", "dog"));
        assert!(!boolean_search("cat NOT dog", "dog, cat"));
    }

    #[test]
    fn boolean_first_operator_kind_wins() {
        assert_eq!(
            BooleanQuery::parse("a and b or c"),
            BooleanQuery::All(vec!["a".to_string(), "b or c".to_string()])
        );
        assert_eq!(
            BooleanQuery::parse("a or b not c"),
            BooleanQuery::Any(vec!["a".to_string(), "b not c".to_string()])
        );
        assert_eq!(
            BooleanQuery::parse("a not b not c"),
            BooleanQuery::Without {
                include: "a".to_string(),
                exclude: "b not c".to_string()
            }
        );
        assert!(boolean_search("a and b or c", "a ... b or c"));
        assert!(!boolean_search("a and b or c", "a ... c"));
    }

    #[test]
    fn boolean_terms_fold_like_document_text() {
        let exact = settings(QueryMode::Exact);
        let boolean = settings(QueryMode::Boolean);
        assert!(evaluate("a.txt", "ΟΔΟΣ 5", "ΟΔΟΣ", &exact).is_some());
        assert!(evaluate("a.txt", "ΟΔΟΣ 5", "ΟΔΟΣ", &boolean).is_some());
        assert!(boolean_search("İstanbul", "İstanbul"));
        assert!(boolean_search("İstanbul AND ΟΔΟΣ", "ΟΔΟΣ, İstanbul"));
        assert!(boolean_search("ΟΔΟΣ not İzmir", "ΟΔΟΣ İstanbul"));
        assert_eq!(
            BooleanQuery::parse("Σ Or İ"),
            BooleanQuery::Any(vec!["Σ".to_string(), "İ".to_string()])
        );
    }

    #[test]
    fn boolean_and_chains_more_than_two_terms() {
        assert!(boolean_search("red and green and blue", "blue green red"));
        assert!(!boolean_search("red and green and blue", "blue red"));
    }

    #[test]
    fn exact_mode_includes_with_positions() {
        let dm = evaluate(
            "a.txt",
            "Invoice 1, invoice 2",
            "INVOICE",
            &settings(QueryMode::Exact),
        )
        .unwrap();
        assert_eq!(dm.document, "a.txt");
        assert_eq!(dm.match_count(), 2);
        assert_eq!(dm.matches[1].match_offset, 11);
    }

    #[test]
    fn exact_mode_excludes_when_absent() {
        assert!(evaluate("a.txt", "nothing here", "invoice", &settings(QueryMode::Exact)).is_none());
    }

    #[test]
    fn exact_mode_matches_phrase_not_words() {
        assert!(evaluate(
            "a.txt",
            "net revenue and gross",
            "gross revenue",
            &settings(QueryMode::Exact)
        )
        .is_none());
    }

    #[test]
    fn per_word_mode_merges_words_in_text_order() {
        let dm = evaluate(
            "a.txt",
            "gamma alpha beta alpha",
            "alpha gamma",
            &settings(QueryMode::PerWord),
        )
        .unwrap();
        let offsets: Vec<usize> = dm.matches.iter().map(|m| m.match_offset).collect();
        assert_eq!(offsets, vec![0, 6, 17]);
    }

    #[test]
    fn per_word_mode_includes_on_any_word_and_excludes_on_none() {
        let s = settings(QueryMode::PerWord);
        assert!(evaluate("a.txt", "only beta", "alpha beta", &s).is_some());
        assert!(evaluate("a.txt", "only delta", "alpha beta", &s).is_none());
    }

    #[test]
    fn per_word_mode_ignores_repeated_words_and_respects_cap() {
        let mut s = settings(QueryMode::PerWord);
        s.max_matches_per_file = 3;
        let dm = evaluate("a.txt", "x y x y x y x y", "x X y", &s).unwrap();
        assert_eq!(dm.match_count(), 3);
        let offsets: Vec<usize> = dm.matches.iter().map(|m| m.match_offset).collect();
        assert_eq!(offsets, vec![0, 2, 4]);
    }

    #[test]
    fn boolean_mode_yields_document_without_positions() {
        let dm = evaluate(
            "a.txt",
            "cats and dogs",
            "cat and dog",
            &settings(QueryMode::Boolean),
        )
        .unwrap();
        assert!(dm.matches.is_empty());
        assert!(evaluate("a.txt", "cats", "cat and dog", &settings(QueryMode::Boolean)).is_none());
    }

    #[test]
    fn empty_query_or_text_matches_nothing() {
        for mode in [QueryMode::Exact, QueryMode::PerWord, QueryMode::Boolean] {
            assert!(evaluate("a.txt", "text", "   ", &settings(mode)).is_none());
            assert!(evaluate("a.txt", "", "text", &settings(mode)).is_none());
        }
    }
}
