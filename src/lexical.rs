//! Local lexical search: a whole-word, order-preserving scan over the
//! loaded collections
//!
//! This is a filter, not ranked retrieval: hits come back in source
//! order (collection, then chapter, then in-book order) with no scoring.

use crate::error::SearchError;
use crate::model::{Hadith, SearchHit, SearchScope};
use crate::normalize::{escape_for_match, is_arabic_text, normalize_arabic};
use crate::session::SearchTicket;
use crate::store::{CollectionRecords, HadithStore};
use regex::{Regex, RegexBuilder};
use std::sync::Arc;

/// Defensive cap applied before the query is embedded in a pattern.
const MAX_QUERY_CHARS: usize = 256;

#[derive(Clone)]
pub struct LexicalEngine {
    store: Arc<HadithStore>,
}

impl LexicalEngine {
    pub fn new(store: Arc<HadithStore>) -> Self {
        Self { store }
    }

    /// Scan every hadith within scope for a whole-word match of the
    /// query against the normalized Arabic text, the translated text,
    /// or the narrator attribution.
    ///
    /// A blank query is a no-op. When a ticket is supplied the scan
    /// stops between collections once a newer invocation supersedes it;
    /// whatever it returns then fails the session commit anyway.
    pub fn search(
        &self,
        query: &str,
        scope: &SearchScope,
        ticket: Option<&SearchTicket>,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let arabic = is_arabic_text(trimmed);
        let term = if arabic {
            normalize_arabic(trimmed)
        } else {
            trimmed.to_string()
        };
        // A diacritics-only query normalizes to nothing; an empty term
        // would turn the pattern into `\b\b` and match the whole corpus
        if term.is_empty() {
            return Ok(Vec::new());
        }
        let pattern = build_word_pattern(&term, arabic)?;

        let collection_ids = match scope.collection_id() {
            Some(id) => vec![id.to_string()],
            None => self.store.list_collection_ids()?,
        };
        let scoped = scope.collection_id().is_some();

        let mut hits = Vec::new();
        for collection_id in &collection_ids {
            if ticket.is_some_and(SearchTicket::is_stale) {
                tracing::debug!(%collection_id, "abandoning superseded scan");
                break;
            }

            let records = match self.store.get_or_load(collection_id) {
                Ok(records) => records,
                Err(e) if !scoped => {
                    tracing::warn!(%collection_id, error = %e, "skipping unreadable collection");
                    continue;
                }
                Err(e) => return Err(e),
            };

            for hadith in &records.hadiths {
                if let SearchScope::Chapter { chapter_id, .. } = scope {
                    if hadith.chapter_id != *chapter_id {
                        continue;
                    }
                }
                if hadith_matches(&pattern, hadith) {
                    hits.push(to_hit(&records, hadith));
                }
            }
        }

        Ok(hits)
    }
}

/// Build a whole-word pattern for a non-empty comparison term; only
/// non-Arabic terms match case-insensitively.
fn build_word_pattern(term: &str, arabic: bool) -> Result<Regex, SearchError> {
    let capped: String = term.chars().take(MAX_QUERY_CHARS).collect();
    let pattern = format!(r"\b{}\b", escape_for_match(&capped));
    RegexBuilder::new(&pattern)
        .case_insensitive(!arabic)
        .build()
        .map_err(|e| SearchError::Pattern(format!("unusable search pattern: {e}")))
}

fn hadith_matches(pattern: &Regex, hadith: &Hadith) -> bool {
    hadith
        .arabic_text_normalized
        .as_deref()
        .is_some_and(|t| pattern.is_match(t))
        || hadith.text.as_deref().is_some_and(|t| pattern.is_match(t))
        || hadith
            .narrator
            .as_deref()
            .is_some_and(|t| pattern.is_match(t))
}

fn to_hit(records: &CollectionRecords, hadith: &Hadith) -> SearchHit {
    SearchHit {
        hadith_id: hadith.id,
        collection_id: records.collection.id.clone(),
        collection_name: records.collection.name.clone(),
        chapter_id: Some(hadith.chapter_id),
        chapter_name: records.chapter_name(hadith.chapter_id).map(str::to_string),
        id_in_book: hadith.id_in_book,
        narrator: hadith.narrator.clone(),
        text: hadith.text.clone(),
        arabic_text: hadith.arabic_text.clone(),
        score: None,
        complete: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testutil::seed_fixture;

    fn engine() -> (tempfile::TempDir, LexicalEngine) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hadith_data.db");
        seed_fixture(&path);
        let store = Arc::new(HadithStore::new(path));
        (dir, LexicalEngine::new(store))
    }

    #[test]
    fn blank_query_is_a_no_op() {
        let (_dir, engine) = engine();
        assert!(engine.search("", &SearchScope::All, None).unwrap().is_empty());
        assert!(engine.search("   ", &SearchScope::All, None).unwrap().is_empty());
    }

    #[test]
    fn diacritics_only_query_matches_nothing() {
        let (_dir, engine) = engine();
        // Tashkeel and tatweel normalize away entirely; the scan must
        // treat the empty term as a no-op, not match every record
        let hits = engine
            .search("\u{064B}\u{064E}\u{0640}", &SearchScope::All, None)
            .unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn english_match_is_case_insensitive() {
        let (_dir, engine) = engine();
        let hits = engine.search("Allah", &SearchScope::All, None).unwrap();
        // "ALLAH's Messenger" and "near to Allah."
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().any(|h| h.collection_id == "bukhari"));
        assert!(hits.iter().any(|h| h.collection_id == "muslim"));
    }

    #[test]
    fn narrator_field_is_searched() {
        let (_dir, engine) = engine();
        let hits = engine.search("huraira", &SearchScope::All, None).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits
            .iter()
            .all(|h| h.narrator.as_deref().is_some_and(|n| n.contains("Huraira"))));
    }

    #[test]
    fn arabic_whole_word_excludes_substring_of_longer_word() {
        let (_dir, engine) = engine();
        // سجد appears whole in one record; مسجد alone must not match
        let hits = engine.search("سجد", &SearchScope::All, None).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].collection_id, "muslim");
        assert_eq!(hits[0].id_in_book, Some(100));
    }

    #[test]
    fn arabic_query_matches_despite_diacritic_differences() {
        let (_dir, engine) = engine();
        let hits = engine
            .search("الأَعْمَال", &SearchScope::All, None)
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].hadith_id, 1);
        assert_eq!(hits[0].chapter_name.as_deref(), Some("Revelation"));
    }

    #[test]
    fn scope_restricts_to_one_collection() {
        let (_dir, engine) = engine();
        let scope = SearchScope::Collection {
            collection_id: "bukhari".into(),
        };
        let hits = engine.search("Allah", &scope, None).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits.iter().all(|h| h.collection_id == "bukhari"));
    }

    #[test]
    fn scope_restricts_to_one_chapter() {
        let (_dir, engine) = engine();
        let scope = SearchScope::Chapter {
            collection_id: "bukhari".into(),
            chapter_id: 1,
        };
        let hits = engine.search("Narrated", &scope, None).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.chapter_id == Some(1)));
    }

    #[test]
    fn results_preserve_source_order() {
        let (_dir, engine) = engine();
        let hits = engine.search("Narrated", &SearchScope::All, None).unwrap();
        let ids: Vec<_> = hits
            .iter()
            .map(|h| (h.collection_id.clone(), h.hadith_id))
            .collect();
        assert_eq!(
            ids,
            vec![
                ("bukhari".to_string(), 1),
                ("bukhari".to_string(), 2),
                ("bukhari".to_string(), 3),
                ("muslim".to_string(), 1),
                ("muslim".to_string(), 2),
            ]
        );
    }

    #[test]
    fn metacharacters_in_query_are_literal() {
        let (_dir, engine) = engine();
        let hits = engine.search(".*", &SearchScope::All, None).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn unknown_scoped_collection_propagates() {
        let (_dir, engine) = engine();
        let scope = SearchScope::Collection {
            collection_id: "nope".into(),
        };
        assert!(matches!(
            engine.search("Allah", &scope, None),
            Err(SearchError::DataUnavailable(_))
        ));
    }
}
