//! Data model: collections, chapters, hadith records, and search hits

use serde::{Deserialize, Serialize};

/// A named compilation of hadith narrations. Read-only at runtime; the
/// canonical `id` (e.g. "bukhari") is the join key used everywhere else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub author: Option<String>,
}

/// A subdivision of a collection. `id` is unique only within its
/// collection; (collection_id, id) identifies a chapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub id: i64,
    pub collection_id: String,
    pub english_name: Option<String>,
    pub arabic_name: Option<String>,
}

/// A single narration record. `id` is the internal row id within the
/// collection; `id_in_book` is the user-facing reference number. External
/// services may return one but not the other, so both are retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hadith {
    pub id: i64,
    pub collection_id: String,
    pub chapter_id: i64,
    pub id_in_book: Option<i64>,
    pub narrator: Option<String>,
    pub text: Option<String>,
    pub arabic_text: Option<String>,
    /// Pre-normalized Arabic body used for matching. Filled from the
    /// store when available, computed on load otherwise.
    pub arabic_text_normalized: Option<String>,
}

/// Where a search should look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum SearchScope {
    All,
    Collection { collection_id: String },
    Chapter { collection_id: String, chapter_id: i64 },
}

impl SearchScope {
    pub fn collection_id(&self) -> Option<&str> {
        match self {
            SearchScope::All => None,
            SearchScope::Collection { collection_id }
            | SearchScope::Chapter { collection_id, .. } => Some(collection_id),
        }
    }
}

/// A candidate match from either search path. Local hits are always
/// complete; remote hits that could not be joined against the local
/// store keep their sparse fields with `complete = false` so consumers
/// can render a partial result instead of dropping it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub hadith_id: i64,
    pub collection_id: String,
    pub collection_name: String,
    pub chapter_id: Option<i64>,
    pub chapter_name: Option<String>,
    pub id_in_book: Option<i64>,
    pub narrator: Option<String>,
    pub text: Option<String>,
    pub arabic_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    pub complete: bool,
}

/// A sparse hit as reported by the remote ranked-retrieval service,
/// after tolerant decoding but before reconciliation and enrichment.
/// The row id is the service's notion of identity and may not match the
/// local row id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteHit {
    pub id: i64,
    pub collection_label: String,
    pub score: f32,
    pub text: Option<String>,
    pub narrator: Option<String>,
    pub chapter_name: Option<String>,
    pub id_in_book: Option<i64>,
}

/// Clean up text for list display: fold newlines, collapse runs of
/// whitespace, cap length with an ellipsis.
pub fn prepare_snippet(text: &str, max_len: usize) -> String {
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.chars().count() > max_len {
        let truncated: String = cleaned.chars().take(max_len).collect();
        format!("{truncated}...")
    } else {
        cleaned
    }
}
