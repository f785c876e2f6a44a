//! Client for the remote semantic search service
//!
//! The service's response shape has drifted across deployments (string
//! or numeric ids, `collection` vs `title` labels, `score` vs
//! `retrieval_score`), so all tolerant decoding lives here at the
//! boundary: nothing loosely typed flows past this module.

use crate::error::SearchError;
use crate::model::RemoteHit;
use crate::normalize::{is_arabic_text, normalize_arabic};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "http://localhost:8000/search";
const DEFAULT_TOP_K: usize = 100;
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// How much of an error body to carry into the error message.
const ERROR_BODY_CAP: usize = 512;

#[derive(Debug, Clone)]
pub struct RemoteSearchConfig {
    pub endpoint: String,
    pub top_k: usize,
    pub timeout: Duration,
    /// Additional attempts after the first; retries stay explicit and
    /// off by default.
    pub retries: u32,
}

impl Default for RemoteSearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            top_k: DEFAULT_TOP_K,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retries: 0,
        }
    }
}

impl RemoteSearchConfig {
    /// Read overrides from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("MUHADDITH_SEARCH_URL") {
            config.endpoint = url;
        }
        if let Ok(k) = std::env::var("MUHADDITH_SEARCH_TOP_K") {
            if let Ok(k) = k.parse() {
                config.top_k = k;
            }
        }
        if let Ok(retries) = std::env::var("MUHADDITH_SEARCH_RETRIES") {
            if let Ok(retries) = retries.parse() {
                config.retries = retries;
            }
        }
        config
    }
}

#[derive(Serialize)]
struct SearchRequestBody<'a> {
    query: &'a str,
    top_k: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
}

#[derive(Deserialize)]
struct RawSearchResponse {
    results: Vec<RawHit>,
}

#[derive(Deserialize)]
struct RawHit {
    id: serde_json::Value,
    #[serde(default)]
    collection: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, alias = "retrieval_score")]
    score: f32,
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "idInBook")]
    id_in_book: Option<i64>,
    #[serde(default)]
    english: Option<RawEnglish>,
}

#[derive(Deserialize)]
struct RawEnglish {
    #[serde(default)]
    narrator: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    chapter_title: Option<String>,
}

pub struct RemoteSearchClient {
    http: reqwest::Client,
    config: RemoteSearchConfig,
}

impl RemoteSearchClient {
    pub fn new(config: RemoteSearchConfig) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// Send the query to the ranked-retrieval endpoint and decode the
    /// hits. Arabic queries are normalized before sending, matching the
    /// normalization the service applied at training time.
    pub async fn search(&self, query: &str) -> Result<Vec<RemoteHit>, SearchError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let arabic = is_arabic_text(trimmed);
        let normalized;
        let query_text = if arabic {
            normalized = normalize_arabic(trimmed);
            normalized.as_str()
        } else {
            trimmed
        };
        // Diacritics-only input normalizes to nothing; skip the round trip
        if query_text.is_empty() {
            return Ok(Vec::new());
        }
        let body = SearchRequestBody {
            query: query_text,
            top_k: self.config.top_k,
            language: Some(if arabic { "ar" } else { "en" }),
        };

        let mut attempt = 0;
        loop {
            match self.http.post(&self.config.endpoint).json(&body).send().await {
                Ok(response) => {
                    let status = response.status();
                    let text = response.text().await?;
                    return decode_response(status, &text);
                }
                Err(e) if attempt < self.config.retries => {
                    attempt += 1;
                    tracing::warn!(attempt, error = %e, "search request failed, retrying");
                }
                Err(e) => return Err(SearchError::Network(e.to_string())),
            }
        }
    }
}

/// Turn a raw response into hits. Non-success statuses and unparseable
/// bodies are service errors so callers can tell "search broken" apart
/// from "zero matches". Hits with unusable ids are skipped, and hits are
/// de-duplicated by id since the service has been seen repeating rows.
fn decode_response(status: StatusCode, body: &str) -> Result<Vec<RemoteHit>, SearchError> {
    if !status.is_success() {
        return Err(SearchError::Service {
            status: status.as_u16(),
            message: truncate(body, ERROR_BODY_CAP),
        });
    }

    let raw: RawSearchResponse = serde_json::from_str(body).map_err(|e| SearchError::Service {
        status: status.as_u16(),
        message: format!("unparseable response body: {e}"),
    })?;

    let mut seen: HashSet<i64> = HashSet::new();
    let mut hits = Vec::with_capacity(raw.results.len());
    for item in raw.results {
        let id = match parse_id(&item.id) {
            Some(id) => id,
            None => {
                tracing::warn!(id = %item.id, "skipping hit with unparseable id");
                continue;
            }
        };
        if !seen.insert(id) {
            continue;
        }
        let english = item.english.unwrap_or(RawEnglish {
            narrator: None,
            text: None,
            chapter_title: None,
        });
        hits.push(RemoteHit {
            id,
            collection_label: item.collection.or(item.title).unwrap_or_default(),
            score: item.score,
            text: item.text.or(english.text),
            narrator: english.narrator,
            chapter_name: english.chapter_title,
            id_in_book: item.id_in_book,
        });
    }
    Ok(hits)
}

fn parse_id(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect()
    } else {
        text.to_string()
    }
}
