//! Facade over the two search paths
//!
//! One invocation is one unit of work: normalize, then either the local
//! whole-word scan or the remote call plus enrichment, then commit into
//! the shared session. The local scan and the enrichment join both run
//! under `spawn_blocking` so a large store never stalls the caller's
//! interactive thread.

use crate::enrich::Enricher;
use crate::error::SearchError;
use crate::lexical::LexicalEngine;
use crate::model::{SearchHit, SearchScope};
use crate::reconcile::AliasTable;
use crate::remote::{RemoteSearchClient, RemoteSearchConfig};
use crate::session::SearchSession;
use crate::store::HadithStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// User-toggled search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Lexical,
    Semantic,
}

pub struct HybridSearch {
    lexical: LexicalEngine,
    remote: RemoteSearchClient,
    enricher: Enricher,
    session: SearchSession,
}

impl HybridSearch {
    pub fn new(store: Arc<HadithStore>, config: RemoteSearchConfig) -> Result<Self, SearchError> {
        Self::with_aliases(store, config, AliasTable::default())
    }

    pub fn with_aliases(
        store: Arc<HadithStore>,
        config: RemoteSearchConfig,
        aliases: AliasTable,
    ) -> Result<Self, SearchError> {
        Ok(Self {
            lexical: LexicalEngine::new(Arc::clone(&store)),
            remote: RemoteSearchClient::new(config)?,
            enricher: Enricher::new(store, Arc::new(aliases)),
            session: SearchSession::new(),
        })
    }

    /// Run one search invocation. Results are returned to the caller in
    /// either case; they only become the session's snapshot if no newer
    /// invocation superseded this one while it ran.
    pub async fn search(
        &self,
        query: &str,
        scope: SearchScope,
        mode: SearchMode,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            // Trivial UI races submit blank queries; not worth a round trip
            return Ok(Vec::new());
        }

        let ticket = self.session.begin();
        let results = match mode {
            SearchMode::Lexical => {
                let engine = self.lexical.clone();
                let query = trimmed.to_string();
                let scan_ticket = ticket.clone();
                tokio::task::spawn_blocking(move || {
                    engine.search(&query, &scope, Some(&scan_ticket))
                })
                .await
                .map_err(|e| SearchError::Other(format!("scan task failed: {e}")))??
            }
            SearchMode::Semantic => {
                let hits = self.remote.search(trimmed).await?;
                let enricher = self.enricher.clone();
                tokio::task::spawn_blocking(move || enricher.enrich(&hits))
                    .await
                    .map_err(|e| SearchError::Other(format!("enrichment task failed: {e}")))?
            }
        };

        if !self.session.commit(&ticket, results.clone()) {
            tracing::debug!(epoch = ticket.epoch(), "search superseded before commit");
        }
        Ok(results)
    }

    /// Most recently committed results, for consumers that render from
    /// shared state rather than the direct return value.
    pub fn latest(&self) -> Vec<SearchHit> {
        self.session.latest()
    }
}
