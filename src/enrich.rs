//! Enrichment of sparse remote hits against the local store
//!
//! The remote service returns just enough to identify a hadith; display
//! fields come from the local records, which are authoritative over any
//! text fragment the service included. Per-hit failures degrade that hit
//! to a partial result and never abort the batch.

use crate::model::{RemoteHit, SearchHit};
use crate::reconcile::AliasTable;
use crate::store::HadithStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct Enricher {
    store: Arc<HadithStore>,
    aliases: Arc<AliasTable>,
}

impl Enricher {
    pub fn new(store: Arc<HadithStore>, aliases: Arc<AliasTable>) -> Self {
        Self { store, aliases }
    }

    /// Join remote hits against the local store, preserving the
    /// service's relevance order. Lookup order per hit: canonical
    /// collection via the alias table, then row id, then number-in-book
    /// (remote and local row ids are known to diverge).
    pub fn enrich(&self, hits: &[RemoteHit]) -> Vec<SearchHit> {
        hits.iter().map(|hit| self.enrich_one(hit)).collect()
    }

    fn enrich_one(&self, hit: &RemoteHit) -> SearchHit {
        let collection_id = self.aliases.resolve(&hit.collection_label);

        let records = match self.store.get_or_load(&collection_id) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    %collection_id,
                    label = %hit.collection_label,
                    error = %e,
                    "collection not available locally, keeping sparse hit"
                );
                return sparse_hit(hit, collection_id);
            }
        };

        let local = records
            .hadith_by_id(hit.id)
            .or_else(|| hit.id_in_book.and_then(|n| records.hadith_by_number(n)));

        match local {
            Some(hadith) => SearchHit {
                hadith_id: hadith.id,
                collection_id: collection_id.clone(),
                collection_name: records.collection.name.clone(),
                chapter_id: Some(hadith.chapter_id),
                chapter_name: records
                    .chapter_name(hadith.chapter_id)
                    .map(str::to_string)
                    .or_else(|| hit.chapter_name.clone()),
                id_in_book: hadith.id_in_book.or(hit.id_in_book),
                narrator: hadith.narrator.clone(),
                text: hadith.text.clone(),
                arabic_text: hadith.arabic_text.clone(),
                score: Some(hit.score),
                complete: true,
            },
            None => {
                tracing::warn!(
                    %collection_id,
                    remote_id = hit.id,
                    "no local match by row id or number-in-book"
                );
                sparse_hit(hit, collection_id)
            }
        }
    }
}

/// Keep whatever the service supplied so the result can still be shown.
fn sparse_hit(hit: &RemoteHit, collection_id: String) -> SearchHit {
    SearchHit {
        hadith_id: hit.id,
        collection_name: hit.collection_label.clone(),
        collection_id,
        chapter_id: None,
        chapter_name: hit.chapter_name.clone(),
        id_in_book: hit.id_in_book,
        narrator: hit.narrator.clone(),
        text: hit.text.clone(),
        arabic_text: None,
        score: Some(hit.score),
        complete: false,
    }
}
