//! Muhaddith - Hybrid hadith search core
//!
//! Backend library providing lexical and semantic search over hadith
//! collections: Arabic text normalization, whole-word scanning of the
//! local store, a client for the remote ranked-retrieval service, and
//! the reconciliation/enrichment pipeline that joins remote hits back
//! against the authoritative local records.

pub mod model;
pub mod normalize;
pub mod error;
pub mod store;
pub mod lexical;
pub mod remote;
pub mod reconcile;
pub mod enrich;
pub mod paginate;
pub mod session;
pub mod hybrid;

pub use error::SearchError;
pub use model::{Chapter, Collection, Hadith, RemoteHit, SearchHit, SearchScope};
pub use store::{CollectionRecords, HadithStore};
pub use lexical::LexicalEngine;
pub use remote::{RemoteSearchClient, RemoteSearchConfig};
pub use reconcile::AliasTable;
pub use enrich::Enricher;
pub use paginate::{paginate, PageSlice};
pub use session::{SearchSession, SearchTicket};
pub use hybrid::{HybridSearch, SearchMode};
