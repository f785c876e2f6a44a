//! Local read-only hadith store backed by SQLite, with an LRU cache of
//! fully-loaded collections
//!
//! The cache uses load-or-reuse semantics: lookups happen under the
//! lock, the SQLite read happens outside it, and racing loaders for the
//! same collection simply insert the same immutable snapshot.

use crate::error::SearchError;
use crate::model::{Chapter, Collection, Hadith};
use crate::normalize::normalize_arabic;
use lru::LruCache;
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Default number of collections kept in memory. There are only nine
/// canonical compilations, so in practice nothing is ever evicted.
const DEFAULT_CACHE_CAPACITY: usize = 16;

/// One collection's full record set, loaded as an immutable snapshot.
pub struct CollectionRecords {
    pub collection: Collection,
    pub chapters: Vec<Chapter>,
    pub hadiths: Vec<Hadith>,
    by_id: HashMap<i64, usize>,
    by_number: HashMap<i64, usize>,
    chapter_names: HashMap<i64, String>,
}

impl CollectionRecords {
    fn new(collection: Collection, chapters: Vec<Chapter>, hadiths: Vec<Hadith>) -> Self {
        let by_id = hadiths
            .iter()
            .enumerate()
            .map(|(idx, h)| (h.id, idx))
            .collect();
        // First occurrence wins when numbers repeat across chapters
        let mut by_number = HashMap::new();
        for (idx, h) in hadiths.iter().enumerate() {
            if let Some(n) = h.id_in_book {
                by_number.entry(n).or_insert(idx);
            }
        }
        let chapter_names = chapters
            .iter()
            .filter_map(|c| c.english_name.clone().map(|name| (c.id, name)))
            .collect();
        Self {
            collection,
            chapters,
            hadiths,
            by_id,
            by_number,
            chapter_names,
        }
    }

    /// Look up a hadith by its internal row id.
    pub fn hadith_by_id(&self, id: i64) -> Option<&Hadith> {
        self.by_id.get(&id).map(|&idx| &self.hadiths[idx])
    }

    /// Look up a hadith by its user-facing number-in-book.
    pub fn hadith_by_number(&self, number: i64) -> Option<&Hadith> {
        self.by_number.get(&number).map(|&idx| &self.hadiths[idx])
    }

    pub fn chapter_name(&self, chapter_id: i64) -> Option<&str> {
        self.chapter_names.get(&chapter_id).map(String::as_str)
    }
}

pub struct HadithStore {
    db_path: PathBuf,
    cache: Mutex<LruCache<String, Arc<CollectionRecords>>>,
}

impl HadithStore {
    pub fn new(db_path: PathBuf) -> Self {
        Self::with_capacity(db_path, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(db_path: PathBuf, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or_else(|| NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap());
        Self {
            db_path,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Fetch a collection's records, loading from SQLite on first use.
    pub fn get_or_load(&self, collection_id: &str) -> Result<Arc<CollectionRecords>, SearchError> {
        {
            let mut cache = self.cache.lock().unwrap();
            if let Some(records) = cache.get(collection_id) {
                return Ok(Arc::clone(records));
            }
        }

        let records = Arc::new(self.load_collection(collection_id)?);
        {
            let mut cache = self.cache.lock().unwrap();
            cache.put(collection_id.to_string(), Arc::clone(&records));
        }
        Ok(records)
    }

    /// Canonical ids of all collections in the store, in source order.
    pub fn list_collection_ids(&self) -> Result<Vec<String>, SearchError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT id FROM collections ORDER BY rowid")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    pub fn clear(&self) {
        self.cache.lock().unwrap().clear();
    }

    pub fn cache_stats(&self) -> (usize, usize) {
        let cache = self.cache.lock().unwrap();
        (cache.len(), cache.cap().get())
    }

    fn connect(&self) -> Result<Connection, SearchError> {
        Connection::open(&self.db_path).map_err(|e| {
            SearchError::Database(format!(
                "failed to open hadith db at {:?}: {e}",
                self.db_path
            ))
        })
    }

    fn load_collection(&self, collection_id: &str) -> Result<CollectionRecords, SearchError> {
        let conn = self.connect()?;

        let collection = conn
            .query_row(
                "SELECT id, name, author FROM collections WHERE id = ?1",
                [collection_id],
                |row| {
                    Ok(Collection {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        author: row.get(2)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| {
                SearchError::DataUnavailable(format!("no local collection '{collection_id}'"))
            })?;

        let chapters = conn
            .prepare(
                "SELECT id, collection_id, english_name, arabic_name
                 FROM chapters WHERE collection_id = ?1 ORDER BY id",
            )?
            .query_map([collection_id], |row| {
                Ok(Chapter {
                    id: row.get(0)?,
                    collection_id: row.get(1)?,
                    english_name: row.get(2)?,
                    arabic_name: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        // Older data exports lack the pre-normalized Arabic column; the
        // same pragma probe the settings migration uses tells us which
        // shape we're reading.
        let has_normalized: i64 = conn.query_row(
            "SELECT COUNT(*) FROM pragma_table_info('hadiths')
             WHERE name = 'arabic_text_normalized'",
            [],
            |row| row.get(0),
        )?;

        let sql = if has_normalized > 0 {
            "SELECT id, collection_id, chapter_id, id_in_book,
                    english_narrator, english_text, arabic_text, arabic_text_normalized
             FROM hadiths WHERE collection_id = ?1 ORDER BY chapter_id, id"
        } else {
            "SELECT id, collection_id, chapter_id, id_in_book,
                    english_narrator, english_text, arabic_text, NULL
             FROM hadiths WHERE collection_id = ?1 ORDER BY chapter_id, id"
        };

        let hadiths = conn
            .prepare(sql)?
            .query_map([collection_id], |row| {
                let arabic_text: Option<String> = row.get(6)?;
                let stored_normalized: Option<String> = row.get(7)?;
                let arabic_text_normalized = stored_normalized
                    .or_else(|| arabic_text.as_deref().map(normalize_arabic));
                Ok(Hadith {
                    id: row.get(0)?,
                    collection_id: row.get(1)?,
                    chapter_id: row.get(2)?,
                    id_in_book: row.get(3)?,
                    narrator: row.get(4)?,
                    text: row.get(5)?,
                    arabic_text,
                    arabic_text_normalized,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CollectionRecords::new(collection, chapters, hadiths))
    }
}
