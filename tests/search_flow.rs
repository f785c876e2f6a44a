//! End-to-end flow over a temporary SQLite store: lexical scan,
//! remote-hit reconciliation and enrichment, pagination, and the
//! stale-invocation guard.

use muhaddith::{
    paginate, AliasTable, Enricher, HadithStore, LexicalEngine, RemoteHit, SearchScope,
    SearchSession,
};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

fn seed(path: &Path, hadith_count: usize) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE collections (id TEXT PRIMARY KEY, name TEXT NOT NULL, author TEXT);
        CREATE TABLE chapters (
            collection_id TEXT NOT NULL, id INTEGER NOT NULL,
            english_name TEXT, arabic_name TEXT
        );
        CREATE TABLE hadiths (
            id INTEGER NOT NULL, collection_id TEXT NOT NULL,
            chapter_id INTEGER NOT NULL, id_in_book INTEGER,
            english_narrator TEXT, english_text TEXT, arabic_text TEXT
        );
        INSERT INTO collections VALUES ('bukhari', 'Sahih al-Bukhari', 'Imam Bukhari');
        INSERT INTO chapters VALUES ('bukhari', 1, 'Revelation', 'بدء الوحي');
        "#,
    )
    .unwrap();

    let mut stmt = conn
        .prepare("INSERT INTO hadiths VALUES (?1, 'bukhari', 1, ?2, ?3, ?4, ?5)")
        .unwrap();
    for i in 1..=hadith_count as i64 {
        stmt.execute(rusqlite::params![
            i,
            i + 1000,
            format!("Narrated companion {i}"),
            format!("Hadith number {i} mentions charity."),
            "إنما الأعمال بالنيات",
        ])
        .unwrap();
    }
}

fn store_with(hadith_count: usize) -> (tempfile::TempDir, Arc<HadithStore>) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hadith_data.db");
    seed(&path, hadith_count);
    (dir, Arc::new(HadithStore::new(path)))
}

// Note: this fixture omits the arabic_text_normalized column entirely,
// exercising the normalize-on-load fallback for older data exports.
#[test]
fn lexical_scan_then_pagination() {
    let (_dir, store) = store_with(47);
    let engine = LexicalEngine::new(store);

    let hits = engine.search("charity", &SearchScope::All, None).unwrap();
    assert_eq!(hits.len(), 47);

    let first = paginate(&hits, 1, 20);
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.items.len(), 20);
    assert_eq!(first.items[0].hadith_id, 1);

    let clamped = paginate(&hits, 5, 20);
    assert_eq!(clamped.page, 3);
    assert_eq!(clamped.items.len(), 7);
    assert_eq!(clamped.items[0].hadith_id, 41);
}

#[test]
fn arabic_scan_over_store_without_normalized_column() {
    let (_dir, store) = store_with(3);
    let engine = LexicalEngine::new(store);
    // Query with hamza/diacritics differing from stored text
    let hits = engine
        .search("الاعمال", &SearchScope::All, None)
        .unwrap();
    assert_eq!(hits.len(), 3);
}

#[test]
fn remote_hits_enrich_with_fallbacks_and_keep_order() {
    let (_dir, store) = store_with(5);
    let enricher = Enricher::new(store, Arc::new(AliasTable::default()));

    let hits = vec![
        // Joins directly by row id
        RemoteHit {
            id: 2,
            collection_label: "Sahih al-Bukhari".into(),
            score: 0.95,
            text: None,
            narrator: None,
            chapter_name: None,
            id_in_book: None,
        },
        // Row id unknown locally, idInBook resolves
        RemoteHit {
            id: 7777,
            collection_label: "sahih al bukhari".into(),
            score: 0.82,
            text: Some("stale remote fragment".into()),
            narrator: None,
            chapter_name: None,
            id_in_book: Some(1004),
        },
        // Matches nothing; survives as a marked partial result
        RemoteHit {
            id: 8888,
            collection_label: "Some Future Collection".into(),
            score: 0.60,
            text: Some("only what the service sent".into()),
            narrator: Some("Unknown narrator".into()),
            chapter_name: None,
            id_in_book: None,
        },
    ];

    let enriched = enricher.enrich(&hits);
    assert_eq!(enriched.len(), 3);

    assert!(enriched[0].complete);
    assert_eq!(enriched[0].hadith_id, 2);
    assert_eq!(enriched[0].chapter_name.as_deref(), Some("Revelation"));

    assert!(enriched[1].complete);
    assert_eq!(enriched[1].hadith_id, 4);
    // Local text wins over the remote fragment
    assert_eq!(
        enriched[1].text.as_deref(),
        Some("Hadith number 4 mentions charity.")
    );

    assert!(!enriched[2].complete);
    assert_eq!(enriched[2].collection_id, "somefuturecollection");
    assert_eq!(
        enriched[2].text.as_deref(),
        Some("only what the service sent")
    );
    assert_eq!(enriched[2].narrator.as_deref(), Some("Unknown narrator"));

    // Relevance order untouched
    let scores: Vec<_> = enriched.iter().map(|h| h.score.unwrap()).collect();
    assert_eq!(scores, vec![0.95, 0.82, 0.60]);
}

#[test]
fn superseded_invocation_cannot_overwrite_newer_results() {
    let (_dir, store) = store_with(10);
    let engine = LexicalEngine::new(Arc::clone(&store));
    let session = SearchSession::new();

    let slow = session.begin();
    let slow_hits = engine
        .search("charity", &SearchScope::All, Some(&slow))
        .unwrap();

    // User refines the query before the first invocation commits
    let fresh = session.begin();
    let fresh_hits = engine
        .search("companion 3", &SearchScope::All, Some(&fresh))
        .unwrap();
    assert!(session.commit(&fresh, fresh_hits));

    assert!(slow.is_stale());
    assert!(!session.commit(&slow, slow_hits));
    assert_eq!(session.latest().len(), 1);
    assert_eq!(session.latest()[0].hadith_id, 3);
}
