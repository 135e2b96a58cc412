//! Integration tests for the incremental indexing run against SQLite

use async_trait::async_trait;
use ragindex_core::{
    search, BatchConfig, ChunkStore, ChunkingConfig, Database, EmbedPurpose, Embedder,
    HeuristicCounter, IndexEvent, Indexer, IndexerConfig, RagIndexError, Result,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

const SCOPE: &str = "/projects/docs";

/// Deterministic embedder: vectors count a few marker letters
struct MockEmbedder {
    calls: Mutex<Vec<(usize, EmbedPurpose)>>,
    fail_on_call: Option<usize>,
}

impl MockEmbedder {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on_call: None,
        }
    }

    fn failing_on(call: usize) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on_call: Some(call),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

fn vectorize(text: &str) -> Vec<f32> {
    ['a', 'e', 'o', 'z']
        .iter()
        .map(|m| text.chars().filter(|c| c == m).count() as f32 + 0.1)
        .collect()
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed_batch(&self, texts: &[String], purpose: EmbedPurpose) -> Result<Vec<Vec<f32>>> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((texts.len(), purpose));
        if Some(calls.len()) == self.fail_on_call {
            return Err(RagIndexError::Embedding(
                "Embedding service error (HTTP 503): unavailable".to_string(),
            ));
        }
        Ok(texts.iter().map(|t| vectorize(t)).collect())
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

fn config(max_items: usize) -> IndexerConfig {
    IndexerConfig {
        chunking: ChunkingConfig::new(5, 10, 20),
        batching: BatchConfig {
            max_items_per_batch: max_items,
            max_tokens_per_batch: 1000,
            inter_batch_cooldown_secs: 0,
        },
    }
}

fn setup() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.initialize().unwrap();
    db
}

/// Two paragraphs of six words: two chunks with bounds (5, 10, 20)
fn two_chunk_doc(tag: &str) -> String {
    format!(
        "{t} alpha beta gamma delta epsilon\n\n{t} zeta eta theta iota kappa",
        t = tag
    )
}

fn docs(entries: &[(&str, String)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(p, c)| (p.to_string(), c.clone()))
        .collect()
}

#[tokio::test]
async fn test_first_run_embeds_and_records_hashes() {
    let db = setup();
    let embedder = MockEmbedder::new();
    let indexer = Indexer::new(config(128), Arc::new(HeuristicCounter), &embedder, &db).unwrap();

    let documents = docs(&[
        ("a.md", two_chunk_doc("first")),
        ("b.md", two_chunk_doc("second")),
        ("tiny.md", "Short.".to_string()),
    ]);
    let report = indexer.run(SCOPE, &documents, None).await.unwrap();

    assert_eq!(report.embedded, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.total_chunks, 4);
    assert_eq!(report.batches, 1);
    assert_eq!(report.stored, vec!["a.md", "b.md"]);

    let hashes = db.recorded_hashes(SCOPE).unwrap();
    assert_eq!(hashes.len(), 2);
    assert_eq!(hashes["a.md"], ragindex_core::hash_content(&documents["a.md"]));
    assert!(!hashes.contains_key("tiny.md"));

    let stored = db.get_document_chunks(SCOPE, "a.md").unwrap();
    let indices: Vec<_> = stored.iter().map(|m| m.chunk_index).collect();
    assert_eq!(indices, vec![0, 1]);
}

#[tokio::test]
async fn test_second_run_skips_unchanged_documents() {
    let db = setup();
    let embedder = MockEmbedder::new();
    let indexer = Indexer::new(config(128), Arc::new(HeuristicCounter), &embedder, &db).unwrap();
    let documents = docs(&[("a.md", two_chunk_doc("one")), ("b.md", two_chunk_doc("two"))]);

    indexer.run(SCOPE, &documents, None).await.unwrap();
    assert_eq!(embedder.call_count(), 1);

    let report = indexer.run(SCOPE, &documents, None).await.unwrap();
    assert_eq!(report.unchanged, 2);
    assert!(report.is_noop());
    assert_eq!(embedder.call_count(), 1);
}

#[tokio::test]
async fn test_changed_document_replaces_old_records() {
    let db = setup();
    let embedder = MockEmbedder::new();
    let indexer = Indexer::new(config(128), Arc::new(HeuristicCounter), &embedder, &db).unwrap();

    let three_chunks = format!("{}\n\nlambda mu nu xi omicron pi", two_chunk_doc("v1"));
    indexer
        .run(SCOPE, &docs(&[("a.md", three_chunks)]), None)
        .await
        .unwrap();
    assert_eq!(db.get_document_chunks(SCOPE, "a.md").unwrap().len(), 3);

    let events = Mutex::new(Vec::new());
    let progress = |e: &IndexEvent| events.lock().unwrap().push(e.clone());
    let updated = docs(&[("a.md", two_chunk_doc("v2"))]);
    let report = indexer.run(SCOPE, &updated, Some(&progress)).await.unwrap();

    assert_eq!(report.reembedded, 1);
    assert_eq!(report.deleted_records, 3);
    let stored = db.get_document_chunks(SCOPE, "a.md").unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored
        .iter()
        .all(|m| m.file_hash == ragindex_core::hash_content(&updated["a.md"])));

    // Deletion is confirmed before anything is stored
    let events = events.into_inner().unwrap();
    let deleted_at = events
        .iter()
        .position(|e| matches!(e, IndexEvent::StaleRecordsDeleted { deleted: 3, .. }))
        .unwrap();
    let stored_at = events
        .iter()
        .position(|e| matches!(e, IndexEvent::DocumentStored { .. }))
        .unwrap();
    assert!(deleted_at < stored_at);
}

#[tokio::test]
async fn test_failed_batch_keeps_completed_documents_only() {
    let db = setup();
    // Batches of three: [a0 a1 b0] [b1 c0 c1]; the second request fails
    let embedder = MockEmbedder::failing_on(2);
    let indexer = Indexer::new(config(3), Arc::new(HeuristicCounter), &embedder, &db).unwrap();
    let documents = docs(&[
        ("a.md", two_chunk_doc("a")),
        ("b.md", two_chunk_doc("b")),
        ("c.md", two_chunk_doc("c")),
    ]);

    let events = Mutex::new(Vec::new());
    let progress = |e: &IndexEvent| events.lock().unwrap().push(e.clone());
    let err = indexer
        .run(SCOPE, &documents, Some(&progress))
        .await
        .unwrap_err();

    assert!(matches!(err, RagIndexError::RunAborted { .. }));
    assert_eq!(err.completed_documents(), &["a.md"]);
    assert!(err.to_string().contains("HTTP 503"));
    assert!(events
        .into_inner()
        .unwrap()
        .iter()
        .any(|e| matches!(e, IndexEvent::Failed { completed, .. } if completed == &["a.md"])));

    // b.md had one of two chunks embedded and must not be partially stored
    let hashes = db.recorded_hashes(SCOPE).unwrap();
    assert_eq!(hashes.keys().collect::<Vec<_>>(), vec!["a.md"]);
    assert!(db.get_document_chunks(SCOPE, "b.md").unwrap().is_empty());

    // The next run retries everything that was not stored
    let embedder = MockEmbedder::new();
    let indexer = Indexer::new(config(3), Arc::new(HeuristicCounter), &embedder, &db).unwrap();
    let report = indexer.run(SCOPE, &documents, None).await.unwrap();
    assert_eq!(report.unchanged, 1);
    assert_eq!(report.embedded, 2);
    assert_eq!(db.recorded_hashes(SCOPE).unwrap().len(), 3);
}

#[tokio::test]
async fn test_vanished_documents_are_left_in_place() {
    let db = setup();
    let embedder = MockEmbedder::new();
    let indexer = Indexer::new(config(128), Arc::new(HeuristicCounter), &embedder, &db).unwrap();

    indexer
        .run(
            SCOPE,
            &docs(&[("a.md", two_chunk_doc("a")), ("gone.md", two_chunk_doc("g"))]),
            None,
        )
        .await
        .unwrap();
    let report = indexer
        .run(SCOPE, &docs(&[("a.md", two_chunk_doc("a"))]), None)
        .await
        .unwrap();

    assert_eq!(report.unchanged, 1);
    assert!(db.recorded_hashes(SCOPE).unwrap().contains_key("gone.md"));
    assert_eq!(db.delete_chunks(SCOPE, "gone.md").unwrap(), 2);
}

#[tokio::test]
async fn test_search_restricted_to_active_paths() {
    let db = setup();
    let embedder = MockEmbedder::new();
    let indexer = Indexer::new(config(128), Arc::new(HeuristicCounter), &embedder, &db).unwrap();
    let documents = docs(&[
        ("zoo.md", "zoo zebra zigzag zone zero zap\n\nbuzz fizz jazz quiz whiz fuzz".to_string()),
        ("opera.md", "opera ovation oboe octopus orbit onion\n\nsolo tornado motto photo".to_string()),
    ]);
    indexer.run(SCOPE, &documents, None).await.unwrap();

    let active: Vec<String> = documents.keys().cloned().collect();
    let results = search(&db, &embedder, SCOPE, "zzz zebra", &active, 2)
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].file_path(), "zoo.md");
    assert!(results[0].score >= results[1].score);
    assert_eq!(
        embedder.calls.lock().unwrap().last(),
        Some(&(1, EmbedPurpose::Query))
    );

    let only_opera = vec!["opera.md".to_string()];
    let results = search(&db, &embedder, SCOPE, "zzz", &only_opera, 5)
        .await
        .unwrap();
    assert!(results.iter().all(|r| r.file_path() == "opera.md"));

    assert!(search(&db, &embedder, SCOPE, "zzz", &[], 5)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_changed_document_without_chunks_loses_old_records() {
    let db = setup();
    let embedder = MockEmbedder::new();
    let indexer = Indexer::new(config(128), Arc::new(HeuristicCounter), &embedder, &db).unwrap();

    indexer
        .run(SCOPE, &docs(&[("a.md", two_chunk_doc("v1"))]), None)
        .await
        .unwrap();
    assert_eq!(db.get_document_chunks(SCOPE, "a.md").unwrap().len(), 2);

    let report = indexer
        .run(SCOPE, &docs(&[("a.md", "  \n\n\t\n".to_string())]), None)
        .await
        .unwrap();

    assert_eq!(report.deleted_records, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.reembedded, 0);
    assert!(db.get_document_chunks(SCOPE, "a.md").unwrap().is_empty());
    assert!(!db.recorded_hashes(SCOPE).unwrap().contains_key("a.md"));
    assert_eq!(embedder.call_count(), 1);
}

#[tokio::test]
async fn test_document_shrunk_below_target_min_is_still_indexed() {
    let db = setup();
    let embedder = MockEmbedder::new();
    let indexer = Indexer::new(config(128), Arc::new(HeuristicCounter), &embedder, &db).unwrap();

    indexer
        .run(SCOPE, &docs(&[("a.md", two_chunk_doc("v1"))]), None)
        .await
        .unwrap();

    let shrunk = docs(&[("a.md", "# Notes\n\nkeep it".to_string())]);
    let report = indexer.run(SCOPE, &shrunk, None).await.unwrap();

    assert_eq!(report.reembedded, 1);
    assert_eq!(report.skipped, 0);
    let stored = db.get_document_chunks(SCOPE, "a.md").unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].file_hash, ragindex_core::hash_content(&shrunk["a.md"]));

    let report = indexer.run(SCOPE, &shrunk, None).await.unwrap();
    assert!(report.is_noop());
}
