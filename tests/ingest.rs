mod common;

use std::io::Write;

use documind::config::ChunkingSettings;
use documind::indexer::ingest_file;
use documind::Error;

use common::{FakeEmbedder, FakeStore};

fn text_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("handbook")
        .suffix(".txt")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn ingest_2500_chars_with_defaults_stores_four_chunks() {
    let file = text_file(&"k".repeat(2500));
    let embedder = FakeEmbedder::default();
    let store = FakeStore::default();

    let count = ingest_file(file.path(), &embedder, &store, ChunkingSettings::default(), 100)
        .await
        .unwrap();

    assert_eq!(count, 4);
    assert_eq!(*embedder.batch_calls.lock().unwrap(), vec![4]);

    let inserts = store.inserts.lock().unwrap();
    assert_eq!(inserts.len(), 1);
    let rows = &inserts[0];
    assert_eq!(rows.len(), 4);

    let base_name = file.path().file_name().unwrap().to_string_lossy().to_string();
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.metadata.chunk_index, i);
        assert_eq!(row.metadata.source, base_name);
        assert_eq!(row.embedding[0], row.content.len() as f32);
    }
}

#[tokio::test]
async fn ingest_batches_embeddings() {
    let file = text_file(&"m".repeat(2500));
    let embedder = FakeEmbedder::default();
    let store = FakeStore::default();
    let chunking = ChunkingSettings {
        chunk_size: 10,
        chunk_overlap: 0,
    };

    let count = ingest_file(file.path(), &embedder, &store, chunking, 100).await.unwrap();

    assert_eq!(count, 250);
    assert_eq!(*embedder.batch_calls.lock().unwrap(), vec![100, 100, 50]);
    assert_eq!(store.inserts.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn ingest_empty_file_makes_no_calls() {
    let file = text_file("   \n\n  ");
    let embedder = FakeEmbedder::default();
    let store = FakeStore::default();

    let count = ingest_file(file.path(), &embedder, &store, ChunkingSettings::default(), 100)
        .await
        .unwrap();

    assert_eq!(count, 0);
    assert!(embedder.batch_calls.lock().unwrap().is_empty());
    assert!(store.inserts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn ingest_missing_file_is_not_found() {
    let embedder = FakeEmbedder::default();
    let store = FakeStore::default();

    let err = ingest_file(
        std::path::Path::new("/no/such/document.txt"),
        &embedder,
        &store,
        ChunkingSettings::default(),
        100,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::NotFound(_)));
    assert!(store.inserts.lock().unwrap().is_empty());
}
