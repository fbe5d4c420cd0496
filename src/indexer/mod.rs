pub mod chunker;
pub mod extractor;

use std::path::Path;

use crate::config::ChunkingSettings;
use crate::error::Result;
use crate::models::{ChunkMetadata, ChunkRecord};
use crate::rag::embeddings::{embed_documents, Embedder};
use crate::rag::vector_store::VectorStore;
use self::chunker::chunk_text;
use self::extractor::extract_text;

/// Load, chunk, embed and store one file. Returns the number of chunks stored.
pub async fn ingest_file(
    path: &Path,
    embeddings: &dyn Embedder,
    vector_store: &dyn VectorStore,
    chunking: ChunkingSettings,
    embed_batch_size: usize,
) -> Result<usize> {
    tracing::info!("Loading file: {}", path.display());
    let text = extract_text(path)?;

    let chunks = chunk_text(&text, chunking.chunk_size, chunking.chunk_overlap);
    tracing::info!("Split into {} chunks.", chunks.len());

    if chunks.is_empty() {
        tracing::warn!("No chunks produced - nothing to ingest.");
        return Ok(0);
    }

    tracing::info!("Generating embeddings...");
    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let vectors = embed_documents(embeddings, &texts, embed_batch_size).await?;

    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let records: Vec<ChunkRecord> = chunks
        .into_iter()
        .zip(vectors)
        .map(|(chunk, embedding)| ChunkRecord {
            content: chunk.text,
            metadata: ChunkMetadata {
                source: source.clone(),
                chunk_index: chunk.chunk_index,
            },
            embedding,
        })
        .collect();

    tracing::info!("Inserting {} chunks into the vector store...", records.len());
    vector_store.insert_chunks(&records).await?;

    tracing::info!("Successfully stored {} chunks.", records.len());
    Ok(records.len())
}
