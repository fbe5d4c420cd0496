use serde::{Deserialize, Deserializer, Serialize};

/// One row of the chunk table, as inserted during ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub content: String,
    pub metadata: ChunkMetadata,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Base name of the ingested file.
    pub source: String,
    pub chunk_index: usize,
}

/// A row returned by the `match_documents` RPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub content: String,
    /// Missing or null similarity decodes as 0.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub similarity: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryAnswer {
    pub answer: String,
    /// Retrieved chunk contents joined by blank lines; empty when nothing matched.
    pub context: String,
}
