use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::config::SupabaseSettings;
use crate::error::{Error, Result};
use crate::models::{ChunkRecord, RetrievedChunk};

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert every record in a single request.
    async fn insert_chunks(&self, records: &[ChunkRecord]) -> Result<()>;

    /// Rows with similarity at or above `match_threshold`, best first, at most `match_count`.
    async fn match_documents(
        &self,
        query_embedding: &[f32],
        match_count: usize,
        match_threshold: f32,
    ) -> Result<Vec<RetrievedChunk>>;
}

/// Supabase table plus the `match_documents` stored procedure, through PostgREST.
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

#[derive(Debug, Serialize)]
struct MatchDocumentsParams<'a> {
    query_embedding: &'a [f32],
    match_count: usize,
    match_threshold: f32,
}

impl SupabaseStore {
    pub fn new(settings: &SupabaseSettings, client: Client) -> Self {
        Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
            api_key: settings.key.clone(),
            table: settings.table.clone(),
        }
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}/rest/v1/{}", self.base_url, path))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::VectorStore(format!("{} - {}", status, body)))
}

#[async_trait]
impl VectorStore for SupabaseStore {
    async fn insert_chunks(&self, records: &[ChunkRecord]) -> Result<()> {
        let result = async {
            let response = self
                .post(&self.table)
                .header("Prefer", "return=minimal")
                .json(records)
                .send()
                .await
                .map_err(|e| Error::VectorStore(e.to_string()))?;
            check_status(response).await.map(|_| ())
        }
        .await;

        if let Err(ref e) = result {
            tracing::error!("Supabase insert into {} failed: {}", self.table, e);
        }
        result
    }

    async fn match_documents(
        &self,
        query_embedding: &[f32],
        match_count: usize,
        match_threshold: f32,
    ) -> Result<Vec<RetrievedChunk>> {
        let params = MatchDocumentsParams {
            query_embedding,
            match_count,
            match_threshold,
        };

        let result = async {
            let response = self
                .post("rpc/match_documents")
                .json(&params)
                .send()
                .await
                .map_err(|e| Error::VectorStore(e.to_string()))?;
            let rows: Option<Vec<RetrievedChunk>> = check_status(response)
                .await?
                .json()
                .await
                .map_err(|e| Error::VectorStore(format!("failed to decode match_documents rows: {e}")))?;
            Ok::<_, Error>(rows.unwrap_or_default())
        }
        .await;

        match result {
            Ok(mut rows) => {
                sort_by_similarity(&mut rows);
                Ok(rows)
            }
            Err(e) => {
                tracing::error!("Supabase RPC match_documents failed: {}", e);
                Err(e)
            }
        }
    }
}

fn sort_by_similarity(rows: &mut [RetrievedChunk]) {
    rows.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
}
