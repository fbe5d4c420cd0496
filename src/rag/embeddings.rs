use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::gemini::{model_path, Content, GeminiClient};

/// The embedding model is asymmetric: stored chunks and search queries are
/// embedded under different task tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    RetrievalDocument,
    RetrievalQuery,
}

#[async_trait]
pub trait Embedder: Send + Sync {
    /// One request for all of `texts`; vectors come back in input order.
    async fn embed_batch(&self, texts: &[String], task: TaskType) -> Result<Vec<Vec<f32>>>;

    async fn embed_one(&self, text: &str, task: TaskType) -> Result<Vec<f32>>;
}

/// Embed document chunks `batch_size` texts per request, sequentially.
pub async fn embed_documents(
    embedder: &dyn Embedder,
    texts: &[String],
    batch_size: usize,
) -> Result<Vec<Vec<f32>>> {
    let mut embeddings = Vec::with_capacity(texts.len());

    for (batch_no, batch) in texts.chunks(batch_size.max(1)).enumerate() {
        let offset = batch_no * batch_size.max(1);
        let vectors = embedder
            .embed_batch(batch, TaskType::RetrievalDocument)
            .await
            .map_err(|e| {
                tracing::error!("Embedding API call failed for batch starting at index {}: {}", offset, e);
                e
            })?;

        if vectors.len() != batch.len() {
            return Err(Error::Embedding(format!(
                "batch starting at index {} returned {} embeddings for {} texts",
                offset,
                vectors.len(),
                batch.len()
            )));
        }
        embeddings.extend(vectors);
    }

    Ok(embeddings)
}

pub struct GeminiEmbedder {
    client: GeminiClient,
    model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content,
    task_type: TaskType,
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

impl GeminiEmbedder {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model_path(&model.into()),
        }
    }

    fn request<'a>(&'a self, text: &str, task: TaskType) -> EmbedContentRequest<'a> {
        EmbedContentRequest {
            model: &self.model,
            content: Content::text(text),
            task_type: task,
        }
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    async fn embed_batch(&self, texts: &[String], task: TaskType) -> Result<Vec<Vec<f32>>> {
        let body = BatchEmbedRequest {
            requests: texts.iter().map(|t| self.request(t, task)).collect(),
        };

        let response: BatchEmbedResponse = self
            .client
            .call(&self.model, "batchEmbedContents", &body)
            .await
            .map_err(|e| Error::Embedding(e.to_string()))?;

        Ok(response.embeddings.into_iter().map(|e| e.values).collect())
    }

    async fn embed_one(&self, text: &str, task: TaskType) -> Result<Vec<f32>> {
        let body = self.request(text, task);

        let response: EmbedContentResponse = self
            .client
            .call(&self.model, "embedContent", &body)
            .await
            .map_err(|e| {
                tracing::error!("Failed to embed query: {}", e);
                Error::Embedding(e.to_string())
            })?;

        if response.embedding.values.is_empty() {
            return Err(Error::Embedding("embedding response was empty".to_string()));
        }
        Ok(response.embedding.values)
    }
}
