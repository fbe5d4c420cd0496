pub mod embeddings;
pub mod evaluator;
pub mod generation;
pub mod prompts;
pub mod vector_store;

use std::sync::Arc;

use crate::config::RetrievalSettings;
use crate::error::Result;
use crate::models::QueryAnswer;
use self::embeddings::{Embedder, TaskType};
use self::evaluator::Evaluation;
use self::generation::Generator;
use self::prompts::{build_answer_prompt, ANSWER_SYSTEM_INSTRUCTION};
use self::vector_store::VectorStore;

pub const NOT_FOUND_ANSWER: &str =
    "I could not find any relevant information in the knowledge base.";

/// Query side of the pipeline: embed, retrieve, generate, evaluate.
pub struct RagEngine {
    embeddings: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    generator: Arc<dyn Generator>,
    retrieval: RetrievalSettings,
}

impl RagEngine {
    pub fn new(
        embeddings: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
        generator: Arc<dyn Generator>,
        retrieval: RetrievalSettings,
    ) -> Self {
        Self {
            embeddings,
            vector_store,
            generator,
            retrieval,
        }
    }

    pub async fn query(&self, query: &str) -> Result<QueryAnswer> {
        tracing::info!("Embedding user query...");
        let query_embedding = self
            .embeddings
            .embed_one(query, TaskType::RetrievalQuery)
            .await?;

        tracing::info!("Retrieving top-{} chunks...", self.retrieval.top_k);
        let chunks = self
            .vector_store
            .match_documents(
                &query_embedding,
                self.retrieval.top_k,
                self.retrieval.match_threshold,
            )
            .await?;

        let Some(best) = chunks.first() else {
            tracing::warn!("No relevant chunks found.");
            return Ok(QueryAnswer {
                answer: NOT_FOUND_ANSWER.to_string(),
                context: String::new(),
            });
        };
        tracing::info!(
            "Retrieved {} chunks (best similarity: {:.4}).",
            chunks.len(),
            best.similarity
        );

        let prompt = build_answer_prompt(query, &chunks);
        let context = chunks
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        tracing::info!("Generating answer...");
        let answer = self
            .generator
            .generate(ANSWER_SYSTEM_INSTRUCTION, &prompt)
            .await?;

        Ok(QueryAnswer { answer, context })
    }

    pub async fn evaluate(&self, query: &str, context: &str, answer: &str) -> Result<Evaluation> {
        evaluator::evaluate(self.generator.as_ref(), query, context, answer).await
    }
}
