#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use documind::models::{ChunkRecord, RetrievedChunk};
use documind::rag::embeddings::{Embedder, TaskType};
use documind::rag::generation::Generator;
use documind::rag::vector_store::VectorStore;
use documind::{Error, Result};

#[derive(Default)]
pub struct FakeEmbedder {
    pub batch_calls: Mutex<Vec<usize>>,
    pub queries: Mutex<Vec<String>>,
    pub fail_queries: bool,
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed_batch(&self, texts: &[String], task: TaskType) -> Result<Vec<Vec<f32>>> {
        assert_eq!(task, TaskType::RetrievalDocument);
        self.batch_calls.lock().unwrap().push(texts.len());
        Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
    }

    async fn embed_one(&self, text: &str, task: TaskType) -> Result<Vec<f32>> {
        assert_eq!(task, TaskType::RetrievalQuery);
        self.queries.lock().unwrap().push(text.to_string());
        if self.fail_queries {
            return Err(Error::Embedding("503 Service Unavailable".to_string()));
        }
        Ok(vec![0.1, 0.2])
    }
}

#[derive(Default)]
pub struct FakeStore {
    pub inserts: Mutex<Vec<Vec<ChunkRecord>>>,
    pub results: Vec<RetrievedChunk>,
    pub match_calls: Mutex<Vec<(usize, f32)>>,
}

impl FakeStore {
    pub fn with_results(contents: &[(&str, f32)]) -> Self {
        Self {
            results: contents
                .iter()
                .map(|(content, similarity)| RetrievedChunk {
                    content: content.to_string(),
                    similarity: *similarity,
                    metadata: None,
                })
                .collect(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl VectorStore for FakeStore {
    async fn insert_chunks(&self, records: &[ChunkRecord]) -> Result<()> {
        self.inserts.lock().unwrap().push(records.to_vec());
        Ok(())
    }

    async fn match_documents(
        &self,
        _query_embedding: &[f32],
        match_count: usize,
        match_threshold: f32,
    ) -> Result<Vec<RetrievedChunk>> {
        self.match_calls.lock().unwrap().push((match_count, match_threshold));
        Ok(self.results.clone())
    }
}

/// Replies are handed out in order; each call records (system, prompt).
#[derive(Default)]
pub struct FakeGenerator {
    pub replies: Mutex<VecDeque<Result<String>>>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl FakeGenerator {
    pub fn replying(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn generate(&self, system_instruction: &str, prompt: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((system_instruction.to_string(), prompt.to_string()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Generation("no reply scripted".to_string())))
    }
}
