use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::gemini::{model_path, Content, GeminiClient};

#[async_trait]
pub trait Generator: Send + Sync {
    /// Single request/response turn under the given system persona.
    async fn generate(&self, system_instruction: &str, prompt: &str) -> Result<String>;
}

pub struct GeminiGenerator {
    client: GeminiClient,
    model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GeminiGenerator {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model_path(&model.into()),
        }
    }
}

fn candidate_text(response: GenerateContentResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().map(|p| p.text).collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, system_instruction: &str, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            system_instruction: Content::text(system_instruction),
            contents: vec![Content::user(prompt)],
        };

        let response: GenerateContentResponse = self
            .client
            .call(&self.model, "generateContent", &request)
            .await
            .map_err(|e| {
                tracing::error!("Gemini generation failed: {}", e);
                Error::Generation(e.to_string())
            })?;

        candidate_text(response).ok_or_else(|| {
            tracing::error!("Gemini response contained no candidate text");
            Error::Generation("no text in response".to_string())
        })
    }
}
