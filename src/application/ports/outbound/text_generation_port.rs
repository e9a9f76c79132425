//! Text completion port

use anyhow::Result;
use async_trait::async_trait;

/// Sampling parameters forwarded to the text model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: Option<f32>,
}

impl SamplingParams {
    pub fn new(max_tokens: u32, temperature: f32) -> Self {
        Self {
            max_tokens,
            temperature,
            top_p: None,
        }
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }
}

/// Which configured text model a completion should run on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextModel {
    NameGeneration,
    PromptEnhancer,
}

/// A single system + user message exchange
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: TextModel,
    pub system: String,
    pub user: String,
    pub params: SamplingParams,
}

impl CompletionRequest {
    pub fn new(
        model: TextModel,
        system: impl Into<String>,
        user: impl Into<String>,
        params: SamplingParams,
    ) -> Self {
        Self {
            model,
            system: system.into(),
            user: user.into(),
            params,
        }
    }
}

/// Port for text-generation backends
///
/// Implementations return the generated text verbatim. A model that answers
/// without text yields an empty string, not an error; deciding what an
/// empty answer means is left to the calling service.
#[async_trait]
pub trait TextGenerationPort: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}
