//! Prompt Enhancer Service - Rewrites terse prompts into detailed diffusion prompts
//!
//! The enhancer composes a system instruction from the style and mood tables,
//! asks the text model for a richer description, then cleans the answer and
//! guarantees it carries quality keywords.

use std::sync::Arc;

use crate::application::ports::outbound::{
    CompletionRequest, SamplingParams, TextGenerationPort, TextModel,
};
use crate::application::services::llm::prompt_builder::{
    build_enhancer_system_prompt, build_enhancer_user_message, finalize_enhanced_prompt,
};
use crate::application::services::retry::RetryPolicy;
use crate::domain::value_objects::ArtDirection;

const ENHANCER_MAX_TOKENS: u32 = 200;
const ENHANCER_TEMPERATURE: f32 = 0.8;

/// Input of a single enhancement
#[derive(Debug, Clone, PartialEq)]
pub struct EnhanceRequest {
    pub prompt: String,
    pub direction: ArtDirection,
    pub custom_instructions: Option<String>,
}

impl EnhanceRequest {
    pub fn new(prompt: impl Into<String>, direction: ArtDirection) -> Self {
        Self {
            prompt: prompt.into(),
            direction,
            custom_instructions: None,
        }
    }

    pub fn with_custom_instructions(mut self, instructions: Option<String>) -> Self {
        self.custom_instructions = instructions;
        self
    }
}

/// Result of an enhancement, with the request metadata echoed back
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedPrompt {
    pub enhanced_prompt: String,
    pub original_prompt: String,
    pub style: String,
    pub mood: String,
    pub word_count: usize,
}

#[derive(Clone)]
pub struct PromptEnhancerService {
    text: Arc<dyn TextGenerationPort>,
    retry: RetryPolicy,
}

impl PromptEnhancerService {
    pub fn new(text: Arc<dyn TextGenerationPort>, retry: RetryPolicy) -> Self {
        Self { text, retry }
    }

    pub async fn enhance(
        &self,
        request: &EnhanceRequest,
    ) -> Result<EnhancedPrompt, PromptEnhancerError> {
        tracing::info!(
            "Enhancing prompt \"{}\" (style: {}, mood: {})",
            request.prompt,
            request.direction.style,
            request.direction.mood
        );

        let completion = CompletionRequest::new(
            TextModel::PromptEnhancer,
            build_enhancer_system_prompt(
                &request.direction,
                request.custom_instructions.as_deref(),
            ),
            build_enhancer_user_message(&request.prompt),
            SamplingParams::new(ENHANCER_MAX_TOKENS, ENHANCER_TEMPERATURE),
        );

        let raw = self
            .retry
            .run("prompt enhancement", || self.text.complete(completion.clone()))
            .await
            .map_err(|e| PromptEnhancerError::LlmError(e.to_string()))?;

        tracing::debug!("Raw enhancer response: {:?}", raw);

        let enhanced_prompt = finalize_enhanced_prompt(&raw).ok_or_else(|| {
            tracing::warn!("Text model returned no enhanced prompt");
            PromptEnhancerError::EmptyResponse
        })?;

        tracing::info!("Enhanced prompt: \"{}\"", enhanced_prompt);

        Ok(EnhancedPrompt {
            word_count: enhanced_prompt.split_whitespace().count(),
            enhanced_prompt,
            original_prompt: request.prompt.clone(),
            style: request.direction.style.clone(),
            mood: request.direction.mood.clone(),
        })
    }
}

/// Errors that can occur while enhancing a prompt
#[derive(Debug, thiserror::Error)]
pub enum PromptEnhancerError {
    #[error("Failed to generate enhanced prompt.")]
    EmptyResponse,
    #[error("LLM error: {0}")]
    LlmError(String),
}
