//! Name Service - Fantasy NPC name generation

use std::sync::Arc;

use crate::application::ports::outbound::{
    CompletionRequest, SamplingParams, TextGenerationPort, TextModel,
};
use crate::application::services::llm::prompt_builder::{build_name_messages, truncate_to_name};
use crate::application::services::retry::RetryPolicy;

const NAME_MAX_TOKENS: u32 = 12;
const NAME_TEMPERATURE: f32 = 1.2;
const NAME_TOP_P: f32 = 0.75;

/// Generates "Firstname Lastname" names for NPCs of a given race and gender
#[derive(Clone)]
pub struct NameService {
    text: Arc<dyn TextGenerationPort>,
    retry: RetryPolicy,
}

impl NameService {
    pub fn new(text: Arc<dyn TextGenerationPort>, retry: RetryPolicy) -> Self {
        Self { text, retry }
    }

    /// Generate a name, truncated to at most two words
    pub async fn generate_name(&self, race: &str, gender: &str) -> Result<String, NameServiceError> {
        tracing::info!("Generating name for a {} {} NPC", gender, race);

        let (system, user) = build_name_messages(race, gender);
        let request = CompletionRequest::new(
            TextModel::NameGeneration,
            system,
            user,
            SamplingParams::new(NAME_MAX_TOKENS, NAME_TEMPERATURE).with_top_p(NAME_TOP_P),
        );

        let raw = self
            .retry
            .run("name generation", || self.text.complete(request.clone()))
            .await
            .map_err(|e| NameServiceError::LlmError(e.to_string()))?;

        tracing::debug!("Raw name response: {:?}", raw);

        let name = truncate_to_name(&raw);
        if name.is_empty() {
            tracing::warn!("Text model returned no name");
            return Err(NameServiceError::EmptyResponse);
        }

        tracing::info!("Generated name: {}", name);
        Ok(name)
    }
}

/// Errors that can occur while generating a name
#[derive(Debug, thiserror::Error)]
pub enum NameServiceError {
    /// The model answered without any usable text
    #[error("Failed to generate a name.")]
    EmptyResponse,
    /// Error from the underlying text model
    #[error("LLM error: {0}")]
    LlmError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::mock::MockTextGenerator;

    #[tokio::test]
    async fn test_generate_name_truncates_to_two_words() {
        let text = MockTextGenerator::replying("Kaelen Stormborn, son of the mountain");
        let service = NameService::new(text.clone(), RetryPolicy::default());

        let name = service.generate_name("dwarf", "male").await.unwrap();
        assert_eq!(name, "Kaelen Stormborn");
        assert!(name.split_whitespace().count() <= 2);

        let requests = text.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, TextModel::NameGeneration);
        assert!(requests[0].user.contains("male dwarf"));
        assert_eq!(requests[0].params.max_tokens, NAME_MAX_TOKENS);
        assert_eq!(requests[0].params.top_p, Some(NAME_TOP_P));
    }

    #[tokio::test]
    async fn test_generate_name_keeps_single_word() {
        let service = NameService::new(MockTextGenerator::replying("Grusk"), RetryPolicy::default());
        assert_eq!(service.generate_name("orc", "female").await.unwrap(), "Grusk");
    }

    #[tokio::test]
    async fn test_empty_response_is_an_error() {
        let service = NameService::new(MockTextGenerator::replying("  \n"), RetryPolicy::default());
        let err = service.generate_name("elf", "female").await.unwrap_err();
        assert!(matches!(err, NameServiceError::EmptyResponse));
        assert_eq!(err.to_string(), "Failed to generate a name.");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_reported() {
        let service = NameService::new(
            MockTextGenerator::failing("upstream unavailable"),
            RetryPolicy::default(),
        );
        let err = service.generate_name("elf", "female").await.unwrap_err();
        assert!(matches!(err, NameServiceError::LlmError(_)));
        assert!(err.to_string().contains("upstream unavailable"));
    }
}
