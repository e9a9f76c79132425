//! Character Pipeline Service - Matching portrait and full-body images
//!
//! Stages:
//! 1. One completion writes a character detail sheet from the user's prompt.
//! 2. Two completions run concurrently over the same sheet and produce a
//!    portrait prompt and a full-body prompt.
//! 3. The portrait prompt is rendered, and the portrait becomes the seed of
//!    an image-to-image call driven by the full-body prompt.
//!
//! Any stage failure aborts the whole pipeline; there are no partial results.

use std::sync::Arc;

use futures_util::future::try_join;

use crate::application::ports::outbound::{
    CompletionRequest, SamplingParams, TextGenerationPort, TextModel,
};
use crate::application::services::image_service::ImageService;
use crate::application::services::llm::prompt_builder::{
    build_character_sheet_system_prompt, build_character_sheet_user_message,
    build_full_body_system_prompt, build_portrait_system_prompt, build_sheet_user_message,
    finalize_enhanced_prompt,
};
use crate::application::services::retry::RetryPolicy;
use crate::domain::value_objects::{CharacterSheet, ImageArtifact, ImageDimensions};

/// How far the full-body render may drift from the portrait seed
pub const FULL_BODY_STRENGTH: f32 = 0.6;

/// Concept used when the request carries no prompt
pub const DEFAULT_CHARACTER_PROMPT: &str = "A mysterious elven ranger";

const SHEET_MAX_TOKENS: u32 = 300;
const SHEET_TEMPERATURE: f32 = 0.7;
const VIEW_PROMPT_MAX_TOKENS: u32 = 200;
const VIEW_PROMPT_TEMPERATURE: f32 = 0.7;

/// Everything the pipeline produced
#[derive(Debug, Clone)]
pub struct CharacterImages {
    pub sheet: CharacterSheet,
    pub portrait_prompt: String,
    pub full_body_prompt: String,
    pub portrait: ImageArtifact,
    pub full_body: ImageArtifact,
}

#[derive(Clone)]
pub struct CharacterPipelineService {
    text: Arc<dyn TextGenerationPort>,
    images: ImageService,
    retry: RetryPolicy,
}

impl CharacterPipelineService {
    pub fn new(text: Arc<dyn TextGenerationPort>, images: ImageService, retry: RetryPolicy) -> Self {
        Self {
            text,
            images,
            retry,
        }
    }

    pub async fn generate(
        &self,
        prompt: &str,
        dimensions: ImageDimensions,
    ) -> Result<CharacterImages, CharacterPipelineError> {
        tracing::info!("Starting character pipeline for: \"{}\"", prompt);

        let sheet = self.generate_sheet(prompt).await?;
        tracing::info!(
            "Character sheet ready ({} of 5 sections filled)",
            sheet.filled_sections()
        );

        let (portrait_prompt, full_body_prompt) = try_join(
            self.portrait_prompt(prompt, &sheet),
            self.full_body_prompt(prompt, &sheet),
        )
        .await?;

        let portrait = self
            .images
            .generate(&portrait_prompt, dimensions)
            .await
            .map_err(|e| {
                tracing::error!("Portrait image failed: {}", e);
                CharacterPipelineError::PortraitImage(e.to_string())
            })?;

        let full_body = self
            .images
            .transform(&full_body_prompt, &portrait, FULL_BODY_STRENGTH, dimensions)
            .await
            .map_err(|e| {
                tracing::error!("Full-body image failed: {}", e);
                CharacterPipelineError::FullBodyImage(e.to_string())
            })?;

        tracing::info!("Character pipeline complete");

        Ok(CharacterImages {
            sheet,
            portrait_prompt,
            full_body_prompt,
            portrait,
            full_body,
        })
    }

    async fn generate_sheet(&self, prompt: &str) -> Result<CharacterSheet, CharacterPipelineError> {
        let request = CompletionRequest::new(
            TextModel::PromptEnhancer,
            build_character_sheet_system_prompt(),
            build_character_sheet_user_message(prompt),
            SamplingParams::new(SHEET_MAX_TOKENS, SHEET_TEMPERATURE),
        );

        let raw = self.complete("character sheet", request).await.map_err(|e| {
            tracing::error!("Character sheet failed: {}", e);
            CharacterPipelineError::CharacterSheet(e)
        })?;

        let sheet = CharacterSheet::parse(&raw);
        if sheet.is_empty() {
            return Err(CharacterPipelineError::CharacterSheet(
                "empty response".to_string(),
            ));
        }
        Ok(sheet)
    }

    async fn portrait_prompt(
        &self,
        prompt: &str,
        sheet: &CharacterSheet,
    ) -> Result<String, CharacterPipelineError> {
        self.view_prompt("portrait prompt", build_portrait_system_prompt(), prompt, sheet)
            .await
            .map_err(CharacterPipelineError::PortraitPrompt)
    }

    async fn full_body_prompt(
        &self,
        prompt: &str,
        sheet: &CharacterSheet,
    ) -> Result<String, CharacterPipelineError> {
        self.view_prompt("full-body prompt", build_full_body_system_prompt(), prompt, sheet)
            .await
            .map_err(CharacterPipelineError::FullBodyPrompt)
    }

    async fn view_prompt(
        &self,
        label: &str,
        system: String,
        prompt: &str,
        sheet: &CharacterSheet,
    ) -> Result<String, String> {
        let request = CompletionRequest::new(
            TextModel::PromptEnhancer,
            system,
            build_sheet_user_message(prompt, &sheet.raw),
            SamplingParams::new(VIEW_PROMPT_MAX_TOKENS, VIEW_PROMPT_TEMPERATURE),
        );

        let raw = self.complete(label, request).await?;
        let finalized = finalize_enhanced_prompt(&raw).ok_or_else(|| "empty response".to_string());
        match &finalized {
            Ok(p) => tracing::debug!("{}: \"{}\"", label, p),
            Err(e) => tracing::error!("{} failed: {}", label, e),
        }
        finalized
    }

    async fn complete(&self, label: &str, request: CompletionRequest) -> Result<String, String> {
        self.retry
            .run(label, || self.text.complete(request.clone()))
            .await
            .map_err(|e| e.to_string())
    }
}

/// Stage-specific pipeline failures
///
/// The display text is what clients see; the payload carries the underlying
/// cause for logs.
#[derive(Debug, thiserror::Error)]
pub enum CharacterPipelineError {
    #[error("Failed to generate character details.")]
    CharacterSheet(String),
    #[error("Failed to generate portrait prompt.")]
    PortraitPrompt(String),
    #[error("Failed to generate full-body prompt.")]
    FullBodyPrompt(String),
    #[error("Failed to generate portrait image.")]
    PortraitImage(String),
    #[error("Failed to generate full-body image.")]
    FullBodyImage(String),
}

impl CharacterPipelineError {
    pub fn cause(&self) -> &str {
        match self {
            Self::CharacterSheet(cause)
            | Self::PortraitPrompt(cause)
            | Self::FullBodyPrompt(cause)
            | Self::PortraitImage(cause)
            | Self::FullBodyImage(cause) => cause,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::mock::{
        sample_png, MockImageGenerator, MockTextGenerator,
    };
    use anyhow::anyhow;

    const SHEET: &str = "FACE: freckled, amber eyes\nHAIR: copper braid\nATTIRE: green cloak\nACCESSORIES: longbow\nPALETTE: green, copper";

    fn scripted_text(portrait: &'static str, full_body: &'static str) -> Arc<MockTextGenerator> {
        MockTextGenerator::with_responder(move |request| {
            if request.system.contains("character designer") {
                Ok(SHEET.to_string())
            } else if request.system.contains("head-and-shoulders") {
                Ok(portrait.to_string())
            } else if request.system.contains("full-body") {
                Ok(full_body.to_string())
            } else {
                Err(anyhow!("unexpected request"))
            }
        })
    }

    fn pipeline(
        text: Arc<MockTextGenerator>,
        images: Arc<MockImageGenerator>,
    ) -> CharacterPipelineService {
        CharacterPipelineService::new(
            text,
            ImageService::new(images, RetryPolicy::default()),
            RetryPolicy::default(),
        )
    }

    #[tokio::test]
    async fn test_full_pipeline_chains_portrait_into_full_body() {
        let text = scripted_text("Portrait of a ranger", "Full body of a ranger");
        let portrait_bytes = sample_png();
        let images = {
            let portrait_bytes = portrait_bytes.clone();
            MockImageGenerator::with_responder(move |request| {
                if request.is_image_to_image() {
                    Ok(vec![0xFF, 0xD8, 0xFF, 0xE0])
                } else {
                    Ok(portrait_bytes.clone())
                }
            })
        };
        let service = pipeline(text.clone(), images.clone());

        let result = service
            .generate("An elven ranger", ImageDimensions::default())
            .await
            .unwrap();

        assert_eq!(result.sheet.hair, "copper braid");
        assert!(result.portrait_prompt.starts_with("Portrait of a ranger"));
        assert!(result.full_body_prompt.starts_with("Full body of a ranger"));
        assert_eq!(result.portrait.bytes, portrait_bytes);
        assert_eq!(result.full_body.bytes, vec![0xFF, 0xD8, 0xFF, 0xE0]);

        let text_requests = text.requests();
        assert_eq!(text_requests.len(), 3);
        assert!(text_requests
            .iter()
            .filter(|r| !r.system.contains("character designer"))
            .all(|r| r.user.contains("copper braid")));

        let image_requests = images.requests();
        assert_eq!(image_requests.len(), 2);
        assert_eq!(image_requests[0].prompt, result.portrait_prompt);
        assert!(!image_requests[0].is_image_to_image());
        assert_eq!(image_requests[1].prompt, result.full_body_prompt);
        assert_eq!(image_requests[1].init_image.as_ref(), Some(&portrait_bytes));
        assert_eq!(image_requests[1].strength, Some(FULL_BODY_STRENGTH));
    }

    #[tokio::test]
    async fn test_empty_sheet_aborts_before_images() {
        let images = MockImageGenerator::returning(sample_png());
        let service = pipeline(MockTextGenerator::replying("   "), images.clone());

        let err = service
            .generate("An elven ranger", ImageDimensions::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to generate character details.");
        assert!(images.requests().is_empty());
    }

    #[tokio::test]
    async fn test_failed_branch_fails_the_pipeline() {
        let images = MockImageGenerator::returning(sample_png());
        let service = pipeline(scripted_text("Portrait of a ranger", ""), images.clone());

        let err = service
            .generate("An elven ranger", ImageDimensions::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to generate full-body prompt.");
        assert_eq!(err.cause(), "empty response");
        assert!(images.requests().is_empty());
    }

    #[tokio::test]
    async fn test_full_body_failure_reports_stage() {
        let images = MockImageGenerator::with_responder(|request| {
            if request.is_image_to_image() {
                Err(anyhow!("img2img model offline"))
            } else {
                Ok(sample_png())
            }
        });
        let service = pipeline(scripted_text("Portrait", "Full body"), images);

        let err = service
            .generate("An elven ranger", ImageDimensions::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to generate full-body image.");
        assert!(err.cause().contains("img2img model offline"));
    }
}
