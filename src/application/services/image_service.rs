//! Image Service - Text-to-image and image-to-image generation

use std::sync::Arc;

use crate::application::ports::outbound::{ImageGenerationPort, ImageRequest};
use crate::application::services::retry::RetryPolicy;
use crate::domain::value_objects::{ImageArtifact, ImageDimensions, ImageFormat};

/// Prompt used when a request arrives without one
pub const DEFAULT_IMAGE_PROMPT: &str = "A fantasy portrait of a human warrior";

/// Substitute the default prompt for missing or blank input
pub fn resolve_image_prompt(prompt: Option<&str>) -> String {
    match prompt.map(str::trim) {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => DEFAULT_IMAGE_PROMPT.to_string(),
    }
}

#[derive(Clone)]
pub struct ImageService {
    images: Arc<dyn ImageGenerationPort>,
    retry: RetryPolicy,
}

impl ImageService {
    pub fn new(images: Arc<dyn ImageGenerationPort>, retry: RetryPolicy) -> Self {
        Self { images, retry }
    }

    /// Generate an image from a prompt
    pub async fn generate(
        &self,
        prompt: &str,
        dimensions: ImageDimensions,
    ) -> Result<ImageArtifact, ImageServiceError> {
        tracing::info!(
            "Generating {}x{} image with prompt: \"{}\"",
            dimensions.width,
            dimensions.height,
            prompt
        );
        let request = ImageRequest::text_to_image(prompt, dimensions.width, dimensions.height);
        self.run(request).await
    }

    /// Generate a new image guided by `prompt`, seeded with an existing one
    pub async fn transform(
        &self,
        prompt: &str,
        seed: &ImageArtifact,
        strength: f32,
        dimensions: ImageDimensions,
    ) -> Result<ImageArtifact, ImageServiceError> {
        tracing::info!(
            "Transforming {} byte seed image (strength {}) with prompt: \"{}\"",
            seed.len(),
            strength,
            prompt
        );
        let request = ImageRequest::text_to_image(prompt, dimensions.width, dimensions.height)
            .with_seed_image(seed.bytes.clone(), strength);
        self.run(request).await
    }

    async fn run(&self, request: ImageRequest) -> Result<ImageArtifact, ImageServiceError> {
        let bytes = self
            .retry
            .run("image generation", || self.images.generate_image(request.clone()))
            .await
            .map_err(|e| {
                tracing::error!("Image generation failed: {}", e);
                ImageServiceError::ModelError(e.to_string())
            })?;

        let artifact = ImageArtifact::new(bytes);
        if artifact.is_empty() {
            tracing::error!("Image model returned empty response");
            return Err(ImageServiceError::EmptyResponse);
        }

        if artifact.format == ImageFormat::Unknown {
            tracing::warn!(
                "Image payload of {} bytes has no known signature, labelling as {}",
                artifact.len(),
                artifact.format.mime_type()
            );
        }
        tracing::info!("Image response size: {} bytes", artifact.len());

        Ok(artifact)
    }
}

/// Errors that can occur while generating images
#[derive(Debug, thiserror::Error)]
pub enum ImageServiceError {
    #[error("AI model returned no data.")]
    EmptyResponse,
    #[error("Image generation failed: {0}")]
    ModelError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::mock::{sample_png, MockImageGenerator};

    #[test]
    fn test_resolve_image_prompt() {
        assert_eq!(resolve_image_prompt(None), DEFAULT_IMAGE_PROMPT);
        assert_eq!(resolve_image_prompt(Some("")), DEFAULT_IMAGE_PROMPT);
        assert_eq!(resolve_image_prompt(Some("   ")), DEFAULT_IMAGE_PROMPT);
        assert_eq!(resolve_image_prompt(Some(" A troll ")), "A troll");
    }

    #[tokio::test]
    async fn test_generate_forwards_prompt_and_dimensions() {
        let images = MockImageGenerator::returning(sample_png());
        let service = ImageService::new(images.clone(), RetryPolicy::default());

        let artifact = service
            .generate("A troll", ImageDimensions::from_request(Some(2000), Some(600)))
            .await
            .unwrap();

        assert_eq!(artifact.format, ImageFormat::Png);
        let sent = &images.requests()[0];
        assert_eq!(sent.prompt, "A troll");
        assert_eq!((sent.width, sent.height), (1024, 512));
        assert!(!sent.is_image_to_image());
    }

    #[tokio::test]
    async fn test_transform_sends_seed_and_strength() {
        let images = MockImageGenerator::returning(sample_png());
        let service = ImageService::new(images.clone(), RetryPolicy::default());
        let seed = ImageArtifact::new(vec![9, 9, 9]);

        service
            .transform("Full body", &seed, 0.6, ImageDimensions::default())
            .await
            .unwrap();

        let sent = &images.requests()[0];
        assert_eq!(sent.init_image.as_deref(), Some(&[9u8, 9, 9][..]));
        assert_eq!(sent.strength, Some(0.6));
    }

    #[tokio::test]
    async fn test_empty_payload_is_an_error() {
        let service = ImageService::new(MockImageGenerator::returning(Vec::new()), RetryPolicy::default());
        let err = service
            .generate("A troll", ImageDimensions::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "AI model returned no data.");
    }

    #[tokio::test]
    async fn test_unknown_payload_is_still_returned() {
        let service = ImageService::new(
            MockImageGenerator::returning(vec![1, 2, 3, 4]),
            RetryPolicy::default(),
        );
        let artifact = service
            .generate("A troll", ImageDimensions::default())
            .await
            .unwrap();
        assert_eq!(artifact.bytes, vec![1, 2, 3, 4]);
        assert_eq!(artifact.format, ImageFormat::Unknown);
    }

    #[tokio::test]
    async fn test_model_failure_is_reported() {
        let service = ImageService::new(
            MockImageGenerator::failing("capacity exceeded"),
            RetryPolicy::default(),
        );
        let err = service
            .generate("A troll", ImageDimensions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ImageServiceError::ModelError(_)));
        assert!(err.to_string().contains("capacity exceeded"));
    }
}
