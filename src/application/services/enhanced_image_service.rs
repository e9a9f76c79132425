//! Enhanced Image Service - Enhance a prompt, then render it
//!
//! Strictly sequential: the image call waits for the enhancer. If enhancement
//! fails for any reason the original prompt is rendered instead.

use crate::application::services::image_service::{ImageService, ImageServiceError};
use crate::application::services::prompt_enhancer_service::{EnhanceRequest, PromptEnhancerService};
use crate::domain::value_objects::{ImageArtifact, ImageDimensions};

/// Outcome of the two-stage pipeline
#[derive(Debug, Clone)]
pub struct EnhancedImage {
    /// Prompt the image was actually rendered from
    pub final_prompt: String,
    pub image: ImageArtifact,
}

#[derive(Clone)]
pub struct EnhancedImageService {
    enhancer: PromptEnhancerService,
    images: ImageService,
}

impl EnhancedImageService {
    pub fn new(enhancer: PromptEnhancerService, images: ImageService) -> Self {
        Self { enhancer, images }
    }

    pub async fn generate(
        &self,
        request: &EnhanceRequest,
        dimensions: ImageDimensions,
    ) -> Result<EnhancedImage, ImageServiceError> {
        tracing::info!(
            "Enhancing prompt before image generation: \"{}\"",
            request.prompt
        );

        let final_prompt = match self.enhancer.enhance(request).await {
            Ok(enhanced) => enhanced.enhanced_prompt,
            Err(e) => {
                tracing::warn!(
                    "Prompt enhancement failed ({}), falling back to original prompt",
                    e
                );
                request.prompt.clone()
            }
        };

        tracing::info!("Final prompt used for image: \"{}\"", final_prompt);

        let image = self.images.generate(&final_prompt, dimensions).await?;
        Ok(EnhancedImage {
            final_prompt,
            image,
        })
    }
}
