//! Image diffusion port

use anyhow::Result;
use async_trait::async_trait;

/// Request for a text-to-image or image-to-image generation
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    /// Seed image for image-to-image generation
    pub init_image: Option<Vec<u8>>,
    /// How far the result may drift from the seed image (0.0 - 1.0)
    pub strength: Option<f32>,
}

impl ImageRequest {
    pub fn text_to_image(prompt: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            prompt: prompt.into(),
            width,
            height,
            init_image: None,
            strength: None,
        }
    }

    pub fn with_seed_image(mut self, image: Vec<u8>, strength: f32) -> Self {
        self.init_image = Some(image);
        self.strength = Some(strength);
        self
    }

    pub fn is_image_to_image(&self) -> bool {
        self.init_image.is_some()
    }
}

/// Port for image-generation backends
///
/// Returns the raw image bytes. An empty vector means the model produced
/// nothing; callers treat that as a generation failure.
#[async_trait]
pub trait ImageGenerationPort: Send + Sync {
    async fn generate_image(&self, request: ImageRequest) -> Result<Vec<u8>>;
}
