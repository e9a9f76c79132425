//! Shared application state

use std::sync::Arc;

use anyhow::Result;
use axum::http::HeaderValue;

use crate::application::ports::outbound::{ImageGenerationPort, TextGenerationPort};
use crate::application::services::{
    CharacterPipelineService, EnhancedImageService, ImageService, NameService,
    PromptEnhancerService,
};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::http::CorsPolicy;
use crate::infrastructure::workers_ai::WorkersAiClient;

/// Shared application state
///
/// Built once at startup and shared read-only by every request.
pub struct AppState {
    pub cors: CorsPolicy,
    // Application services
    pub name_service: NameService,
    pub prompt_enhancer: PromptEnhancerService,
    pub image_service: ImageService,
    pub enhanced_image_service: EnhancedImageService,
    pub character_pipeline: CharacterPipelineService,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        // Initialize Workers AI client (serves both text and image models)
        let client = Arc::new(WorkersAiClient::new(&config));
        Self::with_backends(config, client.clone(), client)
    }

    /// Wire the services over arbitrary backends
    pub fn with_backends(
        config: AppConfig,
        text: Arc<dyn TextGenerationPort>,
        images: Arc<dyn ImageGenerationPort>,
    ) -> Result<Self> {
        let origin = HeaderValue::from_str(&config.allowed_origin).map_err(|_| {
            anyhow::anyhow!(
                "ALLOWED_ORIGIN is not a valid header value: {}",
                config.allowed_origin
            )
        })?;
        let retry = config.retry_policy();

        // Initialize application services
        let name_service = NameService::new(text.clone(), retry.clone());
        let prompt_enhancer = PromptEnhancerService::new(text.clone(), retry.clone());
        let image_service = ImageService::new(images, retry.clone());
        let enhanced_image_service =
            EnhancedImageService::new(prompt_enhancer.clone(), image_service.clone());
        let character_pipeline =
            CharacterPipelineService::new(text, image_service.clone(), retry);

        Ok(Self {
            cors: CorsPolicy::new(origin),
            name_service,
            prompt_enhancer,
            image_service,
            enhanced_image_service,
            character_pipeline,
        })
    }
}
