//! Application services - Use case implementations
//!
//! Each service wraps one step of the generation pipeline and depends only on
//! the outbound ports, so the HTTP layer and tests can swap the backends.

pub mod character_pipeline_service;
pub mod enhanced_image_service;
pub mod image_service;
pub mod llm;
pub mod name_service;
pub mod prompt_enhancer_service;
pub mod retry;

pub use character_pipeline_service::{
    CharacterImages, CharacterPipelineError, CharacterPipelineService, DEFAULT_CHARACTER_PROMPT,
};
pub use enhanced_image_service::EnhancedImageService;
pub use image_service::{resolve_image_prompt, ImageService, ImageServiceError};
pub use name_service::{NameService, NameServiceError};
pub use prompt_enhancer_service::{
    EnhanceRequest, EnhancedPrompt, PromptEnhancerError, PromptEnhancerService,
};
pub use retry::RetryPolicy;
