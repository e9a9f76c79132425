//! Generation API routes - Names, prompts and images

use axum::{extract::State, Json};
use std::sync::Arc;

use super::error::ApiError;
use super::extract::LenientJson;
use crate::application::dto::{
    CharacterImagesRequestDto, CharacterImagesResponseDto, EnhancedImageRequestDto,
    EnhancedPromptResponseDto, ImageRequestDto, ImageResponseDto, NameRequestDto,
    NameResponseDto, PromptEnhancerRequestDto,
};
use crate::infrastructure::state::AppState;

/// Generate a fantasy NPC name
pub async fn generate_name(
    State(state): State<Arc<AppState>>,
    LenientJson(req): LenientJson<NameRequestDto>,
) -> Result<Json<NameResponseDto>, ApiError> {
    let name = state
        .name_service
        .generate_name(req.race(), req.gender())
        .await?;

    Ok(Json(NameResponseDto { name }))
}

/// Rewrite a prompt using the style and mood tables
pub async fn enhance_prompt(
    State(state): State<Arc<AppState>>,
    LenientJson(req): LenientJson<PromptEnhancerRequestDto>,
) -> Result<Json<EnhancedPromptResponseDto>, ApiError> {
    let result = state
        .prompt_enhancer
        .enhance(&req.to_enhance_request())
        .await?;

    Ok(Json(result.into()))
}

/// Render a prompt as-is
pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    LenientJson(req): LenientJson<ImageRequestDto>,
) -> Result<Json<ImageResponseDto>, ApiError> {
    let image = state
        .image_service
        .generate(&req.prompt(), req.dimensions())
        .await?;

    Ok(Json(ImageResponseDto::from(&image)))
}

/// Enhance a prompt, then render the result
pub async fn generate_enhanced_image(
    State(state): State<Arc<AppState>>,
    LenientJson(req): LenientJson<EnhancedImageRequestDto>,
) -> Result<Json<ImageResponseDto>, ApiError> {
    let result = state
        .enhanced_image_service
        .generate(&req.to_enhance_request(), req.dimensions())
        .await?;
    tracing::debug!("Enhanced image rendered from \"{}\"", result.final_prompt);

    Ok(Json(ImageResponseDto::from(&result.image)))
}

/// Matching portrait and full-body images of one character
pub async fn generate_character_images(
    State(state): State<Arc<AppState>>,
    LenientJson(req): LenientJson<CharacterImagesRequestDto>,
) -> Result<Json<CharacterImagesResponseDto>, ApiError> {
    let result = state
        .character_pipeline
        .generate(req.prompt(), req.dimensions())
        .await?;

    Ok(Json(result.into()))
}
