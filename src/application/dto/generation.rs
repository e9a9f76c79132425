use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::application::services::{
    resolve_image_prompt, CharacterImages, EnhanceRequest, EnhancedPrompt,
    DEFAULT_CHARACTER_PROMPT,
};
use crate::domain::value_objects::{
    ArtDirection, CharacterSheet, ImageArtifact, ImageDimensions, DEFAULT_MOOD, DEFAULT_STYLE,
};

pub const DEFAULT_RACE: &str = "human";
pub const DEFAULT_GENDER: &str = "male";
pub const DEFAULT_ENHANCER_PROMPT: &str = "A mighty dwarf paladin";

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Encode image bytes as a `data:` URI
pub fn to_data_uri(image: &ImageArtifact) -> String {
    format!(
        "data:{};base64,{}",
        image.format.mime_type(),
        STANDARD.encode(&image.bytes)
    )
}

// =============================================================================
// Requests
// =============================================================================

/// Body of `POST /generate-name`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NameRequestDto {
    pub race: Option<String>,
    pub gender: Option<String>,
}

impl NameRequestDto {
    pub fn race(&self) -> &str {
        non_blank(&self.race).unwrap_or(DEFAULT_RACE)
    }

    pub fn gender(&self) -> &str {
        non_blank(&self.gender).unwrap_or(DEFAULT_GENDER)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnhancementDetailsDto {
    #[serde(rename = "customInstructions")]
    pub custom_instructions: Option<String>,
}

/// Body of `POST /prompt-enhancer`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptEnhancerRequestDto {
    pub prompt: Option<String>,
    pub style: Option<String>,
    pub mood: Option<String>,
    pub details: Option<EnhancementDetailsDto>,
}

impl PromptEnhancerRequestDto {
    pub fn to_enhance_request(&self) -> EnhanceRequest {
        build_enhance_request(
            non_blank(&self.prompt).unwrap_or(DEFAULT_ENHANCER_PROMPT),
            &self.style,
            &self.mood,
            self.details.as_ref(),
        )
    }
}

/// Body of `POST /generate-image`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageRequestDto {
    pub prompt: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl ImageRequestDto {
    pub fn prompt(&self) -> String {
        resolve_image_prompt(self.prompt.as_deref())
    }

    pub fn dimensions(&self) -> ImageDimensions {
        dimensions(self.width, self.height)
    }
}

/// Body of `POST /generate-enhanced-image`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnhancedImageRequestDto {
    pub prompt: Option<String>,
    pub style: Option<String>,
    pub mood: Option<String>,
    pub details: Option<EnhancementDetailsDto>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl EnhancedImageRequestDto {
    pub fn to_enhance_request(&self) -> EnhanceRequest {
        build_enhance_request(
            &resolve_image_prompt(self.prompt.as_deref()),
            &self.style,
            &self.mood,
            self.details.as_ref(),
        )
    }

    pub fn dimensions(&self) -> ImageDimensions {
        dimensions(self.width, self.height)
    }
}

/// Body of `POST /generate-character-images`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacterImagesRequestDto {
    pub prompt: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl CharacterImagesRequestDto {
    pub fn prompt(&self) -> &str {
        non_blank(&self.prompt).unwrap_or(DEFAULT_CHARACTER_PROMPT)
    }

    pub fn dimensions(&self) -> ImageDimensions {
        dimensions(self.width, self.height)
    }
}

fn build_enhance_request(
    prompt: &str,
    style: &Option<String>,
    mood: &Option<String>,
    details: Option<&EnhancementDetailsDto>,
) -> EnhanceRequest {
    let direction = ArtDirection::new(
        non_blank(style).unwrap_or(DEFAULT_STYLE),
        non_blank(mood).unwrap_or(DEFAULT_MOOD),
    );
    let custom_instructions = details
        .and_then(|d| non_blank(&d.custom_instructions))
        .map(str::to_string);
    EnhanceRequest::new(prompt, direction).with_custom_instructions(custom_instructions)
}

fn dimensions(width: Option<f64>, height: Option<f64>) -> ImageDimensions {
    ImageDimensions::from_request(
        width.filter(|w| w.is_finite()).map(|w| w.round() as i64),
        height.filter(|h| h.is_finite()).map(|h| h.round() as i64),
    )
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponseDto {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDto {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NameResponseDto {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnhancedPromptResponseDto {
    pub enhanced_prompt: String,
    pub original_prompt: String,
    pub style: String,
    pub mood: String,
    pub word_count: usize,
}

impl From<EnhancedPrompt> for EnhancedPromptResponseDto {
    fn from(result: EnhancedPrompt) -> Self {
        Self {
            enhanced_prompt: result.enhanced_prompt,
            original_prompt: result.original_prompt,
            style: result.style,
            mood: result.mood,
            word_count: result.word_count,
        }
    }
}

/// Response of both image endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ImageResponseDto {
    pub image_url: String,
}

impl From<&ImageArtifact> for ImageResponseDto {
    fn from(image: &ImageArtifact) -> Self {
        Self {
            image_url: to_data_uri(image),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CharacterImagesResponseDto {
    pub character_sheet: CharacterSheet,
    pub portrait_prompt: String,
    pub full_body_prompt: String,
    pub portrait_image_url: String,
    pub full_body_image_url: String,
}

impl From<CharacterImages> for CharacterImagesResponseDto {
    fn from(result: CharacterImages) -> Self {
        Self {
            portrait_image_url: to_data_uri(&result.portrait),
            full_body_image_url: to_data_uri(&result.full_body),
            character_sheet: result.sheet,
            portrait_prompt: result.portrait_prompt,
            full_body_prompt: result.full_body_prompt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_request_defaults() {
        let dto: NameRequestDto = serde_json::from_str("{}").unwrap();
        assert_eq!(dto.race(), "human");
        assert_eq!(dto.gender(), "male");

        let dto: NameRequestDto =
            serde_json::from_str(r#"{"race": "tiefling", "gender": " "}"#).unwrap();
        assert_eq!(dto.race(), "tiefling");
        assert_eq!(dto.gender(), "male");
    }

    #[test]
    fn test_enhancer_request_reads_custom_instructions() {
        let dto: PromptEnhancerRequestDto = serde_json::from_str(
            r#"{"prompt": "A gnome", "style": "anime", "details": {"customInstructions": "tiny hat"}}"#,
        )
        .unwrap();
        let request = dto.to_enhance_request();

        assert_eq!(request.prompt, "A gnome");
        assert_eq!(request.direction, ArtDirection::new("anime", DEFAULT_MOOD));
        assert_eq!(request.custom_instructions.as_deref(), Some("tiny hat"));
    }

    #[test]
    fn test_enhancer_request_defaults() {
        let request = PromptEnhancerRequestDto::default().to_enhance_request();
        assert_eq!(request.prompt, DEFAULT_ENHANCER_PROMPT);
        assert_eq!(request.direction, ArtDirection::default());
        assert_eq!(request.custom_instructions, None);
    }

    #[test]
    fn test_image_request_dimensions_accept_floats() {
        let dto: ImageRequestDto =
            serde_json::from_str(r#"{"prompt": "", "width": 2000, "height": 700.4}"#).unwrap();
        assert_eq!(dto.prompt(), crate::application::services::image_service::DEFAULT_IMAGE_PROMPT);
        assert_eq!(dto.dimensions(), ImageDimensions { width: 1024, height: 768 });
    }

    #[test]
    fn test_data_uri() {
        let image = ImageArtifact::new(vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(to_data_uri(&image), "data:image/jpeg;base64,/9j/");
    }
}
