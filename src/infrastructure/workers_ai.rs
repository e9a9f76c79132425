//! Workers AI client for text and image generation
//!
//! Talks to the Cloudflare REST endpoint
//! `POST {base}/accounts/{account}/ai/run/{model}`. Text models answer with a
//! JSON envelope; diffusion models answer with raw image bytes, or with a
//! JSON envelope carrying base64 for the models that do so.

use anyhow::Result;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::outbound::{
    CompletionRequest, ImageGenerationPort, ImageRequest, TextGenerationPort, TextModel,
};
use crate::infrastructure::config::AppConfig;

/// Client for the Workers AI REST API
pub struct WorkersAiClient {
    client: Client,
    base_url: String,
    account_id: String,
    api_token: String,
    models: ModelSet,
}

/// Model identifiers resolved from configuration
#[derive(Debug, Clone)]
pub struct ModelSet {
    pub name_generation: String,
    pub prompt_enhancer: String,
    pub text_to_image: String,
    pub image_to_image: String,
}

impl ModelSet {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            name_generation: config.name_generation_model.clone(),
            prompt_enhancer: config.prompt_enhancer_model.clone(),
            text_to_image: config.image_generation_model.clone(),
            image_to_image: config.image_to_image_model.clone(),
        }
    }

    fn text_model(&self, model: TextModel) -> &str {
        match model {
            TextModel::NameGeneration => &self.name_generation,
            TextModel::PromptEnhancer => &self.prompt_enhancer,
        }
    }

    fn image_model(&self, request: &ImageRequest) -> &str {
        if request.is_image_to_image() {
            &self.image_to_image
        } else {
            &self.text_to_image
        }
    }
}

impl WorkersAiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.workers_ai_base_url.trim_end_matches('/').to_string(),
            account_id: config.cloudflare_account_id.clone(),
            api_token: config.cloudflare_api_token.clone(),
            models: ModelSet::from_config(config),
        }
    }

    fn run_url(&self, model: &str) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.base_url,
            self.account_id,
            model.trim_start_matches('/')
        )
    }

    /// Run a chat-style text model and return its `response` text
    pub async fn run_text(
        &self,
        model: &str,
        body: &TextGenerationBody<'_>,
    ) -> Result<String, WorkersAiError> {
        tracing::debug!("Running text model {}", model);

        let response = self
            .client
            .post(self.run_url(model))
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await?;
            return Err(WorkersAiError::ApiError { status, message: error_text });
        }

        let text = response.text().await?;
        parse_text_envelope(&text)
    }

    /// Run a diffusion model and return the image bytes
    pub async fn run_image(
        &self,
        model: &str,
        body: &ImageGenerationBody<'_>,
    ) -> Result<Vec<u8>, WorkersAiError> {
        tracing::debug!("Running image model {}", model);

        let response = self
            .client
            .post(self.run_url(model))
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await?;
            return Err(WorkersAiError::ApiError { status, message: error_text });
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));

        let bytes = response.bytes().await?;
        if is_json {
            decode_image_envelope(&bytes)
        } else {
            Ok(bytes.to_vec())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkersAiError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Workers AI returned {status}: {message}")]
    ApiError { status: u16, message: String },
    #[error("Unexpected Workers AI response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// Request body for chat-style text models
#[derive(Debug, Serialize)]
pub struct TextGenerationBody<'a> {
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

impl<'a> From<&'a CompletionRequest> for TextGenerationBody<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        Self {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            max_tokens: request.params.max_tokens,
            temperature: request.params.temperature,
            top_p: request.params.top_p,
        }
    }
}

/// Request body for diffusion models
#[derive(Debug, Serialize)]
pub struct ImageGenerationBody<'a> {
    pub prompt: &'a str,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_b64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<f32>,
}

impl<'a> From<&'a ImageRequest> for ImageGenerationBody<'a> {
    fn from(request: &'a ImageRequest) -> Self {
        Self {
            prompt: &request.prompt,
            width: request.width,
            height: request.height,
            image_b64: request.init_image.as_ref().map(|bytes| STANDARD.encode(bytes)),
            strength: request.strength,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    result: Option<T>,
    success: Option<bool>,
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct TextResult {
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageResult {
    image: Option<String>,
}

fn unwrap_envelope<T>(envelope: ApiEnvelope<T>) -> Result<Option<T>, WorkersAiError> {
    if envelope.success == Some(false) {
        let message = envelope
            .errors
            .iter()
            .map(|e| match e.code {
                Some(code) => format!("{} ({})", e.message, code),
                None => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; ");
        return Err(WorkersAiError::InvalidResponse(if message.is_empty() {
            "request was not successful".to_string()
        } else {
            message
        }));
    }
    Ok(envelope.result)
}

/// Extract the generated text; a missing `response` becomes an empty string
fn parse_text_envelope(body: &str) -> Result<String, WorkersAiError> {
    let envelope: ApiEnvelope<TextResult> =
        serde_json::from_str(body).map_err(|e| WorkersAiError::InvalidResponse(e.to_string()))?;
    Ok(unwrap_envelope(envelope)?
        .and_then(|result| result.response)
        .unwrap_or_default())
}

/// Decode a base64 image from a JSON envelope; a missing image becomes empty bytes
fn decode_image_envelope(body: &[u8]) -> Result<Vec<u8>, WorkersAiError> {
    let envelope: ApiEnvelope<ImageResult> =
        serde_json::from_slice(body).map_err(|e| WorkersAiError::InvalidResponse(e.to_string()))?;
    match unwrap_envelope(envelope)?.and_then(|result| result.image) {
        Some(encoded) => STANDARD
            .decode(encoded.trim())
            .map_err(|e| WorkersAiError::InvalidResponse(format!("invalid base64 image: {}", e))),
        None => Ok(Vec::new()),
    }
}

// =============================================================================
// Port Implementations
// =============================================================================

#[async_trait]
impl TextGenerationPort for WorkersAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let model = self.models.text_model(request.model);
        let body = TextGenerationBody::from(&request);
        let text = self.run_text(model, &body).await?;
        Ok(text)
    }
}

#[async_trait]
impl ImageGenerationPort for WorkersAiClient {
    async fn generate_image(&self, request: ImageRequest) -> Result<Vec<u8>> {
        let model = self.models.image_model(&request);
        let body = ImageGenerationBody::from(&request);
        let bytes = self.run_image(model, &body).await?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::SamplingParams;

    #[test]
    fn test_run_url() {
        let mut config = AppConfig::for_tests();
        config.workers_ai_base_url = "https://api.example.test/client/v4/".to_string();
        let client = WorkersAiClient::new(&config);

        assert_eq!(
            client.run_url("@cf/stabilityai/stable-diffusion-xl-base-1.0"),
            "https://api.example.test/client/v4/accounts/test-account/ai/run/@cf/stabilityai/stable-diffusion-xl-base-1.0"
        );
    }

    #[test]
    fn test_model_selection() {
        let models = ModelSet::from_config(&AppConfig::for_tests());
        assert_eq!(models.text_model(TextModel::NameGeneration), "@cf/test/text");

        let txt2img = ImageRequest::text_to_image("a", 512, 512);
        assert_eq!(models.image_model(&txt2img), "@cf/test/image");
        let img2img = txt2img.with_seed_image(vec![1], 0.5);
        assert_eq!(models.image_model(&img2img), "@cf/test/img2img");
    }

    #[test]
    fn test_text_body_serialization() {
        let request = CompletionRequest::new(
            TextModel::NameGeneration,
            "system text",
            "user text",
            SamplingParams::new(12, 1.2).with_top_p(0.75),
        );
        let json = serde_json::to_value(TextGenerationBody::from(&request)).unwrap();

        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "system text");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 12);
        assert!(json.get("top_p").is_some());

        let request = CompletionRequest::new(
            TextModel::PromptEnhancer,
            "s",
            "u",
            SamplingParams::new(200, 0.8),
        );
        let json = serde_json::to_value(TextGenerationBody::from(&request)).unwrap();
        assert!(json.get("top_p").is_none());
    }

    #[test]
    fn test_image_body_serialization() {
        let request = ImageRequest::text_to_image("a castle", 768, 512);
        let json = serde_json::to_value(ImageGenerationBody::from(&request)).unwrap();
        assert_eq!(json["prompt"], "a castle");
        assert_eq!(json["width"], 768);
        assert!(json.get("image_b64").is_none());
        assert!(json.get("strength").is_none());

        let request = request.with_seed_image(vec![0xFF, 0xD8, 0xFF], 0.6);
        let json = serde_json::to_value(ImageGenerationBody::from(&request)).unwrap();
        assert_eq!(json["image_b64"], "/9j/");
        assert!(json["strength"].as_f64().is_some());
    }

    #[test]
    fn test_parse_text_envelope() {
        let body = r#"{"result":{"response":"Thorin Oakenshield"},"success":true,"errors":[],"messages":[]}"#;
        assert_eq!(parse_text_envelope(body).unwrap(), "Thorin Oakenshield");

        let body = r#"{"result":{},"success":true}"#;
        assert_eq!(parse_text_envelope(body).unwrap(), "");

        let body = r#"{"result":null,"success":false,"errors":[{"code":5007,"message":"No such model"}]}"#;
        let err = parse_text_envelope(body).unwrap_err();
        assert!(err.to_string().contains("No such model (5007)"));

        assert!(parse_text_envelope("not json").is_err());
    }

    #[test]
    fn test_decode_image_envelope() {
        let body = br#"{"result":{"image":"/9j/"},"success":true}"#;
        assert_eq!(decode_image_envelope(body).unwrap(), vec![0xFF, 0xD8, 0xFF]);

        let body = br#"{"result":{},"success":true}"#;
        assert!(decode_image_envelope(body).unwrap().is_empty());

        let body = br#"{"result":{"image":"***"},"success":true}"#;
        assert!(decode_image_envelope(body).is_err());
    }
}
