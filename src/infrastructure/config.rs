//! Application configuration

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::services::RetryPolicy;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Workers AI REST API base URL
    pub workers_ai_base_url: String,
    /// Cloudflare account that owns the Workers AI quota
    pub cloudflare_account_id: String,
    /// API token with Workers AI read permission
    pub cloudflare_api_token: String,

    /// Text model for NPC names
    pub name_generation_model: String,
    /// Text model for prompt enhancement and the character pipeline
    pub prompt_enhancer_model: String,
    /// Text-to-image model
    pub image_generation_model: String,
    /// Image-to-image model used for full-body renders
    pub image_to_image_model: String,

    /// Value of `Access-Control-Allow-Origin` on every response
    pub allowed_origin: String,

    /// HTTP server port
    pub server_port: u16,

    /// Retry attempts for upstream calls (0 = single attempt)
    pub upstream_max_retries: u32,
    /// Backoff before the first upstream retry
    pub upstream_retry_backoff: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            workers_ai_base_url: env::var("WORKERS_AI_BASE_URL")
                .unwrap_or_else(|_| "https://api.cloudflare.com/client/v4".to_string()),
            cloudflare_account_id: env::var("CLOUDFLARE_ACCOUNT_ID")
                .context("CLOUDFLARE_ACCOUNT_ID environment variable is required")?,
            cloudflare_api_token: env::var("CLOUDFLARE_API_TOKEN")
                .context("CLOUDFLARE_API_TOKEN environment variable is required")?,

            name_generation_model: env::var("NAME_GENERATION_MODEL")
                .unwrap_or_else(|_| "@cf/mistral/mistral-7b-instruct-v0.1".to_string()),
            prompt_enhancer_model: env::var("PROMPT_ENHANCER_MODEL")
                .unwrap_or_else(|_| "@cf/mistral/mistral-7b-instruct-v0.1".to_string()),
            image_generation_model: env::var("IMAGE_GENERATION_MODEL")
                .unwrap_or_else(|_| "@cf/stabilityai/stable-diffusion-xl-base-1.0".to_string()),
            image_to_image_model: env::var("IMAGE_TO_IMAGE_MODEL")
                .unwrap_or_else(|_| "@cf/runwayml/stable-diffusion-v1-5-img2img".to_string()),

            allowed_origin: env::var("ALLOWED_ORIGIN").unwrap_or_else(|_| "*".to_string()),

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,

            upstream_max_retries: env::var("UPSTREAM_MAX_RETRIES")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .context("UPSTREAM_MAX_RETRIES must be a non-negative integer")?,
            upstream_retry_backoff: Duration::from_millis(
                env::var("UPSTREAM_RETRY_BACKOFF_MS")
                    .unwrap_or_else(|_| "250".to_string())
                    .parse()
                    .context("UPSTREAM_RETRY_BACKOFF_MS must be a number of milliseconds")?,
            ),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::with_max_retries(self.upstream_max_retries, self.upstream_retry_backoff)
    }
}

#[cfg(test)]
impl AppConfig {
    /// Configuration for tests that never reach the network
    pub fn for_tests() -> Self {
        Self {
            workers_ai_base_url: "http://127.0.0.1:9".to_string(),
            cloudflare_account_id: "test-account".to_string(),
            cloudflare_api_token: "test-token".to_string(),
            name_generation_model: "@cf/test/text".to_string(),
            prompt_enhancer_model: "@cf/test/text".to_string(),
            image_generation_model: "@cf/test/image".to_string(),
            image_to_image_model: "@cf/test/img2img".to_string(),
            allowed_origin: "https://example.test".to_string(),
            server_port: 0,
            upstream_max_retries: 0,
            upstream_retry_backoff: Duration::ZERO,
        }
    }
}
