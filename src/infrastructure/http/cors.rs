//! CORS gate
//!
//! Runs in front of every route: answers preflight requests, serves the
//! welcome document for any GET or HEAD, and stamps the allowed origin onto every
//! other response, errors included.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::dto::WelcomeResponseDto;
use crate::infrastructure::state::AppState;

pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type";

const WELCOME_MESSAGE: &str = "Welcome to the Army of Me AI Service! \
Use POST requests for name generation, prompt enhancement, or image generation.";

/// Origin policy resolved from configuration at startup
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origin: HeaderValue,
}

impl CorsPolicy {
    pub fn new(allowed_origin: HeaderValue) -> Self {
        Self { allowed_origin }
    }

    /// `204 No Content` answer to an `OPTIONS` request
    pub fn preflight(&self) -> Response {
        let mut response = StatusCode::NO_CONTENT.into_response();
        let headers = response.headers_mut();
        self.apply(headers);
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        response
    }

    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allowed_origin.clone());
    }
}

/// Middleware applied to the whole router
pub async fn cors_gate(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    let mut response = match *request.method() {
        Method::OPTIONS => {
            tracing::debug!("Preflight request for {}", request.uri().path());
            return state.cors.preflight();
        }
        Method::GET | Method::HEAD => welcome().into_response(),
        _ => next.run(request).await,
    };
    state.cors.apply(response.headers_mut());
    response
}

fn welcome() -> Json<WelcomeResponseDto> {
    Json(WelcomeResponseDto {
        message: WELCOME_MESSAGE.to_string(),
    })
}
