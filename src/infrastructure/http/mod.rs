//! HTTP REST API routes

mod cors;
mod error;
mod extract;
mod generation_routes;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::infrastructure::state::AppState;

use cors::cors_gate;
use error::ApiError;

pub use cors::CorsPolicy;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/generate-name",
            post(generation_routes::generate_name).fallback(method_not_allowed),
        )
        .route(
            "/prompt-enhancer",
            post(generation_routes::enhance_prompt).fallback(method_not_allowed),
        )
        .route(
            "/generate-image",
            post(generation_routes::generate_image).fallback(method_not_allowed),
        )
        .route(
            "/generate-enhanced-image",
            post(generation_routes::generate_enhanced_image).fallback(method_not_allowed),
        )
        .route(
            "/generate-character-images",
            post(generation_routes::generate_character_images).fallback(method_not_allowed),
        )
        .fallback(invalid_endpoint)
}

/// Routes plus the CORS gate and request tracing, ready to serve
///
/// A panicking handler still answers with a JSON 500, and the panic layer
/// sits inside the gate so that answer keeps its CORS header.
pub fn create_app(state: Arc<AppState>) -> Router {
    create_routes()
        .layer(CatchPanicLayer::custom(handler_panicked))
        .layer(middleware::from_fn_with_state(state.clone(), cors_gate))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    id = %Uuid::new_v4(),
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .with_state(state)
}

async fn invalid_endpoint() -> ApiError {
    ApiError::not_found("Invalid endpoint")
}

async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

fn handler_panicked(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Internal server error".to_string()
    };
    tracing::error!("Handler panicked: {}", message);
    ApiError::internal(message).into_response()
}
