//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - HTTP: REST API routes and the CORS gate
//! - Workers AI: text and image model client
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod http;
pub mod state;
pub mod workers_ai;
