//! Data Transfer Objects - For API boundaries
//!
//! DTOs live in the application layer so the HTTP layer can
//! serialize/deserialize without pulling serde into the services.

pub mod generation;

pub use generation::*;
