//! Outbound ports - Interfaces that the application requires from external systems

mod image_generation_port;
mod text_generation_port;

#[cfg(test)]
pub mod mock;

pub use image_generation_port::{ImageGenerationPort, ImageRequest};
pub use text_generation_port::{CompletionRequest, SamplingParams, TextGenerationPort, TextModel};
