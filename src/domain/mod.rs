//! Domain layer - Generation vocabulary with no I/O
//!
//! This layer contains:
//! - Art direction: style and mood tables, quality keywords
//! - Image dimensions: the clamping policy for diffusion sizes
//! - Character sheet: the intermediate artifact of the character pipeline
//! - Image artifacts: generated payloads and their detected format

pub mod value_objects;
