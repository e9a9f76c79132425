//! Value objects shared by the generation pipelines

mod art_direction;
mod character_sheet;
mod dimensions;
mod image_artifact;

pub use art_direction::*;
pub use character_sheet::{CharacterSheet, SHEET_SECTIONS};
pub use dimensions::ImageDimensions;
pub use image_artifact::{ImageArtifact, ImageFormat};
