//! Prompt templates and text-model output handling

pub mod prompt_builder;
