//! Prompt building functions for text-model requests
//!
//! Every system instruction and user message the service sends upstream is
//! assembled here, together with the post-processing applied to what comes
//! back.

use crate::domain::value_objects::{
    has_quality_keyword, ArtDirection, QUALITY_SUFFIX, SHEET_SECTIONS,
};

/// Boilerplate that models like to put in front of the actual answer
const BOILERPLATE_PREFIXES: &[&str] = &[
    "output:",
    "result:",
    "enhanced prompt:",
    "prompt:",
    "answer:",
    "name:",
];

const NAME_SYSTEM_PROMPT: &str = "You are an expert in fantasy RPG name generation. \
Generate **one unique** first and last name for an RPG character.\n\
- Do NOT provide explanations, alternative names, or extra words.\n\
- Output ONLY the name in the format: \"Firstname Lastname\".";

const ENHANCER_EXAMPLE_INPUT: &str = "An elven archer in a forest";

const ENHANCER_EXAMPLE_OUTPUT: &str = "A lithe elven archer with braided silver hair \
draws a carved yew bow beneath towering ancient oaks, emerald light filtering through \
the canopy, intricate leaf-patterned leather armor, focused piercing green eyes";

/// Build the system + user pair for NPC name generation
pub fn build_name_messages(race: &str, gender: &str) -> (String, String) {
    (
        NAME_SYSTEM_PROMPT.to_string(),
        format!(
            "Provide a full fantasy name (first and last) for a {} {}.",
            gender, race
        ),
    )
}

/// Reduce a model's name answer to at most "Firstname Lastname"
pub fn truncate_to_name(raw: &str) -> String {
    strip_boilerplate(raw)
        .split_whitespace()
        .map(|token| {
            token
                .trim_matches('"')
                .trim_end_matches(['.', ',', ';', ':', '!', '"'])
        })
        .filter(|token| !token.is_empty())
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the enhancer's system instruction from art direction and client notes
pub fn build_enhancer_system_prompt(
    direction: &ArtDirection,
    custom_instructions: Option<&str>,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are an expert in crafting highly detailed, visually stunning AI prompts for fantasy portraits.\n",
    );
    prompt.push_str("Enhance the given description while ensuring it includes:\n");
    prompt.push_str("- Hyper-realistic, ultra-detailed features\n");
    prompt.push_str(&format!("- Artistic style: {}\n", direction.style_descriptor()));
    prompt.push_str(&format!(
        "- Mood and lighting: {}\n",
        direction.mood_descriptor()
    ));
    prompt.push_str(
        "- A **single character** in a **cohesive scene** without unnecessary backstory\n",
    );

    if let Some(instructions) = custom_instructions.map(str::trim).filter(|s| !s.is_empty()) {
        prompt.push_str(&format!("\nAdditional instructions: {}\n", instructions));
    }

    prompt.push_str("\nExample\n");
    prompt.push_str(&format!("Input: \"{}\"\n", ENHANCER_EXAMPLE_INPUT));
    prompt.push_str(&format!("Output: {}\n", ENHANCER_EXAMPLE_OUTPUT));
    prompt.push_str("\nRespond with ONLY the enhanced prompt as a single paragraph.");

    prompt
}

pub fn build_enhancer_user_message(prompt: &str) -> String {
    format!("Enhance this prompt for AI image generation: \"{}\"", prompt)
}

/// Clean up an enhanced prompt and make sure it carries quality keywords
///
/// Returns `None` when nothing usable remains after stripping boilerplate.
pub fn finalize_enhanced_prompt(raw: &str) -> Option<String> {
    let cleaned = strip_boilerplate(raw);
    if cleaned.is_empty() {
        return None;
    }

    if has_quality_keyword(&cleaned) {
        return Some(cleaned);
    }

    let separator = if cleaned.ends_with(['.', ',', ';']) {
        " "
    } else {
        ", "
    };
    Some(format!("{}{}{}", cleaned, separator, QUALITY_SUFFIX))
}

/// Remove leading "Output:"-style prefixes and wrapping quotes
pub fn strip_boilerplate(raw: &str) -> String {
    let mut text = raw.trim();
    loop {
        let before = text;
        for prefix in BOILERPLATE_PREFIXES {
            if text.len() >= prefix.len()
                && text.is_char_boundary(prefix.len())
                && text[..prefix.len()].eq_ignore_ascii_case(prefix)
            {
                text = text[prefix.len()..].trim_start();
            }
        }
        text = strip_wrapping_quotes(text.trim());
        if text == before {
            break;
        }
    }
    text.to_string()
}

fn strip_wrapping_quotes(text: &str) -> &str {
    let text = text.trim();
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        text[1..text.len() - 1].trim()
    } else {
        text.trim_matches('"').trim()
    }
}

// =============================================================================
// Character pipeline
// =============================================================================

const SHEET_SECTION_HINTS: [&str; 5] = [
    "face shape, eyes, skin, distinguishing marks",
    "color, length, style",
    "garments, armor, materials",
    "weapons, jewelry, carried items",
    "three to five dominant colors",
];

/// System instruction for the character detail sheet
pub fn build_character_sheet_system_prompt() -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "You are a character designer for a fantasy RPG. Describe the character's stable visual attributes so that an artist can draw them consistently in several images.\n",
    );
    prompt.push_str("Answer with exactly these five lines and nothing else:");
    for (section, hint) in SHEET_SECTIONS.iter().zip(SHEET_SECTION_HINTS) {
        prompt.push_str(&format!("\n{}: <{}>", section, hint));
    }
    prompt
}

pub fn build_character_sheet_user_message(prompt: &str) -> String {
    format!("Create a character detail sheet for: \"{}\"", prompt)
}

/// System instruction for the head-and-shoulders portrait prompt
pub fn build_portrait_system_prompt() -> String {
    "You write prompts for an image diffusion model. Using ONLY the character sheet provided, \
write one prompt for a head-and-shoulders portrait of the character. Describe the face, hair \
and the visible part of the attire precisely, keep every color from the palette, use a plain \
softly lit background. Respond with ONLY the prompt as a single paragraph."
        .to_string()
}

/// System instruction for the full-body prompt
pub fn build_full_body_system_prompt() -> String {
    "You write prompts for an image diffusion model. Using ONLY the character sheet provided, \
write one prompt for a full-body standing view of the same character, head to toe. Describe \
the complete attire and every accessory, keep the face, hair and palette identical to the \
sheet, use a simple neutral background. Respond with ONLY the prompt as a single paragraph."
        .to_string()
}

pub fn build_sheet_user_message(original_prompt: &str, sheet: &str) -> String {
    format!(
        "Character concept: \"{}\"\n\nCharacter sheet:\n{}",
        original_prompt, sheet
    )
}
