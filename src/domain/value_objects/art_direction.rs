//! Art direction tables for prompt enhancement
//!
//! Styles and moods are short keywords supplied by clients ("anime", "grim").
//! Each keyword maps to a descriptive phrase that is injected into the
//! enhancer's system instruction. Lookups are total: an unknown keyword
//! degrades to a generic descriptor instead of failing the request.

/// Style keyword used when the client sends none
pub const DEFAULT_STYLE: &str = "fantasy";

/// Mood keyword used when the client sends none
pub const DEFAULT_MOOD: &str = "epic";

/// Descriptor used for style keywords missing from [`STYLE_TABLE`]
pub const DEFAULT_STYLE_DESCRIPTOR: &str =
    "high-quality digital art with rich detail and a cohesive color palette";

/// Descriptor used for mood keywords missing from [`MOOD_TABLE`]
pub const DEFAULT_MOOD_DESCRIPTOR: &str =
    "balanced cinematic lighting with natural shadows and depth";

pub const STYLE_TABLE: &[(&str, &str)] = &[
    (
        "fantasy",
        "digital fantasy painting, high contrast, soft shadows, fantasy concept art",
    ),
    (
        "realistic",
        "hyper-realistic photography style, lifelike skin and fabric textures, shallow depth of field",
    ),
    (
        "anime",
        "anime illustration, clean line art, cel shading, vibrant saturated colors",
    ),
    (
        "oil-painting",
        "classical oil painting, visible brush strokes, rich glazes, old-master composition",
    ),
    (
        "watercolor",
        "delicate watercolor illustration, soft washes, bleeding pigments, textured paper",
    ),
    (
        "dark-fantasy",
        "grimdark fantasy art, muted desaturated palette, heavy atmosphere, gothic detail",
    ),
    (
        "pixel-art",
        "detailed pixel art, limited palette, crisp pixel edges, retro RPG sprite aesthetic",
    ),
    (
        "comic",
        "comic book illustration, bold inks, halftone shading, dynamic framing",
    ),
];

pub const MOOD_TABLE: &[(&str, &str)] = &[
    (
        "epic",
        "dramatic cinematic lighting, god rays, heroic low-angle composition",
    ),
    (
        "mysterious",
        "low-key lighting, drifting fog, deep shadows hiding half the scene",
    ),
    (
        "grim",
        "cold overcast light, harsh rim lighting, bleak and weathered atmosphere",
    ),
    (
        "serene",
        "soft golden-hour light, gentle haze, calm and peaceful atmosphere",
    ),
    (
        "heroic",
        "bright key light, triumphant pose, warm highlights against a stormy sky",
    ),
    (
        "whimsical",
        "playful pastel lighting, sparkling particles, storybook charm",
    ),
    (
        "menacing",
        "underlighting from embers, red and black palette, looming silhouette",
    ),
];

/// Keywords that mark a prompt as already carrying quality guidance
pub const QUALITY_KEYWORDS: &[&str] = &[
    "8k",
    "4k",
    "uhd",
    "ultra-detailed",
    "ultra detailed",
    "highly detailed",
    "high resolution",
    "masterpiece",
    "artstation",
];

/// Appended to enhanced prompts that carry none of [`QUALITY_KEYWORDS`]
pub const QUALITY_SUFFIX: &str =
    "ultra-detailed, 8k resolution, cinematic lighting, trending on ArtStation";

/// Resolved art direction for one enhancement request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtDirection {
    pub style: String,
    pub mood: String,
}

impl ArtDirection {
    pub fn new(style: impl Into<String>, mood: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            mood: mood.into(),
        }
    }

    pub fn style_descriptor(&self) -> &'static str {
        lookup(STYLE_TABLE, &self.style).unwrap_or(DEFAULT_STYLE_DESCRIPTOR)
    }

    pub fn mood_descriptor(&self) -> &'static str {
        lookup(MOOD_TABLE, &self.mood).unwrap_or(DEFAULT_MOOD_DESCRIPTOR)
    }
}

impl Default for ArtDirection {
    fn default() -> Self {
        Self::new(DEFAULT_STYLE, DEFAULT_MOOD)
    }
}

fn lookup(table: &[(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    let key = key.trim();
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, descriptor)| *descriptor)
}

/// Check whether a prompt already contains one of [`QUALITY_KEYWORDS`]
pub fn has_quality_keyword(prompt: &str) -> bool {
    let lowered = prompt.to_lowercase();
    QUALITY_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_style_and_mood() {
        let direction = ArtDirection::new("anime", "serene");
        assert!(direction.style_descriptor().contains("cel shading"));
        assert!(direction.mood_descriptor().contains("golden-hour"));
    }

    #[test]
    fn test_lookup_ignores_case_and_whitespace() {
        let direction = ArtDirection::new("  Dark-Fantasy ", "MYSTERIOUS");
        assert!(direction.style_descriptor().contains("grimdark"));
        assert!(direction.mood_descriptor().contains("fog"));
    }

    #[test]
    fn test_unknown_keys_fall_back() {
        let direction = ArtDirection::new("vaporwave", "");
        assert_eq!(direction.style_descriptor(), DEFAULT_STYLE_DESCRIPTOR);
        assert_eq!(direction.mood_descriptor(), DEFAULT_MOOD_DESCRIPTOR);
    }

    #[test]
    fn test_default_direction_is_in_tables() {
        let direction = ArtDirection::default();
        assert_ne!(direction.style_descriptor(), DEFAULT_STYLE_DESCRIPTOR);
        assert_ne!(direction.mood_descriptor(), DEFAULT_MOOD_DESCRIPTOR);
    }

    #[test]
    fn test_quality_keyword_detection() {
        assert!(has_quality_keyword("A knight, 8K wallpaper"));
        assert!(has_quality_keyword("trending on ArtStation"));
        assert!(!has_quality_keyword("A knight in a field"));
        assert!(has_quality_keyword(QUALITY_SUFFIX));
    }
}
