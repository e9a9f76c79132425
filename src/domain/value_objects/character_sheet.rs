//! Character detail sheet
//!
//! Intermediate artifact of the character pipeline: a structured description
//! of a character's stable visual attributes, written by the text model and
//! read by the portrait and full-body prompt builders.

use serde::Serialize;

/// Section headers the sheet is asked to contain, in order
pub const SHEET_SECTIONS: [&str; 5] = ["FACE", "HAIR", "ATTIRE", "ACCESSORIES", "PALETTE"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Face,
    Hair,
    Attire,
    Accessories,
    Palette,
}

impl Section {
    fn from_header(header: &str) -> Option<Self> {
        match header.to_ascii_uppercase().as_str() {
            "FACE" | "FACIAL FEATURES" => Some(Self::Face),
            "HAIR" | "HAIRSTYLE" => Some(Self::Hair),
            "ATTIRE" | "CLOTHING" | "OUTFIT" => Some(Self::Attire),
            "ACCESSORIES" => Some(Self::Accessories),
            "PALETTE" | "COLOR PALETTE" | "COLOUR PALETTE" | "COLORS" => Some(Self::Palette),
            _ => None,
        }
    }
}

/// Parsed character detail sheet
///
/// Sections the model omitted stay empty; `raw` always holds the full text
/// and is what downstream prompt builders receive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CharacterSheet {
    pub face: String,
    pub hair: String,
    pub attire: String,
    pub accessories: String,
    pub palette: String,
    #[serde(skip)]
    pub raw: String,
}

impl CharacterSheet {
    /// Parse model output leniently; lines outside a known section are ignored
    pub fn parse(text: &str) -> Self {
        let mut sheet = Self {
            raw: text.trim().to_string(),
            ..Self::default()
        };
        let mut current: Option<Section> = None;

        for line in text.lines() {
            let line = line.trim().trim_start_matches(['-', '*', '#']).trim();
            if line.is_empty() {
                continue;
            }

            if let Some((header, rest)) = line.split_once(':') {
                let header = header.trim().trim_matches('*').trim();
                if let Some(section) = Section::from_header(header) {
                    current = Some(section);
                    sheet.append(section, rest.trim().trim_start_matches('*').trim());
                    continue;
                }
            }

            if let Some(section) = current {
                sheet.append(section, line);
            }
        }

        sheet
    }

    /// True when the model produced no usable text at all
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Number of sections that received content
    pub fn filled_sections(&self) -> usize {
        [
            &self.face,
            &self.hair,
            &self.attire,
            &self.accessories,
            &self.palette,
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .count()
    }

    fn append(&mut self, section: Section, text: &str) {
        if text.is_empty() {
            return;
        }
        let target = match section {
            Section::Face => &mut self.face,
            Section::Hair => &mut self.hair,
            Section::Attire => &mut self.attire,
            Section::Accessories => &mut self.accessories,
            Section::Palette => &mut self.palette,
        };
        if !target.is_empty() {
            target.push(' ');
        }
        target.push_str(text);
    }
}
