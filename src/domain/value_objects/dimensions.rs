//! Image dimension policy
//!
//! Diffusion backends only accept a narrow set of sizes. Requested sizes are
//! never rejected: each side is clamped into `[MIN_SIDE, MAX_SIDE]` and then
//! snapped to the nearest multiple of `SIDE_STEP` (ties round up).

pub const MIN_SIDE: u32 = 512;
pub const MAX_SIDE: u32 = 1024;
pub const SIDE_STEP: u32 = 256;
pub const DEFAULT_SIDE: u32 = 1024;

/// Width and height accepted by the image backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    /// Build dimensions from client input, substituting defaults for missing sides
    pub fn from_request(width: Option<i64>, height: Option<i64>) -> Self {
        Self {
            width: normalize_side(width),
            height: normalize_side(height),
        }
    }
}

impl Default for ImageDimensions {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIDE,
            height: DEFAULT_SIDE,
        }
    }
}

/// Clamp one side into range and snap it to the step grid
pub fn normalize_side(requested: Option<i64>) -> u32 {
    let Some(requested) = requested else {
        return DEFAULT_SIDE;
    };
    let clamped = requested.clamp(MIN_SIDE as i64, MAX_SIDE as i64) as u32;
    let snapped = ((clamped + SIDE_STEP / 2) / SIDE_STEP) * SIDE_STEP;
    snapped.clamp(MIN_SIDE, MAX_SIDE)
}
