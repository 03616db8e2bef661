use serde::{Deserialize, Serialize};

use crate::geometry::{Position, Size};

pub const DEFAULT_POSITION: Position = Position::new(100.0, 100.0);
pub const DEFAULT_SIZE: Size = Size::new(200.0, 200.0);
pub const DEFAULT_ASPECT_RATIO: f64 = 1.0;
pub const MAX_OPACITY: u8 = 100;

/// Placement and presentation of a single overlay.
///
/// `aspect_ratio` is a recall point: it matches `size` right after an image
/// load or a lock toggle, and may drift while resizing unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayState {
    pub position: Position,
    pub size: Size,
    pub aspect_ratio: f64,
    pub lock_aspect_ratio: bool,
    pub opacity: u8,
    pub is_visible_image: bool,
}

impl OverlayState {
    pub const fn new() -> Self {
        Self {
            position: DEFAULT_POSITION,
            size: DEFAULT_SIZE,
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            lock_aspect_ratio: true,
            opacity: MAX_OPACITY,
            is_visible_image: true,
        }
    }

    pub fn opacity_fraction(&self) -> f64 {
        f64::from(self.opacity) / f64::from(MAX_OPACITY)
    }
}

impl Default for OverlayState {
    fn default() -> Self {
        Self::new()
    }
}
