//! Shared geometric primitives for overlay placement and sizing.
use serde::{Deserialize, Serialize};

/// Smallest width or height an overlay may take on either axis.
pub const MIN_OVERLAY_SIZE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn delta_from(self, origin: Position) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Floors both axes to [`MIN_OVERLAY_SIZE`]. NaN collapses to the floor.
    pub fn clamped_to_min(self) -> Self {
        Self::new(clamp_dimension(self.width), clamp_dimension(self.height))
    }

    pub fn ratio(self) -> f64 {
        self.width / self.height
    }
}

pub fn clamp_dimension(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_OVERLAY_SIZE;
    }
    value.max(MIN_OVERLAY_SIZE)
}

/// Rounds to the nearest integer with halves going toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
