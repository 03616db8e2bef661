use serde::{Deserialize, Serialize};

use crate::geometry::{Position, Size};

/// Every transition an overlay can take.
///
/// On the wire an action is `{"type": "SET_SIZE", "payload": {...}}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverlayAction {
    SetPosition(Position),
    SetSize(Size),
    SetAspectRatio(f64),
    ToggleLockAspectRatio,
    SetOpacity(u8),
    ToggleVisibility,
}

impl OverlayAction {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetPosition(_) => "SET_POSITION",
            Self::SetSize(_) => "SET_SIZE",
            Self::SetAspectRatio(_) => "SET_ASPECT_RATIO",
            Self::ToggleLockAspectRatio => "TOGGLE_LOCK_ASPECT_RATIO",
            Self::SetOpacity(_) => "SET_OPACITY",
            Self::ToggleVisibility => "TOGGLE_VISIBILITY",
        }
    }

    /// Decodes an action received from outside the process.
    ///
    /// Unknown action types and malformed payloads yield `None`.
    pub fn from_wire(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(action) => Some(action),
            Err(err) => {
                tracing::debug!(?err, "ignoring unrecognized overlay action");
                None
            }
        }
    }
}
