use serde::Serialize;

use crate::geometry::{Position, Size};
use crate::gesture::{GesturePhase, ResizeDirection};
use crate::state::OverlayState;

use super::toolbar::{expand_label, lock_label, visibility_label};

/// Keeps the overlay above page content.
pub const OVERLAY_Z_INDEX: i32 = i32::MAX;

const CURSOR_IDLE: &str = "move";
const CURSOR_DRAGGING: &str = "grabbing";

/// Everything a view needs to draw one overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayFrame {
    pub position: Position,
    pub container_size: Option<Size>,
    pub z_index: i32,
    pub cursor: &'static str,
    pub image: Option<ImageNode>,
    pub handles: Vec<HandleNode>,
    pub toolbar: ToolbarView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageNode {
    pub src: Option<String>,
    pub opacity: f64,
    pub size: Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleNode {
    pub direction: ResizeDirection,
    pub visible: bool,
    pub cursor: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarView {
    pub expanded: bool,
    pub width: f64,
    pub height: f64,
    pub opacity: u8,
    pub lock_aspect_ratio: bool,
    pub is_visible_image: bool,
    pub lock_label: &'static str,
    pub visibility_label: &'static str,
    pub expand_label: &'static str,
}

/// UI flags that live beside the overlay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewFlags {
    pub hovered: bool,
    pub toolbar_expanded: bool,
    pub phase: GesturePhase,
}

pub fn render_frame(
    state: &OverlayState,
    image_source: Option<&str>,
    flags: ViewFlags,
) -> OverlayFrame {
    let visible = state.is_visible_image;
    let gesturing = flags.phase != GesturePhase::Idle;
    let handles = if visible {
        ResizeDirection::ALL
            .iter()
            .map(|&direction| HandleNode {
                direction,
                visible: flags.hovered || gesturing,
                cursor: direction.cursor(),
            })
            .collect()
    } else {
        Vec::new()
    };

    OverlayFrame {
        position: state.position,
        container_size: visible.then_some(state.size),
        z_index: OVERLAY_Z_INDEX,
        cursor: if flags.phase == GesturePhase::Dragging {
            CURSOR_DRAGGING
        } else {
            CURSOR_IDLE
        },
        image: visible.then(|| ImageNode {
            src: image_source.map(str::to_string),
            opacity: state.opacity_fraction(),
            size: state.size,
        }),
        handles,
        toolbar: ToolbarView {
            expanded: flags.toolbar_expanded,
            width: state.size.width,
            height: state.size.height,
            opacity: state.opacity,
            lock_aspect_ratio: state.lock_aspect_ratio,
            is_visible_image: visible,
            lock_label: lock_label(state),
            visibility_label: visibility_label(state),
            expand_label: expand_label(flags.toolbar_expanded),
        },
    }
}
