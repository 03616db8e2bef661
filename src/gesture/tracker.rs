use crate::geometry::{clamp_dimension, round_half_up, Position, Size};
use crate::state::{OverlayAction, OverlayState};

use super::direction::ResizeDirection;

/// Kind of element a pointer-down originated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOrigin {
    Surface,
    TextInput,
    Button,
    Label,
}

impl PointerOrigin {
    pub const fn is_interactive_control(self) -> bool {
        !matches!(self, Self::Surface)
    }
}

/// What the view should do with the pointer-down it forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// Leave the event to its target untouched.
    PassThrough,
    /// Suppress the default action.
    Captured,
    /// Suppress the default action and stop bubbling to the surface.
    CapturedStopPropagation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSnapshot {
    pub start_pointer: Position,
    pub start_position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSnapshot {
    pub direction: ResizeDirection,
    pub start_pointer: Position,
    pub start_size: Size,
    pub start_position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging,
    Resizing(ResizeDirection),
}

/// Tracks the live drag and resize gestures of one overlay.
///
/// Both slots are independent; the view only ever starts one per pointer
/// session, and a move feeds whichever is live.
#[derive(Debug, Default)]
pub struct GestureTracker {
    drag: Option<DragSnapshot>,
    resize: Option<ResizeSnapshot>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GesturePhase {
        match (self.resize, self.drag) {
            (Some(resize), _) => GesturePhase::Resizing(resize.direction),
            (None, Some(_)) => GesturePhase::Dragging,
            (None, None) => GesturePhase::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn resizing(&self) -> Option<ResizeDirection> {
        self.resize.map(|snapshot| snapshot.direction)
    }

    pub fn is_active(&self) -> bool {
        self.drag.is_some() || self.resize.is_some()
    }

    pub fn begin_drag(
        &mut self,
        pointer: Position,
        origin: PointerOrigin,
        state: &OverlayState,
    ) -> EventDisposition {
        if origin.is_interactive_control() {
            tracing::trace!(?origin, "pointer-down on control; drag not started");
            return EventDisposition::PassThrough;
        }
        self.drag = Some(DragSnapshot {
            start_pointer: pointer,
            start_position: state.position,
        });
        tracing::debug!(x = pointer.x, y = pointer.y, "drag started");
        EventDisposition::Captured
    }

    pub fn begin_resize(
        &mut self,
        direction: ResizeDirection,
        pointer: Position,
        state: &OverlayState,
    ) -> EventDisposition {
        self.resize = Some(ResizeSnapshot {
            direction,
            start_pointer: pointer,
            start_size: state.size,
            start_position: state.position,
        });
        tracing::debug!(%direction, x = pointer.x, y = pointer.y, "resize started");
        EventDisposition::CapturedStopPropagation
    }

    /// Actions produced by one pointer-move, in dispatch order.
    ///
    /// Empty while idle. A resize always yields `SetSize` then `SetPosition`,
    /// even when neither changed.
    pub fn pointer_move(&self, pointer: Position, state: &OverlayState) -> Vec<OverlayAction> {
        let mut actions = Vec::with_capacity(3);
        if let Some(drag) = self.drag {
            actions.push(OverlayAction::SetPosition(drag_position(&drag, pointer)));
        }
        if let Some(resize) = self.resize {
            let lock_ratio = state
                .lock_aspect_ratio
                .then_some(state.aspect_ratio);
            let (size, position) = resize_geometry(&resize, pointer, lock_ratio);
            actions.push(OverlayAction::SetSize(size));
            actions.push(OverlayAction::SetPosition(position));
        }
        actions
    }

    pub fn end(&mut self) {
        if self.is_active() {
            tracing::debug!(phase = ?self.phase(), "gesture ended");
        }
        self.drag = None;
        self.resize = None;
    }
}

pub fn drag_position(snapshot: &DragSnapshot, pointer: Position) -> Position {
    let (dx, dy) = pointer.delta_from(snapshot.start_pointer);
    snapshot.start_position.offset(dx, dy)
}

/// Size and top-left position for a resize handle moved to `pointer`.
///
/// `lock_ratio` carries the width/height ratio to preserve, if locked. The
/// edge opposite the handle stays put; once the minimum size is hit the moving
/// edge stops.
pub fn resize_geometry(
    snapshot: &ResizeSnapshot,
    pointer: Position,
    lock_ratio: Option<f64>,
) -> (Size, Position) {
    let (dx, dy) = pointer.delta_from(snapshot.start_pointer);
    let direction = snapshot.direction;
    let Size {
        width: start_width,
        height: start_height,
    } = snapshot.start_size;
    let Position {
        x: start_x,
        y: start_y,
    } = snapshot.start_position;

    let mut width = start_width;
    let mut height = start_height;
    let mut x = start_x;
    let mut y = start_y;

    if direction.has_right() {
        width = clamp_dimension(start_width + dx);
    } else if direction.has_left() {
        width = clamp_dimension(start_width - dx);
        x = start_x + (start_width - width);
    }

    if direction.has_bottom() {
        height = clamp_dimension(start_height + dy);
    } else if direction.has_top() {
        height = clamp_dimension(start_height - dy);
        y = start_y + (start_height - height);
    }

    if let Some(ratio) = lock_ratio {
        if direction.is_vertical_only() {
            width = round_half_up(height * ratio);
        } else {
            height = round_half_up(width / ratio);
            if direction.has_top() {
                y = start_y + (start_height - height);
            }
        }
    }

    (
        Size::new(clamp_dimension(width), clamp_dimension(height)),
        Position::new(x, y),
    )
}
