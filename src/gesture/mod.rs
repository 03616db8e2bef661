//! Pointer-driven drag and resize gestures.

pub mod direction;
pub mod tracker;

pub use direction::{ResizeDirection, UnknownDirection};
pub use tracker::{
    drag_position, resize_geometry, DragSnapshot, EventDisposition, GesturePhase, GestureTracker,
    PointerOrigin, ResizeSnapshot,
};
