//! A mounted image overlay: controller, toolbar, render model and the
//! document-level pointer listeners that drive it.

pub mod controller;
pub mod listeners;
pub mod toolbar;
pub mod view;

pub use controller::OverlayController;
pub use listeners::{
    mount, GlobalPointerHandler, ListenerRegistry, ListenerSubscription, MountedOverlay,
};
pub use toolbar::ToolbarCommand;
pub use view::{HandleNode, ImageNode, OverlayFrame, ToolbarView};
