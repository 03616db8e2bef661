pub mod event;
pub mod model;
pub mod reducer;

pub use event::OverlayAction;
pub use model::OverlayState;
pub use reducer::reduce;
