use std::fmt;
use std::time::Duration;

use crate::geometry::{Position, Size};
use crate::gesture::{
    EventDisposition, GesturePhase, GestureTracker, PointerOrigin, ResizeDirection,
};
use crate::intake::IntakeMessage;
use crate::probe::{spawn_probe, NaturalSize, PendingProbe, ProbeStatus};
use crate::state::{reduce, OverlayAction, OverlayState};
use crate::svg::normalize_svg_data_url;

use super::listeners::GlobalPointerHandler;
use super::toolbar::{toolbar_actions, ToolbarCommand};
use super::view::{render_frame, OverlayFrame, ViewFlags};

/// One on-page overlay: its state, live gestures and view flags.
pub struct OverlayController {
    state: OverlayState,
    gestures: GestureTracker,
    image_data: Option<String>,
    image_source: Option<String>,
    on_delete: Box<dyn FnMut()>,
    hovered: bool,
    toolbar_expanded: bool,
    probe: Option<PendingProbe>,
    probe_timeout: Option<Duration>,
    deleted: bool,
}

impl fmt::Debug for OverlayController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayController")
            .field("state", &self.state)
            .field("gestures", &self.gestures)
            .field("has_image", &self.image_data.is_some())
            .field("hovered", &self.hovered)
            .field("toolbar_expanded", &self.toolbar_expanded)
            .field("probing", &self.probe.is_some())
            .field("deleted", &self.deleted)
            .finish()
    }
}

impl OverlayController {
    pub fn new(image_data: Option<String>, on_delete: impl FnMut() + 'static) -> Self {
        let image_source = normalize_svg_data_url(image_data.as_deref());
        Self {
            state: OverlayState::new(),
            gestures: GestureTracker::new(),
            image_data,
            image_source,
            on_delete: Box::new(on_delete),
            hovered: false,
            toolbar_expanded: true,
            probe: None,
            probe_timeout: None,
            deleted: false,
        }
    }

    /// Builds the overlay a picker surface asked for.
    pub fn from_message(message: IntakeMessage, on_delete: impl FnMut() + 'static) -> Self {
        Self::new(Some(message.into_image_data()), on_delete)
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn image_data(&self) -> Option<&str> {
        self.image_data.as_deref()
    }

    /// The data URL the view should display, stretched if it is an SVG.
    pub fn image_source(&self) -> Option<&str> {
        self.image_source.as_deref()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn toolbar_expanded(&self) -> bool {
        self.toolbar_expanded
    }

    /// Applies `action`; returns whether the state changed.
    pub fn dispatch(&mut self, action: OverlayAction) -> bool {
        let next = reduce(&self.state, &action);
        let changed = next != self.state;
        tracing::trace!(action = action.name(), changed, "dispatch");
        self.state = next;
        changed
    }

    /// Applies an action in its JSON wire form. Unknown or malformed actions
    /// leave the state alone.
    pub fn dispatch_wire(&mut self, json: &str) -> bool {
        OverlayAction::from_wire(json).is_some_and(|action| self.dispatch(action))
    }

    pub fn pointer_down_surface(
        &mut self,
        pointer: Position,
        origin: PointerOrigin,
    ) -> EventDisposition {
        self.gestures.begin_drag(pointer, origin, &self.state)
    }

    pub fn pointer_down_handle(
        &mut self,
        direction: ResizeDirection,
        pointer: Position,
    ) -> EventDisposition {
        if !self.state.is_visible_image {
            return EventDisposition::PassThrough;
        }
        self.gestures.begin_resize(direction, pointer, &self.state)
    }

    pub fn pointer_move(&mut self, pointer: Position) {
        for action in self.gestures.pointer_move(pointer, &self.state) {
            self.dispatch(action);
        }
    }

    pub fn pointer_up(&mut self) {
        self.gestures.end();
    }

    pub fn pointer_enter(&mut self) {
        self.hovered = true;
    }

    pub fn pointer_leave(&mut self) {
        self.hovered = false;
    }

    pub fn gesture_phase(&self) -> GesturePhase {
        self.gestures.phase()
    }

    pub fn is_gesturing(&self) -> bool {
        self.gestures.is_active()
    }

    /// Adopts the image's natural size and ratio once it has loaded.
    pub fn on_image_loaded(&mut self, natural: NaturalSize) -> bool {
        let Some(ratio) = natural.aspect_ratio() else {
            tracing::warn!(?natural, "image reported zero dimensions; keeping current size");
            return false;
        };
        let size = Size::new(f64::from(natural.width), f64::from(natural.height));
        let resized = self.dispatch(OverlayAction::SetSize(size));
        let reratioed = self.dispatch(OverlayAction::SetAspectRatio(ratio));
        tracing::debug!(width = natural.width, height = natural.height, "image loaded");
        resized || reratioed
    }

    /// Starts measuring the current image in the background. A probe already
    /// in flight is abandoned, and every later image replacement is measured
    /// with the same `timeout`.
    pub fn start_probe(&mut self, timeout: Duration) -> bool {
        self.probe_timeout = Some(timeout);
        self.probe = self
            .image_source
            .clone()
            .map(|source| spawn_probe(source, timeout));
        self.probe.is_some()
    }

    /// Non-blocking check on the probe; applies its result when it lands.
    /// `None` when no probe is in flight.
    pub fn poll_probe(&mut self) -> Option<ProbeStatus> {
        let status = self.probe.as_mut()?.poll();
        self.finish_probe(status);
        Some(status)
    }

    pub fn wait_for_probe(&mut self) -> Option<ProbeStatus> {
        let status = self.probe.as_mut()?.wait();
        self.finish_probe(status);
        Some(status)
    }

    fn finish_probe(&mut self, status: ProbeStatus) {
        if !status.is_finished() {
            return;
        }
        self.probe = None;
        if let ProbeStatus::Loaded(natural) = status {
            self.on_image_loaded(natural);
        }
    }

    /// Swaps the displayed image. Once probing has started, the new image is
    /// measured in turn.
    pub fn replace_image(&mut self, image_data: Option<String>) {
        if self.probe.take().is_some() {
            tracing::debug!("abandoning dimension probe for replaced image");
        }
        self.image_source = normalize_svg_data_url(image_data.as_deref());
        self.image_data = image_data;
        if let Some(timeout) = self.probe_timeout {
            self.start_probe(timeout);
        }
    }

    /// Runs a toolbar command; returns whether anything visible changed.
    pub fn apply_toolbar(&mut self, command: ToolbarCommand) -> bool {
        match command {
            ToolbarCommand::ToggleExpanded => {
                self.toolbar_expanded = !self.toolbar_expanded;
                true
            }
            ToolbarCommand::Delete => self.delete(),
            command => {
                let mut changed = false;
                for action in toolbar_actions(&command, &self.state) {
                    changed |= self.dispatch(action);
                }
                changed
            }
        }
    }

    /// Hands the overlay back to its owner for removal. Only the first call
    /// reaches `on_delete`.
    pub fn delete(&mut self) -> bool {
        if self.deleted {
            return false;
        }
        self.deleted = true;
        self.gestures.end();
        self.probe = None;
        tracing::debug!("overlay deleted");
        (self.on_delete)();
        true
    }

    pub fn render(&self) -> OverlayFrame {
        render_frame(
            &self.state,
            self.image_source.as_deref(),
            ViewFlags {
                hovered: self.hovered,
                toolbar_expanded: self.toolbar_expanded,
                phase: self.gestures.phase(),
            },
        )
    }
}

impl GlobalPointerHandler for OverlayController {
    fn global_pointer_move(&mut self, pointer: Position) {
        self.pointer_move(pointer);
    }

    fn global_pointer_up(&mut self) {
        self.pointer_up();
    }
}
