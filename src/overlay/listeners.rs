use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::geometry::Position;

use super::controller::OverlayController;

/// Receiver of pointer events heard at document level.
pub trait GlobalPointerHandler {
    fn global_pointer_move(&mut self, pointer: Position);
    fn global_pointer_up(&mut self);
}

type HandlerRef = Weak<RefCell<dyn GlobalPointerHandler>>;

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    entries: Vec<(u64, HandlerRef)>,
}

/// Document-level pointer-move/pointer-up listeners.
///
/// Each subscription is one listener pair; it lives exactly as long as the
/// [`ListenerSubscription`] guard returned by [`ListenerRegistry::subscribe`].
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("active", &self.active_count())
            .finish()
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: HandlerRef) -> ListenerSubscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id = inner.next_id.wrapping_add(1);
        inner.entries.push((id, handler));
        tracing::debug!(
            id,
            active = inner.entries.len(),
            "global pointer listeners installed"
        );
        ListenerSubscription {
            id,
            registry: Rc::downgrade(&self.inner),
        }
    }

    pub fn active_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn pointer_move(&self, pointer: Position) {
        for handler in self.live_handlers() {
            handler.borrow_mut().global_pointer_move(pointer);
        }
    }

    pub fn pointer_up(&self) {
        for handler in self.live_handlers() {
            handler.borrow_mut().global_pointer_up();
        }
    }

    // Handlers run after the registry borrow is released so they may
    // subscribe or unsubscribe while handling an event.
    fn live_handlers(&self) -> Vec<Rc<RefCell<dyn GlobalPointerHandler>>> {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter_map(|(_, handler)| handler.upgrade())
            .collect()
    }
}

/// Removes its listener pair from the registry when dropped.
#[derive(Debug)]
pub struct ListenerSubscription {
    id: u64,
    registry: Weak<RefCell<RegistryInner>>,
}

impl Drop for ListenerSubscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut inner = registry.borrow_mut();
        inner.entries.retain(|(id, _)| *id != self.id);
        tracing::debug!(
            id = self.id,
            active = inner.entries.len(),
            "global pointer listeners removed"
        );
    }
}

/// An overlay whose view is mounted and listening for global pointer events.
#[derive(Debug)]
pub struct MountedOverlay {
    controller: Rc<RefCell<OverlayController>>,
    _subscription: ListenerSubscription,
}

impl MountedOverlay {
    pub fn controller(&self) -> &Rc<RefCell<OverlayController>> {
        &self.controller
    }

    /// Tears the view down, releasing its listener pair.
    pub fn unmount(self) -> Rc<RefCell<OverlayController>> {
        self.controller.clone()
    }
}

pub fn mount(
    registry: &ListenerRegistry,
    controller: Rc<RefCell<OverlayController>>,
) -> MountedOverlay {
    let handler: Rc<RefCell<dyn GlobalPointerHandler>> = controller.clone();
    let subscription = registry.subscribe(Rc::downgrade(&handler));
    MountedOverlay {
        controller,
        _subscription: subscription,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::PointerOrigin;

    fn overlay() -> Rc<RefCell<OverlayController>> {
        Rc::new(RefCell::new(OverlayController::new(None, || {})))
    }

    #[test]
    fn mount_installs_exactly_one_pair_and_unmount_removes_it() {
        let registry = ListenerRegistry::new();
        for _ in 0..5 {
            let mounted = mount(&registry, overlay());
            assert_eq!(registry.active_count(), 1);
            let _ = mounted.unmount();
            assert_eq!(registry.active_count(), 0);
        }
    }

    #[test]
    fn pointer_up_anywhere_ends_the_gesture() {
        let registry = ListenerRegistry::new();
        let mounted = mount(&registry, overlay());
        mounted
            .controller()
            .borrow_mut()
            .pointer_down_surface(Position::new(150.0, 150.0), PointerOrigin::Surface);

        registry.pointer_move(Position::new(-20.0, 5000.0));
        assert_eq!(
            mounted.controller().borrow().state().position,
            Position::new(-70.0, 4950.0)
        );

        registry.pointer_up();
        assert!(!mounted.controller().borrow().is_gesturing());
        registry.pointer_move(Position::new(0.0, 0.0));
        assert_eq!(
            mounted.controller().borrow().state().position,
            Position::new(-70.0, 4950.0)
        );
    }

    #[test]
    fn events_reach_every_mounted_overlay_independently() {
        let registry = ListenerRegistry::new();
        let first = mount(&registry, overlay());
        let second = mount(&registry, overlay());
        assert_eq!(registry.active_count(), 2);

        first
            .controller()
            .borrow_mut()
            .pointer_down_surface(Position::new(0.0, 0.0), PointerOrigin::Surface);
        registry.pointer_move(Position::new(10.0, 10.0));

        assert_eq!(
            first.controller().borrow().state().position,
            Position::new(110.0, 110.0)
        );
        assert_eq!(
            second.controller().borrow().state().position,
            Position::new(100.0, 100.0)
        );

        drop(first);
        assert_eq!(registry.active_count(), 1);
    }

    #[test]
    fn dropped_registry_does_not_break_subscription_drop() {
        let registry = ListenerRegistry::new();
        let mounted = mount(&registry, overlay());
        drop(registry);
        drop(mounted);
    }
}
