use super::event::OverlayAction;
use super::model::{OverlayState, MAX_OPACITY};

/// Applies one action to `state` and returns the next state.
///
/// The size floor, the opacity range and a positive finite aspect ratio are
/// enforced here so no caller can break them.
pub fn reduce(state: &OverlayState, action: &OverlayAction) -> OverlayState {
    let mut next = *state;
    match *action {
        OverlayAction::SetPosition(position) => next.position = position,
        OverlayAction::SetSize(size) => next.size = size.clamped_to_min(),
        OverlayAction::SetAspectRatio(ratio) => {
            if ratio.is_finite() && ratio > 0.0 {
                next.aspect_ratio = ratio;
            } else {
                tracing::warn!(ratio, "ignoring non-positive aspect ratio");
            }
        }
        OverlayAction::ToggleLockAspectRatio => next.lock_aspect_ratio = !state.lock_aspect_ratio,
        OverlayAction::SetOpacity(opacity) => next.opacity = opacity.min(MAX_OPACITY),
        OverlayAction::ToggleVisibility => next.is_visible_image = !state.is_visible_image,
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Position, Size};

    #[test]
    fn set_position_replaces_position_only() {
        let state = OverlayState::default();
        let next = reduce(
            &state,
            &OverlayAction::SetPosition(Position::new(200.0, 300.0)),
        );
        assert_eq!(next.position, Position::new(200.0, 300.0));
        assert_eq!(next.size, state.size);
    }

    #[test]
    fn set_position_accepts_negative_coordinates() {
        let next = reduce(
            &OverlayState::default(),
            &OverlayAction::SetPosition(Position::new(-40.5, -1.0)),
        );
        assert_eq!(next.position, Position::new(-40.5, -1.0));
    }

    #[test]
    fn set_size_replaces_size_and_enforces_floor() {
        let state = OverlayState::default();
        let next = reduce(&state, &OverlayAction::SetSize(Size::new(400.0, 300.0)));
        assert_eq!(next.size, Size::new(400.0, 300.0));
        assert_eq!(next.position, state.position);

        let floored = reduce(&state, &OverlayAction::SetSize(Size::new(3.0, -20.0)));
        assert_eq!(floored.size, Size::new(10.0, 10.0));
    }

    #[test]
    fn set_aspect_ratio_ignores_invalid_ratios() {
        let state = OverlayState::default();
        assert_eq!(
            reduce(&state, &OverlayAction::SetAspectRatio(1.5)).aspect_ratio,
            1.5
        );
        for ratio in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            assert_eq!(reduce(&state, &OverlayAction::SetAspectRatio(ratio)), state);
        }
    }

    #[test]
    fn toggles_flip_their_flags() {
        let state = OverlayState::default();
        let unlocked = reduce(&state, &OverlayAction::ToggleLockAspectRatio);
        assert!(!unlocked.lock_aspect_ratio);
        assert!(reduce(&unlocked, &OverlayAction::ToggleLockAspectRatio).lock_aspect_ratio);

        let hidden = reduce(&state, &OverlayAction::ToggleVisibility);
        assert!(!hidden.is_visible_image);
        assert!(reduce(&hidden, &OverlayAction::ToggleVisibility).is_visible_image);
    }

    #[test]
    fn toggle_lock_does_not_recompute_aspect_ratio() {
        let state = OverlayState {
            size: Size::new(300.0, 100.0),
            lock_aspect_ratio: false,
            ..OverlayState::default()
        };
        let locked = reduce(&state, &OverlayAction::ToggleLockAspectRatio);
        assert_eq!(locked.aspect_ratio, 1.0);
    }

    #[test]
    fn set_opacity_clamps_to_percent_range() {
        let state = OverlayState::default();
        assert_eq!(reduce(&state, &OverlayAction::SetOpacity(50)).opacity, 50);
        assert_eq!(reduce(&state, &OverlayAction::SetOpacity(0)).opacity, 0);
        assert_eq!(reduce(&state, &OverlayAction::SetOpacity(255)).opacity, 100);
    }

    #[test]
    fn reduce_is_pure_for_repeated_calls() {
        let state = OverlayState::default();
        let before = state;
        let action = OverlayAction::SetSize(Size::new(320.0, 240.0));
        let first = reduce(&state, &action);
        let second = reduce(&state, &action);
        assert_eq!(first, second);
        assert_eq!(state, before);
    }
}
