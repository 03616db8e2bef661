use crate::geometry::{clamp_dimension, round_half_up, Position, Size, MIN_OVERLAY_SIZE};
use crate::state::model::MAX_OPACITY;
use crate::state::{OverlayAction, OverlayState};

/// Input from the overlay's toolbar controls.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarCommand {
    SetWidth(String),
    SetHeight(String),
    ToggleLockAspectRatio,
    FitToViewport(Size),
    ToggleVisibility,
    SetOpacity(String),
    ToggleExpanded,
    Delete,
}

/// Actions a toolbar command dispatches against `state`, in order.
///
/// `ToggleExpanded` and `Delete` act on the controller, not the state, and
/// yield nothing here.
pub fn toolbar_actions(command: &ToolbarCommand, state: &OverlayState) -> Vec<OverlayAction> {
    match command {
        ToolbarCommand::SetWidth(input) => {
            let width = parse_dimension_input(input);
            let height = if state.lock_aspect_ratio {
                clamp_dimension(round_half_up(width / state.aspect_ratio))
            } else {
                state.size.height
            };
            vec![OverlayAction::SetSize(Size::new(width, height))]
        }
        ToolbarCommand::SetHeight(input) => {
            let height = parse_dimension_input(input);
            let width = if state.lock_aspect_ratio {
                clamp_dimension(round_half_up(height * state.aspect_ratio))
            } else {
                state.size.width
            };
            vec![OverlayAction::SetSize(Size::new(width, height))]
        }
        ToolbarCommand::ToggleLockAspectRatio => {
            if state.lock_aspect_ratio {
                vec![OverlayAction::ToggleLockAspectRatio]
            } else {
                vec![
                    OverlayAction::SetAspectRatio(state.size.ratio()),
                    OverlayAction::ToggleLockAspectRatio,
                ]
            }
        }
        ToolbarCommand::FitToViewport(viewport) => {
            let width = viewport.width;
            let height = if state.lock_aspect_ratio {
                round_half_up(width / state.aspect_ratio)
            } else {
                viewport.height
            };
            vec![
                OverlayAction::SetSize(Size::new(width, height)),
                OverlayAction::SetPosition(Position::new(0.0, 0.0)),
            ]
        }
        ToolbarCommand::ToggleVisibility => vec![OverlayAction::ToggleVisibility],
        ToolbarCommand::SetOpacity(input) => match parse_leading_integer(input) {
            Some(value) => {
                let opacity = value.clamp(0, i64::from(MAX_OPACITY));
                vec![OverlayAction::SetOpacity(opacity as u8)]
            }
            None => {
                tracing::debug!(%input, "ignoring unparsable opacity input");
                Vec::new()
            }
        },
        ToolbarCommand::ToggleExpanded | ToolbarCommand::Delete => Vec::new(),
    }
}

/// Width/height field value: leading integer, floored to the minimum size.
/// Empty, unparsable and zero inputs all read as the minimum.
pub fn parse_dimension_input(input: &str) -> f64 {
    match parse_leading_integer(input) {
        Some(value) if value != 0 => clamp_dimension(value as f64),
        _ => MIN_OVERLAY_SIZE,
    }
}

/// Parses an optional sign and the digits that follow it, ignoring any
/// trailing text (`"12.7px"` reads as 12).
fn parse_leading_integer(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .bytes()
        .position(|byte| !byte.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

pub const fn lock_label(state: &OverlayState) -> &'static str {
    if state.lock_aspect_ratio {
        "Unlock aspect ratio"
    } else {
        "Lock aspect ratio"
    }
}

pub const fn visibility_label(state: &OverlayState) -> &'static str {
    if state.is_visible_image {
        "Hide image"
    } else {
        "Show image"
    }
}

pub const fn expand_label(expanded: bool) -> &'static str {
    if expanded {
        "Collapse toolbar"
    } else {
        "Expand toolbar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(size: Size, ratio: f64, locked: bool) -> OverlayState {
        OverlayState {
            size,
            aspect_ratio: ratio,
            lock_aspect_ratio: locked,
            ..OverlayState::default()
        }
    }

    #[test]
    fn dimension_input_follows_numeric_field_rules() {
        assert_eq!(parse_dimension_input("250"), 250.0);
        assert_eq!(parse_dimension_input(" 12.9"), 12.0);
        assert_eq!(parse_dimension_input("3"), 10.0);
        assert_eq!(parse_dimension_input("0"), 10.0);
        assert_eq!(parse_dimension_input("-40"), 10.0);
        assert_eq!(parse_dimension_input(""), 10.0);
        assert_eq!(parse_dimension_input("wide"), 10.0);
    }

    #[test]
    fn width_input_derives_height_when_locked() {
        let locked = state(Size::new(200.0, 100.0), 2.0, true);
        assert_eq!(
            toolbar_actions(&ToolbarCommand::SetWidth("301".to_string()), &locked),
            vec![OverlayAction::SetSize(Size::new(301.0, 151.0))]
        );

        let unlocked = state(Size::new(200.0, 100.0), 2.0, false);
        assert_eq!(
            toolbar_actions(&ToolbarCommand::SetWidth("301".to_string()), &unlocked),
            vec![OverlayAction::SetSize(Size::new(301.0, 100.0))]
        );
    }

    #[test]
    fn height_input_derives_width_when_locked() {
        let locked = state(Size::new(200.0, 100.0), 0.5, true);
        assert_eq!(
            toolbar_actions(&ToolbarCommand::SetHeight("15".to_string()), &locked),
            vec![OverlayAction::SetSize(Size::new(10.0, 15.0))]
        );
    }

    #[test]
    fn locking_recomputes_ratio_from_current_size_first() {
        let unlocked = state(Size::new(300.0, 100.0), 1.0, false);
        assert_eq!(
            toolbar_actions(&ToolbarCommand::ToggleLockAspectRatio, &unlocked),
            vec![
                OverlayAction::SetAspectRatio(3.0),
                OverlayAction::ToggleLockAspectRatio
            ]
        );

        let locked = state(Size::new(300.0, 100.0), 1.0, true);
        assert_eq!(
            toolbar_actions(&ToolbarCommand::ToggleLockAspectRatio, &locked),
            vec![OverlayAction::ToggleLockAspectRatio]
        );
    }

    #[test]
    fn fit_to_viewport_moves_to_origin() {
        let viewport = Size::new(1280.0, 720.0);
        let locked = state(Size::new(400.0, 300.0), 4.0 / 3.0, true);
        assert_eq!(
            toolbar_actions(&ToolbarCommand::FitToViewport(viewport), &locked),
            vec![
                OverlayAction::SetSize(Size::new(1280.0, 960.0)),
                OverlayAction::SetPosition(Position::new(0.0, 0.0)),
            ]
        );

        let unlocked = state(Size::new(400.0, 300.0), 4.0 / 3.0, false);
        assert_eq!(
            toolbar_actions(&ToolbarCommand::FitToViewport(viewport), &unlocked)[0],
            OverlayAction::SetSize(viewport)
        );
    }

    #[test]
    fn opacity_input_is_clamped_or_ignored() {
        let state = OverlayState::default();
        assert_eq!(
            toolbar_actions(&ToolbarCommand::SetOpacity("50".to_string()), &state),
            vec![OverlayAction::SetOpacity(50)]
        );
        assert_eq!(
            toolbar_actions(&ToolbarCommand::SetOpacity("250".to_string()), &state),
            vec![OverlayAction::SetOpacity(100)]
        );
        assert_eq!(
            toolbar_actions(&ToolbarCommand::SetOpacity("-5".to_string()), &state),
            vec![OverlayAction::SetOpacity(0)]
        );
        assert!(toolbar_actions(&ToolbarCommand::SetOpacity("x".to_string()), &state).is_empty());
    }

    #[test]
    fn labels_describe_the_next_action() {
        let state = OverlayState::default();
        assert_eq!(lock_label(&state), "Unlock aspect ratio");
        assert_eq!(visibility_label(&state), "Hide image");
        assert_eq!(expand_label(true), "Collapse toolbar");

        let toggled = OverlayState {
            lock_aspect_ratio: false,
            is_visible_image: false,
            ..state
        };
        assert_eq!(lock_label(&toggled), "Lock aspect ratio");
        assert_eq!(visibility_label(&toggled), "Show image");
        assert_eq!(expand_label(false), "Expand toolbar");
    }
}
