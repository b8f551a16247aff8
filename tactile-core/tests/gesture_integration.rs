//! Gesture Integration Tests
//!
//! Drives a session end to end through raw gestures:
//! - Navigation and painting by swipe and tap
//! - Color menu browsing by swipe
//! - Hold thresholds and debounce
//! - Undo/redo with two-finger swipes

use tactile_core::gesture::PanGesture;
use tactile_core::{
    CanvasError, CanvasSession, GestureEvent, GestureInput, GridConfig, InputMode, Position,
};

/// Fresh 8x8 session.
fn session() -> CanvasSession {
    CanvasSession::new(GridConfig::new(8, 8).expect("config")).expect("session")
}

/// Fast single-finger swipe.
fn swipe(dx: f32, dy: f32, at: u64) -> GestureEvent {
    GestureEvent::new(GestureInput::Pan(PanGesture::new(dx, dy, dx * 10.0, dy * 10.0)), at)
}

/// Fast two-finger swipe.
fn two_finger_swipe(dx: f32, at: u64) -> GestureEvent {
    GestureEvent::new(
        GestureInput::Pan(PanGesture::new(dx, 0.0, dx * 10.0, 0.0).with_pointers(2)),
        at,
    )
}

fn tap(count: u8, pointers: u8, at: u64) -> GestureEvent {
    GestureEvent::new(GestureInput::Tap { count, pointers }, at)
}

fn hold(duration_ms: u64, at: u64) -> GestureEvent {
    GestureEvent::new(GestureInput::LongPress { duration_ms }, at)
}

// ============================================================================
// Navigation and painting
// ============================================================================

#[test]
fn test_swipe_and_double_tap_paints() {
    let mut s = session();
    s.handle_gesture(&swipe(80.0, 5.0, 1_000));
    s.handle_gesture(&swipe(5.0, 80.0, 1_300));
    let result = s.handle_gesture(&tap(2, 1, 1_600)).expect("paint");

    assert!(result.is_success());
    assert_eq!(result.position(), Some(Position::new(1, 1)));
    assert!(s.canvas().is_cell_painted(Position::new(1, 1)));
}

#[test]
fn test_swipe_into_edge_reports_boundary() {
    let mut s = session();
    let result = s.handle_gesture(&swipe(-80.0, 0.0, 1_000)).expect("result");
    assert!(matches!(result.error(), Some(CanvasError::BoundaryReached(_))));
    assert_eq!(s.focus(), Position::new(0, 0));
}

#[test]
fn test_single_tap_inspects() {
    let mut s = session();
    s.paint("yellow");
    let before = s.canvas().clone();
    let result = s.handle_gesture(&tap(1, 1, 1_000)).expect("inspect");
    assert_eq!(result.message(), "Row 0, column 0, yellow");
    assert_eq!(s.canvas(), &before);
}

#[test]
fn test_two_finger_tap_erases() {
    let mut s = session();
    s.paint("red");
    let result = s.handle_gesture(&tap(1, 2, 1_000)).expect("erase");
    assert!(result.is_success());
    assert!(s.canvas().is_empty());
}

#[test]
fn test_two_finger_double_tap_goes_home() {
    let mut s = session();
    s.set_focus(Position::new(5, 5));
    s.handle_gesture(&tap(2, 2, 1_000));
    assert_eq!(s.focus(), Position::new(0, 0));
}

// ============================================================================
// Color menu
// ============================================================================

#[test]
fn test_menu_browse_confirm_paint() {
    let mut s = session();
    s.handle_gesture(&hold(700, 1_000));
    assert_eq!(s.mode(), InputMode::Menu);

    s.handle_gesture(&swipe(80.0, 0.0, 1_300));
    s.handle_gesture(&swipe(80.0, 0.0, 1_600));
    // Vertical swipes are ignored while browsing.
    assert!(s.handle_gesture(&swipe(0.0, 80.0, 1_900)).is_none());
    let confirm = s.handle_gesture(&tap(2, 1, 2_200)).expect("confirm");
    assert_eq!(confirm.message(), "Selected red");
    assert_eq!(s.mode(), InputMode::Canvas);

    let paint = s.handle_gesture(&tap(2, 1, 2_500)).expect("paint");
    assert_eq!(paint.message(), "Painted red at row 0, column 0");
}

#[test]
fn test_menu_two_finger_tap_cancels() {
    let mut s = session();
    s.select_color("blue");
    s.handle_gesture(&hold(600, 1_000));
    s.handle_gesture(&swipe(-80.0, 0.0, 1_300));
    let cancel = s.handle_gesture(&tap(1, 2, 1_600)).expect("cancel");
    assert!(cancel.is_success());
    assert_eq!(s.selected_color().as_str(), "blue");
    assert!(s.canvas().is_empty());
}

#[test]
fn test_hold_toggles_menu() {
    let mut s = session();
    s.handle_gesture(&hold(600, 1_000));
    assert!(s.menu().is_open());
    s.handle_gesture(&hold(600, 2_000));
    assert!(!s.menu().is_open());
}

#[test]
fn test_extended_hold_announces_only() {
    let mut s = session();
    let result = s.handle_gesture(&hold(2_400, 1_000)).expect("announce");
    assert!(result.message().contains("Selected color black"));
    assert!(!s.menu().is_open());
}

#[test]
fn test_simultaneous_claims_resolve_by_priority() {
    let mut s = session();
    let result = s
        .handle_gestures(&[tap(1, 1, 1_000), hold(2_100, 1_000)])
        .expect("announce");
    assert!(result.message().contains("Selected color"));
    assert!(!s.menu().is_open());
}

// ============================================================================
// Debounce and history
// ============================================================================

#[test]
fn test_debounce_drops_rapid_repeats() {
    let mut s = session();
    assert!(s.handle_gesture(&swipe(80.0, 0.0, 1_000)).is_some());
    assert!(s.handle_gesture(&swipe(80.0, 0.0, 1_050)).is_none());
    assert_eq!(s.focus(), Position::new(0, 1));
}

#[test]
fn test_two_finger_swipes_undo_redo() {
    let mut s = session();
    s.handle_gesture(&tap(2, 1, 1_000));
    assert_eq!(s.canvas().painted_count(), 1);

    let undo = s.handle_gesture(&two_finger_swipe(-80.0, 1_300)).expect("undo");
    assert!(undo.is_success());
    assert!(s.canvas().is_empty());

    let redo = s.handle_gesture(&two_finger_swipe(80.0, 1_600)).expect("redo");
    assert!(redo.is_success());
    assert_eq!(s.canvas().painted_count(), 1);

    let none = s.handle_gesture(&two_finger_swipe(80.0, 1_900)).expect("redo");
    assert_eq!(none.error(), Some(&CanvasError::NothingToRedo));
}
