use crate::common::harness::SessionTestHarness;
use crossterm::event::KeyCode;
use triplog::app::Command;

#[test]
fn test_error_is_shown_exactly_once() {
    let mut harness = SessionTestHarness::new(100, 30).unwrap();
    harness.submit("03/04/2024");
    assert!(harness.session().mode().is_idle());

    harness.render().unwrap();
    harness.assert_screen_contains("Error: invalid date '03/04/2024': use YYYY-MM-DD");
    assert!(harness.session().error().is_none());

    harness.render().unwrap();
    harness.assert_screen_not_contains("Error:");
}

#[test]
fn test_notice_is_shown_exactly_once() {
    let mut harness = SessionTestHarness::new(100, 30).unwrap();
    harness.submit("2024-03-04");
    harness.press(KeyCode::Esc);
    harness.render().unwrap();
    harness.assert_screen_contains("Cancelled");
    harness.render().unwrap();
    harness.assert_screen_not_contains("Cancelled");
}

#[test]
fn test_starting_a_flow_mid_flow_is_rejected() {
    let mut harness = SessionTestHarness::new(100, 30).unwrap();
    harness.submit("2024-03-04");
    harness.ctrl('x');
    harness.render().unwrap();
    harness.assert_screen_contains("Error: finish or cancel the current entry first (Esc)");
    harness.assert_screen_contains("New trip | Origin");
}

#[test]
fn test_edit_without_selection() {
    let mut harness = SessionTestHarness::new(100, 30).unwrap();
    harness.press(KeyCode::Tab);
    harness.ctrl('e');
    assert_eq!(harness.session().error(), Some("select a trip first"));
}

#[test]
fn test_ctrl_c_quits() {
    let mut harness = SessionTestHarness::new(100, 30).unwrap();
    assert_eq!(harness.ctrl('c'), Command::Quit);
    assert_eq!(harness.last_command(), Command::Quit);
}
