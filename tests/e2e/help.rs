use crate::common::harness::SessionTestHarness;
use crossterm::event::KeyCode;
use triplog::app::{ExpenseField, HelpLevel, Mode};

#[test]
fn test_help_levels_grow() {
    let mut harness = SessionTestHarness::new(100, 40).unwrap();

    harness.press(KeyCode::F(1));
    harness.render().unwrap();
    harness.assert_screen_contains("Help (level 1 of 3)");
    harness.assert_screen_contains("Navigation");
    harness.assert_screen_contains("Log an expense");
    harness.assert_screen_not_contains("Step through weeks");
    harness.assert_screen_not_contains("Tips");

    harness.press(KeyCode::F(2));
    harness.render().unwrap();
    harness.assert_screen_contains("Help (level 2 of 3)");
    harness.assert_screen_contains("Log an expense");
    harness.assert_screen_contains("Step through weeks");
    harness.assert_screen_not_contains("Tips");

    harness.press(KeyCode::F(3));
    harness.render().unwrap();
    harness.assert_screen_contains("Help (level 3 of 3)");
    harness.assert_screen_contains("Step through weeks");
    harness.assert_screen_contains("Tips");
    harness.assert_screen_contains("Round trips count the one-way distance twice");
    assert_eq!(harness.session().help().level, HelpLevel::Advanced);
}

#[test]
fn test_help_follows_active_tab() {
    let mut harness = SessionTestHarness::new(100, 40).unwrap();
    harness.press(KeyCode::Tab);
    harness.press(KeyCode::Tab);
    harness.press(KeyCode::F(1));
    harness.render().unwrap();
    harness.assert_screen_contains("Delete the selected expense");
    harness.assert_screen_not_contains("Search trips by place");
}

#[test]
fn test_help_is_drawn_over_main_view_and_esc_closes_it() {
    let mut harness = SessionTestHarness::new(100, 40).unwrap();
    harness.press(KeyCode::F(1));
    harness.render().unwrap();
    harness.assert_screen_contains("[Weekly Summaries]");
    harness.assert_screen_contains("Help (level 1 of 3)");

    harness.press(KeyCode::Esc);
    assert!(!harness.session().help().visible);
    harness.render().unwrap();
    harness.assert_screen_not_contains("Help (level");
    harness.assert_screen_contains("No weekly summaries yet");
}

#[test]
fn test_help_during_flow_keeps_flow() {
    let mut harness = SessionTestHarness::new(100, 40).unwrap();
    harness.ctrl('x');
    harness.press(KeyCode::F(2));
    harness.press(KeyCode::Esc);
    assert_eq!(harness.session().mode(), Mode::Expense(ExpenseField::Date));
    harness.press(KeyCode::Esc);
    assert!(harness.session().mode().is_idle());
}
