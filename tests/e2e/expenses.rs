use crate::common::harness::{expense, SessionTestHarness};
use crossterm::event::KeyCode;
use rust_decimal::Decimal;
use triplog::app::{ExpenseField, Mode, Tab};
use triplog::model::DataSet;

#[test]
fn test_log_expense() {
    let mut harness = SessionTestHarness::new(100, 30).unwrap();
    harness.ctrl('x');
    assert_eq!(harness.session().mode(), Mode::Expense(ExpenseField::Date));
    harness.submit("2024-03-05");
    harness.submit("$12.50");
    harness.submit("Parking");

    let expenses = &harness.session().data().expenses;
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].amount, Decimal::new(1250, 2));
    assert_eq!(harness.storage().data.expenses.len(), 1);

    harness.render().unwrap();
    harness.assert_screen_contains("Logged expense $12.50 Parking");
    harness.assert_screen_contains("Expenses:       $12.50");
    harness.assert_screen_contains("Total:          $12.50");
}

#[test]
fn test_invalid_amount_stays_on_amount() {
    let mut harness = SessionTestHarness::new(100, 30).unwrap();
    harness.ctrl('x');
    harness.submit("2024-03-05");
    harness.submit("-3");

    assert_eq!(harness.session().mode(), Mode::Expense(ExpenseField::Amount));
    harness.render().unwrap();
    harness.assert_screen_contains("Error: invalid amount '-3'");
}

#[test]
fn test_missing_description_is_required() {
    let mut harness = SessionTestHarness::new(100, 30).unwrap();
    harness.ctrl('x');
    harness.submit("2024-03-05");
    harness.submit("4");
    harness.submit("   ");
    assert_eq!(harness.session().error(), Some("description is required"));
    assert!(harness.session().data().expenses.is_empty());
}

#[test]
fn test_edit_expense_amount() {
    let mut data = DataSet::default();
    data.expenses.push(expense("2024-03-01", 300, "Tolls"));
    data.expenses.push(expense("2024-03-05", 1250, "Parking"));
    let mut harness = SessionTestHarness::with_data(100, 30, data, 5).unwrap();

    harness.press(KeyCode::Tab);
    harness.press(KeyCode::Tab);
    assert_eq!(harness.session().tab(), Tab::Expenses);
    harness.render().unwrap();
    let screen = harness.screen_to_string();
    let parking = screen.find("2024-03-05  $12.50  Parking").unwrap();
    let tolls = screen.find("2024-03-01  $3.00  Tolls").unwrap();
    assert!(parking < tolls);

    harness.press(KeyCode::Down);
    assert_eq!(harness.session().selection().expense, Some(1));
    harness.ctrl('e');
    harness.press(KeyCode::Enter);
    harness.clear_input();
    harness.submit("15");
    harness.press(KeyCode::Enter);

    let edited = &harness.session().data().expenses[1];
    assert_eq!(edited.amount, Decimal::new(15, 0));
    assert_eq!(edited.description, "Parking");
    assert!(harness.session().mode().is_idle());
}
