use crate::common::harness::{trip, template, SessionTestHarness};
use crossterm::event::KeyCode;
use triplog::app::{DeleteTarget, Mode};
use triplog::model::DataSet;

fn two_trips() -> DataSet {
    let mut data = DataSet::default();
    data.trips.push(trip("2024-03-04", "Home", "Office", 10.0));
    data.trips.push(trip("2024-03-05", "Office", "Client", 4.2));
    data
}

#[test]
fn test_yes_deletes_selected_trip() {
    let mut harness = SessionTestHarness::with_data(100, 30, two_trips(), 5).unwrap();
    harness.press(KeyCode::Tab);
    // newest first: the Client trip is the first row
    harness.press(KeyCode::Down);
    assert_eq!(harness.session().selection().trip, Some(1));

    harness.ctrl('d');
    assert_eq!(
        harness.session().mode(),
        Mode::ConfirmDelete(DeleteTarget::Trip(1))
    );
    harness.render().unwrap();
    harness.assert_screen_contains("Delete | Type 'yes' to delete this trip");
    harness.assert_screen_contains("* 2024-03-05  Office -> Client");

    harness.submit("yes");
    let trips = &harness.session().data().trips;
    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0].destination, "Office");
    assert_eq!(harness.storage().data.trips.len(), 1);
    assert!(harness.session().selection().is_empty());
    assert!(harness.session().mode().is_idle());

    harness.render().unwrap();
    harness.assert_screen_contains("Deleted the trip");
    harness.assert_screen_not_contains("Office -> Client");
}

#[test]
fn test_anything_but_exact_yes_keeps_entity() {
    for answer in ["Yes", "YES", "y", "no", " yes", ""] {
        let mut harness = SessionTestHarness::with_data(100, 30, two_trips(), 5).unwrap();
        harness.press(KeyCode::Tab);
        harness.press(KeyCode::Down);
        harness.ctrl('d');
        harness.submit(answer);

        assert_eq!(harness.session().data().trips.len(), 2, "answer {:?}", answer);
        assert_eq!(harness.storage().save_count, 0);
        assert!(harness.session().mode().is_idle());
        assert_eq!(harness.session().notice(), Some("Kept the trip"));
    }
}

#[test]
fn test_delete_needs_a_selection() {
    let mut harness = SessionTestHarness::with_data(100, 30, two_trips(), 5).unwrap();
    harness.press(KeyCode::Tab);
    harness.ctrl('d');
    assert!(harness.session().mode().is_idle());
    assert_eq!(harness.session().error(), Some("select a trip first"));
}

#[test]
fn test_delete_on_weekly_tab_is_rejected() {
    let mut harness = SessionTestHarness::with_data(100, 30, two_trips(), 5).unwrap();
    harness.ctrl('d');
    assert!(harness.session().mode().is_idle());
    assert!(harness.session().error().is_some());
}

#[test]
fn test_delete_expense() {
    let mut data = DataSet::default();
    data.expenses
        .push(crate::common::harness::expense("2024-03-05", 1250, "Parking"));
    let mut harness = SessionTestHarness::with_data(100, 30, data, 5).unwrap();
    harness.press(KeyCode::Tab);
    harness.press(KeyCode::Tab);
    harness.press(KeyCode::Down);
    harness.ctrl('d');
    harness.render().unwrap();
    harness.assert_screen_contains("Type 'yes' to delete this expense");
    harness.submit("yes");
    assert!(harness.session().data().expenses.is_empty());
}

#[test]
fn test_delete_template_by_display_position() {
    let mut data = DataSet::default();
    data.templates.push(template("Zebra", "Home", "Zoo"));
    data.templates.push(template("apple", "Home", "Orchard"));
    let mut harness = SessionTestHarness::with_data(100, 30, data, 5).unwrap();
    harness.press(KeyCode::BackTab);
    // first row alphabetically is "apple", stored at index 1
    harness.press(KeyCode::Down);
    harness.ctrl('d');
    assert_eq!(
        harness.session().mode(),
        Mode::ConfirmDelete(DeleteTarget::Template(1))
    );
    harness.submit("yes");

    let templates = &harness.session().data().templates;
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].name, "Zebra");
}
