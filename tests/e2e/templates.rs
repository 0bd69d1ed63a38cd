use crate::common::harness::{template, SessionTestHarness};
use crossterm::event::KeyCode;
use triplog::app::{Mode, Tab, TemplateField, TripField};
use triplog::model::{DataSet, RecurringTrip, TripType};

fn zoo_data() -> DataSet {
    let mut data = DataSet::default();
    data.templates.push(template("Zebra", "Home", "Zoo"));
    data.templates.push(template("apple", "Home", "Office"));
    data.templates.push(template("Banana", "Home", "Market"));
    data
}

fn selected_name(harness: &SessionTestHarness) -> Option<String> {
    let session = harness.session();
    session
        .selection()
        .template
        .map(|index| session.data().templates[index].name.clone())
}

fn open_templates_tab(harness: &mut SessionTestHarness) {
    harness.press(KeyCode::BackTab);
    assert_eq!(harness.session().tab(), Tab::Templates);
}

#[test]
fn test_templates_listed_alphabetically_ignoring_case() {
    let mut harness = SessionTestHarness::with_data(100, 30, zoo_data(), 5).unwrap();
    open_templates_tab(&mut harness);
    harness.render().unwrap();

    let screen = harness.screen_to_string();
    let apple = screen.find("apple  Home -> Office").unwrap();
    let banana = screen.find("Banana  Home -> Market").unwrap();
    let zebra = screen.find("Zebra  Home -> Zoo").unwrap();
    assert!(apple < banana && banana < zebra);
    harness.assert_screen_contains("No recurring trips. Press Ctrl+R to create one.");
}

#[test]
fn test_down_walks_display_order_and_wraps() {
    let mut harness = SessionTestHarness::with_data(100, 30, zoo_data(), 5).unwrap();
    open_templates_tab(&mut harness);

    let mut seen = Vec::new();
    for _ in 0..4 {
        harness.press(KeyCode::Down);
        seen.push(selected_name(&harness).unwrap());
    }
    assert_eq!(seen, ["apple", "Banana", "Zebra", "apple"]);

    harness.press(KeyCode::Up);
    assert_eq!(selected_name(&harness).as_deref(), Some("Zebra"));
}

#[test]
fn test_selection_runs_on_into_recurring_trips() {
    let mut data = zoo_data();
    data.recurring_trips.push(RecurringTrip {
        origin: "Home".into(),
        destination: "Office".into(),
        trip_type: TripType::Single,
        miles: 10.0,
        start_date: crate::common::harness::date("2024-03-01"),
        end_date: None,
        weekday: 1,
    });
    let mut harness = SessionTestHarness::with_data(100, 30, data, 5).unwrap();
    open_templates_tab(&mut harness);

    for _ in 0..4 {
        harness.press(KeyCode::Down);
    }
    let selection = harness.session().selection();
    assert_eq!(selection.template, None);
    assert_eq!(selection.recurring, Some(0));

    harness.render().unwrap();
    harness.assert_screen_contains("> Every Monday  Home -> Office  single  10.0 mi  from 2024-03-01");

    harness.ctrl('e');
    assert!(harness.session().mode().is_idle());
    assert!(harness
        .session()
        .error()
        .unwrap_or_default()
        .contains("cannot be edited"));

    harness.press(KeyCode::Down);
    assert_eq!(selected_name(&harness).as_deref(), Some("apple"));
}

#[test]
fn test_create_template() {
    let mut harness = SessionTestHarness::new(100, 30).unwrap();
    harness.ctrl('t');
    assert_eq!(harness.session().mode(), Mode::Template(TemplateField::Name));
    harness.submit("Commute");
    harness.submit("Home");
    harness.submit("Office");
    harness.submit("Round");
    harness.submit("");

    let templates = &harness.session().data().templates;
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].trip_type, TripType::Round);
    assert_eq!(templates[0].notes, None);
    harness.render().unwrap();
    harness.assert_screen_contains("Saved template 'Commute'");
}

#[test]
fn test_edit_template_keeps_other_fields() {
    let mut harness = SessionTestHarness::with_data(100, 30, zoo_data(), 5).unwrap();
    open_templates_tab(&mut harness);
    harness.press(KeyCode::Down);
    harness.ctrl('e');
    assert_eq!(harness.session().edit_index(), Some(1));

    harness.clear_input();
    harness.submit("Apple run");
    for _ in 0..4 {
        harness.press(KeyCode::Enter);
    }

    let edited = &harness.session().data().templates[1];
    assert_eq!(edited.name, "Apple run");
    assert_eq!(edited.destination, "Office");
    assert_eq!(edited.trip_type, TripType::Round);
}

#[test]
fn test_use_template_logs_trip_with_its_route() {
    let mut harness = SessionTestHarness::with_data(100, 30, zoo_data(), 5).unwrap();
    open_templates_tab(&mut harness);
    harness.press(KeyCode::Down);
    harness.ctrl('u');

    assert_eq!(harness.session().tab(), Tab::Trips);
    assert_eq!(harness.session().mode(), Mode::Trip(TripField::Date));
    assert_eq!(harness.session().current_trip().origin, "Home");
    harness.render().unwrap();
    harness.assert_screen_contains("Using template 'apple': enter the trip date");

    harness.submit("2024-03-05");
    assert_eq!(harness.session().input().as_str(), "Home");
    harness.press(KeyCode::Enter);
    harness.press(KeyCode::Enter);
    harness.press(KeyCode::Enter);

    let trips = &harness.session().data().trips;
    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0].destination, "Office");
    assert_eq!(trips[0].trip_type, TripType::Round);
    assert_eq!(trips[0].miles, 10.0);
}

#[test]
fn test_use_template_needs_a_template() {
    let mut harness = SessionTestHarness::with_data(100, 30, zoo_data(), 5).unwrap();
    harness.ctrl('u');
    assert_eq!(harness.session().error(), Some("select a template first"));
    assert_eq!(harness.session().tab(), Tab::WeeklySummaries);
}
