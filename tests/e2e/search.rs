use crate::common::harness::{trip, SessionTestHarness};
use crossterm::event::KeyCode;
use proptest::prelude::*;
use triplog::app::{SessionEvent, Tab};
use triplog::model::DataSet;

fn three_trips() -> DataSet {
    let mut data = DataSet::default();
    data.trips.push(trip("2024-03-04", "Home", "Office", 10.0));
    data.trips.push(trip("2024-03-05", "Office", "Client", 4.2));
    data.trips.push(trip("2024-02-20", "Home", "Gym", 3.5));
    data
}

#[test]
fn test_search_filters_trips_list() {
    let mut harness = SessionTestHarness::with_data(100, 30, three_trips(), 5).unwrap();
    harness.ctrl('f');
    assert_eq!(harness.session().tab(), Tab::Trips);
    assert!(harness.session().search().active);

    harness.type_text("OFFICE");
    assert_eq!(harness.session().trip_rows().len(), 2);
    harness.render().unwrap();
    harness.assert_screen_contains("Search: OFFICE");
    harness.assert_screen_contains("Search trips: OFFICE");
    harness.assert_screen_contains("Office -> Client");
    harness.assert_screen_not_contains("Home -> Gym");

    harness.type_text("zzz");
    harness.render().unwrap();
    harness.assert_screen_contains("No trips match 'OFFICEzzz'.");

    harness.press(KeyCode::Enter);
    assert!(!harness.session().search().active);
    assert!(harness.session().search().query.is_empty());
    assert_eq!(harness.session().trip_rows().len(), 3);
    assert_eq!(harness.session().data().trips.len(), 3);
}

#[test]
fn test_search_matches_dates_and_types() {
    let mut harness = SessionTestHarness::with_data(100, 30, three_trips(), 5).unwrap();
    harness.ctrl('f');
    harness.type_text("2024-02");
    assert_eq!(harness.session().trip_rows().len(), 1);

    harness.ctrl('f');
    harness.ctrl('f');
    harness.type_text("single");
    assert_eq!(harness.session().trip_rows().len(), 3);
}

#[test]
fn test_edit_from_search_results() {
    let mut harness = SessionTestHarness::with_data(100, 30, three_trips(), 5).unwrap();
    harness.ctrl('f');
    harness.type_text("gym");
    harness.press(KeyCode::Down);
    assert_eq!(harness.session().selection().trip, Some(2));

    harness.ctrl('e');
    assert_eq!(harness.session().edit_index(), Some(2));
    assert!(!harness.session().search().active);
    assert_eq!(harness.session().input().as_str(), "2024-02-20");
}

#[test]
fn test_search_drops_selection_it_hides() {
    let mut harness = SessionTestHarness::with_data(100, 30, three_trips(), 5).unwrap();
    harness.press(KeyCode::Tab);
    for _ in 0..3 {
        harness.press(KeyCode::Down);
    }
    assert_eq!(harness.session().selection().trip, Some(2));

    harness.ctrl('f');
    assert_eq!(harness.session().selection().trip, Some(2));
    harness.type_text("office");
    assert_eq!(harness.session().selection().trip, None);

    harness.ctrl('d');
    assert!(harness.session().mode().is_idle());
    assert_eq!(harness.session().error(), Some("select a trip first"));
    assert_eq!(harness.session().data().trips.len(), 3);
}

#[test]
fn test_search_keeps_visible_selection() {
    let mut harness = SessionTestHarness::with_data(100, 30, three_trips(), 5).unwrap();
    harness.press(KeyCode::Tab);
    harness.press(KeyCode::Down);
    assert_eq!(harness.session().selection().trip, Some(1));

    harness.ctrl('f');
    harness.type_text("client");
    assert_eq!(harness.session().selection().trip, Some(1));
}

#[test]
fn test_search_requires_idle() {
    let mut harness = SessionTestHarness::with_data(100, 30, three_trips(), 5).unwrap();
    harness.submit("2024-03-06");
    harness.ctrl('f');
    assert!(!harness.session().search().active);
    assert!(harness.session().error().is_some());
}

#[test]
fn test_escape_leaves_search() {
    let mut harness = SessionTestHarness::with_data(100, 30, three_trips(), 5).unwrap();
    harness.ctrl('f');
    harness.type_text("gym");
    harness.press(KeyCode::Esc);
    assert!(!harness.session().search().active);
    assert_eq!(harness.session().trip_rows().len(), 3);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Searching never touches the data, and every shown row matches
    #[test]
    fn prop_search_is_read_only(query in "[a-zA-Z0-9 -]{0,8}") {
        let mut harness = SessionTestHarness::with_data(100, 30, three_trips(), 5).unwrap();
        let before = harness.session().data().trips.clone();

        harness.send(SessionEvent::ToggleSearch);
        harness.send(SessionEvent::Paste(query.clone()));

        let needle = query.to_lowercase();
        for row in harness.session().trip_rows() {
            let haystack = format!(
                "{} {} {} {}",
                row.item.origin, row.item.destination, row.item.date, row.item.trip_type
            )
            .to_lowercase();
            prop_assert!(needle.is_empty() || haystack.contains(&needle));
        }

        harness.send(SessionEvent::Cancel);
        prop_assert_eq!(&harness.session().data().trips, &before);
        prop_assert_eq!(harness.storage().save_count, 0);
        prop_assert_eq!(harness.session().trip_rows().len(), before.len());
    }
}
