use super::ordering::Row;
use crate::model::{format_date, Trip};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

impl SearchState {
    pub fn start(&mut self) {
        self.active = true;
        self.query.clear();
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.query.clear();
    }
}

/// Whether `trip` matches `query` (case-insensitive substring of origin,
/// destination, date or type), spaces included. An empty query matches
/// everything.
pub fn trip_matches(trip: &Trip, query: &str) -> bool {
    let query = query.to_lowercase();
    if query.is_empty() {
        return true;
    }
    trip.origin.to_lowercase().contains(&query)
        || trip.destination.to_lowercase().contains(&query)
        || format_date(trip.date).contains(&query)
        || trip.trip_type.as_str().contains(&query)
}

/// Matching trips in storage order, each with its storage index
pub fn filter_trips<'a>(trips: &'a [Trip], query: &str) -> Vec<Row<'a, Trip>> {
    trips
        .iter()
        .enumerate()
        .filter(|(_, trip)| trip_matches(trip, query))
        .map(|(index, item)| Row { index, item })
        .collect()
}
