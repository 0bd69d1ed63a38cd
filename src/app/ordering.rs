//! Display orderings
//!
//! Lists are shown in a different order than they are stored. Every row keeps
//! the storage index of its item so selections and edits always address the
//! stored entity, whatever order it was shown in.

use crate::model::{Expense, Trip, TripTemplate};

/// An item paired with its position in storage
#[derive(Debug)]
pub struct Row<'a, T> {
    pub index: usize,
    pub item: &'a T,
}

impl<T> Clone for Row<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Row<'_, T> {}

/// Rows in storage order
pub fn indexed<T>(items: &[T]) -> Vec<Row<'_, T>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| Row { index, item })
        .collect()
}

/// Most recent first; among equal dates the later-recorded trip comes first
pub fn newest_trips_first(mut rows: Vec<Row<'_, Trip>>) -> Vec<Row<'_, Trip>> {
    rows.sort_by(|a, b| b.item.date.cmp(&a.item.date).then(b.index.cmp(&a.index)));
    rows
}

pub fn newest_expenses_first(mut rows: Vec<Row<'_, Expense>>) -> Vec<Row<'_, Expense>> {
    rows.sort_by(|a, b| b.item.date.cmp(&a.item.date).then(b.index.cmp(&a.index)));
    rows
}

/// Storage index of the first template with the same name, route and type.
///
/// Templates carry no identity of their own, so two templates identical in
/// all four fields resolve to the same (first) index.
pub fn resolve_template_index(templates: &[TripTemplate], wanted: &TripTemplate) -> Option<usize> {
    templates.iter().position(|t| {
        t.name == wanted.name
            && t.origin == wanted.origin
            && t.destination == wanted.destination
            && t.trip_type == wanted.trip_type
    })
}

/// Templates sorted by name, case-insensitively
pub fn templates_by_name(templates: &[TripTemplate]) -> Vec<Row<'_, TripTemplate>> {
    let mut sorted: Vec<&TripTemplate> = templates.iter().collect();
    sorted.sort_by_key(|t| t.name.to_lowercase());
    sorted
        .into_iter()
        .filter_map(|item| {
            resolve_template_index(templates, item).map(|index| Row { index, item })
        })
        .collect()
}

/// Display position of the row holding storage index `selected`
pub fn position_of<T>(rows: &[Row<'_, T>], selected: Option<usize>) -> Option<usize> {
    let selected = selected?;
    rows.iter().position(|row| row.index == selected)
}

/// Next display position with wraparound; from nothing, start at the top
pub fn step_down(len: usize, current: Option<usize>) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        Some(pos) if pos + 1 < len => pos + 1,
        _ => 0,
    })
}

/// Previous display position with wraparound; from nothing, start at the bottom
pub fn step_up(len: usize, current: Option<usize>) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        Some(pos) if pos > 0 && pos < len => pos - 1,
        _ => len - 1,
    })
}
