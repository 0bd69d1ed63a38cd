//! Validation, mutation and aggregation over the data set
//!
//! Every mutating operation validates first and leaves the data set untouched
//! when validation fails. Aggregates are recomputed explicitly by the caller
//! via [`recalculate_weekly_summaries`].

use super::{DataSet, Expense, RecurringTrip, Trip, TripTemplate, WeeklySummary};
use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("miles must be a non-negative number")]
    InvalidMiles,
    #[error("expense amount must be greater than zero")]
    NonPositiveAmount,
    #[error("weekday {0} is out of range (0 = Sunday ... 6 = Saturday)")]
    InvalidWeekday(u8),
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("no {kind} at position {index}")]
    IndexOutOfRange { kind: &'static str, index: usize },
    #[error("{0} is incomplete")]
    Incomplete(&'static str),
}

fn require(value: &str, field: &'static str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        Err(DomainError::Empty(field))
    } else {
        Ok(())
    }
}

fn require_miles(miles: f64) -> Result<(), DomainError> {
    if miles.is_finite() && miles >= 0.0 {
        Ok(())
    } else {
        Err(DomainError::InvalidMiles)
    }
}

pub fn validate_trip(trip: &Trip) -> Result<(), DomainError> {
    require(&trip.origin, "origin")?;
    require(&trip.destination, "destination")?;
    require_miles(trip.miles)
}

pub fn validate_expense(expense: &Expense) -> Result<(), DomainError> {
    if expense.amount <= Decimal::ZERO {
        return Err(DomainError::NonPositiveAmount);
    }
    require(&expense.description, "description")
}

pub fn validate_recurring(recurring: &RecurringTrip) -> Result<(), DomainError> {
    require(&recurring.origin, "origin")?;
    require(&recurring.destination, "destination")?;
    require_miles(recurring.miles)?;
    if recurring.weekday > 6 {
        return Err(DomainError::InvalidWeekday(recurring.weekday));
    }
    match recurring.end_date {
        Some(end) if end < recurring.start_date => Err(DomainError::EndBeforeStart {
            start: recurring.start_date,
            end,
        }),
        _ => Ok(()),
    }
}

pub fn validate_template(template: &TripTemplate) -> Result<(), DomainError> {
    require(&template.name, "template name")?;
    require(&template.origin, "origin")?;
    require(&template.destination, "destination")
}

fn check_index<T>(items: &[T], index: usize, kind: &'static str) -> Result<(), DomainError> {
    if index < items.len() {
        Ok(())
    } else {
        Err(DomainError::IndexOutOfRange { kind, index })
    }
}

impl DataSet {
    pub fn add_trip(&mut self, trip: Trip) -> Result<(), DomainError> {
        validate_trip(&trip)?;
        self.trips.push(trip);
        Ok(())
    }

    pub fn edit_trip(&mut self, index: usize, trip: Trip) -> Result<(), DomainError> {
        check_index(&self.trips, index, "trip")?;
        validate_trip(&trip)?;
        self.trips[index] = trip;
        Ok(())
    }

    pub fn delete_trip(&mut self, index: usize) -> Result<Trip, DomainError> {
        check_index(&self.trips, index, "trip")?;
        Ok(self.trips.remove(index))
    }

    pub fn add_expense(&mut self, expense: Expense) -> Result<(), DomainError> {
        validate_expense(&expense)?;
        self.expenses.push(expense);
        Ok(())
    }

    pub fn edit_expense(&mut self, index: usize, expense: Expense) -> Result<(), DomainError> {
        check_index(&self.expenses, index, "expense")?;
        validate_expense(&expense)?;
        self.expenses[index] = expense;
        Ok(())
    }

    pub fn delete_expense(&mut self, index: usize) -> Result<Expense, DomainError> {
        check_index(&self.expenses, index, "expense")?;
        Ok(self.expenses.remove(index))
    }

    pub fn add_recurring(&mut self, recurring: RecurringTrip) -> Result<(), DomainError> {
        validate_recurring(&recurring)?;
        self.recurring_trips.push(recurring);
        Ok(())
    }

    pub fn edit_recurring(
        &mut self,
        index: usize,
        recurring: RecurringTrip,
    ) -> Result<(), DomainError> {
        check_index(&self.recurring_trips, index, "recurring trip")?;
        validate_recurring(&recurring)?;
        self.recurring_trips[index] = recurring;
        Ok(())
    }

    pub fn delete_recurring(&mut self, index: usize) -> Result<RecurringTrip, DomainError> {
        check_index(&self.recurring_trips, index, "recurring trip")?;
        Ok(self.recurring_trips.remove(index))
    }

    pub fn add_template(&mut self, template: TripTemplate) -> Result<(), DomainError> {
        validate_template(&template)?;
        self.templates.push(template);
        Ok(())
    }

    pub fn edit_template(&mut self, index: usize, template: TripTemplate) -> Result<(), DomainError> {
        check_index(&self.templates, index, "template")?;
        validate_template(&template)?;
        self.templates[index] = template;
        Ok(())
    }

    pub fn delete_template(&mut self, index: usize) -> Result<TripTemplate, DomainError> {
        check_index(&self.templates, index, "template")?;
        Ok(self.templates.remove(index))
    }

    /// Miles of an already-recorded route, if any trip or schedule covers it
    pub fn known_route_miles(&self, origin: &str, destination: &str) -> Option<f64> {
        let same = |a: &str, b: &str| a.trim().eq_ignore_ascii_case(b.trim());
        self.trips
            .iter()
            .rev()
            .filter(|t| t.has_miles())
            .find(|t| same(&t.origin, origin) && same(&t.destination, destination))
            .map(|t| t.miles)
            .or_else(|| {
                self.recurring_trips
                    .iter()
                    .filter(|r| r.miles > 0.0)
                    .find(|r| same(&r.origin, origin) && same(&r.destination, destination))
                    .map(|r| r.miles)
            })
    }
}

/// Sunday that starts the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

fn week_for(
    weeks: &mut BTreeMap<NaiveDate, WeeklySummary>,
    date: NaiveDate,
) -> &mut WeeklySummary {
    let start = week_start(date);
    weeks.entry(start).or_insert_with(|| WeeklySummary {
        week_start: start,
        week_end: start.checked_add_days(Days::new(6)).unwrap_or(start),
        total_miles: 0.0,
        reimbursement: Decimal::ZERO,
        total_expenses: Decimal::ZERO,
        trips: Vec::new(),
        expenses: Vec::new(),
    })
}

/// Rebuild `weekly_summaries` from trips and expenses, oldest week first
pub fn recalculate_weekly_summaries(data: &mut DataSet, rate_per_mile: Decimal) {
    let mut weeks: BTreeMap<NaiveDate, WeeklySummary> = BTreeMap::new();

    for trip in &data.trips {
        let week = week_for(&mut weeks, trip.date);
        week.total_miles += trip.driven_miles();
        week.trips.push(trip.clone());
    }
    for expense in &data.expenses {
        let week = week_for(&mut weeks, expense.date);
        week.total_expenses += expense.amount;
        week.expenses.push(expense.clone());
    }

    data.weekly_summaries = weeks
        .into_values()
        .map(|mut week| {
            let miles = Decimal::from_f64_retain(week.total_miles).unwrap_or_default();
            week.reimbursement = (miles * rate_per_mile).round_dp(2);
            week.trips.sort_by_key(|t| t.date);
            week.expenses.sort_by_key(|e| e.date);
            week
        })
        .collect();
}

/// Expand every recurring schedule into concrete trips up to `through`.
///
/// Occurrences that already exist as a trip with the same date, route and
/// type are skipped, so repeated calls do not duplicate trips. Returns the
/// number of trips added.
pub fn generate_trips_from_recurring(data: &mut DataSet, through: NaiveDate) -> usize {
    let mut generated = Vec::new();

    for recurring in &data.recurring_trips {
        let last = recurring.end_date.map_or(through, |end| end.min(through));
        let first_weekday = recurring.start_date.weekday().num_days_from_sunday();
        let offset = (u32::from(recurring.weekday) + 7 - first_weekday) % 7;
        let mut date = match recurring.start_date.checked_add_days(Days::new(u64::from(offset))) {
            Some(date) => date,
            None => continue,
        };

        while date <= last {
            let exists = data
                .trips
                .iter()
                .chain(generated.iter())
                .any(|t: &Trip| {
                    t.date == date
                        && t.origin == recurring.origin
                        && t.destination == recurring.destination
                        && t.trip_type == recurring.trip_type
                });
            if !exists {
                generated.push(Trip {
                    date,
                    origin: recurring.origin.clone(),
                    destination: recurring.destination.clone(),
                    trip_type: recurring.trip_type,
                    miles: recurring.miles,
                });
            }
            date = match date.checked_add_days(Days::new(7)) {
                Some(next) => next,
                None => break,
            };
        }
    }

    let count = generated.len();
    if count > 0 {
        tracing::debug!("Generated {} trips from recurring schedules", count);
    }
    data.trips.extend(generated);
    count
}
