//! Staging copies of entities under construction or edit
//!
//! A draft holds whatever fields the wizard has collected so far. It becomes
//! a real entity only through `complete()`, which fails if a required field
//! has not been entered yet.

use super::{DomainError, Expense, RecurringTrip, Trip, TripTemplate, TripType};
use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripDraft {
    pub date: Option<NaiveDate>,
    pub origin: String,
    pub destination: String,
    pub trip_type: Option<TripType>,
    /// Unset until copied from an existing trip or looked up at commit
    pub miles: Option<f64>,
}

impl TripDraft {
    pub fn complete(&self) -> Result<Trip, DomainError> {
        Ok(Trip {
            date: self.date.ok_or(DomainError::Incomplete("trip date"))?,
            origin: self.origin.trim().to_string(),
            destination: self.destination.trim().to_string(),
            trip_type: self.trip_type.ok_or(DomainError::Incomplete("trip type"))?,
            miles: self.miles.ok_or(DomainError::Incomplete("trip miles"))?,
        })
    }
}

impl From<&Trip> for TripDraft {
    fn from(trip: &Trip) -> Self {
        Self {
            date: Some(trip.date),
            origin: trip.origin.clone(),
            destination: trip.destination.clone(),
            trip_type: Some(trip.trip_type),
            miles: trip.has_miles().then_some(trip.miles),
        }
    }
}

impl From<&TripTemplate> for TripDraft {
    fn from(template: &TripTemplate) -> Self {
        Self {
            date: None,
            origin: template.origin.clone(),
            destination: template.destination.clone(),
            trip_type: Some(template.trip_type),
            miles: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseDraft {
    pub date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub description: String,
}

impl ExpenseDraft {
    pub fn complete(&self) -> Result<Expense, DomainError> {
        Ok(Expense {
            date: self.date.ok_or(DomainError::Incomplete("expense date"))?,
            amount: self.amount.ok_or(DomainError::Incomplete("expense amount"))?,
            description: self.description.trim().to_string(),
        })
    }
}

impl From<&Expense> for ExpenseDraft {
    fn from(expense: &Expense) -> Self {
        Self {
            date: Some(expense.date),
            amount: Some(expense.amount),
            description: expense.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecurringDraft {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub weekday: Option<u8>,
    pub origin: String,
    pub destination: String,
    pub trip_type: Option<TripType>,
    pub miles: Option<f64>,
}

impl RecurringDraft {
    pub fn complete(&self) -> Result<RecurringTrip, DomainError> {
        Ok(RecurringTrip {
            origin: self.origin.trim().to_string(),
            destination: self.destination.trim().to_string(),
            trip_type: self.trip_type.ok_or(DomainError::Incomplete("trip type"))?,
            miles: self.miles.ok_or(DomainError::Incomplete("trip miles"))?,
            start_date: self
                .start_date
                .ok_or(DomainError::Incomplete("start date"))?,
            end_date: self.end_date,
            weekday: self.weekday.ok_or(DomainError::Incomplete("weekday"))?,
        })
    }
}

impl From<&Trip> for RecurringDraft {
    /// Seed a schedule from an existing trip: same route, starting on its date
    fn from(trip: &Trip) -> Self {
        use chrono::Datelike;
        Self {
            start_date: Some(trip.date),
            end_date: None,
            weekday: u8::try_from(trip.date.weekday().num_days_from_sunday()).ok(),
            origin: trip.origin.clone(),
            destination: trip.destination.clone(),
            trip_type: Some(trip.trip_type),
            miles: trip.has_miles().then_some(trip.miles),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateDraft {
    pub name: String,
    pub origin: String,
    pub destination: String,
    pub trip_type: Option<TripType>,
    pub notes: String,
}

impl TemplateDraft {
    pub fn complete(&self) -> Result<TripTemplate, DomainError> {
        let notes = self.notes.trim();
        Ok(TripTemplate {
            name: self.name.trim().to_string(),
            origin: self.origin.trim().to_string(),
            destination: self.destination.trim().to_string(),
            trip_type: self.trip_type.ok_or(DomainError::Incomplete("trip type"))?,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

impl From<&TripTemplate> for TemplateDraft {
    fn from(template: &TripTemplate) -> Self {
        Self {
            name: template.name.clone(),
            origin: template.origin.clone(),
            destination: template.destination.clone(),
            trip_type: Some(template.trip_type),
            notes: template.notes.clone().unwrap_or_default(),
        }
    }
}
