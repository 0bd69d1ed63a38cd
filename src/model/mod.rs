//! Trip, expense and template entities
//!
//! These are the records the session edits and the storage layer persists.
//! Weekly summaries are derived from them and never stored.

pub mod domain;
pub mod draft;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use domain::DomainError;
pub use draft::{ExpenseDraft, RecurringDraft, TemplateDraft, TripDraft};

/// Date format used for input, display and persistence
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether a trip is one-way or out-and-back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripType {
    #[default]
    Single,
    Round,
}

impl TripType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripType::Single => "single",
            TripType::Round => "round",
        }
    }

    /// How many times the one-way distance is driven
    pub fn multiplier(&self) -> f64 {
        match self {
            TripType::Single => 1.0,
            TripType::Round => 2.0,
        }
    }
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid trip type '{0}': expected 'single' or 'round'")]
pub struct ParseTripTypeError(pub String);

impl FromStr for TripType {
    type Err = ParseTripTypeError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(TripType::Single),
            "round" => Ok(TripType::Round),
            _ => Err(ParseTripTypeError(s.trim().to_string())),
        }
    }
}

/// A single logged drive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub date: NaiveDate,
    pub origin: String,
    pub destination: String,
    #[serde(rename = "type")]
    pub trip_type: TripType,
    /// One-way distance. Zero means not yet calculated.
    #[serde(default)]
    pub miles: f64,
}

impl Trip {
    /// Distance driven, accounting for round trips
    pub fn driven_miles(&self) -> f64 {
        self.miles * self.trip_type.multiplier()
    }

    pub fn has_miles(&self) -> bool {
        self.miles > 0.0
    }
}

/// A weekly schedule that expands into concrete trips
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTrip {
    pub origin: String,
    pub destination: String,
    #[serde(rename = "type")]
    pub trip_type: TripType,
    #[serde(default)]
    pub miles: f64,
    pub start_date: NaiveDate,
    /// Open ended when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// 0 = Sunday ... 6 = Saturday
    pub weekday: u8,
}

impl RecurringTrip {
    /// Whether `date` is one of this schedule's occurrences
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        date >= self.start_date
            && self.end_date.map_or(true, |end| date <= end)
            && date.weekday().num_days_from_sunday() == u32::from(self.weekday)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
}

/// A named, reusable route used to prefill the trip wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripTemplate {
    pub name: String,
    pub origin: String,
    pub destination: String,
    #[serde(rename = "type")]
    pub trip_type: TripType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Aggregate for one Sunday-to-Saturday week
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_miles: f64,
    pub reimbursement: Decimal,
    pub total_expenses: Decimal,
    pub trips: Vec<Trip>,
    pub expenses: Vec<Expense>,
}

impl WeeklySummary {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.week_start && date <= self.week_end
    }

    /// Mileage reimbursement plus expenses
    pub fn grand_total(&self) -> Decimal {
        self.reimbursement + self.total_expenses
    }
}

/// Everything the user has recorded, loaded and saved as one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSet {
    #[serde(default)]
    pub trips: Vec<Trip>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub recurring_trips: Vec<RecurringTrip>,
    #[serde(default)]
    pub templates: Vec<TripTemplate>,
    #[serde(skip)]
    pub weekly_summaries: Vec<WeeklySummary>,
}

pub fn weekday_name(weekday: u8) -> &'static str {
    match weekday {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        _ => "?",
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
