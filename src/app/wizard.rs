//! Wizard flows: one field per stage, validated before advancing
//!
//! A flow collects fields into its staging draft. The last field commits:
//! the draft is applied to a copy of the data set, summaries are recomputed
//! and the copy is saved. Only when all of that succeeds does the copy
//! replace the session's data, so a failed commit changes nothing and
//! leaves the flow on its final stage for a retry.

use super::mode::{DeleteTarget, ExpenseField, Mode, RecurringField, TemplateField, TripField};
use super::tabs::Tab;
use super::{Services, Session, SessionError};
use crate::model::domain::{generate_trips_from_recurring, recalculate_weekly_summaries};
use crate::model::{
    format_date, weekday_name, DataSet, ExpenseDraft, ParseTripTypeError, RecurringDraft,
    TemplateDraft, TripDraft, TripType, DATE_FORMAT,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// A field value the user typed that cannot be accepted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("invalid date '{0}': use YYYY-MM-DD")]
    Date(String),
    #[error("invalid weekday '{0}': enter 0 (Sunday) to 6 (Saturday)")]
    Weekday(String),
    #[error("invalid amount '{0}': enter a number greater than zero")]
    Amount(String),
    #[error(transparent)]
    TripType(#[from] ParseTripTypeError),
}

pub fn parse_date(text: &str) -> Result<NaiveDate, InputError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(InputError::Required("date"));
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| InputError::Date(text.to_string()))
}

/// 0 = Sunday ... 6 = Saturday
pub fn parse_weekday(text: &str) -> Result<u8, InputError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(InputError::Required("weekday"));
    }
    match text.parse::<u8>() {
        Ok(day) if day <= 6 => Ok(day),
        _ => Err(InputError::Weekday(text.to_string())),
    }
}

/// Positive amount, optionally written with a leading `$`
pub fn parse_amount(text: &str) -> Result<Decimal, InputError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(InputError::Required("amount"));
    }
    let digits = text.strip_prefix('$').unwrap_or(text).trim();
    match Decimal::from_str(digits) {
        Ok(amount) if amount > Decimal::ZERO => Ok(amount),
        _ => Err(InputError::Amount(text.to_string())),
    }
}

pub fn parse_trip_type(text: &str) -> Result<TripType, InputError> {
    if text.trim().is_empty() {
        return Err(InputError::Required("type"));
    }
    Ok(TripType::from_str(text)?)
}

pub fn parse_text(text: &str, field: &'static str) -> Result<String, InputError> {
    let text = text.trim();
    if text.is_empty() {
        Err(InputError::Required(field))
    } else {
        Ok(text.to_string())
    }
}

fn same_place(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

impl Session {
    /// Staged value of the field `mode` is asking for, as editable text
    pub(super) fn field_text(&self, mode: Mode) -> String {
        let date = |d: Option<NaiveDate>| d.map(format_date).unwrap_or_default();
        let trip_type = |t: Option<TripType>| t.map(|t| t.as_str().to_string()).unwrap_or_default();

        match mode {
            Mode::Trip(field) | Mode::EditTrip { field, .. } => {
                let draft = &self.current_trip;
                match field {
                    TripField::Date => date(draft.date),
                    TripField::Origin => draft.origin.clone(),
                    TripField::Destination => draft.destination.clone(),
                    TripField::Type => trip_type(draft.trip_type),
                }
            }
            Mode::Expense(field) | Mode::EditExpense { field, .. } => {
                let draft = &self.current_expense;
                match field {
                    ExpenseField::Date => date(draft.date),
                    ExpenseField::Amount => draft.amount.map(|a| a.to_string()).unwrap_or_default(),
                    ExpenseField::Description => draft.description.clone(),
                }
            }
            Mode::Recurring(field) => {
                let draft = &self.current_recurring;
                match field {
                    RecurringField::StartDate => date(draft.start_date),
                    RecurringField::Weekday => {
                        draft.weekday.map(|d| d.to_string()).unwrap_or_default()
                    }
                    RecurringField::Origin => draft.origin.clone(),
                    RecurringField::Destination => draft.destination.clone(),
                    RecurringField::Type => trip_type(draft.trip_type),
                }
            }
            Mode::ConvertToRecurring { .. } => self
                .current_recurring
                .weekday
                .map(|d| d.to_string())
                .unwrap_or_default(),
            Mode::Template(field) | Mode::EditTemplate { field, .. } => {
                let draft = &self.current_template;
                match field {
                    TemplateField::Name => draft.name.clone(),
                    TemplateField::Origin => draft.origin.clone(),
                    TemplateField::Destination => draft.destination.clone(),
                    TemplateField::Type => trip_type(draft.trip_type),
                    TemplateField::Notes => draft.notes.clone(),
                }
            }
            Mode::ConfirmDelete(_) => String::new(),
        }
    }

    /// Move to `mode`, prefilling the input with its staged value
    fn enter(&mut self, mode: Mode) {
        let text = self.field_text(mode);
        self.mode = mode;
        self.input.prefill(text);
    }

    /// Typed text, or on flows that start from an existing entity, the
    /// staged value when nothing was typed
    fn submitted_text(&self) -> String {
        let text = self.input.as_str().trim();
        let keeps_previous =
            self.mode.is_edit() || matches!(self.mode, Mode::ConvertToRecurring { .. });
        if text.is_empty() && keeps_previous {
            self.field_text(self.mode)
        } else {
            text.to_string()
        }
    }

    /// Flow succeeded: clear staging, return to idle, say what happened
    fn finish(&mut self, message: impl Into<String>) {
        self.reset_flow();
        let message = message.into();
        tracing::info!("{}", message);
        self.notice = Some(message);
    }

    pub(super) fn confirm(&mut self, services: &mut Services<'_>) -> Result<(), SessionError> {
        let text = self.submitted_text();
        match self.mode {
            Mode::Trip(field) => self.confirm_trip(None, field, &text, services),
            Mode::EditTrip { index, field } => self.confirm_trip(Some(index), field, &text, services),
            Mode::Expense(field) => self.confirm_expense(None, field, &text, services),
            Mode::EditExpense { index, field } => {
                self.confirm_expense(Some(index), field, &text, services)
            }
            Mode::Recurring(field) => self.confirm_recurring(field, &text, services),
            Mode::ConvertToRecurring { .. } => {
                self.current_recurring.weekday = Some(parse_weekday(&text)?);
                self.commit_recurring(services)
            }
            Mode::Template(field) => self.confirm_template(None, field, &text, services),
            Mode::EditTemplate { index, field } => {
                self.confirm_template(Some(index), field, &text, services)
            }
            Mode::ConfirmDelete(target) => self.confirm_delete(target, services),
        }
    }

    fn confirm_trip(
        &mut self,
        edit: Option<usize>,
        field: TripField,
        text: &str,
        services: &mut Services<'_>,
    ) -> Result<(), SessionError> {
        let draft = &mut self.current_trip;
        match field {
            TripField::Date => draft.date = Some(parse_date(text)?),
            TripField::Origin => {
                let origin = parse_text(text, "origin")?;
                if !same_place(&draft.origin, &origin) {
                    draft.miles = None;
                }
                draft.origin = origin;
            }
            TripField::Destination => {
                let destination = parse_text(text, "destination")?;
                if !same_place(&draft.destination, &destination) {
                    draft.miles = None;
                }
                draft.destination = destination;
            }
            TripField::Type => draft.trip_type = Some(parse_trip_type(text)?),
        }

        match (field.next(), edit) {
            (Some(next), Some(index)) => self.enter(Mode::EditTrip { index, field: next }),
            (Some(next), None) => self.enter(Mode::Trip(next)),
            (None, _) => return self.commit_trip(edit, services),
        }
        Ok(())
    }

    fn confirm_expense(
        &mut self,
        edit: Option<usize>,
        field: ExpenseField,
        text: &str,
        services: &mut Services<'_>,
    ) -> Result<(), SessionError> {
        let draft = &mut self.current_expense;
        match field {
            ExpenseField::Date => draft.date = Some(parse_date(text)?),
            ExpenseField::Amount => draft.amount = Some(parse_amount(text)?),
            ExpenseField::Description => draft.description = parse_text(text, "description")?,
        }

        match (field.next(), edit) {
            (Some(next), Some(index)) => self.enter(Mode::EditExpense { index, field: next }),
            (Some(next), None) => self.enter(Mode::Expense(next)),
            (None, _) => return self.commit_expense(edit, services),
        }
        Ok(())
    }

    fn confirm_recurring(
        &mut self,
        field: RecurringField,
        text: &str,
        services: &mut Services<'_>,
    ) -> Result<(), SessionError> {
        let draft = &mut self.current_recurring;
        match field {
            RecurringField::StartDate => draft.start_date = Some(parse_date(text)?),
            RecurringField::Weekday => draft.weekday = Some(parse_weekday(text)?),
            RecurringField::Origin => draft.origin = parse_text(text, "origin")?,
            RecurringField::Destination => draft.destination = parse_text(text, "destination")?,
            RecurringField::Type => draft.trip_type = Some(parse_trip_type(text)?),
        }

        match field.next() {
            Some(next) => self.enter(Mode::Recurring(next)),
            None => return self.commit_recurring(services),
        }
        Ok(())
    }

    fn confirm_template(
        &mut self,
        edit: Option<usize>,
        field: TemplateField,
        text: &str,
        services: &mut Services<'_>,
    ) -> Result<(), SessionError> {
        let draft = &mut self.current_template;
        match field {
            TemplateField::Name => draft.name = parse_text(text, "template name")?,
            TemplateField::Origin => draft.origin = parse_text(text, "origin")?,
            TemplateField::Destination => draft.destination = parse_text(text, "destination")?,
            TemplateField::Type => draft.trip_type = Some(parse_trip_type(text)?),
            TemplateField::Notes => draft.notes = text.trim().to_string(),
        }

        match (field.next(), edit) {
            (Some(next), Some(index)) => self.enter(Mode::EditTemplate { index, field: next }),
            (Some(next), None) => self.enter(Mode::Template(next)),
            (None, _) => return self.commit_template(edit, services),
        }
        Ok(())
    }

    /// Miles for a route: reuse a recorded route, else ask the calculator
    fn route_miles(
        &self,
        origin: &str,
        destination: &str,
        services: &Services<'_>,
    ) -> Result<f64, SessionError> {
        if let Some(miles) = self.data.known_route_miles(origin, destination) {
            tracing::debug!("Reusing {} mi for {} -> {}", miles, origin, destination);
            return Ok(miles);
        }
        Ok(services.distance.calculate(origin.trim(), destination.trim())?)
    }

    /// Recompute summaries on `next`, save it, then make it current
    fn persist(&mut self, mut next: DataSet, services: &mut Services<'_>) -> Result<(), SessionError> {
        recalculate_weekly_summaries(&mut next, self.settings.rate_per_mile);
        services.storage.save(&next)?;
        let shown_week = self.selected_summary().map(|week| week.week_start);
        self.data = next;
        self.clamp_view(shown_week);
        Ok(())
    }

    fn commit_trip(
        &mut self,
        edit: Option<usize>,
        services: &mut Services<'_>,
    ) -> Result<(), SessionError> {
        if self.current_trip.miles.is_none() {
            let miles = self.route_miles(
                &self.current_trip.origin,
                &self.current_trip.destination,
                services,
            )?;
            self.current_trip.miles = Some(miles);
        }
        let trip = self.current_trip.complete()?;
        let summary = format!("{} {} -> {}", format_date(trip.date), trip.origin, trip.destination);

        let mut next = self.data.clone();
        match edit {
            Some(index) => next.edit_trip(index, trip)?,
            None => next.add_trip(trip)?,
        }
        self.persist(next, services)?;
        self.finish(match edit {
            Some(_) => format!("Updated trip {}", summary),
            None => format!("Logged trip {}", summary),
        });
        Ok(())
    }

    fn commit_expense(
        &mut self,
        edit: Option<usize>,
        services: &mut Services<'_>,
    ) -> Result<(), SessionError> {
        let expense = self.current_expense.complete()?;
        let summary = format!("${} {}", expense.amount.round_dp(2), expense.description);

        let mut next = self.data.clone();
        match edit {
            Some(index) => next.edit_expense(index, expense)?,
            None => next.add_expense(expense)?,
        }
        self.persist(next, services)?;
        self.finish(match edit {
            Some(_) => format!("Updated expense {}", summary),
            None => format!("Logged expense {}", summary),
        });
        Ok(())
    }

    fn commit_recurring(&mut self, services: &mut Services<'_>) -> Result<(), SessionError> {
        if self.current_recurring.miles.is_none() {
            let miles = self.route_miles(
                &self.current_recurring.origin,
                &self.current_recurring.destination,
                services,
            )?;
            self.current_recurring.miles = Some(miles);
        }
        let recurring = self.current_recurring.complete()?;
        let weekday = recurring.weekday;

        let mut next = self.data.clone();
        next.add_recurring(recurring)?;
        let generated = generate_trips_from_recurring(&mut next, services.clock.today());
        self.persist(next, services)?;
        self.finish(format!(
            "Trip repeats every {}; {} trips added",
            weekday_name(weekday),
            generated
        ));
        Ok(())
    }

    fn commit_template(
        &mut self,
        edit: Option<usize>,
        services: &mut Services<'_>,
    ) -> Result<(), SessionError> {
        let template = self.current_template.complete()?;
        let name = template.name.clone();

        let mut next = self.data.clone();
        match edit {
            Some(index) => next.edit_template(index, template)?,
            None => next.add_template(template)?,
        }
        self.persist(next, services)?;
        self.finish(match edit {
            Some(_) => format!("Updated template '{}'", name),
            None => format!("Saved template '{}'", name),
        });
        Ok(())
    }

    /// Anything but exactly "yes" cancels. Either way the flow ends.
    fn confirm_delete(
        &mut self,
        target: DeleteTarget,
        services: &mut Services<'_>,
    ) -> Result<(), SessionError> {
        let confirmed = self.input.as_str() == "yes";
        self.reset_flow();
        if !confirmed {
            self.notice = Some(format!("Kept the {}", target.kind()));
            return Ok(());
        }

        let mut next = self.data.clone();
        match target {
            DeleteTarget::Trip(index) => {
                next.delete_trip(index)?;
            }
            DeleteTarget::Expense(index) => {
                next.delete_expense(index)?;
            }
            DeleteTarget::Template(index) => {
                next.delete_template(index)?;
            }
            DeleteTarget::Recurring(index) => {
                next.delete_recurring(index)?;
            }
        }
        self.persist(next, services)?;
        self.selection.clear();
        let message = format!("Deleted the {}", target.kind());
        tracing::info!("{}", message);
        self.notice = Some(message);
        Ok(())
    }

    pub(super) fn start_expense(&mut self) -> Result<(), SessionError> {
        self.require_idle()?;
        self.search.stop();
        self.current_expense = ExpenseDraft::default();
        self.enter(Mode::Expense(ExpenseField::Date));
        Ok(())
    }

    pub(super) fn start_template(&mut self) -> Result<(), SessionError> {
        self.require_idle()?;
        self.search.stop();
        self.current_template = TemplateDraft::default();
        self.enter(Mode::Template(TemplateField::Name));
        Ok(())
    }

    pub(super) fn start_edit(&mut self) -> Result<(), SessionError> {
        self.require_idle()?;
        let mode = match self.tab {
            Tab::Trips => {
                let index = self.selection.trip.ok_or(SessionError::NothingSelected("trip"))?;
                let trip = self.data.trips.get(index).ok_or(SessionError::NothingSelected("trip"))?;
                self.current_trip = TripDraft::from(trip);
                Mode::EditTrip {
                    index,
                    field: TripField::Date,
                }
            }
            Tab::Expenses => {
                let index = self
                    .selection
                    .expense
                    .ok_or(SessionError::NothingSelected("expense"))?;
                let expense = self
                    .data
                    .expenses
                    .get(index)
                    .ok_or(SessionError::NothingSelected("expense"))?;
                self.current_expense = ExpenseDraft::from(expense);
                Mode::EditExpense {
                    index,
                    field: ExpenseField::Date,
                }
            }
            Tab::Templates => {
                if self.selection.recurring.is_some() {
                    return Err(SessionError::Unsupported(
                        "recurring trips cannot be edited; delete and re-create instead",
                    ));
                }
                let index = self
                    .selection
                    .template
                    .ok_or(SessionError::NothingSelected("template"))?;
                let template = self
                    .data
                    .templates
                    .get(index)
                    .ok_or(SessionError::NothingSelected("template"))?;
                self.current_template = TemplateDraft::from(template);
                Mode::EditTemplate {
                    index,
                    field: TemplateField::Name,
                }
            }
            Tab::WeeklySummaries => {
                return Err(SessionError::Unsupported(
                    "switch to Trips, Expenses or Templates to edit",
                ))
            }
        };
        self.search.stop();
        tracing::debug!("Editing via {:?}", mode);
        self.enter(mode);
        Ok(())
    }

    pub(super) fn start_delete(&mut self) -> Result<(), SessionError> {
        self.require_idle()?;
        let selection = self.selection;
        let target = match self.tab {
            Tab::Trips => selection
                .trip
                .map(DeleteTarget::Trip)
                .ok_or(SessionError::NothingSelected("trip"))?,
            Tab::Expenses => selection
                .expense
                .map(DeleteTarget::Expense)
                .ok_or(SessionError::NothingSelected("expense"))?,
            Tab::Templates => selection
                .template
                .map(DeleteTarget::Template)
                .or(selection.recurring.map(DeleteTarget::Recurring))
                .ok_or(SessionError::NothingSelected("template or recurring trip"))?,
            Tab::WeeklySummaries => {
                return Err(SessionError::Unsupported(
                    "switch to Trips, Expenses or Templates to delete",
                ))
            }
        };
        self.search.stop();
        self.enter(Mode::ConfirmDelete(target));
        Ok(())
    }

    /// With a trip selected, repeat it weekly; otherwise start a new schedule
    pub(super) fn start_recurring_or_convert(&mut self) -> Result<(), SessionError> {
        self.require_idle()?;
        let selected_trip = self
            .selection
            .trip
            .and_then(|index| self.data.trips.get(index).map(|trip| (index, trip)));

        let mode = match selected_trip {
            Some((index, trip)) => {
                self.current_recurring = RecurringDraft::from(trip);
                Mode::ConvertToRecurring { trip: index }
            }
            None => {
                self.current_recurring = RecurringDraft::default();
                Mode::Recurring(RecurringField::StartDate)
            }
        };
        self.search.stop();
        self.enter(mode);
        Ok(())
    }

    /// Start the trip wizard on the Trips tab with the selected template staged
    pub(super) fn use_template(&mut self, today: NaiveDate) -> Result<(), SessionError> {
        self.require_idle()?;
        let index = self
            .selection
            .template
            .ok_or(SessionError::NothingSelected("template"))?;
        let template = self
            .data
            .templates
            .get(index)
            .ok_or(SessionError::NothingSelected("template"))?;
        let draft = TripDraft::from(template);
        let name = template.name.clone();

        self.switch_tab(Tab::Trips, today);
        self.current_trip = draft;
        self.enter(Mode::Trip(TripField::Date));
        self.notice = Some(format!("Using template '{}': enter the trip date", name));
        Ok(())
    }
}
