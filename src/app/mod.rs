//! The interactive session: state plus the event dispatcher
//!
//! A [`Session`] owns everything the user sees and edits. Terminal input is
//! translated into [`SessionEvent`]s by `input::keymap`; each event is handled
//! to completion (including any storage or distance call) before the next one
//! is accepted. Rendering reads the session through `view::compose` and never
//! mutates it.

pub mod event;
pub mod help;
pub mod input_buffer;
pub mod mode;
pub mod ordering;
pub mod search;
pub mod tabs;
pub mod wizard;

pub use event::{Command, SessionEvent};
pub use help::{HelpLevel, HelpState};
pub use input_buffer::InputBuffer;
pub use mode::{DeleteTarget, ExpenseField, Mode, RecurringField, TemplateField, TripField};
pub use search::SearchState;
pub use tabs::{Page, Tab};
pub use wizard::InputError;

use crate::config::Config;
use crate::model::domain::{generate_trips_from_recurring, recalculate_weekly_summaries};
use crate::model::{
    DataSet, DomainError, ExpenseDraft, RecurringDraft, TemplateDraft, TripDraft, WeeklySummary,
};
use crate::services::distance::{DistanceCalculator, DistanceError};
use crate::services::storage::{Storage, StorageError};
use crate::services::time_source::TimeSource;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Everything that can go wrong while handling one event.
///
/// Always shown to the user as the transient error; never fatal.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Distance(#[from] DistanceError),
    #[error("finish or cancel the current entry first (Esc)")]
    Busy,
    #[error("select a {0} first")]
    NothingSelected(&'static str),
    #[error("{0}")]
    Unsupported(&'static str),
}

/// Collaborators a session calls out to while handling an event
pub struct Services<'a> {
    pub storage: &'a mut dyn Storage,
    pub distance: &'a dyn DistanceCalculator,
    pub clock: &'a dyn TimeSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub rate_per_mile: Decimal,
    pub page_size: usize,
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            rate_per_mile: config.rate_per_mile,
            page_size: config.page_size.max(1),
        }
    }
}

/// Selected rows by storage index. At most one is set at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub trip: Option<usize>,
    pub expense: Option<usize>,
    pub template: Option<usize>,
    pub recurring: Option<usize>,
}

impl Selection {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    settings: SessionSettings,
    data: DataSet,
    mode: Mode,
    tab: Tab,
    selection: Selection,
    pages: [usize; Tab::COUNT],
    selected_week: Option<usize>,
    search: SearchState,
    current_trip: TripDraft,
    current_expense: ExpenseDraft,
    current_recurring: RecurringDraft,
    current_template: TemplateDraft,
    input: InputBuffer,
    error: Option<String>,
    notice: Option<String>,
    help: HelpState,
}

impl Session {
    /// Start a session on the Weekly Summaries tab, showing the week of `today`
    pub fn new(settings: SessionSettings, mut data: DataSet, today: NaiveDate) -> Self {
        recalculate_weekly_summaries(&mut data, settings.rate_per_mile);
        let mut session = Self {
            settings,
            data,
            mode: Mode::IDLE,
            tab: Tab::WeeklySummaries,
            selection: Selection::default(),
            pages: [0; Tab::COUNT],
            selected_week: None,
            search: SearchState::default(),
            current_trip: TripDraft::default(),
            current_expense: ExpenseDraft::default(),
            current_recurring: RecurringDraft::default(),
            current_template: TemplateDraft::default(),
            input: InputBuffer::new(),
            error: None,
            notice: None,
            help: HelpState::default(),
        };
        session.select_week_of(today);
        session
    }

    /// Load the data set, fill in recurring trips through today and start a
    /// session. Newly generated trips are saved right away; if that save
    /// fails they stay in memory and the failure is the first error shown.
    pub fn open(
        settings: SessionSettings,
        storage: &mut dyn Storage,
        clock: &dyn TimeSource,
    ) -> Result<Self, SessionError> {
        let mut data = storage.load()?;
        let today = clock.today();
        let generated = generate_trips_from_recurring(&mut data, today);
        let mut save_error = None;
        if generated > 0 {
            tracing::info!("Added {} trips from recurring schedules", generated);
            if let Err(err) = storage.save(&data) {
                tracing::warn!("Could not save generated recurring trips: {}", err);
                save_error = Some(err.to_string());
            }
        }
        tracing::info!(
            "Opened session with {} trips, {} expenses, {} templates, {} recurring",
            data.trips.len(),
            data.expenses.len(),
            data.templates.len(),
            data.recurring_trips.len()
        );
        let mut session = Self::new(settings, data, today);
        session.error = save_error;
        Ok(session)
    }

    /// Apply one event. Failures become the transient error.
    pub fn handle_event(&mut self, event: SessionEvent, services: &mut Services<'_>) -> Command {
        tracing::trace!("Event {:?} in {:?}", event, self.mode);
        let result = match event {
            SessionEvent::Quit => return Command::Quit,
            SessionEvent::Confirm => {
                if self.search.active {
                    self.search.active = false;
                    self.search.query.clear();
                    Ok(())
                } else {
                    self.confirm(services)
                }
            }
            SessionEvent::Cancel => {
                self.cancel();
                Ok(())
            }
            SessionEvent::OpenHelp(level) => {
                self.help.open(level);
                Ok(())
            }
            SessionEvent::NavigateUp => {
                self.navigate_up();
                Ok(())
            }
            SessionEvent::NavigateDown => {
                self.navigate_down();
                Ok(())
            }
            SessionEvent::NavigateLeft => {
                self.navigate_left();
                Ok(())
            }
            SessionEvent::NavigateRight => {
                self.navigate_right();
                Ok(())
            }
            SessionEvent::SwitchTabForward => {
                self.switch_tab(self.tab.next(), services.clock.today());
                Ok(())
            }
            SessionEvent::SwitchTabBackward => {
                self.switch_tab(self.tab.prev(), services.clock.today());
                Ok(())
            }
            SessionEvent::StartExpense => self.start_expense(),
            SessionEvent::StartTemplate => self.start_template(),
            SessionEvent::StartEdit => self.start_edit(),
            SessionEvent::StartDelete => self.start_delete(),
            SessionEvent::StartRecurringOrConvert => self.start_recurring_or_convert(),
            SessionEvent::UseTemplate => self.use_template(services.clock.today()),
            SessionEvent::ToggleSearch => self.toggle_search(),
            SessionEvent::Input(c) => {
                self.type_text(|buffer| buffer.push(c));
                Ok(())
            }
            SessionEvent::Paste(text) => {
                self.type_text(|buffer| buffer.push_str(&text));
                Ok(())
            }
            SessionEvent::Backspace => {
                self.type_text(InputBuffer::backspace);
                Ok(())
            }
        };

        if let Err(err) = result {
            tracing::debug!("Event rejected in {:?}: {}", self.mode, err);
            self.error = Some(err.to_string());
        }
        Command::Continue
    }

    /// Called once the current state has been drawn; transient messages
    /// are shown exactly once.
    pub fn mark_rendered(&mut self) {
        self.error = None;
        self.notice = None;
    }

    fn cancel(&mut self) {
        if self.help.visible {
            self.help.close();
        } else if self.search.active {
            self.search.stop();
            self.pages[Tab::Trips.index()] = 0;
        } else if !self.mode.is_idle() {
            tracing::debug!("Cancelled {:?}", self.mode);
            self.reset_flow();
            self.notice = Some("Cancelled".to_string());
        } else {
            self.input.clear();
            self.current_trip = TripDraft::default();
            self.selection.clear();
        }
    }

    /// Typed text goes to the search query while searching, else the input
    fn type_text(&mut self, edit: impl FnOnce(&mut InputBuffer)) {
        if self.search.active {
            let mut query = InputBuffer::new();
            query.prefill(std::mem::take(&mut self.search.query));
            edit(&mut query);
            self.search.query = query.as_str().to_string();
            self.pages[Tab::Trips.index()] = 0;
            self.drop_hidden_trip_selection();
        } else {
            edit(&mut self.input);
        }
    }

    fn toggle_search(&mut self) -> Result<(), SessionError> {
        if self.search.active {
            self.search.stop();
            self.pages[Tab::Trips.index()] = 0;
            return Ok(());
        }
        self.require_idle()?;
        if self.tab != Tab::Trips {
            self.selection.clear();
            self.tab = Tab::Trips;
            self.selected_week = None;
        }
        self.pages[Tab::Trips.index()] = 0;
        self.search.start();
        self.drop_hidden_trip_selection();
        Ok(())
    }

    /// A trip the search filter hides cannot stay selected
    fn drop_hidden_trip_selection(&mut self) {
        let Some(selected) = self.selection.trip else {
            return;
        };
        if !self.trip_rows().iter().any(|row| row.index == selected) {
            tracing::debug!("Search hides selected trip {}", selected);
            self.selection.trip = None;
        }
    }

    fn require_idle(&self) -> Result<(), SessionError> {
        if self.mode.is_idle() {
            Ok(())
        } else {
            Err(SessionError::Busy)
        }
    }

    /// Drop staging state and go back to the idle stage
    fn reset_flow(&mut self) {
        self.mode = Mode::IDLE;
        self.input.clear();
        self.current_trip = TripDraft::default();
        self.current_expense = ExpenseDraft::default();
        self.current_recurring = RecurringDraft::default();
        self.current_template = TemplateDraft::default();
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn data(&self) -> &DataSet {
        &self.data
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Storage index of the entity being edited, if an edit flow is active
    pub fn edit_index(&self) -> Option<usize> {
        self.mode.edit_index()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn page(&self, tab: Tab) -> usize {
        self.pages[tab.index()]
    }

    pub fn selected_week(&self) -> Option<usize> {
        self.selected_week
    }

    pub fn selected_summary(&self) -> Option<&WeeklySummary> {
        self.selected_week
            .and_then(|week| self.data.weekly_summaries.get(week))
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn help(&self) -> HelpState {
        self.help
    }

    pub fn current_trip(&self) -> &TripDraft {
        &self.current_trip
    }

    pub fn current_expense(&self) -> &ExpenseDraft {
        &self.current_expense
    }

    pub fn current_recurring(&self) -> &RecurringDraft {
        &self.current_recurring
    }

    pub fn current_template(&self) -> &TemplateDraft {
        &self.current_template
    }
}
