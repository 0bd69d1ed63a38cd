use anyhow::Result as AnyhowResult;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};
use rust_decimal::Decimal;
use triplog::app::{Command, Services, Session, SessionEvent, SessionSettings};
use triplog::input::keymap;
use triplog::model::{DataSet, Expense, Trip, TripTemplate, TripType, DATE_FORMAT};
use triplog::services::distance::FixedDistance;
use triplog::services::storage::MemoryStorage;
use triplog::services::time_source::TestTimeSource;
use triplog::view::{compose, render};

/// "Today" for every harness: Wednesday 2024-03-06
pub const TODAY: &str = "2024-03-06";

pub fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, DATE_FORMAT).unwrap()
}

pub fn trip(on: &str, origin: &str, destination: &str, miles: f64) -> Trip {
    Trip {
        date: date(on),
        origin: origin.to_string(),
        destination: destination.to_string(),
        trip_type: TripType::Single,
        miles,
    }
}

/// Amount given in cents
pub fn expense(on: &str, cents: i64, description: &str) -> Expense {
    Expense {
        date: date(on),
        amount: Decimal::new(cents, 2),
        description: description.to_string(),
    }
}

pub fn template(name: &str, origin: &str, destination: &str) -> TripTemplate {
    TripTemplate {
        name: name.to_string(),
        origin: origin.to_string(),
        destination: destination.to_string(),
        trip_type: TripType::Round,
        notes: None,
    }
}

/// Drives a [`Session`] through key presses against in-memory collaborators
/// and renders it to a virtual terminal.
pub struct SessionTestHarness {
    session: Session,
    storage: MemoryStorage,
    distance: FixedDistance,
    clock: TestTimeSource,
    terminal: Terminal<TestBackend>,
    last_command: Command,
}

impl SessionTestHarness {
    /// Empty data set, rate $0.70/mi, five rows per page
    pub fn new(width: u16, height: u16) -> AnyhowResult<Self> {
        Self::with_data(width, height, DataSet::default(), 5)
    }

    pub fn with_data(
        width: u16,
        height: u16,
        data: DataSet,
        page_size: usize,
    ) -> AnyhowResult<Self> {
        super::tracing::init_tracing_from_env();

        let settings = SessionSettings {
            rate_per_mile: Decimal::new(70, 2),
            page_size,
        };
        let mut storage = MemoryStorage::new(data);
        let clock = TestTimeSource::on(date(TODAY));
        let session = Session::open(settings, &mut storage, &clock)?;
        let terminal = Terminal::new(TestBackend::new(width, height))?;

        Ok(Self {
            session,
            storage,
            distance: FixedDistance::new()
                .with_route("Home", "Office", 10.0)
                .with_route("Office", "Client", 4.2),
            clock,
            terminal,
            last_command: Command::Continue,
        })
    }

    /// Teach the distance calculator another route
    pub fn with_route(mut self, origin: &str, destination: &str, miles: f64) -> Self {
        self.distance = self.distance.with_route(origin, destination, miles);
        self
    }

    pub fn send(&mut self, event: SessionEvent) -> Command {
        let mut services = Services {
            storage: &mut self.storage,
            distance: &self.distance,
            clock: &self.clock,
        };
        self.last_command = self.session.handle_event(event, &mut services);
        self.last_command
    }

    /// Send a key through the real key map. Unbound keys are ignored.
    pub fn send_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Command {
        match keymap::translate(KeyEvent::new(code, modifiers)) {
            Some(event) => self.send(event),
            None => Command::Continue,
        }
    }

    pub fn ctrl(&mut self, c: char) -> Command {
        self.send_key(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn press(&mut self, code: KeyCode) -> Command {
        self.send_key(code, KeyModifiers::NONE)
    }

    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.send_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    /// Type `text` and press Enter
    pub fn submit(&mut self, text: &str) {
        self.type_text(text);
        self.press(KeyCode::Enter);
    }

    /// Erase whatever is in the input line
    pub fn clear_input(&mut self) {
        for _ in 0..self.session.input().as_str().chars().count() {
            self.press(KeyCode::Backspace);
        }
    }

    /// Compose and draw the current state, the way the event loop does
    pub fn render(&mut self) -> AnyhowResult<()> {
        let screen = compose::compose(&self.session);
        self.session.mark_rendered();
        self.terminal
            .draw(|frame| render::draw(frame, &screen, true))?;
        Ok(())
    }

    pub fn screen_to_string(&self) -> String {
        let buffer = self.terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    pub fn assert_screen_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            screen.contains(text),
            "Expected screen to contain '{}'\nScreen:\n{}",
            text,
            screen
        );
    }

    pub fn assert_screen_not_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            !screen.contains(text),
            "Expected screen NOT to contain '{}'\nScreen:\n{}",
            text,
            screen
        );
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn storage(&self) -> &MemoryStorage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut MemoryStorage {
        &mut self.storage
    }

    pub fn last_command(&self) -> Command {
        self.last_command
    }
}
