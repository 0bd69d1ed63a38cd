//! Session to screen content
//!
//! [`compose`] is a pure function of the session: it decides every line of
//! text and how it should be emphasised, but knows nothing about terminals.
//! `view::render` turns the result into ratatui widgets.

use crate::app::help::help_sections;
use crate::app::ordering::Row;
use crate::app::{DeleteTarget, Mode, Page, Session, Tab};
use crate::model::{
    format_date, weekday_name, Expense, RecurringTrip, Trip, TripTemplate, WeeklySummary,
};

/// Abstract emphasis; the renderer picks the actual style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emphasis {
    Normal,
    Selected,
    /// The row an edit, conversion or delete flow is working on
    Editing,
    Heading,
    Muted,
    ActiveTab,
    Error,
    Notice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub emphasis: Emphasis,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenLine {
    pub segments: Vec<Segment>,
}

impl ScreenLine {
    pub fn styled(text: impl Into<String>, emphasis: Emphasis) -> Self {
        Self {
            segments: vec![Segment {
                text: text.into(),
                emphasis,
            }],
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, Emphasis::Normal)
    }

    pub fn blank() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: impl Into<String>, emphasis: Emphasis) {
        self.segments.push(Segment {
            text: text.into(),
            emphasis,
        });
    }

    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Emphasis of the first segment
    pub fn emphasis(&self) -> Emphasis {
        self.segments
            .first()
            .map_or(Emphasis::Normal, |s| s.emphasis)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpOverlay {
    pub title: String,
    pub lines: Vec<ScreenLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    pub tabs: ScreenLine,
    pub body: Vec<ScreenLine>,
    /// Error or notice, shown once
    pub message: Option<ScreenLine>,
    pub prompt: String,
    pub input: String,
    pub hint: String,
    /// Drawn on top of everything else
    pub help: Option<HelpOverlay>,
}

impl Screen {
    /// All text, top to bottom, help last
    pub fn to_text(&self) -> String {
        let mut lines = vec![self.tabs.text()];
        lines.extend(self.body.iter().map(ScreenLine::text));
        if let Some(message) = &self.message {
            lines.push(message.text());
        }
        lines.push(format!("{}: {}", self.prompt, self.input));
        lines.push(self.hint.clone());
        if let Some(help) = &self.help {
            lines.push(help.title.clone());
            lines.extend(help.lines.iter().map(ScreenLine::text));
        }
        lines.join("\n")
    }
}

pub fn compose(session: &Session) -> Screen {
    let body = match session.tab() {
        Tab::WeeklySummaries => weekly_body(session),
        Tab::Trips => trips_body(session),
        Tab::Expenses => expenses_body(session),
        Tab::Templates => templates_body(session),
    };

    let message = match (session.error(), session.notice()) {
        (Some(error), _) => Some(ScreenLine::styled(format!("Error: {}", error), Emphasis::Error)),
        (None, Some(notice)) => Some(ScreenLine::styled(notice, Emphasis::Notice)),
        (None, None) => None,
    };

    let mode = session.mode();
    let (prompt, input) = if session.search().active {
        ("Search trips".to_string(), session.search().query.clone())
    } else {
        (
            format!("{} | {}", mode.title(), mode.prompt()),
            session.input().as_str().to_string(),
        )
    };

    let hint = if session.search().active {
        "Up/Down select  Enter/Esc leave search  Ctrl+E edit  Ctrl+D delete"
    } else if mode.is_idle() {
        "F1 help  Tab next tab  Up/Down select  Ctrl+C quit"
    } else {
        "Enter confirm  Esc cancel  F1 help"
    };

    Screen {
        tabs: tab_bar(session.tab()),
        body,
        message,
        prompt,
        input,
        hint: hint.to_string(),
        help: session.help().visible.then(|| help_overlay(session)),
    }
}

fn tab_bar(active: Tab) -> ScreenLine {
    let mut line = ScreenLine::default();
    for (i, tab) in Tab::ALL.into_iter().enumerate() {
        if i > 0 {
            line.push(" | ", Emphasis::Muted);
        }
        if tab == active {
            line.push(format!("[{}]", tab.title()), Emphasis::ActiveTab);
        } else {
            line.push(format!(" {} ", tab.title()), Emphasis::Muted);
        }
    }
    line
}

fn help_overlay(session: &Session) -> HelpOverlay {
    let level = session.help().level;
    let mut lines = Vec::new();
    for (i, section) in help_sections(session.tab(), level).into_iter().enumerate() {
        if i > 0 {
            lines.push(ScreenLine::blank());
        }
        lines.push(ScreenLine::styled(section.title, Emphasis::Heading));
        for entry in section.entries {
            lines.push(ScreenLine::plain(format!(
                "  {:<16} {}",
                entry.keys, entry.description
            )));
        }
    }
    lines.push(ScreenLine::blank());
    lines.push(ScreenLine::styled(
        "Esc close  F1/F2/F3 change level",
        Emphasis::Muted,
    ));
    HelpOverlay {
        title: format!("Help (level {} of 3)", level.number()),
        lines,
    }
}

fn row_emphasis(selected: bool, in_flow: bool) -> Emphasis {
    if in_flow {
        Emphasis::Editing
    } else if selected {
        Emphasis::Selected
    } else {
        Emphasis::Normal
    }
}

fn marker(emphasis: Emphasis) -> &'static str {
    match emphasis {
        Emphasis::Selected => "> ",
        Emphasis::Editing => "* ",
        _ => "  ",
    }
}

fn row_line(text: String, emphasis: Emphasis) -> ScreenLine {
    ScreenLine::styled(format!("{}{}", marker(emphasis), text), emphasis)
}

fn footer(lines: &mut Vec<ScreenLine>, page: &Page) {
    if let Some(text) = page.footer() {
        lines.push(ScreenLine::styled(text, Emphasis::Muted));
    }
}

pub fn trip_text(trip: &Trip) -> String {
    let miles = if trip.has_miles() {
        format!("{:.1} mi", trip.miles)
    } else {
        "? mi".to_string()
    };
    format!(
        "{}  {} -> {}  {}  {}",
        format_date(trip.date),
        trip.origin,
        trip.destination,
        trip.trip_type,
        miles
    )
}

pub fn expense_text(expense: &Expense) -> String {
    format!(
        "{}  ${:.2}  {}",
        format_date(expense.date),
        expense.amount,
        expense.description
    )
}

pub fn template_text(template: &TripTemplate) -> String {
    let mut text = format!(
        "{}  {} -> {}  {}",
        template.name, template.origin, template.destination, template.trip_type
    );
    if let Some(notes) = &template.notes {
        text.push_str(&format!("  ({})", notes));
    }
    text
}

pub fn recurring_text(recurring: &RecurringTrip) -> String {
    let mut text = format!(
        "Every {}  {} -> {}  {}  {:.1} mi  from {}",
        weekday_name(recurring.weekday),
        recurring.origin,
        recurring.destination,
        recurring.trip_type,
        recurring.miles,
        format_date(recurring.start_date)
    );
    if let Some(end) = recurring.end_date {
        text.push_str(&format!(" until {}", format_date(end)));
    }
    text
}

fn weekly_body(session: &Session) -> Vec<ScreenLine> {
    let summaries = &session.data().weekly_summaries;
    let Some(week) = session.selected_summary() else {
        return vec![ScreenLine::styled(
            "No weekly summaries yet. Type a date (YYYY-MM-DD) and press Enter to log a trip.",
            Emphasis::Muted,
        )];
    };
    let position = session.selected_week().unwrap_or(0) + 1;
    summary_lines(week, position, summaries.len(), session)
}

fn summary_lines(
    week: &WeeklySummary,
    position: usize,
    count: usize,
    session: &Session,
) -> Vec<ScreenLine> {
    let rate = session.settings().rate_per_mile;
    let mut lines = vec![
        ScreenLine::styled(
            format!(
                "Week of {} to {} ({} of {})",
                format_date(week.week_start),
                format_date(week.week_end),
                position,
                count
            ),
            Emphasis::Heading,
        ),
        ScreenLine::plain(format!("Miles:          {:.1}", week.total_miles)),
        ScreenLine::plain(format!(
            "Reimbursement:  ${:.2} at ${}/mi",
            week.reimbursement, rate
        )),
        ScreenLine::plain(format!("Expenses:       ${:.2}", week.total_expenses)),
        ScreenLine::plain(format!("Total:          ${:.2}", week.grand_total())),
        ScreenLine::blank(),
        ScreenLine::styled("Trips", Emphasis::Heading),
    ];
    if week.trips.is_empty() {
        lines.push(ScreenLine::styled("  no trips this week", Emphasis::Muted));
    }
    lines.extend(week.trips.iter().map(|t| ScreenLine::plain(format!("  {}", trip_text(t)))));
    lines.push(ScreenLine::blank());
    lines.push(ScreenLine::styled("Expenses", Emphasis::Heading));
    if week.expenses.is_empty() {
        lines.push(ScreenLine::styled("  no expenses this week", Emphasis::Muted));
    }
    lines.extend(
        week.expenses
            .iter()
            .map(|e| ScreenLine::plain(format!("  {}", expense_text(e)))),
    );
    lines
}

fn page_rows<'a, 'r, T>(rows: &'r [Row<'a, T>], page: &Page) -> &'r [Row<'a, T>] {
    &rows[page.start..page.end]
}

fn trips_body(session: &Session) -> Vec<ScreenLine> {
    let mode = session.mode();
    let in_flow = |index: usize| match mode {
        Mode::EditTrip { index: i, .. } | Mode::ConvertToRecurring { trip: i } => i == index,
        Mode::ConfirmDelete(DeleteTarget::Trip(i)) => i == index,
        _ => false,
    };

    let mut lines = Vec::new();
    let search = session.search();
    if search.active {
        lines.push(ScreenLine::styled(
            format!("Search: {}", search.query),
            Emphasis::Heading,
        ));
    }

    let rows = session.trip_rows();
    if rows.is_empty() {
        let text = if search.active && !search.query.trim().is_empty() {
            format!("No trips match '{}'.", search.query.trim())
        } else {
            "No trips logged yet. Type a date (YYYY-MM-DD) and press Enter to start.".to_string()
        };
        lines.push(ScreenLine::styled(text, Emphasis::Muted));
        return lines;
    }

    let page = session.current_page(Tab::Trips);
    let selected = session.selection().trip;
    for row in page_rows(&rows, &page) {
        let emphasis = row_emphasis(selected == Some(row.index), in_flow(row.index));
        lines.push(row_line(trip_text(row.item), emphasis));
    }
    footer(&mut lines, &page);
    lines
}

fn expenses_body(session: &Session) -> Vec<ScreenLine> {
    let mode = session.mode();
    let in_flow = |index: usize| match mode {
        Mode::EditExpense { index: i, .. } => i == index,
        Mode::ConfirmDelete(DeleteTarget::Expense(i)) => i == index,
        _ => false,
    };

    let rows = session.expense_rows();
    if rows.is_empty() {
        return vec![ScreenLine::styled(
            "No expenses logged yet. Press Ctrl+X to add one.",
            Emphasis::Muted,
        )];
    }

    let mut lines = Vec::new();
    let page = session.current_page(Tab::Expenses);
    let selected = session.selection().expense;
    for row in page_rows(&rows, &page) {
        let emphasis = row_emphasis(selected == Some(row.index), in_flow(row.index));
        lines.push(row_line(expense_text(row.item), emphasis));
    }
    footer(&mut lines, &page);
    lines
}

fn templates_body(session: &Session) -> Vec<ScreenLine> {
    let mode = session.mode();
    let template_in_flow = |index: usize| match mode {
        Mode::EditTemplate { index: i, .. } => i == index,
        Mode::ConfirmDelete(DeleteTarget::Template(i)) => i == index,
        _ => false,
    };
    let recurring_in_flow =
        |index: usize| mode == Mode::ConfirmDelete(DeleteTarget::Recurring(index));
    let selection = session.selection();

    let mut lines = vec![ScreenLine::styled("Templates", Emphasis::Heading)];
    let rows = session.template_rows();
    if rows.is_empty() {
        lines.push(ScreenLine::styled(
            "  No templates yet. Press Ctrl+T to create one.",
            Emphasis::Muted,
        ));
    } else {
        let page = session.current_page(Tab::Templates);
        for row in page_rows(&rows, &page) {
            let emphasis = row_emphasis(
                selection.template == Some(row.index),
                template_in_flow(row.index),
            );
            lines.push(row_line(template_text(row.item), emphasis));
        }
        footer(&mut lines, &page);
    }

    lines.push(ScreenLine::blank());
    lines.push(ScreenLine::styled("Recurring trips", Emphasis::Heading));
    let recurring = session.recurring_rows();
    if recurring.is_empty() {
        lines.push(ScreenLine::styled(
            "  No recurring trips. Press Ctrl+R to create one.",
            Emphasis::Muted,
        ));
    }
    let page = session.recurring_page();
    for row in page_rows(&recurring, &page) {
        let emphasis = row_emphasis(
            selection.recurring == Some(row.index),
            recurring_in_flow(row.index),
        );
        lines.push(row_line(recurring_text(row.item), emphasis));
    }
    footer(&mut lines, &page);
    lines
}
