//! Tabs, list selection and pagination

use super::ordering::{self, Row};
use super::search::filter_trips;
use super::Session;
use crate::model::domain::recalculate_weekly_summaries;
use crate::model::{Expense, RecurringTrip, Trip, TripTemplate};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    WeeklySummaries,
    Trips,
    Expenses,
    Templates,
}

impl Tab {
    pub const COUNT: usize = 4;
    pub const ALL: [Tab; Tab::COUNT] = [
        Tab::WeeklySummaries,
        Tab::Trips,
        Tab::Expenses,
        Tab::Templates,
    ];

    pub fn index(self) -> usize {
        match self {
            Tab::WeeklySummaries => 0,
            Tab::Trips => 1,
            Tab::Expenses => 2,
            Tab::Templates => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::WeeklySummaries => "Weekly Summaries",
            Tab::Trips => "Trips",
            Tab::Expenses => "Expenses",
            Tab::Templates => "Templates",
        }
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::COUNT]
    }

    pub fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::COUNT - 1) % Tab::COUNT]
    }
}

/// One page of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 0-based page index, already clamped
    pub index: usize,
    pub count: usize,
    /// Row range `[start, end)` into the display list
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

impl Page {
    /// Page `requested` of a list of `total` rows, clamped into range
    pub fn of(total: usize, page_size: usize, requested: usize) -> Self {
        let page_size = page_size.max(1);
        let count = total_pages(total, page_size);
        let index = requested.min(count - 1);
        let start = (index * page_size).min(total);
        let end = (start + page_size).min(total);
        Self {
            index,
            count,
            start,
            end,
            total,
        }
    }

    /// Footer text, only when the list does not fit on one page
    pub fn footer(&self) -> Option<String> {
        (self.count > 1).then(|| {
            format!(
                "page {} of {} (showing {}-{} of {})",
                self.index + 1,
                self.count,
                self.start + 1,
                self.end,
                self.total
            )
        })
    }
}

/// Number of pages, at least one even for an empty list
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

impl Session {
    /// Trips as displayed: filtered while searching, newest first
    pub fn trip_rows(&self) -> Vec<Row<'_, Trip>> {
        let rows = if self.search.active {
            filter_trips(&self.data.trips, &self.search.query)
        } else {
            ordering::indexed(&self.data.trips)
        };
        ordering::newest_trips_first(rows)
    }

    pub fn expense_rows(&self) -> Vec<Row<'_, Expense>> {
        ordering::newest_expenses_first(ordering::indexed(&self.data.expenses))
    }

    pub fn template_rows(&self) -> Vec<Row<'_, TripTemplate>> {
        ordering::templates_by_name(&self.data.templates)
    }

    pub fn recurring_rows(&self) -> Vec<Row<'_, RecurringTrip>> {
        ordering::indexed(&self.data.recurring_trips)
    }

    /// Current page of the given tab's list
    pub fn current_page(&self, tab: Tab) -> Page {
        let total = match tab {
            Tab::WeeklySummaries => 0,
            Tab::Trips => self.trip_rows().len(),
            Tab::Expenses => self.data.expenses.len(),
            Tab::Templates => self.data.templates.len(),
        };
        Page::of(total, self.settings.page_size, self.pages[tab.index()])
    }

    /// Page of recurring trips holding the selected one, else the first
    pub fn recurring_page(&self) -> Page {
        let page_size = self.settings.page_size.max(1);
        let requested = self.selection.recurring.unwrap_or(0) / page_size;
        Page::of(self.data.recurring_trips.len(), page_size, requested)
    }

    pub(super) fn switch_tab(&mut self, tab: Tab, today: NaiveDate) {
        if self.search.active {
            self.search.stop();
        }
        self.selection.clear();
        self.pages = [0; Tab::COUNT];
        self.tab = tab;
        if tab == Tab::WeeklySummaries {
            recalculate_weekly_summaries(&mut self.data, self.settings.rate_per_mile);
            self.select_week_of(today);
        } else {
            self.selected_week = None;
        }
        tracing::debug!("Switched to tab {}", tab.title());
    }

    /// Select the summary containing `today`, else the first one
    pub(super) fn select_week_of(&mut self, today: NaiveDate) {
        let summaries = &self.data.weekly_summaries;
        self.selected_week = if summaries.is_empty() {
            None
        } else {
            Some(summaries.iter().position(|w| w.contains(today)).unwrap_or(0))
        };
    }

    pub(super) fn navigate_down(&mut self) {
        self.step_selection(ordering::step_down);
    }

    pub(super) fn navigate_up(&mut self) {
        self.step_selection(ordering::step_up);
    }

    fn step_selection(&mut self, step: fn(usize, Option<usize>) -> Option<usize>) {
        let page_size = self.settings.page_size.max(1);
        match self.tab {
            Tab::WeeklySummaries => {}
            Tab::Trips => {
                let rows = self.trip_rows();
                let current = ordering::position_of(&rows, self.selection.trip);
                if let Some(pos) = step(rows.len(), current) {
                    let index = rows[pos].index;
                    self.selection.clear();
                    self.selection.trip = Some(index);
                    self.pages[Tab::Trips.index()] = pos / page_size;
                }
            }
            Tab::Expenses => {
                let rows = self.expense_rows();
                let current = ordering::position_of(&rows, self.selection.expense);
                if let Some(pos) = step(rows.len(), current) {
                    let index = rows[pos].index;
                    self.selection.clear();
                    self.selection.expense = Some(index);
                    self.pages[Tab::Expenses.index()] = pos / page_size;
                }
            }
            Tab::Templates => self.step_templates_ring(step, page_size),
        }
    }

    /// Templates (alphabetical) followed by recurring trips, as one ring
    fn step_templates_ring(
        &mut self,
        step: fn(usize, Option<usize>) -> Option<usize>,
        page_size: usize,
    ) {
        let templates = self.template_rows();
        let template_count = templates.len();
        let recurring_count = self.data.recurring_trips.len();

        let current = match (self.selection.template, self.selection.recurring) {
            (Some(_), _) => ordering::position_of(&templates, self.selection.template),
            (None, Some(r)) => Some(template_count + r),
            (None, None) => None,
        };
        let Some(pos) = step(template_count + recurring_count, current) else {
            return;
        };

        let template_index = templates.get(pos).map(|row| row.index);
        self.selection.clear();
        match template_index {
            Some(index) => {
                self.selection.template = Some(index);
                self.pages[Tab::Templates.index()] = pos / page_size;
            }
            None => self.selection.recurring = Some(pos - template_count),
        }
    }

    pub(super) fn navigate_left(&mut self) {
        match self.tab {
            Tab::WeeklySummaries => {
                if let Some(week) = self.selected_week {
                    self.selected_week = Some(week.saturating_sub(1));
                }
            }
            _ => {
                let page = self.pages[self.tab.index()];
                if page > 0 {
                    self.change_page(page - 1);
                }
            }
        }
    }

    pub(super) fn navigate_right(&mut self) {
        match self.tab {
            Tab::WeeklySummaries => {
                let last = self.data.weekly_summaries.len().saturating_sub(1);
                if let Some(week) = self.selected_week {
                    self.selected_week = Some((week + 1).min(last));
                }
            }
            _ => {
                let page = self.current_page(self.tab);
                if page.index + 1 < page.count {
                    self.change_page(page.index + 1);
                }
            }
        }
    }

    /// Move to `page`; an active selection jumps to that page's first row
    fn change_page(&mut self, page: usize) {
        self.pages[self.tab.index()] = page;
        if self.selection.is_empty() {
            return;
        }
        let first = page * self.settings.page_size.max(1);
        let index = match self.tab {
            Tab::Trips => self.trip_rows().get(first).map(|row| row.index),
            Tab::Expenses => self.expense_rows().get(first).map(|row| row.index),
            Tab::Templates => self.template_rows().get(first).map(|row| row.index),
            Tab::WeeklySummaries => None,
        };
        self.selection.clear();
        match self.tab {
            Tab::Trips => self.selection.trip = index,
            Tab::Expenses => self.selection.expense = index,
            Tab::Templates => self.selection.template = index,
            Tab::WeeklySummaries => {}
        }
    }

    /// Bring selections, pages and the selected week back into range after
    /// the data changed
    pub(super) fn clamp_view(&mut self, shown_week: Option<NaiveDate>) {
        let data = &self.data;
        let sel = &mut self.selection;
        sel.trip = sel.trip.filter(|&i| i < data.trips.len());
        sel.expense = sel.expense.filter(|&i| i < data.expenses.len());
        sel.template = sel.template.filter(|&i| i < data.templates.len());
        sel.recurring = sel.recurring.filter(|&i| i < data.recurring_trips.len());

        for tab in [Tab::Trips, Tab::Expenses, Tab::Templates] {
            let page = self.current_page(tab);
            self.pages[tab.index()] = page.index;
        }

        if self.tab == Tab::WeeklySummaries {
            let summaries = &self.data.weekly_summaries;
            self.selected_week = if summaries.is_empty() {
                None
            } else {
                let kept = shown_week.and_then(|start| {
                    summaries.iter().position(|w| w.week_start == start)
                });
                Some(
                    kept.or(self.selected_week)
                        .unwrap_or(0)
                        .min(summaries.len() - 1),
                )
            };
        }
    }
}
