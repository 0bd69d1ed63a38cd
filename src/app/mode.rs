//! Interaction stages of the session
//!
//! Every stage belongs to exactly one flow. Edit flows carry the storage index
//! of the entity being edited inside the variant, so "is an edit in progress"
//! and "which entity" can never disagree.

/// Fields of the trip wizard, in entry order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TripField {
    Date,
    Origin,
    Destination,
    Type,
}

impl TripField {
    pub fn next(self) -> Option<Self> {
        match self {
            TripField::Date => Some(TripField::Origin),
            TripField::Origin => Some(TripField::Destination),
            TripField::Destination => Some(TripField::Type),
            TripField::Type => None,
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            TripField::Date => "Date (YYYY-MM-DD)",
            TripField::Origin => "Origin",
            TripField::Destination => "Destination",
            TripField::Type => "Type (single/round)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpenseField {
    Date,
    Amount,
    Description,
}

impl ExpenseField {
    pub fn next(self) -> Option<Self> {
        match self {
            ExpenseField::Date => Some(ExpenseField::Amount),
            ExpenseField::Amount => Some(ExpenseField::Description),
            ExpenseField::Description => None,
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            ExpenseField::Date => "Date (YYYY-MM-DD)",
            ExpenseField::Amount => "Amount",
            ExpenseField::Description => "Description",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecurringField {
    StartDate,
    Weekday,
    Origin,
    Destination,
    Type,
}

impl RecurringField {
    pub fn next(self) -> Option<Self> {
        match self {
            RecurringField::StartDate => Some(RecurringField::Weekday),
            RecurringField::Weekday => Some(RecurringField::Origin),
            RecurringField::Origin => Some(RecurringField::Destination),
            RecurringField::Destination => Some(RecurringField::Type),
            RecurringField::Type => None,
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            RecurringField::StartDate => "Start date (YYYY-MM-DD)",
            RecurringField::Weekday => "Weekday (0=Sun .. 6=Sat)",
            RecurringField::Origin => "Origin",
            RecurringField::Destination => "Destination",
            RecurringField::Type => "Type (single/round)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateField {
    Name,
    Origin,
    Destination,
    Type,
    Notes,
}

impl TemplateField {
    pub fn next(self) -> Option<Self> {
        match self {
            TemplateField::Name => Some(TemplateField::Origin),
            TemplateField::Origin => Some(TemplateField::Destination),
            TemplateField::Destination => Some(TemplateField::Type),
            TemplateField::Type => Some(TemplateField::Notes),
            TemplateField::Notes => None,
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            TemplateField::Name => "Name",
            TemplateField::Origin => "Origin",
            TemplateField::Destination => "Destination",
            TemplateField::Type => "Type (single/round)",
            TemplateField::Notes => "Notes (optional)",
        }
    }
}

/// Entity awaiting delete confirmation, by storage index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeleteTarget {
    Trip(usize),
    Expense(usize),
    Template(usize),
    Recurring(usize),
}

impl DeleteTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            DeleteTarget::Trip(_) => "trip",
            DeleteTarget::Expense(_) => "expense",
            DeleteTarget::Template(_) => "template",
            DeleteTarget::Recurring(_) => "recurring trip",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Trip creation; `Trip(TripField::Date)` doubles as the idle stage
    Trip(TripField),
    EditTrip { index: usize, field: TripField },
    Expense(ExpenseField),
    EditExpense { index: usize, field: ExpenseField },
    Recurring(RecurringField),
    /// Single stage: confirm the weekday of a schedule seeded from a trip
    ConvertToRecurring { trip: usize },
    Template(TemplateField),
    EditTemplate { index: usize, field: TemplateField },
    ConfirmDelete(DeleteTarget),
}

impl Default for Mode {
    fn default() -> Self {
        Mode::IDLE
    }
}

impl Mode {
    pub const IDLE: Mode = Mode::Trip(TripField::Date);

    pub fn is_idle(&self) -> bool {
        *self == Mode::IDLE
    }

    /// Storage index of the entity an edit flow is working on
    pub fn edit_index(&self) -> Option<usize> {
        match *self {
            Mode::EditTrip { index, .. }
            | Mode::EditExpense { index, .. }
            | Mode::EditTemplate { index, .. } => Some(index),
            _ => None,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.edit_index().is_some()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Mode::Trip(_) => "New trip",
            Mode::EditTrip { .. } => "Edit trip",
            Mode::Expense(_) => "New expense",
            Mode::EditExpense { .. } => "Edit expense",
            Mode::Recurring(_) => "New recurring trip",
            Mode::ConvertToRecurring { .. } => "Make recurring",
            Mode::Template(_) => "New template",
            Mode::EditTemplate { .. } => "Edit template",
            Mode::ConfirmDelete(_) => "Delete",
        }
    }

    pub fn prompt(&self) -> String {
        match self {
            Mode::Trip(field) | Mode::EditTrip { field, .. } => field.prompt().to_string(),
            Mode::Expense(field) | Mode::EditExpense { field, .. } => field.prompt().to_string(),
            Mode::Recurring(field) => field.prompt().to_string(),
            Mode::ConvertToRecurring { .. } => RecurringField::Weekday.prompt().to_string(),
            Mode::Template(field) | Mode::EditTemplate { field, .. } => {
                field.prompt().to_string()
            }
            Mode::ConfirmDelete(target) => {
                format!("Type 'yes' to delete this {}", target.kind())
            }
        }
    }
}
