//! Tiered, tab-aware help
//!
//! Level 1 lists the essentials, level 2 adds the rest of the keys, level 3
//! adds workflow tips. Each level shows everything the lower levels show.

use super::tabs::Tab;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HelpLevel {
    Basic = 1,
    Detailed = 2,
    Advanced = 3,
}

impl HelpLevel {
    pub fn number(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpState {
    pub visible: bool,
    pub level: HelpLevel,
}

impl Default for HelpState {
    fn default() -> Self {
        Self {
            visible: false,
            level: HelpLevel::Basic,
        }
    }
}

impl HelpState {
    pub fn open(&mut self, level: HelpLevel) {
        self.visible = true;
        self.level = level;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    pub keys: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpSection {
    pub title: String,
    pub entries: Vec<HelpEntry>,
}

const fn entry(level: HelpLevel, keys: &'static str, description: &'static str) -> (HelpLevel, HelpEntry) {
    (level, HelpEntry { keys, description })
}

const NAVIGATION: &[(HelpLevel, HelpEntry)] = &[
    entry(HelpLevel::Basic, "Enter", "Confirm the current field"),
    entry(HelpLevel::Basic, "Esc", "Close help or cancel the current entry"),
    entry(HelpLevel::Basic, "Tab / Shift+Tab", "Next / previous tab"),
    entry(HelpLevel::Basic, "Up / Down", "Select the previous / next row"),
    entry(HelpLevel::Basic, "Ctrl+C", "Quit"),
    entry(HelpLevel::Detailed, "Left / Right", "Previous / next page (week on Weekly Summaries)"),
    entry(HelpLevel::Detailed, "F1 / F2 / F3", "Basic / detailed / advanced help"),
    entry(HelpLevel::Detailed, "Backspace", "Delete the last typed character"),
];

const WEEKLY: &[(HelpLevel, HelpEntry)] = &[
    entry(HelpLevel::Basic, "type a date", "Start logging a trip (YYYY-MM-DD)"),
    entry(HelpLevel::Basic, "Ctrl+X", "Log an expense"),
    entry(HelpLevel::Detailed, "Left / Right", "Step through weeks"),
    entry(HelpLevel::Detailed, "Ctrl+R", "Create a recurring trip"),
];

const TRIPS: &[(HelpLevel, HelpEntry)] = &[
    entry(HelpLevel::Basic, "type a date", "Start logging a trip (YYYY-MM-DD)"),
    entry(HelpLevel::Basic, "Ctrl+E", "Edit the selected trip"),
    entry(HelpLevel::Basic, "Ctrl+D", "Delete the selected trip"),
    entry(HelpLevel::Detailed, "Ctrl+F", "Search trips by place, date or type"),
    entry(HelpLevel::Detailed, "Ctrl+R", "Make the selected trip recurring"),
];

const EXPENSES: &[(HelpLevel, HelpEntry)] = &[
    entry(HelpLevel::Basic, "Ctrl+X", "Log an expense"),
    entry(HelpLevel::Basic, "Ctrl+E", "Edit the selected expense"),
    entry(HelpLevel::Basic, "Ctrl+D", "Delete the selected expense"),
    entry(HelpLevel::Detailed, "$", "Amounts may start with a dollar sign"),
];

const TEMPLATES: &[(HelpLevel, HelpEntry)] = &[
    entry(HelpLevel::Basic, "Ctrl+T", "Create a template"),
    entry(HelpLevel::Basic, "Ctrl+U", "Log a trip from the selected template"),
    entry(HelpLevel::Basic, "Ctrl+D", "Delete the selected template or recurring trip"),
    entry(HelpLevel::Detailed, "Ctrl+E", "Edit the selected template"),
    entry(HelpLevel::Detailed, "Ctrl+R", "Create a recurring trip"),
];

const TIPS: &[HelpEntry] = &[
    HelpEntry {
        keys: "miles",
        description: "Known routes reuse their recorded miles; new routes are looked up",
    },
    HelpEntry {
        keys: "round",
        description: "Round trips count the one-way distance twice",
    },
    HelpEntry {
        keys: "recurring",
        description: "Recurring trips are filled in up to today each time the log opens",
    },
    HelpEntry {
        keys: "edit",
        description: "While editing, Enter on an empty field keeps the old value",
    },
    HelpEntry {
        keys: "delete",
        description: "Anything other than 'yes' cancels a deletion",
    },
];

fn visible(entries: &[(HelpLevel, HelpEntry)], level: HelpLevel) -> Vec<HelpEntry> {
    entries
        .iter()
        .filter(|(min, _)| *min <= level)
        .map(|(_, e)| e.clone())
        .collect()
}

/// Help sections for `tab` at `level`
pub fn help_sections(tab: Tab, level: HelpLevel) -> Vec<HelpSection> {
    let tab_entries = match tab {
        Tab::WeeklySummaries => WEEKLY,
        Tab::Trips => TRIPS,
        Tab::Expenses => EXPENSES,
        Tab::Templates => TEMPLATES,
    };

    let mut sections = vec![
        HelpSection {
            title: "Navigation".to_string(),
            entries: visible(NAVIGATION, level),
        },
        HelpSection {
            title: tab.title().to_string(),
            entries: visible(tab_entries, level),
        },
    ];
    if level == HelpLevel::Advanced {
        sections.push(HelpSection {
            title: "Tips".to_string(),
            entries: TIPS.to_vec(),
        });
    }
    sections
}
