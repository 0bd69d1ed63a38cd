//! Raw mode, alternate screen, hidden cursor and bracketed paste for the
//! lifetime of the session, restored in reverse order on exit or panic.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    event::{DisableBracketedPaste, EnableBracketedPaste},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use std::io::{stdout, Write};

/// One terminal setting the session changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Setting {
    RawMode,
    AlternateScreen,
    HiddenCursor,
    BracketedPaste,
}

impl Setting {
    fn apply(self) -> std::io::Result<()> {
        match self {
            Setting::RawMode => enable_raw_mode(),
            Setting::AlternateScreen => stdout().execute(EnterAlternateScreen).map(|_| ()),
            Setting::HiddenCursor => stdout().execute(Hide).map(|_| ()),
            Setting::BracketedPaste => stdout().execute(EnableBracketedPaste).map(|_| ()),
        }
    }

    fn revert(self) -> std::io::Result<()> {
        match self {
            Setting::RawMode => disable_raw_mode(),
            Setting::AlternateScreen => stdout().execute(LeaveAlternateScreen).map(|_| ()),
            Setting::HiddenCursor => stdout().execute(Show).map(|_| ()),
            Setting::BracketedPaste => stdout().execute(DisableBracketedPaste).map(|_| ()),
        }
    }

    /// Whether the session cannot run without it
    fn required(self) -> bool {
        matches!(self, Setting::RawMode | Setting::AlternateScreen)
    }
}

const SETTINGS: [Setting; 4] = [
    Setting::RawMode,
    Setting::AlternateScreen,
    Setting::HiddenCursor,
    Setting::BracketedPaste,
];

/// Settings applied so far; dropping the value restores the terminal.
#[derive(Debug, Default)]
pub struct TerminalModes {
    applied: Vec<Setting>,
}

impl TerminalModes {
    /// Apply every setting. If a required one fails, the ones already
    /// applied are reverted before returning the error.
    pub fn enable() -> Result<Self> {
        let mut modes = Self::default();
        for setting in SETTINGS {
            match setting.apply() {
                Ok(()) => {
                    tracing::debug!("Applied {:?}", setting);
                    modes.applied.push(setting);
                }
                Err(e) if setting.required() => {
                    tracing::error!("Failed to apply {:?}: {}", setting, e);
                    modes.undo();
                    return Err(e.into());
                }
                Err(e) => tracing::warn!("Skipping {:?}: {}", setting, e),
            }
        }
        Ok(modes)
    }

    /// Revert applied settings, newest first. Safe to call repeatedly.
    pub fn undo(&mut self) {
        while let Some(setting) = self.applied.pop() {
            if let Err(e) = setting.revert() {
                tracing::warn!("Failed to revert {:?}: {}", setting, e);
            }
        }
        let _ = stdout().flush();
    }

    pub fn is_active(&self) -> bool {
        !self.applied.is_empty()
    }
}

impl Drop for TerminalModes {
    fn drop(&mut self) {
        self.undo();
    }
}

/// Revert everything without bookkeeping; for the panic hook, where the
/// `TerminalModes` value is out of reach.
pub fn emergency_cleanup() {
    for setting in SETTINGS.iter().rev() {
        let _ = setting.revert();
    }
    let _ = stdout().flush();
}
