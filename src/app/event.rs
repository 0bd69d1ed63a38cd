//! Input surface of the session, abstracted from terminal key events

use super::help::HelpLevel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Commit the current field
    Confirm,
    /// Close help, leave search, abandon the current entry, in that order
    Cancel,
    OpenHelp(HelpLevel),
    NavigateUp,
    NavigateDown,
    NavigateLeft,
    NavigateRight,
    SwitchTabForward,
    SwitchTabBackward,
    StartExpense,
    StartTemplate,
    StartEdit,
    StartDelete,
    StartRecurringOrConvert,
    UseTemplate,
    ToggleSearch,
    /// Append a typed character to the input buffer (or search query)
    Input(char),
    /// Append pasted text
    Paste(String),
    Backspace,
    Quit,
}

/// What the event loop should do after an event has been handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Continue,
    Quit,
}
