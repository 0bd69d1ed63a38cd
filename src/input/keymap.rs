//! Terminal key events to session events

use crate::app::{HelpLevel, SessionEvent};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Translate a key press. Key releases and unbound keys produce nothing.
pub fn translate(key: KeyEvent) -> Option<SessionEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        let KeyCode::Char(c) = key.code else {
            return None;
        };
        return match c.to_ascii_lowercase() {
            'c' => Some(SessionEvent::Quit),
            'x' => Some(SessionEvent::StartExpense),
            't' => Some(SessionEvent::StartTemplate),
            'e' => Some(SessionEvent::StartEdit),
            'd' => Some(SessionEvent::StartDelete),
            'r' => Some(SessionEvent::StartRecurringOrConvert),
            'u' => Some(SessionEvent::UseTemplate),
            'f' => Some(SessionEvent::ToggleSearch),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Enter => Some(SessionEvent::Confirm),
        KeyCode::Esc => Some(SessionEvent::Cancel),
        KeyCode::F(1) => Some(SessionEvent::OpenHelp(HelpLevel::Basic)),
        KeyCode::F(2) => Some(SessionEvent::OpenHelp(HelpLevel::Detailed)),
        KeyCode::F(3) => Some(SessionEvent::OpenHelp(HelpLevel::Advanced)),
        KeyCode::Up => Some(SessionEvent::NavigateUp),
        KeyCode::Down => Some(SessionEvent::NavigateDown),
        KeyCode::Left => Some(SessionEvent::NavigateLeft),
        KeyCode::Right => Some(SessionEvent::NavigateRight),
        KeyCode::Tab => Some(SessionEvent::SwitchTabForward),
        KeyCode::BackTab => Some(SessionEvent::SwitchTabBackward),
        KeyCode::Backspace => Some(SessionEvent::Backspace),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => {
            Some(SessionEvent::Input(c))
        }
        _ => None,
    }
}
