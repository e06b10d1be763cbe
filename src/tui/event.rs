//! Event types for the TUI
//!
//! Dual-channel event architecture:
//! - InputEvent: priority channel for user input (never dropped)
//! - DataEvent: data channel for fetch results (may be dropped under load)

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::LobbyRecord;

/// Input events from the terminal (priority channel - never dropped)
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Keyboard input
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
}

/// Data events from the fetcher task (data channel - may be dropped under load)
#[derive(Debug)]
pub enum DataEvent {
    /// A refresh completed; the raw record set is replaced wholesale
    LobbiesUpdated(Vec<LobbyRecord>),

    /// A refresh failed; the previous record set is kept
    FetchError { error: String },
}

/// Result of processing an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Continue running, UI needs redraw
    Continue,
    /// Continue running, no UI change needed
    Unchanged,
    /// Quit the application
    Quit,
}

/// Key action mappings for the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    // Selection within the current page
    MoveUp,
    MoveDown,
    MoveToTop,
    MoveToBottom,

    // Pagination
    PrevPage,
    NextPage,

    // Actions
    Refresh,
    ToggleAutoRefresh,
    CycleSort,
    OpenRegionMenu,
    QuickSearch,
    Select,
    YankSteamId,

    // UI
    ShowHelp,
    Escape,
    Quit,

    // Search mode specific
    SearchClear,
    SearchBackspace,
    SearchChar(char),

    // Unknown/unhandled
    Unknown,
}

impl KeyAction {
    /// Map a key event to an action based on current mode
    pub fn from_key_event(event: KeyEvent, in_search_mode: bool) -> Self {
        let KeyEvent {
            code, modifiers, ..
        } = event;

        // Search mode has different mappings
        if in_search_mode {
            return match code {
                KeyCode::Esc => KeyAction::Escape,
                KeyCode::Enter => KeyAction::Select,
                KeyCode::Backspace => KeyAction::SearchBackspace,
                KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
                    KeyAction::SearchClear
                }
                KeyCode::Char(c) => KeyAction::SearchChar(c),
                _ => KeyAction::Unknown,
            };
        }

        // Normal mode mappings
        match code {
            // Quit
            KeyCode::Char('q') => KeyAction::Quit,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,

            // Selection
            KeyCode::Char('j') | KeyCode::Down => KeyAction::MoveDown,
            KeyCode::Char('k') | KeyCode::Up => KeyAction::MoveUp,
            KeyCode::Char('g') | KeyCode::Home => KeyAction::MoveToTop,
            KeyCode::Char('G') | KeyCode::End => KeyAction::MoveToBottom,

            // Pagination
            KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => KeyAction::PrevPage,
            KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => KeyAction::NextPage,

            // Actions
            KeyCode::Enter => KeyAction::Select,
            KeyCode::Char('r') => KeyAction::Refresh,
            KeyCode::Char('a') => KeyAction::ToggleAutoRefresh,
            KeyCode::Char('s') => KeyAction::CycleSort,
            KeyCode::Char('f') => KeyAction::OpenRegionMenu,
            KeyCode::Char('/') => KeyAction::QuickSearch,
            KeyCode::Char('y') => KeyAction::YankSteamId,

            // Help
            KeyCode::Char('?') | KeyCode::F(1) => KeyAction::ShowHelp,
            KeyCode::Esc => KeyAction::Escape,

            _ => KeyAction::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_action_quit() {
        let event = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(KeyAction::from_key_event(event, false), KeyAction::Quit);
    }

    #[test]
    fn test_key_action_pagination() {
        let event = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(KeyAction::from_key_event(event, false), KeyAction::PrevPage);

        let event = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE);
        assert_eq!(KeyAction::from_key_event(event, false), KeyAction::NextPage);
    }

    #[test]
    fn test_search_mode_ctrl_u() {
        // In search mode, Ctrl+U clears input
        let event = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(
            KeyAction::from_key_event(event, true),
            KeyAction::SearchClear
        );
    }

    #[test]
    fn test_search_mode_captures_action_keys() {
        // Keys that are commands in normal mode become text in search mode
        let event = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(
            KeyAction::from_key_event(event, true),
            KeyAction::SearchChar('r')
        );
        assert_eq!(KeyAction::from_key_event(event, false), KeyAction::Refresh);
    }
}
