//! UI events - messages from the terminal layer to the view controller

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Application pages
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Page {
    #[default]
    Home,
    Download,
    Upload,
    Network,
    History,
    Leaderboard,
    Profile,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::Home,
        Page::Download,
        Page::Upload,
        Page::Network,
        Page::History,
        Page::Leaderboard,
        Page::Profile,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "1:Home",
            Page::Download => "2:Download",
            Page::Upload => "3:Upload",
            Page::Network => "4:Network",
            Page::History => "5:History",
            Page::Leaderboard => "6:Leaderboard",
            Page::Profile => "7:Profile",
        }
    }

    pub fn index(&self) -> usize {
        Page::ALL.iter().position(|p| p == self).unwrap_or(0)
    }

    pub fn next(&self) -> Page {
        Page::ALL[(self.index() + 1) % Page::ALL.len()]
    }

    pub fn prev(&self) -> Page {
        Page::ALL[(self.index() + Page::ALL.len() - 1) % Page::ALL.len()]
    }

    fn from_digit(c: char) -> Option<Page> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Page::ALL.get(i)).copied()
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    // Navigation
    SwitchPage(Page),
    NextPage,
    PrevPage,
    SelectNext,
    SelectPrev,

    // Text input
    StartInput,
    CharInput(char),
    Backspace,
    SubmitInput,
    CancelInput,

    // Transfers
    ToggleTransfer,
    RetryTransfer,
    DeleteTransfer,
    UploadAll,
    ClearFinished,

    // Peers
    GenerateInvite,
    ToggleBlock,

    // Filters
    CycleFilter,
    CycleSort,
    ToggleSortOrder,

    // Notifications and settings
    DismissNotification,
    ToggleTheme,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    page: Page,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::CancelInput),
            KeyCode::Enter => Some(UiEvent::SubmitInput),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
        InputMode::Normal => global_keys(key.code).or_else(|| page_keys(key.code, page)),
    }
}

fn global_keys(code: KeyCode) -> Option<UiEvent> {
    match code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('t') => Some(UiEvent::ToggleTheme),
        KeyCode::Char('x') => Some(UiEvent::DismissNotification),
        KeyCode::Char(c) if c.is_ascii_digit() => Page::from_digit(c).map(UiEvent::SwitchPage),
        KeyCode::Tab => Some(UiEvent::NextPage),
        KeyCode::BackTab => Some(UiEvent::PrevPage),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectPrev),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectNext),
        _ => None,
    }
}

fn page_keys(code: KeyCode, page: Page) -> Option<UiEvent> {
    match page {
        Page::Home => None,
        Page::Download => match code {
            KeyCode::Char('a') => Some(UiEvent::StartInput),
            KeyCode::Char(' ') => Some(UiEvent::ToggleTransfer),
            _ => None,
        },
        Page::Upload => match code {
            KeyCode::Char('a') => Some(UiEvent::StartInput),
            KeyCode::Char('u') => Some(UiEvent::UploadAll),
            KeyCode::Char('d') => Some(UiEvent::DeleteTransfer),
            KeyCode::Char('c') => Some(UiEvent::ClearFinished),
            _ => None,
        },
        Page::Network => match code {
            KeyCode::Char('a') => Some(UiEvent::StartInput),
            KeyCode::Char('g') => Some(UiEvent::GenerateInvite),
            KeyCode::Char('b') => Some(UiEvent::ToggleBlock),
            _ => None,
        },
        Page::History => match code {
            KeyCode::Char('/') => Some(UiEvent::StartInput),
            KeyCode::Char('f') => Some(UiEvent::CycleFilter),
            KeyCode::Char('s') => Some(UiEvent::CycleSort),
            KeyCode::Char('o') => Some(UiEvent::ToggleSortOrder),
            KeyCode::Char(' ') => Some(UiEvent::ToggleTransfer),
            KeyCode::Char('r') => Some(UiEvent::RetryTransfer),
            KeyCode::Char('d') => Some(UiEvent::DeleteTransfer),
            _ => None,
        },
        Page::Leaderboard => match code {
            KeyCode::Char('/') => Some(UiEvent::StartInput),
            KeyCode::Char('f') => Some(UiEvent::CycleFilter),
            _ => None,
        },
        Page::Profile => match code {
            KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::StartInput),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_digits_switch_pages() {
        let event = key_to_ui_event(press(KeyCode::Char('4')), Page::Home, InputMode::Normal, false);
        assert_eq!(event, Some(UiEvent::SwitchPage(Page::Network)));
        let event = key_to_ui_event(press(KeyCode::Char('9')), Page::Home, InputMode::Normal, false);
        assert_eq!(event, None);
    }

    #[test]
    fn test_editing_captures_characters() {
        let event = key_to_ui_event(press(KeyCode::Char('q')), Page::Profile, InputMode::Editing, false);
        assert_eq!(event, Some(UiEvent::CharInput('q')));
    }

    #[test]
    fn test_page_specific_keys() {
        let event = key_to_ui_event(press(KeyCode::Char('b')), Page::Network, InputMode::Normal, false);
        assert_eq!(event, Some(UiEvent::ToggleBlock));
        let event = key_to_ui_event(press(KeyCode::Char('b')), Page::History, InputMode::Normal, false);
        assert_eq!(event, None);
        let event = key_to_ui_event(press(KeyCode::Char('c')), Page::Upload, InputMode::Normal, false);
        assert_eq!(event, Some(UiEvent::ClearFinished));
    }

    #[test]
    fn test_help_popup_swallows_keys() {
        let event = key_to_ui_event(press(KeyCode::Char('q')), Page::Home, InputMode::Normal, true);
        assert_eq!(event, Some(UiEvent::CloseHelp));
    }

    #[test]
    fn test_page_cycle_wraps() {
        assert_eq!(Page::Profile.next(), Page::Home);
        assert_eq!(Page::Home.prev(), Page::Profile);
    }
}
