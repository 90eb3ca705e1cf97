use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Intent;

/// What a key press means on the current screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    Back,
    Select,
    CursorDown,
    CursorUp,
    CursorTop,
    CursorBottom,
    Playback(Intent),
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Keys on the tracks screen. `pending_gg` carries the first `g` of `gg`.
pub fn tracks_action(key: KeyEvent, pending_gg: &mut bool) -> Option<Action> {
    if is_ctrl_c(&key) {
        return Some(Action::Quit);
    }

    let was_pending = std::mem::take(pending_gg);
    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::CursorDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::CursorUp),
        KeyCode::Char('g') if was_pending => Some(Action::CursorTop),
        KeyCode::Char('g') => {
            *pending_gg = true;
            None
        }
        KeyCode::Char('G') | KeyCode::End => Some(Action::CursorBottom),
        KeyCode::Home => Some(Action::CursorTop),
        KeyCode::Enter => Some(Action::Select),
        _ => None,
    }
}

/// Keys on the playback screen. `Esc` cancels a scrub before it leaves.
pub fn playback_action(key: KeyEvent, dragging: bool) -> Option<Action> {
    if is_ctrl_c(&key) {
        return Some(Action::Quit);
    }

    let intent = match key.code {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Esc if dragging => Intent::CancelSeek,
        KeyCode::Esc | KeyCode::Backspace => return Some(Action::Back),
        KeyCode::Char(' ') | KeyCode::Char('p') => Intent::TogglePlayback,
        KeyCode::Char('l') | KeyCode::Right => Intent::Next,
        KeyCode::Char('h') | KeyCode::Left => Intent::Previous,
        KeyCode::Char('L') => Intent::ScrubForward,
        KeyCode::Char('H') => Intent::ScrubBack,
        KeyCode::Enter => Intent::CommitSeek,
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => Intent::VolumeUp,
        KeyCode::Char('-') | KeyCode::Down => Intent::VolumeDown,
        KeyCode::Char('m') => Intent::ToggleMute,
        _ => return None,
    };
    Some(Action::Playback(intent))
}
