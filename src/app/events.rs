use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use crate::app::{Action, App};
use crate::state::{Focus, View};

const CONSOLE_SCROLL_STEP: i16 = 5;

/// Map a terminal event to an action. `None` means quit.
pub fn handle_event(event: &Event, app: &App) -> Option<Action> {
    match event {
        Event::Key(key) => {
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

            // Global Ctrl shortcuts (always handled first)
            if ctrl {
                match key.code {
                    KeyCode::Char('q') => return None,
                    KeyCode::Char('g') if app.ui.notification.is_none() => return Some(Action::ToggleGallery),
                    KeyCode::Char('x') if app.ui.notification.is_none() => return Some(Action::ClearFields),
                    _ => {}
                }
            }

            // A blocking notification swallows everything until dismissed
            if app.ui.notification.is_some() {
                return Some(match key.code {
                    KeyCode::Enter | KeyCode::Esc => Action::DismissNotification,
                    _ => Action::None,
                });
            }

            if let Some(action) = function_key(key) {
                return Some(action);
            }

            let action = match app.ui.view {
                View::Gallery => gallery_key(key),
                View::Form => form_key(key, app.ui.focus),
            };
            Some(action)
        }
        Event::Paste(text) if app.ui.notification.is_none() && app.ui.view == View::Form => {
            let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
            Some(Action::PasteText(normalized))
        }
        _ => Some(Action::None),
    }
}

/// Helper shortcuts, available on every view.
fn function_key(key: &KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::F(2) => Action::GenerateVoice,
        KeyCode::F(3) => Action::Deploy,
        KeyCode::F(5) => Action::StartNgrokServer,
        KeyCode::F(6) => Action::StartMidjourneyServer,
        KeyCode::F(7) => Action::RunNgrok,
        KeyCode::F(8) => Action::RunMidjourney,
        _ => return None,
    };
    Some(action)
}

fn gallery_key(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Right | KeyCode::Char('l') => Action::GalleryNext,
        KeyCode::Left | KeyCode::Char('h') => Action::GalleryPrev,
        KeyCode::Char(c @ '1'..='9') => Action::GallerySelect(c as usize - '1' as usize),
        KeyCode::Esc => Action::ToggleGallery,
        _ => Action::None,
    }
}

fn form_key(key: &KeyEvent, focus: Focus) -> Action {
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Tab if shift => Action::FocusPrev,
        KeyCode::Tab | KeyCode::Down => Action::FocusNext,
        KeyCode::BackTab | KeyCode::Up => Action::FocusPrev,
        KeyCode::PageUp => Action::ScrollConsole(CONSOLE_SCROLL_STEP),
        KeyCode::PageDown => Action::ScrollConsole(-CONSOLE_SCROLL_STEP),
        KeyCode::Enter => Action::Submit,
        _ => match focus {
            Focus::Category => match key.code {
                KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => Action::ToggleCategory,
                _ => Action::None,
            },
            Focus::Name => match key.code {
                KeyCode::Right | KeyCode::Char(' ') => Action::CycleName(true),
                KeyCode::Left => Action::CycleName(false),
                _ => Action::None,
            },
            Focus::Field(_) => match key.code {
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => Action::InsertChar(c),
                KeyCode::Backspace => Action::Backspace,
                _ => Action::None,
            },
            Focus::Generate => match key.code {
                KeyCode::Char(' ') => Action::Submit,
                _ => Action::None,
            },
        },
    }
}
