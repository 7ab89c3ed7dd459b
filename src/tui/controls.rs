//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::App;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Right | KeyCode::Char('l' | 'n') => app.next_week(),
        KeyCode::Left | KeyCode::Char('h' | 'p') => app.prev_week(),
        KeyCode::Char('+' | '=') | KeyCode::Up => app.more_bands(),
        KeyCode::Char('-') | KeyCode::Down => app.fewer_bands(),
        KeyCode::Char('s') => app.save(),
        _ => {}
    }
}
