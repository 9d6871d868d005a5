//! Event handling for the ratatui TUI
//!
//! Accept and cancel keys come from the [`Keymap`]; navigation and query
//! editing keys are fixed.

use super::state::AppState;
use crate::keybinds::{KeyAction, Keymap, key_to_string};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use std::time::Duration;

/// Result of handling an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult {
    /// Continue running the event loop
    Continue,
    /// Exit the finder with confirmation
    Confirm(Option<String>),
    /// Exit the finder as aborted
    Abort(Option<String>),
    /// Query changed, needs re-matching
    QueryChanged,
    /// No action taken
    Ignored,
}

/// Fixed cursor and preview movements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    Rows(isize),
    PageUp,
    PageDown,
    Start,
    End,
    Preview(isize),
}

fn movement(key: &KeyEvent) -> Option<Move> {
    let movement = match (key.code, key.modifiers) {
        (KeyCode::Up, KeyModifiers::SHIFT) | (KeyCode::Char('b'), KeyModifiers::ALT) => Move::Preview(-1),
        (KeyCode::Down, KeyModifiers::SHIFT) | (KeyCode::Char('f'), KeyModifiers::ALT) => Move::Preview(1),
        (KeyCode::Up, _) | (KeyCode::Char('k' | 'p'), KeyModifiers::CONTROL) => Move::Rows(-1),
        (KeyCode::Down, _) | (KeyCode::Char('j' | 'n'), KeyModifiers::CONTROL) => Move::Rows(1),
        (KeyCode::PageUp, _) => Move::PageUp,
        (KeyCode::PageDown, _) => Move::PageDown,
        (KeyCode::Home, _) => Move::Start,
        (KeyCode::End, _) => Move::End,
        _ => return None,
    };
    Some(movement)
}

fn apply_move(state: &mut AppState, movement: Move) {
    match movement {
        Move::Rows(delta) => state.move_cursor(delta),
        Move::PageUp => state.page_up(),
        Move::PageDown => state.page_down(),
        Move::Start => state.jump_to_start(),
        Move::End => state.jump_to_end(),
        Move::Preview(delta) => state.preview_scroll = state.preview_scroll.saturating_add_signed(delta),
    }
}

/// Apply a query edit or cursor move; `None` when the key is not for the query
fn edit_query(state: &mut AppState, key: &KeyEvent) -> Option<EventResult> {
    let query = &mut state.query;
    let changed = match (key.code, key.modifiers) {
        (KeyCode::Left, _) => {
            query.left();
            return Some(EventResult::Continue);
        }
        (KeyCode::Right, _) => {
            query.right();
            return Some(EventResult::Continue);
        }
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
            query.clear();
            true
        }
        (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
            query.delete_word();
            true
        }
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            query.insert(c);
            true
        }
        (KeyCode::Backspace, _) => query.backspace(),
        (KeyCode::Delete, _) => query.delete(),
        _ => return None,
    };
    Some(if changed {
        EventResult::QueryChanged
    } else {
        EventResult::Ignored
    })
}

/// Handle a key press
///
/// Keymap bindings take precedence, so an accept or cancel key never
/// edits the query.
pub fn handle_key(state: &mut AppState, key: KeyEvent, keymap: &Keymap) -> EventResult {
    match keymap.action_for(&key) {
        Some(KeyAction::Accept) => return EventResult::Confirm(key_to_string(&key)),
        Some(KeyAction::Cancel) => return EventResult::Abort(key_to_string(&key)),
        None => {}
    }

    if let Some(movement) = movement(&key) {
        apply_move(state, movement);
        return EventResult::Continue;
    }
    edit_query(state, &key).unwrap_or(EventResult::Ignored)
}

fn handle_mouse(state: &mut AppState, mouse: MouseEvent) -> EventResult {
    let delta = match mouse.kind {
        MouseEventKind::ScrollUp => -1,
        MouseEventKind::ScrollDown => 1,
        _ => return EventResult::Ignored,
    };
    state.move_cursor(delta);
    EventResult::Continue
}

/// Poll for events and handle them
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn poll_and_handle(state: &mut AppState, keymap: &Keymap, timeout: Duration) -> std::io::Result<EventResult> {
    if !event::poll(timeout)? {
        return Ok(EventResult::Continue);
    }

    let result = match event::read()? {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(state, key, keymap),
        Event::Mouse(mouse) => handle_mouse(state, mouse),
        Event::Resize(_, _) => EventResult::Continue,
        _ => EventResult::Ignored,
    };

    Ok(result)
}
