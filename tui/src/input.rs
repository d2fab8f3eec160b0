//! Key translation.
//!
//! Screens with a focused text field receive characters; everywhere else
//! letters are commands.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Quit,
    Logout,
    /// Jump to entry `n` of the side navigation.
    Nav(usize),
    Up,
    Down,
    Next,
    Prev,
    Cycle,
    Char(char),
    Backspace,
    Submit,
    Cancel,
    Search,
    SortPrimary,
    SortSecondary,
    Facet,
    Reload,
    Add,
    Ignore,
}

pub fn translate(key: KeyEvent, typing: bool) -> Input {
    if key.kind == KeyEventKind::Release {
        return Input::Ignore;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Input::Quit,
            KeyCode::Char('o') => Input::Logout,
            _ => Input::Ignore,
        };
    }

    match key.code {
        KeyCode::Enter => Input::Submit,
        KeyCode::Esc => Input::Cancel,
        KeyCode::Tab => Input::Next,
        KeyCode::BackTab => Input::Prev,
        KeyCode::Backspace => Input::Backspace,
        KeyCode::Up if typing => Input::Prev,
        KeyCode::Down if typing => Input::Next,
        KeyCode::Up => Input::Up,
        KeyCode::Down => Input::Down,
        KeyCode::Left | KeyCode::Right => Input::Cycle,
        KeyCode::Char(c) if typing => Input::Char(c),
        KeyCode::Char(c) => command(c),
        _ => Input::Ignore,
    }
}

fn command(c: char) -> Input {
    match c {
        'q' => Input::Quit,
        'x' => Input::Logout,
        'k' => Input::Up,
        'j' => Input::Down,
        '/' => Input::Search,
        's' => Input::SortPrimary,
        'S' => Input::SortSecondary,
        'f' => Input::Facet,
        'r' => Input::Reload,
        'a' => Input::Add,
        ' ' => Input::Cycle,
        '1'..='9' => Input::Nav(c as usize - '1' as usize),
        _ => Input::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn letters_are_commands_outside_text_fields() {
        assert_eq!(translate(key(KeyCode::Char('q')), false), Input::Quit);
        assert_eq!(translate(key(KeyCode::Char('3')), false), Input::Nav(2));
        assert_eq!(translate(key(KeyCode::Char('/')), false), Input::Search);
    }

    #[test]
    fn letters_are_text_inside_fields() {
        assert_eq!(translate(key(KeyCode::Char('q')), true), Input::Char('q'));
        assert_eq!(translate(key(KeyCode::Up), true), Input::Prev);
        assert_eq!(translate(key(KeyCode::Up), false), Input::Up);
    }

    #[test]
    fn control_c_always_quits() {
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(translate(ev, true), Input::Quit);
        assert_eq!(translate(ev, false), Input::Quit);
    }
}
