//! Key/modifier events and the crossterm decoding boundary.

use crossterm::event::{
    Event as CtEvent, KeyCode, KeyEvent, KeyModifiers as CtModifiers,
};

/// A single key, decoded from crossterm's raw key codes into the small
/// closed set this crate cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Space,
    Tab,
    Enter,
    Backspace,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Unknown,
}

/// Modifier flags, independent of the key they're paired with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    fn from_crossterm(m: CtModifiers) -> Self {
        Self {
            shift: m.contains(CtModifiers::SHIFT),
            ctrl: m.contains(CtModifiers::CONTROL),
            alt: m.contains(CtModifiers::ALT),
        }
    }
}

/// `{key, modifiers}` pair. Equality is purely structural, which is what
/// makes it usable as the edge label in [`crate::input_map::InputMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Input {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl Input {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Shorthand for an unmodified key, used throughout the static bindings
    /// table in [`crate::state::base::BaseState`].
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers {
                ctrl: true,
                ..Default::default()
            },
        }
    }

    /// Uppercase letter shorthand (`Input::upper('c')` == `Char('c')` with
    /// `shift` set), matching how a chord like `C, C` reads in §4.6.
    pub fn upper(c: char) -> Self {
        Self {
            key: Key::Char(c.to_ascii_lowercase()),
            modifiers: Modifiers {
                shift: true,
                ..Default::default()
            },
        }
    }

    /// Decodes a terminal event into an `Input`, or `None` for event kinds
    /// this crate doesn't act on (mouse, resize, focus, paste).
    pub fn from_terminal_event(event: &CtEvent) -> Option<Self> {
        match event {
            CtEvent::Key(key_event) => Some(Self::from_key_event(*key_event)),
            _ => None,
        }
    }

    fn from_key_event(ev: KeyEvent) -> Self {
        let modifiers = Modifiers::from_crossterm(ev.modifiers);
        let key = match ev.code {
            KeyCode::Char(' ') => Key::Space,
            KeyCode::Char(c) => Key::Char(c.to_ascii_lowercase()),
            KeyCode::Tab => Key::Tab,
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Esc => Key::Escape,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            _ => Key::Unknown,
        };
        Self { key, modifiers }
    }

    /// Whether this input would, if typed into a text field, append a
    /// printable character. Used by [`crate::state::modal::InputModalState`].
    pub fn printable_char(&self) -> Option<char> {
        match self.key {
            Key::Space => Some(' '),
            Key::Char(c) if self.modifiers.shift => Some(c.to_ascii_uppercase()),
            Key::Char(c) => Some(c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_letter() {
        let ev = CtEvent::Key(KeyEvent::new(KeyCode::Char('s'), CtModifiers::NONE));
        let input = Input::from_terminal_event(&ev).unwrap();
        assert_eq!(input, Input::plain(Key::Char('s')));
    }

    #[test]
    fn decodes_ctrl_c() {
        let ev = CtEvent::Key(KeyEvent::new(KeyCode::Char('c'), CtModifiers::CONTROL));
        let input = Input::from_terminal_event(&ev).unwrap();
        assert_eq!(input, Input::ctrl(Key::Char('c')));
    }

    #[test]
    fn uppercase_shorthand_matches_shifted_char() {
        let ev = CtEvent::Key(KeyEvent::new(KeyCode::Char('C'), CtModifiers::SHIFT));
        let input = Input::from_terminal_event(&ev).unwrap();
        assert_eq!(input, Input::upper('c'));
    }

    #[test]
    fn non_key_events_decode_to_none() {
        let ev = CtEvent::FocusGained;
        assert!(Input::from_terminal_event(&ev).is_none());
    }
}
