use std::{borrow::Cow, ops::Deref};

use crossterm::event::{KeyCode, KeyEvent as CrosstermKeyEvent, KeyModifiers};

/// Short human name of a key, as shown in help lines ("ctrl-c", "enter").
pub fn key_event_to_string(key_event: &CrosstermKeyEvent) -> String {
    let key_code: Cow<'static, str> = match key_event.code {
        KeyCode::Backspace => "backspace".into(),
        KeyCode::Enter => "enter".into(),
        KeyCode::Left => "left".into(),
        KeyCode::Right => "right".into(),
        KeyCode::Up => "up".into(),
        KeyCode::Down => "down".into(),
        KeyCode::Home => "home".into(),
        KeyCode::End => "end".into(),
        KeyCode::PageUp => "pageup".into(),
        KeyCode::PageDown => "pagedown".into(),
        KeyCode::Tab => "tab".into(),
        KeyCode::BackTab => "backtab".into(),
        KeyCode::Delete => "delete".into(),
        KeyCode::Insert => "insert".into(),
        KeyCode::F(n) => format!("f{n}").into(),
        KeyCode::Char(' ') => "space".into(),
        KeyCode::Char(c) => c.to_string().into(),
        KeyCode::Esc => "esc".into(),
        _ => "".into(),
    };

    let mut parts = Vec::with_capacity(4);
    if key_event.modifiers.intersects(KeyModifiers::CONTROL) {
        parts.push("ctrl");
    }
    if key_event.modifiers.intersects(KeyModifiers::SHIFT) {
        parts.push("shift");
    }
    if key_event.modifiers.intersects(KeyModifiers::ALT) {
        parts.push("alt");
    }
    parts.push(&*key_code);
    parts.join("-")
}

/// Comparable key binding, ignoring event kind and state.
#[derive(Clone, Debug)]
pub struct KeyEvent(pub CrosstermKeyEvent);

impl PartialEq for KeyEvent {
    fn eq(&self, other: &Self) -> bool {
        self.0.code == other.0.code && self.0.modifiers == other.0.modifiers
    }
}

impl From<CrosstermKeyEvent> for KeyEvent {
    fn from(key_event: CrosstermKeyEvent) -> Self {
        Self(key_event)
    }
}
impl From<KeyCode> for KeyEvent {
    fn from(key_code: KeyCode) -> Self {
        Self(CrosstermKeyEvent::new(key_code, KeyModifiers::NONE))
    }
}
impl From<char> for KeyEvent {
    fn from(c: char) -> Self {
        Self(CrosstermKeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }
}
impl From<KeyEvent> for CrosstermKeyEvent {
    fn from(val: KeyEvent) -> Self {
        val.0
    }
}
impl Deref for KeyEvent {
    type Target = CrosstermKeyEvent;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl std::fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", key_event_to_string(self))
    }
}

#[cfg(test)]
pub mod test_utils {
    use crate::tui::Event;

    use super::*;

    pub fn get_key_evt(key: KeyCode) -> Event {
        Event::Key(CrosstermKeyEvent::new(key, KeyModifiers::NONE))
    }
    pub fn get_char_evt(key: char) -> Event {
        Event::Key(CrosstermKeyEvent::new(
            KeyCode::Char(key),
            KeyModifiers::NONE,
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn key_names() {
        assert_eq!(KeyEvent::from(KeyCode::Enter).to_string(), "enter");
        assert_eq!(KeyEvent::from(' ').to_string(), "space");
        assert_eq!(KeyEvent::from(KeyCode::F(5)).to_string(), "f5");
        let ctrl_c = CrosstermKeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_event_to_string(&ctrl_c), "ctrl-c");
    }

    #[test]
    fn equality_ignores_kind() {
        let mut released = CrosstermKeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
        released.kind = crossterm::event::KeyEventKind::Release;
        assert_eq!(KeyEvent::from(released), KeyEvent::from(KeyCode::Tab));
    }
}
