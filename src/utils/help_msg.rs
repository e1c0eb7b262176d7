use std::ops::Deref;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};

use super::key_events::KeyEvent;

#[derive(Debug, Clone)]
enum HelpKey {
    Key(KeyEvent),
    Plain(String),
}

/// One "description: key" pair of a help line.
#[derive(Debug, Clone)]
pub(crate) struct HelpEntry {
    key: HelpKey,
    desc: String,
}

impl HelpEntry {
    pub(crate) fn new<T: Into<String>, K: Into<KeyEvent>>(event: K, desc: T) -> Self {
        Self {
            key: HelpKey::Key(event.into()),
            desc: desc.into(),
        }
    }

    /// Entry whose key is free text, e.g. "j/k" for a pair of keys.
    pub(crate) fn new_plain<T: Into<String>>(keys: T, desc: T) -> Self {
        Self {
            key: HelpKey::Plain(keys.into()),
            desc: desc.into(),
        }
    }

    pub(crate) fn key(&self) -> String {
        match &self.key {
            HelpKey::Key(key) => key.to_string(),
            HelpKey::Plain(key) => key.clone(),
        }
    }

    pub(crate) fn desc(&self) -> &str {
        &self.desc
    }
}

impl std::fmt::Display for HelpEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.desc(), self.key())
    }
}

#[derive(Default, Clone, Debug)]
pub(crate) struct HelpMsg {
    entries: Vec<HelpEntry>,
}

impl From<Vec<HelpEntry>> for HelpMsg {
    fn from(entries: Vec<HelpEntry>) -> Self {
        Self { entries }
    }
}

impl HelpMsg {
    pub(crate) fn extend(&mut self, other: &HelpMsg) {
        self.entries.extend(other.entries.iter().cloned());
    }

    pub(crate) fn push(&mut self, entry: HelpEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn render(&self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(self.to_string())
            .style(Style::default().fg(Color::Gray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .padding(Padding::horizontal(1)),
            );
        frame.render_widget(paragraph, area);
    }
}

impl Deref for HelpMsg {
    type Target = Vec<HelpEntry>;

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

impl std::fmt::Display for HelpMsg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let line = self
            .entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" | ");
        f.write_str(&line)
    }
}

#[cfg(test)]
mod test {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn entry_with_key() {
        let entry = HelpEntry::new('s', "Submit form");
        assert_eq!(entry.key(), "s");
        assert_eq!(entry.desc(), "Submit form");
        assert_eq!(entry.to_string(), "Submit form: s");
    }

    #[test]
    fn entry_plain() {
        let entry = HelpEntry::new_plain("j/k", "Move focus");
        assert_eq!(entry.key(), "j/k");
        assert_eq!(entry.to_string(), "Move focus: j/k");
    }

    #[test]
    fn message_line() {
        let mut msg = HelpMsg::from(vec![HelpEntry::new('q', "Quit")]);
        msg.extend(&HelpMsg::from(vec![HelpEntry::new_plain("j/k", "Move focus")]));
        msg.push(HelpEntry::new(crossterm::event::KeyCode::Enter, "Edit"));
        assert_eq!(msg.len(), 3);
        assert_snapshot!(msg.to_string(), @"Quit: q | Move focus: j/k | Edit: enter");
    }
}
