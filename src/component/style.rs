use std::{collections::HashMap, str::FromStr};

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};
use strum::EnumString;
use tracing::warn;

/// Style of one class as written in the config file.
///
/// ```yaml
/// styles:
///   watermark:
///     fg: dark gray
///     modifiers: [italic]
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct StyleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
}

#[derive(Clone, Copy, Debug, EnumString)]
#[strum(ascii_case_insensitive)]
enum StyleModifier {
    Bold,
    Dim,
    Italic,
    Underlined,
    Reversed,
    CrossedOut,
}

impl From<StyleModifier> for Modifier {
    fn from(value: StyleModifier) -> Self {
        match value {
            StyleModifier::Bold => Modifier::BOLD,
            StyleModifier::Dim => Modifier::DIM,
            StyleModifier::Italic => Modifier::ITALIC,
            StyleModifier::Underlined => Modifier::UNDERLINED,
            StyleModifier::Reversed => Modifier::REVERSED,
            StyleModifier::CrossedOut => Modifier::CROSSED_OUT,
        }
    }
}

fn parse_color(class: &str, color: &Option<String>) -> Option<Color> {
    let color = color.as_ref()?;
    match Color::from_str(color) {
        Ok(c) => Some(c),
        Err(_) => {
            warn!(class, color = %color, "unknown color in style, ignored");
            None
        }
    }
}

impl StyleSpec {
    fn to_style(&self, class: &str) -> Style {
        let mut style = Style::default();
        if let Some(fg) = parse_color(class, &self.fg) {
            style = style.fg(fg);
        }
        if let Some(bg) = parse_color(class, &self.bg) {
            style = style.bg(bg);
        }
        for name in &self.modifiers {
            match StyleModifier::from_str(name) {
                Ok(m) => style = style.add_modifier(m.into()),
                Err(_) => warn!(class, modifier = %name, "unknown modifier in style, ignored"),
            }
        }
        style
    }
}

/// Resolved styles of the style classes, by class name.
#[derive(Clone, Debug, Default)]
pub struct StyleSheet {
    classes: HashMap<String, Style>,
}

impl StyleSheet {
    pub fn new(specs: &HashMap<String, StyleSpec>) -> Self {
        Self {
            classes: specs
                .iter()
                .map(|(class, spec)| (class.clone(), spec.to_style(class)))
                .collect(),
        }
    }

    /// Combine the styles of `classes`, later classes win.
    pub fn resolve<'a, I: IntoIterator<Item = &'a String>>(&self, classes: I) -> Style {
        classes
            .into_iter()
            .filter_map(|class| self.classes.get(class))
            .fold(Style::default(), |acc, style| acc.patch(*style))
    }
}
