//! Watermark (placeholder simulation) for text inputs.
//!
//! A watermark is placeholder text written into the field itself and marked
//! with a style class, so the host can render it dimmed. It is cleared when
//! the field gains focus and restored when the field loses focus empty.
//!
//! ```text
//!              focus gained
//!  Watermarked ────────────▶ Editing ──┐
//!       ▲                       │      │ focus lost, value not empty
//!       └───────────────────────┘ ◀────┘
//!        focus lost, value empty
//! ```
//!
//! The field is any type implementing [`WatermarkTarget`]. Binding stores a
//! [`Watermark`] in the field; the field calls [`Watermark::focus_gained`] and
//! [`Watermark::focus_lost`] from its own focus notifications.

use tracing::{debug, warn};

/// Style class applied while the watermark text is shown.
pub(crate) const DEFAULT_CLASS: &str = "watermark";

/// Why a field cannot carry a watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub(crate) enum InvalidTargetReason {
    #[error("the field is read-only")]
    ReadOnly,
    #[error("the field does not receive focus events")]
    NotFocusable,
    #[error("the field already carries a watermark")]
    AlreadyBound,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum WatermarkError {
    #[error("cannot watermark field `{field}`: {reason}")]
    InvalidTarget {
        field: String,
        reason: InvalidTargetReason,
    },
}

/// The operations a text-input-like element offers to the binder.
pub(crate) trait WatermarkTarget {
    /// Name used in errors and logs.
    fn field_name(&self) -> &str;

    fn value(&self) -> &str;
    fn set_value(&mut self, value: &str);

    fn add_class(&mut self, class: &str);
    fn remove_class(&mut self, class: &str);
    fn has_class(&self, class: &str) -> bool;

    /// Whether the field supports value writes and focus notifications, and
    /// has no watermark yet.
    fn bindable(&self) -> Result<(), InvalidTargetReason>;

    /// Register the focus reactions of `watermark` on this field.
    fn attach_watermark(&mut self, watermark: Watermark);
}

/// Observable state of a bound field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WatermarkState {
    /// Showing the watermark text with the watermark class.
    Watermarked,
    /// Showing real or empty content, unstyled.
    Editing,
}

/// Per-binding state: the text to show and the class marking it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Watermark {
    text: String,
    class: String,
}

impl Watermark {
    pub fn new<T: Into<String>>(text: T) -> Self {
        Self {
            text: text.into(),
            class: DEFAULT_CLASS.to_string(),
        }
    }

    pub fn with_class<T: Into<String>>(self, class: T) -> Self {
        Self {
            class: class.into(),
            ..self
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    /// Put `field` into the watermarked state and register the reactions.
    ///
    /// The field is validated before anything is changed, so a failed bind
    /// leaves it untouched.
    pub fn bind<T: WatermarkTarget + ?Sized>(self, field: &mut T) -> Result<(), WatermarkError> {
        field
            .bindable()
            .map_err(|reason| WatermarkError::InvalidTarget {
                field: field.field_name().to_string(),
                reason,
            })?;

        if self.text.is_empty() {
            // Watermarked and empty-editing look the same in this case.
            warn!(
                field = field.field_name(),
                "binding an empty watermark, it will not be visible"
            );
        }

        field.add_class(&self.class);
        field.set_value(&self.text);
        debug!(field = field.field_name(), text = %self.text, "watermark bound");
        field.attach_watermark(self);
        Ok(())
    }

    /// Reaction to the field becoming the input target.
    ///
    /// Keyed off the value rather than the class, since the field may have been
    /// changed by someone else since the last event. Returns whether the field
    /// changed.
    pub fn focus_gained<T: WatermarkTarget + ?Sized>(&self, field: &mut T) -> bool {
        let value = field.value();
        if value.is_empty() || value == self.text {
            field.remove_class(&self.class);
            field.set_value("");
            debug!(field = field.field_name(), "watermark cleared");
            true
        } else {
            false
        }
    }

    /// Reaction to the field no longer being the input target. Returns whether
    /// the field changed.
    pub fn focus_lost<T: WatermarkTarget + ?Sized>(&self, field: &mut T) -> bool {
        if field.value().is_empty() {
            field.add_class(&self.class);
            field.set_value(&self.text);
            debug!(field = field.field_name(), "watermark restored");
            true
        } else {
            false
        }
    }

    /// True when `field` shows this watermark: class applied and text equal.
    pub fn is_showing<T: WatermarkTarget + ?Sized>(&self, field: &T) -> bool {
        field.has_class(&self.class) && field.value() == self.text
    }

    pub fn state<T: WatermarkTarget + ?Sized>(&self, field: &T) -> WatermarkState {
        if self.is_showing(field) {
            WatermarkState::Watermarked
        } else {
            WatermarkState::Editing
        }
    }
}

/// Bind a watermark with the default class to `field`.
pub(crate) fn bind<T, S>(field: &mut T, text: S) -> Result<(), WatermarkError>
where
    T: WatermarkTarget + ?Sized,
    S: Into<String>,
{
    Watermark::new(text).bind(field)
}

#[cfg(test)]
pub(crate) mod test_utils {
    use std::collections::BTreeSet;

    use super::*;

    /// Minimal in-memory field.
    #[derive(Debug, Default)]
    pub(crate) struct TestField {
        pub value: String,
        pub classes: BTreeSet<String>,
        pub read_only: bool,
        pub focusable: bool,
        pub watermark: Option<Watermark>,
    }

    impl TestField {
        pub fn new() -> Self {
            Self {
                focusable: true,
                ..Default::default()
            }
        }

        pub fn gain_focus(&mut self) {
            if let Some(watermark) = self.watermark.clone() {
                watermark.focus_gained(self);
            }
        }

        pub fn lose_focus(&mut self) {
            if let Some(watermark) = self.watermark.clone() {
                watermark.focus_lost(self);
            }
        }
    }

    impl WatermarkTarget for TestField {
        fn field_name(&self) -> &str {
            "test"
        }
        fn value(&self) -> &str {
            &self.value
        }
        fn set_value(&mut self, value: &str) {
            self.value = value.to_string();
        }
        fn add_class(&mut self, class: &str) {
            self.classes.insert(class.to_string());
        }
        fn remove_class(&mut self, class: &str) {
            self.classes.remove(class);
        }
        fn has_class(&self, class: &str) -> bool {
            self.classes.contains(class)
        }
        fn bindable(&self) -> Result<(), InvalidTargetReason> {
            if self.read_only {
                Err(InvalidTargetReason::ReadOnly)
            } else if !self.focusable {
                Err(InvalidTargetReason::NotFocusable)
            } else if self.watermark.is_some() {
                Err(InvalidTargetReason::AlreadyBound)
            } else {
                Ok(())
            }
        }
        fn attach_watermark(&mut self, watermark: Watermark) {
            self.watermark = Some(watermark);
        }
    }
}
