//! Tracked work items and their lifecycle states.

use crate::format::single_line;
use crate::theme::{ColorScheme, Tags};
use crossterm::style::Color;
use std::time::Instant;

/// Lifecycle state of a tracked item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemState {
    /// Queued; carries the label shown while waiting
    Pending(String),
    /// In flight; label set by the caller
    Working(String),
    /// Finished successfully
    Done,
    /// Failed
    Error,
    /// Caller-supplied tag, rendered without color
    Custom(String),
}

impl ItemState {
    /// The default state of a freshly registered item.
    pub fn pending(tags: &Tags) -> Self {
        Self::Pending(tags.pending.to_string())
    }

    /// Text shown inside the bracketed state field.
    pub fn label<'a>(&'a self, tags: &Tags) -> &'a str {
        match self {
            Self::Pending(label) | Self::Working(label) | Self::Custom(label) => label,
            Self::Done => tags.done,
            Self::Error => tags.error,
        }
    }

    /// Color for the state field, if any.
    pub fn color(&self, colors: &ColorScheme) -> Option<Color> {
        match self {
            Self::Pending(_) => Some(colors.pending),
            Self::Working(_) => Some(colors.working),
            Self::Done => Some(colors.success),
            Self::Error => Some(colors.error),
            Self::Custom(_) => None,
        }
    }

    /// Same state with its label flattened onto one line.
    pub fn single_line(self) -> Self {
        match self {
            Self::Pending(label) => Self::Pending(single_line(&label)),
            Self::Working(label) => Self::Working(single_line(&label)),
            Self::Custom(label) => Self::Custom(single_line(&label)),
            fixed @ (Self::Done | Self::Error) => fixed,
        }
    }
}

impl From<&str> for ItemState {
    fn from(label: &str) -> Self {
        Self::Custom(label.to_string())
    }
}

impl From<String> for ItemState {
    fn from(label: String) -> Self {
        Self::Custom(label)
    }
}

/// One tracked unit of work and the content of its terminal row.
///
/// Items never store their row: the row is a function of how many items
/// were registered after them, see [`crate::registry::Registry::find_most_recent`].
#[derive(Debug, Clone)]
pub struct Item {
    /// Caller-chosen lookup key
    pub key: String,
    /// Display label
    pub name: String,
    /// Current lifecycle state
    pub state: ItemState,
    /// Still in flight
    pub active: bool,
    /// Trailing annotation; finish and error append to it
    pub info: String,
    /// Registration instant
    pub start: Instant,
}

impl Item {
    /// Create an active item starting now.
    ///
    /// Control characters in the state label, name and info are replaced
    /// with spaces so the row stays one line tall.
    pub fn new(state: ItemState, key: &str, name: &str, info: &str) -> Self {
        Self {
            key: key.to_string(),
            name: single_line(name),
            state: state.single_line(),
            active: true,
            info: single_line(info),
            start: Instant::now(),
        }
    }

    /// Replace the state, flattening its label onto one line.
    pub fn set_state(&mut self, state: ItemState) {
        self.state = state.single_line();
    }

    /// Append ` text` to the trailing annotation, flattened onto one line.
    pub fn append_info(&mut self, text: &str) {
        self.info.push(' ');
        self.info.push_str(&single_line(text));
    }
}
