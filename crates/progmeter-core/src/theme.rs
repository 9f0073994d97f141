//! Meter Theme - Design system constants
//!
//! This module defines the visual vocabulary of the meter:
//! - Colors for each lifecycle state
//! - Tag labels shown inside the bracketed state field
//! - Column widths
//!
//! Rendering code never hardcodes any of these, so a caller can restyle
//! the meter by handing a different [`Theme`] to the config.

use crossterm::style::Color;

/// Default theme for the meter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Theme {
    /// Colors for the state field
    pub colors: ColorScheme,
    /// State field labels
    pub tags: Tags,
    /// Row layout constants
    pub layout: Layout,
}

/// Color scheme for the state field
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScheme {
    /// Queued, not yet picked up
    pub pending: Color,
    /// In flight
    pub working: Color,
    /// Finished successfully
    pub success: Color,
    /// Failed
    pub error: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            pending: Color::Yellow,
            working: Color::Magenta,
            success: Color::Green,
            error: Color::Red,
        }
    }
}

/// Labels for the built-in states
#[derive(Debug, Clone, PartialEq)]
pub struct Tags {
    /// Default label for freshly registered rows
    pub pending: &'static str,
    /// Label for finished rows
    pub done: &'static str,
    /// Label for failed rows
    pub error: &'static str,
}

impl Default for Tags {
    fn default() -> Self {
        Self {
            pending: "get",
            done: "done",
            error: "err",
        }
    }
}

/// Row layout constants
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Minimum width of the text inside `[...]`
    pub state_width: usize,
    /// Width the item name is right-padded to
    pub name_width: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            state_width: 4,
            name_width: 40,
        }
    }
}
