//! Meter configuration.

use crate::theme::Theme;
use crossterm::tty::IsTty;
use std::time::Duration;

/// How the meter talks to its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Colors, in-place row updates, periodic summary line
    #[default]
    Interactive,
    /// Append-only plain lines, no summary; for pipes and CI logs
    Minimal,
}

impl OutputMode {
    /// Map the classic `minimal` flag onto a mode.
    pub fn from_minimal(minimal: bool) -> Self {
        if minimal {
            Self::Minimal
        } else {
            Self::Interactive
        }
    }

    /// Pick a mode for stdout: minimal unless stdout is a capable terminal.
    pub fn detect() -> Self {
        let dumb = std::env::var("TERM").is_ok_and(|t| t == "dumb");
        Self::from_minimal(dumb || !std::io::stdout().is_tty())
    }
}

/// When the summary ticker starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickerStart {
    /// On the first registered item
    #[default]
    Lazy,
    /// As soon as the meter is created
    Eager,
}

/// Settings for a [`crate::ProgMeter`].
#[derive(Debug, Clone, PartialEq)]
pub struct MeterConfig {
    /// Output mode
    pub mode: OutputMode,
    /// Summary redraw period
    pub tick_interval: Duration,
    /// Ticker start policy
    pub ticker_start: TickerStart,
    /// Colors, labels and widths
    pub theme: Theme,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            mode: OutputMode::Interactive,
            tick_interval: Duration::from_secs(1),
            ticker_start: TickerStart::Lazy,
            theme: Theme::default(),
        }
    }
}

impl MeterConfig {
    /// Default config with the given `minimal` flag.
    pub fn minimal(minimal: bool) -> Self {
        Self::default().with_mode(OutputMode::from_minimal(minimal))
    }

    /// Set the output mode
    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the summary redraw period
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set the ticker start policy
    pub fn with_ticker_start(mut self, start: TickerStart) -> Self {
        self.ticker_start = start;
        self
    }

    /// Set the theme
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}
