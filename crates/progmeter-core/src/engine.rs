//! Terminal Engine - Relative positioning for in-place rows
//!
//! This module solves the "where is my row" problem by using relative
//! coordinates. The cursor always rests on the line just below the last
//! registered row (the summary line). To touch an older row we move UP by
//! its distance from the end, draw, and move back DOWN by the same amount.
//!
//! Minimal mode has no addressable cursor: every update becomes a fresh
//! line and no color or cursor control is emitted. That decision lives in
//! this module and nowhere else.

use crate::config::OutputMode;
use crate::format::right_pad;
use crate::item::{Item, ItemState};
use crate::theme::Theme;
use crossterm::{
    QueueableCommand,
    cursor::{MoveDown, MoveToColumn, MoveUp},
    style::Stylize,
    terminal::{Clear, ClearType},
};
use std::io::{Result, Write};
use std::num::NonZeroUsize;

/// What an update of an existing row should redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    /// Only the bracketed state field; the rest of the row stays on screen
    StateField,
    /// The whole row
    Row,
}

/// Renders rows to an output sink.
#[derive(Debug)]
pub struct Screen<W: Write> {
    out: W,
    mode: OutputMode,
    theme: Theme,
    viewport: Option<u16>,
}

impl<W: Write> Screen<W> {
    /// Create a screen writing to `out`.
    ///
    /// `viewport` is the terminal height when known; rows that scrolled
    /// above it can no longer be reached by moving the cursor up.
    pub fn new(out: W, mode: OutputMode, theme: Theme, viewport: Option<u16>) -> Self {
        Self {
            out,
            mode,
            theme,
            viewport,
        }
    }

    /// True when cursor control and color are suppressed
    pub fn is_minimal(&self) -> bool {
        self.mode == OutputMode::Minimal
    }

    /// The theme rows are rendered with
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Borrow the underlying sink
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Render the bracketed state field, e.g. `[done]`.
    pub fn state_field(&self, state: &ItemState) -> String {
        let label = right_pad(state.label(&self.theme.tags), self.theme.layout.state_width);
        match state.color(&self.theme.colors) {
            Some(color) if !self.is_minimal() => format!("[{}]", label.with(color)),
            _ => format!("[{label}]"),
        }
    }

    /// Render a complete row: state field, padded name, annotation.
    pub fn row(&self, item: &Item) -> String {
        // Pad BEFORE applying colors so escape codes don't count as width
        let name = right_pad(&item.name, self.theme.layout.name_width);
        format!("{} {}{}", self.state_field(&item.state), name, item.info)
    }

    /// Whether switching from `old` to `new` can rewrite the state field
    /// alone without leaving stale characters or clipping the name.
    pub fn fits_state_field(&self, old: &ItemState, new: &ItemState) -> bool {
        let width = self.theme.layout.state_width;
        let tags = &self.theme.tags;
        old.label(tags).chars().count() <= width && new.label(tags).chars().count() <= width
    }

    /// Print a brand-new row below the existing ones.
    ///
    /// The cursor ends up on the new bottom line.
    pub fn push_row(&mut self, item: &Item) -> Result<()> {
        let line = self.row(item);
        self.append_line(&line)
    }

    /// Redraw an existing row `offset` lines above the cursor.
    ///
    /// Returns `false` when nothing was drawn because the row scrolled out
    /// of the viewport.
    pub fn update_row(&mut self, offset: NonZeroUsize, item: &Item, span: Span) -> Result<bool> {
        if self.is_minimal() {
            let line = self.row(item);
            self.append_line(&line)?;
            return Ok(true);
        }

        if self
            .viewport
            .is_some_and(|rows| offset.get() >= usize::from(rows))
        {
            return Ok(false);
        }
        // No cursor move can reach further than u16::MAX lines
        let Ok(rows) = u16::try_from(offset.get()) else {
            return Ok(false);
        };
        let (content, clear_tail) = match span {
            Span::StateField => (self.state_field(&item.state), false),
            Span::Row => (self.row(item), true),
        };

        // 1. Move up to the row
        self.out.queue(MoveUp(rows))?;
        self.out.queue(MoveToColumn(0))?;

        // 2. Render the content
        write!(self.out, "{content}")?;

        // 3. Clear leftovers from a longer previous row
        if clear_tail {
            self.out.queue(Clear(ClearType::UntilNewLine))?;
        }

        // 4. Move back down to the bottom line
        self.out.queue(MoveDown(rows))?;
        self.out.queue(MoveToColumn(0))?;
        self.out.flush()?;
        Ok(true)
    }

    /// Overwrite the bottom line in place. No-op in minimal mode.
    pub fn draw_bottom(&mut self, text: &str) -> Result<()> {
        if self.is_minimal() {
            return Ok(());
        }
        self.out.queue(MoveToColumn(0))?;
        write!(self.out, "{text}")?;
        self.out.queue(Clear(ClearType::UntilNewLine))?;
        self.out.flush()
    }

    /// Draw the bottom line one last time and move below it, leaving the
    /// cursor where the next shell prompt should start. No-op in minimal mode.
    pub fn finish_bottom(&mut self, text: &str) -> Result<()> {
        if self.is_minimal() {
            return Ok(());
        }
        self.draw_bottom(text)?;
        writeln!(self.out)?;
        self.out.flush()
    }

    fn append_line(&mut self, line: &str) -> Result<()> {
        if !self.is_minimal() {
            self.out.queue(MoveToColumn(0))?;
        }
        write!(self.out, "{line}")?;
        if !self.is_minimal() {
            self.out.queue(Clear(ClearType::UntilNewLine))?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}
