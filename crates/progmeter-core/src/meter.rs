//! The progress meter.
//!
//! All registry mutations, counter updates and terminal writes happen
//! under one mutex, held for the whole of each public call. The summary
//! ticker takes the same mutex, so a summary redraw can never land between
//! the cursor-up and cursor-down halves of a row update.
//!
//! Display problems never reach the caller: unknown keys and write errors
//! are logged and swallowed.

use crate::config::{MeterConfig, OutputMode, TickerStart};
use crate::engine::{Screen, Span};
use crate::error::ProgressError;
use crate::format::{format_duration, round_ms};
use crate::item::{Item, ItemState};
use crate::registry::Registry;
use crate::summary::{Counters, Summary};
use crate::ticker::Ticker;
use std::io::{Stdout, Write, stdout};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Everything guarded by the render lock
#[derive(Debug)]
struct State<W: Write> {
    registry: Registry,
    counters: Counters,
    screen: Screen<W>,
    /// Cleared by `stop()`; nothing redraws the summary afterwards
    summary_live: bool,
    /// Set by `close()`
    closed: bool,
}

/// State shared with the ticker thread
#[derive(Debug)]
struct Shared<W: Write> {
    state: Mutex<State<W>>,
    started: Instant,
}

impl<W: Write> Shared<W> {
    fn lock(&self) -> MutexGuard<'_, State<W>> {
        // A caller that panicked mid-update leaves a usable registry behind
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn summary(&self, counters: Counters) -> Summary {
        Summary::new(counters, self.started.elapsed())
    }

    /// Duration since `start`, both ends rounded to the millisecond.
    fn took(&self, start: Instant) -> Duration {
        let now = round_ms(Instant::now().saturating_duration_since(self.started));
        let began = round_ms(start.saturating_duration_since(self.started));
        now.saturating_sub(began)
    }

    fn tick(&self) {
        let mut state = self.lock();
        if !state.summary_live {
            return;
        }
        let text = self.summary(state.counters).to_string();
        if let Err(err) = state.screen.draw_bottom(&text) {
            tracing::warn!(%err, "summary redraw failed");
        }
    }
}

#[derive(Debug)]
enum TickerSlot {
    Idle,
    Running(Ticker),
    Stopped,
}

/// In-place terminal progress meter for keyed work items.
///
/// Cheap to share by reference (`&ProgMeter` or `Arc<ProgMeter>`) across
/// threads; every method takes `&self`.
///
/// # Example
///
/// ```no_run
/// use progmeter_core::ProgMeter;
///
/// let meter = ProgMeter::new(false);
/// meter.add_todos(2);
///
/// meter.add_entry("QmA", "ipfs/QmA", "");
/// meter.add_entry("QmB", "ipfs/QmB", "");
///
/// meter.working("QmA", "dl");
/// meter.finish("QmA");
/// meter.error("QmB", "timeout");
///
/// meter.stop();
/// ```
#[derive(Debug)]
pub struct ProgMeter<W: Write + Send + 'static = Stdout> {
    shared: Arc<Shared<W>>,
    ticker: Mutex<TickerSlot>,
    tick_interval: Duration,
    mode: OutputMode,
}

impl ProgMeter<Stdout> {
    /// Create a meter on stdout; `minimal` selects append-only output.
    pub fn new(minimal: bool) -> Self {
        Self::with_config(MeterConfig::minimal(minimal))
    }

    /// Create a meter on stdout with explicit settings.
    pub fn with_config(config: MeterConfig) -> Self {
        let viewport = match config.mode {
            OutputMode::Interactive => crossterm::terminal::size().ok().map(|(_, rows)| rows),
            OutputMode::Minimal => None,
        };
        Self::build(config, stdout(), viewport)
    }
}

impl<W: Write + Send + 'static> ProgMeter<W> {
    /// Create a meter writing to an arbitrary sink.
    ///
    /// The sink is treated as an unbounded terminal: no row is ever
    /// considered scrolled out of view.
    pub fn with_writer(config: MeterConfig, writer: W) -> Self {
        Self::build(config, writer, None)
    }

    fn build(config: MeterConfig, writer: W, viewport: Option<u16>) -> Self {
        let MeterConfig {
            mode,
            tick_interval,
            ticker_start,
            theme,
        } = config;

        let meter = Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    registry: Registry::new(),
                    counters: Counters::default(),
                    screen: Screen::new(writer, mode, theme, viewport),
                    summary_live: true,
                    closed: false,
                }),
                started: Instant::now(),
            }),
            ticker: Mutex::new(TickerSlot::Idle),
            tick_interval,
            mode,
        };

        if ticker_start == TickerStart::Eager {
            meter.ensure_ticker();
        }
        meter
    }

    /// Register a new row in the default pending state.
    pub fn add_entry(&self, key: &str, name: &str, info: &str) {
        settle("add_entry", self.register(None, key, name, info));
    }

    /// Register a new row with a chosen initial state.
    ///
    /// A `&str` or `String` becomes the pending label and keeps the pending
    /// color.
    pub fn add_entry_with_state(
        &self,
        state: impl Into<ItemState>,
        key: &str,
        name: &str,
        info: &str,
    ) {
        settle(
            "add_entry",
            self.register(Some(state.into()), key, name, info),
        );
    }

    /// Overwrite the state field of the most recent row with `key`.
    ///
    /// A `&str` or `String` becomes an uncolored custom tag.
    pub fn set_state(&self, key: &str, state: impl Into<ItemState>) {
        settle("set_state", self.transition(key, state.into()));
    }

    /// Mark a row as in flight with the working color.
    pub fn working(&self, key: &str, label: &str) {
        settle(
            "working",
            self.transition(key, ItemState::Working(label.to_string())),
        );
    }

    /// Count one unit of work as done and, if the row exists, show it as
    /// done with the time since registration appended.
    pub fn finish(&self, key: &str) {
        settle("finish", self.try_finish(key));
    }

    /// Show a row as failed with `message` appended. Not counted as done.
    pub fn error(&self, key: &str, message: &str) {
        settle("error", self.try_error(key, message));
    }

    /// Expect `n` more units of work.
    pub fn add_todos(&self, n: usize) {
        self.shared.lock().counters.add_todos(n);
    }

    /// Count one unit of work as done without touching any row.
    pub fn mark_done(&self) {
        self.shared.lock().counters.mark_done();
    }

    /// Halt the periodic summary redraw.
    ///
    /// Waits for an in-flight tick; once this returns no summary line is
    /// printed again. Calling it twice is harmless.
    pub fn stop(&self) {
        let previous = std::mem::replace(&mut *self.ticker_slot(), TickerSlot::Stopped);
        self.shared.lock().summary_live = false;
        if let TickerSlot::Running(ticker) = previous {
            ticker.stop();
        }
    }

    /// Stop the ticker, then draw the summary one final time and move the
    /// cursor below it so later output starts on a fresh line.
    ///
    /// Minimal mode prints nothing extra. Calling it twice only draws once.
    pub fn close(&self) {
        self.stop();
        let mut guard = self.shared.lock();
        if guard.closed {
            return;
        }
        guard.closed = true;
        let text = self.shared.summary(guard.counters).to_string();
        if let Err(err) = guard.screen.finish_bottom(&text) {
            tracing::warn!(%err, "final summary redraw failed");
        }
    }

    /// Current counters and elapsed time
    pub fn summary(&self) -> Summary {
        let counters = self.shared.lock().counters;
        self.shared.summary(counters)
    }

    /// Snapshot of the most recent row registered under `key`
    pub fn item(&self, key: &str) -> Option<Item> {
        self.shared.lock().registry.get(key).cloned()
    }

    /// Number of registered rows
    pub fn len(&self) -> usize {
        self.shared.lock().registry.len()
    }

    /// True before the first registration
    pub fn is_empty(&self) -> bool {
        self.shared.lock().registry.is_empty()
    }

    /// True when output is append-only
    pub fn is_minimal(&self) -> bool {
        self.mode == OutputMode::Minimal
    }

    fn ticker_slot(&self) -> MutexGuard<'_, TickerSlot> {
        self.ticker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start the summary ticker unless it already ran or minimal mode is on.
    ///
    /// Never called with the render lock held: `stop()` joins the ticker
    /// thread, which may be waiting for that lock.
    fn ensure_ticker(&self) {
        if self.is_minimal() {
            return;
        }
        let mut slot = self.ticker_slot();
        if !matches!(*slot, TickerSlot::Idle) {
            return;
        }
        let shared = Arc::clone(&self.shared);
        *slot = match Ticker::spawn(self.tick_interval, move || shared.tick()) {
            Ok(ticker) => TickerSlot::Running(ticker),
            Err(err) => {
                tracing::warn!(%err, "summary line disabled");
                TickerSlot::Stopped
            }
        };
    }

    fn register(
        &self,
        state: Option<ItemState>,
        key: &str,
        name: &str,
        info: &str,
    ) -> Result<(), ProgressError> {
        self.ensure_ticker();

        let mut guard = self.shared.lock();
        let State {
            registry,
            counters,
            screen,
            summary_live,
            ..
        } = &mut *guard;

        // A plain label given at registration is still a pending label
        let state = match state {
            Some(ItemState::Custom(label)) => ItemState::Pending(label),
            Some(state) => state,
            None => ItemState::pending(&screen.theme().tags),
        };
        let item = Item::new(state, key, name, info);
        let printed = screen.push_row(&item);
        // The row is on screen (or partly so) either way; keep offsets honest
        registry.push(item);
        printed?;

        if *summary_live {
            let text = self.shared.summary(*counters).to_string();
            screen.draw_bottom(&text)?;
        }
        Ok(())
    }

    fn transition(&self, key: &str, state: ItemState) -> Result<(), ProgressError> {
        let mut guard = self.shared.lock();
        let State {
            registry, screen, ..
        } = &mut *guard;

        let found = registry
            .find_most_recent(key)
            .ok_or_else(|| ProgressError::unknown_key(key))?;

        let span = if screen.fits_state_field(&found.item.state, &state) {
            Span::StateField
        } else {
            Span::Row
        };
        found.item.set_state(state);

        if !screen.update_row(found.offset, found.item, span)? {
            tracing::debug!(key, offset = found.offset.get(), "row scrolled out of view");
        }
        Ok(())
    }

    fn try_finish(&self, key: &str) -> Result<(), ProgressError> {
        let mut guard = self.shared.lock();
        let State {
            registry,
            counters,
            screen,
            ..
        } = &mut *guard;

        counters.mark_done();

        let found = registry
            .find_most_recent(key)
            .ok_or_else(|| ProgressError::unknown_key(key))?;

        let took = self.shared.took(found.item.start);
        found.item.append_info(&format_duration(took));
        found.item.active = false;
        found.item.state = ItemState::Done;

        if !screen.update_row(found.offset, found.item, Span::Row)? {
            tracing::debug!(key, offset = found.offset.get(), "row scrolled out of view");
        }
        Ok(())
    }

    fn try_error(&self, key: &str, message: &str) -> Result<(), ProgressError> {
        let mut guard = self.shared.lock();
        let State {
            registry, screen, ..
        } = &mut *guard;

        let found = registry
            .find_most_recent(key)
            .ok_or_else(|| ProgressError::unknown_key(key))?;

        found.item.append_info(message);
        found.item.active = false;
        found.item.state = ItemState::Error;

        if !screen.update_row(found.offset, found.item, Span::Row)? {
            tracing::debug!(key, offset = found.offset.get(), "row scrolled out of view");
        }
        Ok(())
    }
}

/// Swallow a display failure after logging it.
fn settle(op: &'static str, result: Result<(), ProgressError>) {
    match result {
        Ok(()) => {}
        Err(ProgressError::UnknownKey(key)) => {
            tracing::debug!(op, key = %key, "ignoring unknown key");
        }
        Err(err) => {
            tracing::warn!(op, %err, "progress display update failed");
        }
    }
}
