//! progmeter - In-place terminal progress for keyed parallel work
//!
//! Tracks a growing set of keyed work items as they move through
//! queued → working → done / failed and rewrites their status in place in a
//! scrolling terminal, using relative cursor movement instead of clearing
//! the screen. A background ticker keeps a `[done/total] Ns` summary on the
//! bottom line.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Callers   │  (many threads / tasks)
//! └──────┬──────┘
//!        │ Reporter / ProgMeter
//!        ▼
//! ┌─────────────┐      ┌─────────────┐
//! │  ProgMeter  │◄─────│   Ticker    │  periodic summary, same lock
//! └──────┬──────┘      └─────────────┘
//!        │ one mutex: registry + counters + screen
//!        ▼
//! ┌─────────────┐
//! │  Registry   │  append-only rows, offset = distance from end
//! └──────┬──────┘
//!        │ renders
//!        ▼
//! ┌─────────────┐
//! │   Screen    │  cursor up / draw / cursor down, or plain lines
//! └──────┬──────┘
//!        │ styles with
//!        ▼
//! ┌─────────────┐
//! │    Theme    │  colors, tags, widths
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`meter`] - The [`ProgMeter`] facade
//! - [`registry`] - Item storage and row addressing
//! - [`engine`] - Row rendering and cursor control
//! - [`ticker`] - Cancellable periodic callback
//! - [`summary`] - Counters and the summary line
//! - [`reporter`] - Trait seam, including the no-op `Option` handle
//! - [`theme`] - Colors, tags and widths
//! - [`config`] - Output mode and ticker settings
//!
//! # Example
//!
//! ```
//! use progmeter_core::{MeterConfig, ProgMeter};
//!
//! let meter = ProgMeter::with_writer(MeterConfig::minimal(true), Vec::new());
//! meter.add_todos(1);
//! meter.add_entry("QmA", "ipfs/QmA", "");
//! meter.finish("QmA");
//! assert_eq!(meter.summary().done, 1);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod item;
pub mod meter;
pub mod registry;
pub mod reporter;
pub mod summary;
pub mod theme;
pub mod ticker;

// Re-export main types for convenience
pub use config::{MeterConfig, OutputMode, TickerStart};
pub use error::ProgressError;
pub use item::{Item, ItemState};
pub use meter::ProgMeter;
pub use reporter::Reporter;
pub use summary::Summary;
pub use theme::Theme;
