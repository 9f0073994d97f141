//! Reporter trait for dependency injection
//!
//! Worker code reports item lifecycle through this trait instead of a
//! concrete meter. `Option<R>` implements it too, with every operation a
//! no-op on `None`, so a call site that runs without a display (quiet mode,
//! tests) keeps the same calls and needs no branching.

use crate::item::ItemState;
use crate::meter::ProgMeter;
use std::io::Write;
use std::sync::Arc;

/// Lifecycle sink for keyed work items.
pub trait Reporter: Send + Sync {
    /// Register a new row in the default pending state.
    fn add_entry(&self, key: &str, name: &str, info: &str);

    /// Register a new row with a chosen initial state.
    fn add_entry_with_state(&self, state: ItemState, key: &str, name: &str, info: &str);

    /// Replace the state of a row.
    fn set_state(&self, key: &str, state: ItemState);

    /// Mark a row as in flight.
    fn working(&self, key: &str, label: &str);

    /// Mark a row done and count it.
    fn finish(&self, key: &str);

    /// Mark a row failed.
    fn error(&self, key: &str, message: &str);

    /// Expect `n` more units of work.
    fn add_todos(&self, n: usize);

    /// Count a unit of work that has no row.
    fn mark_done(&self);

    /// Stop periodic output.
    fn stop(&self);

    /// Stop and leave the display in its final state.
    fn close(&self) {
        self.stop();
    }
}

impl<W: Write + Send + 'static> Reporter for ProgMeter<W> {
    fn add_entry(&self, key: &str, name: &str, info: &str) {
        self.add_entry(key, name, info);
    }
    fn add_entry_with_state(&self, state: ItemState, key: &str, name: &str, info: &str) {
        self.add_entry_with_state(state, key, name, info);
    }
    fn set_state(&self, key: &str, state: ItemState) {
        self.set_state(key, state);
    }
    fn working(&self, key: &str, label: &str) {
        self.working(key, label);
    }
    fn finish(&self, key: &str) {
        self.finish(key);
    }
    fn error(&self, key: &str, message: &str) {
        self.error(key, message);
    }
    fn add_todos(&self, n: usize) {
        self.add_todos(n);
    }
    fn mark_done(&self) {
        self.mark_done();
    }
    fn stop(&self) {
        self.stop();
    }
    fn close(&self) {
        self.close();
    }
}

impl<T: Reporter> Reporter for Option<T> {
    fn add_entry(&self, key: &str, name: &str, info: &str) {
        if let Some(r) = self {
            r.add_entry(key, name, info);
        }
    }
    fn add_entry_with_state(&self, state: ItemState, key: &str, name: &str, info: &str) {
        if let Some(r) = self {
            r.add_entry_with_state(state, key, name, info);
        }
    }
    fn set_state(&self, key: &str, state: ItemState) {
        if let Some(r) = self {
            r.set_state(key, state);
        }
    }
    fn working(&self, key: &str, label: &str) {
        if let Some(r) = self {
            r.working(key, label);
        }
    }
    fn finish(&self, key: &str) {
        if let Some(r) = self {
            r.finish(key);
        }
    }
    fn error(&self, key: &str, message: &str) {
        if let Some(r) = self {
            r.error(key, message);
        }
    }
    fn add_todos(&self, n: usize) {
        if let Some(r) = self {
            r.add_todos(n);
        }
    }
    fn mark_done(&self) {
        if let Some(r) = self {
            r.mark_done();
        }
    }
    fn stop(&self) {
        if let Some(r) = self {
            r.stop();
        }
    }
    fn close(&self) {
        if let Some(r) = self {
            r.close();
        }
    }
}

impl<T: Reporter + ?Sized> Reporter for Arc<T> {
    fn add_entry(&self, key: &str, name: &str, info: &str) {
        (**self).add_entry(key, name, info);
    }
    fn add_entry_with_state(&self, state: ItemState, key: &str, name: &str, info: &str) {
        (**self).add_entry_with_state(state, key, name, info);
    }
    fn set_state(&self, key: &str, state: ItemState) {
        (**self).set_state(key, state);
    }
    fn working(&self, key: &str, label: &str) {
        (**self).working(key, label);
    }
    fn finish(&self, key: &str) {
        (**self).finish(key);
    }
    fn error(&self, key: &str, message: &str) {
        (**self).error(key, message);
    }
    fn add_todos(&self, n: usize) {
        (**self).add_todos(n);
    }
    fn mark_done(&self) {
        (**self).mark_done();
    }
    fn stop(&self) {
        (**self).stop();
    }
    fn close(&self) {
        (**self).close();
    }
}

impl<T: Reporter + ?Sized> Reporter for &T {
    fn add_entry(&self, key: &str, name: &str, info: &str) {
        (**self).add_entry(key, name, info);
    }
    fn add_entry_with_state(&self, state: ItemState, key: &str, name: &str, info: &str) {
        (**self).add_entry_with_state(state, key, name, info);
    }
    fn set_state(&self, key: &str, state: ItemState) {
        (**self).set_state(key, state);
    }
    fn working(&self, key: &str, label: &str) {
        (**self).working(key, label);
    }
    fn finish(&self, key: &str) {
        (**self).finish(key);
    }
    fn error(&self, key: &str, message: &str) {
        (**self).error(key, message);
    }
    fn add_todos(&self, n: usize) {
        (**self).add_todos(n);
    }
    fn mark_done(&self) {
        (**self).mark_done();
    }
    fn stop(&self) {
        (**self).stop();
    }
    fn close(&self) {
        (**self).close();
    }
}
