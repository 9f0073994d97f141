//! Append-only item registry with distance-from-end addressing.
//!
//! Every registration prints one more line below the existing rows, so an
//! item's terminal row is not fixed: it sits `offset` lines above the
//! cursor, where `offset` is its 1-based distance from the end of the
//! sequence at the moment of the lookup.

use crate::item::Item;
use std::num::NonZeroUsize;

/// An item located by key, together with its current row offset.
#[derive(Debug)]
pub struct Located<'a> {
    /// Lines between the item's row and the cursor's bottom row (last item = 1)
    pub offset: NonZeroUsize,
    /// The matched item
    pub item: &'a mut Item,
}

/// Ordered sequence of tracked items.
#[derive(Debug, Default)]
pub struct Registry {
    items: Vec<Item>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item. It becomes offset 1; everything else shifts up by one.
    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Find the most recently registered item with `key`.
    ///
    /// Scans from the end backward, so duplicate keys resolve to the newest
    /// row.
    pub fn find_most_recent(&mut self, key: &str) -> Option<Located<'_>> {
        let len = self.items.len();
        let idx = self.items.iter().rposition(|it| it.key == key)?;
        let offset = NonZeroUsize::new(len - idx)?;
        Some(Located {
            offset,
            item: &mut self.items[idx],
        })
    }

    /// Read-only lookup, same resolution rule as [`Self::find_most_recent`].
    pub fn get(&self, key: &str) -> Option<&Item> {
        self.items.iter().rev().find(|it| it.key == key)
    }

    /// Number of registered items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
