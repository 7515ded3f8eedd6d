// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A count-driven collection of numbered items.

use core::fmt;

use crate::ObservableItems;

/// Number of items a [`CountedItems`] starts with when created via [`Default`].
pub const DEFAULT_COUNT: usize = 24;

/// A numbered record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Item {
    value: usize,
}

impl Item {
    /// Creates an item carrying `value`.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self { value }
    }

    /// The item's number.
    #[must_use]
    pub const fn value(&self) -> usize {
        self.value
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Item {}", self.value)
    }
}

/// An observable collection holding `Item(0)..Item(count)`.
///
/// Changing the count clears the collection (one [`Reset`](crate::ItemsChanged::Reset))
/// and appends each item again (one [`Added`](crate::ItemsChanged::Added) per item).
#[derive(Debug)]
pub struct CountedItems {
    count: usize,
    items: ObservableItems<Item>,
}

impl Default for CountedItems {
    fn default() -> Self {
        Self::new(DEFAULT_COUNT)
    }
}

impl CountedItems {
    /// Creates a collection holding `count` items.
    #[must_use]
    pub fn new(count: usize) -> Self {
        let mut items = ObservableItems::new();
        items.replace_all((0..count).map(Item::new));
        Self { count, items }
    }

    /// Current item count.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Rebuilds the collection with `count` items.
    ///
    /// Returns `false` without notifying anyone if `count` is unchanged.
    pub fn set_count(&mut self, count: usize) -> bool {
        if count == self.count {
            return false;
        }
        self.count = count;
        self.items.clear();
        for value in 0..count {
            self.items.push(Item::new(value));
        }
        true
    }

    /// The backing collection.
    #[must_use]
    pub fn items(&self) -> &ObservableItems<Item> {
        &self.items
    }

    /// The backing collection, for subscribing to changes.
    pub fn items_mut(&mut self) -> &mut ObservableItems<Item> {
        &mut self.items
    }
}
