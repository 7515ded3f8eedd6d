// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A `Vec`-backed item collection that notifies listeners on change.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::{ItemSource, ItemsChanged};

/// Handle returned by [`ObservableItems::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

type Listener = Box<dyn FnMut(&ItemsChanged)>;

/// An ordered collection that notifies subscribers whenever it changes.
///
/// Notifications are delivered synchronously from the mutating call, in the order
/// listeners were registered.
pub struct ObservableItems<T> {
    items: Vec<T>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u32,
}

impl<T: fmt::Debug> fmt::Debug for ObservableItems<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableItems")
            .field("items", &self.items)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<T> Default for ObservableItems<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ObservableItems<T> {
    /// Creates an empty collection with no listeners.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Registers `listener` and returns a handle for [`ObservableItems::unsubscribe`].
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ItemsChanged) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener = self.next_listener.wrapping_add(1);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Returns the records as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Appends a record and emits [`ItemsChanged::Added`].
    pub fn push(&mut self, item: T) {
        let index = self.items.len();
        self.items.push(item);
        self.notify(ItemsChanged::Added {
            index,
            len: self.items.len(),
        });
    }

    /// Removes every record and emits [`ItemsChanged::Reset`].
    ///
    /// A reset is emitted even if the collection was already empty.
    pub fn clear(&mut self) {
        self.items.clear();
        self.notify(ItemsChanged::Reset { len: 0 });
    }

    /// Replaces every record with `items`, emitting a single [`ItemsChanged::Reset`].
    pub fn replace_all<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.items.clear();
        self.items.extend(items);
        self.notify(ItemsChanged::Reset {
            len: self.items.len(),
        });
    }

    fn notify(&mut self, change: ItemsChanged) {
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }
}

impl<T> ItemSource for ObservableItems<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }
}
