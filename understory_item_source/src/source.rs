// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The item source contract and its change notifications.

/// An ordered, indexable collection of records.
///
/// Valid indices are `0..len()`. Implementations that change their length or the
/// identity of their records must announce it with an [`ItemsChanged`] notification
/// before any consumer lays out again.
pub trait ItemSource {
    /// Record type.
    type Item;

    /// Number of records.
    fn len(&self) -> usize;

    /// Returns `true` if there are no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the record at `index`, or `None` if it is out of range.
    fn get(&self, index: usize) -> Option<&Self::Item>;
}

impl<T> ItemSource for [T] {
    type Item = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        <[T]>::get(self, index)
    }
}

impl<T> ItemSource for alloc::vec::Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }
}

/// A change to an [`ItemSource`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemsChanged {
    /// The contents were replaced wholesale. Any index-derived state is stale.
    Reset {
        /// Length after the reset.
        len: usize,
    },
    /// A single record was inserted at `index`.
    Added {
        /// Index of the new record.
        index: usize,
        /// Length after the insertion.
        len: usize,
    },
}

impl ItemsChanged {
    /// Length of the source after this change.
    #[must_use]
    pub const fn len(&self) -> usize {
        match *self {
            Self::Reset { len } | Self::Added { len, .. } => len,
        }
    }

    /// Returns `true` if the source is empty after this change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
