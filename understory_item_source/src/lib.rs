// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_item_source --heading-base-level=0

//! Understory Item Source: ordered item collections with change notifications.
//!
//! Virtualized views never own their data. They need two things from whoever does:
//!
//! - an ordered, indexable sequence of records with a length ([`ItemSource`]), and
//! - a notification whenever that sequence changes ([`ItemsChanged`]), so the view can
//!   re-derive which slice of it is visible.
//!
//! [`ObservableItems`] is a small `Vec`-backed collection that provides both. Listeners
//! are plain closures registered with [`ObservableItems::subscribe`]; they are called
//! synchronously, in registration order, on the thread that mutates the collection.
//!
//! [`CountedItems`] is a count-driven collection of numbered [`Item`]s: changing its
//! count rebuilds the whole sequence.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use understory_item_source::{CountedItems, ItemSource, ItemsChanged};
//!
//! let mut items = CountedItems::new(3);
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! items.items_mut().subscribe(move |change: &ItemsChanged| sink.borrow_mut().push(*change));
//!
//! items.set_count(2);
//! assert_eq!(items.items().len(), 2);
//! assert_eq!(seen.borrow()[0], ItemsChanged::Reset { len: 0 });
//! assert_eq!(seen.borrow().last(), Some(&ItemsChanged::Added { index: 1, len: 2 }));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod counted;
mod observable;
mod source;

pub use counted::{CountedItems, DEFAULT_COUNT, Item};
pub use observable::{ListenerId, ObservableItems};
pub use source::{ItemSource, ItemsChanged};
