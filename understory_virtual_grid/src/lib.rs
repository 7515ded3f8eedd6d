// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_virtual_grid --heading-base-level=0

//! Understory Virtual Grid: a virtualizing uniform grid with index-based scrolling.
//!
//! A [`VirtualGrid`] shows a potentially huge item collection through a fixed window of
//! `rows × columns` uniform cells. Only the items inside that window are realized as
//! rendering surfaces; as the window moves, surfaces for departing items are released
//! (or recycled) and surfaces for entering items are created.
//!
//! The grid scrolls by *index*, not by pixels: its position is the index of the first
//! visible item. Pixel offsets coming from a scroll container are translated to an
//! index, and index moves are translated back into pixel offsets for scroll bars.
//!
//! The core concepts are:
//!
//! - [`GridConfig`]: rows, columns, and the [`RecyclingMode`].
//! - [`SurfaceGenerator`]: the host capability that creates, rebinds, measures,
//!   positions, and releases surfaces. The grid never constructs UI objects itself.
//! - [`VirtualGrid::measure`] / [`VirtualGrid::arrange`]: the two layout passes.
//!   Measuring realizes the window and derives one cell size for every cell;
//!   arranging places surfaces row-major and refreshes [`ScrollInfo`].
//! - [`ScrollCommand`] plus [`VirtualGrid::set_horizontal_offset`] and
//!   [`VirtualGrid::set_vertical_offset`]: everything that moves the window.
//! - [`ScrollOwner`]: notified after each arrange pass so a scroll container can
//!   update its scroll bars.
//!
//! The grid only needs the *length* of the item source. Hosts bind it with
//! [`VirtualGrid::bind_items`] (or [`VirtualGrid::bind_source`]) and forward
//! [`ItemsChanged`](understory_item_source::ItemsChanged) notifications through
//! [`VirtualGrid::items_changed`]. Index arithmetic is clamped rather than reported as an
//! error: an unbound source lays out as empty, and a source that shrank past the window
//! is handled on the next measure pass.
//!
//! ## Minimal example
//!
//! ```rust
//! use core::num::NonZeroUsize;
//!
//! use kurbo::{Rect, Size};
//! use understory_virtual_grid::{GridConfig, SurfaceGenerator, VirtualGrid};
//!
//! /// Surfaces are just the index they display.
//! struct Labels;
//!
//! impl SurfaceGenerator for Labels {
//!     type Surface = usize;
//!     fn create(&mut self, index: usize) -> usize { index }
//!     fn reuse(&mut self, _surface: usize, _index: usize) {}
//!     fn release(&mut self, _surface: usize) {}
//!     fn measure(&mut self, _surface: usize, _constraint: Size) -> Size { Size::new(8.0, 8.0) }
//!     fn arrange(&mut self, _surface: usize, _bounds: Rect) {}
//! }
//!
//! let config = GridConfig::new(NonZeroUsize::new(2).unwrap(), NonZeroUsize::new(5).unwrap());
//! let mut grid = VirtualGrid::new(config);
//! grid.bind_items(100);
//!
//! let desired = grid.measure(Size::new(500.0, 200.0), &mut Labels);
//! grid.arrange(desired, &mut Labels);
//! assert_eq!(grid.realized_range(), 0..10);
//! assert_eq!(grid.cell_size(), Size::new(100.0, 100.0));
//!
//! // One row down, then lay out again.
//! grid.line_down();
//! assert!(grid.needs_measure());
//! let desired = grid.measure(Size::new(500.0, 200.0), &mut Labels);
//! grid.arrange(desired, &mut Labels);
//! assert_eq!(grid.realized_range(), 5..15);
//! assert_eq!(grid.scroll_info().vertical_offset(), 100.0);
//! ```
//!
//! ## Features
//!
//! - `std` *(default)*: enables `kurbo/std`. Use `libm` instead for `no_std` targets.
//! - `serde`: derives `Serialize`/`Deserialize` for [`GridConfig`] and [`RecyclingMode`].
//! - `tracing`: emits `trace`/`debug` events (target `understory_virtual_grid`) for
//!   layout passes and scroll changes.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[macro_use]
mod macros;

mod config;
mod generator;
mod grid;
mod realized;
mod scroll;

pub use config::{GridConfig, RecyclingMode};
pub use generator::SurfaceGenerator;
pub use grid::VirtualGrid;
pub use realized::{RealizeSummary, Realized};
pub use scroll::{ScrollAxes, ScrollCommand, ScrollInfo, ScrollOwner};
