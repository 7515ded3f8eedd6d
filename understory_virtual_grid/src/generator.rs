// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The capability a host provides to realize items as rendering surfaces.

use kurbo::{Rect, Size};

/// Creates, measures, positions, and destroys rendering surfaces on behalf of a grid.
///
/// The grid never constructs surfaces itself. It asks the host for one per visible
/// index and hands it back when the index leaves the window, so the host decides what a
/// surface is (a widget, a display-list node, a terminal cell block) and how records
/// from the item source are bound to it.
///
/// A surface is owned exclusively by the grid between the [`create`](Self::create) or
/// [`reuse`](Self::reuse) call that realized it and the [`release`](Self::release)
/// call that gives it back.
pub trait SurfaceGenerator {
    /// Handle to a rendering surface.
    type Surface: Copy + Eq;

    /// Creates a surface bound to the record at `index`.
    fn create(&mut self, index: usize) -> Self::Surface;

    /// Rebinds a surface that left the window to the record at `index`.
    ///
    /// Only called in [`RecyclingMode::Recycling`](crate::RecyclingMode::Recycling).
    fn reuse(&mut self, surface: Self::Surface, index: usize);

    /// Gives a surface back. The grid will not refer to it again.
    fn release(&mut self, surface: Self::Surface);

    /// Returns the size the surface would like within `constraint`.
    ///
    /// The result must be finite; it may exceed `constraint`, in which case every cell
    /// of the grid grows to fit it.
    fn measure(&mut self, surface: Self::Surface, constraint: Size) -> Size;

    /// Positions the surface at `bounds`, in the grid's coordinate space.
    fn arrange(&mut self, surface: Self::Surface, bounds: Rect);
}
