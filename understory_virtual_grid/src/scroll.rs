// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll state reported to a scroll owner, and the discrete scroll commands.

use kurbo::Size;

bitflags::bitflags! {
    /// Axes a scroll owner allows the grid to scroll along.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ScrollAxes: u8 {
        /// Horizontal scrolling is enabled.
        const HORIZONTAL = 0b0000_0001;
        /// Vertical scrolling is enabled.
        const VERTICAL   = 0b0000_0010;
    }
}

/// Pixel-space scroll state of a grid.
///
/// Refreshed on every arrange pass. The horizontal axis treats the whole collection
/// as a single row, so `extent.width` is one cell per item, while the vertical axis
/// counts rows of `columns` items.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollInfo {
    pub(crate) viewport: Size,
    pub(crate) extent: Size,
    pub(crate) horizontal_offset: f64,
    pub(crate) vertical_offset: f64,
    pub(crate) axes: ScrollAxes,
}

impl ScrollInfo {
    /// Visible size: one window of cells.
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    /// Width of one window of cells.
    #[must_use]
    pub const fn viewport_width(&self) -> f64 {
        self.viewport.width
    }

    /// Height of one window of cells.
    #[must_use]
    pub const fn viewport_height(&self) -> f64 {
        self.viewport.height
    }

    /// Total scrollable size of the whole collection.
    #[must_use]
    pub const fn extent(&self) -> Size {
        self.extent
    }

    /// `cell width * item count`.
    #[must_use]
    pub const fn extent_width(&self) -> f64 {
        self.extent.width
    }

    /// `cell height * ceil(item count / columns)`.
    #[must_use]
    pub const fn extent_height(&self) -> f64 {
        self.extent.height
    }

    /// Current horizontal offset in pixels.
    #[must_use]
    pub const fn horizontal_offset(&self) -> f64 {
        self.horizontal_offset
    }

    /// Current vertical offset in pixels.
    #[must_use]
    pub const fn vertical_offset(&self) -> f64 {
        self.vertical_offset
    }

    /// Axes the owner allows scrolling along.
    #[must_use]
    pub const fn axes(&self) -> ScrollAxes {
        self.axes
    }

    /// Returns `true` if horizontal scrolling is enabled.
    #[must_use]
    pub const fn can_horizontally_scroll(&self) -> bool {
        self.axes.contains(ScrollAxes::HORIZONTAL)
    }

    /// Returns `true` if vertical scrolling is enabled.
    #[must_use]
    pub const fn can_vertically_scroll(&self) -> bool {
        self.axes.contains(ScrollAxes::VERTICAL)
    }
}

/// Receives a notification after every arrange pass.
///
/// Typically implemented by the scroll container hosting the grid, which re-reads
/// extents and offsets to update its scroll bars. Called even when nothing changed.
pub trait ScrollOwner {
    /// The grid's scroll state was refreshed.
    fn scroll_info_changed(&mut self, info: &ScrollInfo);
}

/// A discrete scroll request.
///
/// Every command moves the window by a whole number of items: lines move by one row
/// (vertical) or one item (horizontal), pages move by a whole window on either axis,
/// and mouse-wheel commands behave like the matching line command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollCommand {
    /// Back one row.
    LineUp,
    /// Forward one row.
    LineDown,
    /// Back one item.
    LineLeft,
    /// Forward one item.
    LineRight,
    /// Back one window.
    PageUp,
    /// Forward one window.
    PageDown,
    /// Back one window.
    PageLeft,
    /// Forward one window.
    PageRight,
    /// Same as [`ScrollCommand::LineUp`].
    MouseWheelUp,
    /// Same as [`ScrollCommand::LineDown`].
    MouseWheelDown,
    /// Same as [`ScrollCommand::LineLeft`].
    MouseWheelLeft,
    /// Same as [`ScrollCommand::LineRight`].
    MouseWheelRight,
}
