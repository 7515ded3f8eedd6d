// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The virtualizing grid: measure/arrange passes and index-based scrolling.

use alloc::boxed::Box;
use core::fmt;
use core::num::NonZeroUsize;
use core::ops::Range;

use kurbo::{Point, Rect, Size};
use understory_item_source::{ItemSource, ItemsChanged};

use crate::realized::RealizedWindow;
use crate::{
    GridConfig, RealizeSummary, Realized, ScrollAxes, ScrollCommand, ScrollInfo, ScrollOwner,
    SurfaceGenerator,
};

/// Slack allowed when deciding whether the current cell ends the row.
const WRAP_TOLERANCE: f64 = 1e-6;

/// A forward or backward move of the window, in items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shift {
    Back(usize),
    Forward(usize),
}

/// A uniform grid that realizes only one window of items at a time.
///
/// The grid virtualizes by *index*: its whole scroll position is a single `offset`,
/// the index of the first visible item. Each layout cycle the host calls
/// [`measure`](Self::measure) then [`arrange`](Self::arrange); in between, scroll
/// commands and offset setters move `offset` and mark the grid as needing a new measure
/// pass (see [`needs_measure`](Self::needs_measure)).
///
/// `S` is the surface handle type of the [`SurfaceGenerator`] driving the grid.
///
/// The grid does not hold the item source itself, only its length. Hosts bind a
/// length with [`bind_items`](Self::bind_items) and forward the source's change
/// notifications through [`items_changed`](Self::items_changed).
pub struct VirtualGrid<S> {
    config: GridConfig,
    item_count: Option<usize>,
    offset: usize,
    cell_size: Size,
    realized: RealizedWindow<S>,
    scroll: ScrollInfo,
    scroll_owner: Option<Box<dyn ScrollOwner>>,
    needs_measure: bool,
    last_realization: RealizeSummary,
}

impl<S: fmt::Debug> fmt::Debug for VirtualGrid<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualGrid")
            .field("config", &self.config)
            .field("item_count", &self.item_count)
            .field("offset", &self.offset)
            .field("cell_size", &self.cell_size)
            .field("realized", &self.realized)
            .field("scroll", &self.scroll)
            .field("scroll_owner", &self.scroll_owner.is_some())
            .field("needs_measure", &self.needs_measure)
            .finish_non_exhaustive()
    }
}

impl<S: Copy + Eq> Default for VirtualGrid<S> {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

impl<S: Copy + Eq> VirtualGrid<S> {
    /// Creates an unbound grid. It lays out as empty until items are bound.
    #[must_use]
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            item_count: None,
            offset: 0,
            cell_size: Size::ZERO,
            realized: RealizedWindow::default(),
            scroll: ScrollInfo::default(),
            scroll_owner: None,
            needs_measure: true,
            last_realization: RealizeSummary::default(),
        }
    }

    // --- configuration ---

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> GridConfig {
        self.config
    }

    /// Replaces the configuration, requesting a new layout if it changed.
    pub fn set_config(&mut self, config: GridConfig) {
        if config != self.config {
            self.config = config;
            self.invalidate_measure();
        }
    }

    /// Number of rows in the window.
    #[must_use]
    pub const fn rows(&self) -> NonZeroUsize {
        self.config.rows
    }

    /// Sets the number of rows in the window.
    pub fn set_rows(&mut self, rows: NonZeroUsize) {
        self.set_config(GridConfig {
            rows,
            ..self.config
        });
    }

    /// Number of columns in the window.
    #[must_use]
    pub const fn columns(&self) -> NonZeroUsize {
        self.config.columns
    }

    /// Sets the number of columns in the window.
    pub fn set_columns(&mut self, columns: NonZeroUsize) {
        self.set_config(GridConfig {
            columns,
            ..self.config
        });
    }

    /// Number of cells in one window.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.config.page_size()
    }

    /// Installs (or removes) the owner notified after each arrange pass.
    pub fn set_scroll_owner(&mut self, owner: Option<Box<dyn ScrollOwner>>) {
        self.scroll_owner = owner;
    }

    /// Records which axes the owner allows scrolling along.
    pub fn set_scroll_axes(&mut self, axes: ScrollAxes) {
        self.scroll.axes = axes;
    }

    // --- item source binding ---

    /// Binds an item source of `len` items.
    pub fn bind_items(&mut self, len: usize) {
        self.item_count = Some(len);
        self.invalidate_measure();
    }

    /// Binds the current length of `source`.
    pub fn bind_source<I: ItemSource + ?Sized>(&mut self, source: &I) {
        self.bind_items(source.len());
    }

    /// Detaches the item source. The next measure pass releases every surface.
    pub fn unbind_items(&mut self) {
        self.item_count = None;
        self.invalidate_measure();
    }

    /// Reacts to a change notification from the bound item source.
    ///
    /// The new length is adopted immediately; the window itself is re-derived (and
    /// clamped, if the source shrank past `offset`) on the next measure pass.
    pub fn items_changed(&mut self, change: &ItemsChanged) {
        gtrace!(?change, "items changed");
        self.bind_items(change.len());
    }

    /// Length of the bound item source, or `None` if unbound.
    #[must_use]
    pub const fn item_count(&self) -> Option<usize> {
        self.item_count
    }

    // --- state ---

    /// Index of the first item in the visible window.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Size of every cell, as of the last measure pass.
    #[must_use]
    pub const fn cell_size(&self) -> Size {
        self.cell_size
    }

    /// Scroll state, as of the last arrange pass (offsets are updated eagerly).
    #[must_use]
    pub const fn scroll_info(&self) -> &ScrollInfo {
        &self.scroll
    }

    /// Realized surfaces in index order.
    #[must_use]
    pub fn realized(&self) -> &[Realized<S>] {
        self.realized.as_slice()
    }

    /// Indices currently realized.
    #[must_use]
    pub fn realized_range(&self) -> Range<usize> {
        self.realized.range()
    }

    /// Surface realized for `index`, if it is visible.
    #[must_use]
    pub fn surface_for_index(&self, index: usize) -> Option<S> {
        self.realized.get(index).map(|slot| slot.surface)
    }

    /// What the last measure pass did to the surface set.
    #[must_use]
    pub const fn last_realization(&self) -> RealizeSummary {
        self.last_realization
    }

    /// Returns `true` if state changed since the last measure pass.
    #[must_use]
    pub const fn needs_measure(&self) -> bool {
        self.needs_measure
    }

    /// Requests a new layout cycle.
    pub fn invalidate_measure(&mut self) {
        self.needs_measure = true;
    }

    fn len(&self) -> usize {
        self.item_count.unwrap_or(0)
    }

    // --- layout ---

    /// Measure pass: realizes the visible window and computes the cell size.
    ///
    /// Each visible surface is measured against `available / (columns, rows)`; the cell
    /// size is the element-wise maximum of that constraint and every desired size, so one
    /// large item grows every cell. Returns `cell_size * (columns, rows)`, or
    /// [`Size::ZERO`] when there is nothing to show.
    pub fn measure<G>(&mut self, available: Size, generator: &mut G) -> Size
    where
        G: SurfaceGenerator<Surface = S>,
    {
        self.needs_measure = false;
        let len = self.len();
        self.offset = self.offset.min(len.saturating_sub(1));
        let count = self.page_size().min(len - self.offset);
        if count == 0 {
            self.last_realization = self.realized.release_all(generator);
            self.cell_size = Size::ZERO;
            gdebug!(
                bound = self.item_count.is_some(),
                released = self.last_realization.released,
                "measure: nothing to realize"
            );
            return Size::ZERO;
        }

        let columns = self.columns().get() as f64;
        let rows = self.rows().get() as f64;
        let constraint = Size::new(available.width / columns, available.height / rows);

        let window = self.offset..self.offset + count;
        self.last_realization = self
            .realized
            .realize(window, self.config.recycling, generator);

        let mut cell = constraint;
        for slot in self.realized.as_slice() {
            let desired = generator.measure(slot.surface, constraint);
            debug_assert!(
                desired.is_finite(),
                "SurfaceGenerator::measure must return a finite size; got {desired:?} for index {}",
                slot.index
            );
            cell.width = cell.width.max(desired.width);
            cell.height = cell.height.max(desired.height);
        }
        self.cell_size = cell;

        gdebug!(
            offset = self.offset,
            count,
            cell_width = cell.width,
            cell_height = cell.height,
            created = self.last_realization.created,
            recycled = self.last_realization.recycled,
            released = self.last_realization.released,
            "measure"
        );
        Size::new(cell.width * columns, cell.height * rows)
    }

    /// Arrange pass: places realized surfaces row-major, then refreshes scroll state.
    ///
    /// Cells flow left to right; a row ends at the first cell whose left edge is at or
    /// past `final_size.width - cell width`. The scroll owner, if any, is notified
    /// unconditionally.
    pub fn arrange<G>(&mut self, final_size: Size, generator: &mut G) -> Size
    where
        G: SurfaceGenerator<Surface = S>,
    {
        let cell = self.cell_size;
        let mut column = 0_usize;
        let mut y = 0.0;
        for slot in self.realized.iter_mut() {
            let origin = Point::new(column as f64 * cell.width, y);
            let bounds = Rect::from_origin_size(origin, cell);
            generator.arrange(slot.surface, bounds);
            slot.bounds = bounds;
            if origin.x + WRAP_TOLERANCE < final_size.width - cell.width {
                column += 1;
            } else {
                column = 0;
                y += cell.height;
            }
        }

        self.update_scroll_info();
        final_size
    }

    fn update_scroll_info(&mut self) {
        let cell = self.cell_size;
        let columns = self.columns().get();
        self.scroll.viewport = Size::new(
            cell.width * columns as f64,
            cell.height * self.rows().get() as f64,
        );
        match self.item_count {
            Some(len) if len > 0 => {
                self.scroll.extent = Size::new(
                    cell.width * len as f64,
                    cell.height * len.div_ceil(columns) as f64,
                );
            }
            _ => {
                self.scroll.extent = Size::ZERO;
                self.scroll.horizontal_offset = 0.0;
                self.scroll.vertical_offset = 0.0;
            }
        }
        gtrace!(scroll = ?self.scroll, "scroll info updated");
        if let Some(owner) = self.scroll_owner.as_mut() {
            owner.scroll_info_changed(&self.scroll);
        }
    }

    // --- scrolling ---

    /// Scrolls horizontally to `offset` pixels.
    ///
    /// The horizontal axis treats the items as a single row, so the window starts at
    /// item `offset / cell width`, clamped to the last item. The raw pixel value is kept
    /// even when the derived index does not change.
    pub fn set_horizontal_offset(&mut self, offset: f64) {
        self.scroll.horizontal_offset = offset;
        let len = self.len();
        if len == 0 {
            return;
        }
        let index = index_at_ratio(offset / self.cell_size.width, len);
        if index == self.offset {
            return;
        }
        self.offset = index;
        self.scroll.vertical_offset = self.vertical_offset_from_index();
        gtrace!(offset = self.offset, "horizontal offset");
        self.invalidate_measure();
    }

    /// Scrolls vertically to `offset` pixels.
    ///
    /// The window starts at item `columns * offset / cell height`, clamped to the last
    /// item. The raw pixel value is kept even when the derived index does not change.
    pub fn set_vertical_offset(&mut self, offset: f64) {
        self.scroll.vertical_offset = offset;
        let len = self.len();
        if len == 0 {
            return;
        }
        let columns = self.columns().get() as f64;
        let index = index_at_ratio(columns * offset / self.cell_size.height, len);
        if index == self.offset {
            return;
        }
        self.offset = index;
        self.scroll.horizontal_offset = self.horizontal_offset_from_index();
        gtrace!(offset = self.offset, "vertical offset");
        self.invalidate_measure();
    }

    /// Runs a discrete scroll command.
    pub fn execute(&mut self, command: ScrollCommand) {
        let row = self.columns().get();
        let page = self.page_size();
        let shift = match command {
            ScrollCommand::LineUp | ScrollCommand::MouseWheelUp => Shift::Back(row),
            ScrollCommand::LineDown | ScrollCommand::MouseWheelDown => Shift::Forward(row),
            ScrollCommand::LineLeft | ScrollCommand::MouseWheelLeft => Shift::Back(1),
            ScrollCommand::LineRight | ScrollCommand::MouseWheelRight => Shift::Forward(1),
            ScrollCommand::PageUp | ScrollCommand::PageLeft => Shift::Back(page),
            ScrollCommand::PageDown | ScrollCommand::PageRight => Shift::Forward(page),
        };
        gtrace!(?command, ?shift, "scroll command");
        self.shift_offset(shift);
    }

    /// Back one row.
    pub fn line_up(&mut self) {
        self.execute(ScrollCommand::LineUp);
    }

    /// Forward one row. Refused if it would move past the last item.
    pub fn line_down(&mut self) {
        self.execute(ScrollCommand::LineDown);
    }

    /// Back one item.
    pub fn line_left(&mut self) {
        self.execute(ScrollCommand::LineLeft);
    }

    /// Forward one item.
    pub fn line_right(&mut self) {
        self.execute(ScrollCommand::LineRight);
    }

    /// Back one window.
    pub fn page_up(&mut self) {
        self.execute(ScrollCommand::PageUp);
    }

    /// Forward one window. Refused if it would move past the last item.
    pub fn page_down(&mut self) {
        self.execute(ScrollCommand::PageDown);
    }

    /// Back one window.
    pub fn page_left(&mut self) {
        self.execute(ScrollCommand::PageLeft);
    }

    /// Forward one window. Refused if it would move past the last item.
    pub fn page_right(&mut self) {
        self.execute(ScrollCommand::PageRight);
    }

    /// Same as [`line_up`](Self::line_up).
    pub fn mouse_wheel_up(&mut self) {
        self.execute(ScrollCommand::MouseWheelUp);
    }

    /// Same as [`line_down`](Self::line_down).
    pub fn mouse_wheel_down(&mut self) {
        self.execute(ScrollCommand::MouseWheelDown);
    }

    /// Same as [`line_left`](Self::line_left).
    pub fn mouse_wheel_left(&mut self) {
        self.execute(ScrollCommand::MouseWheelLeft);
    }

    /// Same as [`line_right`](Self::line_right).
    pub fn mouse_wheel_right(&mut self) {
        self.execute(ScrollCommand::MouseWheelRight);
    }

    /// Moves the window so that `index` is visible.
    ///
    /// An index before the window becomes its first item; any other index moves the
    /// window to start at `index - page_size` (saturating at zero). Pixel offsets are
    /// left as they are until the host scrolls again.
    pub fn bring_index_into_view(&mut self, index: usize) {
        self.offset = if index < self.offset {
            index
        } else {
            index.saturating_sub(self.page_size())
        };
        gtrace!(index, offset = self.offset, "bring index into view");
        self.invalidate_measure();
    }

    /// Bounds `surface` was arranged into, if it is currently realized.
    #[must_use]
    pub fn visible_bounds(&self, surface: S) -> Option<Rect> {
        self.realized.find(surface).map(|slot| slot.bounds)
    }

    fn shift_offset(&mut self, shift: Shift) {
        let len = self.len();
        let target = if len == 0 {
            0
        } else {
            match shift {
                Shift::Back(n) => self.offset.saturating_sub(n),
                Shift::Forward(n) => {
                    let next = self.offset.saturating_add(n);
                    // Whole-row and whole-page steps never land on a partial final window.
                    let whole_step = n == self.columns().get() || n == self.page_size();
                    if whole_step && next >= len {
                        self.offset
                    } else {
                        next.min(len - 1)
                    }
                }
            }
        };
        if target == self.offset {
            return;
        }
        self.offset = target;
        self.sync_pixel_offsets();
        self.invalidate_measure();
    }

    fn sync_pixel_offsets(&mut self) {
        self.scroll.horizontal_offset = self.horizontal_offset_from_index();
        self.scroll.vertical_offset = self.vertical_offset_from_index();
    }

    fn horizontal_offset_from_index(&self) -> f64 {
        self.cell_size.width * self.offset as f64
    }

    fn vertical_offset_from_index(&self) -> f64 {
        self.cell_size.height * self.offset.div_ceil(self.columns().get()) as f64
    }
}

/// Truncates a fractional item position to an index in `0..len`.
///
/// `len` must be non-zero. Negative and NaN positions map to the first item.
fn index_at_ratio(ratio: f64, len: usize) -> usize {
    let last = len - 1;
    if ratio.is_nan() || ratio <= 0.0 {
        return 0;
    }
    if ratio >= last as f64 {
        return last;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "ratio lies in (0, last) so truncation is the intended floor"
    )]
    let index = ratio as usize;
    index.min(last)
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};
    use core::num::NonZeroUsize;

    use kurbo::{Rect, Size};
    use understory_item_source::{CountedItems, ItemsChanged};

    use super::{VirtualGrid, index_at_ratio};
    use crate::{
        GridConfig, RecyclingMode, ScrollAxes, ScrollCommand, ScrollInfo, ScrollOwner,
        SurfaceGenerator,
    };

    /// Surfaces are plain ids; desired size is fixed unless overridden per index.
    #[derive(Debug)]
    struct Cells {
        next: u32,
        live: Vec<u32>,
        desired: Size,
        oversized: Option<(usize, Size)>,
        bound: Vec<(u32, usize)>,
        arranged: Vec<(u32, Rect)>,
    }

    impl Cells {
        fn new(desired: Size) -> Self {
            Self {
                next: 0,
                live: Vec::new(),
                desired,
                oversized: None,
                bound: Vec::new(),
                arranged: Vec::new(),
            }
        }

        fn index_of(&self, surface: u32) -> usize {
            self.bound
                .iter()
                .rev()
                .find(|(s, _)| *s == surface)
                .map(|(_, i)| *i)
                .unwrap()
        }
    }

    impl SurfaceGenerator for Cells {
        type Surface = u32;

        fn create(&mut self, index: usize) -> u32 {
            let id = self.next;
            self.next += 1;
            self.live.push(id);
            self.bound.push((id, index));
            id
        }

        fn reuse(&mut self, surface: u32, index: usize) {
            self.bound.push((surface, index));
        }

        fn release(&mut self, surface: u32) {
            self.live.retain(|s| *s != surface);
        }

        fn measure(&mut self, surface: u32, _constraint: Size) -> Size {
            match self.oversized {
                Some((index, size)) if self.index_of(surface) == index => size,
                _ => self.desired,
            }
        }

        fn arrange(&mut self, surface: u32, bounds: Rect) {
            self.arranged.push((surface, bounds));
        }
    }

    fn config(rows: usize, columns: usize) -> GridConfig {
        GridConfig::new(
            NonZeroUsize::new(rows).unwrap(),
            NonZeroUsize::new(columns).unwrap(),
        )
    }

    fn grid(rows: usize, columns: usize, len: usize) -> VirtualGrid<u32> {
        let mut grid = VirtualGrid::new(config(rows, columns));
        grid.bind_items(len);
        grid
    }

    fn layout(grid: &mut VirtualGrid<u32>, cells: &mut Cells, available: Size) -> Size {
        let desired = grid.measure(available, cells);
        grid.arrange(desired, cells);
        desired
    }

    #[test]
    fn unbound_grid_measures_empty() {
        let mut grid: VirtualGrid<u32> = VirtualGrid::new(config(2, 2));
        let mut cells = Cells::new(Size::new(5.0, 5.0));
        assert_eq!(grid.measure(Size::new(100.0, 100.0), &mut cells), Size::ZERO);
        assert_eq!(grid.cell_size(), Size::ZERO);
        assert!(grid.realized().is_empty());
        assert!(!grid.needs_measure());
    }

    #[test]
    fn one_full_page_realizes_every_item() {
        let mut grid = grid(4, 6, 24);
        let mut cells = Cells::new(Size::new(10.0, 10.0));
        let desired = layout(&mut grid, &mut cells, Size::new(600.0, 400.0));

        assert_eq!(grid.realized_range(), 0..24);
        assert_eq!(cells.live.len(), 24);
        assert_eq!(grid.cell_size(), Size::new(100.0, 100.0));
        assert_eq!(desired, Size::new(600.0, 400.0));
    }

    #[test]
    fn partial_last_window_realizes_the_remainder() {
        let mut grid = grid(2, 5, 13);
        let mut cells = Cells::new(Size::new(1.0, 1.0));
        grid.bring_index_into_view(12);
        layout(&mut grid, &mut cells, Size::new(50.0, 20.0));
        assert_eq!(grid.offset(), 2);
        assert_eq!(grid.realized_range(), 2..12);

        grid.set_horizontal_offset(10.0 * 10.0);
        layout(&mut grid, &mut cells, Size::new(50.0, 20.0));
        assert_eq!(grid.offset(), 10);
        assert_eq!(grid.realized_range(), 10..13);
        assert_eq!(cells.live.len(), 3);
    }

    #[test]
    fn oversized_item_grows_every_cell() {
        let mut grid = grid(2, 2, 4);
        let mut cells = Cells::new(Size::new(10.0, 10.0));
        cells.oversized = Some((3, Size::new(70.0, 30.0)));
        let desired = layout(&mut grid, &mut cells, Size::new(100.0, 40.0));

        assert_eq!(grid.cell_size(), Size::new(70.0, 30.0));
        assert_eq!(desired, Size::new(140.0, 60.0));
        let rects: Vec<Rect> = grid.realized().iter().map(|s| s.bounds).collect();
        assert_eq!(
            rects,
            [
                Rect::new(0.0, 0.0, 70.0, 30.0),
                Rect::new(70.0, 0.0, 140.0, 30.0),
                Rect::new(0.0, 30.0, 70.0, 60.0),
                Rect::new(70.0, 30.0, 140.0, 60.0),
            ]
        );
    }

    #[test]
    fn arrange_wraps_on_final_width() {
        let mut grid = grid(2, 3, 6);
        let mut cells = Cells::new(Size::ZERO);
        grid.measure(Size::new(0.3, 2.0), &mut cells);
        grid.arrange(Size::new(0.3, 2.0), &mut cells);
        let ys: Vec<f64> = grid.realized().iter().map(|s| s.bounds.y0).collect();
        assert_eq!(ys, [0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        assert_eq!(cells.arranged.len(), 6);
    }

    #[test]
    fn grown_cells_keep_column_count_in_available_width() {
        let mut grid = grid(2, 3, 6);
        let mut cells = Cells::new(Size::new(34.0, 10.0));
        let available = Size::new(100.0, 100.0);
        grid.measure(available, &mut cells);
        grid.arrange(available, &mut cells);

        assert_eq!(grid.cell_size(), Size::new(34.0, 50.0));
        let origins: Vec<(f64, f64)> = grid
            .realized()
            .iter()
            .map(|s| (s.bounds.x0, s.bounds.y0))
            .collect();
        assert_eq!(
            origins,
            [
                (0.0, 0.0),
                (34.0, 0.0),
                (68.0, 0.0),
                (0.0, 50.0),
                (34.0, 50.0),
                (68.0, 50.0),
            ]
        );
    }

    #[test]
    fn scroll_info_follows_cell_size_and_count() {
        let mut grid = grid(2, 3, 7);
        let mut cells = Cells::new(Size::ZERO);
        layout(&mut grid, &mut cells, Size::new(30.0, 20.0));

        let info = grid.scroll_info();
        assert_eq!(info.viewport(), Size::new(30.0, 20.0));
        assert_eq!(info.extent_width(), 70.0);
        assert_eq!(info.extent_height(), 30.0);
    }

    #[test]
    fn scroll_owner_is_notified_on_every_arrange() {
        struct Counter(Rc<Cell<u32>>, Rc<RefCell<Option<ScrollInfo>>>);
        impl ScrollOwner for Counter {
            fn scroll_info_changed(&mut self, info: &ScrollInfo) {
                self.0.set(self.0.get() + 1);
                *self.1.borrow_mut() = Some(*info);
            }
        }

        let calls = Rc::new(Cell::new(0));
        let last = Rc::new(RefCell::new(None));
        let mut grid = grid(1, 2, 2);
        grid.set_scroll_axes(ScrollAxes::VERTICAL);
        grid.set_scroll_owner(Some(Box::new(Counter(Rc::clone(&calls), Rc::clone(&last)))));
        let mut cells = Cells::new(Size::ZERO);
        layout(&mut grid, &mut cells, Size::new(20.0, 10.0));
        grid.arrange(Size::new(20.0, 10.0), &mut cells);

        assert_eq!(calls.get(), 2);
        let info = last.borrow().unwrap();
        assert!(info.can_vertically_scroll());
        assert_eq!(info.extent_width(), 20.0);
    }

    #[test]
    fn reset_to_empty_releases_everything() {
        let mut items = CountedItems::new(8);
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        items
            .items_mut()
            .subscribe(move |c: &ItemsChanged| sink.borrow_mut().push(*c));

        let mut grid: VirtualGrid<u32> = VirtualGrid::new(config(2, 2));
        grid.bind_source(items.items());
        let mut cells = Cells::new(Size::new(1.0, 1.0));
        grid.execute(ScrollCommand::LineDown);
        layout(&mut grid, &mut cells, Size::new(10.0, 10.0));
        assert_eq!(cells.live.len(), 4);

        items.set_count(0);
        for change in changes.borrow_mut().drain(..) {
            grid.items_changed(&change);
        }
        assert!(grid.needs_measure());
        let desired = layout(&mut grid, &mut cells, Size::new(10.0, 10.0));

        assert_eq!(desired, Size::ZERO);
        assert!(cells.live.is_empty());
        assert_eq!(grid.last_realization().released, 4);
        assert_eq!(grid.offset(), 0);
        let info = grid.scroll_info();
        assert_eq!(info.extent(), Size::ZERO);
        assert_eq!(info.vertical_offset(), 0.0);
    }

    #[test]
    fn shrinking_source_clamps_offset_on_next_measure() {
        let mut grid = grid(1, 2, 10);
        let mut cells = Cells::new(Size::new(1.0, 1.0));
        grid.bring_index_into_view(9);
        layout(&mut grid, &mut cells, Size::new(2.0, 1.0));
        assert_eq!(grid.offset(), 7);

        grid.items_changed(&ItemsChanged::Reset { len: 3 });
        assert_eq!(grid.offset(), 7);
        layout(&mut grid, &mut cells, Size::new(2.0, 1.0));
        assert_eq!(grid.offset(), 2);
        assert_eq!(grid.realized_range(), 2..3);
    }

    #[test]
    fn page_down_refuses_to_overshoot() {
        let mut grid = grid(2, 5, 10);
        grid.page_down();
        assert_eq!(grid.offset(), 0);
        grid.line_down();
        assert_eq!(grid.offset(), 5);
        grid.line_down();
        assert_eq!(grid.offset(), 5);
        grid.line_right();
        assert_eq!(grid.offset(), 6);
    }

    #[test]
    fn line_down_from_last_row_is_refused() {
        let mut grid = grid(4, 6, 24);
        grid.set_horizontal_offset(0.0);
        for _ in 0..3 {
            grid.line_down();
        }
        assert_eq!(grid.offset(), 18);
        grid.line_down();
        assert_eq!(grid.offset(), 18);
        grid.mouse_wheel_up();
        assert_eq!(grid.offset(), 12);
    }

    #[test]
    fn fine_shifts_clamp_to_last_item() {
        let mut grid = grid(1, 3, 4);
        for _ in 0..10 {
            grid.line_right();
        }
        assert_eq!(grid.offset(), 3);
        grid.page_left();
        assert_eq!(grid.offset(), 0);
        grid.line_left();
        assert_eq!(grid.offset(), 0);
    }

    #[test]
    fn shifts_without_items_reset_to_zero() {
        let mut grid: VirtualGrid<u32> = VirtualGrid::new(config(2, 2));
        grid.execute(ScrollCommand::PageRight);
        assert_eq!(grid.offset(), 0);
        assert!(grid.needs_measure());
    }

    #[test]
    fn accepted_shift_updates_pixel_offsets() {
        let mut grid = grid(2, 3, 20);
        let mut cells = Cells::new(Size::ZERO);
        layout(&mut grid, &mut cells, Size::new(30.0, 20.0));
        grid.line_right();
        grid.line_right();
        grid.line_right();
        grid.line_right();
        assert_eq!(grid.offset(), 4);
        assert_eq!(grid.scroll_info().horizontal_offset(), 40.0);
        // ceil(4 / 3) rows.
        assert_eq!(grid.scroll_info().vertical_offset(), 20.0);
    }

    #[test]
    fn horizontal_offset_is_idempotent() {
        let mut grid = grid(2, 3, 20);
        let mut cells = Cells::new(Size::ZERO);
        layout(&mut grid, &mut cells, Size::new(30.0, 20.0));
        assert!(!grid.needs_measure());

        grid.set_horizontal_offset(55.0);
        assert_eq!(grid.offset(), 5);
        assert_eq!(grid.scroll_info().vertical_offset(), 20.0);
        assert!(grid.needs_measure());
        layout(&mut grid, &mut cells, Size::new(30.0, 20.0));

        grid.set_horizontal_offset(55.0);
        assert_eq!(grid.offset(), 5);
        assert!(!grid.needs_measure());
    }

    #[test]
    fn vertical_offset_maps_rows_to_items() {
        let mut grid = grid(2, 3, 20);
        let mut cells = Cells::new(Size::ZERO);
        layout(&mut grid, &mut cells, Size::new(30.0, 20.0));

        grid.set_vertical_offset(20.0);
        assert_eq!(grid.offset(), 6);
        assert_eq!(grid.scroll_info().horizontal_offset(), 60.0);
        assert_eq!(grid.scroll_info().vertical_offset(), 20.0);

        grid.set_vertical_offset(1000.0);
        assert_eq!(grid.offset(), 19);
        grid.set_vertical_offset(-5.0);
        assert_eq!(grid.offset(), 0);
    }

    #[test]
    fn offset_setters_without_items_only_store_pixels() {
        let mut grid: VirtualGrid<u32> = VirtualGrid::new(config(2, 2));
        let mut cells = Cells::new(Size::ZERO);
        grid.measure(Size::new(10.0, 10.0), &mut cells);
        grid.set_vertical_offset(12.5);
        assert_eq!(grid.offset(), 0);
        assert_eq!(grid.scroll_info().vertical_offset(), 12.5);
        assert!(!grid.needs_measure());
    }

    #[test]
    fn bring_index_into_view_aligns_to_window_end_or_start() {
        let mut grid = grid(2, 5, 40);
        grid.bring_index_into_view(12);
        assert_eq!(grid.offset(), 2);
        grid.bring_index_into_view(30);
        assert_eq!(grid.offset(), 20);
        grid.bring_index_into_view(4);
        assert_eq!(grid.offset(), 4);
    }

    #[test]
    fn bring_index_into_view_leaves_pixel_offsets() {
        let mut grid = grid(2, 5, 40);
        let mut cells = Cells::new(Size::ZERO);
        layout(&mut grid, &mut cells, Size::new(50.0, 20.0));
        grid.line_down();
        assert_eq!(grid.scroll_info().horizontal_offset(), 50.0);
        assert_eq!(grid.scroll_info().vertical_offset(), 10.0);

        grid.bring_index_into_view(25);
        assert_eq!(grid.offset(), 15);
        assert!(grid.needs_measure());
        assert_eq!(grid.scroll_info().horizontal_offset(), 50.0);
        assert_eq!(grid.scroll_info().vertical_offset(), 10.0);
    }

    #[test]
    fn visible_bounds_only_for_realized_surfaces() {
        let mut grid = grid(1, 2, 5);
        let mut cells = Cells::new(Size::ZERO);
        layout(&mut grid, &mut cells, Size::new(20.0, 10.0));
        let second = grid.surface_for_index(1).unwrap();
        assert_eq!(
            grid.visible_bounds(second),
            Some(Rect::new(10.0, 0.0, 20.0, 10.0))
        );
        assert_eq!(grid.visible_bounds(99), None);
    }

    #[test]
    fn recycling_mode_reuses_surfaces_across_pages() {
        let mut grid = VirtualGrid::new(config(1, 3).with_recycling(RecyclingMode::Recycling));
        grid.bind_items(9);
        let mut cells = Cells::new(Size::ZERO);
        layout(&mut grid, &mut cells, Size::new(30.0, 10.0));
        grid.page_down();
        layout(&mut grid, &mut cells, Size::new(30.0, 10.0));

        let summary = grid.last_realization();
        assert_eq!(summary.recycled, 3);
        assert_eq!(summary.created, 0);
        assert_eq!(cells.next, 3);
        assert_eq!(cells.index_of(grid.surface_for_index(4).unwrap()), 4);
    }

    #[test]
    fn config_changes_request_layout_only_when_different() {
        let mut grid = grid(2, 2, 4);
        let mut cells = Cells::new(Size::ZERO);
        grid.measure(Size::new(10.0, 10.0), &mut cells);
        grid.set_rows(NonZeroUsize::new(2).unwrap());
        assert!(!grid.needs_measure());
        grid.set_columns(NonZeroUsize::new(4).unwrap());
        assert!(grid.needs_measure());
        assert_eq!(grid.page_size(), 8);
    }

    #[test]
    fn ratio_to_index_clamps() {
        assert_eq!(index_at_ratio(f64::NAN, 5), 0);
        assert_eq!(index_at_ratio(-1.0, 5), 0);
        assert_eq!(index_at_ratio(2.9, 5), 2);
        assert_eq!(index_at_ratio(f64::INFINITY, 5), 4);
    }
}
