// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A paged box of numbered items: `CountedItems` shown through a `VirtualGrid`.
//!
//! This example shows how to:
//! - bind an observable item collection to the grid and forward its change notifications,
//! - implement `SurfaceGenerator` over a slab of text labels,
//! - drive the grid with scroll commands, pixel offsets, and bring-into-view requests.
//!
//! Each step is followed by a full measure/arrange cycle and a text dump of the window.
//!
//! Run:
//! - `cargo run -p understory_demos --example page_box`
//! - `cargo run -p understory_demos --example page_box -- --count 50 --rows 3 --columns 4 line-down page-down bring=37 count=0`
//! - `RUST_LOG=understory_virtual_grid=debug cargo run -p understory_demos --example page_box -- --recycling page-down`

use std::cell::RefCell;
use std::fmt;
use std::num::NonZeroUsize;
use std::rc::Rc;
use std::str::FromStr;

use clap::Parser;
use kurbo::{Rect, Size};
use tracing_subscriber::EnvFilter;
use understory_item_source::{CountedItems, Item, ItemSource, ItemsChanged, ObservableItems};
use understory_virtual_grid::{
    GridConfig, RecyclingMode, ScrollAxes, ScrollCommand, ScrollInfo, ScrollOwner,
    SurfaceGenerator, VirtualGrid,
};

/// Approximate glyph advance used to size labels.
const CHAR_WIDTH: f64 = 7.0;
const LINE_HEIGHT: f64 = 18.0;
const PADDING: f64 = 8.0;

#[derive(Parser, Debug)]
#[command(about = "Page through numbered items with a virtualizing grid")]
struct Args {
    /// Number of items in the collection.
    #[arg(long, default_value_t = 24)]
    count: usize,
    /// Rows in the visible window.
    #[arg(long, default_value = "4")]
    rows: NonZeroUsize,
    /// Columns in the visible window.
    #[arg(long, default_value = "6")]
    columns: NonZeroUsize,
    /// Viewport width in pixels.
    #[arg(long, default_value_t = 600.0)]
    width: f64,
    /// Viewport height in pixels.
    #[arg(long, default_value_t = 400.0)]
    height: f64,
    /// Recycle surfaces instead of releasing them.
    #[arg(long)]
    recycling: bool,
    /// Steps to run: a scroll command (`line-down`, `page-up`, `wheel-left`, ...),
    /// `bring=<index>`, `hoffset=<px>`, `voffset=<px>`, or `count=<n>`.
    steps: Vec<Step>,
}

#[derive(Clone, Copy, Debug)]
enum Step {
    Scroll(ScrollCommand),
    Bring(usize),
    HorizontalOffset(f64),
    VerticalOffset(f64),
    Count(usize),
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((key, value)) = s.split_once('=') {
            let bad = |e: &dyn fmt::Display| format!("invalid value in `{s}`: {e}");
            return match key {
                "bring" => value.parse().map(Self::Bring).map_err(|e| bad(&e)),
                "hoffset" => value.parse().map(Self::HorizontalOffset).map_err(|e| bad(&e)),
                "voffset" => value.parse().map(Self::VerticalOffset).map_err(|e| bad(&e)),
                "count" => value.parse().map(Self::Count).map_err(|e| bad(&e)),
                _ => Err(format!("unknown step `{key}`")),
            };
        }
        let command = match s {
            "line-up" => ScrollCommand::LineUp,
            "line-down" => ScrollCommand::LineDown,
            "line-left" => ScrollCommand::LineLeft,
            "line-right" => ScrollCommand::LineRight,
            "page-up" => ScrollCommand::PageUp,
            "page-down" => ScrollCommand::PageDown,
            "page-left" => ScrollCommand::PageLeft,
            "page-right" => ScrollCommand::PageRight,
            "wheel-up" => ScrollCommand::MouseWheelUp,
            "wheel-down" => ScrollCommand::MouseWheelDown,
            "wheel-left" => ScrollCommand::MouseWheelLeft,
            "wheel-right" => ScrollCommand::MouseWheelRight,
            _ => return Err(format!("unknown step `{s}`")),
        };
        Ok(Self::Scroll(command))
    }
}

/// A text label standing in for a rendered item.
#[derive(Clone, Debug)]
struct Label {
    text: String,
    bounds: Rect,
}

/// Slab of labels; a surface is a slot index.
#[derive(Debug, Default)]
struct Labels {
    slots: Vec<Option<Label>>,
    free: Vec<usize>,
}

impl Labels {
    fn get(&self, surface: usize) -> Option<&Label> {
        self.slots.get(surface).and_then(Option::as_ref)
    }

    fn live(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Binds labels to records for the duration of one layout pass.
struct Realizer<'a> {
    labels: &'a mut Labels,
    items: &'a ObservableItems<Item>,
}

impl Realizer<'_> {
    fn text(&self, index: usize) -> String {
        self.items
            .get(index)
            .map_or_else(String::new, ToString::to_string)
    }
}

impl SurfaceGenerator for Realizer<'_> {
    type Surface = usize;

    fn create(&mut self, index: usize) -> usize {
        let label = Label {
            text: self.text(index),
            bounds: Rect::ZERO,
        };
        match self.labels.free.pop() {
            Some(slot) => {
                self.labels.slots[slot] = Some(label);
                slot
            }
            None => {
                self.labels.slots.push(Some(label));
                self.labels.slots.len() - 1
            }
        }
    }

    fn reuse(&mut self, surface: usize, index: usize) {
        let text = self.text(index);
        if let Some(Some(label)) = self.labels.slots.get_mut(surface) {
            label.text = text;
        }
    }

    fn release(&mut self, surface: usize) {
        if self.labels.slots.get_mut(surface).and_then(Option::take).is_some() {
            self.labels.free.push(surface);
        }
    }

    fn measure(&mut self, surface: usize, _constraint: Size) -> Size {
        let chars = self.labels.get(surface).map_or(0, |l| l.text.chars().count());
        Size::new(chars as f64 * CHAR_WIDTH + PADDING, LINE_HEIGHT)
    }

    fn arrange(&mut self, surface: usize, bounds: Rect) {
        if let Some(Some(label)) = self.labels.slots.get_mut(surface) {
            label.bounds = bounds;
        }
    }
}

/// Logs every scroll-state refresh, like a scroll bar would re-read it.
struct ScrollLog;

impl ScrollOwner for ScrollLog {
    fn scroll_info_changed(&mut self, info: &ScrollInfo) {
        tracing::debug!(
            viewport = ?info.viewport(),
            extent = ?info.extent(),
            horizontal = info.horizontal_offset(),
            vertical = info.vertical_offset(),
            "scroll info changed"
        );
    }
}

fn layout(
    grid: &mut VirtualGrid<usize>,
    labels: &mut Labels,
    items: &ObservableItems<Item>,
    viewport: Size,
) {
    let mut realizer = Realizer { labels, items };
    let desired = grid.measure(viewport, &mut realizer);
    grid.arrange(desired, &mut realizer);
}

fn render(grid: &VirtualGrid<usize>, labels: &Labels) {
    let info = grid.scroll_info();
    println!(
        "offset {:>4} | window {:?} | cell {:.0}x{:.0} | extent {:.0}x{:.0} | scroll ({:.0}, {:.0}) | live surfaces {}",
        grid.offset(),
        grid.realized_range(),
        grid.cell_size().width,
        grid.cell_size().height,
        info.extent_width(),
        info.extent_height(),
        info.horizontal_offset(),
        info.vertical_offset(),
        labels.live(),
    );
    let mut line = String::new();
    let mut row_top = None;
    for slot in grid.realized() {
        let Some(label) = labels.get(slot.surface) else {
            continue;
        };
        if row_top.is_some_and(|top| top != label.bounds.y0) {
            println!("  {line}");
            line.clear();
        }
        row_top = Some(label.bounds.y0);
        line.push_str(&format!("{:<10}", label.text));
    }
    if !line.is_empty() {
        println!("  {line}");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let viewport = Size::new(args.width, args.height);
    let recycling = if args.recycling {
        RecyclingMode::Recycling
    } else {
        RecyclingMode::Standard
    };

    let mut items = CountedItems::new(args.count);
    let pending = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&pending);
    items
        .items_mut()
        .subscribe(move |change: &ItemsChanged| sink.borrow_mut().push(*change));

    let config = GridConfig::new(args.rows, args.columns).with_recycling(recycling);
    let mut grid = VirtualGrid::new(config);
    grid.set_scroll_axes(ScrollAxes::HORIZONTAL | ScrollAxes::VERTICAL);
    grid.set_scroll_owner(Some(Box::new(ScrollLog)));
    grid.bind_source(items.items());

    let mut labels = Labels::default();
    layout(&mut grid, &mut labels, items.items(), viewport);
    tracing::info!(
        count = args.count,
        rows = args.rows.get(),
        columns = args.columns.get(),
        "initial layout"
    );
    render(&grid, &labels);

    for step in args.steps {
        match step {
            Step::Scroll(command) => grid.execute(command),
            Step::Bring(index) => grid.bring_index_into_view(index),
            Step::HorizontalOffset(px) => grid.set_horizontal_offset(px),
            Step::VerticalOffset(px) => grid.set_vertical_offset(px),
            Step::Count(count) => {
                items.set_count(count);
            }
        }
        for change in pending.borrow_mut().drain(..) {
            grid.items_changed(&change);
        }
        if grid.needs_measure() {
            layout(&mut grid, &mut labels, items.items(), viewport);
        }
        tracing::info!(?step, relayout = ?grid.last_realization(), "step");
        render(&grid, &labels);
    }
}
