// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid configuration: fixed row/column counts and the recycling policy.

use core::num::NonZeroUsize;

const DEFAULT_ROWS: NonZeroUsize = NonZeroUsize::new(4).unwrap();
const DEFAULT_COLUMNS: NonZeroUsize = NonZeroUsize::new(6).unwrap();

/// What happens to a surface whose index leaves the visible window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RecyclingMode {
    /// Release it immediately; entering indices always get a freshly created surface.
    #[default]
    Standard,
    /// Hand it to an entering index via
    /// [`SurfaceGenerator::reuse`](crate::SurfaceGenerator::reuse); release only the surplus.
    Recycling,
}

/// Shape of the visible window.
///
/// The window always spans `rows × columns` cells, laid out row-major, so the item
/// at window position `(row, column)` has index `offset + row * columns + column`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    /// Number of rows in the visible window.
    pub rows: NonZeroUsize,
    /// Number of columns in the visible window.
    pub columns: NonZeroUsize,
    /// Surface recycling policy.
    #[cfg_attr(feature = "serde", serde(default))]
    pub recycling: RecyclingMode,
}

impl Default for GridConfig {
    /// Four rows of six columns, without recycling.
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLUMNS)
    }
}

impl GridConfig {
    /// Creates a configuration with [`RecyclingMode::Standard`].
    #[must_use]
    pub const fn new(rows: NonZeroUsize, columns: NonZeroUsize) -> Self {
        Self {
            rows,
            columns,
            recycling: RecyclingMode::Standard,
        }
    }

    /// Returns a copy using `recycling`.
    #[must_use]
    pub const fn with_recycling(mut self, recycling: RecyclingMode) -> Self {
        self.recycling = recycling;
        self
    }

    /// Number of cells in one window (`rows * columns`).
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.rows.get().saturating_mul(self.columns.get())
    }
}
