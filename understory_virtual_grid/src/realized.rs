// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bookkeeping for the surfaces realized for the visible window.

use alloc::vec::Vec;
use core::ops::Range;

use kurbo::Rect;
use smallvec::SmallVec;

use crate::{RecyclingMode, SurfaceGenerator};

/// A surface realized for one visible index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Realized<S> {
    /// Index of the record the surface displays.
    pub index: usize,
    /// The surface handle.
    pub surface: S,
    /// Where the surface was placed by the last arrange pass.
    ///
    /// [`Rect::ZERO`] until the surface has been arranged once.
    pub bounds: Rect,
}

/// What a realization pass did to the surface set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RealizeSummary {
    /// Surfaces kept because their index stayed visible.
    pub retained: usize,
    /// Surfaces obtained from [`SurfaceGenerator::create`].
    pub created: usize,
    /// Surfaces rebound to a new index with [`SurfaceGenerator::reuse`].
    pub recycled: usize,
    /// Surfaces handed back with [`SurfaceGenerator::release`].
    pub released: usize,
}

/// Realized surfaces, ordered by index and always covering a contiguous range.
#[derive(Clone, Debug)]
pub(crate) struct RealizedWindow<S> {
    slots: Vec<Realized<S>>,
}

impl<S> Default for RealizedWindow<S> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<S: Copy + Eq> RealizedWindow<S> {
    pub(crate) fn as_slice(&self) -> &[Realized<S>] {
        &self.slots
    }

    pub(crate) fn iter_mut(&mut self) -> core::slice::IterMut<'_, Realized<S>> {
        self.slots.iter_mut()
    }

    pub(crate) fn range(&self) -> Range<usize> {
        match (self.slots.first(), self.slots.last()) {
            (Some(first), Some(last)) => first.index..last.index + 1,
            _ => 0..0,
        }
    }

    pub(crate) fn find(&self, surface: S) -> Option<&Realized<S>> {
        self.slots.iter().find(|slot| slot.surface == surface)
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Realized<S>> {
        let first = self.slots.first()?.index;
        self.slots.get(index.checked_sub(first)?)
    }

    /// Releases every surface.
    pub(crate) fn release_all<G>(&mut self, generator: &mut G) -> RealizeSummary
    where
        G: SurfaceGenerator<Surface = S>,
    {
        let released = self.slots.len();
        for slot in self.slots.drain(..) {
            generator.release(slot.surface);
        }
        RealizeSummary {
            released,
            ..RealizeSummary::default()
        }
    }

    /// Makes the realized set cover exactly `window`.
    ///
    /// Surfaces whose index is still inside `window` are kept untouched. Surfaces
    /// outside it are released, or rebound to entering indices under
    /// [`RecyclingMode::Recycling`].
    pub(crate) fn realize<G>(
        &mut self,
        window: Range<usize>,
        mode: RecyclingMode,
        generator: &mut G,
    ) -> RealizeSummary
    where
        G: SurfaceGenerator<Surface = S>,
    {
        let mut summary = RealizeSummary::default();
        let previous = core::mem::take(&mut self.slots);

        let mut departing: SmallVec<[S; 16]> = SmallVec::new();
        let mut kept = Vec::with_capacity(previous.len());
        for slot in previous {
            if window.contains(&slot.index) {
                kept.push(slot);
            } else {
                departing.push(slot.surface);
            }
        }

        if mode == RecyclingMode::Standard {
            summary.released += departing.len();
            for surface in departing.drain(..) {
                generator.release(surface);
            }
        } else {
            // Hand out surfaces in the order they were realized.
            departing.reverse();
        }

        let mut kept = kept.into_iter().peekable();
        self.slots.reserve(window.len());
        for index in window {
            let slot = match kept.next_if(|slot| slot.index == index) {
                Some(slot) => {
                    summary.retained += 1;
                    slot
                }
                None => {
                    let surface = match departing.pop() {
                        Some(surface) => {
                            generator.reuse(surface, index);
                            summary.recycled += 1;
                            surface
                        }
                        None => {
                            summary.created += 1;
                            generator.create(index)
                        }
                    };
                    Realized {
                        index,
                        surface,
                        bounds: Rect::ZERO,
                    }
                }
            };
            self.slots.push(slot);
        }
        debug_assert!(
            kept.next().is_none(),
            "retained surfaces must lie inside the new window"
        );

        summary.released += departing.len();
        for surface in departing {
            generator.release(surface);
        }
        summary
    }
}
