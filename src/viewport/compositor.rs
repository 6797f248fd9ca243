// chat_viewport - Virtual-scrolling viewport engine for terminal chat consoles
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Full-buffer compositor.
//!
//! Every item is drawn once into a single surface tall enough for the whole
//! content. Frames copy a sliding window out of that surface; only items
//! marked dirty are redrawn, in place, as long as their height is unchanged.
//! Structural edits splice rows at the affected end instead of redrawing.

use super::backend::{RenderBackend, Window};
use super::dirty::{DirtyTracker, Pending};
use super::position::PositionIndex;
use super::surface::{Row, Slot, blank_rows, blit_row};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use std::time::Instant;

pub(crate) struct Compositor {
    positions: PositionIndex,
    dirty: DirtyTracker,
    rows: Vec<Row>,
    width: u16,
    highlight_style: Style,
}

impl Compositor {
    pub fn new(gap: u16, highlight_style: Style) -> Self {
        let mut dirty = DirtyTracker::default();
        dirty.mark_full();
        Self {
            positions: PositionIndex::new(usize::from(gap)),
            dirty,
            rows: Vec::new(),
            width: 0,
            highlight_style,
        }
    }

    #[cfg(test)]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    fn gap_rows(&self) -> Vec<Row> {
        blank_rows(self.width, self.positions.gap())
    }

    /// Remeasure and redraw everything into a freshly sized surface.
    pub fn rebuild(&mut self, slots: &[Slot]) {
        let _t = crate::perf::start_with("compositor::rebuild", "items", slots.len());
        let started = Instant::now();
        let width = self.width;
        self.positions.rebuild(slots.iter().map(|slot| (slot.measure(width), true)));
        let mut rows = Vec::with_capacity(self.positions.total_height());
        for (i, slot) in slots.iter().enumerate() {
            if i > 0 {
                rows.extend(self.gap_rows());
            }
            rows.extend(slot.rasterize(width, self.highlight_style));
        }
        self.rows = rows;
        self.dirty.take();
        tracing::debug!(
            items = slots.len(),
            lines = self.rows.len(),
            width,
            elapsed_us = started.elapsed().as_micros(),
            "compositor rebuilt"
        );
    }

    /// Redraw dirty items in place. Degrades to [`Compositor::rebuild`] when a
    /// height moved or the table no longer matches the surface.
    fn patch(&mut self, slots: &[Slot], dirty: &[usize]) {
        let _t = crate::perf::start_with("compositor::patch", "dirty", dirty.len());
        for &index in dirty {
            let (Some(slot), Some(extent)) = (slots.get(index), self.positions.extent(index)) else {
                tracing::warn!(index, "dirty index outside item list; rebuilding");
                self.rebuild(slots);
                return;
            };
            let fresh = slot.rasterize(self.width, self.highlight_style);
            if fresh.len() != extent.height {
                tracing::debug!(index, old = extent.height, new = fresh.len(), "height changed during patch");
                self.rebuild(slots);
                return;
            }
            if extent.end() > self.rows.len() {
                tracing::warn!(index, lines = self.rows.len(), "item extent past surface; rebuilding");
                self.rebuild(slots);
                return;
            }
            for (target, row) in self.rows[extent.start..extent.end()].iter_mut().zip(fresh) {
                *target = row;
            }
        }
        tracing::trace!(patched = dirty.len(), "compositor patched");
    }

    fn surface_matches_table(&self) -> bool {
        self.rows.len() == self.positions.total_height()
    }
}

impl RenderBackend for Compositor {
    fn positions(&self) -> &PositionIndex {
        &self.positions
    }

    fn set_width(&mut self, slots: &[Slot], width: u16) {
        self.width = width;
        self.positions.rebuild(slots.iter().map(|slot| (slot.measure(width), true)));
        self.dirty.mark_full();
    }

    fn reset(&mut self, slots: &[Slot]) {
        let width = self.width;
        self.positions.rebuild(slots.iter().map(|slot| (slot.measure(width), true)));
        self.dirty.mark_full();
    }

    fn inserted(&mut self, slots: &[Slot], index: usize) {
        let Some(slot) = slots.get(index) else {
            return;
        };
        if self.dirty.is_full() || !self.surface_matches_table() {
            self.positions.insert(index, slot.measure(self.width), true);
            self.dirty.mark_full();
            return;
        }
        let item_rows = slot.rasterize(self.width, self.highlight_style);
        let appending = index >= self.positions.len();
        let at = if appending {
            self.rows.len()
        } else {
            self.positions.extent(index).map_or(self.rows.len(), |e| e.start)
        };
        let has_neighbour = !self.positions.is_empty();
        let mut spliced = Vec::with_capacity(item_rows.len() + self.positions.gap());
        if appending && has_neighbour {
            spliced.extend(self.gap_rows());
        }
        let height = item_rows.len();
        spliced.extend(item_rows);
        if !appending && has_neighbour {
            spliced.extend(self.gap_rows());
        }
        self.rows.splice(at..at, spliced);
        self.positions.insert(index, height, true);
        self.dirty.shift_for_insert(index);
    }

    fn removed(&mut self, index: usize) {
        let span = self.positions.removal_span(index);
        self.positions.remove(index);
        self.dirty.shift_for_remove(index);
        match span {
            Some(span) if !self.dirty.is_full() && span.end <= self.rows.len() => {
                self.rows.drain(span);
                if !self.surface_matches_table() || !self.positions.is_consistent() {
                    tracing::warn!("surface out of step with positions after delete; rebuilding");
                    self.dirty.mark_full();
                }
            }
            _ => self.dirty.mark_full(),
        }
    }

    fn invalidate(&mut self, slots: &[Slot], index: usize) {
        let (Some(slot), Some(extent)) = (slots.get(index), self.positions.extent(index)) else {
            return;
        };
        let height = slot.measure(self.width);
        if height == extent.height {
            self.dirty.mark(index);
        } else {
            self.positions.set_height(index, height, true);
            self.dirty.mark_full();
        }
    }

    fn ensure_measured(&mut self, _slots: &[Slot], _index: usize) {}

    fn prepare(&mut self, slots: &[Slot], window: Window) -> usize {
        match self.dirty.take() {
            Pending::Clean => {}
            Pending::Items(items) => self.patch(slots, &items),
            Pending::Full => self.rebuild(slots),
        }
        window.offset
    }

    #[allow(clippy::cast_possible_truncation)]
    fn draw(&self, window: Window, area: Rect, buf: &mut Buffer) {
        let visible = window.height.min(usize::from(area.height));
        for (dy, row) in self.rows.iter().skip(window.offset).take(visible).enumerate() {
            blit_row(row, buf, area.x, area.y + dy as u16, area.width);
        }
    }
}
