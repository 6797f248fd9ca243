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

//! Estimate-then-measure backend for unbounded content.
//!
//! Items start at an estimated height. Only items inside the window plus an
//! overscan margin are measured and rasterized, each into its own cache
//! slot. When a first measurement corrects an item above the first visible
//! item, the scroll offset absorbs the delta so visible content stays put.

use super::backend::{RenderBackend, Window};
use super::position::PositionIndex;
use super::surface::{Row, Slot, blit_row};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use std::ops::Range;

pub(crate) struct LazyRenderer {
    positions: PositionIndex,
    cache: Vec<Option<Vec<Row>>>,
    width: u16,
    overscan: usize,
    estimate: usize,
    highlight_style: Style,
}

impl LazyRenderer {
    pub fn new(gap: u16, overscan: usize, estimated_height: u16, highlight_style: Style) -> Self {
        Self {
            positions: PositionIndex::new(usize::from(gap)),
            cache: Vec::new(),
            width: 0,
            overscan,
            estimate: usize::from(estimated_height),
            highlight_style,
        }
    }

    #[cfg(test)]
    pub fn cached_indices(&self) -> Vec<usize> {
        self.cache.iter().enumerate().filter(|(_, rows)| rows.is_some()).map(|(i, _)| i).collect()
    }

    fn around(&self, visible: &Range<usize>, margin: usize) -> Range<usize> {
        visible.start.saturating_sub(margin)..visible.end.saturating_add(margin).min(self.positions.len())
    }

    /// Measure `index` if it still carries an estimate. Returns the height delta.
    fn measure(&mut self, slots: &[Slot], index: usize) -> Option<isize> {
        if self.positions.is_measured(index) {
            return None;
        }
        let slot = slots.get(index)?;
        let height = slot.measure(self.width);
        Some(self.positions.set_height(index, height, true))
    }

    fn prune(&mut self, keep: &Range<usize>) {
        let mut evicted = 0usize;
        for (i, rows) in self.cache.iter_mut().enumerate() {
            if !keep.contains(&i) && rows.take().is_some() {
                evicted += 1;
            }
        }
        if evicted > 0 {
            tracing::trace!(evicted, keep_start = keep.start, keep_end = keep.end, "pruned lazy cache");
        }
    }
}

impl RenderBackend for LazyRenderer {
    fn positions(&self) -> &PositionIndex {
        &self.positions
    }

    fn set_width(&mut self, _slots: &[Slot], width: u16) {
        self.width = width;
        // Old heights stay as estimates; they are usually closer than the default.
        self.positions.mark_all_unmeasured();
        for rows in &mut self.cache {
            *rows = None;
        }
    }

    fn reset(&mut self, slots: &[Slot]) {
        self.positions.rebuild(slots.iter().map(|_| (self.estimate, false)));
        self.cache = vec![None; slots.len()];
    }

    fn inserted(&mut self, _slots: &[Slot], index: usize) {
        self.positions.insert(index, self.estimate, false);
        let at = index.min(self.cache.len());
        self.cache.insert(at, None);
    }

    fn removed(&mut self, index: usize) {
        self.positions.remove(index);
        if index < self.cache.len() {
            self.cache.remove(index);
        }
    }

    fn invalidate(&mut self, _slots: &[Slot], index: usize) {
        self.positions.mark_unmeasured(index);
        if let Some(rows) = self.cache.get_mut(index) {
            *rows = None;
        }
    }

    fn ensure_measured(&mut self, slots: &[Slot], index: usize) {
        self.measure(slots, index);
    }

    fn prepare(&mut self, slots: &[Slot], window: Window) -> usize {
        let _t = crate::perf::start("lazy::prepare");
        let mut offset = window.offset;
        let mut visible;
        'settle: loop {
            visible = self.positions.items_in_window(offset, window.height);
            let anchor = visible.start;
            for index in self.around(&visible, self.overscan) {
                let Some(delta) = self.measure(slots, index) else {
                    continue;
                };
                if delta == 0 {
                    continue;
                }
                if index == anchor
                    && let Some(extent) = self.positions.extent(index)
                {
                    // Keep the offset inside the anchor when it shrinks.
                    let within = offset.saturating_sub(extent.start);
                    offset = extent.start + within.min(extent.height.saturating_sub(1));
                }
                if index >= anchor {
                    // Window membership may have changed.
                    continue 'settle;
                }
                if offset > 0 {
                    let corrected = offset.saturating_add_signed(delta);
                    tracing::debug!(index, delta, from = offset, to = corrected, "stabilized scroll offset");
                    offset = corrected;
                }
            }
            break;
        }

        for index in self.around(&visible, self.overscan) {
            if let Some(entry) = self.cache.get_mut(index)
                && entry.is_none()
                && let Some(slot) = slots.get(index)
            {
                *entry = Some(slot.rasterize(self.width, self.highlight_style));
            }
        }
        let keep = self.around(&visible, self.overscan.saturating_mul(2));
        self.prune(&keep);
        offset
    }

    #[allow(clippy::cast_possible_truncation)]
    fn draw(&self, window: Window, area: Rect, buf: &mut Buffer) {
        let bottom = window.offset + window.height.min(usize::from(area.height));
        for index in self.positions.items_in_window(window.offset, window.height) {
            let (Some(extent), Some(Some(rows))) = (self.positions.extent(index), self.cache.get(index))
            else {
                continue;
            };
            for (line, row) in (extent.start..).zip(rows.iter()) {
                if line < window.offset {
                    continue;
                }
                if line >= bottom {
                    break;
                }
                blit_row(row, buf, area.x, area.y + (line - window.offset) as u16, area.width);
            }
        }
    }
}
