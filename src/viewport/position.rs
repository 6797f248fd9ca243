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

//! Cumulative line positions for the item list.
//!
//! Invariants (checked by [`PositionIndex::is_consistent`]):
//! - `entries[i + 1].start == entries[i].start + entries[i].height + gap`
//! - `total == last.start + last.height`, or 0 when empty

use std::ops::Range;

/// Vertical extent of one item in content lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub start: usize,
    pub height: usize,
}

impl Extent {
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PositionEntry {
    pub start: usize,
    pub height: usize,
    /// False when `height` is an estimate rather than an actual measurement.
    pub measured: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PositionIndex {
    entries: Vec<PositionEntry>,
    gap: usize,
    total: usize,
}

impl PositionIndex {
    pub fn new(gap: usize) -> Self {
        Self { entries: Vec::new(), gap, total: 0 }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn gap(&self) -> usize {
        self.gap
    }

    pub fn total_height(&self) -> usize {
        self.total
    }

    pub fn extent(&self, index: usize) -> Option<Extent> {
        self.entries.get(index).map(|e| Extent { start: e.start, height: e.height })
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.entries.get(index).is_some_and(|e| e.measured)
    }

    /// Replace the whole table.
    pub fn rebuild(&mut self, heights: impl IntoIterator<Item = (usize, bool)>) {
        self.entries.clear();
        self.total = 0;
        for (height, measured) in heights {
            self.push(height, measured);
        }
    }

    pub fn push(&mut self, height: usize, measured: bool) {
        let start = if self.entries.is_empty() { 0 } else { self.total + self.gap };
        self.entries.push(PositionEntry { start, height, measured });
        self.total = start + height;
    }

    /// Insert before `index`; every later entry moves down by `height + gap`.
    pub fn insert(&mut self, index: usize, height: usize, measured: bool) {
        if index >= self.entries.len() {
            self.push(height, measured);
            return;
        }
        let start = self.entries[index].start;
        let shift = height + self.gap;
        for entry in &mut self.entries[index..] {
            entry.start += shift;
        }
        self.entries.insert(index, PositionEntry { start, height, measured });
        self.total += shift;
    }

    /// Content lines owned by `index` including the one gap that disappears
    /// with it. Used to splice the item out of a composited surface.
    pub fn removal_span(&self, index: usize) -> Option<Range<usize>> {
        let entry = self.entries.get(index)?;
        let span = if self.entries.len() == 1 {
            0..self.total
        } else if index + 1 == self.entries.len() {
            entry.start - self.gap..entry.start + entry.height
        } else {
            entry.start..entry.start + entry.height + self.gap
        };
        Some(span)
    }

    pub fn remove(&mut self, index: usize) -> Option<PositionEntry> {
        let span = self.removal_span(index)?;
        let removed = self.entries.remove(index);
        let shift = span.len();
        for entry in &mut self.entries[index..] {
            entry.start -= shift;
        }
        self.total -= shift;
        Some(removed)
    }

    /// Set an entry's height, shifting every later entry. Returns the signed delta.
    pub fn set_height(&mut self, index: usize, height: usize, measured: bool) -> isize {
        let Some(entry) = self.entries.get_mut(index) else {
            return 0;
        };
        let old = entry.height;
        entry.height = height;
        entry.measured = measured;
        if old == height {
            return 0;
        }
        for later in &mut self.entries[index + 1..] {
            later.start = later.start + height - old;
        }
        self.total = self.total + height - old;
        signed_delta(old, height)
    }

    pub fn mark_unmeasured(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.measured = false;
        }
    }

    pub fn mark_all_unmeasured(&mut self) {
        for entry in &mut self.entries {
            entry.measured = false;
        }
    }

    /// Index of the item owning `line`. Gap lines belong to the item above
    /// them; lines past the end belong to the last item.
    pub fn item_at_line(&self, line: usize) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        let after = self.entries.partition_point(|e| e.start <= line);
        Some(after.saturating_sub(1))
    }

    /// Items intersecting `[offset, offset + height)`.
    pub fn items_in_window(&self, offset: usize, height: usize) -> Range<usize> {
        if height == 0 {
            return 0..0;
        }
        let (Some(first), Some(last)) =
            (self.item_at_line(offset), self.item_at_line(offset + height - 1))
        else {
            return 0..0;
        };
        let first = match self.entries.get(first) {
            // Window starts in the gap below `first`.
            Some(e) if e.start + e.height <= offset && first < last => first + 1,
            _ => first,
        };
        first..last + 1
    }

    pub fn is_consistent(&self) -> bool {
        let mut expected = 0;
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.start != expected {
                return false;
            }
            expected = entry.start + entry.height;
            if i + 1 < self.entries.len() {
                expected += self.gap;
            }
        }
        expected == self.total
    }
}

#[allow(clippy::cast_possible_wrap)]
fn signed_delta(old: usize, new: usize) -> isize {
    new as isize - old as isize
}
