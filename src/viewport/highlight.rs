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

//! Press-drag-release text highlighting across items.

use super::surface::{Slot, row_text};
use crate::item::HighlightRange;
use std::cmp::Ordering;
use std::ops::RangeInclusive;

/// A cell in content space: item index, line within the item, column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ContentPoint {
    pub item: usize,
    pub line: usize,
    pub col: usize,
}

impl ContentPoint {
    fn cmp_position(&self, other: &Self) -> Ordering {
        self.item
            .cmp(&other.item)
            .then(self.line.cmp(&other.line))
            .then(self.col.cmp(&other.col))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    Backward,
}

/// Drag at or after the press point runs forward. An exact tie is forward
/// and covers nothing.
pub(crate) fn direction(down: ContentPoint, drag: ContentPoint) -> Direction {
    match drag.cmp_position(&down) {
        Ordering::Less => Direction::Backward,
        Ordering::Equal | Ordering::Greater => Direction::Forward,
    }
}

/// `(start, end)` in reading order.
pub(crate) fn resolve(down: ContentPoint, drag: ContentPoint) -> (ContentPoint, ContentPoint) {
    match direction(down, drag) {
        Direction::Forward => (down, drag),
        Direction::Backward => (drag, down),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Idle,
    Pressed,
    Dragging,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct HighlightState {
    phase: Phase,
    down: Option<ContentPoint>,
    drag: Option<ContentPoint>,
    /// Items that currently carry a highlight.
    applied: Option<RangeInclusive<usize>>,
}

impl HighlightState {
    pub fn is_tracking(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn press(&mut self, point: ContentPoint) {
        self.phase = Phase::Pressed;
        self.down = Some(point);
        self.drag = Some(point);
    }

    pub fn drag_to(&mut self, point: ContentPoint) {
        if self.phase != Phase::Idle {
            self.phase = Phase::Dragging;
            self.drag = Some(point);
        }
    }

    pub fn release(&mut self, point: ContentPoint) {
        self.drag_to(point);
        self.finish();
    }

    /// End the gesture, keeping whatever range was applied.
    pub fn finish(&mut self) {
        self.phase = Phase::Idle;
    }

    pub fn applied(&self) -> Option<RangeInclusive<usize>> {
        self.applied.clone()
    }

    /// Push the resolved range into the slots. Items that were highlighted
    /// before but fall outside the new range are cleared. Returns every
    /// index whose highlight changed.
    pub fn apply(&mut self, slots: &mut [Slot]) -> Vec<usize> {
        let wanted = match (self.down, self.drag) {
            (Some(down), Some(drag)) if down != drag => Some(resolve(down, drag)),
            _ => None,
        };
        let mut touched = Vec::new();
        if let Some(previous) = self.applied.take() {
            let keep = wanted.map(|(start, end)| start.item..=end.item);
            for index in previous {
                if keep.as_ref().is_some_and(|k| k.contains(&index)) {
                    continue;
                }
                if slots.get_mut(index).is_some_and(|slot| slot.set_highlight(None)) {
                    touched.push(index);
                }
            }
        }
        let Some((start, end)) = wanted else {
            return touched;
        };
        for index in start.item..=end.item {
            if let Some(slot) = slots.get_mut(index)
                && slot.set_highlight(Some(item_range(index, start, end)))
            {
                touched.push(index);
            }
        }
        self.applied = Some(start.item..=end.item);
        touched
    }

    /// Drop the gesture and every applied highlight.
    pub fn clear(&mut self, slots: &mut [Slot]) -> Vec<usize> {
        self.phase = Phase::Idle;
        self.down = None;
        self.drag = None;
        let Some(previous) = self.applied.take() else {
            return Vec::new();
        };
        previous
            .filter(|i| slots.get_mut(*i).is_some_and(|slot| slot.set_highlight(None)))
            .collect()
    }
}

/// Slice of the resolved range that falls on one item. Items the range
/// runs through are covered to their own end, whatever their height.
fn item_range(index: usize, start: ContentPoint, end: ContentPoint) -> HighlightRange {
    let (start_line, start_col) = if index == start.item { (start.line, start.col) } else { (0, 0) };
    let (end_line, end_col) =
        if index == end.item { (end.line, end.col) } else { (usize::MAX, usize::MAX) };
    HighlightRange { start_line, start_col, end_line, end_col }
}

/// Plain text under the current highlight, one line per highlighted row,
/// items in order, all joined with newlines.
pub(crate) fn extract_text(slots: &[Slot], applied: RangeInclusive<usize>, width: u16) -> String {
    let mut lines = Vec::new();
    for slot in applied.filter_map(|i| slots.get(i)) {
        let Some(range) = slot.highlight else {
            continue;
        };
        let rows = slot.plain_rows(width);
        let highlighted = rows
            .iter()
            .enumerate()
            .skip(range.start_line)
            .take_while(|(line, _)| *line <= range.end_line);
        for (line, row) in highlighted {
            if let Some((start, end)) = range.columns_on(line, usize::from(width)) {
                lines.push(row_text(row, start, end));
            }
        }
    }
    lines.join("\n")
}
