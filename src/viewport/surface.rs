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

//! Row rasterization shared by both render backends.
//!
//! Items draw into a scratch buffer sized exactly to their declared height,
//! so anything an item writes past its region is dropped here instead of
//! landing on a neighbour. The resulting rows of cells are what the
//! backends cache and copy into the frame.

use crate::item::{Capabilities, Entry, HighlightRange, Item};
use ratatui::buffer::{Buffer, Cell};
use ratatui::layout::Rect;
use ratatui::style::Style;
use unicode_width::UnicodeWidthStr;

pub(crate) type Row = Vec<Cell>;

/// Engine-side record for one item.
pub(crate) struct Slot {
    pub item: Box<dyn Item>,
    pub id: Option<String>,
    pub caps: Capabilities,
    /// Mirrors what the engine last pushed through the item's capabilities.
    pub focused: bool,
    pub highlight: Option<HighlightRange>,
}

impl Slot {
    pub fn new(entry: Entry) -> Self {
        let Entry { id, mut item } = entry;
        let caps = Capabilities::detect(item.as_mut());
        Self { item, id, caps, focused: false, highlight: None }
    }

    pub fn measure(&self, width: u16) -> usize {
        if width == 0 {
            return 0;
        }
        usize::from(self.item.height(width))
    }

    /// Draw the item at `width` with the highlight overlay applied.
    pub fn rasterize(&self, width: u16, highlight_style: Style) -> Vec<Row> {
        let height = self.measure(width);
        let mut rows = draw_rows(self.item.as_ref(), width, height);
        if let Some(range) = self.highlight {
            apply_highlight(&mut rows, range, usize::from(width), highlight_style);
        }
        rows
    }

    /// Plain rows without any highlight overlay, for text extraction.
    pub fn plain_rows(&self, width: u16) -> Vec<Row> {
        draw_rows(self.item.as_ref(), width, self.measure(width))
    }

    pub fn set_focused(&mut self, focused: bool) -> bool {
        if !self.caps.focusable || self.focused == focused {
            return false;
        }
        if let Some(target) = self.item.focusable_mut() {
            target.set_focused(focused);
        }
        self.focused = focused;
        true
    }

    /// Record the highlight the engine overlays on this item. Only items
    /// with the capability are told about it.
    pub fn set_highlight(&mut self, range: Option<HighlightRange>) -> bool {
        if self.highlight == range {
            return false;
        }
        if self.caps.highlightable
            && let Some(target) = self.item.highlightable_mut()
        {
            target.set_highlight(range);
        }
        self.highlight = range;
        true
    }
}

fn draw_rows(item: &dyn Item, width: u16, height: usize) -> Vec<Row> {
    if width == 0 || height == 0 {
        return vec![Vec::new(); height];
    }
    let area = Rect {
        x: 0,
        y: 0,
        width,
        height: u16::try_from(height).unwrap_or(u16::MAX),
    };
    let mut scratch = Buffer::empty(area);
    item.draw(area, &mut scratch);
    scratch.content.chunks(usize::from(width)).map(<[Cell]>::to_vec).collect()
}

fn apply_highlight(rows: &mut [Row], range: HighlightRange, width: usize, style: Style) {
    for (line, row) in rows.iter_mut().enumerate() {
        let Some((start, end)) = range.columns_on(line, width) else {
            continue;
        };
        for cell in row.iter_mut().take(end).skip(start) {
            cell.set_style(style);
        }
    }
}

pub(crate) fn blank_rows(width: u16, count: usize) -> Vec<Row> {
    vec![vec![Cell::default(); usize::from(width)]; count]
}

/// Copy `row` into `buf` at `(x, y)`, clipped to `max_width` cells.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn blit_row(row: &[Cell], buf: &mut Buffer, x: u16, y: u16, max_width: u16) {
    for (col, cell) in row.iter().take(usize::from(max_width)).enumerate() {
        if let Some(target) = buf.cell_mut((x.saturating_add(col as u16), y)) {
            *target = cell.clone();
        }
    }
}

/// Plain text of the cells in `[start, end)` with trailing blanks trimmed.
pub(crate) fn row_text(row: &[Cell], start: usize, end: usize) -> String {
    let end = end.min(row.len());
    if start >= end {
        return String::new();
    }
    let mut text = String::new();
    let mut covered = 0usize;
    for cell in &row[start..end] {
        // Cells hidden behind a wide glyph.
        if covered > 0 {
            covered -= 1;
            continue;
        }
        let symbol = cell.symbol();
        text.push_str(symbol);
        covered = UnicodeWidthStr::width(symbol).saturating_sub(1);
    }
    text.trim_end().to_owned()
}
