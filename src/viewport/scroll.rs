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

use super::position::Extent;

/// Line offset plus viewport size.
///
/// Invariant after every call that takes `total`:
/// `0 <= offset <= max(0, total - height)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ScrollState {
    pub offset: usize,
    pub width: u16,
    pub height: u16,
}

impl ScrollState {
    pub fn max_offset(&self, total: usize) -> usize {
        total.saturating_sub(usize::from(self.height))
    }

    pub fn clamp(&mut self, total: usize) {
        self.offset = self.offset.min(self.max_offset(total));
    }

    pub fn scroll_by(&mut self, delta: isize, total: usize) {
        self.offset = self.offset.saturating_add_signed(delta);
        self.clamp(total);
    }

    pub fn to_top(&mut self) {
        self.offset = 0;
    }

    pub fn to_bottom(&mut self, total: usize) {
        self.offset = self.max_offset(total);
    }

    /// Move the minimum distance that brings `extent` fully into view: align
    /// its top when it is above the window, its bottom when it is below.
    /// Items taller than the viewport align to their top.
    pub fn reveal(&mut self, extent: Extent, total: usize) {
        let height = usize::from(self.height);
        let visible_end = self.offset + height;
        if extent.start >= self.offset && extent.end() <= visible_end {
            return;
        }
        if extent.start < self.offset || extent.height >= height {
            self.offset = extent.start;
        } else {
            self.offset = extent.end() - height;
        }
        self.clamp(total);
    }

    pub fn at_top(&self) -> bool {
        self.offset == 0
    }

    pub fn at_bottom(&self, total: usize) -> bool {
        self.offset >= self.max_offset(total)
    }
}
