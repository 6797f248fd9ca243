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

use std::collections::BTreeSet;

/// Work owed to the composited surface before the next read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Pending {
    Clean,
    /// Redraw these items in place; their heights were unchanged when marked.
    Items(Vec<usize>),
    Full,
}

#[derive(Debug, Default)]
pub(crate) struct DirtyTracker {
    items: BTreeSet<usize>,
    full: bool,
}

impl DirtyTracker {
    pub fn mark(&mut self, index: usize) {
        if !self.full {
            self.items.insert(index);
        }
    }

    pub fn mark_full(&mut self) {
        self.full = true;
        self.items.clear();
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    #[cfg(test)]
    pub fn is_clean(&self) -> bool {
        !self.full && self.items.is_empty()
    }

    /// An item was inserted at `index`: later dirty indices move down by one.
    pub fn shift_for_insert(&mut self, index: usize) {
        if self.full || self.items.range(index..).next().is_none() {
            return;
        }
        let moved: Vec<usize> = self.items.split_off(&index).into_iter().map(|i| i + 1).collect();
        self.items.extend(moved);
    }

    /// The item at `index` was removed: drop it and move later indices up.
    pub fn shift_for_remove(&mut self, index: usize) {
        if self.full {
            return;
        }
        let tail = self.items.split_off(&index);
        self.items.extend(tail.into_iter().filter(|i| *i != index).map(|i| i - 1));
    }

    pub fn take(&mut self) -> Pending {
        if std::mem::take(&mut self.full) {
            self.items.clear();
            return Pending::Full;
        }
        if self.items.is_empty() {
            return Pending::Clean;
        }
        Pending::Items(std::mem::take(&mut self.items).into_iter().collect())
    }
}
