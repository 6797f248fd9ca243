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

//! Selected index and focus propagation.
//!
//! While the list is focused exactly the selected item (if focusable) holds
//! focus. Every transition blurs before it focuses, inside one call, so no
//! caller ever observes two focused items.

use super::surface::Slot;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SelectionState {
    selected: Option<usize>,
    focused: bool,
}

impl SelectionState {
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Move the selection. Returns the indices whose focus state changed.
    pub fn select(&mut self, slots: &mut [Slot], index: Option<usize>) -> Vec<usize> {
        let index = index.filter(|i| *i < slots.len());
        if index == self.selected {
            return Vec::new();
        }
        let mut touched = Vec::with_capacity(2);
        if self.focused {
            if let Some(old) = self.selected
                && slots.get_mut(old).is_some_and(|slot| slot.set_focused(false))
            {
                touched.push(old);
            }
            if let Some(new) = index
                && slots.get_mut(new).is_some_and(|slot| slot.set_focused(true))
            {
                touched.push(new);
            }
        }
        self.selected = index;
        touched
    }

    pub fn focus(&mut self, slots: &mut [Slot]) -> Vec<usize> {
        self.focused = true;
        self.set_selected_focus(slots, true)
    }

    pub fn blur(&mut self, slots: &mut [Slot]) -> Vec<usize> {
        self.focused = false;
        self.set_selected_focus(slots, false)
    }

    fn set_selected_focus(&self, slots: &mut [Slot], focused: bool) -> Vec<usize> {
        match self.selected {
            Some(i) if slots.get_mut(i).is_some_and(|slot| slot.set_focused(focused)) => vec![i],
            _ => Vec::new(),
        }
    }

    fn eligible(&self, slot: &Slot) -> bool {
        !self.focused || slot.caps.focusable
    }

    pub fn next_index(&self, slots: &[Slot], wrap: bool) -> Option<usize> {
        let start = self.selected.map_or(0, |s| s + 1);
        let forward = (start..slots.len()).find(|i| self.eligible(&slots[*i]));
        if forward.is_some() || !wrap {
            return forward;
        }
        (0..start.min(slots.len())).find(|i| self.eligible(&slots[*i]))
    }

    pub fn prev_index(&self, slots: &[Slot], wrap: bool) -> Option<usize> {
        let end = self.selected.unwrap_or(slots.len()).min(slots.len());
        let backward = (0..end).rev().find(|i| self.eligible(&slots[*i]));
        if backward.is_some() || !wrap {
            return backward;
        }
        (end..slots.len()).rev().find(|i| self.eligible(&slots[*i]))
    }

    pub fn first_index(&self, slots: &[Slot]) -> Option<usize> {
        (0..slots.len()).find(|i| self.eligible(&slots[*i]))
    }

    pub fn last_index(&self, slots: &[Slot]) -> Option<usize> {
        (0..slots.len()).rev().find(|i| self.eligible(&slots[*i]))
    }

    pub fn on_inserted(&mut self, index: usize) {
        if let Some(selected) = self.selected.as_mut()
            && *selected >= index
        {
            *selected += 1;
        }
    }

    /// The slot at `index` is gone. When it was the selection, the item
    /// that slid into its place (or the new last item) takes over.
    pub fn on_removed(&mut self, slots: &mut [Slot], index: usize) -> Vec<usize> {
        let Some(selected) = self.selected else {
            return Vec::new();
        };
        if selected > index {
            self.selected = Some(selected - 1);
            return Vec::new();
        }
        if selected < index {
            return Vec::new();
        }
        if slots.is_empty() {
            self.selected = None;
            return Vec::new();
        }
        let replacement = index.min(slots.len() - 1);
        self.selected = Some(replacement);
        if self.focused && slots[replacement].set_focused(true) {
            return vec![replacement];
        }
        Vec::new()
    }

    /// The selected slot was replaced by a new item.
    pub fn on_replaced(&self, slots: &mut [Slot], index: usize) -> bool {
        self.focused
            && self.selected == Some(index)
            && slots.get_mut(index).is_some_and(|slot| slot.set_focused(true))
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}
