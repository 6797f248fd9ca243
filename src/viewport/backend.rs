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

use super::position::PositionIndex;
use super::surface::Slot;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

/// Visible line window into the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Window {
    pub offset: usize,
    pub height: usize,
}

/// Rendering strategy behind the [`Viewport`](super::Viewport) facade.
///
/// The facade owns the slots and forwards every structural change here
/// after applying it to the slot list, so `slots` always reflects the new
/// state when a hook runs.
pub(crate) trait RenderBackend {
    fn positions(&self) -> &PositionIndex;

    fn set_width(&mut self, slots: &[Slot], width: u16);

    /// The slot list was replaced wholesale.
    fn reset(&mut self, slots: &[Slot]);

    fn inserted(&mut self, slots: &[Slot], index: usize);

    fn removed(&mut self, index: usize);

    /// Content, focus or highlight of `index` changed.
    fn invalidate(&mut self, slots: &[Slot], index: usize);

    /// Replace an estimated height with a real measurement. No-op for
    /// backends that always measure eagerly.
    fn ensure_measured(&mut self, slots: &[Slot], index: usize);

    /// Bring render state up to date for `window`. Returns the scroll offset
    /// to use, which differs from `window.offset` only when height
    /// corrections above the visible content were absorbed.
    fn prepare(&mut self, slots: &[Slot], window: Window) -> usize;

    /// Copy the window into `buf`. Must follow [`RenderBackend::prepare`].
    fn draw(&self, window: Window, area: Rect, buf: &mut Buffer);
}
