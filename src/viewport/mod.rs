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

//! Virtual-scrolling viewport over a stack of variable-height items.
//!
//! [`Viewport`] owns the items and is driven from a single thread: the host
//! event loop calls mutation, scroll, selection and mouse methods, then
//! renders once per frame. Rendering is delegated to one of two backends
//! chosen at construction time:
//!
//! - [`Strategy::Composited`] keeps one surface holding every item and
//!   copies a window out of it. Best when the whole history fits in memory.
//! - [`Strategy::Lazy`] measures and rasterizes only what is near the
//!   window, starting everything else from a height estimate. Memory stays
//!   bounded by the overscan margin, so long sessions should use it.
//!
//! Bad indices and stale IDs are ignored rather than reported.

mod backend;
mod compositor;
mod dirty;
mod highlight;
mod lazy;
mod position;
mod scroll;
mod selection;
mod surface;

pub use position::Extent;

use crate::item::{Entry, Item, ItemRef, MouseButton};
use backend::{RenderBackend, Window};
use compositor::Compositor;
use highlight::{ContentPoint, HighlightState};
use lazy::LazyRenderer;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;
use scroll::ScrollState;
use selection::SelectionState;
use std::ops::Range;
use surface::{Slot, row_text};

pub const DEFAULT_OVERSCAN: usize = 3;
pub const DEFAULT_ESTIMATED_HEIGHT: u16 = 3;

/// Lazy `prepare` may shift the offset, which can need one more pass after clamping.
const MAX_PREPARE_PASSES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Composited,
    Lazy { overscan: usize, estimated_height: u16 },
}

impl Strategy {
    #[must_use]
    pub const fn lazy() -> Self {
        Self::Lazy { overscan: DEFAULT_OVERSCAN, estimated_height: DEFAULT_ESTIMATED_HEIGHT }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportConfig {
    /// Blank lines between adjacent items.
    pub gap: u16,
    pub strategy: Strategy,
    pub highlight_style: Style,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            gap: 0,
            strategy: Strategy::Composited,
            highlight_style: Style::default().add_modifier(Modifier::REVERSED),
        }
    }
}

pub struct Viewport {
    slots: Vec<Slot>,
    backend: Box<dyn RenderBackend>,
    scroll: ScrollState,
    selection: SelectionState,
    highlight: HighlightState,
}

impl Viewport {
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Entry>,
    {
        Self::with_config(ViewportConfig::default(), items)
    }

    pub fn with_config<I>(config: ViewportConfig, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Entry>,
    {
        let backend: Box<dyn RenderBackend> = match config.strategy {
            Strategy::Composited => Box::new(Compositor::new(config.gap, config.highlight_style)),
            Strategy::Lazy { overscan, estimated_height } => Box::new(LazyRenderer::new(
                config.gap,
                overscan,
                estimated_height,
                config.highlight_style,
            )),
        };
        let mut viewport = Self {
            slots: Vec::new(),
            backend,
            scroll: ScrollState::default(),
            selection: SelectionState::default(),
            highlight: HighlightState::default(),
        };
        viewport.set_items(items);
        viewport
    }

    // -- sizing -------------------------------------------------------------

    pub fn set_size(&mut self, width: u16, height: u16) {
        if width != self.scroll.width {
            tracing::debug!(from = self.scroll.width, to = width, "viewport width changed");
            self.scroll.width = width;
            self.backend.set_width(&self.slots, width);
        }
        self.scroll.height = height;
        self.clamp();
    }

    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        (self.scroll.width, self.scroll.height)
    }

    // -- items --------------------------------------------------------------

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn item<'a>(&self, item: impl Into<ItemRef<'a>>) -> Option<&dyn Item> {
        let index = self.resolve(item.into())?;
        Some(self.slots[index].item.as_ref())
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.resolve(ItemRef::Id(id))
    }

    pub fn item_extent<'a>(&self, item: impl Into<ItemRef<'a>>) -> Option<Extent> {
        let index = self.resolve(item.into())?;
        self.backend.positions().extent(index)
    }

    /// Items intersecting the current window.
    #[must_use]
    pub fn visible_range(&self) -> Range<usize> {
        self.backend
            .positions()
            .items_in_window(self.scroll.offset, usize::from(self.scroll.height))
    }

    pub fn set_items<I>(&mut self, items: I)
    where
        I: IntoIterator,
        I::Item: Into<Entry>,
    {
        self.highlight.clear(&mut self.slots);
        self.slots = items.into_iter().map(|entry| Slot::new(entry.into())).collect();
        self.selection.clear();
        self.backend.reset(&self.slots);
        self.clamp();
        tracing::debug!(items = self.slots.len(), "viewport items replaced");
    }

    pub fn append_item(&mut self, entry: impl Into<Entry>) {
        self.insert_item(self.slots.len(), entry);
    }

    pub fn prepend_item(&mut self, entry: impl Into<Entry>) {
        self.insert_item(0, entry);
    }

    /// Insert before `index` (clamped to the end).
    pub fn insert_item(&mut self, index: usize, entry: impl Into<Entry>) {
        let index = index.min(self.slots.len());
        if index < self.slots.len() {
            let touched = self.highlight.clear(&mut self.slots);
            self.invalidate(touched);
        }
        self.slots.insert(index, Slot::new(entry.into()));
        self.selection.on_inserted(index);
        self.backend.inserted(&self.slots, index);
        self.clamp();
    }

    /// Replace an item. The new item inherits the old ID unless it has its own.
    pub fn update_item<'a>(&mut self, item: impl Into<ItemRef<'a>>, entry: impl Into<Entry>) -> bool {
        let Some(index) = self.resolve(item.into()) else {
            return false;
        };
        let mut slot = Slot::new(entry.into());
        if slot.id.is_none() {
            slot.id = self.slots[index].id.take();
        }
        self.slots[index] = slot;
        self.selection.on_replaced(&mut self.slots, index);
        self.backend.invalidate(&self.slots, index);
        self.clamp();
        true
    }

    /// Re-measure and redraw an item whose content changed behind the
    /// engine's back (e.g. shared state updated by a producer).
    pub fn invalidate_item<'a>(&mut self, item: impl Into<ItemRef<'a>>) -> bool {
        let Some(index) = self.resolve(item.into()) else {
            return false;
        };
        self.backend.invalidate(&self.slots, index);
        self.clamp();
        true
    }

    pub fn delete_item<'a>(&mut self, item: impl Into<ItemRef<'a>>) -> bool {
        let Some(index) = self.resolve(item.into()) else {
            return false;
        };
        let touched = self.highlight.clear(&mut self.slots);
        self.invalidate(touched);
        self.slots.remove(index);
        self.backend.removed(index);
        let touched = self.selection.on_removed(&mut self.slots, index);
        self.invalidate(touched);
        self.clamp();
        true
    }

    // -- selection & focus --------------------------------------------------

    pub fn set_selected<'a>(&mut self, item: impl Into<ItemRef<'a>>) -> bool {
        let Some(index) = self.resolve(item.into()) else {
            return false;
        };
        self.select(Some(index));
        true
    }

    pub fn clear_selection(&mut self) {
        self.select(None);
    }

    pub fn select_next(&mut self, wrap: bool) -> bool {
        let next = self.selection.next_index(&self.slots, wrap);
        self.select_if_changed(next)
    }

    pub fn select_prev(&mut self, wrap: bool) -> bool {
        let prev = self.selection.prev_index(&self.slots, wrap);
        self.select_if_changed(prev)
    }

    pub fn select_first(&mut self) -> bool {
        let first = self.selection.first_index(&self.slots);
        self.select_if_changed(first)
    }

    pub fn select_last(&mut self) -> bool {
        let last = self.selection.last_index(&self.slots);
        self.select_if_changed(last)
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selection.selected()
    }

    pub fn selected_item(&self) -> Option<&dyn Item> {
        let index = self.selection.selected()?;
        self.slots.get(index).map(|slot| slot.item.as_ref())
    }

    pub fn focus(&mut self) {
        let touched = self.selection.focus(&mut self.slots);
        self.invalidate(touched);
        self.clamp();
    }

    pub fn blur(&mut self) {
        let touched = self.selection.blur(&mut self.slots);
        self.invalidate(touched);
        self.clamp();
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.selection.is_focused()
    }

    /// Whether the engine last told the item at `index` that it has focus.
    #[must_use]
    pub fn is_item_focused(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|slot| slot.focused)
    }

    fn select(&mut self, index: Option<usize>) {
        let touched = self.selection.select(&mut self.slots, index);
        self.invalidate(touched);
        self.clamp();
    }

    fn select_if_changed(&mut self, index: Option<usize>) -> bool {
        match index {
            Some(i) if Some(i) != self.selection.selected() => {
                self.select(Some(i));
                true
            }
            _ => false,
        }
    }

    // -- scrolling ----------------------------------------------------------

    pub fn scroll_by(&mut self, delta: isize) {
        let total = self.total();
        self.scroll.scroll_by(delta, total);
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-page_delta(self.scroll.height));
    }

    pub fn page_down(&mut self) {
        self.scroll_by(page_delta(self.scroll.height));
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll.to_top();
        self.clamp();
    }

    pub fn scroll_to_bottom(&mut self) {
        self.measure_tail();
        let total = self.total();
        self.scroll.to_bottom(total);
    }

    pub fn scroll_to_item<'a>(&mut self, item: impl Into<ItemRef<'a>>) -> bool {
        let Some(index) = self.resolve(item.into()) else {
            return false;
        };
        self.backend.ensure_measured(&self.slots, index);
        let Some(extent) = self.backend.positions().extent(index) else {
            return false;
        };
        let total = self.total();
        self.scroll.reveal(extent, total);
        true
    }

    pub fn scroll_to_selected(&mut self) -> bool {
        match self.selection.selected() {
            Some(index) => self.scroll_to_item(index),
            None => false,
        }
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.scroll.offset
    }

    /// Content height including gaps. Under [`Strategy::Lazy`] items not yet
    /// measured contribute their estimate.
    #[must_use]
    pub fn total_height(&self) -> usize {
        self.total()
    }

    #[must_use]
    pub fn at_top(&self) -> bool {
        self.scroll.at_top()
    }

    #[must_use]
    pub fn at_bottom(&self) -> bool {
        self.scroll.at_bottom(self.total())
    }

    fn measure_tail(&mut self) {
        let wanted = usize::from(self.scroll.height);
        let gap = self.backend.positions().gap();
        let mut covered = 0usize;
        for index in (0..self.slots.len()).rev() {
            if covered >= wanted {
                break;
            }
            self.backend.ensure_measured(&self.slots, index);
            covered += self.backend.positions().extent(index).map_or(0, |e| e.height) + gap;
        }
    }

    // -- rendering ----------------------------------------------------------

    /// Draw the current window into `area`, adopting its size.
    pub fn render_into(&mut self, area: Rect, buf: &mut Buffer) {
        if (area.width, area.height) != self.size() {
            self.set_size(area.width, area.height);
        }
        let window = self.prepare();
        self.backend.draw(window, area, buf);
    }

    /// The current window as plain text, one line per visible content row.
    pub fn render(&mut self) -> String {
        let (width, height) = self.size();
        let area = Rect { x: 0, y: 0, width, height };
        let mut buf = Buffer::empty(area);
        self.render_into(area, &mut buf);
        let rows = self.total().saturating_sub(self.scroll.offset).min(usize::from(height));
        let width = usize::from(width);
        if width == 0 {
            return vec![String::new(); rows].join("\n");
        }
        buf.content
            .chunks(width)
            .take(rows)
            .map(|row| row_text(row, 0, width))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn prepare(&mut self) -> Window {
        let _t = crate::perf::start("viewport::prepare");
        let height = usize::from(self.scroll.height);
        for _ in 0..MAX_PREPARE_PASSES {
            let requested = self.scroll.offset;
            let settled = self.backend.prepare(&self.slots, Window { offset: requested, height });
            self.scroll.offset = settled;
            self.clamp();
            if self.scroll.offset == requested {
                break;
            }
        }
        Window { offset: self.scroll.offset, height }
    }

    // -- mouse --------------------------------------------------------------

    /// Start a highlight at viewport-relative `(x, y)` and select the item under it.
    pub fn handle_mouse_down(&mut self, x: u16, y: u16) -> bool {
        if x >= self.scroll.width || y >= self.scroll.height {
            return false;
        }
        let Some(point) = self.point_at(x, y) else {
            return false;
        };
        let mut touched = self.highlight.clear(&mut self.slots);
        self.highlight.press(point);
        touched.extend(self.selection.select(&mut self.slots, Some(point.item)));
        self.invalidate(touched);
        self.clamp();
        true
    }

    pub fn handle_mouse_drag(&mut self, x: u16, y: u16) -> bool {
        if !self.highlight.is_tracking() {
            return false;
        }
        let Some(point) = self.point_at(x, y) else {
            return false;
        };
        self.highlight.drag_to(point);
        let touched = self.highlight.apply(&mut self.slots);
        self.invalidate(touched);
        true
    }

    pub fn handle_mouse_up(&mut self, x: u16, y: u16) -> bool {
        if !self.highlight.is_tracking() {
            return false;
        }
        let Some(point) = self.point_at(x, y) else {
            self.highlight.finish();
            return false;
        };
        self.highlight.release(point);
        let touched = self.highlight.apply(&mut self.slots);
        self.invalidate(touched);
        true
    }

    pub fn clear_highlight(&mut self) {
        let touched = self.highlight.clear(&mut self.slots);
        self.invalidate(touched);
    }

    #[must_use]
    pub fn highlighted_text(&self) -> String {
        self.highlight
            .applied()
            .map(|items| highlight::extract_text(&self.slots, items, self.scroll.width))
            .unwrap_or_default()
    }

    /// Forward a click to the clickable item under `(x, y)`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn handle_mouse_click(&mut self, button: MouseButton, x: u16, y: u16) -> bool {
        if x >= self.scroll.width || y >= self.scroll.height {
            return false;
        }
        let positions = self.backend.positions();
        let line = self.scroll.offset + usize::from(y);
        let Some(index) = positions.item_at_line(line) else {
            return false;
        };
        let Some(extent) = positions.extent(index) else {
            return false;
        };
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if line >= extent.end() || !slot.caps.clickable {
            return false;
        }
        let item_y = (line - extent.start) as u16;
        let handled = slot
            .item
            .clickable_mut()
            .is_some_and(|target| target.handle_click(button, x, item_y));
        if handled {
            self.backend.invalidate(&self.slots, index);
            self.clamp();
        }
        handled
    }

    /// Map a viewport cell to content space. Rows below the content and gap
    /// rows resolve to the end of the item above them.
    fn point_at(&self, x: u16, y: u16) -> Option<ContentPoint> {
        let positions = self.backend.positions();
        let total = positions.total_height();
        if total == 0 {
            return None;
        }
        let line = (self.scroll.offset + usize::from(y)).min(total - 1);
        let item = positions.item_at_line(line)?;
        let extent = positions.extent(item)?;
        if line >= extent.end() {
            return Some(ContentPoint {
                item,
                line: extent.height.saturating_sub(1),
                col: usize::MAX,
            });
        }
        Some(ContentPoint {
            item,
            line: line - extent.start,
            col: usize::from(x.min(self.scroll.width)),
        })
    }

    // -- internals ----------------------------------------------------------

    fn total(&self) -> usize {
        self.backend.positions().total_height()
    }

    fn clamp(&mut self) {
        let total = self.total();
        self.scroll.clamp(total);
    }

    fn resolve(&self, item: ItemRef<'_>) -> Option<usize> {
        match item {
            ItemRef::Index(index) => (index < self.slots.len()).then_some(index),
            ItemRef::Id(id) => self.slots.iter().position(|slot| slot.id.as_deref() == Some(id)),
        }
    }

    fn invalidate(&mut self, indices: Vec<usize>) {
        for index in indices {
            self.backend.invalidate(&self.slots, index);
        }
    }
}

impl Widget for &mut Viewport {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_into(area, buf);
    }
}

fn page_delta(height: u16) -> isize {
    isize::try_from(usize::from(height.max(1))).unwrap_or(isize::MAX)
}
