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

//! Renderable item contract consumed by the viewport engine.
//!
//! An item only has to report its height for a width and draw itself into a
//! region. Focus, highlight and click handling are optional capabilities,
//! exposed through accessor methods that return `None` by default. The
//! engine detects them once when the item is added.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Widget, Wrap};

/// Highlighted region inside a single item, in item-relative cell
/// coordinates. `end_col` is exclusive on `end_line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightRange {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl HighlightRange {
    /// Column span covered on `line`, or `None` when the line is outside the range.
    #[must_use]
    pub fn columns_on(&self, line: usize, width: usize) -> Option<(usize, usize)> {
        if line < self.start_line || line > self.end_line {
            return None;
        }
        let start = if line == self.start_line { self.start_col.min(width) } else { 0 };
        let end = if line == self.end_line { self.end_col.min(width) } else { width };
        (start < end).then_some((start, end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

pub trait Focusable {
    fn set_focused(&mut self, focused: bool);
    fn is_focused(&self) -> bool;
}

pub trait Highlightable {
    fn set_highlight(&mut self, range: Option<HighlightRange>);
    fn highlight(&self) -> Option<HighlightRange>;
}

pub trait Clickable {
    /// Handle a click at item-relative `(x, y)`. Returns true when the item
    /// consumed the click (and may have changed its content).
    fn handle_click(&mut self, button: MouseButton, x: u16, y: u16) -> bool;
}

pub trait Item {
    /// Rendered height at `width`. Must be stable for a given width until the
    /// item's content changes.
    fn height(&self, width: u16) -> u16;

    /// Draw into `area`. Anything outside `area` is discarded by the engine.
    fn draw(&self, area: Rect, buf: &mut Buffer);

    fn focusable_mut(&mut self) -> Option<&mut dyn Focusable> {
        None
    }

    fn highlightable_mut(&mut self) -> Option<&mut dyn Highlightable> {
        None
    }

    fn clickable_mut(&mut self) -> Option<&mut dyn Clickable> {
        None
    }
}

/// Capability set resolved once when an item enters the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Capabilities {
    pub focusable: bool,
    pub highlightable: bool,
    pub clickable: bool,
}

impl Capabilities {
    pub fn detect(item: &mut dyn Item) -> Self {
        Self {
            focusable: item.focusable_mut().is_some(),
            highlightable: item.highlightable_mut().is_some(),
            clickable: item.clickable_mut().is_some(),
        }
    }
}

/// An item plus the optional caller-assigned ID used for mutation by reference.
pub struct Entry {
    pub(crate) id: Option<String>,
    pub(crate) item: Box<dyn Item>,
}

impl Entry {
    pub fn boxed(item: Box<dyn Item>) -> Self {
        Self { id: None, item }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl<I: Item + 'static> From<I> for Entry {
    fn from(item: I) -> Self {
        Self { id: None, item: Box::new(item) }
    }
}

/// Address of an item for update/delete/select calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRef<'a> {
    Index(usize),
    Id(&'a str),
}

impl From<usize> for ItemRef<'_> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl<'a> From<&'a str> for ItemRef<'a> {
    fn from(id: &'a str) -> Self {
        Self::Id(id)
    }
}

/// Pre-rendered text block, wrapped to the viewport width.
pub struct TextItem {
    text: Text<'static>,
    focus_style: Option<Style>,
    focused: bool,
    highlight: Option<HighlightRange>,
}

impl TextItem {
    pub fn new(text: impl Into<Text<'static>>) -> Self {
        Self { text: text.into(), focus_style: None, focused: false, highlight: None }
    }

    /// Make the item focusable; `style` is patched over the text while focused.
    #[must_use]
    pub fn focusable(mut self, style: Style) -> Self {
        self.focus_style = Some(style);
        self
    }

    #[must_use]
    pub fn text(&self) -> &Text<'static> {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<Text<'static>>) {
        self.text = text.into();
    }

    /// Append streamed text. `\n` starts a new line.
    pub fn push_str(&mut self, chunk: &str) {
        let mut segments = chunk.split('\n');
        if let Some(first) = segments.next()
            && !first.is_empty()
        {
            match self.text.lines.last_mut() {
                Some(line) => line.spans.push(Span::raw(first.to_owned())),
                None => self.text.lines.push(Line::from(first.to_owned())),
            }
        }
        for segment in segments {
            self.text.lines.push(Line::from(segment.to_owned()));
        }
    }

    fn paragraph(&self) -> Paragraph<'_> {
        let mut paragraph = Paragraph::new(self.text.clone()).wrap(Wrap { trim: false });
        if self.focused
            && let Some(style) = self.focus_style
        {
            paragraph = paragraph.style(style);
        }
        paragraph
    }
}

impl Item for TextItem {
    fn height(&self, width: u16) -> u16 {
        if width == 0 {
            return 0;
        }
        u16::try_from(self.paragraph().line_count(width)).unwrap_or(u16::MAX)
    }

    fn draw(&self, area: Rect, buf: &mut Buffer) {
        self.paragraph().render(area, buf);
    }

    fn focusable_mut(&mut self) -> Option<&mut dyn Focusable> {
        if self.focus_style.is_some() { Some(self) } else { None }
    }

    fn highlightable_mut(&mut self) -> Option<&mut dyn Highlightable> {
        Some(self)
    }
}

impl Focusable for TextItem {
    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }
}

impl Highlightable for TextItem {
    fn set_highlight(&mut self, range: Option<HighlightRange>) {
        self.highlight = range;
    }

    fn highlight(&self) -> Option<HighlightRange> {
        self.highlight
    }
}
