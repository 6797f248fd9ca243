use chat_viewport::{
    Clickable, Entry, Focusable, HighlightRange, Highlightable, Item, MouseButton, TextItem, Viewport,
};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use std::cell::Cell;
use std::rc::Rc;

/// Fixed-height item drawing `"{label}.{line}"` on each of its lines.
pub struct Fixed {
    pub label: String,
    pub lines: u16,
}

impl Item for Fixed {
    fn height(&self, _width: u16) -> u16 {
        self.lines
    }

    fn draw(&self, area: Rect, buf: &mut Buffer) {
        for line in 0..area.height {
            buf.set_string(area.x, area.y + line, format!("{}.{line}", self.label), Style::default());
        }
    }
}

pub fn fixed(label: impl Into<String>, lines: u16) -> Entry {
    Entry::from(Fixed { label: label.into(), lines })
}

/// Focusable item whose focus flag is observable from outside the engine.
pub struct FocusFlag {
    pub label: String,
    pub focused: Rc<Cell<bool>>,
}

impl Item for FocusFlag {
    fn height(&self, _width: u16) -> u16 {
        1
    }

    fn draw(&self, area: Rect, buf: &mut Buffer) {
        let marker = if self.focused.get() { "*" } else { "" };
        buf.set_string(area.x, area.y, format!("{}{marker}", self.label), Style::default());
    }

    fn focusable_mut(&mut self) -> Option<&mut dyn Focusable> {
        Some(self)
    }
}

impl Focusable for FocusFlag {
    fn set_focused(&mut self, focused: bool) {
        self.focused.set(focused);
    }

    fn is_focused(&self) -> bool {
        self.focused.get()
    }
}

pub fn focus_items(count: usize) -> (Vec<Entry>, Vec<Rc<Cell<bool>>>) {
    let flags: Vec<_> = (0..count).map(|_| Rc::new(Cell::new(false))).collect();
    let entries = flags
        .iter()
        .enumerate()
        .map(|(i, flag)| Entry::from(FocusFlag { label: format!("p{i}"), focused: Rc::clone(flag) }))
        .collect();
    (entries, flags)
}

/// Item whose height is owned by the test, for out-of-band changes.
pub struct Shared {
    pub label: String,
    pub lines: Rc<Cell<u16>>,
}

impl Item for Shared {
    fn height(&self, _width: u16) -> u16 {
        self.lines.get()
    }

    fn draw(&self, area: Rect, buf: &mut Buffer) {
        for line in 0..area.height {
            buf.set_string(area.x, area.y + line, format!("{}.{line}", self.label), Style::default());
        }
    }
}

pub fn shared(label: &str, lines: u16) -> (Entry, Rc<Cell<u16>>) {
    let lines = Rc::new(Cell::new(lines));
    (Entry::from(Shared { label: label.to_owned(), lines: Rc::clone(&lines) }), lines)
}

/// Panel that folds to its title line on a right click of the title.
pub struct Panel {
    pub title: String,
    pub body: u16,
    pub collapsed: bool,
}

impl Item for Panel {
    fn height(&self, _width: u16) -> u16 {
        if self.collapsed { 1 } else { 1 + self.body }
    }

    fn draw(&self, area: Rect, buf: &mut Buffer) {
        let marker = if self.collapsed { "+" } else { "-" };
        buf.set_string(area.x, area.y, format!("{marker}{}", self.title), Style::default());
        for line in 1..area.height {
            buf.set_string(area.x, area.y + line, format!(" body{line}"), Style::default());
        }
    }

    fn clickable_mut(&mut self) -> Option<&mut dyn Clickable> {
        Some(self)
    }
}

impl Clickable for Panel {
    fn handle_click(&mut self, button: MouseButton, _x: u16, y: u16) -> bool {
        if button != MouseButton::Right || y != 0 {
            return false;
        }
        self.collapsed = !self.collapsed;
        true
    }
}

pub fn panel(title: &str, body: u16) -> Entry {
    Entry::from(Panel { title: title.to_owned(), body, collapsed: false })
}

/// Two-line highlightable item: `"{label} first"` / `"{label} second"`.
pub struct TwoLine {
    pub label: String,
    pub highlight: Option<HighlightRange>,
}

impl Item for TwoLine {
    fn height(&self, _width: u16) -> u16 {
        2
    }

    fn draw(&self, area: Rect, buf: &mut Buffer) {
        buf.set_string(area.x, area.y, format!("{} first", self.label), Style::default());
        if area.height > 1 {
            buf.set_string(area.x, area.y + 1, format!("{} second", self.label), Style::default());
        }
    }

    fn highlightable_mut(&mut self) -> Option<&mut dyn Highlightable> {
        Some(self)
    }
}

impl Highlightable for TwoLine {
    fn set_highlight(&mut self, range: Option<HighlightRange>) {
        self.highlight = range;
    }

    fn highlight(&self) -> Option<HighlightRange> {
        self.highlight
    }
}

pub fn two_line(label: &str) -> Entry {
    Entry::from(TwoLine { label: label.to_owned(), highlight: None })
}

pub fn text(body: &str) -> Entry {
    Entry::from(TextItem::new(body.to_owned()))
}

pub fn sized(mut viewport: Viewport, width: u16, height: u16) -> Viewport {
    viewport.set_size(width, height);
    viewport
}
