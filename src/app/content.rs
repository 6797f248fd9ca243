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

//! Demo content producers: chat messages, collapsible tool panels and
//! blocks loaded from a file.

use crate::error::AppError;
use crate::item::{
    Clickable, Entry, Focusable, HighlightRange, Highlightable, Item, MouseButton, TextItem,
};
use crate::ui::theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Widget, Wrap};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

pub fn message_item(role: Role, body: &str) -> TextItem {
    let (label, color) = match role {
        Role::User => ("User", theme::ROLE_USER),
        Role::Assistant => ("Assistant", theme::ROLE_ASSISTANT),
    };
    let mut lines =
        vec![Line::from(Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)))];
    lines.extend(body.lines().map(|line| Line::from(line.to_owned())));
    TextItem::new(Text::from(lines)).focusable(theme::focus_style())
}

/// Tool call output that collapses to its title line. Right-click toggles.
pub struct ToolPanel {
    title: String,
    output: Vec<String>,
    collapsed: bool,
    focused: bool,
    highlight: Option<HighlightRange>,
}

impl ToolPanel {
    pub fn new(title: impl Into<String>, output: Vec<String>) -> Self {
        Self { title: title.into(), output, collapsed: false, focused: false, highlight: None }
    }

    #[must_use]
    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    fn text(&self) -> Text<'static> {
        let icon = if self.collapsed { theme::ICON_COLLAPSED } else { theme::ICON_EXPANDED };
        let title_style = if self.focused {
            theme::focus_style().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::TOOL_TITLE).add_modifier(Modifier::BOLD)
        };
        let mut lines = vec![Line::from(vec![
            Span::styled(format!("{icon} "), Style::default().fg(theme::DIM)),
            Span::styled(self.title.clone(), title_style),
        ])];
        if !self.collapsed {
            lines.extend(self.output.iter().map(|out| {
                Line::from(vec![
                    Span::styled("  │ ", Style::default().fg(theme::DIM)),
                    Span::raw(out.clone()),
                ])
            }));
        }
        Text::from(lines)
    }

    fn paragraph(&self) -> Paragraph<'static> {
        Paragraph::new(self.text()).wrap(Wrap { trim: false })
    }
}

impl Item for ToolPanel {
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
        Some(self)
    }

    fn highlightable_mut(&mut self) -> Option<&mut dyn Highlightable> {
        Some(self)
    }

    fn clickable_mut(&mut self) -> Option<&mut dyn Clickable> {
        Some(self)
    }
}

impl Focusable for ToolPanel {
    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }
}

impl Highlightable for ToolPanel {
    fn set_highlight(&mut self, range: Option<HighlightRange>) {
        self.highlight = range;
    }

    fn highlight(&self) -> Option<HighlightRange> {
        self.highlight
    }
}

impl Clickable for ToolPanel {
    fn handle_click(&mut self, button: MouseButton, _x: u16, y: u16) -> bool {
        if button != MouseButton::Right || y != 0 {
            return false;
        }
        self.collapsed = !self.collapsed;
        true
    }
}

const TOPICS: &[&str] = &[
    "the compositor cache",
    "scroll clamping after deletes",
    "wide glyph handling",
    "lazy measurement",
    "focus propagation",
];

/// Deterministic transcript of `count` items cycling user, assistant and tool output.
pub fn synthetic_transcript(count: usize) -> Vec<Entry> {
    (0..count)
        .map(|i| {
            let topic = TOPICS[i % TOPICS.len()];
            let entry: Entry = match i % 3 {
                0 => message_item(Role::User, &format!("Can you look into {topic}? (#{i})")).into(),
                1 => message_item(
                    Role::Assistant,
                    &format!(
                        "Sure. Looking at {topic} now.\nIt touches {} lines across the module, \
                         so I will read it first and summarise what changes.",
                        (i * 37) % 400 + 20
                    ),
                )
                .into(),
                _ => ToolPanel::new(
                    format!("Read src/{}.rs", topic.replace(' ', "_")),
                    (0..(i % 5) + 2).map(|l| format!("{:>4}  // line {l} of {topic}", l + 1)).collect(),
                )
                .collapsed(i % 2 == 0)
                .into(),
            };
            entry.with_id(format!("seed-{i}"))
        })
        .collect()
}

/// Blocks of a text file, separated by blank lines.
pub fn load_blocks(path: &Path) -> Result<Vec<Entry>, AppError> {
    let raw = std::fs::read_to_string(path).map_err(|e| AppError::ContentUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let blocks = split_blocks(&raw);
    if blocks.is_empty() {
        return Err(AppError::ContentEmpty(path.to_path_buf()));
    }
    Ok(blocks
        .into_iter()
        .enumerate()
        .map(|(i, block)| {
            Entry::from(TextItem::new(block).focusable(theme::focus_style()))
                .with_id(format!("file-{i}"))
        })
        .collect())
}

fn split_blocks(raw: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in raw.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }
    blocks
}
