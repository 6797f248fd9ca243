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

use ratatui::style::{Color, Modifier, Style};

// Accent
pub const RUST_ORANGE: Color = Color::Rgb(244, 118, 0);

// UI chrome
pub const DIM: Color = Color::DarkGray;
pub const SEPARATOR_CHAR: &str = "─";

// Role header colors
pub const ROLE_USER: Color = Color::White;
pub const ROLE_ASSISTANT: Color = RUST_ORANGE;

// Tool panels
pub const TOOL_TITLE: Color = Color::White;
pub const ICON_COLLAPSED: &str = "▸";
pub const ICON_EXPANDED: &str = "▾";

// Status line
pub const STATUS_FOLLOW: Color = Color::Green;
pub const STATUS_FOCUS: Color = Color::Cyan;
pub const STATUS_NOTICE: Color = Color::Yellow;

/// Overlay drawn over mouse-highlighted cells.
pub fn highlight_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

/// Applied to the focused item's text.
pub fn focus_style() -> Style {
    Style::default().fg(STATUS_FOCUS)
}
