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

mod header;
pub mod theme;

use crate::app::App;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn render(frame: &mut Frame, app: &mut App) {
    let _t = crate::perf::start("ui::render");
    let [header_area, top_sep, body, bottom_sep, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    header::render(frame, header_area, app);
    render_separator(frame, top_sep);

    {
        let _t = crate::perf::start_with("ui::viewport", "rows", usize::from(body.height));
        app.viewport_area = body;
        frame.render_widget(&mut app.viewport, body);
    }

    render_separator(frame, bottom_sep);
    render_footer(frame, footer_area, app);
}

const FOOTER_PAD: u16 = 2;
const FOOTER_COLUMN_GAP: u16 = 1;
const KEY_HINTS: &str = "j/k select  Tab focus  y copy  d delete  n stream  q quit";

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let padded = Rect {
        x: area.x + FOOTER_PAD,
        y: area.y,
        width: area.width.saturating_sub(FOOTER_PAD * 2),
        height: area.height,
    };
    let (left_area, right_area) = split_footer_columns(padded);
    frame.render_widget(Paragraph::new(status_line(app)), left_area);

    let (right_text, right_color) = match &app.notice {
        Some(notice) => (notice.as_str(), theme::STATUS_NOTICE),
        None => (KEY_HINTS, theme::DIM),
    };
    render_footer_right_info(frame, right_area, right_text, right_color);
}

fn status_line(app: &App) -> Line<'static> {
    let viewport = &app.viewport;
    let position = format!("{}/{}", viewport.offset(), viewport.total_height());
    let mut spans = vec![Span::styled(position, Style::default().fg(Color::White))];
    if app.follow_tail {
        spans.push(Span::styled("  follow", Style::default().fg(theme::STATUS_FOLLOW)));
    }
    if viewport.is_focused() {
        spans.push(Span::styled("  focus", Style::default().fg(theme::STATUS_FOCUS)));
    }
    if let Some(index) = viewport.selected_index() {
        spans.push(Span::styled(format!("  #{index}"), Style::default().fg(theme::DIM)));
    }
    if app.streaming.is_some() {
        spans.push(Span::styled("  streaming", Style::default().fg(theme::RUST_ORANGE)));
    }
    Line::from(spans)
}

fn split_footer_columns(area: Rect) -> (Rect, Rect) {
    if area.width == 0 {
        return (area, Rect { width: 0, ..area });
    }

    let gap = if area.width > 2 { FOOTER_COLUMN_GAP } else { 0 };
    let usable_width = area.width.saturating_sub(gap);
    let left_width = usable_width.saturating_add(1) / 2;
    let right_width = usable_width.saturating_sub(left_width);

    let left = Rect { width: left_width, ..area };
    let right = Rect {
        x: area.x.saturating_add(left_width).saturating_add(gap),
        width: right_width,
        ..area
    };
    (left, right)
}

/// Shorten `text` to at most `max_width` display columns, ending in `...`
/// when cut.
fn fit_text(text: &str, max_width: usize) -> Option<String> {
    if max_width == 0 || text.trim().is_empty() {
        return None;
    }
    if UnicodeWidthStr::width(text) <= max_width {
        return Some(text.to_owned());
    }
    if max_width <= 3 {
        return Some(".".repeat(max_width));
    }

    let mut fitted = String::new();
    let mut width: usize = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width.saturating_add(ch_width).saturating_add(3) > max_width {
            break;
        }
        fitted.push(ch);
        width = width.saturating_add(ch_width);
    }
    fitted.push_str("...");
    Some(fitted)
}

fn render_footer_right_info(frame: &mut Frame, area: Rect, text: &str, color: Color) {
    let Some(fitted) = fit_text(text, usize::from(area.width)) else {
        return;
    };
    let line = Line::from(Span::styled(fitted, Style::default().fg(color)));
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Right), area);
}

fn render_separator(frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    let sep_str = theme::SEPARATOR_CHAR.repeat(usize::from(area.width));
    let line = Line::from(Span::styled(sep_str, Style::default().fg(theme::DIM)));
    frame.render_widget(Paragraph::new(line), area);
}
