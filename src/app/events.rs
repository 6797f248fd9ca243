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

use super::content::{self, Role};
use super::{App, StreamEvent, StreamingReply, try_copy_highlight};
use crate::item::MouseButton;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

const MOUSE_SCROLL_LINES: isize = 3;

pub fn handle_terminal_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        // Resize is picked up by the next render
        _ => {}
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    app.notice = None;
    let viewport = &mut app.viewport;
    match (key.code, key.modifiers) {
        // Ctrl+C copies an active highlight, otherwise quits
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => {
            if !try_copy_highlight(app) {
                app.should_quit = true;
            }
        }
        (KeyCode::Char('q'), _) => app.should_quit = true,
        (KeyCode::Char('y'), _) => {
            try_copy_highlight(app);
        }
        (KeyCode::Up | KeyCode::Char('k'), _) => {
            if viewport.select_prev(false) {
                viewport.scroll_to_selected();
            }
            app.follow_tail = viewport.at_bottom();
        }
        (KeyCode::Down | KeyCode::Char('j'), _) => {
            if viewport.select_next(false) {
                viewport.scroll_to_selected();
            }
            app.follow_tail = viewport.at_bottom();
        }
        (KeyCode::Tab, _) => {
            if viewport.is_focused() {
                viewport.blur();
            } else {
                viewport.focus();
            }
        }
        (KeyCode::PageUp, _) => {
            viewport.page_up();
            app.follow_tail = false;
        }
        (KeyCode::PageDown, _) => {
            viewport.page_down();
            app.follow_tail = viewport.at_bottom();
        }
        (KeyCode::Home, _) => {
            viewport.scroll_to_top();
            app.follow_tail = false;
        }
        (KeyCode::End, _) => {
            viewport.scroll_to_bottom();
            app.follow_tail = true;
        }
        (KeyCode::Char('d'), _) => {
            if let Some(index) = viewport.selected_index() {
                viewport.delete_item(index);
                app.notice = Some(format!("Deleted item {index}"));
            }
        }
        (KeyCode::Char('n'), _) => {
            if !super::start_stream(app) {
                app.notice = Some("A reply is already streaming".to_owned());
            }
        }
        (KeyCode::Esc, _) => {
            viewport.clear_highlight();
            viewport.clear_selection();
        }
        _ => {}
    }
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    let (x, y) = relative_position(app, mouse);
    let inside = mouse_inside(app, mouse);
    let viewport = &mut app.viewport;
    match mouse.kind {
        MouseEventKind::Down(crossterm::event::MouseButton::Left) if inside => {
            viewport.handle_mouse_down(x, y);
        }
        MouseEventKind::Drag(crossterm::event::MouseButton::Left) => {
            viewport.handle_mouse_drag(x, y);
        }
        MouseEventKind::Up(crossterm::event::MouseButton::Left) => {
            viewport.handle_mouse_up(x, y);
        }
        MouseEventKind::Down(crossterm::event::MouseButton::Right) if inside => {
            viewport.handle_mouse_click(MouseButton::Right, x, y);
        }
        MouseEventKind::Down(crossterm::event::MouseButton::Middle) if inside => {
            viewport.handle_mouse_click(MouseButton::Middle, x, y);
        }
        MouseEventKind::ScrollUp if inside => {
            viewport.scroll_by(-MOUSE_SCROLL_LINES);
            app.follow_tail = false;
        }
        MouseEventKind::ScrollDown if inside => {
            viewport.scroll_by(MOUSE_SCROLL_LINES);
            app.follow_tail = viewport.at_bottom();
        }
        _ => {}
    }
}

fn mouse_inside(app: &App, mouse: MouseEvent) -> bool {
    let area = app.viewport_area;
    mouse.column >= area.x
        && mouse.column < area.right()
        && mouse.row >= area.y
        && mouse.row < area.bottom()
}

/// Viewport-relative cell under the mouse, clamped into the viewport so drags
/// past an edge keep extending the highlight.
fn relative_position(app: &App, mouse: MouseEvent) -> (u16, u16) {
    let area = app.viewport_area;
    let x = mouse.column.saturating_sub(area.x).min(area.width.saturating_sub(1));
    let y = mouse.row.saturating_sub(area.y).min(area.height.saturating_sub(1));
    (x, y)
}

pub fn handle_stream_event(app: &mut App, event: StreamEvent) {
    match event {
        StreamEvent::Chunk(chunk) => {
            if let Some(reply) = app.streaming.as_mut() {
                reply.text.push_str(&chunk);
                let item = content::message_item(Role::Assistant, &reply.text);
                if !app.viewport.update_item(reply.id.as_str(), item) {
                    tracing::warn!(id = %reply.id, "streaming item vanished; dropping reply");
                    app.streaming = None;
                    return;
                }
            } else {
                let id = app.fresh_id("reply");
                let item = content::message_item(Role::Assistant, &chunk);
                app.viewport.append_item(crate::item::Entry::from(item).with_id(id.clone()));
                tracing::debug!(%id, "streaming reply started");
                app.streaming = Some(StreamingReply { id, text: chunk });
            }
            if app.follow_tail {
                app.viewport.scroll_to_bottom();
            }
        }
        StreamEvent::Finished => {
            if let Some(reply) = app.streaming.take() {
                tracing::debug!(id = %reply.id, bytes = reply.text.len(), "streaming reply finished");
            }
        }
    }
}
