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

use super::App;

/// Copy the highlighted text to the system clipboard. Returns `false` when
/// nothing is highlighted or no clipboard is available.
pub fn try_copy_highlight(app: &mut App) -> bool {
    let mut text = app.viewport.highlighted_text();
    if text.is_empty() {
        return false;
    }
    if !text.ends_with('\n') {
        text.push('\n');
    }
    let copied = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));
    match copied {
        Ok(()) => {
            app.notice = Some("Copied highlight to clipboard".to_owned());
            true
        }
        Err(e) => {
            tracing::debug!(error = %e, "clipboard unavailable");
            app.notice = Some("Clipboard unavailable".to_owned());
            false
        }
    }
}
