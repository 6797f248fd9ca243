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

mod clipboard;
pub mod content;
mod events;
mod state;

pub use clipboard::try_copy_highlight;
pub use events::{handle_stream_event, handle_terminal_event};
pub use state::{App, StreamEvent, StreamingReply};

use crate::Cli;
use crate::error::AppError;
use crate::perf::PerfLog;
use crate::viewport::Viewport;
use crossterm::event::EventStream;
use futures::{FutureExt as _, StreamExt};
use std::time::{Duration, Instant};

/// Words of the reply produced by `--stream`.
const STREAM_REPLY: &str = "Here is a walkthrough of the change. The viewport keeps a \
composited surface of every item and patches only the rows of items that report \
themselves dirty. When an item grows while streaming, the rows below shift and the \
surface is rebuilt once.\nScrolling reads a window straight out of that surface, so \
large transcripts stay cheap to draw. Switch to --lazy to measure only what is on \
screen.";

const STREAM_CHUNK_DELAY: Duration = Duration::from_millis(45);

pub fn create_app(cli: &Cli) -> anyhow::Result<App> {
    let entries = match cli.file.as_deref() {
        Some(path) => content::load_blocks(path)?,
        None => content::synthetic_transcript(cli.items),
    };
    tracing::info!(
        items = entries.len(),
        lazy = cli.lazy,
        gap = cli.gap,
        "creating viewport"
    );
    let viewport = Viewport::with_config(cli.viewport_config(), entries);
    let mut app = App::new(viewport, cli.lazy);
    if let Some(path) = cli.perf_log.as_deref() {
        app.perf = PerfLog::open(path, cli.log_append);
        if app.perf.is_none() {
            tracing::warn!(path = %path.display(), "perf log could not be opened");
        }
    }
    Ok(app)
}

/// Feed a synthetic assistant reply into the app word by word. Returns
/// `false` while a previous reply is still being produced.
pub fn start_stream(app: &mut App) -> bool {
    if app.is_producing() {
        return false;
    }
    let tx = app.stream_tx.clone();
    app.stream_task = Some(tokio::task::spawn_local(async move {
        for word in STREAM_REPLY.split_inclusive([' ', '\n']) {
            tokio::time::sleep(STREAM_CHUNK_DELAY).await;
            if tx.send(StreamEvent::Chunk(word.to_owned())).is_err() {
                return;
            }
        }
        let _ = tx.send(StreamEvent::Finished);
    }));
    true
}

// ---------------------------------------------------------------------------
// TUI event loop
// ---------------------------------------------------------------------------

pub async fn run_tui(app: &mut App) -> anyhow::Result<()> {
    let mut terminal = ratatui::try_init().map_err(|e| AppError::Terminal(e.to_string()))?;

    // Ignore errors on terminals without mouse support
    let _ = crossterm::execute!(std::io::stdout(), crossterm::event::EnableMouseCapture);

    if app.follow_tail {
        app.viewport.scroll_to_bottom();
    }

    let mut events = EventStream::new();
    let tick_duration = Duration::from_millis(16);
    let mut last_render = Instant::now();

    let result = loop {
        // Phase 1: wait for at least one event or the next frame tick
        let time_to_next = tick_duration.saturating_sub(last_render.elapsed());
        tokio::select! {
            Some(Ok(event)) = events.next() => {
                events::handle_terminal_event(app, event);
            }
            Some(event) = app.stream_rx.recv() => {
                events::handle_stream_event(app, event);
            }
            () = tokio::time::sleep(time_to_next) => {}
        }

        // Phase 2: drain all remaining queued events (non-blocking)
        loop {
            if let Some(Some(Ok(event))) = events.next().now_or_never() {
                events::handle_terminal_event(app, event);
                continue;
            }
            match app.stream_rx.try_recv() {
                Ok(event) => events::handle_stream_event(app, event),
                Err(_) => break,
            }
        }

        if app.should_quit {
            break Ok(());
        }

        // Phase 3: render once
        if let Err(e) = terminal.draw(|f| crate::ui::render(f, app)) {
            break Err(e.into());
        }
        if let Some(perf) = app.perf.as_mut() {
            perf.next_frame();
        }
        last_render = Instant::now();
    };

    if let Some(task) = app.stream_task.take() {
        task.abort();
    }
    let _ = crossterm::execute!(std::io::stdout(), crossterm::event::DisableMouseCapture);
    ratatui::restore();
    tracing::info!(items = app.viewport.len(), "viewport demo exited");

    result
}
