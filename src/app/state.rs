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

use crate::perf::PerfLog;
use crate::viewport::Viewport;
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Content pushed from background producers. Applied on the UI thread only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Chunk(String),
    Finished,
}

/// Reply currently growing at the end of the transcript.
#[derive(Debug, Default)]
pub struct StreamingReply {
    pub id: String,
    pub text: String,
}

pub struct App {
    pub viewport: Viewport,
    pub should_quit: bool,
    /// Scroll to the newest content after appends, as long as the user has
    /// not scrolled away from the bottom.
    pub follow_tail: bool,
    pub stream_tx: mpsc::UnboundedSender<StreamEvent>,
    pub stream_rx: mpsc::UnboundedReceiver<StreamEvent>,
    pub streaming: Option<StreamingReply>,
    /// Producer feeding `stream_tx`, from spawn until it finishes.
    pub stream_task: Option<JoinHandle<()>>,
    /// Monotonic counter for item IDs.
    pub next_id: usize,
    /// Where the viewport was drawn last frame (for mouse mapping).
    pub viewport_area: Rect,
    /// One-shot footer notice (cleared on the next key press).
    pub notice: Option<String>,
    pub lazy: bool,
    pub perf: Option<PerfLog>,
}

impl App {
    pub fn new(viewport: Viewport, lazy: bool) -> Self {
        let (stream_tx, stream_rx) = mpsc::unbounded_channel();
        Self {
            viewport,
            should_quit: false,
            follow_tail: true,
            stream_tx,
            stream_rx,
            streaming: None,
            stream_task: None,
            next_id: 0,
            viewport_area: Rect::default(),
            notice: None,
            lazy,
            perf: None,
        }
    }

    pub fn is_producing(&self) -> bool {
        self.stream_task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}
