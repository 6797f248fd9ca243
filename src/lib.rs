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

pub mod app;
pub mod error;
pub mod item;
pub mod perf;
pub mod ui;
pub mod viewport;

pub use item::{
    Capabilities, Clickable, Entry, Focusable, HighlightRange, Highlightable, Item, ItemRef,
    MouseButton, TextItem,
};
pub use viewport::{Extent, Strategy, Viewport, ViewportConfig};

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "viewport-demo", about = "Interactive chat transcript on the viewport engine")]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Measure lazily around the window instead of compositing everything
    #[arg(long)]
    pub lazy: bool,

    /// Items measured beyond each edge of the window in lazy mode
    #[arg(long, default_value_t = viewport::DEFAULT_OVERSCAN)]
    pub overscan: usize,

    /// Blank lines between items
    #[arg(long, default_value_t = 1)]
    pub gap: u16,

    /// Number of synthetic messages to preload
    #[arg(long, default_value_t = 40)]
    pub items: usize,

    /// Preload blocks from a text file (blocks separated by blank lines)
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Stream a synthetic assistant reply after startup
    #[arg(long)]
    pub stream: bool,

    /// Write tracing diagnostics to this file (disabled when unset)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Tracing filter directives (defaults to RUST_LOG, then `info`)
    #[arg(long)]
    pub log_filter: Option<String>,

    /// Append to --log-file instead of truncating it
    #[arg(long)]
    pub log_append: bool,

    /// Write per-frame render timings (requires a `perf` build)
    #[arg(long)]
    pub perf_log: Option<PathBuf>,
}

impl Cli {
    #[must_use]
    pub fn viewport_config(&self) -> ViewportConfig {
        let strategy = if self.lazy {
            Strategy::Lazy {
                overscan: self.overscan,
                estimated_height: viewport::DEFAULT_ESTIMATED_HEIGHT,
            }
        } else {
            Strategy::Composited
        };
        ViewportConfig {
            gap: self.gap,
            strategy,
            highlight_style: ui::theme::highlight_style(),
        }
    }
}
