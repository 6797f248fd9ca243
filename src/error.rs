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

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("failed to read content file {path}: {reason}")]
    ContentUnreadable { path: PathBuf, reason: String },
    #[error("content file {0} contains no blocks")]
    ContentEmpty(PathBuf),
    #[error("terminal setup failed: {0}")]
    Terminal(String),
}

impl AppError {
    pub const CONTENT_UNREADABLE_EXIT_CODE: i32 = 20;
    pub const CONTENT_EMPTY_EXIT_CODE: i32 = 21;
    pub const TERMINAL_EXIT_CODE: i32 = 22;

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ContentUnreadable { .. } => Self::CONTENT_UNREADABLE_EXIT_CODE,
            Self::ContentEmpty(_) => Self::CONTENT_EMPTY_EXIT_CODE,
            Self::Terminal(_) => Self::TERMINAL_EXIT_CODE,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ContentUnreadable { path, .. } => {
                format!("Could not read {}. Check the path passed to --file.", path.display())
            }
            Self::ContentEmpty(path) => {
                format!("{} has no content. Separate blocks with blank lines.", path.display())
            }
            Self::Terminal(_) => "The terminal could not be put into interactive mode.".to_owned(),
        }
    }
}
