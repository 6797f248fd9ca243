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

//! Per-frame render timing, gated behind `--features perf`.
//!
//! With the feature off every entry point is an inlined no-op. With it on,
//! [`PerfLog::open`] installs a thread-local JSON-lines writer and timers
//! returned by [`start`] log their duration when dropped:
//!
//! ```text
//! {"run":"…","frame":12,"fn":"compositor::rebuild","ms":1.204,"items":480}
//! ```

#[cfg(feature = "perf")]
mod enabled {
    use std::cell::RefCell;
    use std::fs::{File, OpenOptions};
    use std::io::{BufWriter, Write};
    use std::path::Path;
    use std::time::Instant;

    struct Sink {
        writer: BufWriter<File>,
        run: String,
        frame: u64,
    }

    thread_local! {
        static SINK: RefCell<Option<Sink>> = const { RefCell::new(None) };
    }

    pub(crate) fn is_open() -> bool {
        SINK.with(|sink| sink.borrow().is_some())
    }

    fn write(name: &'static str, ms: f64, extra: Option<(&'static str, usize)>) {
        SINK.with(|sink| {
            let mut sink = sink.borrow_mut();
            let Some(sink) = sink.as_mut() else {
                return;
            };
            let (run, frame) = (&sink.run, sink.frame);
            let _ = match extra {
                Some((key, value)) => writeln!(
                    sink.writer,
                    r#"{{"run":"{run}","frame":{frame},"fn":"{name}","ms":{ms:.3},"{key}":{value}}}"#
                ),
                None => writeln!(
                    sink.writer,
                    r#"{{"run":"{run}","frame":{frame},"fn":"{name}","ms":{ms:.3}}}"#
                ),
            };
        });
    }

    pub struct PerfLog {
        _private: (),
    }

    impl PerfLog {
        /// Open (or create) the log file. Returns `None` on I/O error.
        pub fn open(path: &Path, append: bool) -> Option<Self> {
            let mut options = OpenOptions::new();
            options.create(true).write(true);
            if append {
                options.append(true);
            } else {
                options.truncate(true);
            }
            let mut writer = BufWriter::new(options.open(path).ok()?);
            let run = uuid::Uuid::new_v4().to_string();
            let _ = writeln!(
                writer,
                r#"{{"event":"run_start","run":"{run}","pid":{},"version":"{}"}}"#,
                std::process::id(),
                env!("CARGO_PKG_VERSION")
            );
            SINK.with(|sink| *sink.borrow_mut() = Some(Sink { writer, run, frame: 0 }));
            Some(Self { _private: () })
        }

        /// Call once per rendered frame.
        #[allow(clippy::unused_self)]
        pub fn next_frame(&mut self) {
            SINK.with(|sink| {
                if let Some(sink) = sink.borrow_mut().as_mut() {
                    sink.frame += 1;
                    if sink.frame % 240 == 0 {
                        let _ = sink.writer.flush();
                    }
                }
            });
        }
    }

    impl Drop for PerfLog {
        fn drop(&mut self) {
            SINK.with(|sink| {
                if let Some(mut sink) = sink.borrow_mut().take() {
                    let _ = sink.writer.flush();
                }
            });
        }
    }

    pub struct Timer {
        pub(crate) name: &'static str,
        pub(crate) started: Instant,
        pub(crate) extra: Option<(&'static str, usize)>,
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            write(self.name, self.started.elapsed().as_secs_f64() * 1000.0, self.extra);
        }
    }
}

#[cfg(not(feature = "perf"))]
mod disabled {
    use std::path::Path;

    pub struct PerfLog;
    pub struct Timer;

    #[allow(clippy::unused_self)]
    impl PerfLog {
        #[inline]
        pub fn open(_path: &Path, _append: bool) -> Option<Self> {
            None
        }
        #[inline]
        pub fn next_frame(&mut self) {}
    }
}

#[cfg(feature = "perf")]
pub use enabled::{PerfLog, Timer};

#[cfg(not(feature = "perf"))]
pub use disabled::{PerfLog, Timer};

/// Start a named timer. `None` when the feature is off or no log is open.
#[cfg(feature = "perf")]
#[must_use]
#[inline]
pub fn start(name: &'static str) -> Option<Timer> {
    enabled::is_open().then(|| Timer { name, started: std::time::Instant::now(), extra: None })
}

/// Start a named timer that also records one numeric field.
#[cfg(feature = "perf")]
#[must_use]
#[inline]
pub fn start_with(name: &'static str, key: &'static str, value: usize) -> Option<Timer> {
    enabled::is_open().then(|| Timer {
        name,
        started: std::time::Instant::now(),
        extra: Some((key, value)),
    })
}

#[cfg(not(feature = "perf"))]
#[must_use]
#[inline]
pub fn start(_name: &'static str) -> Option<Timer> {
    None
}

#[cfg(not(feature = "perf"))]
#[must_use]
#[inline]
pub fn start_with(_name: &'static str, _key: &'static str, _value: usize) -> Option<Timer> {
    None
}
