//! Timing and logging helpers.

use std::time::Instant;

/// RAII timer that logs elapsed time on drop.
///
/// ```ignore
/// let _t = Timed::debug("kd-tree build");
/// // ... do work ...
/// // logs "kd-tree build: 1.234ms" when _t is dropped
/// ```
#[derive(Debug)]
pub(crate) struct Timed {
    name: &'static str,
    start: Instant,
    level: log::Level,
}

impl Timed {
    /// Timer that logs at DEBUG level.
    pub(crate) fn debug(name: &'static str) -> Self {
        log::trace!("{}...", name);
        Self {
            name,
            start: Instant::now(),
            level: log::Level::Debug,
        }
    }

    /// Timer that logs at TRACE level, for per-batch work.
    pub(crate) fn trace(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
            level: log::Level::Trace,
        }
    }
}

impl Drop for Timed {
    fn drop(&mut self) {
        if log::log_enabled!(self.level) {
            log::log!(self.level, "{}: {:.3?}", self.name, self.start.elapsed());
        }
    }
}
