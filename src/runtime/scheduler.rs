//! Frame scheduler: owns the terminal and the incremental painter.
//!
//! One spinner step per produced frame, so animation speed is tied to the
//! render cadence rather than to how often groups log.

use std::time::Duration;

use crate::core::terminal::Terminal;
use crate::logging::{debug_enabled, log_debug};
use crate::render::diff::DiffRenderer;

/// Minimum delay between two painted frames.
pub(crate) const RENDER_INTERVAL: Duration = Duration::from_millis(70);

pub(crate) const SPINNER_FRAMES: [&str; 10] =
    ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub(crate) struct FrameScheduler {
    terminal: Box<dyn Terminal>,
    differ: DiffRenderer,
    spinner_index: usize,
}

impl FrameScheduler {
    pub(crate) fn new(terminal: Box<dyn Terminal>) -> Self {
        Self {
            terminal,
            differ: DiffRenderer::new(),
            spinner_index: 0,
        }
    }

    pub(crate) fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_index]
    }

    pub(crate) fn advance_spinner(&mut self) {
        self.spinner_index = (self.spinner_index + 1) % SPINNER_FRAMES.len();
    }

    pub(crate) fn columns(&self) -> u16 {
        self.terminal.columns()
    }

    /// Diff `frame` against the previous one and write the delta, if any.
    pub(crate) fn paint(&mut self, frame: &str) {
        let width = usize::from(self.terminal.columns()).max(1);
        let height = usize::from(self.terminal.rows()).max(1);
        let delta = self.differ.update(frame, width, height);
        if delta.is_empty() {
            return;
        }
        if debug_enabled() {
            log_debug(&format!("paint: {} bytes, width {width}", delta.len()));
        }
        self.terminal.write(&delta);
    }

    /// Write bytes outside the diffing flow (cursor control, final output).
    pub(crate) fn write_raw(&mut self, data: &str) {
        self.terminal.write(data);
    }
}
