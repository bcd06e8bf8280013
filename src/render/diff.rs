//! Incremental frame painter.
//!
//! Keeps the previous frame's lines and, on each update, emits only the
//! escape sequences needed to morph the screen into the new frame: cursor
//! moves, per-line clears and rewrites, and clears for rows the new frame no
//! longer has. Updates are wrapped in synchronized-output markers so capable
//! terminals apply them atomically.
//!
//! Falls back to a full clear-and-repaint when diffing cannot work: the very
//! first update, a terminal width change (old rows have rewrapped), a change
//! above the visible viewport, or more removed rows than the screen holds.

use crate::core::terminal::CLEAR_SCREEN;
use crate::text::truncate::clip_to_width;
use crate::text::width::visible_width;

const SYNC_START: &str = "\x1b[?2026h";
const SYNC_END: &str = "\x1b[?2026l";

#[derive(Debug, Default)]
pub struct DiffRenderer {
    previous_lines: Vec<String>,
    previous_width: usize,
    cursor_row: usize,
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Escape-sequence string that morphs the screen from the previous frame
    /// into `frame`. Empty when nothing changed.
    pub fn update(&mut self, frame: &str, width: usize, height: usize) -> String {
        let lines: Vec<String> = frame
            .split('\n')
            .map(|line| {
                if visible_width(line) > width {
                    clip_to_width(line, width)
                } else {
                    line.to_string()
                }
            })
            .collect();

        let width_changed = self.previous_width != 0 && self.previous_width != width;
        if self.previous_lines.is_empty() {
            return self.full_render(lines, width, false);
        }
        if width_changed {
            return self.full_render(lines, width, true);
        }

        let mut first_changed: Option<usize> = None;
        let mut last_changed = 0;
        for i in 0..lines.len().max(self.previous_lines.len()) {
            let old = self.previous_lines.get(i).map(String::as_str).unwrap_or("");
            let new = lines.get(i).map(String::as_str).unwrap_or("");
            if old != new {
                first_changed.get_or_insert(i);
                last_changed = i;
            }
        }
        let Some(first_changed) = first_changed else {
            return String::new();
        };

        // Rows that scrolled above the viewport cannot be repainted in place.
        let viewport_top = self.previous_lines.len().saturating_sub(height);
        if first_changed < viewport_top {
            return self.full_render(lines, width, true);
        }
        let removed = self.previous_lines.len().saturating_sub(lines.len());
        if removed > height {
            return self.full_render(lines, width, true);
        }

        let mut buffer = String::from(SYNC_START);

        // Park on the first row to rewrite; appended rows are reached by
        // emitting newlines, which scroll at the screen bottom.
        let prev_last = self.previous_lines.len() - 1;
        let mut row = first_changed.min(prev_last);
        move_vertically(&mut buffer, self.cursor_row, row);
        buffer.push('\r');

        if first_changed < lines.len() {
            let render_end = last_changed.min(lines.len() - 1);
            for (i, line) in lines.iter().enumerate().take(render_end + 1).skip(first_changed) {
                while row < i {
                    buffer.push_str("\r\n");
                    row += 1;
                }
                buffer.push_str("\x1b[2K");
                buffer.push_str(line);
            }
        }

        if removed > 0 {
            let last_kept = lines.len() - 1;
            move_vertically(&mut buffer, row, last_kept);
            row = last_kept;
            for _ in 0..removed {
                buffer.push_str("\x1b[1B\r\x1b[2K");
            }
            buffer.push_str(&format!("\x1b[{removed}A"));
        }

        buffer.push_str(SYNC_END);
        self.cursor_row = row;
        self.previous_lines = lines;
        self.previous_width = width;
        buffer
    }

    fn full_render(&mut self, lines: Vec<String>, width: usize, clear: bool) -> String {
        let mut buffer = String::from(SYNC_START);
        if clear {
            buffer.push_str(CLEAR_SCREEN);
        }
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                buffer.push_str("\r\n");
            }
            buffer.push_str(line);
        }
        buffer.push_str(SYNC_END);

        self.cursor_row = lines.len().saturating_sub(1);
        self.previous_lines = lines;
        self.previous_width = width;
        buffer
    }
}

fn move_vertically(buffer: &mut String, from: usize, to: usize) {
    if to > from {
        buffer.push_str(&format!("\x1b[{}B", to - from));
    } else if from > to {
        buffer.push_str(&format!("\x1b[{}A", from - to));
    }
}
