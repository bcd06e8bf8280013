//! Terminal interface and process-backed implementation.
//!
//! Invariant: single output gate — everything the session paints flows
//! through `Terminal::write(..)`, so tests can capture byte-exact output by
//! substituting the implementation.

use std::io::Write;
use std::sync::{Arc, Mutex, Once, PoisonError};

pub const HIDE_CURSOR: &str = "\x1b[?25l";
pub const SHOW_CURSOR: &str = "\x1b[?25h";

/// Clear visible screen and scrollback, cursor to home.
pub const CLEAR_SCREEN: &str = "\x1b[1J\x1b[3J\x1b[0;0H";

const FALLBACK_COLUMNS: u16 = 80;
const FALLBACK_ROWS: u16 = 24;

/// Minimal terminal surface needed by a session: writes plus dimensions.
pub trait Terminal: Send {
    /// Write raw bytes (text plus escape sequences) to the terminal.
    fn write(&mut self, data: &str);

    /// Current terminal width in columns.
    fn columns(&self) -> u16;

    /// Current terminal height in rows.
    fn rows(&self) -> u16;
}

/// Terminal backed by the process stdout.
#[derive(Debug, Default)]
pub struct ProcessTerminal;

impl ProcessTerminal {
    pub fn new() -> Self {
        Self
    }
}

impl Terminal for ProcessTerminal {
    fn write(&mut self, data: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(data.as_bytes());
        let _ = stdout.flush();
    }

    fn columns(&self) -> u16 {
        window_size().map(|(cols, _)| cols).unwrap_or(FALLBACK_COLUMNS)
    }

    fn rows(&self) -> u16 {
        window_size().map(|(_, rows)| rows).unwrap_or(FALLBACK_ROWS)
    }
}

fn window_size() -> Option<(u16, u16)> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };
    if rc == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some((ws.ws_col, ws.ws_row))
    } else {
        None
    }
}

/// Re-show the cursor if the process is killed while the live view has it
/// hidden. Installed once per process, only when a live session starts.
pub(crate) fn install_cursor_restore_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
            // Only async-signal-safe calls are allowed inside the handler.
            let _ = unsafe {
                signal_hook::low_level::register(signal, move || {
                    let bytes = SHOW_CURSOR.as_bytes();
                    unsafe {
                        libc::write(libc::STDOUT_FILENO, bytes.as_ptr().cast(), bytes.len());
                    }
                    let _ = signal_hook::low_level::emulate_default_handler(signal);
                })
            };
        }
    });
}

/// In-memory terminal for tests: records every write into a shared buffer.
#[derive(Debug)]
pub struct CaptureTerminal {
    buffer: Arc<Mutex<String>>,
    columns: u16,
    rows: u16,
}

impl CaptureTerminal {
    /// Create a capture terminal plus a handle to its accumulated output.
    pub fn new(columns: u16, rows: u16) -> (Self, Arc<Mutex<String>>) {
        let buffer = Arc::new(Mutex::new(String::new()));
        (
            Self {
                buffer: Arc::clone(&buffer),
                columns,
                rows,
            },
            buffer,
        )
    }
}

impl Terminal for CaptureTerminal {
    fn write(&mut self, data: &str) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(data);
    }

    fn columns(&self) -> u16 {
        self.columns
    }

    fn rows(&self) -> u16 {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::{CaptureTerminal, Terminal};

    #[test]
    fn capture_terminal_accumulates_writes() {
        let (mut term, buffer) = CaptureTerminal::new(100, 30);
        term.write("one");
        term.write("\x1b[2Ktwo");
        assert_eq!(*buffer.lock().unwrap(), "one\x1b[2Ktwo");
        assert_eq!(term.columns(), 100);
        assert_eq!(term.rows(), 30);
    }
}
