//! Internal debug logging.
//!
//! The live view owns stdout, so debug output must never go there. When
//! `GROVE_TUI_DEBUG_LOG` names a file, internal events are appended to it;
//! otherwise they are dropped.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

use once_cell::sync::Lazy;

use crate::config::EnvConfig;

static DEBUG_SINK: Lazy<Option<Mutex<File>>> = Lazy::new(|| {
    let path = EnvConfig::from_env().debug_log?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .ok()
        .map(Mutex::new)
});

pub(crate) fn debug_enabled() -> bool {
    DEBUG_SINK.is_some()
}

pub(crate) fn log_debug(message: &str) {
    if let Some(sink) = DEBUG_SINK.as_ref() {
        if let Ok(mut file) = sink.lock() {
            let _ = writeln!(file, "{message}");
        }
    }
}
