//! ANSI-aware text measurement and manipulation helpers.

pub mod ansi;
pub mod truncate;
pub mod width;

pub use ansi::{extract_ansi_code, strip_ansi, AnsiCode};
pub use truncate::{clip_to_width, pad_to_width};
pub use width::visible_width;
