//! Live nested progress view for trees of concurrently running tasks.
//!
//! Invariant: single output gate — only the session's
//! [`Terminal`](core::terminal::Terminal) writes to the console.
//!
//! # Public API Overview
//! - Wrap a program's work in [`run_session`] to get a live, auto-updating
//!   view of its task tree.
//! - Open named groups with [`scope`]; groups nest by call structure, not by
//!   any handle being threaded through.
//! - Emit progress with [`log`], [`log_finished`], and [`log_value`] — lines
//!   attribute to the group enclosing the call.
//! - Failures mark the originating group, propagate upward through ancestor
//!   groups, and come back out of [`run_session`] unchanged.
//! - Text and width helpers for ANSI-safe formatting.

pub mod config;
pub mod logging;

pub mod core;
pub mod render;
pub mod runtime;
pub mod text;

/// Session entry points and configuration.
pub use crate::config::SessionConfig;
pub use crate::runtime::session::{run_session, run_session_with_terminal};

/// Scoped group and logging operations.
pub use crate::core::scope::{current_group, log, log_finished, log_value, scope};

/// Group tree model.
pub use crate::core::error::GroupError;
pub use crate::core::group::{Group, GroupId, GroupStatus, GroupTree};

/// Terminal abstraction, substitutable in tests.
pub use crate::core::terminal::{CaptureTerminal, ProcessTerminal, Terminal};

/// Frame rendering primitives.
pub use crate::render::boxes::{draw_box, BorderStyle};
pub use crate::render::tree::{render_tree, RenderOptions};

/// ANSI-aware text helpers.
pub use crate::text::ansi::strip_ansi;
pub use crate::text::truncate::clip_to_width;
pub use crate::text::width::visible_width;
