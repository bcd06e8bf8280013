//! Session runtime: render scheduling and session lifecycle.

pub mod scheduler;
pub mod session;

pub use session::{run_session, run_session_with_terminal};
