//! Session lifecycle: live rendering loop, final frame, transcript export.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;

use crate::config::{EnvConfig, SessionConfig};
use crate::core::error::unwrap_marked;
use crate::core::group::GroupTree;
use crate::core::scope::{ScopeCtx, SCOPE};
use crate::core::terminal::{
    install_cursor_restore_hook, ProcessTerminal, Terminal, CLEAR_SCREEN, HIDE_CURSOR,
    SHOW_CURSOR,
};
use crate::render::boxes::BorderStyle;
use crate::render::tree::{render_tree, RenderOptions};
use crate::runtime::scheduler::{FrameScheduler, RENDER_INTERVAL};
use crate::text::ansi::strip_ansi;

/// Terminal width assumed for the transcript export frame.
const EXPORT_TERMINAL_WIDTH: usize = 80;

/// Default frame width: terminal width minus breathing room for nesting.
fn derived_width(terminal_width: usize) -> usize {
    terminal_width.saturating_sub(20).max(10)
}

/// Shared state of one running session.
///
/// Lock order is scheduler before tree; nothing takes them the other way
/// around.
pub(crate) struct SessionInner {
    config: SessionConfig,
    border: BorderStyle,
    tree: Mutex<GroupTree>,
    scheduler: Mutex<FrameScheduler>,
    /// Render throttle: cleared while a frame cools down.
    ready: AtomicBool,
    /// Live painting active. Cleared at session end to stop the render loop.
    live: AtomicBool,
}

impl SessionInner {
    pub(crate) fn new(config: SessionConfig, terminal: Box<dyn Terminal>) -> Self {
        let env = EnvConfig::from_env();
        let border = if config.ascii_borders || env.ascii_borders {
            BorderStyle::Ascii
        } else {
            BorderStyle::Unicode
        };
        let live = config.output_to_console && !config.final_output_only;
        Self {
            border,
            tree: Mutex::new(GroupTree::new()),
            scheduler: Mutex::new(FrameScheduler::new(terminal)),
            ready: AtomicBool::new(true),
            live: AtomicBool::new(live),
            config,
        }
    }

    pub(crate) fn with_tree<R>(&self, f: impl FnOnce(&mut GroupTree) -> R) -> R {
        let mut tree = self.tree.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut tree)
    }

    /// Paint a frame now if the view is live and out of cooldown, and keep
    /// the loop running: after the cooldown the next frame is painted
    /// unconditionally, which is what advances the spinner while groups run.
    pub(crate) fn request_render(self: &Arc<Self>) {
        if !self.live.load(Ordering::SeqCst) {
            return;
        }
        if !self.ready.swap(false, Ordering::SeqCst) {
            return;
        }
        self.render_now();
        let session = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(RENDER_INTERVAL).await;
            session.ready.store(true, Ordering::SeqCst);
            session.request_render();
        });
    }

    fn render_now(&self) {
        let mut scheduler = self
            .scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        scheduler.advance_spinner();
        let options = self.render_options(
            usize::from(scheduler.columns()).max(1),
            scheduler.spinner(),
            true,
        );
        let frame = self.with_tree(|tree| render_tree(tree, &options));
        scheduler.paint(&frame);
    }

    fn render_options(
        &self,
        terminal_width: usize,
        spinner: &'static str,
        truncate: bool,
    ) -> RenderOptions {
        RenderOptions {
            border: self.border,
            truncate,
            max_lines: self.config.max_lines,
            // A configured width wins over the measured one.
            max_width: self
                .config
                .max_width
                .unwrap_or_else(|| derived_width(terminal_width)),
            spinner,
        }
    }

    fn start(&self) {
        if !self.live.load(Ordering::SeqCst) {
            return;
        }
        install_cursor_restore_hook();
        let mut scheduler = self
            .scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        scheduler.write_raw(&format!("{HIDE_CURSOR}{CLEAR_SCREEN}"));
        if self.config.save_to_file {
            scheduler.write_raw(&format!(
                "Logs will be saved to {}\n",
                self.config.file_output_path.display()
            ));
        }
    }

    /// Stop the live loop, print the final frame, export the transcript.
    fn finish(&self) -> anyhow::Result<()> {
        self.live.store(false, Ordering::SeqCst);

        if self.config.output_to_console {
            let mut scheduler = self
                .scheduler
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let options = self.render_options(
                usize::from(scheduler.columns()).max(1),
                scheduler.spinner(),
                true,
            );
            let frame = self.with_tree(|tree| render_tree(tree, &options));
            if self.config.final_output_only {
                scheduler.write_raw(&format!("\n{frame}\n"));
            } else {
                scheduler.write_raw(&format!("{CLEAR_SCREEN}{frame}\n{SHOW_CURSOR}"));
            }
        }

        if self.config.save_to_file {
            let options = RenderOptions {
                border: BorderStyle::Ascii,
                truncate: self.config.truncate_file_output,
                max_lines: self.config.max_lines,
                max_width: self
                    .config
                    .max_width
                    .unwrap_or_else(|| derived_width(EXPORT_TERMINAL_WIDTH)),
                spinner: " ",
            };
            let frame = self.with_tree(|tree| render_tree(tree, &options));
            std::fs::write(
                &self.config.file_output_path,
                format!("{}\n", strip_ansi(&frame)),
            )
            .with_context(|| {
                format!(
                    "failed to write transcript to {}",
                    self.config.file_output_path.display()
                )
            })?;
        }
        Ok(())
    }
}

/// Run `work` inside a live session on the process terminal.
///
/// All [`scope`](crate::scope) and [`log`](crate::log) calls made anywhere
/// below `work` attribute to this session without any handle being passed.
/// While `work` runs the group tree is painted live; when it ends the final
/// frame is printed and, when configured, a plain-text transcript is written.
///
/// Returns `work`'s value on success. On failure the original error is
/// returned with the internal attribution wrapper removed, so callers match
/// on their own error types. A transcript write failure after successful
/// `work` is itself an error.
pub async fn run_session<T, F>(config: SessionConfig, work: F) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    run_session_with_terminal(config, Box::new(ProcessTerminal::new()), work).await
}

/// [`run_session`] against an explicit terminal, for embedding and tests.
pub async fn run_session_with_terminal<T, F>(
    config: SessionConfig,
    terminal: Box<dyn Terminal>,
    work: F,
) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    let session = Arc::new(SessionInner::new(config, terminal));
    session.start();

    let ctx = ScopeCtx {
        session: Arc::clone(&session),
        group: None,
    };
    let result = SCOPE.scope(ctx, work).await;
    let finish_result = session.finish();

    match result {
        Ok(value) => {
            finish_result?;
            Ok(value)
        }
        Err(err) => Err(unwrap_marked(err)),
    }
}
