//! Session configuration.

use std::env;
use std::path::PathBuf;

/// Options controlling one live session.
///
/// The defaults match an interactive terminal run: live console output,
/// bodies truncated to the last five lines, no transcript file.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Body lines shown per group before truncation kicks in.
    pub max_lines: usize,
    /// Frame width cap in columns. `None` uses the terminal width.
    pub max_width: Option<usize>,
    /// Write a plain-text transcript when the session ends.
    pub save_to_file: bool,
    pub file_output_path: PathBuf,
    /// Paint the live view to the terminal. Off, nothing is ever written to
    /// the console; the transcript file is unaffected.
    pub output_to_console: bool,
    /// Apply line truncation to the transcript file as well.
    pub truncate_file_output: bool,
    /// Skip the live view entirely and print only the final frame.
    pub final_output_only: bool,
    /// Draw borders with `+`/`-`/`|` instead of Unicode line characters.
    pub ascii_borders: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_lines: 5,
            max_width: None,
            save_to_file: false,
            file_output_path: PathBuf::from("logs.txt"),
            output_to_console: true,
            truncate_file_output: false,
            final_output_only: false,
            ascii_borders: false,
        }
    }
}

/// Environment overrides, read once per session.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// `GROVE_TUI_ASCII=1` forces ASCII borders regardless of config.
    pub ascii_borders: bool,
    /// `GROVE_TUI_DEBUG_LOG=<path>` routes internal debug lines to a file.
    pub debug_log: Option<String>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            ascii_borders: env_flag("GROVE_TUI_ASCII"),
            debug_log: env_string_opt("GROVE_TUI_DEBUG_LOG"),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{EnvConfig, SessionConfig};
    use std::env;
    use std::sync::{Mutex, OnceLock};

    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .expect("env lock poisoned")
    }

    fn set_env_guard(key: &'static str, value: Option<&str>) -> EnvGuard {
        let previous = env::var(key).ok();
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
        EnvGuard { key, previous }
    }

    #[test]
    fn defaults_describe_an_interactive_run() {
        let config = SessionConfig::default();
        assert_eq!(config.max_lines, 5);
        assert_eq!(config.max_width, None);
        assert!(!config.save_to_file);
        assert!(config.output_to_console);
        assert!(!config.truncate_file_output);
        assert!(!config.final_output_only);
        assert!(!config.ascii_borders);
    }

    #[test]
    fn env_defaults_are_off() {
        let _lock = env_lock();
        let _g1 = set_env_guard("GROVE_TUI_ASCII", None);
        let _g2 = set_env_guard("GROVE_TUI_DEBUG_LOG", None);

        let config = EnvConfig::from_env();
        assert!(!config.ascii_borders);
        assert!(config.debug_log.is_none());
    }

    #[test]
    fn env_overrides_apply() {
        let _lock = env_lock();
        let _g1 = set_env_guard("GROVE_TUI_ASCII", Some("1"));
        let _g2 = set_env_guard("GROVE_TUI_DEBUG_LOG", Some("/tmp/grove.log"));

        let config = EnvConfig::from_env();
        assert!(config.ascii_borders);
        assert_eq!(config.debug_log.as_deref(), Some("/tmp/grove.log"));
    }

    #[test]
    fn empty_debug_log_is_ignored() {
        let _lock = env_lock();
        let _g = set_env_guard("GROVE_TUI_DEBUG_LOG", Some(""));
        assert!(EnvConfig::from_env().debug_log.is_none());
    }
}
