#![deny(missing_docs)]
//! Shared logging utilities for the harvester workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! a per-thread channel context that prefixes every message logged while a
//! channel is being processed, and a minimal test initializer for the global
//! logger.

use std::cell::RefCell;

#[doc(hidden)]
pub use log as __log;

thread_local! {
    /// Thread-local storage for the channel currently being processed.
    static CHANNEL: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Restores the previous channel context when dropped.
#[must_use = "the channel context is cleared when the scope is dropped"]
pub struct ChannelScope {
    previous: Option<String>,
}

impl Drop for ChannelScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CHANNEL.with(|slot| *slot.borrow_mut() = previous);
    }
}

/// Tags log messages on the current thread with `channel_id` until the
/// returned scope is dropped.
pub fn enter_channel(channel_id: &str) -> ChannelScope {
    let previous = CHANNEL.with(|slot| slot.borrow_mut().replace(channel_id.to_string()));
    ChannelScope { previous }
}

/// Retrieves the channel context for the current thread, if any.
pub fn current_channel() -> Option<String> {
    CHANNEL.with(|slot| slot.borrow().clone())
}

/// Prefix used by the logging macros: `"[channel] "` or empty.
#[doc(hidden)]
pub fn context_prefix() -> String {
    CHANNEL.with(|slot| match slot.borrow().as_deref() {
        Some(channel) => format!("[{channel}] "),
        None => String::new(),
    })
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        $crate::__log::trace!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        $crate::__log::info!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        $crate::__log::debug!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        $crate::__log::warn!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        $crate::__log::error!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
