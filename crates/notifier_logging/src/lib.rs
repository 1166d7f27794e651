#![deny(missing_docs)]
//! Shared logging utilities for the notifier workspace.
//!
//! This crate provides the `notifier_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger.

use std::cell::RefCell;

thread_local! {
    /// Thread-local label of the run currently executing on this thread.
    static RUN_LABEL: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Sets the run label for the current thread.
/// This should be called by the binary once, before the run starts.
pub fn set_run_label(label: impl Into<String>) {
    let label = label.into();
    RUN_LABEL.with(|v| *v.borrow_mut() = label);
}

/// Retrieves the run label for the current thread.
/// Returns an empty string if no label has been set.
pub fn run_label() -> String {
    RUN_LABEL.with(|v| v.borrow().clone())
}

/// Prefix prepended to every message by the `notifier_*` macros.
#[doc(hidden)]
pub fn run_prefix() -> String {
    let label = run_label();
    if label.is_empty() {
        String::new()
    } else {
        format!("[run {label}] ")
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! notifier_trace {
    ($($arg:tt)*) => {{
        log::trace!("{}{}", $crate::run_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! notifier_info {
    ($($arg:tt)*) => {{
        log::info!("{}{}", $crate::run_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! notifier_debug {
    ($($arg:tt)*) => {{
        log::debug!("{}{}", $crate::run_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! notifier_warn {
    ($($arg:tt)*) => {{
        log::warn!("{}{}", $crate::run_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! notifier_error {
    ($($arg:tt)*) => {{
        log::error!("{}{}", $crate::run_prefix(), format_args!($($arg)*));
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_empty_until_label_set() {
        assert_eq!(run_prefix(), "");
        set_run_label("20261019T080000Z");
        assert_eq!(run_label(), "20261019T080000Z");
        assert_eq!(run_prefix(), "[run 20261019T080000Z] ");
    }
}
