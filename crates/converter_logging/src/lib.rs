#![deny(missing_docs)]
//! Shared logging utilities for the converter workspace.
//!
//! This crate provides the `conv_*` logging macros used by the engine and the
//! app, a level parser for configuration values and a minimal test
//! initializer for the global logger. The pure core crate does not log.

use log::LevelFilter;

#[doc(hidden)]
pub use log as __log;

/// Target attached to every record from the `conv_*` macros, so converter
/// output can be told apart from dependency noise in a shared log file.
pub const LOG_TARGET: &str = "converter";

/// Logs at `level` under [`LOG_TARGET`]. The level-named macros forward here.
#[macro_export]
macro_rules! conv_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::__log::$level!(target: $crate::LOG_TARGET, $($arg)*)
    };
}

/// Trace-level converter record.
#[macro_export]
macro_rules! conv_trace {
    ($($arg:tt)*) => { $crate::conv_log!(trace, $($arg)*) };
}

/// Debug-level converter record.
#[macro_export]
macro_rules! conv_debug {
    ($($arg:tt)*) => { $crate::conv_log!(debug, $($arg)*) };
}

/// Info-level converter record.
#[macro_export]
macro_rules! conv_info {
    ($($arg:tt)*) => { $crate::conv_log!(info, $($arg)*) };
}

/// Warn-level converter record.
#[macro_export]
macro_rules! conv_warn {
    ($($arg:tt)*) => { $crate::conv_log!(warn, $($arg)*) };
}

/// Error-level converter record.
#[macro_export]
macro_rules! conv_error {
    ($($arg:tt)*) => { $crate::conv_log!(error, $($arg)*) };
}

/// Parses a level name such as `"info"` or `"WARN"` into a filter.
///
/// Returns `None` for unknown names so callers can fall back to a default.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.trim().parse::<LevelFilter>().ok()
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Timer tests are chatty at trace level; debug is enough to follow them.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
