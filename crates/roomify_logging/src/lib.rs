#![deny(missing_docs)]
//! Shared logging utilities for the roomify workspace.
//!
//! This crate provides the `roomify_*` logging macros used across the codebase,
//! an ingestion session tag that the macros prepend to every line, and a
//! minimal test initializer for the global logger.
//!
//! The tag comes from [`with_session`] inside spawned tasks, which may run on
//! any worker thread, and from [`set_session`] on the thread driving the
//! controller.

use std::cell::Cell;
use std::future::Future;

#[doc(hidden)]
pub use log;

thread_local! {
    /// Token of the ingestion session currently being driven on this thread.
    static SESSION: Cell<Option<u64>> = const { Cell::new(None) };
}

tokio::task_local! {
    static TASK_SESSION: u64;
}

/// Runs `future` with its log lines tagged with `session`, wherever it is polled.
pub async fn with_session<F: Future>(session: u64, future: F) -> F::Output {
    TASK_SESSION.scope(session, future).await
}

/// Tags subsequent log lines on this thread with the given session token.
/// Pass `None` once the session is finished or abandoned.
pub fn set_session(session: Option<u64>) {
    SESSION.with(|v| v.set(session));
}

/// Returns the session token log lines are tagged with. A task scoped by
/// [`with_session`] wins over the thread's tag.
pub fn current_session() -> Option<u64> {
    TASK_SESSION
        .try_with(|session| *session)
        .ok()
        .or_else(|| SESSION.with(|v| v.get()))
}

/// Prefix the macros put in front of the message, empty when no session is set.
#[doc(hidden)]
pub fn session_prefix() -> String {
    match current_session() {
        Some(token) => format!("[session {token}] "),
        None => String::new(),
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! roomify_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!("{}{}", $crate::session_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! roomify_info {
    ($($arg:tt)*) => {{
        $crate::log::info!("{}{}", $crate::session_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! roomify_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!("{}{}", $crate::session_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! roomify_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!("{}{}", $crate::session_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! roomify_error {
    ($($arg:tt)*) => {{
        $crate::log::error!("{}{}", $crate::session_prefix(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
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
    fn prefix_follows_session_tag() {
        set_session(None);
        assert_eq!(session_prefix(), "");

        set_session(Some(7));
        assert_eq!(current_session(), Some(7));
        assert_eq!(session_prefix(), "[session 7] ");

        set_session(None);
        assert_eq!(session_prefix(), "");
    }

    #[tokio::test]
    async fn spawned_task_keeps_its_own_session() {
        // The polling thread is tagged with a newer session than the task.
        set_session(Some(9));
        let prefix = tokio::spawn(with_session(5, async { session_prefix() }))
            .await
            .unwrap();
        assert_eq!(prefix, "[session 5] ");
        assert_eq!(session_prefix(), "[session 9] ");

        let untagged = tokio::spawn(async { current_session() }).await.unwrap();
        assert_eq!(untagged, Some(9));
        set_session(None);
    }
}
