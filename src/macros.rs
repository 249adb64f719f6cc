//! Logging macros for ergonomic log message formatting.
//!
//! Each macro takes a logger, a format string with `{}` placeholders and any
//! number of arguments convertible into [`Arg`](crate::Arg).
//!
//! # Examples
//!
//! ```
//! use loggo::prelude::*;
//! use loggo::info;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::new();
//! logger.set_output(sink.clone());
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! let user_id = 42;
//! let action = "login";
//! info!(logger, "User {} performed action: {}", user_id, action);
//!
//! assert!(sink.contents().contains("User 42 performed action: login"));
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use loggo::prelude::*;
/// # let logger = Logger::new();
/// # logger.set_output(MemorySink::new());
/// use loggo::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $logger.log($level, $fmt, &[$($crate::Arg::from($arg)),*])
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use loggo::prelude::*;
/// # let logger = Logger::new();
/// # logger.set_output(MemorySink::new());
/// # logger.set_level(LogLevel::Debug);
/// use loggo::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use loggo::prelude::*;
/// # let logger = Logger::new();
/// # logger.set_output(MemorySink::new());
/// use loggo::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use loggo::prelude::*;
/// # let logger = Logger::new();
/// # logger.set_output(MemorySink::new());
/// use loggo::warn;
/// warn!(logger, "Low disk space");
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use loggo::prelude::*;
/// # let logger = Logger::new();
/// # logger.set_output(MemorySink::new());
/// use loggo::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
///
/// # Examples
///
/// ```
/// # use loggo::prelude::*;
/// # let logger = Logger::new();
/// # logger.set_output(MemorySink::new());
/// use loggo::critical;
/// critical!(logger, "Replica {} unreachable", "db-2");
/// ```
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}

/// Log a fatal-level message, then exit once hooks have drained.
///
/// # Examples
///
/// ```
/// # use loggo::prelude::*;
/// let logger = Logger::builder()
///     .output(MemorySink::new())
///     .on_fatal(|code| eprintln!("would exit with {}", code))
///     .build()
///     .unwrap();
/// use loggo::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

/// Log a panic-level message, then panic once hooks have drained.
///
/// Named `panic_log!` so it does not shadow the standard `panic!`.
///
/// # Examples
///
/// ```should_panic
/// # use loggo::prelude::*;
/// # let logger = Logger::new();
/// # logger.set_output(MemorySink::new());
/// use loggo::panic_log;
/// panic_log!(logger, "Invariant violated: {}", "negative balance");
/// ```
#[macro_export]
macro_rules! panic_log {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Panic, $($arg)+)
    };
}
