//! Process-wide default logger
//!
//! The default [`Logger`] is created on first access with default settings
//! and lives for the rest of the process; it is never closed. The free
//! functions here forward to it.
//!
//! ```
//! use loggo::{global, Arg, LogLevel, MemorySink};
//!
//! let sink = MemorySink::new();
//! global::set_output(sink.clone());
//! global::set_level(LogLevel::Debug);
//! global::debug("cache warm after {}ms", &[Arg::from(12)]);
//! assert!(sink.contents().contains("cache warm after 12ms"));
//! ```

use crate::core::{Arg, HookError, HookId, LogLevel, Logger, Result, Sink, TimestampFormat};
use once_cell::sync::Lazy;

static DEFAULT_LOGGER: Lazy<Logger> = Lazy::new(Logger::new);

/// The shared default logger
pub fn logger() -> &'static Logger {
    &DEFAULT_LOGGER
}

pub fn set_level(level: LogLevel) {
    logger().set_level(level);
}

pub fn set_outputs(sinks: Vec<Box<dyn Sink>>) {
    logger().set_outputs(sinks);
}

pub fn set_output<S: Sink + 'static>(sink: S) {
    logger().set_output(sink);
}

pub fn set_time_format(format: impl Into<TimestampFormat>) {
    logger().set_time_format(format);
}

pub fn add_hook<F>(callback: F, priority: i32) -> Result<HookId>
where
    F: Fn(LogLevel, &str) -> std::result::Result<(), HookError> + Send + Sync + 'static,
{
    logger().add_hook(callback, priority)
}

pub fn remove_hook(id: HookId) -> bool {
    logger().remove_hook(id)
}

pub fn log(level: LogLevel, format: &str, args: &[Arg<'_>]) {
    logger().log(level, format, args);
}

pub fn debug(format: &str, args: &[Arg<'_>]) {
    logger().debug(format, args);
}

pub fn info(format: &str, args: &[Arg<'_>]) {
    logger().info(format, args);
}

pub fn warn(format: &str, args: &[Arg<'_>]) {
    logger().warn(format, args);
}

pub fn error(format: &str, args: &[Arg<'_>]) {
    logger().error(format, args);
}

pub fn critical(format: &str, args: &[Arg<'_>]) {
    logger().critical(format, args);
}

pub fn fatal(format: &str, args: &[Arg<'_>]) {
    logger().fatal(format, args);
}

pub fn panic(format: &str, args: &[Arg<'_>]) {
    logger().panic(format, args);
}
