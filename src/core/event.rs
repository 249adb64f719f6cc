//! Single-use message builder bound to one pooled buffer
//!
//! An [`Event`] is obtained from [`Logger::event`] only when its level passes
//! the gate. One of its terminal calls renders the line into the leased
//! buffer, writes it to every output, hands the message to the hooks and
//! finally returns the buffer before any terminal-severity action runs.

use super::arg::Arg;
use super::buffer_pool::BufferLease;
use super::format::{estimate_len, write_message};
use super::log_level::{LogLevel, COLOR_RESET};
use super::logger::Logger;
use std::fmt;

/// Separator between the timestamp and the message body
const BODY_SEPARATOR: &[u8] = b": ";

/// A message in the making
///
/// # Example
///
/// ```
/// use loggo::{Arg, Logger, LogLevel, MemorySink};
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder().output(sink.clone()).colors(false).build().unwrap();
///
/// if let Some(event) = logger.event(LogLevel::Warn) {
///     event.msgf("disk at {}%", &[Arg::from(91)]);
/// }
/// assert!(sink.contents().contains("disk at 91%"));
/// ```
#[must_use = "an event does nothing until `msg` or `msgf` is called"]
pub struct Event<'a> {
    logger: &'a Logger,
    level: LogLevel,
    buf: BufferLease<'a>,
}

impl<'a> Event<'a> {
    pub(crate) fn new(logger: &'a Logger, level: LogLevel, buf: BufferLease<'a>) -> Self {
        Self { logger, level, buf }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Render `format` with `args` and emit the line
    pub fn msgf(self, format: &str, args: &[Arg<'_>]) {
        self.emit(format, args);
    }

    /// Emit `text` as-is; braces are not interpreted
    pub fn msg(self, text: &str) {
        self.emit(text, &[]);
    }

    fn emit(self, format: &str, args: &[Arg<'_>]) {
        let Event {
            logger,
            level,
            mut buf,
        } = self;

        let timestamp = logger.time_cache().formatted();
        let (color, reset) = if logger.colors() {
            (level.color(), COLOR_RESET)
        } else {
            ("", "")
        };
        let label = level.padded_label();

        let size = color.len()
            + label.len()
            + reset.len()
            + 1
            + timestamp.len()
            + BODY_SEPARATOR.len()
            + estimate_len(format, args)
            + 1;
        if size > buf.capacity() && size > logger.buffer_pool().large_threshold() {
            logger.metrics().record_oversized();
        }
        buf.ensure_capacity(size);

        buf.extend_from_slice(color.as_bytes());
        buf.extend_from_slice(label.as_bytes());
        buf.extend_from_slice(reset.as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(timestamp.as_bytes());
        buf.extend_from_slice(BODY_SEPARATOR);
        let body_start = buf.len();
        write_message(&mut buf, format, args);
        let body_end = buf.len();
        buf.push(b'\n');

        logger.write_line(&buf);

        // The body is copied out only when someone needs it after the
        // buffer is gone.
        let body = if !logger.hooks().is_empty() || level == LogLevel::Panic {
            Some(String::from_utf8_lossy(&buf[body_start..body_end]).into_owned())
        } else {
            None
        };
        drop(buf);

        if let Some(message) = &body {
            if !logger.hooks().is_empty() {
                logger.dispatch_hooks(level, message.clone());
            }
        }

        match level {
            LogLevel::Fatal => logger.terminate_fatal(),
            LogLevel::Panic => logger.terminate_panic(body.as_deref().unwrap_or_default()),
            _ => {}
        }
    }
}

impl fmt::Debug for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("level", &self.level)
            .field("buffered", &self.buf.len())
            .finish_non_exhaustive()
    }
}
