//! # loggo
//!
//! An in-process logging engine with leveled, colored line output,
//! multi-destination fan-out and asynchronous prioritized hooks.
//!
//! ## Features
//!
//! - **Cheap filtering**: messages below the threshold are rejected with one
//!   atomic load, before any formatting
//! - **Pooled rendering**: lines are built in reusable buffers with a
//!   per-second timestamp cache
//! - **Fan-out**: every line reaches all outputs in one call; a failing
//!   output never affects the others or the caller
//! - **Hooks**: callbacks run on a bounded worker pool in priority order,
//!   and a failing hook is reported once and removed
//! - **Terminal levels**: `FATAL` and `PANIC` drain hooks before exiting or
//!   panicking, with both actions replaceable for tests
//!
//! ## Example
//!
//! ```
//! use loggo::prelude::*;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder()
//!     .level(LogLevel::Debug)
//!     .output(sink.clone())
//!     .colors(false)
//!     .build()
//!     .expect("valid configuration");
//!
//! logger
//!     .add_hook(|level, msg| {
//!         if level >= LogLevel::Error {
//!             eprintln!("alert: {}", msg);
//!         }
//!         Ok(())
//!     }, 10)
//!     .expect("hook capacity available");
//!
//! logger.info("value={}", &[Arg::from(42)]);
//! logger.close();
//!
//! assert!(sink.contents().contains("[INFO]  "));
//! assert!(sink.contents().contains("value=42"));
//! ```

pub mod core;
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Arg, Event, HookError, HookId, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError,
        LoggerMetrics, Result, Sink, TimestampFormat,
    };
    pub use crate::sinks::{FileSink, MemorySink, StderrSink, StdoutSink, WriterSink};
}

pub use crate::core::{
    format_message, Arg, BufferLease, BufferPool, Event, ExitFn, Hook, HookError, HookFn, HookId,
    HookRegistry, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
    PanicFn, PoolState, Result, Sink, Termination, TimeCache, TimestampFormat, WorkerPool,
};
pub use crate::sinks::{Delivery, FanoutWriter, FileSink, MemorySink, StderrSink, StdoutSink, WriterSink};
