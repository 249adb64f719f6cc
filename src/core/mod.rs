//! Core logger types and traits

pub mod arg;
pub mod buffer_pool;
pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod hook;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod sink;
pub mod termination;
pub mod timestamp;
pub mod worker_pool;

pub use arg::Arg;
pub use buffer_pool::{BufferLease, BufferPool};
pub use config::LoggerConfig;
pub use error::{HookError, LoggerError, Result};
pub use event::Event;
pub use format::format_message;
pub use hook::{Hook, HookFn, HookId, HookRegistry};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use sink::Sink;
pub use termination::{ExitFn, PanicFn, Termination};
pub use timestamp::{TimeCache, TimestampFormat};
pub use worker_pool::{PoolState, WorkerPool};
