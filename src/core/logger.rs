//! Main logger implementation

use super::{
    arg::Arg,
    buffer_pool::BufferPool,
    config::LoggerConfig,
    error::{HookError, Result},
    event::Event,
    hook::{self, HookId, HookRegistry},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    sink::Sink,
    termination::{Termination, FATAL_EXIT_CODE},
    timestamp::{TimeCache, TimestampFormat},
    worker_pool::WorkerPool,
};
use crate::sinks::{FanoutWriter, StderrSink};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

pub struct Logger {
    level: AtomicU8,
    colors: AtomicBool,
    output: FanoutWriter,
    /// Destination for hook failure diagnostics
    error_output: Arc<Mutex<Box<dyn Sink>>>,
    time_cache: TimeCache,
    hooks: Arc<HookRegistry>,
    buffers: BufferPool,
    workers: WorkerPool,
    termination: RwLock<Termination>,
    /// Metrics for observability
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Logger with default settings writing to standard output
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(
            LoggerConfig::default(),
            Vec::new(),
            Box::new(StderrSink::new()),
            Termination::default(),
        )
    }

    /// Build a logger from a validated configuration
    pub fn with_config(config: LoggerConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    fn from_parts(
        config: LoggerConfig,
        outputs: Vec<Box<dyn Sink>>,
        error_output: Box<dyn Sink>,
        termination: Termination,
    ) -> Self {
        Self {
            level: AtomicU8::new(config.level as u8),
            colors: AtomicBool::new(config.colors),
            output: FanoutWriter::new(outputs),
            error_output: Arc::new(Mutex::new(error_output)),
            time_cache: TimeCache::new(config.time_format),
            hooks: Arc::new(HookRegistry::new(config.max_hooks)),
            buffers: BufferPool::new(
                config.buffer_size,
                config.large_buffer_factor,
                config.max_pooled_buffers,
            ),
            workers: WorkerPool::new(config.workers, config.queue_factor),
            termination: RwLock::new(termination),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Whether a message at `level` would be written
    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level as u8 >= self.level.load(Ordering::Relaxed)
    }

    /// Replace every output; an empty set restores standard output
    pub fn set_outputs(&self, sinks: Vec<Box<dyn Sink>>) {
        self.output.replace(sinks);
    }

    /// Replace every output with a single sink
    pub fn set_output<S: Sink + 'static>(&self, sink: S) {
        self.output.replace(vec![Box::new(sink)]);
    }

    /// Names of the current outputs, in write order
    pub fn outputs(&self) -> Vec<String> {
        self.output.names()
    }

    /// Replace the stream receiving hook failure diagnostics
    pub fn set_error_output<S: Sink + 'static>(&self, sink: S) {
        *self.error_output.lock() = Box::new(sink);
    }

    /// Change the timestamp pattern; applies from the next message
    pub fn set_time_format(&self, format: impl Into<TimestampFormat>) {
        self.time_cache.set_format(format.into());
    }

    pub fn time_format(&self) -> TimestampFormat {
        self.time_cache.format()
    }

    pub fn set_colors(&self, enabled: bool) {
        self.colors.store(enabled, Ordering::Relaxed);
    }

    pub fn colors(&self) -> bool {
        self.colors.load(Ordering::Relaxed)
    }

    /// Register a hook receiving the level and rendered body of every
    /// written message
    ///
    /// Hooks run on background workers, highest `priority` first. A hook
    /// that returns an error or panics is reported once on the error output
    /// and removed.
    ///
    /// # Errors
    ///
    /// [`LoggerError::HookCapacity`](crate::LoggerError::HookCapacity) when
    /// the registry is full; nothing is registered in that case.
    pub fn add_hook<F>(&self, callback: F, priority: i32) -> Result<HookId>
    where
        F: Fn(LogLevel, &str) -> std::result::Result<(), HookError> + Send + Sync + 'static,
    {
        self.hooks.add(callback, priority)
    }

    pub fn remove_hook(&self, id: HookId) -> bool {
        self.hooks.remove(id)
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    pub fn set_exit_handler<F>(&self, handler: F)
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.termination.write().exit = Arc::new(handler);
    }

    pub fn set_panic_handler<F>(&self, handler: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.termination.write().panic = Arc::new(handler);
    }

    /// Start a message at `level`, or `None` when the level is filtered out
    pub fn event(&self, level: LogLevel) -> Option<Event<'_>> {
        if !self.is_enabled(level) {
            return None;
        }
        let buf = self.buffers.lease(self.buffers.buffer_size());
        Some(Event::new(self, level, buf))
    }

    pub fn log(&self, level: LogLevel, format: &str, args: &[Arg<'_>]) {
        if let Some(event) = self.event(level) {
            event.msgf(format, args);
        }
    }

    pub fn debug(&self, format: &str, args: &[Arg<'_>]) {
        self.log(LogLevel::Debug, format, args);
    }

    pub fn info(&self, format: &str, args: &[Arg<'_>]) {
        self.log(LogLevel::Info, format, args);
    }

    pub fn warn(&self, format: &str, args: &[Arg<'_>]) {
        self.log(LogLevel::Warn, format, args);
    }

    pub fn error(&self, format: &str, args: &[Arg<'_>]) {
        self.log(LogLevel::Error, format, args);
    }

    pub fn critical(&self, format: &str, args: &[Arg<'_>]) {
        self.log(LogLevel::Critical, format, args);
    }

    /// Write the message, drain the hooks and exit with status 1
    pub fn fatal(&self, format: &str, args: &[Arg<'_>]) {
        self.log(LogLevel::Fatal, format, args);
    }

    /// Write the message, drain the hooks and panic with the message
    pub fn panic(&self, format: &str, args: &[Arg<'_>]) {
        self.log(LogLevel::Panic, format, args);
    }

    /// Flush every output, returning the first failure
    pub fn flush(&self) -> Result<()> {
        self.output.flush()
    }

    /// Refuse further hook passes, finish the admitted ones, stop the
    /// workers and drop all hooks
    ///
    /// Safe to call more than once and while messages are being logged;
    /// messages written afterwards still reach the outputs but run no hooks.
    pub fn close(&self) {
        self.workers.shutdown();
        self.hooks.clear();
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn buffer_pool(&self) -> &BufferPool {
        &self.buffers
    }

    /// Hook passes submitted but not yet finished
    pub fn pending_hooks(&self) -> usize {
        self.workers.pending()
    }

    pub(crate) fn time_cache(&self) -> &TimeCache {
        &self.time_cache
    }

    pub(crate) fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub(crate) fn write_line(&self, line: &[u8]) {
        let delivery = self.output.write(line);
        self.metrics.record_written();
        self.metrics.record_sink_writes(delivery.attempted as u64);
        if delivery.failed > 0 {
            self.metrics.record_sink_failures(delivery.failed as u64);
        }
    }

    pub(crate) fn dispatch_hooks(&self, level: LogLevel, message: String) {
        let hooks = Arc::clone(&self.hooks);
        let errors = Arc::clone(&self.error_output);
        let metrics = Arc::clone(&self.metrics);

        let accepted = self.workers.submit(move || {
            hook::dispatch(&hooks, &errors, &metrics, level, &message);
        });
        if accepted {
            self.metrics.record_hook_dispatched();
        } else {
            self.metrics.record_hook_dropped();
        }
    }

    pub(crate) fn terminate_fatal(&self) {
        self.drain_for_termination();
        let termination = self.termination.read().clone();
        termination.exit(FATAL_EXIT_CODE);
    }

    pub(crate) fn terminate_panic(&self, message: &str) {
        self.drain_for_termination();
        let termination = self.termination.read().clone();
        termination.panic(message);
    }

    fn drain_for_termination(&self) {
        self.workers.shutdown();
        // The exit action skips destructors.
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush before termination: {}", e);
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.close();

        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        let dropped = self.metrics.hook_jobs_dropped();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} hook passes dropped",
                dropped
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use loggo::prelude::*;
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder()
///     .level(LogLevel::Debug)
///     .output(sink.clone())
///     .max_hooks(10)
///     .workers(2)
///     .build()
///     .expect("valid configuration");
///
/// logger.debug("ready", &[]);
/// assert!(sink.contents().contains("ready"));
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    outputs: Vec<Box<dyn Sink>>,
    error_output: Option<Box<dyn Sink>>,
    termination: Termination,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            outputs: Vec::new(),
            error_output: None,
            termination: Termination::default(),
        }
    }

    /// Replace every setting with `config`
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_format(mut self, format: impl Into<TimestampFormat>) -> Self {
        self.config.time_format = format.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_hooks(mut self, max_hooks: usize) -> Self {
        self.config.max_hooks = max_hooks;
        self
    }

    /// Default capacity of pooled buffers; four times this is the
    /// oversize threshold
    #[must_use = "builder methods return a new value"]
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size;
        self
    }

    /// Number of hook worker threads
    #[must_use = "builder methods return a new value"]
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, enabled: bool) -> Self {
        self.config.colors = enabled;
        self
    }

    /// Add an output; without any, standard output is used
    #[must_use = "builder methods return a new value"]
    pub fn output<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.outputs.push(Box::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_output<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.error_output = Some(Box::new(sink));
        self
    }

    /// Replace the process exit performed after a fatal message
    #[must_use = "builder methods return a new value"]
    pub fn on_fatal<F>(mut self, handler: F) -> Self
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.termination = self.termination.with_exit(Arc::new(handler));
        self
    }

    /// Replace the panic raised after a panic message
    #[must_use = "builder methods return a new value"]
    pub fn on_panic<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.termination = self.termination.with_panic(Arc::new(handler));
        self
    }

    /// Build the logger
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration does not validate.
    pub fn build(self) -> Result<Logger> {
        self.config.validate()?;
        let error_output = self
            .error_output
            .unwrap_or_else(|| Box::new(StderrSink::new()));
        Ok(Logger::from_parts(
            self.config,
            self.outputs,
            error_output,
            self.termination,
        ))
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoggerError;
    use crate::sinks::MemorySink;
    use std::sync::atomic::AtomicUsize;
    use std::time::{Duration, Instant};

    fn test_logger(sink: &MemorySink) -> Logger {
        Logger::builder()
            .output(sink.clone())
            .colors(false)
            .workers(2)
            .build()
            .expect("valid logger")
    }

    fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        condition()
    }

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder().workers(1).build().expect("valid logger");
        assert_eq!(logger.level(), LogLevel::Info);
        assert_eq!(logger.outputs(), vec!["stdout".to_string()]);
        assert_eq!(logger.time_format(), TimestampFormat::Standard);
        assert!(logger.colors());
        assert_eq!(logger.hook_count(), 0);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let result = Logger::builder().workers(0).build();
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_level_gating() {
        let sink = MemorySink::new();
        let logger = test_logger(&sink);
        logger.set_level(LogLevel::Warn);

        logger.debug("dropped debug", &[]);
        logger.info("dropped info", &[]);
        logger.warn("kept warn", &[]);
        logger.error("kept error", &[]);

        let output = sink.contents();
        assert!(!output.contains("dropped"));
        assert!(output.contains("[WARN]  "));
        assert!(output.contains("kept warn"));
        assert!(output.contains("kept error"));
        assert_eq!(logger.metrics().messages_written(), 2);
    }

    #[test]
    fn test_gated_event_is_none() {
        let logger = test_logger(&MemorySink::new());
        logger.set_level(LogLevel::Error);
        assert!(logger.event(LogLevel::Info).is_none());
        assert!(logger.event(LogLevel::Critical).is_some());
        // Nothing was leased for the filtered call
        assert_eq!(logger.buffer_pool().idle(), 1);
    }

    #[test]
    fn test_fanout_to_two_outputs() {
        let a = MemorySink::new();
        let b = MemorySink::new();
        let logger = test_logger(&a);
        logger.set_outputs(vec![Box::new(a.clone()), Box::new(b.clone())]);

        logger.info("to both", &[]);
        assert!(!a.is_empty());
        assert_eq!(a.bytes(), b.bytes());
    }

    #[test]
    fn test_empty_outputs_fall_back_to_stdout() {
        let logger = test_logger(&MemorySink::new());
        logger.set_outputs(Vec::new());
        assert_eq!(logger.outputs(), vec!["stdout".to_string()]);
    }

    #[test]
    fn test_hook_receives_level_and_body() {
        let sink = MemorySink::new();
        let logger = test_logger(&sink);
        logger.set_level(LogLevel::Debug);

        let calls = Arc::new(Mutex::new(Vec::new()));
        {
            let calls = Arc::clone(&calls);
            logger
                .add_hook(
                    move |level, msg| {
                        calls.lock().push((level, msg.to_string()));
                        Ok(())
                    },
                    0,
                )
                .expect("capacity available");
        }

        logger.info("value={}", &[Arg::from(42)]);

        assert!(sink.contents().contains("[INFO] "));
        assert!(sink.contents().contains("value=42"));
        assert!(wait_until(|| calls.lock().len() == 1));
        assert_eq!(calls.lock()[0], (LogLevel::Info, "value=42".to_string()));
    }

    #[test]
    fn test_failing_hook_reports_once() {
        let errors = MemorySink::new();
        let logger = Logger::builder()
            .output(MemorySink::new())
            .error_output(errors.clone())
            .workers(1)
            .build()
            .expect("valid logger");
        logger
            .add_hook(|_, _| Err("rejected".into()), 0)
            .expect("capacity available");

        logger.info("first", &[]);
        assert!(wait_until(|| logger.hook_count() == 0));
        logger.info("second", &[]);
        logger.close();

        assert_eq!(errors.contents(), "Hook error: rejected\n");
        assert_eq!(logger.metrics().hooks_removed(), 1);
    }

    #[test]
    fn test_back_to_back_emissions_report_failing_hook_once() {
        let errors = MemorySink::new();
        let logger = Logger::builder()
            .output(MemorySink::new())
            .error_output(errors.clone())
            .workers(10)
            .build()
            .expect("valid logger");
        logger
            .add_hook(
                |_, _| {
                    std::thread::sleep(Duration::from_millis(2));
                    Err("rejected".into())
                },
                0,
            )
            .expect("capacity available");

        logger.info("a", &[]);
        logger.info("b", &[]);
        logger.close();

        assert_eq!(errors.contents(), "Hook error: rejected\n");
        assert_eq!(logger.metrics().hooks_removed(), 1);
    }

    #[test]
    fn test_hook_capacity() {
        let logger = test_logger(&MemorySink::new());
        for _ in 0..100 {
            logger.add_hook(|_, _| Ok(()), 0).expect("below capacity");
        }

        let err = logger.add_hook(|_, _| Ok(()), 0).unwrap_err();
        assert!(err.is_capacity());
        assert_eq!(logger.hook_count(), 100);
    }

    #[test]
    fn test_remove_hook() {
        let logger = test_logger(&MemorySink::new());
        let id = logger.add_hook(|_, _| Ok(()), 0).expect("capacity available");
        assert!(logger.remove_hook(id));
        assert!(!logger.remove_hook(id));
        assert_eq!(logger.hook_count(), 0);
    }

    #[test]
    fn test_close_drains_and_clears() {
        let logger = test_logger(&MemorySink::new());
        let calls = Arc::new(AtomicUsize::new(0));
        {
            let calls = Arc::clone(&calls);
            logger
                .add_hook(
                    move |_, _| {
                        std::thread::sleep(Duration::from_millis(5));
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    },
                    0,
                )
                .expect("capacity available");
        }

        for i in 0..20 {
            logger.info("message {}", &[Arg::from(i)]);
        }
        logger.close();

        assert_eq!(calls.load(Ordering::SeqCst), 20);
        assert_eq!(logger.hook_count(), 0);
        assert_eq!(logger.pending_hooks(), 0);

        // Second close is a no-op
        logger.close();
    }

    #[test]
    fn test_logging_after_close_still_writes() {
        let sink = MemorySink::new();
        let logger = test_logger(&sink);
        logger.close();
        logger.info("after close", &[]);
        assert!(sink.contents().contains("after close"));
    }

    #[test]
    fn test_close_returns_while_another_thread_keeps_logging() {
        let logger = Arc::new(test_logger(&MemorySink::new()));
        logger
            .add_hook(
                |_, _| {
                    std::thread::sleep(Duration::from_millis(1));
                    Ok(())
                },
                0,
            )
            .expect("capacity available");

        let active = Arc::new(AtomicBool::new(true));
        let producer = {
            let logger = Arc::clone(&logger);
            let active = Arc::clone(&active);
            std::thread::spawn(move || {
                while active.load(Ordering::SeqCst) {
                    logger.info("busy", &[]);
                }
            })
        };
        std::thread::sleep(Duration::from_millis(20));

        let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(1);
        let closer = {
            let logger = Arc::clone(&logger);
            std::thread::spawn(move || {
                logger.close();
                let _ = done_tx.send(());
            })
        };

        let finished = done_rx.recv_timeout(Duration::from_secs(3)).is_ok();
        active.store(false, Ordering::SeqCst);
        producer.join().expect("producer panicked");
        closer.join().expect("close panicked");

        assert!(finished, "close blocked behind an active producer");
        assert_eq!(logger.hook_count(), 0);
        assert_eq!(logger.pending_hooks(), 0);
    }

    #[test]
    fn test_fatal_returns_while_another_thread_keeps_logging() {
        let exits = Arc::new(AtomicUsize::new(0));
        let logger = {
            let exits = Arc::clone(&exits);
            Arc::new(test_logger(&MemorySink::new()).with_exit_counter(exits))
        };
        logger
            .add_hook(
                |_, _| {
                    std::thread::sleep(Duration::from_millis(1));
                    Ok(())
                },
                0,
            )
            .expect("capacity available");

        let active = Arc::new(AtomicBool::new(true));
        let producer = {
            let logger = Arc::clone(&logger);
            let active = Arc::clone(&active);
            std::thread::spawn(move || {
                while active.load(Ordering::SeqCst) {
                    logger.warn("busy", &[]);
                }
            })
        };
        std::thread::sleep(Duration::from_millis(20));

        let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(1);
        let terminator = {
            let logger = Arc::clone(&logger);
            std::thread::spawn(move || {
                logger.fatal("stopping", &[]);
                let _ = done_tx.send(());
            })
        };

        let finished = done_rx.recv_timeout(Duration::from_secs(3)).is_ok();
        active.store(false, Ordering::SeqCst);
        producer.join().expect("producer panicked");
        terminator.join().expect("fatal panicked");

        assert!(finished, "fatal blocked behind an active producer");
        assert_eq!(exits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fatal_drains_hooks_before_exit() {
        let sink = MemorySink::new();
        let hook_done = Arc::new(AtomicBool::new(false));
        let exit_codes = Arc::new(Mutex::new(Vec::new()));

        let logger = {
            let hook_done = Arc::clone(&hook_done);
            let exit_codes = Arc::clone(&exit_codes);
            Logger::builder()
                .output(sink.clone())
                .workers(1)
                .on_fatal(move |code| {
                    exit_codes.lock().push((code, hook_done.load(Ordering::SeqCst)));
                })
                .build()
                .expect("valid logger")
        };
        {
            let hook_done = Arc::clone(&hook_done);
            logger
                .add_hook(
                    move |_, _| {
                        std::thread::sleep(Duration::from_millis(50));
                        hook_done.store(true, Ordering::SeqCst);
                        Ok(())
                    },
                    0,
                )
                .expect("capacity available");
        }

        logger.fatal("shutting down: {}", &[Arg::from("disk full")]);

        assert!(sink.contents().contains("[FATAL]"));
        assert!(sink.contents().contains("shutting down: disk full"));
        assert_eq!(*exit_codes.lock(), vec![(1, true)]);
    }

    #[test]
    fn test_fatal_without_hooks_still_terminates() {
        let exits = Arc::new(AtomicUsize::new(0));
        let logger = {
            let exits = Arc::clone(&exits);
            Logger::builder()
                .output(MemorySink::new())
                .workers(1)
                .build()
                .expect("valid logger")
                .with_exit_counter(exits)
        };

        logger.fatal("bye", &[]);
        assert_eq!(exits.load(Ordering::SeqCst), 1);
    }

    impl Logger {
        fn with_exit_counter(self, exits: Arc<AtomicUsize>) -> Self {
            self.set_exit_handler(move |_| {
                exits.fetch_add(1, Ordering::SeqCst);
            });
            self
        }
    }

    #[test]
    fn test_panic_handler_receives_message() {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let logger = test_logger(&MemorySink::new());
        {
            let messages = Arc::clone(&messages);
            logger.set_panic_handler(move |msg| messages.lock().push(msg.to_string()));
        }

        logger.panic("invariant broken: {}", &[Arg::from(7)]);
        assert_eq!(*messages.lock(), vec!["invariant broken: 7".to_string()]);
    }

    #[test]
    fn test_default_panic_unwinds() {
        let sink = MemorySink::new();
        let logger = test_logger(&sink);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            logger.panic("unrecoverable", &[]);
        }));

        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("unrecoverable"));
        assert!(sink.contents().contains("[PANIC] "));
        // The buffer was returned before unwinding
        assert_eq!(logger.buffer_pool().idle(), 1);
    }

    #[test]
    fn test_critical_does_not_terminate() {
        let exits = Arc::new(AtomicUsize::new(0));
        let sink = MemorySink::new();
        let logger = test_logger(&sink).with_exit_counter(Arc::clone(&exits));

        logger.critical("degraded", &[]);
        assert!(sink.contents().contains("[CRIT] "));
        assert_eq!(exits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_set_time_format_applies_immediately() {
        let sink = MemorySink::new();
        let logger = test_logger(&sink);

        logger.set_time_format("fixed");
        logger.info("a", &[]);
        assert_eq!(sink.contents(), "[INFO]  fixed: a\n");

        sink.clear();
        logger.set_time_format(TimestampFormat::from("other"));
        logger.info("b", &[]);
        assert_eq!(sink.contents(), "[INFO]  other: b\n");
    }

    #[test]
    fn test_timestamps_within_one_second() {
        let sink = MemorySink::new();
        let logger = test_logger(&sink);
        logger.set_time_format(TimestampFormat::Unix);

        logger.info("one", &[]);
        logger.info("two", &[]);

        let stamps: Vec<i64> = sink
            .contents()
            .lines()
            .map(|line| {
                let rest = line.trim_start_matches("[INFO]  ");
                rest.split(':').next().unwrap_or("").parse().expect("unix seconds")
            })
            .collect();
        assert_eq!(stamps.len(), 2);
        assert!(stamps[1] - stamps[0] <= 1);
    }

    #[test]
    fn test_sink_failures_are_counted() {
        struct Broken;
        impl Sink for Broken {
            fn write(&mut self, _bytes: &[u8]) -> Result<()> {
                Err(LoggerError::sink("down"))
            }
            fn flush(&mut self) -> Result<()> {
                Ok(())
            }
            fn name(&self) -> &str {
                "broken"
            }
        }

        let good = MemorySink::new();
        let logger = test_logger(&good);
        logger.set_outputs(vec![Box::new(Broken), Box::new(good.clone())]);

        logger.error("still here", &[]);
        assert!(good.contents().contains("still here"));
        assert_eq!(logger.metrics().sink_failures(), 1);
        assert_eq!(logger.metrics().sink_writes(), 2);
        assert!((logger.metrics().failure_rate() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_concurrent_logging_keeps_lines_whole() {
        let sink = MemorySink::new();
        let logger = Arc::new(test_logger(&sink));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let logger = Arc::clone(&logger);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        logger.info("thread {} line {}", &[Arg::from(t), Arg::from(i)]);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread panicked");
        }

        let output = sink.contents();
        assert_eq!(output.lines().count(), 200);
        assert!(output.lines().all(|line| line.starts_with("[INFO]  ")));
    }
}
