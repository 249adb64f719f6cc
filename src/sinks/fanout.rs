//! Fan-out writer delivering every line to all destinations

use super::console::StdoutSink;
use crate::core::{LoggerError, Result, Sink};
use parking_lot::Mutex;

/// Outcome of one fan-out write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Sinks the payload was handed to
    pub attempted: usize,
    /// Sinks that returned an error or panicked
    pub failed: usize,
}

/// Writes each payload to every registered sink under one lock
///
/// Failures are isolated per sink: an error or a panic from one destination
/// never stops delivery to the rest and is never raised to the caller.
pub struct FanoutWriter {
    sinks: Mutex<Vec<Box<dyn Sink>>>,
}

impl FanoutWriter {
    pub fn new(sinks: Vec<Box<dyn Sink>>) -> Self {
        Self {
            sinks: Mutex::new(Self::or_default(sinks)),
        }
    }

    /// Swap the destination set; an empty set falls back to standard output
    pub fn replace(&self, sinks: Vec<Box<dyn Sink>>) {
        let sinks = Self::or_default(sinks);
        let old = std::mem::replace(&mut *self.sinks.lock(), sinks);
        // Old sinks flush in their own Drop, outside the lock.
        drop(old);
    }

    pub fn len(&self) -> usize {
        self.sinks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.lock().is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.sinks.lock().iter().map(|s| s.name().to_string()).collect()
    }

    /// Write `bytes` to every sink in registration order
    pub fn write(&self, bytes: &[u8]) -> Delivery {
        let mut sinks = self.sinks.lock();
        let mut delivery = Delivery {
            attempted: sinks.len(),
            failed: 0,
        };

        for sink in sinks.iter_mut() {
            let result =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.write(bytes)));
            if !matches!(result, Ok(Ok(()))) {
                delivery.failed += 1;
            }
        }

        delivery
    }

    /// Flush every sink, returning the first error after trying them all
    pub fn flush(&self) -> Result<()> {
        let mut sinks = self.sinks.lock();
        let mut first_error = None;

        for sink in sinks.iter_mut() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.flush()));
            let error = match result {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e,
                Err(_) => LoggerError::sink(format!("sink '{}' panicked during flush", sink.name())),
            };
            first_error.get_or_insert(error);
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn or_default(sinks: Vec<Box<dyn Sink>>) -> Vec<Box<dyn Sink>> {
        if sinks.is_empty() {
            vec![Box::new(StdoutSink::new())]
        } else {
            sinks
        }
    }
}

impl Default for FanoutWriter {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
