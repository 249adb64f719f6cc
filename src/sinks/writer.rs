//! Adapter from any `io::Write` to a sink

use crate::core::{Result, Sink};
use std::io::Write;

/// Wraps an arbitrary writer, such as a socket or a pipe
pub struct WriterSink<W: Write + Send> {
    inner: W,
    name: String,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            name: "writer".to_string(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_sink() {
        let mut sink = WriterSink::new(Vec::new()).with_name("vec");
        sink.write(b"line\n").unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.name(), "vec");
        assert_eq!(sink.into_inner(), b"line\n");
    }
}
