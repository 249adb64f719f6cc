//! Sink implementations

pub mod console;
pub mod fanout;
pub mod file;
pub mod memory;
pub mod writer;

pub use console::{StderrSink, StdoutSink};
pub use fanout::{Delivery, FanoutWriter};
pub use file::FileSink;
pub use memory::MemorySink;
pub use writer::WriterSink;

pub use crate::core::Sink;
