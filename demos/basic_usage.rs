//! Basic logger usage example
//!
//! Demonstrates leveled logging to the console and a file, placeholders,
//! the event builder and time formats.
//!
//! Run with: cargo run --example basic_usage

use loggo::prelude::*;
use loggo::{info, warn};

fn main() -> Result<()> {
    println!("=== loggo - Basic Usage Example ===\n");

    let log_path = std::env::temp_dir().join("loggo_basic_usage.log");
    let logger = Logger::builder()
        .level(LogLevel::Debug)
        .output(StdoutSink::new())
        .output(FileSink::new(&log_path)?)
        .build()?;

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message", &[]);
    logger.info("This is an info message", &[]);
    logger.warn("This is a warning message", &[]);
    logger.error("This is an error message", &[]);
    logger.critical("This is a critical message", &[]);

    println!("\n2. Placeholders and macros:");
    logger.info("value={}", &[Arg::from(42)]);
    info!(logger, "{} requests served in {}ms", 1200u32, 35.7);
    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
    logger.error("failed to open: {}", &[Arg::error(&err)]);
    warn!(logger, "escaped {{}} braces next to a value: {}", 5);
    logger.warn("without arguments {} is printed as-is", &[]);

    println!("\n3. Raising the threshold to WARN hides info:");
    logger.set_level(LogLevel::Warn);
    logger.info("Info message (hidden)", &[]);
    logger.warn("Warning message (visible)", &[]);

    println!("\n4. Event builder and time formats:");
    logger.set_time_format(TimestampFormat::Iso8601);
    if let Some(event) = logger.event(LogLevel::Error) {
        event.msgf("disk {} at {}%", &[Arg::from("/var"), Arg::from(97)]);
    }
    logger.set_time_format("%H:%M:%S");
    logger.set_colors(false);
    logger.warn("short timestamp, no colors", &[]);

    logger.flush()?;
    println!("\nFile output written to {}", log_path.display());
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
