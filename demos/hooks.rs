//! Hook example
//!
//! Registers prioritized hooks, shows a failing hook being removed and
//! overrides the fatal exit so the example can finish.
//!
//! Run with: cargo run --example hooks

use loggo::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== loggo - Hooks Example ===\n");

    let logger = Logger::builder()
        .level(LogLevel::Debug)
        .on_fatal(|code| println!("(fatal handler called with exit code {})", code))
        .build()?;

    let alerts = Arc::new(AtomicUsize::new(0));
    {
        let alerts = Arc::clone(&alerts);
        logger.add_hook(
            move |level, msg| {
                if level >= LogLevel::Error {
                    alerts.fetch_add(1, Ordering::SeqCst);
                    println!("    [alert hook] {}: {}", level, msg);
                }
                Ok(())
            },
            10,
        )?;
    }

    logger.add_hook(
        |level, msg| {
            println!("    [audit hook] {} {}", level, msg);
            Ok(())
        },
        1,
    )?;

    let flaky = logger.add_hook(|_, _| Err("audit backend unreachable".into()), 5)?;
    println!("Registered {} hooks (flaky one is {})", logger.hook_count(), flaky);

    println!("\n1. Hooks run asynchronously, highest priority first:");
    logger.info("user {} logged in", &[Arg::from("alice")]);
    logger.error("payment {} declined", &[Arg::from(1042)]);

    // Let the first passes finish so the flaky hook is gone
    std::thread::sleep(std::time::Duration::from_millis(100));
    println!("\n2. The failing hook was removed: {} hooks remain", logger.hook_count());

    println!("\n3. Fatal drains hooks before the exit handler runs:");
    logger.fatal("shutting down after {} alerts", &[Arg::from(alerts.load(Ordering::SeqCst))]);

    logger.close();
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
