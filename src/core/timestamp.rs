//! Timestamp formatting and the per-second timestamp cache
//!
//! Formatting a timestamp is the most expensive part of rendering a line, so
//! [`TimeCache`] keeps the string produced for the current wall-clock second
//! and hands out cheap clones of it until the second changes.

use chrono::{DateTime, Local, TimeZone, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

/// Cached entries older than this many seconds are pruned
pub const CACHE_RETENTION_SECS: i64 = 3600;

/// Minimum spacing between two prune passes, in seconds
pub const CLEANUP_INTERVAL_SECS: i64 = 60;

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use loggo::TimestampFormat;
/// use chrono::Utc;
///
/// let format = TimestampFormat::Iso8601;
/// let timestamp = format.format(&Utc::now());
/// assert!(timestamp.ends_with('Z'));
///
/// // Any strftime pattern
/// let format = TimestampFormat::from("%H:%M:%S");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Local time with milliseconds and zone: `2025-01-08 10:30:45.123 +01:00`
    #[default]
    Standard,

    /// ISO 8601 in UTC with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// RFC 3339 with the source offset: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Custom strftime format
    ///
    /// ```
    /// use loggo::TimestampFormat;
    ///
    /// // Apache log format
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format<Tz>(&self, datetime: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match self {
            TimestampFormat::Standard => datetime.format("%Y-%m-%d %H:%M:%S%.3f %Z").to_string(),
            TimestampFormat::Iso8601 => datetime
                .with_timezone(&Utc)
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }

    /// Get a description of this format
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            TimestampFormat::Standard => "Local time with milliseconds (2025-01-08 10:30:45.123 +00:00)",
            TimestampFormat::Iso8601 => "ISO 8601 with milliseconds (2025-01-08T10:30:45.123Z)",
            TimestampFormat::Rfc3339 => "RFC 3339 with timezone (2025-01-08T10:30:45+00:00)",
            TimestampFormat::Unix => "Unix timestamp in seconds (1736332245)",
            TimestampFormat::Custom(_) => "Custom strftime format",
        }
    }
}

impl From<&str> for TimestampFormat {
    fn from(format: &str) -> Self {
        TimestampFormat::Custom(format.to_string())
    }
}

impl From<String> for TimestampFormat {
    fn from(format: String) -> Self {
        TimestampFormat::Custom(format)
    }
}

#[derive(Debug)]
struct Slot {
    second: i64,
    generation: u64,
    value: Arc<str>,
}

/// Per-second cache of the formatted wall-clock time
///
/// The current second lives in a single slot guarded by its own lock. A
/// secondary map remembers recently formatted seconds, serves threads whose
/// clock reads straddle a second boundary, and is pruned at most once per
/// [`CLEANUP_INTERVAL_SECS`]. Every entry carries the format generation it
/// was rendered with and is ignored once the format changes.
#[derive(Debug)]
pub struct TimeCache {
    format: RwLock<TimestampFormat>,
    generation: AtomicU64,
    slot: RwLock<Slot>,
    history: DashMap<i64, (u64, Arc<str>)>,
    last_cleanup: AtomicI64,
    cleanup_running: AtomicBool,
}

impl TimeCache {
    pub fn new(format: TimestampFormat) -> Self {
        Self {
            format: RwLock::new(format),
            generation: AtomicU64::new(0),
            slot: RwLock::new(Slot {
                second: i64::MIN,
                generation: 0,
                value: Arc::from(""),
            }),
            history: DashMap::new(),
            last_cleanup: AtomicI64::new(0),
            cleanup_running: AtomicBool::new(false),
        }
    }

    /// Replace the pattern; the next lookup misses and formats with it
    pub fn set_format(&self, format: TimestampFormat) {
        {
            let mut current = self.format.write();
            *current = format;
            self.generation.fetch_add(1, Ordering::AcqRel);
        }
        self.history.clear();
    }

    pub fn format(&self) -> TimestampFormat {
        self.format.read().clone()
    }

    /// Formatted current time
    pub fn formatted(&self) -> Arc<str> {
        self.formatted_at(&Local::now())
    }

    /// Formatted `now`, reusing the cached value when `now` falls in the
    /// cached second
    pub fn formatted_at<Tz>(&self, now: &DateTime<Tz>) -> Arc<str>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let second = now.timestamp();
        let generation = self.generation.load(Ordering::Acquire);
        {
            let slot = self.slot.read();
            if slot.second == second && slot.generation == generation {
                return Arc::clone(&slot.value);
            }
        }

        let remembered = self
            .history
            .get(&second)
            .filter(|entry| entry.0 == generation)
            .map(|entry| Arc::clone(&entry.1));
        if let Some(value) = remembered {
            self.store_slot(second, generation, Arc::clone(&value));
            return value;
        }

        // Read under the format lock so the pair matches
        let (generation, value) = {
            let format = self.format.read();
            let generation = self.generation.load(Ordering::Acquire);
            (generation, Arc::<str>::from(format.format(now)))
        };
        self.store_slot(second, generation, Arc::clone(&value));
        self.history.insert(second, (generation, Arc::clone(&value)));
        self.cleanup(second);
        value
    }

    /// Number of seconds held in the secondary map
    pub fn cached_entries(&self) -> usize {
        self.history.len()
    }

    fn store_slot(&self, second: i64, generation: u64, value: Arc<str>) {
        let mut slot = self.slot.write();
        slot.second = second;
        slot.generation = generation;
        slot.value = value;
    }

    fn cleanup(&self, now: i64) {
        if now - self.last_cleanup.load(Ordering::Relaxed) < CLEANUP_INTERVAL_SECS {
            return;
        }
        if self
            .cleanup_running
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return;
        }

        self.history.retain(|&second, _| second >= now - CACHE_RETENTION_SECS);
        self.last_cleanup.store(now, Ordering::Relaxed);
        self.cleanup_running.store(false, Ordering::Release);
    }
}

impl Default for TimeCache {
    fn default() -> Self {
        Self::new(TimestampFormat::default())
    }
}
