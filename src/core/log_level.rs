//! Log level definitions
//!
//! Label and color tables are indexed by the level's discriminant so the hot
//! path never performs a map lookup.

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const COLOR_RESET: &str = "\x1b[0m";
const COLOR_RED: &str = "\x1b[31m";
const COLOR_GREEN: &str = "\x1b[32m";
const COLOR_YELLOW: &str = "\x1b[33m";
const COLOR_CYAN: &str = "\x1b[36m";

const NAMES: [&str; 7] = ["DEBUG", "INFO", "WARN", "ERROR", "CRITICAL", "FATAL", "PANIC"];

const PADDED_LABELS: [&str; 7] = [
    "[DEBUG]", "[INFO] ", "[WARN] ", "[ERROR]", "[CRIT] ", "[FATAL]", "[PANIC]",
];

const COLORS: [&str; 7] = [
    COLOR_CYAN,
    COLOR_GREEN,
    COLOR_YELLOW,
    COLOR_RED,
    COLOR_RED,
    COLOR_RED,
    COLOR_RED,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum LogLevel {
    Debug = 0,
    #[default]
    Info = 1,
    Warn = 2,
    Error = 3,
    Critical = 4,
    /// Terminates the process after draining hooks
    Fatal = 5,
    /// Raises a program panic after draining hooks
    Panic = 6,
}

impl LogLevel {
    pub const ALL: [LogLevel; 7] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Critical,
        LogLevel::Fatal,
        LogLevel::Panic,
    ];

    #[inline]
    pub const fn to_str(self) -> &'static str {
        NAMES[self as usize]
    }

    /// Fixed-width bracketed label, seven bytes for every level
    #[inline]
    pub const fn padded_label(self) -> &'static str {
        PADDED_LABELS[self as usize]
    }

    /// ANSI escape sequence that opens this level's color
    #[inline]
    pub const fn color(self) -> &'static str {
        COLORS[self as usize]
    }

    /// Levels whose emission ends the program once logging completes
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, LogLevel::Fatal | LogLevel::Panic)
    }

    pub(crate) const fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Debug,
            1 => LogLevel::Info,
            2 => LogLevel::Warn,
            3 => LogLevel::Error,
            4 => LogLevel::Critical,
            5 => LogLevel::Fatal,
            _ => LogLevel::Panic,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" | "CRIT" => Ok(LogLevel::Critical),
            "FATAL" => Ok(LogLevel::Fatal),
            "PANIC" => Ok(LogLevel::Panic),
            _ => Err(LoggerError::invalid_level(s)),
        }
    }
}
