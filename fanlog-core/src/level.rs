use std::{fmt, str::FromStr};

use colored::Color;

use crate::error::Error;

/// Severity of a record, ordered from most verbose to most severe.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    Trace = 0,
    Debug3 = 1,
    Debug2 = 2,
    Debug1 = 3,
    #[default]
    Info = 4,
    Warn = 5,
    Error = 6,
}

impl Level {
    /// Every level in ascending order.
    pub const ALL: [Level; 7] = [
        Level::Trace,
        Level::Debug3,
        Level::Debug2,
        Level::Debug1,
        Level::Info,
        Level::Warn,
        Level::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug3 => "DEBUG3",
            Level::Debug2 => "DEBUG2",
            Level::Debug1 => "DEBUG1",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => Level::Trace,
            1 => Level::Debug3,
            2 => Level::Debug2,
            3 => Level::Debug1,
            4 => Level::Info,
            5 => Level::Warn,
            _ => Level::Error,
        }
    }

    pub(crate) fn color(self) -> Color {
        match self {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Green,
            Level::Debug1 | Level::Debug2 | Level::Debug3 => Color::Blue,
            Level::Trace => Color::Magenta,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` keeps width/alignment flags working, e.g. `{:<6}`.
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Level::Trace),
            "DEBUG3" => Ok(Level::Debug3),
            "DEBUG2" => Ok(Level::Debug2),
            "DEBUG1" | "DEBUG" => Ok(Level::Debug1),
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            _ => Err(Error::UnknownLevel(s.to_string())),
        }
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug => Level::Debug1,
            log::Level::Trace => Level::Trace,
        }
    }
}

impl From<Level> for log::LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => log::LevelFilter::Trace,
            Level::Debug3 | Level::Debug2 | Level::Debug1 => log::LevelFilter::Debug,
            Level::Info => log::LevelFilter::Info,
            Level::Warn => log::LevelFilter::Warn,
            Level::Error => log::LevelFilter::Error,
        }
    }
}
