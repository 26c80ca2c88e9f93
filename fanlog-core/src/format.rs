//! Record renderers.
//!
//! A renderer turns a [`LogRecord`] into the exact text a sink persists,
//! without the trailing newline.

use std::sync::Arc;

use crate::record::LogRecord;

/// Pluggable record renderer used by [`RotatingFileSink`](crate::RotatingFileSink).
pub type Formatter = Arc<dyn Fn(&LogRecord) -> String + Send + Sync>;

/// Wraps a closure into a shareable [`Formatter`].
pub fn formatter<F>(f: F) -> Formatter
where
    F: Fn(&LogRecord) -> String + Send + Sync + 'static,
{
    Arc::new(f)
}

/// `[timestamp][LEVEL ][component][function:line        ] message`
pub fn console_line(record: &LogRecord) -> String {
    format!(
        "[{}][{:<6}][{}][{:<20}] {}",
        record.timestamp, record.level, record.component, record.origin, record.message
    )
}

/// `[timestamp][LEVEL ][component][function:line] message`
pub fn full_line(record: &LogRecord) -> String {
    format!(
        "[{}][{:<6}][{}][{}] {}",
        record.timestamp, record.level, record.component, record.origin, record.message
    )
}

/// `[LEVEL] message`
pub fn compact_line(record: &LogRecord) -> String {
    format!("[{}] {}", record.level, record.message)
}

pub fn message_only(record: &LogRecord) -> String {
    record.message.clone()
}
