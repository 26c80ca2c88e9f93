use std::{
    fmt,
    io::Write,
    sync::{Mutex, PoisonError},
};

use colored::Colorize;

use crate::{error::Result, format, record::LogRecord};

/// A destination receiving every record that passes the logger's level gate.
///
/// Sinks are invoked one at a time, in registration order, while the logger
/// holds its sink lock. An `Err` aborts delivery of that record to the sinks
/// registered after this one and is returned to the logging call site.
pub trait Sink: Send + Sync {
    fn accept(&self, record: &LogRecord) -> Result<()>;
}

/// Writes one line per record to stdout, flushing every time.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink {
    colored: bool,
}

impl ConsoleSink {
    /// Colour the level field. Colour is still dropped when stdout is not a
    /// terminal or `NO_COLOR` is set.
    pub fn colored(self, yes: bool) -> Self {
        Self { colored: yes }
    }

    fn render(&self, record: &LogRecord) -> String {
        if !self.colored {
            return format::console_line(record);
        }
        let level = format!("{:<6}", record.level).color(record.level.color());
        format!(
            "[{}][{level}][{}][{:<20}] {}",
            record.timestamp, record.component, record.origin, record.message
        )
    }
}

impl Sink for ConsoleSink {
    fn accept(&self, record: &LogRecord) -> Result<()> {
        let line = self.render(record);
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{line}")?;
        stdout.flush()?;
        Ok(())
    }
}

/// Adapts a closure into a [`Sink`].
pub struct FnSink<F>(F);

impl<F> FnSink<F>
where
    F: Fn(&LogRecord) -> Result<()> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Sink for FnSink<F>
where
    F: Fn(&LogRecord) -> Result<()> + Send + Sync,
{
    fn accept(&self, record: &LogRecord) -> Result<()> {
        (self.0)(record)
    }
}

impl<F> fmt::Debug for FnSink<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSink").finish_non_exhaustive()
    }
}

/// Keeps every accepted record in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records captured so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|r| r.message.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Sink for MemorySink {
    fn accept(&self, record: &LogRecord) -> Result<()> {
        self.lock().push(record.clone());
        Ok(())
    }
}
