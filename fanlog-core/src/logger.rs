use std::{
    fmt,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU8, Ordering},
    },
};

use crate::{
    error::Result,
    level::Level,
    record::LogRecord,
    sink::{ConsoleSink, FnSink, Sink},
};

/// Leveled dispatcher fanning records out to an ordered list of sinks.
///
/// Share it as an `Arc<Logger>`; every method takes `&self`. Delivery is
/// synchronous on the caller's thread and serialized by the sink lock, so
/// every sink sees records in the order writers acquired that lock.
pub struct Logger {
    component: Arc<str>,
    threshold: AtomicU8,
    sinks: Mutex<Vec<Arc<dyn Sink>>>,
}

impl Logger {
    /// Creates a logger whose first sink is a [`ConsoleSink`].
    pub fn new(component: &str, threshold: Level) -> Self {
        let logger = Self::without_sinks(component, threshold);
        logger.register_sink(Arc::new(ConsoleSink::default()));
        logger
    }

    /// Creates a logger with an empty sink list.
    pub fn without_sinks(component: &str, threshold: Level) -> Self {
        Self {
            component: component.into(),
            threshold: AtomicU8::new(threshold as u8),
            sinks: Mutex::new(Vec::new()),
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn set_threshold(&self, level: Level) {
        self.threshold.store(level as u8, Ordering::Relaxed);
    }

    pub fn threshold(&self) -> Level {
        Level::from_u8(self.threshold.load(Ordering::Relaxed))
    }

    /// Whether a record at `level` would reach the sinks.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.threshold()
    }

    /// Appends a sink; it runs after every sink already registered.
    pub fn register_sink(&self, sink: Arc<dyn Sink>) {
        self.lock_sinks().push(sink);
    }

    pub fn register_fn<F>(&self, f: F)
    where
        F: Fn(&LogRecord) -> Result<()> + Send + Sync + 'static,
    {
        self.register_sink(Arc::new(FnSink::new(f)));
    }

    /// Removes every sink, the console default included.
    pub fn clear_sinks(&self) {
        self.lock_sinks().clear();
    }

    /// Routes all further records to `sink` only.
    pub fn replace_sinks(&self, sink: Arc<dyn Sink>) {
        let mut sinks = self.lock_sinks();
        sinks.clear();
        sinks.push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.lock_sinks().len()
    }

    /// Gates, stamps and delivers one message.
    ///
    /// Returns the first sink error; sinks registered after the failing one
    /// do not receive the record.
    pub fn write(&self, level: Level, function: &str, line: u32, message: &str) -> Result<()> {
        if !self.enabled(level) {
            return Ok(());
        }
        self.dispatch(level, function, line, message.to_string())
    }

    /// Like [`write`](Self::write), rendering `args` only once the gate passed.
    pub fn write_args(
        &self,
        level: Level,
        function: &str,
        line: u32,
        args: fmt::Arguments<'_>,
    ) -> Result<()> {
        if !self.enabled(level) {
            return Ok(());
        }
        self.dispatch(level, function, line, args.to_string())
    }

    fn dispatch(&self, level: Level, function: &str, line: u32, message: String) -> Result<()> {
        let record = LogRecord::new(level, Arc::clone(&self.component), function, line, message);
        let sinks = self.lock_sinks();
        for sink in sinks.iter() {
            sink.accept(&record)?;
        }
        Ok(())
    }

    pub fn trace(&self, function: &str, line: u32, message: &str) -> Result<()> {
        self.write(Level::Trace, function, line, message)
    }

    pub fn debug3(&self, function: &str, line: u32, message: &str) -> Result<()> {
        self.write(Level::Debug3, function, line, message)
    }

    pub fn debug2(&self, function: &str, line: u32, message: &str) -> Result<()> {
        self.write(Level::Debug2, function, line, message)
    }

    pub fn debug1(&self, function: &str, line: u32, message: &str) -> Result<()> {
        self.write(Level::Debug1, function, line, message)
    }

    pub fn info(&self, function: &str, line: u32, message: &str) -> Result<()> {
        self.write(Level::Info, function, line, message)
    }

    pub fn warn(&self, function: &str, line: u32, message: &str) -> Result<()> {
        self.write(Level::Warn, function, line, message)
    }

    pub fn error(&self, function: &str, line: u32, message: &str) -> Result<()> {
        self.write(Level::Error, function, line, message)
    }

    fn lock_sinks(&self) -> MutexGuard<'_, Vec<Arc<dyn Sink>>> {
        // A panicking sink must not disable logging for the whole process.
        self.sinks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("component", &self.component)
            .field("threshold", &self.threshold())
            .field("sinks", &self.sink_count())
            .finish()
    }
}
