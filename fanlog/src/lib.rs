//! # fanlog
//! Multi-threaded logger fanning every record out to console, rotating files
//! and custom sinks.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! fanlog = "0.1.0"
//! ```
//!
//! ```rust
//! use fanlog::{Level, logger_config};
//!
//! let logger = logger_config()
//!     .with_name("main")
//!     .with_level(Level::Debug1)
//!     .init_global()
//!     .expect("Unable to configure the logger");
//! fanlog::info!("Hello, world!").unwrap();
//! fanlog::trace!("below the threshold, never rendered").unwrap();
//! assert_eq!(logger.component(), "main");
//! ```
//!
//! ## Multi-threaded logging
//! Every thread writes straight into the shared logger; records reach the
//! sinks before the logging call returns.
//!
//! ```rust
//! let handles: Vec<_> = (0..5).map(|i| {
//!     std::thread::spawn(move || {
//!         fanlog::warn!("Hello, world from thread {i}!").unwrap();
//!     })
//! }).collect();
//! for h in handles { h.join().unwrap(); }
//! ```
//!
//! ## Logging to rotating files
//! The file is appended to if it exists; once the next line would exceed
//! `max_bytes` it is renamed to `app.log.1`, older backups shift up and the
//! oldest beyond `max_backups` is deleted.
//!
//! ```rust
//! use fanlog::{SizeRotationConfig, logger_config};
//!
//! let dir = std::env::temp_dir().join("fanlog_doc_rotation");
//! let logger = logger_config()
//!     .with_rotating_file(SizeRotationConfig::new(dir.join("app.log"), 30 * 1024, 2))
//!     .expect("Unable to create log file")
//!     .no_stdout()
//!     .build();
//! fanlog::emit!(logger, fanlog::Level::Info, "Hello, world!").unwrap();
//! assert!(std::fs::read_to_string(dir.join("app.log")).unwrap().ends_with("Hello, world!\n"));
//! ```
//!
//! ## The `log` facade
//! ```rust
//! let logger = fanlog::initialize("bridge", fanlog::Level::Info);
//! fanlog::install_log_bridge(logger).ok();
//! log::info!("routed through fanlog");
//! ```

mod config;
mod macros;

use colored::Colorize;
use log::{LevelFilter, Log};
use std::sync::{Arc, OnceLock};

pub use config::FanlogConfig;
pub use fanlog_core::{
    ConsoleSink, Error, FnSink, Formatter, Level, LogRecord, Logger, MemorySink, Origin, Result,
    RotatingFileSink, Sink, SizeRotationConfig, emit, format, function_name,
};

/// Component name used when none is configured.
pub const DEFAULT_COMPONENT: &str = "Logger";

/// Process-wide logger, created once on first use.
static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Creates the process-wide logger with a console sink.
///
/// Once a logger exists this does nothing and returns it unchanged.
pub fn initialize(component: &str, level: Level) -> &'static Logger {
    GLOBAL_LOGGER.get_or_init(|| Logger::new(component, level))
}

/// The process-wide logger, configured from `FANLOG_*` variables if nothing
/// initialized it before.
pub fn logger() -> &'static Logger {
    GLOBAL_LOGGER.get_or_init(logger_from_env)
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

fn logger_from_env() -> Logger {
    match logger_config().from_env().map(ConfigBuilder::build) {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("{} {err}", "fanlog: ignoring environment configuration:".yellow());
            Logger::new(DEFAULT_COMPONENT, Level::default())
        }
    }
}

/// Forwards records from the `log` facade into a fanlog [`Logger`].
struct LogBridge {
    logger: &'static Logger,
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.logger.enabled(metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        let function = record.module_path().unwrap_or(record.target());
        let line = record.line().unwrap_or(0);
        if let Err(err) =
            self.logger
                .write_args(record.level().into(), function, line, *record.args())
        {
            // `log` has no way to hand the failure back to the caller.
            eprintln!("{} {err}", "fanlog: dropped log record:".red());
        }
    }

    fn flush(&self) {}
}

/// Installs `logger` as the `log` crate's backend.
///
/// Filtering stays with the logger's threshold, so later `set_threshold`
/// calls apply to `log::info!` and friends as well.
pub fn install_log_bridge(logger: &'static Logger) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(LogBridge { logger }))?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}

/// Builder for configuring and initializing the logger.
pub struct ConfigBuilder {
    name: Option<String>,
    level: Level,
    no_stdout: bool,
    colored: bool,
    log_bridge: bool,
    sinks: Vec<Arc<dyn Sink>>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            name: None,
            level: Level::Info,
            no_stdout: false,
            colored: false,
            log_bridge: false,
            sinks: Vec::new(),
        }
    }
}

impl ConfigBuilder {
    /// Builds an independent logger, e.g. to pass explicitly to components.
    pub fn build(self) -> Logger {
        let Self {
            name,
            level,
            no_stdout,
            colored,
            log_bridge: _,
            sinks,
        } = self;
        let logger = Logger::without_sinks(name.as_deref().unwrap_or(DEFAULT_COMPONENT), level);
        if !no_stdout {
            logger.register_sink(Arc::new(ConsoleSink::default().colored(colored)));
        }
        for sink in sinks {
            logger.register_sink(sink);
        }
        logger
    }

    /// Installs the configured logger as the process-wide one.
    ///
    /// If a process-wide logger already exists it is returned untouched and
    /// this configuration is discarded.
    pub fn init_global(self) -> Result<&'static Logger> {
        if let Some(existing) = GLOBAL_LOGGER.get() {
            return Ok(existing);
        }
        let log_bridge = self.log_bridge;
        let built = self.build();
        let mut installed = false;
        let logger = GLOBAL_LOGGER.get_or_init(|| {
            installed = true;
            built
        });
        if installed && log_bridge {
            install_log_bridge(logger).map_err(|err| Error::Config(err.to_string()))?;
        }
        Ok(logger)
    }

    /// Overrides name and level with the `FANLOG_*` variables that are set,
    /// and adds the rotating file named by `FANLOG_FILE`.
    ///
    /// Unset variables leave earlier `with_*` calls in place.
    pub fn from_env(self) -> Result<Self> {
        let config = FanlogConfig::load()?;
        let level = config.explicit_level()?.unwrap_or(self.level);
        let name = config
            .explicit_component()
            .map(str::to_owned)
            .or(self.name.clone());
        let builder = Self {
            name,
            level,
            ..self
        };
        Ok(builder.maybe_with_rotating_file(config.rotation())?)
    }

    /// Adds a size-rotating log file, opened right away.
    pub fn with_rotating_file(self, config: SizeRotationConfig) -> Result<Self, std::io::Error> {
        Ok(self.with_sink(Arc::new(RotatingFileSink::new(config)?)))
    }
    /// Maybe adds a size-rotating log file.
    pub fn maybe_with_rotating_file(
        self,
        config: Option<SizeRotationConfig>,
    ) -> Result<Self, std::io::Error> {
        match config {
            Some(config) => self.with_rotating_file(config),
            None => Ok(self),
        }
    }
    /// Appends a sink after the console and any previously added sink.
    pub fn with_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }
    /// Sets the severity threshold
    pub fn with_level(self, level: Level) -> Self {
        Self { level, ..self }
    }
    /// Ignore stdout logging
    pub fn no_stdout(self) -> Self {
        Self {
            no_stdout: true,
            ..self
        }
    }
    /// Dynamically set the stdout flag.
    pub fn with_stdout(self, yes: bool) -> Self {
        Self {
            no_stdout: !yes,
            ..self
        }
    }
    /// Colour the level field on stdout.
    pub fn with_color(self, yes: bool) -> Self {
        Self {
            colored: yes,
            ..self
        }
    }
    /// Route the `log` crate's macros to the logger installed by `init_global`.
    pub fn with_log_bridge(self) -> Self {
        Self {
            log_bridge: true,
            ..self
        }
    }
    /// Sets the component name
    pub fn with_name(self, name: &str) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }
    /// Maybe sets the component name
    pub fn maybe_with_name(self, name: Option<&str>) -> Self {
        Self {
            name: name.map(String::from),
            ..self
        }
    }
}

/// Returns a default ConfigBuilder for configuring the logger.
pub fn logger_config() -> ConfigBuilder {
    ConfigBuilder::default()
}
