//! # fanlog-core
//! Core of fanlog: a leveled dispatcher fanning immutable records out to
//! pluggable sinks, and a size-rotating file sink.
//!
//! ```rust
//! use std::sync::Arc;
//! use fanlog_core::{Level, Logger, MemorySink};
//!
//! let logger = Logger::new("app", Level::Info); // console sink included
//! let capture = Arc::new(MemorySink::new());
//! logger.register_sink(capture.clone());
//!
//! logger.trace("main", 1, "filtered out").unwrap();
//! logger.info("main", 2, "ready").unwrap();
//! assert_eq!(capture.messages(), vec!["ready"]);
//! ```
//!
//! ## Rotating files
//! ```rust
//! use fanlog_core::{Level, Logger, SizeRotationConfig, register_rotating_file};
//!
//! let dir = std::env::temp_dir().join("fanlog_core_doc");
//! let logger = Logger::without_sinks("app", Level::Info);
//! let file = register_rotating_file(
//!     &logger,
//!     SizeRotationConfig::new(dir.join("app.log"), 10 * 1024 * 1024, 5),
//! )
//! .expect("Unable to open log file");
//! logger.warn("main", 3, "written to app.log").unwrap();
//! assert!(file.current_size() > 0);
//! ```

mod clock;
mod error;
pub mod format;
mod level;
mod logger;
#[doc(hidden)]
pub mod macros;
mod record;
mod rotation;
mod sink;

pub use clock::{format_timestamp, timestamp};
pub use error::{Error, Result};
pub use format::Formatter;
pub use level::Level;
pub use logger::Logger;
pub use record::{LogRecord, Origin};
pub use rotation::{RotatingFileSink, SizeRotationConfig, register_rotating_file};
pub use sink::{ConsoleSink, FnSink, MemorySink, Sink};
