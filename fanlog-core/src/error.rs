use thiserror::Error;

/// Errors surfaced by sinks and configuration.
///
/// Rotation rename/delete failures never show up here: the rotating sink
/// reports them on stderr and keeps logging.
#[derive(Debug, Error)]
pub enum Error {
    /// A sink could not write or flush its destination.
    #[error("sink i/o failure: {0}")]
    Io(#[from] std::io::Error),
    /// A custom sink refused the record.
    #[error("sink failure: {0}")]
    Sink(String),
    #[error("unknown log level: {0:?}")]
    UnknownLevel(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn sink(message: impl Into<String>) -> Self {
        Self::Sink(message.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
