use std::{fmt, sync::Arc};

use crate::{clock, level::Level};

/// Call site a record was emitted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub function: String,
    pub line: u32,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Rendered first so width flags apply to the whole `function:line`.
        f.pad(&format!("{}:{}", self.function, self.line))
    }
}

/// One dispatched log call. Built after the level gate passes and handed to
/// every sink by shared reference.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: String,
    pub level: Level,
    pub component: Arc<str>,
    pub origin: Origin,
    pub message: String,
}

impl LogRecord {
    /// Stamps a new record with the current local time.
    pub fn new(
        level: Level,
        component: Arc<str>,
        function: &str,
        line: u32,
        message: String,
    ) -> Self {
        Self {
            timestamp: clock::timestamp(),
            level,
            component,
            origin: Origin {
                function: function.to_string(),
                line,
            },
            message,
        }
    }
}

#[test]
fn test_origin_padding() {
    let origin = Origin {
        function: "main".into(),
        line: 42,
    };
    assert_eq!(format!("[{origin:<10}]"), "[main:42   ]");
    assert_eq!(origin.to_string(), "main:42");
}
