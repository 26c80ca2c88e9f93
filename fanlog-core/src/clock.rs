use chrono::{DateTime, Local};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Current local time as `YYYY-MM-DD HH:MM:SS.ffffff`.
pub fn timestamp() -> String {
    format_timestamp(Local::now())
}

pub fn format_timestamp(time: DateTime<Local>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}
