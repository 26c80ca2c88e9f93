use std::{path::PathBuf, sync::Arc};

use fanlog::{SizeRotationConfig, format, logger_config};

fn main() -> fanlog::Result<()> {
    let dir = PathBuf::from("/tmp/fanlog_example_rotation");
    let _ = std::fs::remove_dir_all(&dir);

    let rotating = |name: &str| SizeRotationConfig::new(dir.join(name), 30 * 1024, 2);
    let logger = logger_config()
        .with_name("RotationTest")
        .with_level(fanlog::Level::Debug1)
        .no_stdout()
        .with_rotating_file(rotating("msg_only.log").with_formatter(Arc::new(format::message_only)))?
        .with_rotating_file(rotating("compact.log").with_formatter(Arc::new(format::compact_line)))?
        .with_rotating_file(rotating("full.log"))?
        .with_rotating_file(rotating("custom.log").with_formatter(format::formatter(|r| {
            // HH:MM:SS out of "YYYY-MM-DD HH:MM:SS.ffffff"
            format!("[{}] [{}] {}", &r.timestamp[11..19], r.level, r.message)
        })))?
        .init_global()?;

    for i in 1..=1000 {
        fanlog::info!(
            "Message {i} - This is a test message with some padding. \
             Different formatters will show different levels of detail."
        )?;
    }

    logger.replace_sinks(Arc::new(fanlog::ConsoleSink::default().colored(true)));
    let mut files: Vec<String> = std::fs::read_dir(&dir)?
        .flatten()
        .map(|e| {
            let size = e.metadata().map(|m| m.len()).unwrap_or(0);
            format!("{} ({size} bytes)", e.file_name().to_string_lossy())
        })
        .collect();
    files.sort();
    fanlog::info!("Log directory: {}", dir.display())?;
    for f in &files {
        fanlog::info!("  {f}")?;
    }
    Ok(())
}
