use std::{io::Write, sync::Arc, thread};

use fanlog::{Level, LogRecord, MemorySink, initialize};

fn main() -> fanlog::Result<()> {
    // main thread sets up the shared logger; the console sink comes for free
    let logger = initialize("MultiHandler", Level::Debug1);

    logger.register_fn(|r: &LogRecord| {
        let mut stderr = std::io::stderr().lock();
        writeln!(stderr, "[STDERR] {}: {}", r.level, r.message)?;
        Ok(())
    });
    logger.register_fn(|r: &LogRecord| {
        eprintln!(r#"{{"level":"{}","msg":"{}"}}"#, r.level, r.message);
        Ok(())
    });
    let capture = Arc::new(MemorySink::new());
    logger.register_sink(capture.clone());

    fanlog::debug1!("Test message 1")?;
    fanlog::info!("Test message 2")?;
    fanlog::warn!("Test message 3")?;
    fanlog::trace!("below DEBUG1, reaches no sink")?;

    let handles: Vec<_> = (0..4)
        .map(|i| thread::spawn(move || fanlog::info!("Hello from worker {i}")))
        .collect();
    for h in handles {
        h.join().expect("worker panicked")?;
    }

    fanlog::info!("{} records captured in memory", capture.len())?;
    Ok(())
}
