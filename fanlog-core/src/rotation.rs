use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use colored::Colorize;

use crate::{
    error::Result,
    format::{self, Formatter},
    logger::Logger,
    record::LogRecord,
    sink::Sink,
};

/// Configuration for size-based log file rotation.
#[derive(Clone)]
pub struct SizeRotationConfig {
    /// Active log file. Backups live next to it as `<path>.1`, `<path>.2`, ...
    pub path: PathBuf,
    /// Ceiling in bytes for the active file.
    pub max_bytes: u64,
    /// Number of backups kept; `.1` is the newest, `.<max_backups>` the oldest.
    pub max_backups: u32,
    /// Defaults to [`format::full_line`].
    pub formatter: Option<Formatter>,
}

impl SizeRotationConfig {
    pub fn new<P: AsRef<Path>>(path: P, max_bytes: u64, max_backups: u32) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_bytes,
            max_backups,
            formatter: None,
        }
    }

    pub fn with_formatter(self, formatter: Formatter) -> Self {
        Self {
            formatter: Some(formatter),
            ..self
        }
    }
}

struct ActiveFile {
    file: Option<BufWriter<File>>,
    current_size: u64,
    formatter: Formatter,
}

/// A sink appending to one file and rotating it through numbered backups
/// whenever the next line would push it past `max_bytes`.
///
/// Rotation and the write that triggered it run under one lock, so other
/// writers never observe a half-rotated file set.
pub struct RotatingFileSink {
    path: PathBuf,
    max_bytes: u64,
    max_backups: u32,
    active: Mutex<ActiveFile>,
}

impl RotatingFileSink {
    pub fn new(config: SizeRotationConfig) -> Result<Self, std::io::Error> {
        if config.max_bytes == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "max_bytes must be at least 1",
            ));
        }
        if let Some(parent) = config.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let (file, current_size) = open_append(&config.path)?;
        Ok(Self {
            path: config.path,
            max_bytes: config.max_bytes,
            max_backups: config.max_backups,
            active: Mutex::new(ActiveFile {
                file: Some(file),
                current_size,
                formatter: config
                    .formatter
                    .unwrap_or_else(|| format::formatter(format::full_line)),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn max_backups(&self) -> u32 {
        self.max_backups
    }

    /// Path of backup generation `n` (`1` is the newest).
    pub fn backup_path(&self, n: u32) -> PathBuf {
        backup_path(&self.path, n)
    }

    /// Bytes written to the active file, including what it held when opened.
    pub fn current_size(&self) -> u64 {
        self.lock().current_size
    }

    /// Swaps the formatter for subsequent writes. `None` keeps the current one.
    pub fn set_formatter(&self, formatter: Option<Formatter>) {
        if let Some(formatter) = formatter {
            self.lock().formatter = formatter;
        }
    }

    pub fn write(&self, record: &LogRecord) -> Result<(), std::io::Error> {
        let mut active = self.lock();
        let mut line = (active.formatter)(record);
        line.push('\n');
        let len = line.len() as u64;

        if active.current_size + len > self.max_bytes {
            self.rotate(&mut active)?;
        }

        let active = &mut *active;
        if active.file.is_none() {
            let (file, size) = open_append(&self.path)?;
            active.file = Some(file);
            active.current_size = size;
        }
        if let Some(file) = active.file.as_mut() {
            // bytes the handle took before a failure still count
            let (written, result) = write_counted(file, line.as_bytes());
            active.current_size += written as u64;
            result?;
            file.flush()?;
        }
        Ok(())
    }

    fn rotate(&self, active: &mut ActiveFile) -> Result<(), std::io::Error> {
        if let Some(mut file) = active.file.take() {
            // the handle is closed on drop either way
            if let Err(err) = file.flush() {
                report("flush before rotation", &self.path, &err);
            }
        }

        if self.max_backups == 0 {
            remove_if_exists(&self.path);
        } else {
            remove_if_exists(&self.backup_path(self.max_backups));
            for i in (1..self.max_backups).rev() {
                rename_if_exists(&self.backup_path(i), &self.backup_path(i + 1));
            }
            rename_if_exists(&self.path, &self.backup_path(1));
        }

        // Stays 0 even if the base file survived a failed rename; tracking
        // resumes from the bytes written through the new handle.
        active.current_size = 0;
        let (file, _) = open_append(&self.path)?;
        active.file = Some(file);
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, ActiveFile> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Sink for RotatingFileSink {
    fn accept(&self, record: &LogRecord) -> Result<()> {
        Ok(self.write(record)?)
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        if let Some(file) = self.lock().file.as_mut() {
            file.flush().ok();
        }
    }
}

/// Creates a rotating sink and appends it to `logger`'s sinks.
///
/// The returned handle stays usable for size queries and formatter swaps.
pub fn register_rotating_file(
    logger: &Logger,
    config: SizeRotationConfig,
) -> Result<Arc<RotatingFileSink>, std::io::Error> {
    let sink = Arc::new(RotatingFileSink::new(config)?);
    logger.register_sink(sink.clone());
    Ok(sink)
}

fn backup_path(path: &Path, n: u32) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{n}"));
    PathBuf::from(name)
}

fn open_append(path: &Path) -> Result<(BufWriter<File>, u64), std::io::Error> {
    let file = File::options().create(true).append(true).open(path)?;
    let size = file.metadata()?.len();
    Ok((BufWriter::new(file), size))
}

/// Writes all of `buf`, returning how many bytes `writer` accepted even when
/// it fails part way through.
fn write_counted<W: Write>(writer: &mut W, buf: &[u8]) -> (usize, Result<(), std::io::Error>) {
    let mut written = 0;
    while written < buf.len() {
        match writer.write(&buf[written..]) {
            Ok(0) => return (written, Err(std::io::ErrorKind::WriteZero.into())),
            Ok(n) => written += n,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
            Err(err) => return (written, Err(err)),
        }
    }
    (written, Ok(()))
}

fn remove_if_exists(path: &Path) {
    if path.exists()
        && let Err(err) = fs::remove_file(path)
    {
        report("remove", path, &err);
    }
}

fn rename_if_exists(from: &Path, to: &Path) {
    if from.exists()
        && let Err(err) = fs::rename(from, to)
    {
        report(&format!("rename to {}", to.display()), from, &err);
    }
}

// The logger cannot log about itself: the sink lock is held here.
fn report(action: &str, path: &Path, err: &std::io::Error) {
    eprintln!(
        "{} {action} {}: {err}",
        "Error rotating log files:".red(),
        path.display()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{level::Level, record::Origin};
    use std::thread;
    use tempfile::TempDir;

    fn record(message: &str) -> LogRecord {
        LogRecord {
            timestamp: "2024-01-01 00:00:00.000000".into(),
            level: Level::Info,
            component: "test".into(),
            origin: Origin {
                function: "f".into(),
                line: 1,
            },
            message: message.into(),
        }
    }

    fn message_only(dir: &TempDir, max_bytes: u64, max_backups: u32) -> RotatingFileSink {
        RotatingFileSink::new(
            SizeRotationConfig::new(dir.path().join("app.log"), max_bytes, max_backups)
                .with_formatter(Arc::new(format::message_only)),
        )
        .unwrap()
    }

    fn read(path: impl AsRef<Path>) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_writes_default_format() {
        let dir = TempDir::new().unwrap();
        let sink =
            RotatingFileSink::new(SizeRotationConfig::new(dir.path().join("app.log"), 4096, 2))
                .unwrap();
        sink.write(&record("hello")).unwrap();
        assert_eq!(
            read(sink.path()),
            "[2024-01-01 00:00:00.000000][INFO  ][test][f:1] hello\n"
        );
        assert_eq!(sink.current_size(), read(sink.path()).len() as u64);
    }

    #[test]
    fn test_rotation_scenario() {
        let dir = TempDir::new().unwrap();
        let sink = message_only(&dir, 100, 2);
        // 59 chars + newline = 60 bytes
        let first = "a".repeat(59);
        let second = "b".repeat(59);
        sink.write(&record(&first)).unwrap();
        assert_eq!(sink.current_size(), 60);
        assert!(!sink.backup_path(1).exists());

        sink.write(&record(&second)).unwrap();
        assert_eq!(read(sink.backup_path(1)), format!("{first}\n"));
        assert_eq!(read(sink.path()), format!("{second}\n"));
        assert_eq!(sink.current_size(), 60);
        assert!(!sink.backup_path(2).exists());
    }

    #[test]
    fn test_trigger_boundary() {
        let dir = TempDir::new().unwrap();
        let sink = message_only(&dir, 10, 3);
        sink.write(&record("1234")).unwrap(); // 5 bytes
        sink.write(&record("abcd")).unwrap(); // 10 == max, no rotation
        assert!(!sink.backup_path(1).exists());
        assert_eq!(sink.current_size(), 10);

        sink.write(&record("x")).unwrap(); // 12 > 10
        assert_eq!(read(sink.backup_path(1)), "1234\nabcd\n");
        assert_eq!(read(sink.path()), "x\n");
        assert_eq!(sink.current_size(), 2);
    }

    #[test]
    fn test_backup_chain_shifting() {
        let dir = TempDir::new().unwrap();
        let sink = message_only(&dir, 4, 3);
        // every write after the first overflows, so writes 2..=5 rotate four times
        for message in ["g0x", "g1x", "g2x", "g3x", "g4x"] {
            sink.write(&record(message)).unwrap();
        }
        assert_eq!(read(sink.path()), "g4x\n");
        assert_eq!(read(sink.backup_path(1)), "g3x\n");
        assert_eq!(read(sink.backup_path(2)), "g2x\n");
        assert_eq!(read(sink.backup_path(3)), "g1x\n");
        assert!(!sink.backup_path(4).exists());
    }

    #[test]
    fn test_zero_backups_discards_rotated_file() {
        let dir = TempDir::new().unwrap();
        let sink = message_only(&dir, 4, 0);
        sink.write(&record("one")).unwrap();
        sink.write(&record("two")).unwrap();
        assert_eq!(read(sink.path()), "two\n");
        assert!(!sink.backup_path(1).exists());
    }

    #[test]
    fn test_oversized_line_into_empty_file() {
        let dir = TempDir::new().unwrap();
        let sink = message_only(&dir, 8, 2);
        let long = "z".repeat(20);
        // 0 + 21 > 8 still rotates once, moving the empty file to `.1`
        sink.write(&record(&long)).unwrap();
        assert_eq!(read(sink.backup_path(1)), "");
        assert_eq!(read(sink.path()), format!("{long}\n"));
        assert_eq!(sink.current_size(), 21);

        sink.write(&record("next")).unwrap();
        assert_eq!(read(sink.backup_path(2)), "");
        assert_eq!(read(sink.backup_path(1)), format!("{long}\n"));
        assert_eq!(read(sink.path()), "next\n");
        assert_eq!(sink.current_size(), 5);
    }

    #[test]
    fn test_failed_reopen_is_returned_then_retried() {
        let dir = TempDir::new().unwrap();
        let logs = dir.path().join("logs");
        let sink = RotatingFileSink::new(
            SizeRotationConfig::new(logs.join("app.log"), 10, 2)
                .with_formatter(Arc::new(format::message_only)),
        )
        .unwrap();
        sink.write(&record("123456789")).unwrap();
        assert_eq!(sink.current_size(), 10);

        fs::remove_dir_all(&logs).unwrap();
        assert!(sink.write(&record("lost")).is_err());

        fs::create_dir_all(&logs).unwrap();
        sink.write(&record("back")).unwrap();
        assert_eq!(sink.current_size(), 5);
        assert_eq!(read(sink.path()), "back\n");
    }

    /// Accepts at most `limit` bytes, a few at a time, then fails.
    struct Choking {
        taken: Vec<u8>,
        limit: usize,
    }

    impl Write for Choking {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let room = self.limit - self.taken.len();
            if room == 0 {
                return Err(std::io::Error::other("disk full"));
            }
            let n = buf.len().min(room).min(3);
            self.taken.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_partial_write_is_counted() {
        let mut writer = Choking {
            taken: Vec::new(),
            limit: 5,
        };
        let (written, result) = write_counted(&mut writer, b"hello world\n");
        assert_eq!(written, 5);
        assert_eq!(result.unwrap_err().to_string(), "disk full");
        assert_eq!(writer.taken, b"hello");

        let mut writer = Choking {
            taken: Vec::new(),
            limit: 64,
        };
        assert!(matches!(write_counted(&mut writer, b"line\n"), (5, Ok(()))));
    }

    #[test]
    fn test_size_reseeding_on_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "previous run\n").unwrap(); // 13 bytes
        let sink = message_only(&dir, 100, 2);
        assert_eq!(sink.current_size(), 13);

        sink.write(&record("resumed")).unwrap();
        assert_eq!(sink.current_size(), 21);
        assert!(!sink.backup_path(1).exists());
        assert_eq!(read(&path), "previous run\nresumed\n");
    }

    #[test]
    fn test_reseeded_size_triggers_rotation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "x".repeat(95)).unwrap();
        let sink = message_only(&dir, 100, 2);
        sink.write(&record("overflow")).unwrap();
        assert_eq!(read(sink.backup_path(1)).len(), 95);
        assert_eq!(read(&path), "overflow\n");
    }

    #[test]
    fn test_set_formatter_ignores_none() {
        let dir = TempDir::new().unwrap();
        let sink = message_only(&dir, 1024, 1);
        sink.write(&record("plain")).unwrap();
        sink.set_formatter(None);
        sink.write(&record("still plain")).unwrap();
        sink.set_formatter(Some(format::formatter(format::compact_line)));
        sink.write(&record("compact")).unwrap();
        assert_eq!(
            read(sink.path()),
            "plain\nstill plain\n[INFO] compact\n"
        );
    }

    #[test]
    fn test_rejects_zero_max_bytes() {
        let dir = TempDir::new().unwrap();
        let result = RotatingFileSink::new(SizeRotationConfig::new(
            dir.path().join("app.log"),
            0,
            3,
        ));
        assert_eq!(
            result.err().unwrap().kind(),
            std::io::ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_creates_missing_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/app.log");
        let sink = RotatingFileSink::new(SizeRotationConfig::new(&path, 64, 1)).unwrap();
        sink.write(&record("hi")).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_rename_failure_is_swallowed() {
        let dir = TempDir::new().unwrap();
        let sink = message_only(&dir, 4, 2);
        // a directory squatting on `.2` makes shifting `.1` fail
        fs::create_dir_all(sink.backup_path(2).join("blocker")).unwrap();
        sink.write(&record("aaa")).unwrap();
        sink.write(&record("bbb")).unwrap();
        sink.write(&record("ccc")).unwrap();
        assert_eq!(read(sink.path()), "ccc\n");
        assert_eq!(read(sink.backup_path(1)), "bbb\n");
    }

    #[test]
    fn test_registered_through_logger() {
        let dir = TempDir::new().unwrap();
        let logger = Logger::without_sinks("svc", Level::Info);
        let sink = register_rotating_file(
            &logger,
            SizeRotationConfig::new(dir.path().join("svc.log"), 1024, 2)
                .with_formatter(format::formatter(|r| format!("{} {}", r.level, r.message))),
        )
        .unwrap();
        logger.info("main", 1, "started").unwrap();
        logger.debug1("main", 2, "filtered").unwrap();
        assert_eq!(read(sink.path()), "INFO started\n");
    }

    #[test]
    fn test_concurrent_writers_keep_lines_whole() {
        let dir = TempDir::new().unwrap();
        let sink = Arc::new(message_only(&dir, 512, 50));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let sink = sink.clone();
                thread::spawn(move || {
                    for j in 0..50 {
                        sink.write(&record(&format!("thread{i:02}-line{j:03}")))
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let mut lines = Vec::new();
        for n in (1..=50).rev() {
            let path = sink.backup_path(n);
            if path.exists() {
                let content = read(&path);
                assert!(content.len() <= 512);
                lines.extend(content.lines().map(String::from));
            }
        }
        lines.extend(read(sink.path()).lines().map(String::from));

        assert_eq!(lines.len(), 400);
        for line in &lines {
            assert_eq!(line.len(), "threadNN-lineNNN".len(), "split line {line:?}");
        }
        for i in 0..8 {
            let mine: Vec<&String> = lines
                .iter()
                .filter(|l| l.starts_with(&format!("thread{i:02}-")))
                .collect();
            let expected: Vec<String> = (0..50).map(|j| format!("thread{i:02}-line{j:03}")).collect();
            assert_eq!(mine, expected.iter().collect::<Vec<_>>());
        }
    }
}
