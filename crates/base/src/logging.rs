use {
    anyhow::Result,
    log::{LevelFilter, Log, Metadata, Record},
    std::{
        fs::{File, OpenOptions, create_dir_all},
        io::Write,
        path::PathBuf,
        sync::Mutex,
        time::{SystemTime, UNIX_EPOCH},
    },
};

/// Environment variable that overrides the build-dependent default level.
pub const LOG_LEVEL_ENV: &str = "BACKEND_LOG";

/// Writes records to stdout.
pub struct StdoutLogger {
    level: LevelFilter,
}

/// Writes records to `<dir>/<YYYY-MM-DD>.log`, switching files when the day changes.
pub struct FileLogger {
    level: LevelFilter,
    state: Mutex<FileLoggerState>,
}

struct FileLoggerState {
    dir: PathBuf,
    current_date: String,
    file: File,
}

fn format_record(record: &Record) -> String {
    format!(
        "{} [{}] [thread:{:?}] {} {}:{} - {}",
        format_timestamp(),
        record.level(),
        std::thread::current().id(),
        record.target(),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
        record.args()
    )
}

impl Log for StdoutLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{}", format_record(record));
        }
    }

    fn flush(&self) {
        std::io::stdout().flush().ok();
    }
}

impl FileLogger {
    pub fn new(dir: impl Into<PathBuf>, level: LevelFilter) -> Result<Self> {
        let dir = dir.into();
        create_dir_all(&dir)?;
        let current_date = format_today();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(format!("{}.log", current_date)))?;
        Ok(FileLogger {
            level,
            state: Mutex::new(FileLoggerState {
                dir,
                current_date,
                file,
            }),
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let today = format_today();
        if today != state.current_date {
            let new_path = state.dir.join(format!("{}.log", today));
            match OpenOptions::new().create(true).append(true).open(&new_path) {
                Ok(new_file) => {
                    state.file = new_file;
                    state.current_date = today;
                }
                Err(error) => {
                    eprintln!("Failed to open new log file {:?}: {}", new_path, error);
                }
            }
        }
        let line = format!("{}\n", format_record(record));
        if let Err(error) = state.file.write_all(line.as_bytes()) {
            eprintln!("Failed to write to log file: {}", error);
            eprintln!("{}", line.trim_end());
        }
    }

    fn flush(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.file.flush().ok();
    }
}

/// Parse a level name (`off`, `error`, `warn`, `info`, `debug`, `trace`), case-insensitive.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// Debug in debug builds, Info in release, unless `BACKEND_LOG` names a level.
pub fn default_level() -> LevelFilter {
    std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|value| parse_level(&value))
        .unwrap_or(if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
}

/// Install [`StdoutLogger`] as the global logger. Later calls are ignored.
pub fn init_stdout_logger() {
    let level = default_level();
    let logger: &'static StdoutLogger = Box::leak(Box::new(StdoutLogger { level }));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

/// Install [`FileLogger`] writing under `dir` as the global logger. Later calls are ignored.
pub fn init_file_logger(dir: impl Into<PathBuf>) -> Result<()> {
    let level = default_level();
    let logger: &'static FileLogger = Box::leak(Box::new(FileLogger::new(dir, level)?));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
    Ok(())
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS`.
pub fn format_timestamp() -> String {
    let secs = unix_seconds();
    let (year, month, day) = civil_from_days((secs / 86400) as i64);
    let time_of_day = secs % 86400;
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        year,
        month,
        day,
        time_of_day / 3600,
        (time_of_day % 3600) / 60,
        time_of_day % 60
    )
}

/// Current UTC date as `YYYY-MM-DD`.
pub fn format_today() -> String {
    let (year, month, day) = civil_from_days((unix_seconds() / 86400) as i64);
    format!("{:04}-{:02}-{:02}", year, month, day)
}

// Howard Hinnant's days-to-civil algorithm.
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_civil_from_days() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        assert_eq!(civil_from_days(11016), (2000, 2, 29));
        assert_eq!(civil_from_days(20088), (2024, 12, 31));
    }

    #[test]
    fn test_format_timestamp_structure() {
        let ts = format_timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], "T");
        assert_eq!(&ts[16..17], ":");
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("WARN"), Some(LevelFilter::Warn));
        assert_eq!(parse_level(" debug "), Some(LevelFilter::Debug));
        assert_eq!(parse_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_file_logger_filters_and_rolls_over() {
        let dir = std::env::temp_dir().join(format!("backend-log-test-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let logger = FileLogger::new(&dir, LevelFilter::Info).expect("create logger");
        {
            let mut state = logger.state.lock().unwrap();
            state.current_date = "1999-01-01".to_string();
            state.file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("1999-01-01.log"))
                .unwrap();
        }

        let debug = log::RecordBuilder::new()
            .level(log::Level::Debug)
            .target("test")
            .args(format_args!("hidden debug line"))
            .build();
        logger.log(&debug);

        let info = log::RecordBuilder::new()
            .level(log::Level::Info)
            .target("test")
            .file(Some("session.rs"))
            .line(Some(7))
            .args(format_args!("model compiled"))
            .build();
        logger.log(&info);

        let today = std::fs::read_to_string(dir.join(format!("{}.log", format_today()))).unwrap();
        assert!(today.contains("model compiled"));
        assert!(today.contains("session.rs:7"));
        assert!(!today.contains("hidden debug line"));
        assert_eq!(logger.state.lock().unwrap().current_date, format_today());

        std::fs::remove_dir_all(&dir).ok();
    }
}
