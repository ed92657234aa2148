use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
    str::FromStr,
    sync::Mutex,
};

use log::{LevelFilter, Log, Metadata, Record};

use crate::error::{GameError, GameResult};

/// Appends diagnostics to a file; the terminal belongs to the game screen.
struct FileLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(
                file,
                "{} {:<5} {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

pub fn parse_level(level: &str) -> GameResult<LevelFilter> {
    LevelFilter::from_str(level)
        .map_err(|_| GameError::InvalidConfig(format!("unknown log level '{level}'")))
}

pub fn init(path: &Path, level: &str) -> GameResult<()> {
    let level = parse_level(level)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| GameError::Logger(format!("{}: {err}", path.display())))?;
    log::set_boxed_logger(Box::new(FileLogger {
        level,
        file: Mutex::new(file),
    }))
    .map_err(|err| GameError::Logger(err.to_string()))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level("WARN").unwrap(), LevelFilter::Warn);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::Off);
        assert!(parse_level("loud").is_err());
    }
}
