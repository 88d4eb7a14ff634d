//! File sink for the logger

use std::fs::{File, OpenOptions};
use std::sync::Mutex;

use crate::logger::config::FileConfig;
use crate::logger::error::LoggerError;

/// Opens the configured log file, creating parent directories on demand.
///
/// The returned `Mutex<File>` is used directly as a `MakeWriter`.
pub(crate) fn open_log_file(config: &FileConfig) -> Result<Mutex<File>, LoggerError> {
    if let Some(parent) = config.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut options = OpenOptions::new();
    options.create(true);
    if config.append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }

    Ok(Mutex::new(options.open(&config.path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let config = FileConfig {
            enabled: true,
            path: dir.path().join("nested/deeper/service.log"),
            ..FileConfig::default()
        };

        let file = open_log_file(&config).unwrap();
        writeln!(file.lock().unwrap(), "hello").unwrap();
        assert!(config.path.exists());
    }

    #[test]
    fn test_truncate_mode_discards_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("service.log");
        std::fs::write(&path, "old line\n").unwrap();

        let config = FileConfig {
            enabled: true,
            path: path.clone(),
            append: false,
            ..FileConfig::default()
        };
        drop(open_log_file(&config).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
