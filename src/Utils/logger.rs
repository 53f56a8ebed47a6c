//! logging setup: terminal logger plus an optional log file, both on the same level
use crate::Utils::engine_config::ConfigError;
use log::{LevelFilter, info};
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::Path;

/// level names accepted in configuration files and on the command line
pub fn parse_level(level: &str) -> Result<LevelFilter, ConfigError> {
    match level.trim().to_lowercase().as_str() {
        "off" | "none" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        _ => Err(ConfigError::InvalidValue {
            key: "logging.level".to_string(),
            value: level.to_string(),
            expected: "off, error, warn, info, debug or trace",
        }),
    }
}

/// Initialize the global logger.
///
/// Terminal output goes to stderr for every level (`TerminalMode::Stderr`) so that
/// stdout carries only the result line. A global logger can be set once per process,
/// later calls keep the first one.
pub fn init_logger(level: LevelFilter, log_file: Option<&Path>) -> Result<(), ConfigError> {
    if level == LevelFilter::Off {
        return Ok(());
    }
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    // Console logger
    loggers.push(TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ));
    // File logger
    if let Some(path) = log_file {
        let file = File::create(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }
    match CombinedLogger::init(loggers) {
        Ok(()) => info!("logger initialized with level {}", level),
        Err(_) => info!("logger already initialized"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level(" WARN ").unwrap(), LevelFilter::Warn);
        assert_eq!(parse_level("none").unwrap(), LevelFilter::Off);
        assert!(matches!(
            parse_level("loud"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_init_logger_with_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.log");
        init_logger(LevelFilter::Info, Some(&path)).unwrap();
        // the second call is harmless
        init_logger(LevelFilter::Info, None).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_init_logger_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("engine.log");
        assert!(matches!(
            init_logger(LevelFilter::Info, Some(&path)),
            Err(ConfigError::Io { .. })
        ));
    }
}
