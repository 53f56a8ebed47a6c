//! Engine configuration read from a small TOML document:
//!
//! ```toml
//! [logging]
//! level = "info"
//! file = "differentiator.log"
//!
//! [engine]
//! power_rule = "general"
//! complex = false
//! ```
//! Missing sections and keys keep their defaults, values of the wrong type or
//! unknown names are rejected.
use crate::Utils::logger::parse_level;
use crate::symbolic::symbolic_engine_derivatives::PowerRule;
use log::{LevelFilter, debug};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid value `{value}` for {key}, expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
    pub power_rule: PowerRule,
    /// evaluate and differentiate over complex numbers
    pub complex: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            log_level: LevelFilter::Warn,
            log_file: None,
            power_rule: PowerRule::default(),
            complex: false,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let table = text.parse::<toml::Table>()?;
        let mut config = EngineConfig::default();

        if let Some(logging) = section(&table, "logging")? {
            if let Some(level) = string_value(logging, "logging", "level")? {
                config.log_level = parse_level(level)?;
            }
            if let Some(file) = string_value(logging, "logging", "file")? {
                config.log_file = Some(PathBuf::from(file));
            }
        }
        if let Some(engine) = section(&table, "engine")? {
            if let Some(rule) = string_value(engine, "engine", "power_rule")? {
                config.power_rule =
                    rule.parse::<PowerRule>()
                        .map_err(|_| ConfigError::InvalidValue {
                            key: "engine.power_rule".to_string(),
                            value: rule.to_string(),
                            expected: "textual or general",
                        })?;
            }
            if let Some(value) = engine.get("complex") {
                config.complex = value.as_bool().ok_or_else(|| ConfigError::InvalidValue {
                    key: "engine.complex".to_string(),
                    value: value.to_string(),
                    expected: "true or false",
                })?;
            }
        }
        debug!("engine configuration: {:?}", config);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

fn section<'a>(table: &'a toml::Table, name: &str) -> Result<Option<&'a toml::Table>, ConfigError> {
    match table.get(name) {
        None => Ok(None),
        Some(value) => value
            .as_table()
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: name.to_string(),
                value: value.to_string(),
                expected: "a table",
            }),
    }
}

fn string_value<'a>(
    table: &'a toml::Table,
    section: &str,
    key: &str,
) -> Result<Option<&'a str>, ConfigError> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: format!("{}.{}", section, key),
                value: value.to_string(),
                expected: "a string",
            }),
    }
}
