//! different utility modules used throughout the project
/// logging setup on top of simplelog
pub mod logger;
/// engine settings loaded from a TOML file
pub mod engine_config;
