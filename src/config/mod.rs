//! Configuration module for the blog manager.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;
use crate::render::TimeFormat;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file backing the key-value store
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Key under which the serialized post sequence is stored
    pub storage_key: String,
    /// How update times are displayed
    pub time_format: TimeFormat,
    /// Display offset from UTC, in minutes
    pub utc_offset_minutes: i32,
    /// Refuse to start when the stored value cannot be read
    pub strict_load: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: "./data/blog.sqlite".into(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            log_level: "info".to_string(),
            storage_key: "blogs".to_string(),
            time_format: TimeFormat::Long,
            utc_offset_minutes: 0,
            strict_load: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let db_path = env::var("BLOG_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let bind_addr = match env::var("BLOG_BIND_ADDR") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid BLOG_BIND_ADDR: {}", raw)))?,
            Err(_) => defaults.bind_addr,
        };

        let log_level = env::var("BLOG_LOG_LEVEL").unwrap_or(defaults.log_level);

        let storage_key = env::var("BLOG_STORAGE_KEY").unwrap_or(defaults.storage_key);
        if storage_key.trim().is_empty() {
            return Err(AppError::Config("BLOG_STORAGE_KEY must not be empty".into()));
        }

        let time_format = match env::var("BLOG_TIME_FORMAT") {
            Ok(raw) => TimeFormat::parse(&raw)
                .ok_or_else(|| AppError::Config(format!("Invalid BLOG_TIME_FORMAT: {}", raw)))?,
            Err(_) => defaults.time_format,
        };

        let utc_offset_minutes = match env::var("BLOG_UTC_OFFSET_MINUTES") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                AppError::Config(format!("Invalid BLOG_UTC_OFFSET_MINUTES: {}", raw))
            })?,
            Err(_) => defaults.utc_offset_minutes,
        };

        let strict_load = match env::var("BLOG_STRICT_LOAD") {
            Ok(raw) => parse_bool(&raw)
                .ok_or_else(|| AppError::Config(format!("Invalid BLOG_STRICT_LOAD: {}", raw)))?,
            Err(_) => defaults.strict_load,
        };

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            storage_key,
            time_format,
            utc_offset_minutes,
            strict_load,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
