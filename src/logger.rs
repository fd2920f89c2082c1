//! Console logger behind the `log` facade.
//!
//! Entries go to stderr, either as colored lines for a terminal or as one JSON
//! object per line. An optional file sink receives the same entries without
//! color codes.

use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::config::Config;

static LOGGER: Lazy<ConsoleLogger> = Lazy::new(ConsoleLogger::default);

/// Installs the global logger. Calling it again only swaps the configuration.
pub fn init_with_config(config: LoggerConfig) -> Result<(), String> {
    if log::set_logger(&*LOGGER).is_ok() {
        LOGGER.installed.store(true, Ordering::SeqCst);
    } else if !LOGGER.installed.load(Ordering::SeqCst) {
        return Err("Another logger is already installed".to_string());
    }

    let max_level = config.level.to_level_filter();
    LOGGER.configure(config)?;
    log::set_max_level(max_level);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Trace => Color::Cyan,
            LogLevel::Debug => Color::Blue,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            LogLevel::Trace => "🔍",
            LogLevel::Debug => "🐛",
            LogLevel::Info => "🎨",
            LogLevel::Warn => "⚠️",
            LogLevel::Error => "❌",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("Unknown log level '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// One log record as written to the sinks. This is also the JSON line shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub target: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl LogEntry {
    fn from_record(record: &Record) -> Self {
        let location = match (record.file(), record.line()) {
            (Some(file), Some(line)) => Some(format!("{}:{}", file, line)),
            (Some(file), None) => Some(file.to_string()),
            _ => None,
        };
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            level: record.level().into(),
            target: record.target().to_string(),
            message: record.args().to_string(),
            location,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub colors: bool,
    pub emojis: bool,
    pub show_location: bool,
    /// `None` omits the timestamp from pretty lines.
    pub timestamp_format: Option<String>,
    pub file: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            colors: true,
            emojis: true,
            show_location: false,
            timestamp_format: Some("%Y-%m-%d %H:%M:%S%.3f".to_string()),
            file: None,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            show_location: true,
            ..Default::default()
        }
    }

    pub fn production() -> Self {
        Self {
            format: LogFormat::Json,
            colors: false,
            emojis: false,
            ..Default::default()
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.colors = enabled;
        self
    }

    pub fn with_json(mut self, enabled: bool) -> Self {
        self.format = if enabled { LogFormat::Json } else { LogFormat::Pretty };
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Applies `LOGOMOCK_LOG`, `LOGOMOCK_LOG_FORMAT`, `LOGOMOCK_LOG_FILE` and `NO_COLOR`.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(level) = lookup("LOGOMOCK_LOG").and_then(|v| v.parse().ok()) {
            self = self.with_level(level);
        }
        match lookup("LOGOMOCK_LOG_FORMAT").as_deref().map(str::trim) {
            Some("json") => self = self.with_json(true),
            Some("pretty") => self = self.with_json(false),
            _ => {}
        }
        if let Some(path) = lookup("LOGOMOCK_LOG_FILE").filter(|p| !p.trim().is_empty()) {
            self = self.with_file(path);
        }
        if lookup("NO_COLOR").is_some() {
            self = self.with_colors(false);
        }
        self
    }

    fn render(&self, entry: &LogEntry, colors: bool) -> String {
        if self.format == LogFormat::Json {
            return serde_json::to_string(entry).unwrap_or_default();
        }

        let mut line = String::new();
        if let Some(format) = &self.timestamp_format {
            let stamp = entry.timestamp.format(format).to_string();
            if colors {
                line.push_str(&format!("{} ", stamp.bright_black()));
            } else {
                line.push_str(&format!("{} ", stamp));
            }
        }

        let level = if self.emojis {
            format!("{} {}", entry.level.emoji(), entry.level.label())
        } else {
            entry.level.label().to_string()
        };
        if colors {
            line.push_str(&format!("[{}] ", level.color(entry.level.color()).bold()));
            line.push_str(&format!("{}: ", entry.target.bright_blue()));
        } else {
            line.push_str(&format!("[{}] {}: ", level, entry.target));
        }

        line.push_str(&entry.message);

        if let (true, Some(location)) = (self.show_location, &entry.location) {
            if colors {
                line.push_str(&format!(" ({})", location.bright_black()));
            } else {
                line.push_str(&format!(" ({})", location));
            }
        }
        line
    }
}

#[derive(Default)]
pub struct ConsoleLogger {
    config: Mutex<LoggerConfig>,
    sink: Mutex<Option<File>>,
    installed: AtomicBool,
}

impl ConsoleLogger {
    pub fn new(config: LoggerConfig) -> Result<Self, String> {
        let logger = Self::default();
        logger.configure(config)?;
        Ok(logger)
    }

    /// Replaces the configuration and reopens the file sink.
    pub fn configure(&self, config: LoggerConfig) -> Result<(), String> {
        let sink = match &config.file {
            Some(path) => Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| format!("Cannot open log file {}: {}", path.display(), e))?,
            ),
            None => None,
        };

        if let Ok(mut guard) = self.sink.lock() {
            *guard = sink;
        }
        if let Ok(mut guard) = self.config.lock() {
            *guard = config;
        }
        Ok(())
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.config
            .lock()
            .map(|config| metadata.level() <= config.level.to_level_filter())
            .unwrap_or(true)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = LogEntry::from_record(record);
        let Ok(config) = self.config.lock() else {
            return;
        };

        // stderr keeps stdout free for command output
        eprintln!("{}", config.render(&entry, config.colors));

        if let Ok(mut guard) = self.sink.lock() {
            if let Some(file) = guard.as_mut() {
                let _ = writeln!(file, "{}", config.render(&entry, false));
            }
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
        if let Ok(mut guard) = self.sink.lock() {
            if let Some(file) = guard.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

/// Measures one operation. Only [`Timer::finish`] logs; a timer dropped on an
/// error path stays silent.
pub struct Timer {
    name: &'static str,
    start: Instant,
}

impl Timer {
    pub fn start(name: &'static str) -> Self {
        log::debug!("⏱️  Starting {}", name);
        Self {
            name,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        log::info!("⏱️  {} completed in {}ms", self.name, elapsed.as_millis());
        elapsed
    }
}

/// Masks all but the first four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", visible)
    }
}

pub fn log_startup_info(app_name: &str, version: &str) {
    log::info!("🚀 Starting {} v{}", app_name, version);
}

pub fn log_config_info(config: &Config) {
    log::info!("⚙️  Configuration loaded:");
    log::info!("   Base URL: {}", config.gemini.base_url);
    log::info!("   Image model: {}", config.gemini.image_model);
    log::info!("   Text model: {}", config.gemini.text_model);
    log::info!(
        "   API key: {}",
        config
            .gemini
            .api_key
            .as_deref()
            .map(mask_secret)
            .unwrap_or_else(|| "❌ not set".to_string())
    );
    log::info!(
        "   Upload bounds: {}x{} (JPEG quality {})",
        config.upload.max_width,
        config.upload.max_height,
        config.upload.jpeg_quality
    );
}
