use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::RwLock;
use std::time::{Duration, Instant};

static CONSOLE_LOGGER: Lazy<ConsoleLogger> = Lazy::new(ConsoleLogger::new);

pub fn init() -> Result<(), String> {
    init_with_config(LoggerConfig::default())
}

/// Installs the global logger. Calling it again only swaps the configuration.
pub fn init_with_config(config: LoggerConfig) -> Result<(), String> {
    let max_level = config.min_level.to_level_filter();
    CONSOLE_LOGGER.update_config(config);

    // A second set_logger fails; the new config has already been applied.
    let _ = log::set_logger(&*CONSOLE_LOGGER);
    log::set_max_level(max_level);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
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
            LogLevel::Info => "🍌",
            LogLevel::Warn => "⚠️",
            LogLevel::Error => "❌",
        }
    }

    pub fn as_str(&self) -> &'static str {
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

    pub fn from_log_level(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

/// One emitted line, serialized as-is when JSON output is on.
#[derive(Debug, Clone, Serialize)]
pub struct LogLine {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub target: String,
    pub message: String,
}

impl LogLine {
    fn from_record(record: &Record) -> Self {
        Self {
            timestamp: Utc::now(),
            level: LogLevel::from_log_level(record.level()),
            target: record.target().to_string(),
            message: record.args().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub show_colors: bool,
    pub show_emojis: bool,
    pub show_target: bool,
    pub output_json: bool,
    pub timestamp_format: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: true,
            show_emojis: true,
            show_target: true,
            output_json: false,
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    pub fn production() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: false,
            show_emojis: false,
            output_json: true,
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            show_colors: true,
            show_emojis: true,
            output_json: false,
            ..Default::default()
        }
    }
}

/// Writes to stderr so stdout stays free for CLI results.
pub struct ConsoleLogger {
    config: RwLock<LoggerConfig>,
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self {
            config: RwLock::new(LoggerConfig::default()),
        }
    }

    pub fn update_config(&self, new_config: LoggerConfig) {
        if let Ok(mut config) = self.config.write() {
            *config = new_config;
        }
    }

    fn format_line(&self, line: &LogLine, config: &LoggerConfig) -> String {
        if config.output_json {
            return serde_json::to_string(line).unwrap_or_default();
        }

        let mut output = String::new();

        let timestamp = line.timestamp.format(&config.timestamp_format).to_string();
        if config.show_colors {
            output.push_str(&format!("{} ", timestamp.bright_black()));
        } else {
            output.push_str(&format!("{} ", timestamp));
        }

        let level = if config.show_emojis {
            format!("{} {}", line.level.emoji(), line.level.as_str())
        } else {
            line.level.as_str().to_string()
        };
        if config.show_colors {
            output.push_str(&format!("[{}] ", level.color(line.level.color()).bold()));
        } else {
            output.push_str(&format!("[{}] ", level));
        }

        if config.show_target && !line.target.is_empty() {
            if config.show_colors {
                output.push_str(&format!("{}: ", line.target.bright_blue()));
            } else {
                output.push_str(&format!("{}: ", line.target));
            }
        }

        output.push_str(&line.message);
        output
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        match self.config.read() {
            Ok(config) => metadata.level() <= config.min_level.to_level_filter(),
            Err(_) => true,
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(config) = self.config.read() {
            let line = LogLine::from_record(record);
            let _ = writeln!(io::stderr(), "{}", self.format_line(&line, &config));
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Logs the elapsed time when dropped.
pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn new(name: &str) -> Self {
        log::debug!("⏱️  Starting timer: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::info!(
            "⏱️  '{}' finished in {}ms",
            self.name,
            self.elapsed().as_millis()
        );
    }
}

pub fn log_startup_info(app_name: &str, version: &str) {
    log::info!("🚀 Starting {} v{}", app_name, version);
}

/// Never logs the key itself, only whether one is set.
pub fn log_config_info(config: &crate::config::Config) {
    log::info!("⚙️  Configuration loaded:");
    log::info!("   Endpoint: {}", config.nanobanana.endpoint());
    log::info!("   Timeout: {}s", config.nanobanana.timeout_secs());
    log::info!(
        "   API key: {}",
        if config.nanobanana.has_api_key() { "✅" } else { "❌" }
    );
}
