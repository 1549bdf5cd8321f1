use std::{env, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;

/// Error returned when parsing an unknown log format.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown log format '{0}', expected 'text' or 'json'")]
pub struct UnknownLogFormat(String);

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(UnknownLogFormat(s.to_string())),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Seconds between cache statistics reports (default: 300)
    pub metrics_interval_seconds: u64,
    /// JSON file of daily records loaded at startup (default: none)
    pub seed_path: Option<PathBuf>,
    /// Log output format (default: text)
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `METRICS_INTERVAL_SECONDS` - Seconds between cache statistics reports (default: 300)
    /// - `SEED_PATH` - JSON array of daily records to load at startup (default: none)
    /// - `LOG_FORMAT` - `text` or `json` (default: text)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self {
            metrics_interval_seconds: env::var("METRICS_INTERVAL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&secs| secs > 0)
                .unwrap_or(300),
            seed_path: env::var("SEED_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            log_format: env::var("LOG_FORMAT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// Get the metrics interval as a Duration.
    pub fn metrics_interval(&self) -> Duration {
        Duration::from_secs(self.metrics_interval_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_interval_conversion() {
        let config = Config {
            metrics_interval_seconds: 60,
            seed_path: None,
            log_format: LogFormat::Text,
        };

        assert_eq!(config.metrics_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_parse_log_format() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!(" Text ".parse::<LogFormat>(), Ok(LogFormat::Text));
        assert_eq!(
            "yaml".parse::<LogFormat>(),
            Err(UnknownLogFormat("yaml".to_string()))
        );
    }

    #[test]
    fn test_env_values() {
        // Single test touching the environment so parallel tests do not race
        env::remove_var("METRICS_INTERVAL_SECONDS");
        env::remove_var("SEED_PATH");
        env::remove_var("LOG_FORMAT");

        let config = Config::from_env();
        assert_eq!(config.metrics_interval_seconds, 300);
        assert_eq!(config.seed_path, None);
        assert_eq!(config.log_format, LogFormat::Text);

        env::set_var("METRICS_INTERVAL_SECONDS", "15");
        env::set_var("SEED_PATH", "records.json");
        env::set_var("LOG_FORMAT", "json");

        let config = Config::from_env();
        assert_eq!(config.metrics_interval_seconds, 15);
        assert_eq!(config.seed_path, Some(PathBuf::from("records.json")));
        assert_eq!(config.log_format, LogFormat::Json);

        // Zero would make the interval timer panic
        env::set_var("METRICS_INTERVAL_SECONDS", "0");
        assert_eq!(Config::from_env().metrics_interval_seconds, 300);

        env::remove_var("METRICS_INTERVAL_SECONDS");
        env::remove_var("SEED_PATH");
        env::remove_var("LOG_FORMAT");
    }
}
