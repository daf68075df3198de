//! Configuration management for bibliodesk

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Keyboard-wedge timing heuristics
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScannerConfig {
    /// Keystrokes further apart than this start a new burst
    pub inter_key_gap_ms: u64,
    /// Delay between a completed scan and its delivery to the consumer
    pub settle_delay_ms: u64,
}

impl ScannerConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExchangeConfig {
    pub export_column_width: f64,
    pub template_column_width: f64,
    pub default_sheet_name: String,
    /// chrono format string used for date cells on export
    pub date_format: String,
    pub yes_label: String,
    pub no_label: String,
    /// Row error text when the create call reports no message
    pub unknown_error_label: String,
    /// Number of row errors shown in detail after an import
    pub error_preview_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // BIBLIODESK_SCANNER__INTER_KEY_GAP_MS=80
            .add_source(
                Environment::with_prefix("BIBLIODESK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("logging.level", env::var("LOG_LEVEL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            inter_key_gap_ms: 100,
            settle_delay_ms: 500,
        }
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            export_column_width: 50.0,
            template_column_width: 20.0,
            default_sheet_name: "Sheet1".to_string(),
            date_format: "%d.%m.%Y".to_string(),
            yes_label: "Да".to_string(),
            no_label: "Нет".to_string(),
            unknown_error_label: "Неизвестная ошибка".to_string(),
            error_preview_limit: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
