//! 設定の読み込み
//!
//! 優先順位（後勝ち）：既定値 → `config/default` → `config/{RUN_MODE}` →
//! `LIBRARY__*`環境変数 → `DATABASE_URL` / `PORT`。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::application::StatisticsSettings;
use crate::domain::statistics::{DEFAULT_TREND_DAYS, MAX_TREND_DAYS};

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 保存先の種類
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// プロセス内に保持（再起動で消える）
    Memory,
    Postgres,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StatisticsConfig {
    pub default_trend_days: u32,
    pub max_trend_days: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub statistics: StatisticsConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 設定ファイルと環境変数から読み込む
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(
                Environment::with_prefix("LIBRARY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("server.port", env::var("PORT").ok())?
            .build()?;

        config.try_deserialize::<Self>()?.validated()
    }

    /// ファイルや環境変数を使わず既定値だけで構成する
    pub fn from_defaults() -> Result<Self, ConfigError> {
        Self::defaults()?.build()?.try_deserialize::<Self>()?.validated()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("storage.backend", "memory")?
            .set_default("database.url", "postgres://localhost/library")?
            .set_default("database.max_connections", 5)?
            .set_default("statistics.default_trend_days", i64::from(DEFAULT_TREND_DAYS))?
            .set_default("statistics.max_trend_days", i64::from(MAX_TREND_DAYS))?
            .set_default("logging.level", "info")
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let stats = &self.statistics;
        if stats.max_trend_days == 0
            || stats.default_trend_days == 0
            || stats.default_trend_days > stats.max_trend_days
        {
            return Err(ConfigError::Message(format!(
                "statistics.default_trend_days ({}) must be between 1 and statistics.max_trend_days ({})",
                stats.default_trend_days, stats.max_trend_days
            )));
        }
        Ok(self)
    }

    pub fn statistics_settings(&self) -> StatisticsSettings {
        StatisticsSettings {
            default_trend_days: self.statistics.default_trend_days,
            max_trend_days: self.statistics.max_trend_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_defaults().unwrap();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.statistics.default_trend_days, 7);
        assert_eq!(config.statistics.max_trend_days, 366);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_statistics_settings_follow_config() {
        let config = AppConfig::from_defaults().unwrap();
        assert_eq!(config.statistics_settings(), StatisticsSettings::default());
    }

    #[test]
    fn test_validation_rejects_default_above_max() {
        let mut config = AppConfig::from_defaults().unwrap();
        config.statistics.default_trend_days = 400;

        assert!(config.validated().is_err());
    }
}
