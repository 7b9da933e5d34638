//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file. Circuit breaker tuning falls
//! back to `PICKLOCK_CIRCUIT_*` environment variables when the file is
//! silent, so deployed cron jobs can be retuned without a config rollout.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::breaker::BreakerConfig;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub circuits: CircuitSettings,
    #[serde(default)]
    pub io: IoConfig,
}

/// SQLite database location.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "picklock.db".to_string()
}

/// Where public JSON artifacts are written.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("exports")
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format: pretty or json.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// Circuit breaker tuning shared by both breaker variants.
///
/// Pipeline circuits (warehouse reads) cool down much longer than
/// external-service circuits: a missing warehouse partition recovers on the
/// upstream schedule, not in seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct CircuitSettings {
    /// Consecutive failures before a circuit opens.
    #[serde(default = "default_circuit_threshold")]
    pub threshold: u32,
    /// Cooldown before a pipeline circuit probes half-open.
    #[serde(default = "default_pipeline_timeout_secs")]
    pub pipeline_timeout_secs: u64,
    /// Cooldown before an external-service circuit probes half-open.
    #[serde(default = "default_service_timeout_secs")]
    pub service_timeout_secs: u64,
    /// Successful half-open trials required to close a circuit.
    #[serde(default = "default_half_open_max_calls")]
    pub half_open_max_calls: u32,
}

fn default_circuit_threshold() -> u32 {
    env_u32("PICKLOCK_CIRCUIT_THRESHOLD", 5)
}

fn default_pipeline_timeout_secs() -> u64 {
    env_u64("PICKLOCK_CIRCUIT_TIMEOUT_SECS", 30 * 60)
}

fn default_service_timeout_secs() -> u64 {
    env_u64("PICKLOCK_CIRCUIT_SERVICE_TIMEOUT_SECS", 5 * 60)
}

fn default_half_open_max_calls() -> u32 {
    env_u32("PICKLOCK_CIRCUIT_HALF_OPEN_CALLS", 1)
}

/// I/O boundary tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct IoConfig {
    /// Per-query timeout for warehouse reads.
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,
}

fn default_query_timeout_secs() -> u64 {
    30
}

fn env_u32(name: &str, fallback: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}

fn env_u64(name: &str, fallback: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    ///
    /// A present-but-malformed file is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.database.path.is_empty() {
            return Err(ConfigError::MissingField {
                field: "database.path",
            }
            .into());
        }
        if self.circuits.threshold == 0 {
            return Err(ConfigError::InvalidValue {
                field: "circuits.threshold",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if self.circuits.half_open_max_calls == 0 {
            return Err(ConfigError::InvalidValue {
                field: "circuits.half_open_max_calls",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        match self.logging.format.as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("expected 'pretty' or 'json', got '{other}'"),
            }
            .into()),
        }
    }

    /// Initialize the global tracing subscriber from the logging section.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.logging.level.clone()));

        if self.logging.format == "json" {
            let _ = fmt().with_env_filter(filter).json().try_init();
        } else {
            let _ = fmt().with_env_filter(filter).try_init();
        }
    }

    /// Breaker config for pipeline circuits (warehouse reads).
    #[must_use]
    pub fn pipeline_breaker(&self) -> BreakerConfig {
        BreakerConfig {
            threshold: self.circuits.threshold,
            cooldown: Duration::from_secs(self.circuits.pipeline_timeout_secs),
            half_open_max_calls: self.circuits.half_open_max_calls,
        }
    }

    /// Breaker config for external-service circuits (artifact storage).
    #[must_use]
    pub fn service_breaker(&self) -> BreakerConfig {
        BreakerConfig {
            threshold: self.circuits.threshold,
            cooldown: Duration::from_secs(self.circuits.service_timeout_secs),
            half_open_max_calls: self.circuits.half_open_max_calls,
        }
    }

    /// Per-query timeout for warehouse reads.
    #[must_use]
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.io.query_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                path: default_db_path(),
            },
            export: ExportConfig {
                dir: default_export_dir(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
            circuits: CircuitSettings::default(),
            io: IoConfig {
                query_timeout_secs: default_query_timeout_secs(),
            },
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for CircuitSettings {
    fn default() -> Self {
        Self {
            threshold: default_circuit_threshold(),
            pipeline_timeout_secs: default_pipeline_timeout_secs(),
            service_timeout_secs: default_service_timeout_secs(),
            half_open_max_calls: default_half_open_max_calls(),
        }
    }
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            query_timeout_secs: default_query_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.database.path, "picklock.db");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.io.query_timeout_secs, 30);
        assert!(config.circuits.pipeline_timeout_secs >= config.circuits.service_timeout_secs);
    }

    #[test]
    fn parses_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [database]
            path = "/tmp/test.db"

            [circuits]
            threshold = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.database.path, "/tmp/test.db");
        assert_eq!(config.circuits.threshold, 3);
        // Untouched sections keep defaults.
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn validate_rejects_zero_threshold() {
        let config: Config = toml::from_str(
            r#"
            [circuits]
            threshold = 0
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_log_format() {
        let config: Config = toml::from_str(
            r#"
            [logging]
            format = "xml"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn env_fallbacks_parse_numbers() {
        std::env::set_var("PICKLOCK_TEST_ENV_U32", "7");
        assert_eq!(env_u32("PICKLOCK_TEST_ENV_U32", 5), 7);
        std::env::remove_var("PICKLOCK_TEST_ENV_U32");

        assert_eq!(env_u32("PICKLOCK_TEST_ENV_U32_MISSING", 5), 5);
        std::env::set_var("PICKLOCK_TEST_ENV_U64_BAD", "not-a-number");
        assert_eq!(env_u64("PICKLOCK_TEST_ENV_U64_BAD", 9), 9);
        std::env::remove_var("PICKLOCK_TEST_ENV_U64_BAD");
    }

    #[test]
    fn breaker_configs_differ_by_cooldown() {
        let config = Config::default();
        let pipeline = config.pipeline_breaker();
        let service = config.service_breaker();
        assert_eq!(pipeline.threshold, service.threshold);
        assert!(pipeline.cooldown >= service.cooldown);
    }
}
