use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::analytics::DEFAULT_ANALYTICS_CAPACITY;
use crate::batch::{DEFAULT_CHUNK_DELAY, DEFAULT_CHUNK_SIZE};
use crate::notify::{WebhookKind, WebhookTarget};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    /// Internal failure details are only returned to callers outside production.
    pub fn exposes_internal_errors(&self) -> bool {
        !matches!(self, Self::Production)
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub analytics: AnalyticsConfig,
    pub batch: BatchConfig,
    pub webhooks: WebhookConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let capacity = numeric_var("ANALYTICS_CAPACITY", DEFAULT_ANALYTICS_CAPACITY)?;
        let chunk_size = numeric_var("BATCH_CHUNK_SIZE", DEFAULT_CHUNK_SIZE)?;
        let chunk_delay_ms = numeric_var(
            "BATCH_CHUNK_DELAY_MS",
            DEFAULT_CHUNK_DELAY.as_millis() as u64,
        )?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            analytics: AnalyticsConfig { capacity },
            batch: BatchConfig {
                chunk_size,
                chunk_delay: Duration::from_millis(chunk_delay_ms),
            },
            webhooks: WebhookConfig {
                slack_url: optional_var("SLACK_WEBHOOK_URL"),
                crm_url: optional_var("CRM_WEBHOOK_URL"),
                crm_token: optional_var("CRM_WEBHOOK_TOKEN"),
            },
        })
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn numeric_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match optional_var(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Retention of the in-memory analytics store.
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    pub capacity: usize,
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub chunk_size: usize,
    pub chunk_delay: Duration,
}

/// Outbound webhook destinations; unset URLs disable that destination.
#[derive(Debug, Clone, Default)]
pub struct WebhookConfig {
    pub slack_url: Option<String>,
    pub crm_url: Option<String>,
    pub crm_token: Option<String>,
}

impl WebhookConfig {
    pub fn targets(&self) -> Vec<WebhookTarget> {
        let mut targets = Vec::new();
        if let Some(url) = &self.slack_url {
            targets.push(WebhookTarget {
                kind: WebhookKind::Chat,
                url: url.clone(),
                bearer_token: None,
            });
        }
        if let Some(url) = &self.crm_url {
            targets.push(WebhookTarget {
                kind: WebhookKind::Crm,
                url: url.clone(),
                bearer_token: self.crm_token.clone(),
            });
        }
        targets
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    const KEYS: [&str; 10] = [
        "APP_ENV",
        "APP_HOST",
        "APP_PORT",
        "APP_LOG_LEVEL",
        "ANALYTICS_CAPACITY",
        "BATCH_CHUNK_SIZE",
        "BATCH_CHUNK_DELAY_MS",
        "SLACK_WEBHOOK_URL",
        "CRM_WEBHOOK_URL",
        "CRM_WEBHOOK_TOKEN",
    ];

    fn reset_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.analytics.capacity, 10_000);
        assert_eq!(config.batch.chunk_size, 5);
        assert_eq!(config.batch.chunk_delay, Duration::from_millis(1_000));
        assert!(config.webhooks.targets().is_empty());
        assert!(config.environment.exposes_internal_errors());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn rejects_non_numeric_capacity() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ANALYTICS_CAPACITY", "lots");
        let error = AppConfig::load().expect_err("capacity rejected");
        assert!(matches!(
            error,
            ConfigError::InvalidNumber {
                key: "ANALYTICS_CAPACITY"
            }
        ));
        env::remove_var("ANALYTICS_CAPACITY");
    }

    #[test]
    fn builds_webhook_targets_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        env::set_var("SLACK_WEBHOOK_URL", "https://hooks.example.com/T000");
        env::set_var("CRM_WEBHOOK_URL", "https://crm.example.com/contacts");
        env::set_var("CRM_WEBHOOK_TOKEN", "secret-token");

        let config = AppConfig::load().expect("config loads");
        let targets = config.webhooks.targets();

        assert!(!config.environment.exposes_internal_errors());
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].kind, WebhookKind::Chat);
        assert_eq!(targets[0].bearer_token, None);
        assert_eq!(targets[1].kind, WebhookKind::Crm);
        assert_eq!(targets[1].bearer_token.as_deref(), Some("secret-token"));
        reset_env();
    }
}
