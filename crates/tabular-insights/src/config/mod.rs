use crate::dashboards::risk::MAX_JITTER;
use crate::dashboards::service::DashboardSettings;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub dashboards: DashboardConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(&var_or("APP_ENV", "development"));

        let host = var_or("APP_HOST", "127.0.0.1");
        let port = var_or("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = var_or("APP_LOG_LEVEL", "info");
        let log_format = LogFormat::parse(&var_or("APP_LOG_FORMAT", "compact"))?;

        let data_dir = PathBuf::from(var_or("DASHBOARD_DATA_DIR", "data"));
        let risk_limit = var_or("DASHBOARD_RISK_LIMIT", "10")
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidRiskLimit)?;
        let risk_jitter = var_or("DASHBOARD_RISK_JITTER", "0")
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| (0.0..=MAX_JITTER).contains(value))
            .ok_or(ConfigError::InvalidJitter)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            dashboards: DashboardConfig {
                data_dir,
                risk_limit,
                risk_jitter,
            },
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            other => Err(ConfigError::InvalidLogFormat(other.to_string())),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Where dashboard data lives and how risk lists are presented.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub risk_limit: usize,
    pub risk_jitter: f64,
}

impl DashboardConfig {
    pub fn settings(&self) -> DashboardSettings {
        DashboardSettings {
            data_dir: self.data_dir.clone(),
            risk_limit: self.risk_limit,
            jitter_amplitude: self.risk_jitter,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLogFormat(String),
    InvalidRiskLimit,
    InvalidJitter,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'pretty', got '{value}'")
            }
            ConfigError::InvalidRiskLimit => {
                write!(f, "DASHBOARD_RISK_LIMIT must be a non-negative integer")
            }
            ConfigError::InvalidJitter => {
                write!(f, "DASHBOARD_RISK_JITTER must be between 0 and {MAX_JITTER}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
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

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_LOG_FORMAT",
            "DASHBOARD_DATA_DIR",
            "DASHBOARD_RISK_LIMIT",
            "DASHBOARD_RISK_JITTER",
        ] {
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
        assert_eq!(config.telemetry.log_format, LogFormat::Compact);
        assert_eq!(config.dashboards.data_dir, PathBuf::from("data"));
        assert_eq!(config.dashboards.risk_limit, 10);
        assert_eq!(config.dashboards.risk_jitter, 0.0);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn dashboard_overrides_flow_into_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DASHBOARD_DATA_DIR", "/srv/dashboards");
        env::set_var("DASHBOARD_RISK_LIMIT", "25");
        env::set_var("DASHBOARD_RISK_JITTER", "2.5");
        env::set_var("APP_LOG_FORMAT", "Pretty");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        let settings = config.dashboards.settings();
        assert_eq!(settings.data_dir, PathBuf::from("/srv/dashboards"));
        assert_eq!(settings.risk_limit, 25);
        assert_eq!(settings.jitter_amplitude, 2.5);
        assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
    }

    #[test]
    fn rejects_invalid_dashboard_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DASHBOARD_RISK_LIMIT", "-3");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidRiskLimit)
        ));

        reset_env();
        env::set_var("DASHBOARD_RISK_JITTER", "NaN");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidJitter)));

        reset_env();
        env::set_var("DASHBOARD_RISK_JITTER", "1e308");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidJitter)));

        reset_env();
        env::set_var("DASHBOARD_RISK_JITTER", "100");
        let config = AppConfig::load().expect("upper bound accepted");
        assert_eq!(config.dashboards.risk_jitter, MAX_JITTER);

        reset_env();
        env::set_var("APP_LOG_FORMAT", "json");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidLogFormat(_))
        ));
        reset_env();
    }
}
