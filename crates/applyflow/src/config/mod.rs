use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

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
    pub sla: SlaConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            sla: SlaConfig::from_env()?,
        })
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

const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 60 * 60;
const DEFAULT_RISK_INTERVAL_SECS: u64 = 6 * 60 * 60;
const DEFAULT_VERIFICATION_EXPIRY_DAYS: i64 = 14;
const MAX_INTERVAL_SECS: u64 = 30 * 24 * 60 * 60;
pub const MAX_VERIFICATION_EXPIRY_DAYS: u64 = 3_650;

/// Background sweep cadence and settlement behavior for guarantee periods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlaConfig {
    pub reconcile_interval: Duration,
    pub risk_interval: Duration,
    pub verification_expiry_days: i64,
    pub auto_credit: bool,
    pub tier_table_path: Option<PathBuf>,
}

impl SlaConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let reconcile_secs = parse_env_u64(
            "SLA_RECONCILE_INTERVAL_SECS",
            DEFAULT_RECONCILE_INTERVAL_SECS,
            MAX_INTERVAL_SECS,
        )?;
        let risk_secs = parse_env_u64(
            "SLA_RISK_INTERVAL_SECS",
            DEFAULT_RISK_INTERVAL_SECS,
            MAX_INTERVAL_SECS,
        )?;
        let expiry_days = parse_env_u64(
            "SLA_VERIFICATION_EXPIRY_DAYS",
            DEFAULT_VERIFICATION_EXPIRY_DAYS as u64,
            MAX_VERIFICATION_EXPIRY_DAYS,
        )?;

        let auto_credit = match env::var("SLA_AUTO_CREDIT") {
            Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidFlag {
                        key: "SLA_AUTO_CREDIT",
                        value: raw,
                    })
                }
            },
            Err(_) => true,
        };

        let tier_table_path = env::var("SLA_TIER_TABLE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            reconcile_interval: Duration::from_secs(reconcile_secs),
            risk_interval: Duration::from_secs(risk_secs),
            verification_expiry_days: expiry_days as i64,
            auto_credit,
            tier_table_path,
        })
    }
}

impl Default for SlaConfig {
    fn default() -> Self {
        Self {
            reconcile_interval: Duration::from_secs(DEFAULT_RECONCILE_INTERVAL_SECS),
            risk_interval: Duration::from_secs(DEFAULT_RISK_INTERVAL_SECS),
            verification_expiry_days: DEFAULT_VERIFICATION_EXPIRY_DAYS,
            auto_credit: true,
            tier_table_path: None,
        }
    }
}

/// A positive integer no larger than `max`.
fn parse_env_u64(key: &'static str, default: u64, max: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(value) if value > max => Err(ConfigError::OutOfRange { key, value, max }),
            Ok(value) if value > 0 => Ok(value),
            _ => Err(ConfigError::InvalidNumber { key, value: raw }),
        },
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    OutOfRange { key: &'static str, value: u64, max: u64 },
    InvalidFlag { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a positive integer (found '{value}')")
            }
            ConfigError::OutOfRange { key, value, max } => {
                write!(f, "{key} must be at most {max} (found {value})")
            }
            ConfigError::InvalidFlag { key, value } => {
                write!(f, "{key} must be true or false (found '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::OutOfRange { .. }
            | ConfigError::InvalidFlag { .. } => None,
        }
    }
}
