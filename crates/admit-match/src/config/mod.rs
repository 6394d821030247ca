use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::matching::{MatchSettings, NumericPolicy, PageLimits, ScoringWeights};

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
    pub matching: MatchingConfig,
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
            matching: MatchingConfig::from_env()?,
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Page sizes, tier size, intake policy, and optional seed catalog for matching.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchingConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub tier_size: usize,
    pub numeric_policy: NumericPolicy,
    pub catalog_path: Option<PathBuf>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        let limits = PageLimits::default();
        let settings = MatchSettings::default();
        Self {
            default_page_size: limits.default_limit,
            max_page_size: limits.max_limit,
            tier_size: settings.tier_size,
            numeric_policy: settings.numeric_policy,
            catalog_path: None,
        }
    }
}

impl MatchingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let default_page_size = usize_var("MATCH_DEFAULT_PAGE_SIZE", defaults.default_page_size)?;
        let max_page_size = usize_var("MATCH_MAX_PAGE_SIZE", defaults.max_page_size)?;
        let tier_size = usize_var("MATCH_TIER_SIZE", defaults.tier_size)?;

        if default_page_size == 0 || default_page_size > max_page_size {
            return Err(ConfigError::InvalidPageSizes {
                default: default_page_size,
                max: max_page_size,
            });
        }
        if tier_size == 0 || tier_size > max_page_size {
            return Err(ConfigError::InvalidNumber {
                variable: "MATCH_TIER_SIZE",
            });
        }

        let numeric_policy = match env::var("MATCH_NUMERIC_POLICY") {
            Ok(raw) => NumericPolicy::parse(&raw).ok_or(ConfigError::InvalidNumericPolicy(raw))?,
            Err(_) => defaults.numeric_policy,
        };

        let catalog_path = env::var("MATCH_CATALOG_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            default_page_size,
            max_page_size,
            tier_size,
            numeric_policy,
            catalog_path,
        })
    }

    pub fn settings(&self) -> MatchSettings {
        MatchSettings {
            numeric_policy: self.numeric_policy,
            weights: ScoringWeights::default(),
            page_limits: PageLimits {
                default_limit: self.default_page_size,
                max_limit: self.max_page_size,
            },
            tier_size: self.tier_size,
        }
    }
}

fn usize_var(variable: &'static str, default: usize) -> Result<usize, ConfigError> {
    match env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidNumber { variable }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { variable: &'static str },
    InvalidPageSizes { default: usize, max: usize },
    InvalidNumericPolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { variable } => {
                write!(f, "{variable} must be a positive integer within page bounds")
            }
            ConfigError::InvalidPageSizes { default, max } => write!(
                f,
                "MATCH_DEFAULT_PAGE_SIZE ({default}) must be between 1 and MATCH_MAX_PAGE_SIZE ({max})"
            ),
            ConfigError::InvalidNumericPolicy(value) => write!(
                f,
                "MATCH_NUMERIC_POLICY must be 'coerce' or 'reject' (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidPageSizes { .. }
            | ConfigError::InvalidNumericPolicy(_) => None,
        }
    }
}
