//! Client configuration: base URL, signing secret, environment and log level.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::constants::{
    DEFAULT_TIMEOUT, ENV_BASE_URL_RECURRING, ENV_ENVIRONMENT, ENV_LOG_LEVEL, ENV_TIMEOUT_SECS,
    ENV_X_SIGN_KEY, MIN_SIGN_KEY_LEN,
};

/// Which gateway deployment the client talks to.
///
/// Production enforces the "start time must not be in the past" rule on
/// create; sandbox relaxes it so fixtures with near-past timestamps work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "sandbox" | "staging" | "stage" | "development" | "dev" => Ok(Environment::Sandbox),
            other => Err(ConfigError::InvalidValue {
                var: ENV_ENVIRONMENT,
                value: other.to_string(),
            }),
        }
    }
}

/// Diagnostic verbosity. Has no effect on request behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    /// Filter directive understood by `tracing_subscriber::EnvFilter`.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "off" | "none" => Ok(LogLevel::Off),
            "1" | "error" => Ok(LogLevel::Error),
            "2" | "info" => Ok(LogLevel::Info),
            "3" | "debug" | "trace" => Ok(LogLevel::Debug),
            other => Err(ConfigError::InvalidValue {
                var: ENV_LOG_LEVEL,
                value: other.to_string(),
            }),
        }
    }
}

/// Immutable client configuration, shared by the gateway and its transport.
///
/// Several independently configured clients can live in one process.
#[derive(Clone)]
pub struct Config {
    base_url_recurring: Url,
    sign_key: Vec<u8>,
    environment: Environment,
    log_level: LogLevel,
    timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url_recurring", &self.base_url_recurring.as_str())
            .field("sign_key", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("log_level", &self.log_level)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Sandbox config with default log level and timeout.
    pub fn new(base_url_recurring: &str, sign_key: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let base_url_recurring = parse_base_url(base_url_recurring)?;
        let sign_key = sign_key.into();
        if sign_key.is_empty() {
            return Err(ConfigError::EmptySignKey);
        }

        Ok(Self {
            base_url_recurring,
            sign_key,
            environment: Environment::default(),
            log_level: LogLevel::default(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Load configuration from `MCPAYMENT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var(ENV_BASE_URL_RECURRING)
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingRequired(ENV_BASE_URL_RECURRING))?;

        let sign_key = env::var(ENV_X_SIGN_KEY)
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingRequired(ENV_X_SIGN_KEY))?;

        if sign_key.len() < MIN_SIGN_KEY_LEN {
            tracing::warn!(
                "{} is short ({} bytes, recommended minimum {})",
                ENV_X_SIGN_KEY,
                sign_key.len(),
                MIN_SIGN_KEY_LEN
            );
        }

        let environment = match env::var(ENV_ENVIRONMENT) {
            Ok(v) if !v.is_empty() => v.parse()?,
            _ => Environment::default(),
        };

        let log_level = match env::var(ENV_LOG_LEVEL) {
            Ok(v) if !v.is_empty() => v.parse()?,
            _ => LogLevel::default(),
        };

        let timeout = match env::var(ENV_TIMEOUT_SECS) {
            Ok(v) if !v.is_empty() => {
                let secs: u64 = v.parse().map_err(|_| ConfigError::InvalidValue {
                    var: ENV_TIMEOUT_SECS,
                    value: v.clone(),
                })?;
                Duration::from_secs(secs)
            }
            _ => DEFAULT_TIMEOUT,
        };

        Ok(Self::new(&base_url, sign_key)?
            .with_environment(environment)
            .with_log_level(log_level)
            .with_timeout(timeout))
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url_recurring(&self) -> &Url {
        &self.base_url_recurring
    }

    pub fn sign_key(&self) -> &[u8] {
        &self.sign_key
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL for a path relative to the recurring base URL.
    ///
    /// `path` is either empty (the collection) or a `/`-prefixed suffix whose
    /// identifier segment is already percent-encoded.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}",
            self.base_url_recurring.as_str().trim_end_matches('/'),
            path
        )
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|_| ConfigError::InvalidUrl(raw.to_string()))?;
    match url.scheme() {
        "https" | "http" => Ok(url),
        _ => Err(ConfigError::InvalidUrl(raw.to_string())),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingRequired(&'static str),

    #[error("sign key must not be empty")]
    EmptySignKey,

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}
