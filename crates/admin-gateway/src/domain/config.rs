//! Gateway configuration with validation.
//!
//! Loaded from an optional TOML file, then overridden from the environment.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

/// Main gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Backend administrative service
    pub backend: BackendConfig,
    /// Request validation limits
    pub limits: LimitsConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Operator authentication
    pub auth: AuthConfig,
    /// Log output
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    /// Load configuration: defaults, then `path` (if any), then environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Override selected fields from `ADMIN_GATEWAY_*` environment variables.
    /// A set but unparsable variable is an error, never silently skipped.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let invalid = |key: &str, value: &str, reason: &dyn std::fmt::Display| {
            ConfigError::InvalidOverride(format!("{key}={value:?}: {reason}"))
        };

        if let Some(host) = lookup("ADMIN_GATEWAY_HOST") {
            self.http.host = host
                .parse()
                .map_err(|e| invalid("ADMIN_GATEWAY_HOST", &host, &e))?;
        }
        if let Some(port) = lookup("ADMIN_GATEWAY_PORT") {
            self.http.port = port
                .parse()
                .map_err(|e| invalid("ADMIN_GATEWAY_PORT", &port, &e))?;
        }
        if let Some(url) = lookup("ADMIN_GATEWAY_BACKEND_URL") {
            self.backend.endpoint = url;
        }
        if let Some(timeout) = lookup("ADMIN_GATEWAY_CALL_TIMEOUT") {
            self.backend.call_timeout = humantime_serde::parse_duration(&timeout)
                .map_err(|e| invalid("ADMIN_GATEWAY_CALL_TIMEOUT", &timeout, &e))?;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::InvalidListen("port cannot be 0".into()));
        }

        if !self.http.route_prefix.starts_with('/') {
            return Err(ConfigError::InvalidListen(format!(
                "route prefix '{}' must start with '/'",
                self.http.route_prefix
            )));
        }

        if self.backend.endpoint.trim().is_empty() {
            return Err(ConfigError::InvalidBackend("endpoint cannot be empty".into()));
        }

        if self.backend.call_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "call_timeout cannot be 0".into(),
            ));
        }

        if self.limits.max_request_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_request_size cannot be 0".into(),
            ));
        }

        // tower-http refuses credentials together with wildcard origins or headers
        if self.cors.enabled
            && self.cors.allow_credentials
            && (self.cors.allowed_origins.iter().any(|o| o == "*")
                || self.cors.allowed_headers.iter().any(|h| h == "*"))
        {
            return Err(ConfigError::Invalid(
                "cors.allow_credentials requires explicit origins and headers".into(),
            ));
        }

        if self.auth.enabled && self.auth.operators.is_empty() {
            return Err(ConfigError::Invalid(
                "auth is enabled but no operators are configured".into(),
            ));
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 8080)
    pub port: u16,
    /// Prefix all action routes are mounted under
    pub route_prefix: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            route_prefix: "/api/v1/admin".to_string(),
        }
    }
}

/// Backend administrative service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// JSON-RPC endpoint URL
    pub endpoint: String,
    /// Deadline applied to every downstream call
    #[serde(with = "humantime_serde")]
    pub call_timeout: Duration,
    /// TCP connect timeout for the pooled client
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// Idle connections kept per backend host
    pub pool_max_idle_per_host: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:50051/rpc".to_string(),
            call_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            pool_max_idle_per_host: 32,
        }
    }
}

/// Request limits configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Max request body size in bytes (default: 64KB)
    pub max_request_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_size: 64 * 1024,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins ("*" for all)
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Max age for preflight cache
    pub max_age: u64,
    /// Allow credentials
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["http://localhost:5173".to_string()],
            allowed_methods: vec![
                "GET".to_string(),
                "POST".to_string(),
                "DELETE".to_string(),
                "OPTIONS".to_string(),
            ],
            allowed_headers: vec!["Content-Type".to_string(), "Authorization".to_string()],
            max_age: 86400, // 24 hours
            allow_credentials: true,
        }
    }
}

/// Operator authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Require a bearer token on every action route
    pub enabled: bool,
    /// Accepted operator credentials
    pub operators: Vec<OperatorCredential>,
}

/// One operator token and the identity it authenticates as
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorCredential {
    pub token: String,
    pub operator_id: String,
}

/// Log output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config: {0}")]
    Read(String),
    /// Config file is not valid TOML for this schema
    #[error("cannot parse config: {0}")]
    Parse(String),
    /// Invalid listen address or prefix
    #[error("invalid listen configuration: {0}")]
    InvalidListen(String),
    /// Invalid backend settings
    #[error("invalid backend: {0}")]
    InvalidBackend(String),
    /// Invalid size limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// Environment override set to an unparsable value
    #[error("invalid environment override {0}")]
    InvalidOverride(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Humantime serde module for Duration serialization
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        // "ms" must be checked before the bare 's' suffix
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .map(|m| Duration::from_secs(m * 60))
                .map_err(|_| "invalid minutes")
        } else {
            // Try parsing as plain seconds
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid duration format")
        }
    }
}
