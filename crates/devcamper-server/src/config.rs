//! Configuration management
//!
//! All settings are read once at startup into [`Config`] and handed to the
//! components that need them; nothing looks up the environment lazily.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// Server Configuration Constants
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 5000;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default public base URL used when building links sent by email.
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:5000";

/// Default MongoDB connection string for local development.
pub const DEFAULT_DATABASE_URI: &str = "mongodb://localhost:27017";

/// Default database name.
pub const DEFAULT_DATABASE_NAME: &str = "devcamper";

/// Default database connection timeout in seconds.
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default CORS allowed origin for local development.
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Secret used when `JWT_SECRET` is unset. Only acceptable outside production.
pub const DEFAULT_JWT_SECRET: &str = "devcamper-development-secret";

/// Default session token lifetime in days.
pub const DEFAULT_JWT_EXPIRE_DAYS: i64 = 30;

/// Default session cookie lifetime in days.
pub const DEFAULT_JWT_COOKIE_EXPIRE_DAYS: i64 = 30;

/// Default lifetime of a password reset token in minutes.
pub const DEFAULT_RESET_TOKEN_TTL_MINUTES: i64 = 10;

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_LIMIT: u64 = 25;

/// Default maximum page size for list endpoints.
pub const DEFAULT_MAX_PAGE_LIMIT: u64 = 100;

/// Default geocoding endpoint (MapQuest address API).
pub const DEFAULT_GEOCODER_URL: &str = "https://www.mapquestapi.com/geocoding/v1/address";

/// Default sender name for outgoing mail.
pub const DEFAULT_MAIL_FROM_NAME: &str = "DevCamper";

/// Default sender address for outgoing mail.
pub const DEFAULT_MAIL_FROM_EMAIL: &str = "noreply@devcamper.io";

/// Default request budget per client per minute.
pub const DEFAULT_RATE_LIMIT_REQUESTS_PER_MINUTE: u64 = 100;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
    pub query: QueryConfig,
    pub geocoder: GeocoderConfig,
    pub mailer: MailerConfig,
    pub rate_limit: RateLimitConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
    pub environment: Environment,
    pub public_url: String,
}

/// Deployment environment, from `APP_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("Unknown environment: {}", other)),
        }
    }
}

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// MongoDB connection string, or `memory://` for the in-process store
    pub uri: String,
    pub name: String,
    pub connect_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Whether the in-process store was requested
    pub fn is_memory(&self) -> bool {
        self.uri.starts_with("memory://")
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

/// Session token and password reset settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expire_days: i64,
    pub cookie_expire_days: i64,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
    pub reset_token_ttl_minutes: i64,
}

/// Defaults and bounds for list queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    pub default_limit: u64,
    pub max_limit: u64,
}

/// Geocoding provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    pub url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

/// Outgoing mail settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailerConfig {
    /// HTTP mail API endpoint. Mail is only logged when unset.
    pub api_url: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub from_name: String,
    pub from_email: String,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub requests_per_minute: u64,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let environment = env_or("APP_ENV", Environment::Development);

        let config = Config {
            server: ServerConfig {
                host: env_string("APP_HOST", DEFAULT_SERVER_HOST),
                port: env_or("APP_PORT", DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: env_or(
                    "APP_SHUTDOWN_TIMEOUT",
                    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
                ),
                environment,
                public_url: env_string("APP_PUBLIC_URL", DEFAULT_PUBLIC_URL),
            },
            database: DatabaseConfig {
                uri: env_string("MONGO_URI", DEFAULT_DATABASE_URI),
                name: env_string("MONGO_DATABASE", DEFAULT_DATABASE_NAME),
                connect_timeout_secs: env_or(
                    "MONGO_CONNECT_TIMEOUT",
                    DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                ),
            },
            cors: CorsConfig {
                allowed_origins: env_string("CORS_ALLOWED_ORIGINS", DEFAULT_CORS_ALLOWED_ORIGIN)
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                allow_credentials: env_or("CORS_ALLOW_CREDENTIALS", true),
            },
            auth: AuthConfig {
                jwt_secret: env_string("JWT_SECRET", DEFAULT_JWT_SECRET),
                jwt_expire_days: env_or("JWT_EXPIRE_DAYS", DEFAULT_JWT_EXPIRE_DAYS),
                cookie_expire_days: env_or("JWT_COOKIE_EXPIRE", DEFAULT_JWT_COOKIE_EXPIRE_DAYS),
                secure_cookies: environment == Environment::Production,
                reset_token_ttl_minutes: env_or(
                    "RESET_TOKEN_TTL_MINUTES",
                    DEFAULT_RESET_TOKEN_TTL_MINUTES,
                ),
            },
            query: QueryConfig {
                default_limit: env_or("QUERY_DEFAULT_LIMIT", DEFAULT_PAGE_LIMIT),
                max_limit: env_or("QUERY_MAX_LIMIT", DEFAULT_MAX_PAGE_LIMIT),
            },
            geocoder: GeocoderConfig {
                url: env_string("GEOCODER_URL", DEFAULT_GEOCODER_URL),
                api_key: env_optional("GEOCODER_API_KEY"),
            },
            mailer: MailerConfig {
                api_url: env_optional("MAIL_API_URL"),
                api_key: env_optional("MAIL_API_KEY"),
                from_name: env_string("MAIL_FROM_NAME", DEFAULT_MAIL_FROM_NAME),
                from_email: env_string("MAIL_FROM_EMAIL", DEFAULT_MAIL_FROM_EMAIL),
            },
            rate_limit: RateLimitConfig {
                enabled: env_or("RATE_LIMIT_ENABLED", true),
                requests_per_minute: env_or(
                    "RATE_LIMIT_REQUESTS_PER_MINUTE",
                    DEFAULT_RATE_LIMIT_REQUESTS_PER_MINUTE,
                ),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.database.uri.is_empty() {
            anyhow::bail!("MONGO_URI cannot be empty");
        }

        if self.database.name.is_empty() {
            anyhow::bail!("MONGO_DATABASE cannot be empty");
        }

        if self.auth.jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET cannot be empty");
        }

        if self.server.environment == Environment::Production
            && self.auth.jwt_secret == DEFAULT_JWT_SECRET
        {
            anyhow::bail!("JWT_SECRET must be set explicitly in production");
        }

        if self.auth.jwt_expire_days <= 0 || self.auth.cookie_expire_days <= 0 {
            anyhow::bail!("Token and cookie lifetimes must be positive");
        }

        if self.query.default_limit == 0 || self.query.max_limit == 0 {
            anyhow::bail!("Query limits must be greater than 0");
        }

        if self.query.default_limit > self.query.max_limit {
            anyhow::bail!(
                "QUERY_DEFAULT_LIMIT ({}) cannot be greater than QUERY_MAX_LIMIT ({})",
                self.query.default_limit,
                self.query.max_limit
            );
        }

        if self.rate_limit.enabled && self.rate_limit.requests_per_minute == 0 {
            anyhow::bail!("RATE_LIMIT_REQUESTS_PER_MINUTE must be greater than 0");
        }

        if self.cors.allowed_origins.is_empty() {
            tracing::warn!("No CORS origins configured - all origins will be allowed");
        }

        if self.geocoder.api_key.is_none() {
            tracing::warn!("GEOCODER_API_KEY is not set - geocoding requests will be rejected");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
                environment: Environment::Development,
                public_url: DEFAULT_PUBLIC_URL.to_string(),
            },
            database: DatabaseConfig {
                uri: DEFAULT_DATABASE_URI.to_string(),
                name: DEFAULT_DATABASE_NAME.to_string(),
                connect_timeout_secs: DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
            },
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()],
                allow_credentials: true,
            },
            auth: AuthConfig {
                jwt_secret: DEFAULT_JWT_SECRET.to_string(),
                jwt_expire_days: DEFAULT_JWT_EXPIRE_DAYS,
                cookie_expire_days: DEFAULT_JWT_COOKIE_EXPIRE_DAYS,
                secure_cookies: false,
                reset_token_ttl_minutes: DEFAULT_RESET_TOKEN_TTL_MINUTES,
            },
            query: QueryConfig {
                default_limit: DEFAULT_PAGE_LIMIT,
                max_limit: DEFAULT_MAX_PAGE_LIMIT,
            },
            geocoder: GeocoderConfig {
                url: DEFAULT_GEOCODER_URL.to_string(),
                api_key: None,
            },
            mailer: MailerConfig {
                api_url: None,
                api_key: None,
                from_name: DEFAULT_MAIL_FROM_NAME.to_string(),
                from_email: DEFAULT_MAIL_FROM_EMAIL.to_string(),
            },
            rate_limit: RateLimitConfig {
                enabled: false,
                requests_per_minute: DEFAULT_RATE_LIMIT_REQUESTS_PER_MINUTE,
            },
        }
    }
}
