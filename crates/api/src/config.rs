//! Server configuration loaded from environment variables.
//!
//! Every setting has a default suitable for local development except
//! `API_KEY`, which must be supplied. [`ServerConfig::from_lookup`] takes the
//! variable source as a closure so tests never touch the process
//! environment.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderName;
use sqlx::postgres::PgConnectOptions;

/// Errors raised while assembling [`ServerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Top-level server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Service name reported by the health endpoint (default: `custom-dialplan`).
    pub app_name: String,
    /// Deployment environment label (default: `prod`).
    pub environment: String,
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Prefix every route is nested under (default: `/api/v1`).
    pub api_prefix: String,
    /// `EnvFilter` directive used when `RUST_LOG` is unset (default: `info`).
    pub log_level: String,
    pub log_format: LogFormat,
    /// Allowed CORS origins; `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub auth: ApiKeyConfig,
    pub database: DatabaseConfig,
    pub mi: MiConfig,
}

/// Shared-secret authentication settings.
#[derive(Clone)]
pub struct ApiKeyConfig {
    pub api_key: String,
    pub header_name: HeaderName,
    /// Whether `/healthz` also requires the key.
    pub protect_health: bool,
}

impl fmt::Debug for ApiKeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyConfig")
            .field("api_key", &"<redacted>")
            .field("header_name", &self.header_name)
            .field("protect_health", &self.protect_health)
            .finish()
    }
}

/// Database connection settings.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Connection target. Credentials are set field by field, never spliced
    /// into a URL.
    pub options: PgConnectOptions,
    /// Maximum pooled connections (default: `5`).
    pub pool_size: u32,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.options.get_host())
            .field("port", &self.options.get_port())
            .field("database", &self.options.get_database())
            .field("pool_size", &self.pool_size)
            .finish()
    }
}

/// OpenSIPS management interface endpoint.
#[derive(Debug, Clone)]
pub struct MiConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// | Env Var                    | Default           |
    /// |----------------------------|-------------------|
    /// | `APP_NAME`                 | `custom-dialplan` |
    /// | `ENV`                      | `prod`            |
    /// | `HOST`                     | `0.0.0.0`         |
    /// | `PORT`                     | `8000`            |
    /// | `API_PREFIX`               | `/api/v1`         |
    /// | `LOG_LEVEL`                | `info`            |
    /// | `LOG_FORMAT`               | `text`            |
    /// | `CORS_ORIGINS`             | `*`               |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`              |
    /// | `API_KEY`                  | required          |
    /// | `API_KEY_HEADER_NAME`      | `X-API-Key`       |
    /// | `HEALTH_REQUIRES_AUTH`     | `false`           |
    /// | `DB_POOL_SIZE`             | `5`               |
    /// | `OPENSIPS_MI_HOST`         | `localhost`       |
    /// | `OPENSIPS_MI_PORT`         | `8989`            |
    /// | `OPENSIPS_MI_TIMEOUT_SECS` | `5`               |
    ///
    /// See [`DatabaseConfig::build`] for the database variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_format = match text(&lookup, "LOG_FORMAT", "text").to_lowercase().as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::Invalid {
                    key: "LOG_FORMAT",
                    reason: format!("expected 'text' or 'json', got '{other}'"),
                })
            }
        };

        let cors_origins: Vec<String> = text(&lookup, "CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            app_name: text(&lookup, "APP_NAME", "custom-dialplan"),
            environment: text(&lookup, "ENV", "prod"),
            host: text(&lookup, "HOST", "0.0.0.0"),
            port: parsed(&lookup, "PORT", 8000)?,
            api_prefix: normalize_prefix(&text(&lookup, "API_PREFIX", "/api/v1"))?,
            log_level: text(&lookup, "LOG_LEVEL", "info").to_lowercase(),
            log_format,
            cors_origins,
            request_timeout_secs: parsed(&lookup, "REQUEST_TIMEOUT_SECS", 30)?,
            auth: ApiKeyConfig::build(&lookup)?,
            database: DatabaseConfig::build(&lookup)?,
            mi: MiConfig::build(&lookup)?,
        })
    }
}

impl ApiKeyConfig {
    fn build<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("API_KEY"))?;

        let header = text(lookup, "API_KEY_HEADER_NAME", "X-API-Key");
        let header_name =
            HeaderName::from_str(&header).map_err(|e| ConfigError::Invalid {
                key: "API_KEY_HEADER_NAME",
                reason: e.to_string(),
            })?;

        Ok(Self {
            api_key,
            header_name,
            protect_health: parsed(lookup, "HEALTH_REQUIRES_AUTH", false)?,
        })
    }
}

impl DatabaseConfig {
    /// Resolve the connection options.
    ///
    /// A non-blank `DATABASE_URL` wins. Otherwise the options are built from
    /// `POSTGRES_USER` (`postgres`), `POSTGRES_PASSWORD` (`postgres`),
    /// `POSTGRES_HOST` (`localhost`), `POSTGRES_PORT` (`5432`) and
    /// `POSTGRES_DB` (`custom_dialplan`).
    pub fn build<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let options = match lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => PgConnectOptions::from_str(&url).map_err(|e| ConfigError::Invalid {
                key: "DATABASE_URL",
                reason: e.to_string(),
            })?,
            None => PgConnectOptions::new_without_pgpass()
                .username(&text(lookup, "POSTGRES_USER", "postgres"))
                .password(&text(lookup, "POSTGRES_PASSWORD", "postgres"))
                .host(&text(lookup, "POSTGRES_HOST", "localhost"))
                .port(parsed(lookup, "POSTGRES_PORT", 5432)?)
                .database(&text(lookup, "POSTGRES_DB", "custom_dialplan")),
        };

        let pool_size: u32 = parsed(lookup, "DB_POOL_SIZE", 5)?;
        if pool_size == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_POOL_SIZE",
                reason: "must be at least 1".into(),
            });
        }

        Ok(Self { options, pool_size })
    }
}

impl MiConfig {
    fn build<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = text(lookup, "OPENSIPS_MI_HOST", "localhost");
        if host.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "OPENSIPS_MI_HOST",
                reason: "cannot be empty".into(),
            });
        }

        let port: u16 = parsed(lookup, "OPENSIPS_MI_PORT", 8989)?;
        if port == 0 {
            return Err(ConfigError::Invalid {
                key: "OPENSIPS_MI_PORT",
                reason: "must be between 1 and 65535".into(),
            });
        }

        let timeout_secs: u64 = parsed(lookup, "OPENSIPS_MI_TIMEOUT_SECS", 5)?;

        Ok(Self {
            host,
            port,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn text<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

fn parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: format!("'{raw}': {e}"),
        }),
    }
}

/// Strip trailing slashes; an empty result mounts routes at the root.
fn normalize_prefix(raw: &str) -> Result<String, ConfigError> {
    let prefix = raw.trim().trim_end_matches('/');
    if !prefix.is_empty() && !prefix.starts_with('/') {
        return Err(ConfigError::Invalid {
            key: "API_PREFIX",
            reason: format!("'{raw}' must start with '/'"),
        });
    }
    Ok(prefix.to_string())
}
