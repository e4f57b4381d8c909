use sitetrack_core::calendar::SiteCalendar;

use crate::auth::jwt::JwtConfig;

/// A required variable is missing or a variable failed to parse.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid ({value:?}): {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Credentials for the first Admin, created when the users table is empty.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL and JWT secret have defaults suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Site-local calendar used for "today", day windows and hour buckets.
    pub calendar: SiteCalendar,
    /// Emit JSON log lines instead of the human-readable format.
    pub log_json: bool,
    pub bootstrap_admin: Option<BootstrapAdmin>,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `3000`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `SITE_UTC_OFFSET_MINUTES`  | `0`                     |
    /// | `LOG_FORMAT`               | `text` (`json` to switch) |
    /// | `BOOTSTRAP_ADMIN_EMAIL`    | unset                   |
    /// | `BOOTSTRAP_ADMIN_PASSWORD` | unset                   |
    ///
    /// JWT variables are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env_or("HOST", "0.0.0.0");
        let port: u16 = parse_env("PORT", "3000")?;

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            origin
                .parse::<axum::http::HeaderValue>()
                .map_err(|e| ConfigError::Invalid {
                    var: "CORS_ORIGINS",
                    value: origin.clone(),
                    reason: e.to_string(),
                })?;
        }

        let request_timeout_secs: u64 = parse_env("REQUEST_TIMEOUT_SECS", "30")?;

        let offset_minutes: i32 = parse_env("SITE_UTC_OFFSET_MINUTES", "0")?;
        let calendar =
            SiteCalendar::from_offset_minutes(offset_minutes).map_err(|e| ConfigError::Invalid {
                var: "SITE_UTC_OFFSET_MINUTES",
                value: offset_minutes.to_string(),
                reason: e.to_string(),
            })?;

        let log_json = env_or("LOG_FORMAT", "text").eq_ignore_ascii_case("json");

        let bootstrap_admin = match (
            std::env::var("BOOTSTRAP_ADMIN_EMAIL").ok(),
            std::env::var("BOOTSTRAP_ADMIN_PASSWORD").ok(),
        ) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin { email, password })
            }
            _ => None,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            calendar,
            log_json,
            bootstrap_admin,
            jwt: JwtConfig::from_env()?,
        })
    }
}

pub(crate) fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

pub(crate) fn parse_env<T>(var: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = env_or(var, default);
    match value.parse() {
        Ok(parsed) => Ok(parsed),
        Err(e) => Err(ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}
