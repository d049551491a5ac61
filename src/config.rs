use std::env;

use crate::error::AppError;

const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
/// One year.
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 366;

/// Runtime configuration, read once at startup and shared with handlers
/// through `web::Data<Config>`.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl Config {
    /// Builds the configuration from environment variables.
    ///
    /// `DATABASE_URL` and `JWT_SECRET` are required. Everything else falls back
    /// to a default when unset, but a value that is set and fails to parse is
    /// reported instead of silently replaced.
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parsed_or("DATABASE_MAX_CONNECTIONS", 5)?,
            server_port: parsed_or("SERVER_PORT", 8080)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            jwt_secret: required("JWT_SECRET")?,
            token_ttl_hours: token_ttl_hours()?,
        })
    }

    /// Configuration for tests that never touch the environment.
    pub fn for_tests(database_url: &str, jwt_secret: &str) -> Self {
        Self {
            database_url: database_url.to_string(),
            database_max_connections: 2,
            server_port: 0,
            server_host: "127.0.0.1".to_string(),
            jwt_secret: jwt_secret.to_string(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn required(key: &str) -> Result<String, AppError> {
    env::var(key)
        .map_err(|_| AppError::InternalServerError(format!("{} must be set", key)))
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::InternalServerError(format!("{} has an invalid value: {}", key, raw))),
        Err(_) => Ok(default),
    }
}

fn token_ttl_hours() -> Result<i64, AppError> {
    let hours = parsed_or("TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?;
    if !(1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
        return Err(AppError::InternalServerError(format!(
            "TOKEN_TTL_HOURS must be between 1 and {}, got {}",
            MAX_TOKEN_TTL_HOURS, hours
        )));
    }
    Ok(hours)
}
