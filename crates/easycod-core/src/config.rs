use thiserror::Error;

use crate::app_config::{AppConfig, Environment};
use crate::delivery::FeeParsing;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("EASYCOD_ENV", "development"))?;

    let bind_addr = or_default("EASYCOD_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("EASYCOD_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("EASYCOD_LOG_LEVEL", "info");

    let api_keys = or_default("EASYCOD_API_KEYS", "")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    let db_max_connections = parse_u32("EASYCOD_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("EASYCOD_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("EASYCOD_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let delivery_timeout_secs = match lookup("EASYCOD_DELIVERY_TIMEOUT_SECS") {
        Ok(raw) if !raw.trim().is_empty() => Some(
            raw.trim()
                .parse::<u64>()
                .map_err(|e| invalid("EASYCOD_DELIVERY_TIMEOUT_SECS", e.to_string()))?,
        ),
        _ => None,
    };
    let delivery_user_agent = or_default("EASYCOD_DELIVERY_USER_AGENT", "easycod/0.1 (delivery-rates)");

    let maystro_max_concurrent_regions = or_default("EASYCOD_MAYSTRO_MAX_CONCURRENT_REGIONS", "16")
        .parse::<usize>()
        .map_err(|e| invalid("EASYCOD_MAYSTRO_MAX_CONCURRENT_REGIONS", e.to_string()))?;
    if maystro_max_concurrent_regions == 0 {
        return Err(invalid(
            "EASYCOD_MAYSTRO_MAX_CONCURRENT_REGIONS",
            "must be at least 1".to_string(),
        ));
    }

    let fee_parsing = or_default("EASYCOD_FEE_PARSING", "lenient")
        .parse::<FeeParsing>()
        .map_err(|e| invalid("EASYCOD_FEE_PARSING", e))?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        api_keys,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        delivery_timeout_secs,
        delivery_user_agent,
        maystro_max_concurrent_regions,
        fee_parsing,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "EASYCOD_ENV".to_string(),
            reason: format!("expected development, test, or production, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
