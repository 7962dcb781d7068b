use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_API_URL: &str = "https://annoris-production.up.railway.app";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// development config pointed at the production analysis backend.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("GEOSCOUT_ENV", "development"))?;
    let bind_addr = parse_addr("GEOSCOUT_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("GEOSCOUT_LOG_LEVEL", "info");

    let api_url = parse_base_url(
        "GEOSCOUT_API_URL",
        &or_default("GEOSCOUT_API_URL", DEFAULT_API_URL),
    )?;
    let server_url = parse_base_url(
        "GEOSCOUT_SERVER_URL",
        &or_default("GEOSCOUT_SERVER_URL", "http://127.0.0.1:3000"),
    )?;

    let request_timeout_secs = parse_u64("GEOSCOUT_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("GEOSCOUT_USER_AGENT", "geoscout/0.1 (ai-visibility)");

    let poll_interval_ms = parse_u64("GEOSCOUT_POLL_INTERVAL_MS", "2000")?;
    if poll_interval_ms == 0 {
        return Err(invalid(
            "GEOSCOUT_POLL_INTERVAL_MS",
            "poll interval must be greater than zero".to_string(),
        ));
    }
    let poll_timeout_secs = parse_u64("GEOSCOUT_POLL_TIMEOUT_SECS", "60")?;
    let cache_ttl_secs = parse_u64("GEOSCOUT_CACHE_TTL_SECS", "604800")?;
    let rate_limit_per_minute = parse_usize("GEOSCOUT_RATE_LIMIT_PER_MINUTE", "120")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        api_url,
        server_url,
        request_timeout_secs,
        user_agent,
        poll_interval_ms,
        poll_timeout_secs,
        cache_ttl_secs,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GEOSCOUT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Accepts only `http(s)://` URLs and strips trailing slashes.
fn parse_base_url(var: &str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected an http(s) URL, got '{raw}'"),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
