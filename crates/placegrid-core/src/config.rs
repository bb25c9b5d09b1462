use std::time::Duration;

use crate::app_config::{AppConfig, Environment, SearchConfig};
use crate::ConfigError;

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
/// Decoupled from the process environment so tests can drive it from a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
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

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be at least 1".to_string()));
        }
        Ok(value)
    };

    let parse_positive_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid(var, "must be a finite number above 0".to_string()));
        }
        Ok(value)
    };

    let google_maps_api_key = require("GOOGLE_MAPS_API_KEY")?;
    let env = parse_environment(&or_default("PLACEGRID_ENV", "development"))?;
    let log_level = or_default("PLACEGRID_LOG_LEVEL", "info");
    let places_base_url = or_default("PLACEGRID_PLACES_BASE_URL", "https://places.googleapis.com/");
    let provider_timeout_secs = parse_u64("PLACEGRID_PROVIDER_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PLACEGRID_USER_AGENT", "placegrid/0.1 (viewport-search)");

    let max_parallel_requests = parse_positive_usize("PLACEGRID_MAX_PARALLEL_REQUESTS", "10")?;
    let grid_cell_size_degrees = parse_positive_f64("PLACEGRID_GRID_CELL_SIZE_DEGREES", "0.005")?;
    let max_grid_cells = parse_positive_usize("PLACEGRID_MAX_GRID_CELLS", "25")?;
    let cache_absolute_ttl_secs = parse_u64("PLACEGRID_CACHE_ABSOLUTE_TTL_SECS", "300")?;
    let cache_sliding_ttl_secs = parse_u64("PLACEGRID_CACHE_SLIDING_TTL_SECS", "120")?;

    Ok(AppConfig {
        env,
        log_level,
        google_maps_api_key,
        places_base_url,
        provider_timeout_secs,
        user_agent,
        search: SearchConfig {
            max_parallel_requests,
            grid_cell_size_degrees,
            max_grid_cells,
            cache_absolute_ttl: Duration::from_secs(cache_absolute_ttl_secs),
            cache_sliding_ttl: Duration::from_secs(cache_sliding_ttl_secs),
        },
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PLACEGRID_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
