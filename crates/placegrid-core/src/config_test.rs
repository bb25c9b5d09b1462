use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("GOOGLE_MAPS_API_KEY", "test-api-key-123");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "PLACEGRID_ENV"));
}

#[test]
fn build_app_config_fails_without_api_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GOOGLE_MAPS_API_KEY"),
        "expected MissingEnvVar(GOOGLE_MAPS_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.google_maps_api_key, "test-api-key-123");
    assert_eq!(cfg.places_base_url, "https://places.googleapis.com/");
    assert_eq!(cfg.provider_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "placegrid/0.1 (viewport-search)");
    assert_eq!(cfg.search, SearchConfig::default());
}

#[test]
fn debug_output_redacts_api_key() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("test-api-key-123"));
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn search_overrides_are_applied() {
    let mut map = full_env();
    map.insert("PLACEGRID_MAX_PARALLEL_REQUESTS", "4");
    map.insert("PLACEGRID_GRID_CELL_SIZE_DEGREES", "0.01");
    map.insert("PLACEGRID_MAX_GRID_CELLS", "16");
    map.insert("PLACEGRID_CACHE_ABSOLUTE_TTL_SECS", "60");
    map.insert("PLACEGRID_CACHE_SLIDING_TTL_SECS", "30");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.search.max_parallel_requests, 4);
    assert!((cfg.search.grid_cell_size_degrees - 0.01).abs() < f64::EPSILON);
    assert_eq!(cfg.search.max_grid_cells, 16);
    assert_eq!(cfg.search.cache_absolute_ttl, Duration::from_secs(60));
    assert_eq!(cfg.search.cache_sliding_ttl, Duration::from_secs(30));
}

#[test]
fn max_parallel_requests_zero_is_rejected() {
    let mut map = full_env();
    map.insert("PLACEGRID_MAX_PARALLEL_REQUESTS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACEGRID_MAX_PARALLEL_REQUESTS"),
        "expected InvalidEnvVar(PLACEGRID_MAX_PARALLEL_REQUESTS), got: {result:?}"
    );
}

#[test]
fn max_grid_cells_not_a_number_is_rejected() {
    let mut map = full_env();
    map.insert("PLACEGRID_MAX_GRID_CELLS", "lots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACEGRID_MAX_GRID_CELLS"),
        "expected InvalidEnvVar(PLACEGRID_MAX_GRID_CELLS), got: {result:?}"
    );
}

#[test]
fn negative_cell_size_is_rejected() {
    let mut map = full_env();
    map.insert("PLACEGRID_GRID_CELL_SIZE_DEGREES", "-0.005");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACEGRID_GRID_CELL_SIZE_DEGREES"),
        "expected InvalidEnvVar(PLACEGRID_GRID_CELL_SIZE_DEGREES), got: {result:?}"
    );
}

#[test]
fn provider_timeout_invalid_is_rejected() {
    let mut map = full_env();
    map.insert("PLACEGRID_PROVIDER_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACEGRID_PROVIDER_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PLACEGRID_PROVIDER_TIMEOUT_SECS), got: {result:?}"
    );
}
