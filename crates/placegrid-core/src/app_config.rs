use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Tuning knobs for the grid fan-out and the result cache.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Upper bound on provider calls in flight for a single search.
    pub max_parallel_requests: usize,
    /// Preferred cell edge in degrees before adaptive coarsening.
    pub grid_cell_size_degrees: f64,
    /// Soft ceiling on the number of cells per search.
    pub max_grid_cells: usize,
    pub cache_absolute_ttl: Duration,
    pub cache_sliding_ttl: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_parallel_requests: 10,
            grid_cell_size_degrees: 0.005,
            max_grid_cells: 25,
            cache_absolute_ttl: Duration::from_secs(300),
            cache_sliding_ttl: Duration::from_secs(120),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub google_maps_api_key: String,
    pub places_base_url: String,
    pub provider_timeout_secs: u64,
    pub user_agent: String,
    pub search: SearchConfig,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("google_maps_api_key", &"[redacted]")
            .field("places_base_url", &self.places_base_url)
            .field("provider_timeout_secs", &self.provider_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("search", &self.search)
            .finish()
    }
}
