pub mod app_config;
pub mod config;
pub mod places;

pub use app_config::{AppConfig, Environment, SearchConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use places::{
    AggregateResult, GridCell, LatLng, OpeningHours, PlaceRecord, SearchCriteria, ViewportBounds,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid viewport bounds (north {north}, south {south}, east {east}, west {west}): {reason}")]
    InvalidBounds {
        north: f64,
        south: f64,
        east: f64,
        west: f64,
        reason: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
