pub mod aggregate;
pub mod cache;
pub mod error;
pub mod fanout;
pub mod fingerprint;
pub mod grid;
pub mod orchestrator;
pub mod provider;
pub mod worker;

pub use aggregate::aggregate;
pub use cache::{Expiry, ResultCache};
pub use error::{ProviderError, SearchError};
pub use fingerprint::fingerprint;
pub use grid::{GridError, GridPlan};
pub use orchestrator::SearchOrchestrator;
pub use provider::{
    GooglePlacesClient, NearbySearchRequest, NearbySearchResponse, PlacesProvider, SearchStatus,
};
