//! Collaborator seams: address lookup and route acquisition.
//!
//! The engine never talks to a map service itself; callers plug in
//! implementations of these traits. Timeouts and retries belong to the
//! implementations, not to the engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::route::RouteCandidate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub formatted_address: String,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a free-form address. Failures are reported as [`EngineError::Geocode`].
    async fn geocode(&self, address: &str) -> Result<Coordinates, EngineError>;
}

#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Alternative routes between two points, at least one on success.
    /// Failures are reported as [`EngineError::Directions`].
    async fn get_routes(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
    ) -> Result<Vec<RouteCandidate>, EngineError>;
}
