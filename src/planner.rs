//! # Commute planner
//! End-to-end flow for one request: validate input, geocode both ends,
//! fetch alternative routes, score/select them and estimate the yearly
//! savings of the eco route.
//!
//! No retries here. Collaborator errors propagate unchanged so callers can
//! tell upstream failures from validation failures.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::emissions::{estimate_savings_with, round2, validate_frequency, EmissionEstimate};
use crate::error::EngineError;
use crate::providers::{Coordinates, DirectionsProvider, Geocoder};
use crate::scoring::round1;
use crate::selector::{score_and_select, SelectionResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommutePlan {
    pub origin: String,
    pub destination: String,
    pub origin_coords: Coordinates,
    pub dest_coords: Coordinates,
    pub frequency: u32,
    pub distance_standard_km: f64,
    pub distance_eco_km: f64,
    /// Minutes under traffic.
    pub duration_standard_min: f64,
    pub duration_eco_min: f64,
    pub selection: SelectionResult,
    pub emissions: EmissionEstimate,
}

pub struct CommutePlanner<G, D> {
    geocoder: G,
    directions: D,
    config: EngineConfig,
}

impl<G: Geocoder, D: DirectionsProvider> CommutePlanner<G, D> {
    pub fn new(geocoder: G, directions: D) -> Self {
        Self::with_config(geocoder, directions, EngineConfig::default())
    }

    pub fn with_config(geocoder: G, directions: D, config: EngineConfig) -> Self {
        Self {
            geocoder,
            directions,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn plan(
        &self,
        origin: &str,
        destination: &str,
        frequency: u32,
    ) -> Result<CommutePlan, EngineError> {
        let origin = origin.trim();
        let destination = destination.trim();
        if origin.is_empty() {
            return Err(EngineError::EmptyAddress("origin"));
        }
        if destination.is_empty() {
            return Err(EngineError::EmptyAddress("destination"));
        }
        validate_frequency(frequency)?;

        let (origin_coords, dest_coords) = tokio::try_join!(
            self.geocoder.geocode(origin),
            self.geocoder.geocode(destination)
        )?;

        let routes = self
            .directions
            .get_routes(&origin_coords, &dest_coords)
            .await?;
        if routes.is_empty() {
            warn!(target: "ecoscore", "directions provider returned no routes");
            return Err(EngineError::Directions("no routes returned".to_string()));
        }

        let selection = score_and_select(&routes)?;
        let eco = &selection.best_route;
        let standard = &selection.worst_route;

        let emissions = estimate_savings_with(
            &self.config.emissions,
            standard.metrics.distance_km,
            eco.metrics.distance_km,
            eco.ecoscore,
            frequency,
        )?;

        info!(
            target: "ecoscore",
            candidates = routes.len(),
            frequency,
            eco_score = eco.ecoscore,
            savings = emissions.savings,
            "commute planned"
        );

        Ok(CommutePlan {
            origin: origin.to_string(),
            destination: destination.to_string(),
            distance_standard_km: round2(standard.metrics.distance_km),
            distance_eco_km: round2(eco.metrics.distance_km),
            duration_standard_min: round1(standard.metrics.duration_traffic_min),
            duration_eco_min: round1(eco.metrics.duration_traffic_min),
            origin_coords,
            dest_coords,
            frequency,
            emissions,
            selection,
        })
    }
}
