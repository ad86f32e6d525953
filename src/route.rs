//! # Route records & factor extraction
//! Raw candidate routes as delivered by a directions provider, and the
//! per-route metrics the scorer works on.
//!
//! Extraction is pure: one `RouteCandidate` in, one `RouteMetrics` out.
//! Multi-leg routes are summed leg by leg.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Placeholder policy until a provider exposes road classes.
pub const DEFAULT_ROAD_TYPE: RoadType = RoadType::Secondary;

/// Placeholder until an elevation source is wired in.
pub const DEFAULT_ELEVATION_GAIN_M: f64 = 0.0;

/// Traffic ratio (traffic duration / free duration) below which traffic flows freely.
const FREE_FLOW_RATIO: f64 = 1.1;
/// Traffic ratio below which traffic is merely slow.
const SLOW_RATIO: f64 = 1.4;

/// One leg of a candidate route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// Duration under current traffic; falls back to `duration_seconds`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_in_traffic_seconds: Option<f64>,
    /// Number of navigation sub-steps in this leg.
    #[serde(default)]
    pub steps: u32,
}

/// Immutable input record: one alternative route between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCandidate {
    /// Provider summary (usually the main road name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub legs: Vec<RouteLeg>,
}

impl RouteCandidate {
    /// Convenience constructor for the common single-leg case.
    pub fn single_leg(
        distance_meters: f64,
        duration_seconds: f64,
        duration_in_traffic_seconds: Option<f64>,
        steps: u32,
    ) -> Self {
        Self {
            summary: None,
            legs: vec![RouteLeg {
                distance_meters,
                duration_seconds,
                duration_in_traffic_seconds,
                steps,
            }],
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficClass {
    FreeFlow,
    Slow,
    TrafficJam,
    /// Never produced by the extractor; scores neutral when supplied.
    Unknown,
}

impl TrafficClass {
    /// Classify by how much longer the trip takes under traffic.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < FREE_FLOW_RATIO {
            Self::FreeFlow
        } else if ratio < SLOW_RATIO {
            Self::Slow
        } else {
            Self::TrafficJam
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadType {
    Trunk,
    Primary,
    Secondary,
    Residential,
    Unknown,
}

/// Raw per-route factors, computed once per candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMetrics {
    pub distance_km: f64,
    pub duration_min: f64,
    pub duration_traffic_min: f64,
    pub estimated_stops: u32,
    pub traffic_class: TrafficClass,
    pub road_type: RoadType,
    pub elevation_gain_m: f64,
}

/// Derive [`RouteMetrics`] from one candidate. `index` is only used for error reporting.
pub fn extract_metrics(index: usize, route: &RouteCandidate) -> Result<RouteMetrics, EngineError> {
    if route.legs.is_empty() {
        return Err(EngineError::malformed(index, "route has no legs"));
    }

    let mut distance_m = 0.0;
    let mut duration_s = 0.0;
    let mut traffic_s = 0.0;
    let mut steps: u64 = 0;

    for (leg_no, leg) in route.legs.iter().enumerate() {
        check_non_negative(index, leg_no, "distance_meters", leg.distance_meters)?;
        check_non_negative(index, leg_no, "duration_seconds", leg.duration_seconds)?;
        if let Some(t) = leg.duration_in_traffic_seconds {
            check_non_negative(index, leg_no, "duration_in_traffic_seconds", t)?;
        }

        distance_m += leg.distance_meters;
        duration_s += leg.duration_seconds;
        traffic_s += leg.duration_in_traffic_seconds.unwrap_or(leg.duration_seconds);
        steps += u64::from(leg.steps);
    }

    let duration_min = duration_s / 60.0;
    let duration_traffic_min = traffic_s / 60.0;

    let ratio = if duration_min > 0.0 {
        duration_traffic_min / duration_min
    } else {
        1.0
    };

    Ok(RouteMetrics {
        distance_km: distance_m / 1000.0,
        duration_min,
        duration_traffic_min,
        estimated_stops: u32::try_from(steps / 2).unwrap_or(u32::MAX),
        traffic_class: TrafficClass::from_ratio(ratio),
        road_type: DEFAULT_ROAD_TYPE,
        elevation_gain_m: DEFAULT_ELEVATION_GAIN_M,
    })
}

fn check_non_negative(
    index: usize,
    leg_no: usize,
    field: &str,
    value: f64,
) -> Result<(), EngineError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::malformed(
            index,
            format!("leg {leg_no}: {field} must be a finite, non-negative number (got {value})"),
        ))
    }
}

/// The full, ordered metrics snapshot for one scoring pass.
///
/// Normalization is relative to this set, so it is built once and only read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSet {
    metrics: Vec<RouteMetrics>,
}

impl CandidateSet {
    /// Extract every candidate; fails on the first malformed route.
    pub fn extract(routes: &[RouteCandidate]) -> Result<Self, EngineError> {
        let metrics = routes
            .iter()
            .enumerate()
            .map(|(i, r)| extract_metrics(i, r))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { metrics })
    }

    pub fn from_metrics(metrics: Vec<RouteMetrics>) -> Self {
        Self { metrics }
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RouteMetrics> {
        self.metrics.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteMetrics> {
        self.metrics.iter()
    }

    pub fn durations(&self) -> Vec<f64> {
        self.metrics.iter().map(|m| m.duration_min).collect()
    }

    pub fn stops(&self) -> Vec<f64> {
        self.metrics
            .iter()
            .map(|m| f64::from(m.estimated_stops))
            .collect()
    }

    pub fn distances(&self) -> Vec<f64> {
        self.metrics.iter().map(|m| m.distance_km).collect()
    }
}
