//! # EcoScore
//! Composite 0..100 desirability score per route.
//!
//! Sub-scores (each in [0,100]):
//! - `time`      : normalized free-flow duration (lower is better)
//! - `elevation` : `100 * exp(-gain / 200)`; gain is a placeholder 0 for now
//! - `stops`     : normalized stop estimate (lower is better)
//! - `traffic`   : table lookup on the traffic class
//! - `distance`  : normalized distance (lower is better)
//! - `road`      : table lookup on the road type
//!
//! Time, traffic and stops are correlated, so they are first blended into a
//! single `flow` sub-score and only `flow` enters the top-level weights:
//!
//! `ecoscore = 0.35*flow + 0.20*elevation + 0.25*distance + 0.15*road + 0.05`
//!
//! Clamping to 100 happens only on the final value.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::normalize::{normalize, Direction};
use crate::route::{CandidateSet, RoadType, RouteMetrics, TrafficClass};

const ELEVATION_DECAY_M: f64 = 200.0;

const FLOW_W_TIME: f64 = 0.8;
const FLOW_W_TRAFFIC: f64 = 0.3;
const FLOW_W_STOPS: f64 = 0.2;
const FLOW_DENOM: f64 = FLOW_W_TIME + FLOW_W_TRAFFIC + FLOW_W_STOPS;

const W_FLOW: f64 = 0.35;
const W_ELEVATION: f64 = 0.20;
const W_DISTANCE: f64 = 0.25;
const W_ROAD: f64 = 0.15;
/// Fixed margin; with the four weights above the total is exactly 1.0.
const MARGIN: f64 = 0.05;

/// Score for each traffic class.
pub fn traffic_score(class: TrafficClass) -> f64 {
    match class {
        TrafficClass::FreeFlow => 100.0,
        TrafficClass::Slow => 60.0,
        TrafficClass::TrafficJam => 30.0,
        TrafficClass::Unknown => 50.0,
    }
}

/// Score for each road type.
pub fn road_score(road: RoadType) -> f64 {
    match road {
        RoadType::Trunk => 100.0,
        RoadType::Primary => 70.0,
        RoadType::Secondary => 40.0,
        RoadType::Residential => 20.0,
        RoadType::Unknown => 50.0,
    }
}

pub fn elevation_score(gain_m: f64) -> f64 {
    100.0 * (-gain_m / ELEVATION_DECAY_M).exp()
}

/// Blend of the congestion-related signals.
pub fn flow_score(time: f64, traffic: f64, stops: f64) -> f64 {
    (time * FLOW_W_TIME + traffic * FLOW_W_TRAFFIC + stops * FLOW_W_STOPS) / FLOW_DENOM
}

/// Per-route breakdown, kept in the output for transparency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub time: f64,
    pub elevation: f64,
    pub stops: f64,
    pub traffic: f64,
    pub distance: f64,
    pub road: f64,
    pub flow: f64,
}

impl SubScores {
    /// Unclamped weighted combination.
    pub fn raw_ecoscore(&self) -> f64 {
        W_FLOW * self.flow
            + W_ELEVATION * self.elevation
            + W_DISTANCE * self.distance
            + W_ROAD * self.road
            + MARGIN
    }

    fn rounded(&self) -> Self {
        Self {
            time: round1(self.time),
            elevation: round1(self.elevation),
            stops: round1(self.stops),
            traffic: round1(self.traffic),
            distance: round1(self.distance),
            road: round1(self.road),
            flow: round1(self.flow),
        }
    }
}

/// One candidate after scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRoute {
    /// Position in the original candidate list.
    pub index: usize,
    pub metrics: RouteMetrics,
    /// Rounded to one decimal.
    pub sub_scores: SubScores,
    pub ecoscore: f64,
}

/// Unrounded sub-scores of `route` relative to `set`.
pub fn sub_scores(route: &RouteMetrics, set: &CandidateSet) -> SubScores {
    let time = normalize(route.duration_min, &set.durations(), Direction::LowerIsBetter);
    let stops = normalize(
        f64::from(route.estimated_stops),
        &set.stops(),
        Direction::LowerIsBetter,
    );
    let distance = normalize(route.distance_km, &set.distances(), Direction::LowerIsBetter);
    let traffic = traffic_score(route.traffic_class);

    SubScores {
        time,
        elevation: elevation_score(route.elevation_gain_m),
        stops,
        traffic,
        distance,
        road: road_score(route.road_type),
        flow: flow_score(time, traffic, stops),
    }
}

/// Final EcoScore: clamped to 100 and rounded to one decimal.
pub fn ecoscore(sub: &SubScores) -> f64 {
    round1(sub.raw_ecoscore().min(100.0))
}

/// Score every route of the set, in candidate order.
pub fn score_candidates(set: &CandidateSet) -> Vec<ScoredRoute> {
    set.iter()
        .enumerate()
        .map(|(index, m)| {
            let sub = sub_scores(m, set);
            let score = ecoscore(&sub);
            debug!(
                target: "ecoscore",
                index,
                ecoscore = score,
                flow = sub.flow,
                distance = sub.distance,
                traffic = ?m.traffic_class,
                "route scored"
            );
            ScoredRoute {
                index,
                metrics: m.clone(),
                sub_scores: sub.rounded(),
                ecoscore: score,
            }
        })
        .collect()
}

pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
