// tests/commute_planner.rs
//
// End-to-end planning over in-memory collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use eco_router::error::{EngineError, ErrorKind};
use eco_router::planner::CommutePlanner;
use eco_router::providers::{Coordinates, DirectionsProvider, Geocoder};
use eco_router::route::RouteCandidate;
use eco_router::selector::SelectionStrategy;

struct FakeGeocoder {
    known: HashMap<String, (f64, f64)>,
    calls: Arc<AtomicUsize>,
}

impl FakeGeocoder {
    fn new(calls: Arc<AtomicUsize>) -> Self {
        let known = HashMap::from([
            ("Av. Paulista, 1000".to_string(), (-23.5614, -46.6559)),
            ("Rua Augusta, 500".to_string(), (-23.5505, -46.6476)),
        ]);
        Self { known, calls }
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.known
            .get(address)
            .map(|&(lat, lng)| Coordinates {
                lat,
                lng,
                formatted_address: address.to_string(),
            })
            .ok_or_else(|| EngineError::Geocode {
                address: address.to_string(),
                reason: "ZERO_RESULTS".to_string(),
            })
    }
}

enum FakeDirections {
    Routes(Vec<RouteCandidate>),
    Down,
}

#[async_trait]
impl DirectionsProvider for FakeDirections {
    async fn get_routes(
        &self,
        _origin: &Coordinates,
        _destination: &Coordinates,
    ) -> Result<Vec<RouteCandidate>, EngineError> {
        match self {
            Self::Routes(r) => Ok(r.clone()),
            Self::Down => Err(EngineError::Directions("OVER_QUERY_LIMIT".to_string())),
        }
    }
}

fn alternatives() -> Vec<RouteCandidate> {
    vec![
        RouteCandidate::single_leg(10_000.0, 1200.0, Some(1200.0), 4).with_summary("Av. Rebouças"),
        RouteCandidate::single_leg(10_800.0, 1080.0, Some(1080.0), 2).with_summary("Marginal"),
    ]
}

fn planner(directions: FakeDirections) -> (CommutePlanner<FakeGeocoder, FakeDirections>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    (
        CommutePlanner::new(FakeGeocoder::new(calls.clone()), directions),
        calls,
    )
}

#[tokio::test]
async fn plans_a_weekday_commute() {
    let (p, calls) = planner(FakeDirections::Routes(alternatives()));
    let plan = p
        .plan("  Av. Paulista, 1000 ", "Rua Augusta, 500", 5)
        .await
        .expect("plan");

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(plan.origin, "Av. Paulista, 1000");
    assert_eq!(plan.selection.analysis.strategy, SelectionStrategy::EcoscoreV4);
    assert_eq!(plan.selection.best_route.index, 1);
    assert_eq!(plan.distance_eco_km, 10.8);
    assert_eq!(plan.distance_standard_km, 10.0);
    assert_eq!(plan.duration_eco_min, 18.0);
    assert_eq!(plan.duration_standard_min, 20.0);
    assert_eq!(plan.emissions.frequency, 5);
    assert_eq!(plan.emissions.emission_factor_eco, 0.135);
    assert!(plan.emissions.savings >= 0.0);
}

#[tokio::test]
async fn empty_address_is_rejected_before_lookup() {
    let (p, calls) = planner(FakeDirections::Routes(alternatives()));
    let err = p.plan("   ", "Rua Augusta, 500", 3).await.unwrap_err();
    assert_eq!(err, EngineError::EmptyAddress("origin"));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn bad_frequency_is_rejected_before_lookup() {
    let (p, calls) = planner(FakeDirections::Routes(alternatives()));
    let err = p
        .plan("Av. Paulista, 1000", "Rua Augusta, 500", 0)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::InvalidFrequency(0));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn geocoder_failure_is_upstream() {
    let (p, _) = planner(FakeDirections::Routes(alternatives()));
    let err = p
        .plan("Av. Paulista, 1000", "Nowhere 42", 2)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Geocode { .. }));
    assert!(err.is_upstream());
}

#[tokio::test]
async fn directions_failure_is_upstream() {
    let (p, _) = planner(FakeDirections::Down);
    let err = p
        .plan("Av. Paulista, 1000", "Rua Augusta, 500", 2)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::Directions("OVER_QUERY_LIMIT".to_string()));
    assert_eq!(err.kind(), ErrorKind::Upstream);
}

#[tokio::test]
async fn no_routes_is_a_directions_error() {
    let (p, _) = planner(FakeDirections::Routes(Vec::new()));
    let err = p
        .plan("Av. Paulista, 1000", "Rua Augusta, 500", 2)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Directions(_)));
}

#[tokio::test]
async fn malformed_provider_route_is_validation() {
    let mut routes = alternatives();
    routes.push(RouteCandidate {
        summary: None,
        legs: Vec::new(),
    });
    let (p, _) = planner(FakeDirections::Routes(routes));
    let err = p
        .plan("Av. Paulista, 1000", "Rua Augusta, 500", 2)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::MalformedRoute { index: 2, .. }));
}

#[tokio::test]
async fn single_alternative_is_neutral() {
    let (p, _) = planner(FakeDirections::Routes(vec![RouteCandidate::single_leg(
        7_500.0, 900.0, None, 6,
    )]));
    let plan = p
        .plan("Av. Paulista, 1000", "Rua Augusta, 500", 7)
        .await
        .unwrap();
    assert_eq!(plan.selection.analysis.strategy, SelectionStrategy::SingleRoute);
    assert_eq!(plan.selection.best_route.ecoscore, 50.0);
    // Neutral 50 → 0.135 kg/km tier against the 0.165 baseline.
    assert_eq!(plan.emissions.emission_factor_eco, 0.135);
}
