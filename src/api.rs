use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::config::EngineConfig;
use crate::emissions::{estimate_savings_with, EmissionEstimate};
use crate::error::{EngineError, ErrorKind};
use crate::route::RouteCandidate;
use crate::selector::{score_and_select, SelectionResult};

#[derive(Clone)]
pub struct AppState {
    config: Arc<EngineConfig>,
}

impl AppState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/score", post(score))
        .route("/savings", post(savings))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Error as an HTTP response: validation (including unreadable JSON bodies)
/// → 400, collaborators → 502.
pub enum ApiError {
    Engine(EngineError),
    Body(JsonRejection),
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        Self::Engine(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        Self::Body(r)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: ErrorKind,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (kind, message) = match self {
            Self::Engine(e) => (e.kind(), e.to_string()),
            Self::Body(r) => (ErrorKind::Validation, r.body_text()),
        };
        let status = match kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Upstream => StatusCode::BAD_GATEWAY,
        };
        let label = match kind {
            ErrorKind::Validation => "validation",
            ErrorKind::Upstream => "upstream",
        };
        counter!("ecoroute_errors_total", "kind" => label).increment(1);
        warn!(target: "ecoscore", error = %message, "request rejected");
        (
            status,
            Json(ErrorBody {
                error: message,
                kind,
            }),
        )
            .into_response()
    }
}

#[derive(Deserialize)]
struct ScoreReq {
    routes: Vec<RouteCandidate>,
    /// When present, the response also carries a savings estimate.
    #[serde(default)]
    frequency: Option<u32>,
}

#[derive(Serialize)]
struct ScoreResp {
    #[serde(flatten)]
    selection: SelectionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    emissions: Option<EmissionEstimate>,
}

async fn score(
    State(state): State<AppState>,
    body: Result<Json<ScoreReq>, JsonRejection>,
) -> Result<Json<ScoreResp>, ApiError> {
    counter!("ecoroute_score_requests_total").increment(1);
    let Json(body) = body?;

    let selection = score_and_select(&body.routes)?;
    histogram!("ecoroute_best_ecoscore").record(selection.analysis.eco_score);

    let emissions = match body.frequency {
        Some(f) => Some(estimate_savings_with(
            &state.config.emissions,
            selection.worst_route.metrics.distance_km,
            selection.best_route.metrics.distance_km,
            selection.best_route.ecoscore,
            f,
        )?),
        None => None,
    };

    Ok(Json(ScoreResp {
        selection,
        emissions,
    }))
}

#[derive(Deserialize)]
struct SavingsReq {
    distance_standard_km: f64,
    distance_eco_km: f64,
    eco_score: f64,
    frequency: u32,
}

async fn savings(
    State(state): State<AppState>,
    body: Result<Json<SavingsReq>, JsonRejection>,
) -> Result<Json<EmissionEstimate>, ApiError> {
    let Json(body) = body?;
    let estimate = estimate_savings_with(
        &state.config.emissions,
        body.distance_standard_km,
        body.distance_eco_km,
        body.eco_score,
        body.frequency,
    )?;
    Ok(Json(estimate))
}
