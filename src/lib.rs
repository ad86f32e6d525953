// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod emissions;
pub mod error;
pub mod metrics;
pub mod normalize;
pub mod planner;
pub mod providers;
pub mod route;
pub mod scoring;
pub mod selector;

// ---- Re-exports for stable public API ----
pub use crate::api::create_router;
pub use crate::config::EngineConfig;
pub use crate::emissions::{estimate_savings, estimate_savings_with, EmissionEstimate};
pub use crate::error::{EngineError, ErrorKind};
pub use crate::planner::{CommutePlan, CommutePlanner};
pub use crate::route::{CandidateSet, RouteCandidate, RouteLeg, RouteMetrics};
pub use crate::selector::{score_and_select, SelectionResult};
