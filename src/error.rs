//! # Engine errors
//! One taxonomy for the scoring engine and its collaborators.
//!
//! Validation failures (bad routes, bad frequency, empty addresses) and
//! upstream failures (geocoder, directions provider) are kept apart so the
//! HTTP layer can map them to different status codes and messages.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A candidate route has zero legs or an unusable field.
    #[error("malformed route #{index}: {reason}")]
    MalformedRoute { index: usize, reason: String },

    /// Weekly frequency outside 1..=7.
    #[error("frequency must be between 1 and 7 trips per week (got {0})")]
    InvalidFrequency(u32),

    /// Commute distance that is negative or not a number.
    #[error("{field} must be a finite, non-negative number of km (got {value})")]
    InvalidDistance { field: &'static str, value: f64 },

    #[error("{0} address must not be empty")]
    EmptyAddress(&'static str),

    #[error("could not geocode '{address}': {reason}")]
    Geocode { address: String, reason: String },

    #[error("directions provider failed: {0}")]
    Directions(String),
}

/// Coarse class of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Upstream,
}

impl EngineError {
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRoute {
            index,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedRoute { .. }
            | Self::InvalidFrequency(_)
            | Self::InvalidDistance { .. }
            | Self::EmptyAddress(_) => ErrorKind::Validation,
            Self::Geocode { .. } | Self::Directions(_) => ErrorKind::Upstream,
        }
    }

    pub fn is_upstream(&self) -> bool {
        self.kind() == ErrorKind::Upstream
    }
}
