//! # Emissions & savings
//! Annualized CO2 for the standard and eco route of a recurring commute, and
//! what choosing the eco route saves.
//!
//! The eco side uses the emission tier of its EcoScore; the standard side is
//! always priced at the worst tier (congested baseline). Savings, fuel and
//! money are floored at zero.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EmissionConfig;
use crate::error::EngineError;

pub const MIN_FREQUENCY: u32 = 1;
pub const MAX_FREQUENCY: u32 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionEstimate {
    pub distance_standard_km: f64,
    pub distance_eco_km: f64,
    pub frequency: u32,
    pub emission_factor_standard: f64,
    pub emission_factor_eco: f64,
    /// kg CO2 per year.
    pub total_standard: f64,
    pub total_eco: f64,
    pub savings: f64,
    pub trees_equivalent: u64,
    pub km_car_equivalent: u64,
    /// Litres per year.
    pub fuel_saved: f64,
    pub money_saved: f64,
    pub impact_message: String,
}

/// Estimate with the built-in constants.
pub fn estimate_savings(
    distance_standard_km: f64,
    distance_eco_km: f64,
    eco_score: f64,
    frequency: u32,
) -> Result<EmissionEstimate, EngineError> {
    estimate_savings_with(
        &EmissionConfig::default(),
        distance_standard_km,
        distance_eco_km,
        eco_score,
        frequency,
    )
}

pub fn estimate_savings_with(
    cfg: &EmissionConfig,
    distance_standard_km: f64,
    distance_eco_km: f64,
    eco_score: f64,
    frequency: u32,
) -> Result<EmissionEstimate, EngineError> {
    validate_frequency(frequency)?;
    validate_distance("distance_standard_km", distance_standard_km)?;
    validate_distance("distance_eco_km", distance_eco_km)?;

    let trips_per_year = f64::from(frequency) * cfg.weeks_per_year;
    let factor_std = cfg.worst_kg_per_km;
    let factor_eco = cfg.eco_factor(eco_score);

    let total_standard = distance_standard_km * factor_std * trips_per_year;
    let total_eco = distance_eco_km * factor_eco * trips_per_year;
    let savings = (total_standard - total_eco).max(0.0);

    let (trees, km_car) = if savings > 0.0 {
        (
            (savings / cfg.tree_offset_kg_per_year).round() as u64,
            (savings / cfg.car_kg_per_km).round() as u64,
        )
    } else {
        (0, 0)
    };

    let fuel_saved = ((distance_standard_km - distance_eco_km) / cfg.fuel_km_per_litre
        * trips_per_year)
        .max(0.0);
    let money_saved = (fuel_saved * cfg.fuel_price_per_litre).max(0.0);

    debug!(
        target: "ecoscore",
        eco_score,
        factor_eco,
        total_standard,
        total_eco,
        savings,
        "emissions estimated"
    );

    Ok(EmissionEstimate {
        distance_standard_km: round2(distance_standard_km),
        distance_eco_km: round2(distance_eco_km),
        frequency,
        emission_factor_standard: factor_std,
        emission_factor_eco: factor_eco,
        total_standard: round2(total_standard),
        total_eco: round2(total_eco),
        savings: round2(savings),
        trees_equivalent: trees,
        km_car_equivalent: km_car,
        fuel_saved: round2(fuel_saved),
        money_saved: round2(money_saved),
        impact_message: impact_message(savings).to_string(),
    })
}

pub fn validate_frequency(frequency: u32) -> Result<(), EngineError> {
    if (MIN_FREQUENCY..=MAX_FREQUENCY).contains(&frequency) {
        Ok(())
    } else {
        Err(EngineError::InvalidFrequency(frequency))
    }
}

fn validate_distance(field: &'static str, value: f64) -> Result<(), EngineError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidDistance { field, value })
    }
}

/// Motivational message by annual kg CO2 saved.
pub fn impact_message(savings: f64) -> &'static str {
    if savings > 500.0 {
        "Extraordinary impact! You are a true environmental hero!"
    } else if savings > 200.0 {
        "Excellent contribution to the planet!"
    } else if savings > 50.0 {
        "Great choice! Every kilogram counts!"
    } else {
        "Small actions make a big difference!"
    }
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
