// src/config.rs
//! Engine constants (emission tiers, fuel economy, prices) as an injectable
//! configuration, loaded from TOML or JSON.
//!
//! Lookup order for [`EngineConfig::load_default`]:
//! 1) $ECOROUTE_CONFIG_PATH
//! 2) config/engine.toml
//! 3) config/engine.json
//! 4) built-in defaults

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "ECOROUTE_CONFIG_PATH";
pub const DEFAULT_TOML_PATH: &str = "config/engine.toml";
pub const DEFAULT_JSON_PATH: &str = "config/engine.json";

/// One emission bracket: routes scoring at least `min_score` emit `kg_per_km`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionTier {
    pub min_score: f64,
    pub kg_per_km: f64,
}

fn default_tiers() -> Vec<EmissionTier> {
    [(80.0, 0.115), (65.0, 0.122), (50.0, 0.135), (35.0, 0.148)]
        .into_iter()
        .map(|(min_score, kg_per_km)| EmissionTier {
            min_score,
            kg_per_km,
        })
        .collect()
}
fn default_worst_kg_per_km() -> f64 {
    0.165
}
fn default_tree_offset() -> f64 {
    21.0
}
fn default_car_kg_per_km() -> f64 {
    0.165
}
fn default_fuel_km_per_litre() -> f64 {
    9.6
}
fn default_fuel_price() -> f64 {
    6.50
}
fn default_weeks_per_year() -> f64 {
    52.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionConfig {
    /// Eco-side brackets, checked from the highest threshold down.
    #[serde(default = "default_tiers")]
    pub tiers: Vec<EmissionTier>,
    /// Below every tier, and always for the standard route.
    #[serde(default = "default_worst_kg_per_km")]
    pub worst_kg_per_km: f64,
    /// kg CO2 a tree offsets per year.
    #[serde(default = "default_tree_offset")]
    pub tree_offset_kg_per_year: f64,
    /// Reference car emissions for the "km not driven" comparison.
    #[serde(default = "default_car_kg_per_km")]
    pub car_kg_per_km: f64,
    #[serde(default = "default_fuel_km_per_litre")]
    pub fuel_km_per_litre: f64,
    #[serde(default = "default_fuel_price")]
    pub fuel_price_per_litre: f64,
    #[serde(default = "default_weeks_per_year")]
    pub weeks_per_year: f64,
}

impl Default for EmissionConfig {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
            worst_kg_per_km: default_worst_kg_per_km(),
            tree_offset_kg_per_year: default_tree_offset(),
            car_kg_per_km: default_car_kg_per_km(),
            fuel_km_per_litre: default_fuel_km_per_litre(),
            fuel_price_per_litre: default_fuel_price(),
            weeks_per_year: default_weeks_per_year(),
        }
    }
}

impl EmissionConfig {
    /// Emission factor for an eco route with the given EcoScore.
    pub fn eco_factor(&self, ecoscore: f64) -> f64 {
        self.tiers
            .iter()
            .find(|t| ecoscore >= t.min_score)
            .map(|t| t.kg_per_km)
            .unwrap_or(self.worst_kg_per_km)
    }

    /// Sort tiers descending and reject unusable constants.
    fn sanitize(&mut self) -> Result<()> {
        for t in &self.tiers {
            if !t.min_score.is_finite() || !t.kg_per_km.is_finite() || t.kg_per_km < 0.0 {
                bail!("invalid emission tier: {t:?}");
            }
        }
        self.tiers.sort_by(|a, b| b.min_score.total_cmp(&a.min_score));

        let positive = [
            ("worst_kg_per_km", self.worst_kg_per_km),
            ("tree_offset_kg_per_year", self.tree_offset_kg_per_year),
            ("car_kg_per_km", self.car_kg_per_km),
            ("fuel_km_per_litre", self.fuel_km_per_litre),
            ("weeks_per_year", self.weeks_per_year),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                bail!("{name} must be a positive number (got {v})");
            }
        }
        if !(self.fuel_price_per_litre.is_finite() && self.fuel_price_per_litre >= 0.0) {
            bail!(
                "fuel_price_per_litre must be non-negative (got {})",
                self.fuel_price_per_litre
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub emissions: EmissionConfig,
}

impl EngineConfig {
    /// Load from an explicit path. `.toml` is parsed as TOML, anything else as JSON
    /// with a TOML fallback.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading engine config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let mut cfg = parse(&content, ext.as_str())
            .with_context(|| format!("parsing engine config {}", path.display()))?;
        cfg.emissions.sanitize()?;
        Ok(cfg)
    }

    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        for candidate in [DEFAULT_TOML_PATH, DEFAULT_JSON_PATH] {
            let p = PathBuf::from(candidate);
            if p.exists() {
                return Self::load_from(&p);
            }
        }
        Ok(Self::default())
    }
}

fn parse(s: &str, hint_ext: &str) -> Result<EngineConfig> {
    if hint_ext == "toml" {
        return Ok(toml::from_str(s)?);
    }
    match serde_json::from_str(s) {
        Ok(cfg) => Ok(cfg),
        Err(json_err) => toml::from_str(s)
            .map_err(|_| anyhow!("unsupported engine config format: {json_err}")),
    }
}
