//! Published emission factors.
//!
//! Fuel and grid factors are closed enumerations: the questionnaire only ever
//! offers these options, so a calculation is correct as long as the lookup is.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AuditError;

/// Average passenger vehicle, kg CO2e per km driven.
pub const TRANSPORT_KG_PER_KM: f64 = 0.192;

/// Landfilled mixed waste, kg CO2e per kg sent to landfill.
pub const LANDFILL_KG_PER_KG: f64 = 0.456;

/// Anything that maps a discrete category to a published kg CO2e constant.
pub trait EmissionFactor: Copy + 'static {
    /// Every option, in dropdown order.
    const ALL: &'static [Self];

    /// kg CO2e per activity unit.
    fn kg_co2e_per_unit(&self) -> f64;

    /// Activity unit the factor applies to (m3, L, kWh).
    fn unit(&self) -> &'static str;

    /// Human label as shown in the questionnaire.
    fn label(&self) -> &'static str;

    /// Stable machine key, also the serde representation.
    fn key(&self) -> &'static str;
}

/// Stationary combustion fuels (Scope 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    NaturalGas,
    Diesel,
    Lpg,
    HeatingOil,
    Propane,
}

impl EmissionFactor for FuelType {
    const ALL: &'static [Self] = &[
        FuelType::NaturalGas,
        FuelType::Diesel,
        FuelType::Lpg,
        FuelType::HeatingOil,
        FuelType::Propane,
    ];

    fn kg_co2e_per_unit(&self) -> f64 {
        match self {
            FuelType::NaturalGas => 1.879,
            FuelType::Diesel => 2.663,
            FuelType::Lpg => 1.512,
            FuelType::HeatingOil => 2.753,
            FuelType::Propane => 1.505,
        }
    }

    fn unit(&self) -> &'static str {
        match self {
            FuelType::NaturalGas => "m3",
            _ => "L",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            FuelType::NaturalGas => "Natural Gas (m³)",
            FuelType::Diesel => "Diesel (L)",
            FuelType::Lpg => "LPG (L)",
            FuelType::HeatingOil => "Heating Oil (L)",
            FuelType::Propane => "Propane (L)",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            FuelType::NaturalGas => "natural_gas",
            FuelType::Diesel => "diesel",
            FuelType::Lpg => "lpg",
            FuelType::HeatingOil => "heating_oil",
            FuelType::Propane => "propane",
        }
    }
}

/// Electricity grid regions (Scope 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridRegion {
    CanadaAverage,
    Quebec,
    Ontario,
    Alberta,
    BritishColumbia,
    Usa,
}

impl EmissionFactor for GridRegion {
    const ALL: &'static [Self] = &[
        GridRegion::CanadaAverage,
        GridRegion::Quebec,
        GridRegion::Ontario,
        GridRegion::Alberta,
        GridRegion::BritishColumbia,
        GridRegion::Usa,
    ];

    fn kg_co2e_per_unit(&self) -> f64 {
        match self {
            GridRegion::CanadaAverage => 0.120,
            GridRegion::Quebec => 0.0014,
            GridRegion::Ontario => 0.029,
            GridRegion::Alberta => 0.600,
            GridRegion::BritishColumbia => 0.011,
            GridRegion::Usa => 0.417,
        }
    }

    fn unit(&self) -> &'static str {
        "kWh"
    }

    fn label(&self) -> &'static str {
        match self {
            GridRegion::CanadaAverage => "Canada Average",
            GridRegion::Quebec => "Quebec (Hydro)",
            GridRegion::Ontario => "Ontario",
            GridRegion::Alberta => "Alberta",
            GridRegion::BritishColumbia => "British Columbia",
            GridRegion::Usa => "USA",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            GridRegion::CanadaAverage => "canada_average",
            GridRegion::Quebec => "quebec",
            GridRegion::Ontario => "ontario",
            GridRegion::Alberta => "alberta",
            GridRegion::BritishColumbia => "british_columbia",
            GridRegion::Usa => "usa",
        }
    }
}

/// Factor of an optional selection; nothing selected contributes nothing.
pub fn factor_or_zero<F: EmissionFactor>(selection: Option<F>) -> f64 {
    selection.map(|f| f.kg_co2e_per_unit()).unwrap_or(0.0)
}

fn normalize(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Accepts the stable key, the human label, or the numeric option value the
/// dropdown used to post (e.g. `"2.663"`).
fn lookup<F: EmissionFactor>(raw: &str) -> Option<F> {
    let wanted = normalize(raw);
    if wanted.is_empty() {
        return None;
    }
    if let Some(found) = F::ALL
        .iter()
        .find(|f| f.key() == wanted || normalize(f.label()) == wanted)
    {
        return Some(*found);
    }
    let value: f64 = raw.trim().parse().ok()?;
    F::ALL
        .iter()
        .find(|f| f.kg_co2e_per_unit() == value)
        .copied()
}

impl FromStr for FuelType {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s).ok_or_else(|| AuditError::UnknownFuelType(s.to_string()))
    }
}

impl FromStr for GridRegion {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s).ok_or_else(|| AuditError::UnknownGridRegion(s.to_string()))
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for GridRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
