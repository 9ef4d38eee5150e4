use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::AuditError;
use crate::factors::{factor_or_zero, FuelType, GridRegion};
use crate::quantity::{self, deserialize_lenient, parse_quantity};

/// One reporting period's raw questionnaire inputs.
///
/// Quantity fields are kept sanitized: deserialization and [`ActivityRecord::apply_edit`]
/// both coerce malformed input to 0. Missing JSON fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityRecord {
    #[serde(deserialize_with = "deserialize_text")]
    pub org_name: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub report_start: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub report_end: String,
    #[serde(deserialize_with = "deserialize_selection")]
    pub fuel_type: Option<FuelType>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub fuel_volume: f64,
    #[serde(deserialize_with = "deserialize_selection")]
    pub grid_region: Option<GridRegion>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub electricity_kwh: f64,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub mileage_km: f64,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub waste_kg: f64,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub employee_count: f64,
}

impl ActivityRecord {
    /// kg CO2e per unit of the selected fuel, 0 when nothing is selected.
    pub fn fuel_factor(&self) -> f64 {
        factor_or_zero(self.fuel_type)
    }

    /// kg CO2e per kWh of the selected grid region, 0 when nothing is selected.
    pub fn grid_factor(&self) -> f64 {
        factor_or_zero(self.grid_region)
    }

    /// Apply one raw form edit. Never fails: bad numbers become 0 and an
    /// unknown fuel or region clears the selection.
    pub fn apply_edit(&mut self, field: ActivityField, raw: &str) {
        match field {
            ActivityField::OrgName => self.org_name = raw.to_string(),
            ActivityField::ReportStart => self.report_start = raw.to_string(),
            ActivityField::ReportEnd => self.report_end = raw.to_string(),
            ActivityField::FuelType => self.fuel_type = parse_selection(raw),
            ActivityField::FuelVolume => self.fuel_volume = parse_quantity(raw),
            ActivityField::GridRegion => self.grid_region = parse_selection(raw),
            ActivityField::ElectricityKwh => self.electricity_kwh = parse_quantity(raw),
            ActivityField::MileageKm => self.mileage_km = parse_quantity(raw),
            ActivityField::WasteKg => self.waste_kg = parse_quantity(raw),
            ActivityField::EmployeeCount => self.employee_count = parse_quantity(raw),
        }
    }
}

/// Questionnaire form keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityField {
    OrgName,
    ReportStart,
    ReportEnd,
    FuelType,
    FuelVolume,
    GridRegion,
    ElectricityKwh,
    MileageKm,
    WasteKg,
    EmployeeCount,
}

impl ActivityField {
    pub const ALL: [ActivityField; 10] = [
        ActivityField::OrgName,
        ActivityField::ReportStart,
        ActivityField::ReportEnd,
        ActivityField::FuelType,
        ActivityField::FuelVolume,
        ActivityField::GridRegion,
        ActivityField::ElectricityKwh,
        ActivityField::MileageKm,
        ActivityField::WasteKg,
        ActivityField::EmployeeCount,
    ];

    /// Form key as posted by the questionnaire.
    pub fn key(&self) -> &'static str {
        match self {
            ActivityField::OrgName => "orgName",
            ActivityField::ReportStart => "reportStart",
            ActivityField::ReportEnd => "reportEnd",
            ActivityField::FuelType => "fuelType",
            ActivityField::FuelVolume => "fuelVolume",
            ActivityField::GridRegion => "gridRegion",
            ActivityField::ElectricityKwh => "electricityKwh",
            ActivityField::MileageKm => "mileageKm",
            ActivityField::WasteKg => "wasteKg",
            ActivityField::EmployeeCount => "employeeCount",
        }
    }
}

impl FromStr for ActivityField {
    type Err = AuditError;

    /// Accepts the camelCase form key or its snake_case spelling. The legacy
    /// `fuelFactor` / `gridFactor` keys select the fuel and region.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.trim().chars().filter(|c| *c != '_').collect();
        let wanted = wanted.to_lowercase();
        match wanted.as_str() {
            "fuelfactor" => return Ok(ActivityField::FuelType),
            "gridfactor" => return Ok(ActivityField::GridRegion),
            _ => {}
        }
        ActivityField::ALL
            .iter()
            .find(|f| f.key().to_lowercase() == wanted)
            .copied()
            .ok_or_else(|| AuditError::UnknownField(s.to_string()))
    }
}

/// Resolve a dropdown value. Empty means unselected; anything unrecognised
/// is logged and treated as unselected.
pub fn parse_selection<F>(raw: &str) -> Option<F>
where
    F: FromStr,
    F::Err: Display,
{
    if raw.trim().is_empty() {
        return None;
    }
    raw.parse::<F>()
        .map_err(|e| {
            warn!("{e}, treating as unselected");
        })
        .ok()
}

fn deserialize_selection<'de, D, F>(deserializer: D) -> Result<Option<F>, D::Error>
where
    D: Deserializer<'de>,
    F: FromStr,
    F::Err: Display,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => parse_selection(&s),
        Value::Number(n) => parse_selection(&n.to_string()),
        _ => None,
    })
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

impl From<&Value> for ActivityRecord {
    /// Build from any JSON document, ignoring shapes that do not fit.
    fn from(value: &Value) -> Self {
        let mut record = ActivityRecord::default();
        let Some(map) = value.as_object() else {
            return record;
        };
        for (key, raw) in map {
            let Ok(field) = key.parse::<ActivityField>() else {
                continue;
            };
            match raw {
                Value::String(s) => record.apply_edit(field, s),
                Value::Number(n) => record.apply_edit(field, &n.to_string()),
                _ => record.apply_edit(field, ""),
            }
        }
        record
    }
}

/// Re-apply quantity coercion to a record built in code.
pub(crate) fn sanitized_quantities(record: &ActivityRecord) -> [f64; 5] {
    [
        quantity::sanitize(record.fuel_volume),
        quantity::sanitize(record.electricity_kwh),
        quantity::sanitize(record.mileage_km),
        quantity::sanitize(record.waste_kg),
        quantity::sanitize(record.employee_count),
    ]
}
