//! Emissions calculator: activity quantities to kg CO2e per category, then
//! tonnes per reporting scope.
//!
//! Pure and stateless. Category values stay in kilograms; scope totals, the
//! grand total and the per-employee intensity are in tonnes.

use serde::{Deserialize, Serialize};

use crate::factors::{LANDFILL_KG_PER_KG, TRANSPORT_KG_PER_KM};
use crate::quantity::sanitize;
use crate::record::{sanitized_quantities, ActivityRecord};

const KG_PER_TONNE: f64 = 1000.0;

/// Derived emissions for one [`ActivityRecord`]. Never NaN or infinite:
/// every input passes through [`sanitize`], which caps it at
/// [`MAX_QUANTITY`](crate::quantity::MAX_QUANTITY).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionsResult {
    pub fuel_kg: f64,
    pub electricity_kg: f64,
    pub transport_kg: f64,
    pub waste_co2_kg: f64,
    pub scope1_tonnes: f64,
    pub scope2_tonnes: f64,
    pub scope3_tonnes: f64,
    pub total_tonnes: f64,
    /// Tonnes per head; `None` when no employees are reported.
    pub per_employee_tonnes: Option<f64>,
}

/// Direct fuel combustion, kg CO2e = factor * volume.
pub fn fuel_kg(fuel_factor: f64, fuel_volume: f64) -> f64 {
    sanitize(fuel_factor) * sanitize(fuel_volume)
}

/// Purchased electricity, kg CO2e = grid factor * kWh.
pub fn electricity_kg(grid_factor: f64, electricity_kwh: f64) -> f64 {
    sanitize(grid_factor) * sanitize(electricity_kwh)
}

/// Vehicle transport at the average-vehicle factor.
pub fn transport_kg(mileage_km: f64) -> f64 {
    sanitize(mileage_km) * TRANSPORT_KG_PER_KM
}

/// Landfilled waste at the landfill factor.
pub fn waste_co2_kg(waste_kg: f64) -> f64 {
    sanitize(waste_kg) * LANDFILL_KG_PER_KG
}

/// Intensity metric in tonnes per head.
pub fn per_employee_tonnes(total_tonnes: f64, employee_count: f64) -> Option<f64> {
    let employees = sanitize(employee_count);
    if employees > 0.0 {
        Some(total_tonnes / employees).filter(|t| t.is_finite())
    } else {
        None
    }
}

/// Compute the full result for a record.
///
/// Scope 1 = fuel + transport, Scope 2 = electricity, Scope 3 = waste.
pub fn compute_emissions(record: &ActivityRecord) -> EmissionsResult {
    let [fuel_volume, electricity_kwh, mileage_km, waste_kg, employee_count] =
        sanitized_quantities(record);

    let fuel = fuel_kg(record.fuel_factor(), fuel_volume);
    let electricity = electricity_kg(record.grid_factor(), electricity_kwh);
    let transport = transport_kg(mileage_km);
    let waste = waste_co2_kg(waste_kg);

    let scope1_tonnes = (fuel + transport) / KG_PER_TONNE;
    let scope2_tonnes = electricity / KG_PER_TONNE;
    let scope3_tonnes = waste / KG_PER_TONNE;
    let total_tonnes = scope1_tonnes + scope2_tonnes + scope3_tonnes;

    EmissionsResult {
        fuel_kg: fuel,
        electricity_kg: electricity,
        transport_kg: transport,
        waste_co2_kg: waste,
        scope1_tonnes,
        scope2_tonnes,
        scope3_tonnes,
        total_tonnes,
        per_employee_tonnes: per_employee_tonnes(total_tonnes, employee_count),
    }
}

impl EmissionsResult {
    /// Sum of the four category values in kg.
    pub fn total_kg(&self) -> f64 {
        self.fuel_kg + self.transport_kg + self.electricity_kg + self.waste_co2_kg
    }
}

impl From<&ActivityRecord> for EmissionsResult {
    fn from(record: &ActivityRecord) -> Self {
        compute_emissions(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::{FuelType, GridRegion};

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn category_operators() {
        assert_eq!(fuel_kg(2.663, 100.0), 2.663 * 100.0);
        assert_eq!(electricity_kg(0.120, 500.0), 0.120 * 500.0);
        assert_eq!(transport_kg(200.0), 200.0 * 0.192);
        assert_eq!(waste_co2_kg(50.0), 50.0 * 0.456);
        assert_eq!(transport_kg(-200.0), 0.0);
        assert_eq!(fuel_kg(f64::NAN, 10.0), 0.0);
    }

    #[test]
    fn per_employee_intensity_is_absent_without_headcount() {
        assert_eq!(per_employee_tonnes(1.5, 0.0), None);
        assert_eq!(per_employee_tonnes(1.5, -3.0), None);
        assert_eq!(per_employee_tonnes(1.5, f64::NAN), None);
        assert_eq!(per_employee_tonnes(1.5, 3.0), Some(0.5));
        assert_eq!(per_employee_tonnes(0.0, 4.0), Some(0.0));
    }

    #[test]
    fn mixed_record_splits_into_scopes() {
        let record = ActivityRecord {
            fuel_type: Some(FuelType::NaturalGas),
            fuel_volume: 1000.0,
            grid_region: Some(GridRegion::Alberta),
            electricity_kwh: 2000.0,
            employee_count: 4.0,
            ..ActivityRecord::default()
        };
        let result = compute_emissions(&record);
        assert_close(result.fuel_kg, 1879.0);
        assert_close(result.electricity_kg, 1200.0);
        assert_close(result.scope1_tonnes, 1.879);
        assert_close(result.scope2_tonnes, 1.2);
        assert_eq!(result.scope3_tonnes, 0.0);
        assert_close(result.total_tonnes, 3.079);
        assert_close(result.per_employee_tonnes.unwrap(), 3.079 / 4.0);
    }

    #[test]
    fn record_built_in_code_is_sanitized() {
        let record = ActivityRecord {
            fuel_type: Some(FuelType::Diesel),
            fuel_volume: -50.0,
            mileage_km: f64::INFINITY,
            waste_kg: f64::NAN,
            employee_count: 2.0,
            ..ActivityRecord::default()
        };
        let result = compute_emissions(&record);
        assert_eq!(result.total_tonnes, 0.0);
        assert_eq!(result.per_employee_tonnes, Some(0.0));
    }

    #[test]
    fn oversized_quantities_stay_finite() {
        let record = ActivityRecord {
            fuel_type: Some(FuelType::HeatingOil),
            fuel_volume: 1.0e308,
            grid_region: Some(GridRegion::Alberta),
            electricity_kwh: f64::MAX,
            mileage_km: f64::MAX,
            waste_kg: f64::MAX,
            employee_count: 1.0,
            ..ActivityRecord::default()
        };
        let result = compute_emissions(&record);
        assert!(result.fuel_kg.is_finite());
        assert!(result.total_tonnes.is_finite());
        assert_eq!(result.fuel_kg, 2.753 * crate::quantity::MAX_QUANTITY);
        assert!(result.per_employee_tonnes.unwrap().is_finite());
        assert_eq!(fuel_kg(f64::MAX, f64::MAX), 1.0e30);
    }

    #[test]
    fn serializes_absent_intensity_as_null() {
        let result = compute_emissions(&ActivityRecord::default());
        let value = serde_json::to_value(result).unwrap();
        assert!(value["perEmployeeTonnes"].is_null());
        assert_eq!(value["totalTonnes"], serde_json::json!(0.0));
        assert!(value.get("wasteCo2Kg").is_some());
    }
}
