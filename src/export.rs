//! Flat tabular export and display formatting for saved audits.

use crate::calculator::EmissionsResult;
use crate::factors::EmissionFactor;
use crate::store::AuditDocument;

/// Column order of [`export_row`] and [`to_csv`].
pub const EXPORT_COLUMNS: [&str; 23] = [
    "id",
    "savedAt",
    "orgName",
    "reportStart",
    "reportEnd",
    "fuelType",
    "fuelFactor",
    "fuelVolume",
    "gridRegion",
    "gridFactor",
    "electricityKwh",
    "mileageKm",
    "wasteKg",
    "employeeCount",
    "fuelKg",
    "electricityKg",
    "transportKg",
    "wasteCo2Kg",
    "scope1Tonnes",
    "scope2Tonnes",
    "scope3Tonnes",
    "totalTonnes",
    "perEmployeeTonnes",
];

/// One document as raw cell values. Numbers are unrounded; a missing
/// selection or intensity is an empty cell.
pub fn export_row(doc: &AuditDocument) -> Vec<String> {
    let r = &doc.record;
    let e = &doc.result;
    vec![
        doc.id.to_string(),
        doc.saved_at.to_rfc3339(),
        r.org_name.clone(),
        r.report_start.clone(),
        r.report_end.clone(),
        r.fuel_type.map(|f| f.key().to_string()).unwrap_or_default(),
        r.fuel_factor().to_string(),
        r.fuel_volume.to_string(),
        r.grid_region.map(|g| g.key().to_string()).unwrap_or_default(),
        r.grid_factor().to_string(),
        r.electricity_kwh.to_string(),
        r.mileage_km.to_string(),
        r.waste_kg.to_string(),
        r.employee_count.to_string(),
        e.fuel_kg.to_string(),
        e.electricity_kg.to_string(),
        e.transport_kg.to_string(),
        e.waste_co2_kg.to_string(),
        e.scope1_tonnes.to_string(),
        e.scope2_tonnes.to_string(),
        e.scope3_tonnes.to_string(),
        e.total_tonnes.to_string(),
        e.per_employee_tonnes.map(|t| t.to_string()).unwrap_or_default(),
    ]
}

fn csv_cell(cell: &str) -> String {
    if cell.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

fn csv_line<S: AsRef<str>>(cells: &[S]) -> String {
    cells
        .iter()
        .map(|c| csv_cell(c.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Header plus one line per document, `\n` terminated.
pub fn to_csv(docs: &[AuditDocument]) -> String {
    let mut out = csv_line(&EXPORT_COLUMNS[..]);
    out.push('\n');
    for doc in docs {
        out.push_str(&csv_line(&export_row(doc)));
        out.push('\n');
    }
    out
}

/// Compact one-line listing of a document: id, save time, organisation and
/// total tonnes, quoted the same way as [`to_csv`].
pub fn list_line(doc: &AuditDocument, decimals: usize) -> String {
    csv_line(&[
        doc.id.to_string(),
        doc.saved_at.to_rfc3339(),
        doc.record.org_name.clone(),
        format!("{:.decimals$}", doc.result.total_tonnes),
    ])
}

/// Fixed-decimal tonnes for display.
pub fn format_tonnes(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$} t CO2e")
}

/// Human summary of a result, one line per figure.
pub fn summary_lines(result: &EmissionsResult, decimals: usize) -> Vec<String> {
    let intensity = match result.per_employee_tonnes {
        Some(t) => format!("{} per employee", format_tonnes(t, decimals)),
        None => "n/a".to_string(),
    };
    vec![
        format!("Fuel combustion:   {:.2} kg CO2e", result.fuel_kg),
        format!("Vehicle transport: {:.2} kg CO2e", result.transport_kg),
        format!("Electricity:       {:.2} kg CO2e", result.electricity_kg),
        format!("Landfill waste:    {:.2} kg CO2e", result.waste_co2_kg),
        format!("Scope 1: {}", format_tonnes(result.scope1_tonnes, decimals)),
        format!("Scope 2: {}", format_tonnes(result.scope2_tonnes, decimals)),
        format!("Scope 3: {}", format_tonnes(result.scope3_tonnes, decimals)),
        format!("Total:   {}", format_tonnes(result.total_tonnes, decimals)),
        format!("Intensity: {intensity}"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::compute_emissions;
    use crate::factors::FuelType;
    use crate::record::ActivityRecord;
    use chrono::Utc;
    use uuid::Uuid;

    fn doc(org: &str, employees: f64) -> AuditDocument {
        let record = ActivityRecord {
            org_name: org.to_string(),
            fuel_type: Some(FuelType::Lpg),
            fuel_volume: 10.0,
            employee_count: employees,
            ..ActivityRecord::default()
        };
        AuditDocument {
            id: Uuid::nil(),
            result: compute_emissions(&record),
            record,
            saved_at: Utc::now(),
        }
    }

    #[test]
    fn row_matches_header_width() {
        let row = export_row(&doc("Acme", 2.0));
        assert_eq!(row.len(), EXPORT_COLUMNS.len());
        assert_eq!(row[5], "lpg");
        assert_eq!(row[8], "");
        assert_eq!(row[6], "1.512");
    }

    #[test]
    fn csv_quotes_and_empty_intensity() {
        let csv = to_csv(&[doc("Smith, \"Jones\" & Co", 0.0)]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("id,savedAt,orgName,"));
        assert!(lines[0].ends_with("totalTonnes,perEmployeeTonnes"));
        assert!(lines[1].contains("\"Smith, \"\"Jones\"\" & Co\""));
        assert!(lines[1].ends_with(','));
    }

    #[test]
    fn list_line_quotes_org_name() {
        let line = list_line(&doc("Smith, Jones & Co", 2.0), 3);
        let cells: Vec<&str> = line.splitn(3, ',').collect();
        assert_eq!(cells[0], Uuid::nil().to_string());
        assert!(cells[2].starts_with("\"Smith, Jones & Co\","));
        assert!(line.ends_with(",0.015"));
        assert!(list_line(&doc("Acme", 2.0), 3).contains(",Acme,"));
    }

    #[test]
    fn csv_of_nothing_is_header_only() {
        assert_eq!(to_csv(&[]).lines().count(), 1);
    }

    #[test]
    fn summary_formats_tonnes() {
        assert_eq!(format_tonnes(0.38745, 3), "0.387 t CO2e");
        assert_eq!(format_tonnes(0.014, 2), "0.01 t CO2e");
        let lines = summary_lines(&compute_emissions(&ActivityRecord::default()), 3);
        assert_eq!(lines.last().unwrap(), "Intensity: n/a");
        assert!(lines.contains(&"Total:   0.000 t CO2e".to_string()));
    }
}
