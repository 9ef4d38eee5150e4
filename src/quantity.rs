//! Coercion of raw questionnaire input into usable quantities.
//!
//! Every quantity is a non-negative finite number. Anything else (empty
//! fields, text, null, negatives, NaN) is read as "nothing reported", i.e. 0.
//! Quantities are capped at [`MAX_QUANTITY`] so that factor products and
//! scope sums stay finite.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Largest quantity the calculator accepts; larger finite inputs are capped.
pub const MAX_QUANTITY: f64 = 1.0e15;

/// Clamp a number onto [0, MAX_QUANTITY], mapping NaN and infinities to 0.
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value.min(MAX_QUANTITY)
    } else {
        0.0
    }
}

/// Parse a form field. Surrounding whitespace is ignored.
pub fn parse_quantity(raw: &str) -> f64 {
    raw.trim().parse::<f64>().map(sanitize).unwrap_or(0.0)
}

/// Coerce an arbitrary JSON value.
pub fn from_json(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().map(sanitize).unwrap_or(0.0),
        Value::String(s) => parse_quantity(s),
        _ => 0.0,
    }
}

/// Serde helper for quantity fields: accepts any JSON shape, never fails.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(from_json(&value))
}
