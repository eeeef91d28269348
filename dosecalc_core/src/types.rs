//! Core domain types shared by the calculators and the history store.
//!
//! This module defines:
//! - Calculator identifiers and registry metadata
//! - Raw input and result values recorded in history
//! - History entries and the `Recordable` trait calculators implement

use chrono::{DateTime, Utc};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Calculator Identifiers
// ============================================================================

/// Stable identifier of one of the nine clinical tools
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CalculatorKind {
    #[serde(rename = "drip")]
    Drip,
    #[serde(rename = "dilution")]
    Dilution,
    #[serde(rename = "hydro")]
    FluidBalance,
    #[serde(rename = "imc")]
    Bmi,
    #[serde(rename = "oxygen")]
    Oxygen,
    #[serde(rename = "insulin")]
    Insulin,
    #[serde(rename = "heparin")]
    Heparin,
    #[serde(rename = "dpp")]
    DueDate,
    #[serde(rename = "glasgow")]
    Glasgow,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 9] = [
        CalculatorKind::Drip,
        CalculatorKind::Dilution,
        CalculatorKind::FluidBalance,
        CalculatorKind::Bmi,
        CalculatorKind::Oxygen,
        CalculatorKind::Insulin,
        CalculatorKind::Heparin,
        CalculatorKind::DueDate,
        CalculatorKind::Glasgow,
    ];

    /// Identifier used in persisted history
    pub fn id(self) -> &'static str {
        match self {
            CalculatorKind::Drip => "drip",
            CalculatorKind::Dilution => "dilution",
            CalculatorKind::FluidBalance => "hydro",
            CalculatorKind::Bmi => "imc",
            CalculatorKind::Oxygen => "oxygen",
            CalculatorKind::Insulin => "insulin",
            CalculatorKind::Heparin => "heparin",
            CalculatorKind::DueDate => "dpp",
            CalculatorKind::Glasgow => "glasgow",
        }
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CalculatorKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let wanted = s.trim().to_lowercase();
        CalculatorKind::ALL
            .into_iter()
            .find(|kind| kind.id() == wanted)
            .ok_or_else(|| crate::Error::Other(format!("Unknown calculator: {}", s)))
    }
}

/// Grouping used when listing calculators
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorCategory {
    Essential,
    Specialized,
    Assessment,
}

/// Registry metadata for a calculator
#[derive(Clone, Copy, Debug)]
pub struct CalculatorInfo {
    pub kind: CalculatorKind,
    pub name: &'static str,
    pub short_name: &'static str,
    pub description: &'static str,
    pub category: CalculatorCategory,
}

// ============================================================================
// Recorded Values
// ============================================================================

/// A single recorded field: either numeric or free text
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<u8> for FieldValue {
    fn from(value: u8) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Named input fields that produced a calculation
pub type CalculationInput = BTreeMap<String, FieldValue>;

/// Outcome of a calculation as stored in history
///
/// Persisted untagged: a scalar is the bare string or number, a labeled
/// result is a JSON object whose keys keep their insertion order.
#[derive(Clone, Debug, PartialEq)]
pub enum CalculationResult {
    /// A single value, e.g. "20.8 gtt/min"
    Scalar(FieldValue),
    /// Ordered label/value pairs, e.g. totals of a fluid balance
    Labeled(Vec<(String, FieldValue)>),
}

impl CalculationResult {
    /// Build a labeled result from `(label, value)` pairs
    pub fn labeled<L, V>(pairs: impl IntoIterator<Item = (L, V)>) -> Self
    where
        L: Into<String>,
        V: Into<FieldValue>,
    {
        CalculationResult::Labeled(
            pairs
                .into_iter()
                .map(|(label, value)| (label.into(), value.into()))
                .collect(),
        )
    }

    /// Look up a labeled value (always `None` for scalars)
    pub fn get(&self, label: &str) -> Option<&FieldValue> {
        match self {
            CalculationResult::Scalar(_) => None,
            CalculationResult::Labeled(pairs) => pairs
                .iter()
                .find(|(l, _)| l == label)
                .map(|(_, value)| value),
        }
    }
}

impl Serialize for CalculationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CalculationResult::Scalar(value) => value.serialize(serializer),
            CalculationResult::Labeled(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (label, value) in pairs {
                    map.serialize_entry(label, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for CalculationResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CalculationResultVisitor)
    }
}

struct CalculationResultVisitor;

impl<'de> Visitor<'de> for CalculationResultVisitor {
    type Value = CalculationResult;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, a number or a map of labels to values")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(CalculationResult::Scalar(v.into()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(CalculationResult::Scalar(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(CalculationResult::Scalar(v.into()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(CalculationResult::Scalar(FieldValue::Number(v as f64)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(CalculationResult::Scalar(FieldValue::Number(v as f64)))
    }

    // Entries arrive in document order
    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((label, value)) = map.next_entry::<String, FieldValue>()? {
            pairs.push((label, value));
        }
        Ok(CalculationResult::Labeled(pairs))
    }
}

impl fmt::Display for CalculationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationResult::Scalar(value) => write!(f, "{}", value),
            CalculationResult::Labeled(pairs) => {
                for (i, (label, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", label, value)?;
                }
                Ok(())
            }
        }
    }
}

// ============================================================================
// History Types
// ============================================================================

/// A persisted record of one saved calculation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub calculator_type: CalculatorKind,
    pub calculator_name: String,
    pub inputs: CalculationInput,
    pub result: CalculationResult,
    pub timestamp: DateTime<Utc>,
}

/// A successful calculator output that can be saved to history
pub trait Recordable {
    /// Which calculator produced this output
    fn calculator(&self) -> CalculatorKind;

    /// Label stored with the entry
    fn calculator_name(&self) -> String {
        crate::catalog::calculator_info(self.calculator())
            .name
            .to_string()
    }

    /// Input fields as they should appear in history
    fn inputs(&self) -> CalculationInput;

    /// Result as it should appear in history
    fn result(&self) -> CalculationResult;
}

/// Build a `CalculationInput` from `(name, value)` pairs
pub fn input_fields<V: Into<FieldValue>>(
    pairs: impl IntoIterator<Item = (&'static str, V)>,
) -> CalculationInput {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_ids_parse_back() {
        for kind in CalculatorKind::ALL {
            assert_eq!(kind.id().parse::<CalculatorKind>().unwrap(), kind);
        }
        assert!("unknown".parse::<CalculatorKind>().is_err());
    }

    #[test]
    fn test_kind_serializes_as_stable_id() {
        let json = serde_json::to_string(&CalculatorKind::FluidBalance).unwrap();
        assert_eq!(json, "\"hydro\"");
        let kind: CalculatorKind = serde_json::from_str("\"dpp\"").unwrap();
        assert_eq!(kind, CalculatorKind::DueDate);
    }

    #[test]
    fn test_labeled_result_display() {
        let result = CalculationResult::labeled([
            ("Total intake", FieldValue::from("1500mL")),
            ("Balance", FieldValue::from(700.0)),
        ]);
        assert_eq!(result.to_string(), "Total intake: 1500mL, Balance: 700");
        assert_eq!(result.get("Balance"), Some(&FieldValue::Number(700.0)));
        assert_eq!(result.get("Missing"), None);
    }

    #[test]
    fn test_scalar_result_display() {
        let result = CalculationResult::Scalar("20.8 gtt/min".into());
        assert_eq!(result.to_string(), "20.8 gtt/min");
        assert_eq!(result.get("anything"), None);
    }

    #[test]
    fn test_results_persist_as_bare_values_and_objects() {
        let scalar = CalculationResult::Scalar("20.8 gtt/min".into());
        assert_eq!(serde_json::to_string(&scalar).unwrap(), r#""20.8 gtt/min""#);

        let labeled = CalculationResult::labeled([
            ("Total intake", FieldValue::from("1500mL")),
            ("Balance", FieldValue::from("+700mL")),
        ]);
        let json = serde_json::to_string(&labeled).unwrap();
        assert_eq!(json, r#"{"Total intake":"1500mL","Balance":"+700mL"}"#);
        let back: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, labeled);
    }

    #[test]
    fn test_result_accepts_plain_numbers() {
        let result: CalculationResult = serde_json::from_str("15").unwrap();
        assert_eq!(result, CalculationResult::Scalar(FieldValue::Number(15.0)));
        let result: CalculationResult = serde_json::from_str("22.86").unwrap();
        assert_eq!(result, CalculationResult::Scalar(FieldValue::Number(22.86)));
        assert!(serde_json::from_str::<CalculationResult>("[1, 2]").is_err());
    }

    #[test]
    fn test_field_values_untagged_in_json() {
        let inputs = input_fields([("volume", FieldValue::from(500.0)), ("unit", "hours".into())]);
        let json = serde_json::to_string(&inputs).unwrap();
        assert_eq!(json, r#"{"unit":"hours","volume":500.0}"#);
    }
}
