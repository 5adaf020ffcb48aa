//! Coverage report entities as produced by `dbt-coverage`.
//!
//! Decoding is permissive: any field may be missing or `null` and falls back
//! to its zero value. Only structurally invalid JSON is rejected. An empty
//! top-level object carries no data at all.

use serde::{Deserialize, Deserializer, Serialize};

/// Documentation coverage for the whole project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Fraction of documented columns, 0.0-1.0.
    #[serde(default, deserialize_with = "null_as_default")]
    pub coverage: f64,
    /// Number of documented columns.
    #[serde(default, deserialize_with = "null_as_default")]
    pub covered: u64,
    /// Number of columns.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
    /// Per-model coverage, in the order reported by the tool.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tables: Vec<TableCoverage>,
}

/// Documentation coverage for a single model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCoverage {
    /// Model name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Fraction of documented columns in this model.
    #[serde(default, deserialize_with = "null_as_default")]
    pub coverage: f64,
    /// Column coverage, in model order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub columns: Vec<ColumnCoverage>,
}

/// Documentation coverage for a single column, effectively 0 or 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnCoverage {
    /// Column name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// 1.0 when documented, 0.0 otherwise.
    #[serde(default, deserialize_with = "null_as_default")]
    pub coverage: f64,
}

impl CoverageReport {
    /// Decode a report from the JSON text written by the coverage tool.
    ///
    /// Returns `Ok(None)` for an empty object.
    pub fn from_json(text: &str) -> serde_json::Result<Option<Self>> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if value.as_object().is_some_and(|fields| fields.is_empty()) {
            return Ok(None);
        }
        serde_json::from_value(value).map(Some)
    }
}

impl TableCoverage {
    /// Names of the columns with no documentation at all, in column order.
    pub fn undocumented_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|column| column.coverage == 0.0)
            .map(|column| column.name.clone())
            .collect()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
