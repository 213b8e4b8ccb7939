//! Typed model of the selection payload emitted by the visualization widget.
//!
//! The widget reports selected marks as a set of data tables: each table has
//! ordered column metadata and rows aligned positionally to those columns.
//! Column names are free-form and may be namespaced by the source system, so
//! nothing here interprets them — that is the extractor's job.
//!
//! The wire shape is deliberately lenient: missing fields default to empty,
//! and cell values the widget produces in shapes we don't model (nested
//! arrays, objects) degrade to [`CellValue::Null`] instead of failing the
//! whole payload.

use serde::{Deserialize, Deserializer, Serialize};

/// Everything the widget reported for the current selection.
///
/// An empty payload means the user cleared the selection; callers treat that
/// differently from a selection that resolves to no usable context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionPayload {
    #[serde(default)]
    pub tables: Vec<MarkTable>,
}

impl SelectionPayload {
    /// A cleared selection.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// One data table of selected marks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkTable {
    #[serde(default)]
    pub columns: Vec<MarkColumn>,
    /// Each row is aligned positionally to `columns`. Rows shorter than the
    /// column list are tolerated; missing cells read as null.
    #[serde(default)]
    pub rows: Vec<Vec<CellValue>>,
}

/// Column metadata for a mark table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkColumn {
    #[serde(default, alias = "fieldName")]
    pub field_name: String,
}

/// A single cell value.
///
/// Serializes untagged (`null` / `true` / `3.5` / `"West"`); deserializes
/// from any JSON value, degrading unmodeled shapes to `Null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Null,
}

impl CellValue {
    /// String coercion used for filter values: `None` for null and for empty
    /// text, otherwise the display form of the value.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Text(s) if s.is_empty() => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Number(n) => Some(format_number(*n)),
        }
    }
}

/// Integral floats render without a fractional part ("3", not "3.0"),
/// matching how the widget displays whole-number cells.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(CellValue::from(value))
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(b) => CellValue::Bool(b),
            serde_json::Value::Number(n) => CellValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => CellValue::Text(s),
            // null, arrays, objects: nothing we can use as a filter value
            _ => CellValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_deserializes_from_widget_shape() {
        let json = r#"{
            "tables": [{
                "columns": [{"fieldName": "Region"}, {"fieldName": "Sales"}],
                "rows": [["West", 1200.5], ["East", null]]
            }]
        }"#;
        let payload: SelectionPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.tables.len(), 1);
        let table = &payload.tables[0];
        assert_eq!(table.columns[0].field_name, "Region");
        assert_eq!(table.rows[0][0], CellValue::Text("West".into()));
        assert_eq!(table.rows[1][1], CellValue::Null);
    }

    #[test]
    fn unknown_cell_shapes_degrade_to_null() {
        let json = r#"{"tables": [{"columns": [{"field_name": "X"}], "rows": [[{"nested": true}], [[1,2]]]}]}"#;
        let payload: SelectionPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.tables[0].rows[0][0], CellValue::Null);
        assert_eq!(payload.tables[0].rows[1][0], CellValue::Null);
    }

    #[test]
    fn empty_payload_roundtrip() {
        let payload = SelectionPayload::empty();
        assert!(payload.is_empty());
        let json = serde_json::to_string(&payload).unwrap();
        let back: SelectionPayload = serde_json::from_str(&json).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn cell_text_coercion() {
        assert_eq!(CellValue::Text("West".into()).as_text().as_deref(), Some("West"));
        assert_eq!(CellValue::Text(String::new()).as_text(), None);
        assert_eq!(CellValue::Null.as_text(), None);
        assert_eq!(CellValue::Bool(true).as_text().as_deref(), Some("true"));
        assert_eq!(CellValue::Number(42.0).as_text().as_deref(), Some("42"));
        assert_eq!(CellValue::Number(3.5).as_text().as_deref(), Some("3.5"));
    }
}
