//! Filter context: the set of dimension values implied by the current
//! visualization selection, and the resolver that builds it.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::extract::resolve_dimension;
use crate::selection::SelectionPayload;

// ---------------------------------------------------------------------------
// Dimension
// ---------------------------------------------------------------------------

/// A categorical attribute usable as a filter.
///
/// The well-known keys cover the standard deployment; `Custom` carries any
/// additional dimension a deployment defines. Serialized as its lowercase
/// query-parameter name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Dimension {
    Segment,
    Region,
    Owner,
    Stage,
    Custom(String),
}

impl Dimension {
    /// The canonical lowercase name, used both as the query parameter and as
    /// the extractor's column probe (column matching is case-insensitive).
    pub fn as_str(&self) -> &str {
        match self {
            Dimension::Segment => "segment",
            Dimension::Region => "region",
            Dimension::Owner => "owner",
            Dimension::Stage => "stage",
            Dimension::Custom(name) => name,
        }
    }

    /// The default dimension set probed on every selection change.
    pub fn standard() -> Vec<Dimension> {
        vec![
            Dimension::Segment,
            Dimension::Region,
            Dimension::Owner,
            Dimension::Stage,
        ]
    }
}

impl From<String> for Dimension {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "segment" => Dimension::Segment,
            "region" => Dimension::Region,
            "owner" => Dimension::Owner,
            "stage" => Dimension::Stage,
            _ => Dimension::Custom(s.to_lowercase()),
        }
    }
}

impl From<Dimension> for String {
    fn from(d: Dimension) -> Self {
        d.as_str().to_string()
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FilterContext
// ---------------------------------------------------------------------------

/// Dimension → single resolved value, in insertion order.
///
/// An entry exists only when the extractor proved the selection implies
/// exactly one value for that dimension; there is no partial or ambiguous
/// state. Serializes as a flat JSON object (`{"region": "West"}`), the shape
/// the backend echoes in its responses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterContext {
    entries: Vec<(Dimension, String)>,
}

impl FilterContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, dimension: &Dimension) -> Option<&str> {
        self.entries
            .iter()
            .find(|(d, _)| d == dimension)
            .map(|(_, v)| v.as_str())
    }

    /// Set or replace the value for a dimension.
    pub fn set(&mut self, dimension: Dimension, value: impl Into<String>) {
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(d, _)| *d == dimension) {
            entry.1 = value;
        } else {
            self.entries.push((dimension, value));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Dimension, &str)> {
        self.entries.iter().map(|(d, v)| (d, v.as_str()))
    }

    /// `(name, value)` pairs for query-string encoding.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(d, v)| (d.as_str(), v.as_str()))
    }

    /// Human-readable summary for logs and notices, e.g.
    /// `"region: West, stage: Proposal"`.
    pub fn describe(&self) -> String {
        self.entries
            .iter()
            .map(|(d, v)| format!("{}: {}", d.as_str(), v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<(Dimension, String)> for FilterContext {
    fn from_iter<I: IntoIterator<Item = (Dimension, String)>>(iter: I) -> Self {
        let mut ctx = FilterContext::new();
        for (d, v) in iter {
            ctx.set(d, v);
        }
        ctx
    }
}

impl Serialize for FilterContext {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (d, v) in &self.entries {
            map.serialize_entry(d.as_str(), v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FilterContext {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ContextVisitor;

        impl<'de> Visitor<'de> for ContextVisitor {
            type Value = FilterContext;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of dimension names to values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut ctx = FilterContext::new();
                // Backends may echo unresolved dimensions as null; skip them.
                while let Some((key, value)) = access.next_entry::<String, Option<String>>()? {
                    if let Some(value) = value {
                        ctx.set(Dimension::from(key), value);
                    }
                }
                Ok(ctx)
            }
        }

        deserializer.deserialize_map(ContextVisitor)
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Build the filter context for a selection by resolving each configured
/// dimension independently. Unresolved dimensions are omitted entirely.
///
/// An empty result on a *non-empty* payload means the selection carried no
/// supported dimension (e.g. only measure marks); callers must treat that as
/// "no usable context" and skip the fetch rather than reset the view.
pub fn build_context(payload: &SelectionPayload, dimensions: &[Dimension]) -> FilterContext {
    let mut ctx = FilterContext::new();
    for dimension in dimensions {
        if let Some(value) = resolve_dimension(payload, dimension.as_str()) {
            ctx.set(dimension.clone(), value);
        }
    }
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{CellValue, MarkColumn, MarkTable};

    fn payload_with(columns: &[&str], rows: &[&[&str]]) -> SelectionPayload {
        SelectionPayload {
            tables: vec![MarkTable {
                columns: columns
                    .iter()
                    .map(|n| MarkColumn {
                        field_name: n.to_string(),
                    })
                    .collect(),
                rows: rows
                    .iter()
                    .map(|r| r.iter().map(|v| CellValue::Text(v.to_string())).collect())
                    .collect(),
            }],
        }
    }

    #[test]
    fn resolves_only_homogeneous_dimensions() {
        let p = payload_with(
            &["Region", "Owner"],
            &[&["West", "lee"], &["West", "dana"]],
        );
        let ctx = build_context(&p, &Dimension::standard());
        assert_eq!(ctx.get(&Dimension::Region), Some("West"));
        assert_eq!(ctx.get(&Dimension::Owner), None);
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn measure_only_selection_yields_empty_context() {
        let p = payload_with(&["Stage Age Days"], &[&["31"], &["12"]]);
        let ctx = build_context(&p, &Dimension::standard());
        assert!(ctx.is_empty());
    }

    #[test]
    fn custom_dimensions_participate() {
        let p = payload_with(&["Tier"], &[&["Gold"]]);
        let dims = vec![Dimension::Custom("tier".into())];
        let ctx = build_context(&p, &dims);
        assert_eq!(ctx.get(&Dimension::Custom("tier".into())), Some("Gold"));
    }

    #[test]
    fn serializes_as_flat_object() {
        let mut ctx = FilterContext::new();
        ctx.set(Dimension::Region, "West");
        ctx.set(Dimension::Stage, "Proposal");
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"region": "West", "stage": "Proposal"})
        );
    }

    #[test]
    fn deserializes_skipping_nulls() {
        let ctx: FilterContext =
            serde_json::from_str(r#"{"region": "West", "owner": null}"#).unwrap();
        assert_eq!(ctx.get(&Dimension::Region), Some("West"));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn set_replaces_existing_value() {
        let mut ctx = FilterContext::new();
        ctx.set(Dimension::Region, "West");
        ctx.set(Dimension::Region, "East");
        assert_eq!(ctx.get(&Dimension::Region), Some("East"));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn describe_lists_entries_in_order() {
        let mut ctx = FilterContext::new();
        ctx.set(Dimension::Segment, "Enterprise");
        ctx.set(Dimension::Owner, "lee");
        assert_eq!(ctx.describe(), "segment: Enterprise, owner: lee");
    }

    #[test]
    fn dimension_parses_well_known_names() {
        assert_eq!(Dimension::from("Region".to_string()), Dimension::Region);
        assert_eq!(
            Dimension::from("tier".to_string()),
            Dimension::Custom("tier".into())
        );
    }
}
