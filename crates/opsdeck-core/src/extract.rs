//! Field extractor: resolves a named business dimension from a selection
//! payload to a single unambiguous value, or nothing.
//!
//! Selections over aggregated marks frequently span many underlying rows; a
//! dimension is only usable as a filter when the selection is provably
//! homogeneous on it. Column matching is exact (case-insensitive) first,
//! then falls back to a guarded substring match that refuses measure-like
//! names, so a request for "Stage" can never land on "Stage Age Days".

use serde::Serialize;

use crate::selection::{MarkColumn, SelectionPayload};

/// Substrings that mark a column as a measure rather than a dimension.
/// Fuzzy matching skips any column whose name contains one of these.
const MEASURE_GUARDS: &[&str] = &["age", "days"];

/// Outcome of resolving one dimension against a payload.
///
/// `Ambiguous` and `Absent` both collapse to "no value" at the public
/// contract, but the distinction is kept explicit so tests can assert that
/// a heterogeneous selection was rejected rather than simply not found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolvedField {
    /// Every contributing table agreed on exactly this value.
    Resolved { value: String },
    /// A matching column existed but carried more than one distinct value.
    Ambiguous,
    /// No table carried a usable column for this dimension.
    Absent,
}

impl ResolvedField {
    pub fn into_value(self) -> Option<String> {
        match self {
            ResolvedField::Resolved { value } => Some(value),
            ResolvedField::Ambiguous | ResolvedField::Absent => None,
        }
    }
}

/// Resolve `dimension_name` against the payload, per table:
///
/// 1. exact case-insensitive column-name match, else guarded substring match;
/// 2. collect non-null, non-empty cell values of that column, deduplicated;
/// 3. exactly one distinct value wins; zero or several means the table
///    contributes nothing and the next table is tried.
///
/// Never fails: malformed shapes (short rows, empty names) read as absent.
pub fn resolve_dimension(payload: &SelectionPayload, dimension_name: &str) -> Option<String> {
    resolve_field(payload, dimension_name).into_value()
}

/// As [`resolve_dimension`], but keeping the ambiguous-vs-absent distinction.
pub fn resolve_field(payload: &SelectionPayload, dimension_name: &str) -> ResolvedField {
    if payload.is_empty() {
        return ResolvedField::Absent;
    }
    let want = dimension_name.trim().to_lowercase();
    if want.is_empty() {
        return ResolvedField::Absent;
    }

    let mut saw_ambiguous = false;
    for table in &payload.tables {
        let Some(col) = match_column(&table.columns, &want) else {
            continue;
        };

        let mut distinct: Vec<String> = Vec::new();
        for row in &table.rows {
            let Some(text) = row.get(col).and_then(|cell| cell.as_text()) else {
                continue;
            };
            if !distinct.contains(&text) {
                distinct.push(text);
            }
        }

        match distinct.len() {
            1 => return ResolvedField::Resolved {
                value: distinct.remove(0),
            },
            0 => {}
            _ => saw_ambiguous = true,
        }
    }

    if saw_ambiguous {
        ResolvedField::Ambiguous
    } else {
        ResolvedField::Absent
    }
}

fn match_column(columns: &[MarkColumn], want: &str) -> Option<usize> {
    if let Some(idx) = columns
        .iter()
        .position(|c| c.field_name.to_lowercase() == want)
    {
        return Some(idx);
    }
    columns.iter().position(|c| {
        let name = c.field_name.to_lowercase();
        name.contains(want) && !MEASURE_GUARDS.iter().any(|guard| name.contains(guard))
    })
}
