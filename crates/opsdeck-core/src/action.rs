//! Action data model.
//!
//! An `Action` is a recommended follow-up task produced by the backend in
//! response to a play run. The engine treats actions as opaque beyond their
//! type and identity: business content lives in `metadata` and is passed
//! back to the backend verbatim on approval.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ActionType
// ---------------------------------------------------------------------------

/// Short identifier for what executing the action would do.
///
/// Unrecognized wire values round-trip untouched through `Other`, so
/// approving an action never rewrites its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    SlackMessage,
    CrmTask,
    Other(String),
}

impl ActionType {
    pub fn as_str(&self) -> &str {
        match self {
            ActionType::SlackMessage => "slack_message",
            ActionType::CrmTask => "crm_task",
            ActionType::Other(s) => s,
        }
    }
}

impl From<String> for ActionType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "slack_message" => ActionType::SlackMessage,
            "crm_task" => ActionType::CrmTask,
            _ => ActionType::Other(s),
        }
    }
}

impl From<ActionType> for String {
    fn from(t: ActionType) -> Self {
        t.as_str().to_string()
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// A pending recommended action.
///
/// Created by the backend in response to `run` or a context fetch; held
/// client-side until approved or superseded by a fresh fetch. Approval is
/// terminal for the instance, but the backend remains the source of truth:
/// after an approval the engine re-fetches rather than patching locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Backend-assigned identity, present once the action has been persisted
    /// to the backend's action table.
    #[serde(default, alias = "action_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Opaque execution parameters; may carry an `embed_url` pointer back
    /// into the visualization.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: serde_json::Value,
}

impl Action {
    /// Deep link back into the visualization, if the backend attached one.
    pub fn embed_url(&self) -> Option<&str> {
        self.metadata
            .get("embed_url")
            .or_else(|| self.metadata.get("visual_context"))
            .and_then(serde_json::Value::as_str)
    }

    /// Identity for client-side reconciliation: backend ids when both sides
    /// have one, full structural equality otherwise.
    pub fn same_identity(&self, other: &Action) -> bool {
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }
}

// ---------------------------------------------------------------------------
// RunMetadata
// ---------------------------------------------------------------------------

/// Correlation metadata for the most recent successful play run.
///
/// Overwritten by each new run; attached to approval requests for audit
/// correlation. No history is retained client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
}

impl RunMetadata {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_deserializes_from_backend_row() {
        let json = r#"{
            "action_id": "a-17",
            "type": "salesforce_task",
            "title": "Nudge stalled deal",
            "description": "Deal stuck in Proposal for 31 days",
            "metadata": {"opportunity_id": "006x", "embed_url": "https://viz/deal/006x"}
        }"#;
        let action: Action = serde_json::from_str(json).unwrap();
        assert_eq!(action.id.as_deref(), Some("a-17"));
        assert_eq!(action.action_type, ActionType::Other("salesforce_task".into()));
        assert_eq!(action.embed_url(), Some("https://viz/deal/006x"));
    }

    #[test]
    fn action_type_round_trips_unknown_values() {
        let t = ActionType::from("salesforce_task".to_string());
        assert_eq!(String::from(t), "salesforce_task");
        let t = ActionType::from("slack_message".to_string());
        assert_eq!(t, ActionType::SlackMessage);
        assert_eq!(String::from(t), "slack_message");
    }

    #[test]
    fn identity_prefers_backend_ids() {
        let a = Action {
            id: Some("a-1".into()),
            action_type: ActionType::CrmTask,
            title: None,
            description: "one".into(),
            metadata: serde_json::Value::Null,
        };
        let mut b = a.clone();
        b.description = "changed elsewhere".into();
        assert!(a.same_identity(&b));

        let mut c = a.clone();
        c.id = None;
        assert!(!a.same_identity(&c));
        // Without ids on both sides, structural equality decides.
        let d = c.clone();
        assert!(c.same_identity(&d));
    }

    #[test]
    fn serializing_omits_absent_fields() {
        let action = Action {
            id: None,
            action_type: ActionType::SlackMessage,
            title: None,
            description: "ping channel".into(),
            metadata: serde_json::Value::Null,
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "slack_message", "description": "ping channel"})
        );
    }
}
