//! Gateway traits for the engine's two external collaborators: the backend
//! plays service and the visualization widget.
//!
//! The value types live here so the controller and any transport
//! implementation (see the `plays-client` crate) share one vocabulary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::context::FilterContext;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Backend value types
// ---------------------------------------------------------------------------

/// Response to running a play.
///
/// The run response may carry a preview of the generated actions, but the
/// backend's action table — reached through [`BackendGateway::list_actions`]
/// — is the source of truth for what is pending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub run_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_context: Option<String>,
}

/// One page of pending actions, scoped by the filters the backend applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionPage {
    #[serde(default)]
    pub actions: Vec<Action>,
    /// The filters the backend actually applied, echoed back. May be absent
    /// on older backends; callers fall back to the requested filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterContext>,
}

/// A batched approval submission.
///
/// Actions are sent back verbatim as fetched; `run_id` correlates the
/// approval with the run that produced the actions and may be absent for
/// actions approved without a prior run this session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub actions: Vec<Action>,
    pub approver: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
}

/// Acknowledgement of an approval batch.
///
/// Partial failures are not distinguished here; the authoritative re-fetch
/// corrects the view either way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApprovalReceipt {
    #[serde(default, alias = "approved_count")]
    pub executed_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// BackendGateway
// ---------------------------------------------------------------------------

/// The backend plays service: runs analyses, lists pending actions,
/// executes approvals.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Liveness probe. `Ok(true)` when the service is reachable.
    async fn health(&self) -> Result<bool>;

    /// Names of the plays this deployment can run.
    async fn plays(&self) -> Result<Vec<String>>;

    /// Run the named play with the given parameters.
    async fn run_play(&self, play: &str, params: &serde_json::Value) -> Result<RunOutcome>;

    /// List pending actions, scoped by the filter context (unscoped when the
    /// context is empty).
    async fn list_actions(&self, play: &str, filters: &FilterContext) -> Result<ActionPage>;

    /// Submit a batched approval.
    async fn approve(&self, request: &ApprovalRequest) -> Result<ApprovalReceipt>;
}

// ---------------------------------------------------------------------------
// VizGateway
// ---------------------------------------------------------------------------

/// The visualization widget, as far as the engine is concerned: a thing
/// with a source that can be refreshed and whose selection can be cleared.
///
/// Embedding, auth token exchange, and event wiring are the adapter's
/// problem; the engine only drives these four effects.
#[async_trait]
pub trait VizGateway: Send + Sync {
    /// Point the widget at a new source (re-setting the current source is
    /// the reload fallback when [`refresh_data`](Self::refresh_data) is
    /// unsupported).
    async fn set_source(&self, url: &str, token: Option<&str>) -> Result<()>;

    /// Ask the widget to re-query its data in place. May fail on widgets
    /// that do not support data-level refresh.
    async fn refresh_data(&self) -> Result<()>;

    /// Clear the current mark selection. Best-effort; absence of support is
    /// tolerated.
    async fn clear_selection(&self) -> Result<()>;

    /// The currently displayed source URL, if any.
    async fn current_source(&self) -> Option<String>;
}

/// A visualization gateway for headless operation: accepts every effect and
/// does nothing.
#[derive(Debug, Clone, Default)]
pub struct DetachedViz;

#[async_trait]
impl VizGateway for DetachedViz {
    async fn set_source(&self, _url: &str, _token: Option<&str>) -> Result<()> {
        Ok(())
    }

    async fn refresh_data(&self) -> Result<()> {
        Ok(())
    }

    async fn clear_selection(&self) -> Result<()> {
        Ok(())
    }

    async fn current_source(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_receipt_accepts_legacy_field_name() {
        let receipt: ApprovalReceipt =
            serde_json::from_str(r#"{"approved_count": 3, "message": "ok"}"#).unwrap();
        assert_eq!(receipt.executed_count, 3);

        let receipt: ApprovalReceipt =
            serde_json::from_str(r#"{"executed_count": 2, "log_file": "/tmp/x"}"#).unwrap();
        assert_eq!(receipt.executed_count, 2);
    }

    #[test]
    fn run_outcome_tolerates_minimal_response() {
        let outcome: RunOutcome = serde_json::from_str(r#"{"run_id": "r1"}"#).unwrap();
        assert_eq!(outcome.run_id, "r1");
        assert!(outcome.actions.is_empty());
    }

    #[test]
    fn approval_request_omits_absent_run_id() {
        let req = ApprovalRequest {
            actions: vec![],
            approver: "opsdeck-ui".into(),
            run_id: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("run_id").is_none());
    }
}
