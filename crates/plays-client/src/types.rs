//! Wire types specific to the plays service HTTP protocol.
//!
//! The shared request/response vocabulary (`RunOutcome`, `ActionPage`,
//! `ApprovalRequest`, `ApprovalReceipt`) lives in `opsdeck-core::gateway`;
//! this module only adds the envelopes the HTTP surface needs.

use serde::{Deserialize, Serialize};

/// Body of `POST /run/{play}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub params: serde_json::Value,
}

impl RunRequest {
    pub fn new(params: serde_json::Value) -> Self {
        Self { params }
    }
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
}

/// Response of `GET /plays`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaysResponse {
    #[serde(default)]
    pub plays: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_request_wraps_params() {
        let req = RunRequest::new(serde_json::json!({"threshold": 30}));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"params": {"threshold": 30}}));
    }

    #[test]
    fn plays_response_defaults_to_empty() {
        let resp: PlaysResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.plays.is_empty());
    }
}
