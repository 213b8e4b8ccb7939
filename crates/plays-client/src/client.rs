//! `PlaysClient` — reqwest-backed implementation of the backend gateway.
//!
//! One client per page session. No retry policy and no explicit timeouts:
//! delivery is at-most-once and failures are surfaced to the user to retry
//! (the engine's error policy, not this crate's, decides what happens next).

use async_trait::async_trait;
use tracing::debug;

use opsdeck_core::gateway::{
    ActionPage, ApprovalReceipt, ApprovalRequest, BackendGateway, RunOutcome,
};
use opsdeck_core::{DeckError, FilterContext};

use crate::error::{ClientError, Result};
use crate::types::{PlaysResponse, RunRequest};

#[derive(Debug, Clone)]
pub struct PlaysClient {
    http: reqwest::Client,
    base_url: String,
}

impl PlaysClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    /// Use a pre-configured `reqwest::Client` (proxy, TLS, default headers).
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /health` — `Ok(true)` on any 2xx, `Ok(false)` on a reachable but
    /// unhealthy service. Transport errors still surface as `Err`.
    pub async fn health(&self) -> Result<bool> {
        let resp = self.http.get(self.endpoint("/health")).send().await?;
        Ok(resp.status().is_success())
    }

    /// `GET /plays` — the play names this deployment can run.
    pub async fn plays(&self) -> Result<Vec<String>> {
        let resp = self.http.get(self.endpoint("/plays")).send().await?;
        let resp: PlaysResponse = expect_success(resp).await?.json().await?;
        Ok(resp.plays)
    }

    /// `POST /run/{play}`.
    pub async fn run_play(&self, play: &str, params: &serde_json::Value) -> Result<RunOutcome> {
        debug!(play, "running play");
        let resp = self
            .http
            .post(self.endpoint(&format!("/run/{play}")))
            .json(&RunRequest::new(params.clone()))
            .send()
            .await?;
        Ok(expect_success(resp).await?.json().await?)
    }

    /// `GET /context/actions?play=…` — only resolved dimensions appear in
    /// the query string; an empty context asks for the unscoped list.
    pub async fn list_actions(&self, play: &str, filters: &FilterContext) -> Result<ActionPage> {
        let mut query: Vec<(&str, &str)> = vec![("play", play)];
        query.extend(filters.pairs());
        let resp = self
            .http
            .get(self.endpoint("/context/actions"))
            .query(&query)
            .send()
            .await?;
        Ok(expect_success(resp).await?.json().await?)
    }

    /// `POST /approve` — a single batched submission.
    pub async fn approve(&self, request: &ApprovalRequest) -> Result<ApprovalReceipt> {
        debug!(count = request.actions.len(), "submitting approvals");
        let resp = self
            .http
            .post(self.endpoint("/approve"))
            .json(request)
            .send()
            .await?;
        Ok(expect_success(resp).await?.json().await?)
    }
}

async fn expect_success(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl BackendGateway for PlaysClient {
    async fn health(&self) -> opsdeck_core::Result<bool> {
        PlaysClient::health(self)
            .await
            .map_err(|e| DeckError::backend("health", e))
    }

    async fn plays(&self) -> opsdeck_core::Result<Vec<String>> {
        PlaysClient::plays(self)
            .await
            .map_err(|e| DeckError::backend("plays", e))
    }

    async fn run_play(
        &self,
        play: &str,
        params: &serde_json::Value,
    ) -> opsdeck_core::Result<RunOutcome> {
        PlaysClient::run_play(self, play, params)
            .await
            .map_err(|e| DeckError::backend("run", e))
    }

    async fn list_actions(
        &self,
        play: &str,
        filters: &FilterContext,
    ) -> opsdeck_core::Result<ActionPage> {
        PlaysClient::list_actions(self, play, filters)
            .await
            .map_err(|e| DeckError::backend("list_actions", e))
    }

    async fn approve(&self, request: &ApprovalRequest) -> opsdeck_core::Result<ApprovalReceipt> {
        PlaysClient::approve(self, request)
            .await
            .map_err(|e| DeckError::backend("approve", e))
    }
}
