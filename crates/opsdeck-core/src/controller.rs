//! Action lifecycle controller.
//!
//! Owns all client-side state for the run → fetch → render → approve loop
//! and drives both gateways. Every entry point is a named method invokable
//! directly from tests; the view layer subscribes to [`UiEvent`]s instead of
//! being called back.
//!
//! Concurrency model: one logical controller task. Methods take `&mut self`
//! and suspend only at gateway await points, so the store is never mutated
//! concurrently. Fetch responses are still guarded by a generation counter:
//! a response that lost the race to a fresher one is discarded instead of
//! overwriting newer state.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::action::{Action, RunMetadata};
use crate::config::DeckConfig;
use crate::context::{build_context, FilterContext};
use crate::error::{DeckError, Result};
use crate::event::{EventBus, NoticeLevel, UiEvent};
use crate::gateway::{ApprovalRequest, BackendGateway, VizGateway};
use crate::selection::SelectionPayload;
use crate::store::ActionStore;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Observable lifecycle phase. There is no terminal phase; the controller
/// loops for the life of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Running,
    Fetching,
    Filtering,
    Approving,
    Rendered,
}

// ---------------------------------------------------------------------------
// DeckController
// ---------------------------------------------------------------------------

pub struct DeckController<B, V> {
    backend: B,
    viz: Arc<V>,
    config: DeckConfig,
    store: ActionStore,
    run: Option<RunMetadata>,
    play: String,
    busy: bool,
    phase: Phase,
    /// Generation stamped on each issued fetch.
    fetch_seq: u64,
    /// Generation of the last response applied to the store.
    applied_seq: u64,
    events: EventBus,
}

impl<B, V> DeckController<B, V>
where
    B: BackendGateway,
    V: VizGateway + 'static,
{
    pub fn new(backend: B, viz: V, config: DeckConfig) -> Self {
        let play = config.default_play.clone();
        Self {
            backend,
            viz: Arc::new(viz),
            config,
            store: ActionStore::new(),
            run: None,
            play,
            busy: false,
            phase: Phase::Idle,
            fetch_seq: 0,
            applied_seq: 0,
            events: EventBus::default(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<UiEvent> {
        self.events.subscribe()
    }

    pub fn pending_actions(&self) -> &[Action] {
        self.store.pending()
    }

    pub fn active_filters(&self) -> &FilterContext {
        self.store.active_filters()
    }

    pub fn run_id(&self) -> Option<&str> {
        self.run.as_ref().map(|r| r.run_id.as_str())
    }

    pub fn play(&self) -> &str {
        &self.play
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    // ── Run ───────────────────────────────────────────────────────────────

    /// Run the active play and refresh the pending list from the backend's
    /// action table.
    ///
    /// The trigger affordance is disabled for the full duration — request
    /// through chained post-run fetch — and re-enabled on every exit path,
    /// success or failure.
    pub async fn run_play(&mut self, params: serde_json::Value) -> Result<()> {
        if self.busy {
            return Err(DeckError::Busy);
        }
        self.busy = true;
        self.events.emit(UiEvent::TriggerBusy { busy: true });
        let prior_phase = self.phase;
        self.set_phase(Phase::Running);

        let result = self.run_play_inner(params).await;

        self.busy = false;
        self.events.emit(UiEvent::TriggerBusy { busy: false });

        if let Err(err) = &result {
            warn!(play = %self.play, error = %err, "play run failed");
            self.notice(NoticeLevel::Error, format!("Failed to run analysis: {err}"));
            self.set_phase(prior_phase);
        }
        result
    }

    async fn run_play_inner(&mut self, params: serde_json::Value) -> Result<()> {
        let outcome = self.backend.run_play(&self.play, &params).await?;
        info!(play = %self.play, run_id = %outcome.run_id, "play run accepted");
        self.run = Some(RunMetadata::new(outcome.run_id));

        // The run response may preview actions, but the action table is the
        // source of truth; fetch unfiltered and drop any active context.
        self.fetch_actions(FilterContext::new()).await;
        self.schedule_viz_refresh();
        Ok(())
    }

    // ── Fetch ─────────────────────────────────────────────────────────────

    /// Fetch the pending list scoped by `filters` (unscoped when empty) and
    /// replace the store on success. Returns whether a response was applied.
    ///
    /// Transport failures are absorbed here: logged, surfaced as a notice,
    /// and the store is left stale-but-consistent rather than cleared.
    pub async fn fetch_actions(&mut self, filters: FilterContext) -> bool {
        self.fetch_seq += 1;
        let seq = self.fetch_seq;
        self.set_phase(if filters.is_empty() {
            Phase::Fetching
        } else {
            Phase::Filtering
        });
        self.store.set_filters(filters.clone());

        match self.backend.list_actions(&self.play, &filters).await {
            Ok(page) => {
                if seq < self.applied_seq {
                    debug!(
                        seq,
                        applied = self.applied_seq,
                        "discarding stale action fetch response"
                    );
                    return false;
                }
                self.applied_seq = seq;
                // Prefer the backend's echo of what it actually applied.
                let filters = page.filters.unwrap_or(filters);
                debug!(count = page.actions.len(), filters = %filters.describe(), "actions fetched");
                self.store.replace(page.actions, filters);
                self.render();
                true
            }
            Err(err) => {
                warn!(error = %err, "action fetch failed; keeping last known list");
                self.notice(NoticeLevel::Error, "Failed to fetch actions".to_string());
                false
            }
        }
    }

    // ── Selection ─────────────────────────────────────────────────────────

    /// Entry point for the widget's selection-changed event.
    ///
    /// Empty payload: the user cleared the selection — drop the context and
    /// return to the unscoped view. Non-empty payload that resolves to no
    /// dimension (measure-only or heterogeneous selection): ignore entirely,
    /// so an unsupported selection never resets the view.
    pub async fn on_selection_changed(&mut self, payload: &SelectionPayload) {
        if payload.is_empty() {
            debug!("selection cleared; returning to unscoped view");
            self.fetch_actions(FilterContext::new()).await;
            return;
        }

        let context = build_context(payload, &self.config.dimensions);
        if context.is_empty() {
            info!("selection carried no supported dimension fields; ignoring");
            return;
        }

        info!(context = %context.describe(), "selection context resolved");
        self.fetch_actions(context).await;
    }

    /// The clear-context control: best-effort widget deselection, then back
    /// to the unscoped view.
    pub async fn clear_context(&mut self) {
        if let Err(err) = self.viz.clear_selection().await {
            warn!(error = %err, "failed to clear widget selection");
        }
        self.fetch_actions(FilterContext::new()).await;
    }

    // ── Approve ───────────────────────────────────────────────────────────

    /// Approve a batch of actions.
    ///
    /// On success the pending list is re-fetched with the active filters —
    /// the backend, not local mutation, decides what is still pending. Only
    /// if that re-fetch fails does the controller fall back to removing the
    /// approved actions locally, to be reconciled by the next fetch.
    pub async fn approve(&mut self, actions: Vec<Action>) -> Result<()> {
        if actions.is_empty() {
            return Ok(());
        }
        self.set_phase(Phase::Approving);

        let request = ApprovalRequest {
            actions: actions.clone(),
            approver: self.config.approver.clone(),
            run_id: self.run.as_ref().map(|r| r.run_id.clone()),
        };

        match self.backend.approve(&request).await {
            Ok(receipt) => {
                info!(executed = receipt.executed_count, "approvals processed");
                let filters = self.store.active_filters().clone();
                if !self.fetch_actions(filters).await {
                    // Degraded fallback: the approval went through but the
                    // authoritative view is unreachable.
                    for action in &actions {
                        self.store.remove_locally(action);
                    }
                    self.render();
                }
                self.schedule_viz_refresh();
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, count = actions.len(), "approval request failed");
                self.notice(NoticeLevel::Error, "Approval failed".to_string());
                self.set_phase(Phase::Rendered);
                Err(err)
            }
        }
    }

    /// Approve everything currently pending.
    pub async fn approve_all(&mut self) -> Result<()> {
        let all = self.store.pending().to_vec();
        self.approve(all).await
    }

    /// Dismiss one action from the pending view by position. Purely local:
    /// no backend call, and a later fetch may bring the action back.
    pub fn dismiss(&mut self, index: usize) {
        if let Some(action) = self.store.dismiss(index) {
            debug!(index, id = ?action.id, "action dismissed locally");
            self.render();
        }
    }

    // ── Play selection ────────────────────────────────────────────────────

    /// Switch the active play: reset the context, reload the pending list,
    /// and tell the embedding layer to re-source the widget.
    pub async fn set_play(&mut self, play: impl Into<String>) {
        self.play = play.into();
        info!(play = %self.play, "switching play");
        self.events.emit(UiEvent::PlayChanged {
            play: self.play.clone(),
        });
        self.run = None;
        self.fetch_actions(FilterContext::new()).await;
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn render(&mut self) {
        self.events.emit(UiEvent::ActionsRendered {
            actions: self.store.pending().to_vec(),
            filters: self.store.active_filters().clone(),
        });
        self.set_phase(Phase::Rendered);
    }

    fn notice(&self, level: NoticeLevel, message: String) {
        self.events.emit(UiEvent::Notice { level, message });
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            self.phase = phase;
            self.events.emit(UiEvent::PhaseChanged { phase });
        }
    }

    /// Fire-and-forget widget refresh after a short settle delay, so the
    /// widget re-queries data the run or approval just changed.
    ///
    /// Failure downgrades to reloading the widget's source and is never
    /// surfaced to the caller.
    fn schedule_viz_refresh(&self) {
        let viz = Arc::clone(&self.viz);
        let delay = Duration::from_millis(self.config.viz_refresh_delay_ms);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = viz.refresh_data().await {
                warn!(error = %err, "widget data refresh failed; reloading source");
                if let Some(source) = viz.current_source().await {
                    if let Err(err) = viz.set_source(&source, None).await {
                        warn!(error = %err, "widget source reload failed");
                    }
                }
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
