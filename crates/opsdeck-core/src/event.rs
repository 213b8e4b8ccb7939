//! UI event fan-out.
//!
//! The engine never renders anything itself; it broadcasts what the view
//! layer should show. Subscribers may be absent or lag behind — sends are
//! lossy and never fail the controller.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::action::Action;
use crate::context::FilterContext;
use crate::controller::Phase;

/// Everything the view layer needs to react to.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// The pending list changed; re-render it with this filter badge.
    ActionsRendered {
        actions: Vec<Action>,
        filters: FilterContext,
    },
    /// Disable or re-enable the run trigger affordance.
    TriggerBusy { busy: bool },
    /// The active play changed; the embedding layer should reload the
    /// widget source for it.
    PlayChanged { play: String },
    /// Non-blocking user-visible notification.
    Notice { level: NoticeLevel, message: String },
    PhaseChanged { phase: Phase },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

/// Broadcast sender wrapper shared between the controller and subscribers.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<UiEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.tx.subscribe()
    }

    /// Lossy send: a missing or lagging subscriber is not an error.
    pub(crate) fn emit(&self, event: UiEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emit_without_subscribers_is_fine() {
        let bus = EventBus::default();
        bus.emit(UiEvent::TriggerBusy { busy: true });
    }

    #[tokio::test]
    async fn subscribers_receive_events_in_order() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        bus.emit(UiEvent::TriggerBusy { busy: true });
        bus.emit(UiEvent::TriggerBusy { busy: false });

        assert!(matches!(
            rx.recv().await.unwrap(),
            UiEvent::TriggerBusy { busy: true }
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            UiEvent::TriggerBusy { busy: false }
        ));
    }

    #[test]
    fn events_serialize_with_type_tags() {
        let ev = UiEvent::Notice {
            level: NoticeLevel::Error,
            message: "Approval failed".into(),
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "notice");
        assert_eq!(json["level"], "error");
    }
}
