//! `opsdeck-core` — context-resolution and action-lifecycle engine.
//!
//! opsdeck links an embedded BI visualization to a backend "plays" service:
//! a play runs server-side, recommended actions come back ranked, the user
//! narrows them by selecting marks in the visualization, and approves them
//! one at a time or in bulk. This crate is the client-side engine for that
//! loop; it renders nothing and speaks to both collaborators through traits.
//!
//! # Architecture
//!
//! ```text
//! selection payload (widget)
//!     │
//!     ▼
//! extract::resolve_dimension   ← per-dimension homogeneity check
//!     │
//!     ▼
//! context::build_context       ← FilterContext, or "no usable context"
//!     │
//!     ▼
//! DeckController               ← run / fetch / approve lifecycle,
//!     │                          generation-guarded store updates
//!     ▼
//! store::ActionStore           ← pending actions, backend rank order
//!     │
//!     ▼
//! event::UiEvent               ← broadcast to the view layer
//! ```
//!
//! The backend transport lives in the `plays-client` crate; any type
//! implementing [`BackendGateway`] works, which is how the controller tests
//! run without a network.

pub mod action;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod event;
pub mod extract;
pub mod gateway;
pub mod selection;
pub mod store;

pub use action::{Action, ActionType, RunMetadata};
pub use config::DeckConfig;
pub use context::{build_context, Dimension, FilterContext};
pub use controller::{DeckController, Phase};
pub use error::{DeckError, Result};
pub use event::{EventBus, NoticeLevel, UiEvent};
pub use extract::{resolve_dimension, resolve_field, ResolvedField};
pub use gateway::{
    ActionPage, ApprovalReceipt, ApprovalRequest, BackendGateway, DetachedViz, RunOutcome,
    VizGateway,
};
pub use selection::{CellValue, MarkColumn, MarkTable, SelectionPayload};
pub use store::ActionStore;
