//! `plays-client` — typed async HTTP client for the opsdeck plays service.
//!
//! Speaks the service's JSON protocol (`/health`, `/plays`, `/run/{play}`,
//! `/context/actions`, `/approve`) and implements
//! [`opsdeck_core::BackendGateway`], so a [`PlaysClient`] plugs directly
//! into the engine's [`DeckController`](opsdeck_core::DeckController).
//!
//! ```rust,ignore
//! use opsdeck_core::{DeckConfig, DeckController, DetachedViz};
//! use plays_client::PlaysClient;
//!
//! let config = DeckConfig::default();
//! let client = PlaysClient::new(&config.base_url);
//! let mut deck = DeckController::new(client, DetachedViz, config);
//! deck.run_play(serde_json::json!({})).await?;
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::PlaysClient;
pub use error::{ClientError, Result};
pub use types::{HealthResponse, PlaysResponse, RunRequest};
