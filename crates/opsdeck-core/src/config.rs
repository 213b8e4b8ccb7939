//! Engine configuration.
//!
//! Constructed programmatically at page load; there is no config file for a
//! page-lifetime system. Serde derives exist so an embedding host can hand
//! the config over as JSON.

use serde::{Deserialize, Serialize};

use crate::context::Dimension;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckConfig {
    /// Base URL of the backend plays service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Identity recorded on every approval for audit purposes.
    #[serde(default = "default_approver")]
    pub approver: String,

    /// Play selected when the page loads.
    #[serde(default = "default_play")]
    pub default_play: String,

    /// Dimensions probed on every selection change.
    #[serde(default = "Dimension::standard")]
    pub dimensions: Vec<Dimension>,

    /// Delay before the post-run / post-approval visualization refresh,
    /// giving backend-side data time to settle before the widget re-queries.
    #[serde(default = "default_refresh_delay_ms")]
    pub viz_refresh_delay_ms: u64,

    /// Read-only fallback source for the widget when the primary source
    /// cannot be loaded. The engine only stores it; the adapter applies it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_viz_url: Option<String>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_approver() -> String {
    "opsdeck-ui".to_string()
}

fn default_play() -> String {
    "pipeline".to_string()
}

fn default_refresh_delay_ms() -> u64 {
    1000
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            approver: default_approver(),
            default_play: default_play(),
            dimensions: Dimension::standard(),
            viz_refresh_delay_ms: default_refresh_delay_ms(),
            fallback_viz_url: None,
        }
    }
}
