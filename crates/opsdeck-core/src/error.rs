use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("a play run is already in flight")]
    Busy,

    #[error("backend {op} failed: {message}")]
    Backend { op: String, message: String },

    #[error("visualization gateway: {0}")]
    Viz(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl DeckError {
    /// Wrap a transport-level failure from the backend gateway, tagged with
    /// the operation that issued the request.
    pub fn backend(op: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Backend {
            op: op.into(),
            message: err.to_string(),
        }
    }

    pub fn viz(err: impl std::fmt::Display) -> Self {
        Self::Viz(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
