use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("plays service returned {status}: {body}")]
    Status { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;
