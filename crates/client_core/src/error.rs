use reqwest::StatusCode;
use shared::error::ProtocolError;
use thiserror::Error;

pub type ClientResult<T> = std::result::Result<T, LabClientError>;

/// Failures of a single backend round trip. Callers treat every variant the
/// same way (the operation is abandoned and state is left untouched); the
/// split exists for logging.
#[derive(Debug, Error)]
pub enum LabClientError {
    #[error("lab backend unreachable or sent an unreadable body: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("lab backend returned {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("lab backend sent a malformed verdict: {0}")]
    Protocol(#[from] ProtocolError),
}

impl LabClientError {
    pub fn is_unreachable(&self) -> bool {
        match self {
            LabClientError::Transport(err) => err.is_connect() || err.is_timeout(),
            _ => false,
        }
    }
}
