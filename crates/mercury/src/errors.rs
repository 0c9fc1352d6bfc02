use serde::{Deserialize, Serialize};
use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum RelayError {
    #[error("{0}")]
    Transport(String),

    #[error("API request failed with status {status}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Could not parse {0}")]
    Parse(String),

    #[error("{0}")]
    Validation(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::Transport(err.to_string())
    }
}

pub type RelayResult<T> = Result<T, RelayError>;
