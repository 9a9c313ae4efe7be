use std::time::Duration;

use thiserror::Error;

/// Terminal failure of one insurance request. Never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("insurance fetch timed out after {0:?}")]
    Timeout(Duration),
    #[error("insurance fetch failed: {0}")]
    Source(String),
}

impl From<anyhow::Error> for FetchError {
    fn from(err: anyhow::Error) -> Self {
        FetchError::Source(format!("{err:#}"))
    }
}
