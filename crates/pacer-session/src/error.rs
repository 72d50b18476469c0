use pacer_core::CoreError;
use pacer_walk::WalkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("could not connect client: {0}")]
    Connect(String),

    #[error(transparent)]
    Walk(#[from] WalkError),
}

pub type SessionResult<T> = Result<T, SessionError>;
