// src/errors.rs

use thiserror::Error;

/// Error categories for the chat client. Server and transport failures are
/// recovered at the call site as error bubbles; store failures degrade to
/// default conversation state; config failures surface at startup only.
#[derive(Debug, Error)]
pub enum ParlanceError {
    #[error("server error: {0}")]
    Server(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("config error: {0}")]
    Config(String),
}

impl ParlanceError {
    pub fn server_error(msg: impl Into<String>) -> Self {
        ParlanceError::Server(msg.into())
    }

    pub fn transport_error(msg: impl Into<String>) -> Self {
        ParlanceError::Transport(msg.into())
    }

    pub fn store_error(msg: impl Into<String>) -> Self {
        ParlanceError::Store(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        ParlanceError::Config(msg.into())
    }
}

pub type ParlanceResult<T> = Result<T, ParlanceError>;
