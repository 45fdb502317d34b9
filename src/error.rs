use thiserror::Error;

use crate::form::FormError;

pub type Result<T> = std::result::Result<T, FlowBuilderError>;

#[derive(Debug, Error)]
pub enum FlowBuilderError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("http error: {0}")]
    Http(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
