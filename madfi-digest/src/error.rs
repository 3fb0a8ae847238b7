use madfi_typed_data::errors::{ConfigError, TypedDataError};
use madfi_typed_data::signing::SignerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum ErrorKind {
    #[error("load config error: {0}")]
    LoadConfig(#[from] ConfigError),
    #[error("read message error: {0}")]
    ReadMessage(#[from] std::io::Error),
    #[error("parse message error: {0}")]
    ParseMessage(#[from] serde_json::Error),
    #[error("encode message error: {0}")]
    Encode(#[from] TypedDataError),
    #[error("verify signature error: {0}")]
    Verify(#[from] SignerError),
}
