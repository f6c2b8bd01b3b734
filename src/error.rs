use thiserror::Error;

/// Error type for manifest encoding and decoding
#[derive(Debug, Error)]
pub enum Error {
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Encode error: {0}")]
    Encode(#[source] serde_json::Error),
}

impl Error {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedDocument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
