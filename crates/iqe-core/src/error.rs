//! Shared error type across iqe crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Malformed input or a disallowed value.
    BadRequest,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Internal => "INTERNAL",
        }
    }

    /// HTTP status code this error is reported with.
    pub fn status_code(self) -> u16 {
        match self {
            ClientCode::BadRequest => 400,
            ClientCode::Internal => 500,
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, IqeError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum IqeError {
    /// The request body was not a well-formed submission record.
    #[error("decode: {0}")]
    Decode(String),
    /// The record decoded but carries a value a counter cannot accept.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl IqeError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            IqeError::Decode(_) | IqeError::InvalidValue(_) | IqeError::Config(_) => {
                ClientCode::BadRequest
            }
            IqeError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Reason text without the variant prefix, as written to HTTP clients.
    pub fn reason(&self) -> &str {
        match self {
            IqeError::Decode(s)
            | IqeError::InvalidValue(s)
            | IqeError::Config(s)
            | IqeError::Internal(s) => s,
        }
    }
}

impl From<serde_json::Error> for IqeError {
    fn from(e: serde_json::Error) -> Self {
        IqeError::Decode(e.to_string())
    }
}
