use serde_json::{Value, json};
use thiserror::Error;

/// Failures a facade operation can report back to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AeroError {
    /// The directory had no record for the requested name.
    #[error("{message}")]
    NotFound { message: String },

    /// The request was valid but upstream had nothing to report.
    #[error("{message}")]
    NoData { message: String },

    /// Transport failure (`status` is `None`) or a non-2xx upstream reply.
    #[error("{message}")]
    Upstream { status: Option<u16>, message: String },

    #[error("{0}")]
    Validation(String),
}

impl AeroError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound { message: message.into() }
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self::NoData { message: message.into() }
    }

    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream { status, message: message.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AeroError::NotFound { .. } => "not_found",
            AeroError::NoData { .. } => "no_data",
            AeroError::Upstream { .. } => "upstream_error",
            AeroError::Validation(_) => "validation_error",
        }
    }

    /// HTTP status the inbound layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            AeroError::NotFound { .. } | AeroError::NoData { .. } => 404,
            AeroError::Upstream { .. } => 500,
            AeroError::Validation(_) => 400,
        }
    }

    /// Status reported by the upstream server, if it answered at all.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AeroError::Upstream { status, .. } => *status,
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "error_kind": self.kind(),
            "message": self.to_string(),
        })
    }
}
