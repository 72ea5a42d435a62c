use thiserror::Error;

/// Tether-specific error types for backend operations
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to connect to control plane: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("invalid credentials (unauthorized)")]
    Auth,

    #[error("control plane API error (status {status}): {body}")]
    Protocol { status: u16, body: String },

    #[error("{0}")]
    Validation(String),

    #[error("no Docker endpoints configured in the control plane")]
    NoEndpoints,

    #[error("failed to parse {what} response: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl BackendError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True for errors caused by bad local input, raised before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// True for rejected credentials, as opposed to a generic protocol failure.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth)
    }
}

/// Convenience type alias for backend results
pub type Result<T, E = BackendError> = std::result::Result<T, E>;
