use thiserror::Error;

/// Failure taxonomy for the client session layer.
///
/// Nothing here is fatal: every variant resolves to either a redirect
/// decision in the guard layer or a user-visible message at the CLI.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("No authenticated session")]
    Unauthenticated,

    #[error("Role '{role}' is not permitted here")]
    Unauthorized { role: String },

    #[error("Admin elevation is missing or has expired")]
    ElevationExpired,

    #[error("Credentials rejected by server (status {status})")]
    RejectedCredentials { status: u16 },

    #[error("Access denied: role '{role}' is not a privileged role")]
    AccessDenied { role: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed server response: {0}")]
    InvalidResponse(String),

    #[error("Config directory unavailable: {0}")]
    ConfigDir(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("State serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Transient failures are the only ones the login flows retry.
    /// A server that answered, even with an error status, is never retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}
