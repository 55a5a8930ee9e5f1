/// Domain-specific error types for formrecall
///
/// The memory store client raises these; the orchestrator catches all of them
/// at its boundary so that memory enhancement is never on the caller's
/// critical failure path.

#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("Memory store rejected credentials (401)")]
    Unauthorized,

    #[error("Memory store denied access (403)")]
    Forbidden,

    #[error("Memory store error (status {status}): {message}")]
    Store { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode store response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MemoryError {
    /// Map a non-2xx HTTP status and response body to the error taxonomy.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => MemoryError::Unauthorized,
            403 => MemoryError::Forbidden,
            _ => MemoryError::Store { status, message },
        }
    }
}

impl From<reqwest::Error> for MemoryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            MemoryError::Decode(e.to_string())
        } else {
            MemoryError::Transport(e.to_string())
        }
    }
}
