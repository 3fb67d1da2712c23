use thiserror::Error;

/// Failure of a single remote submission. The `Display` text is what the
/// user sees in place of the audio player.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with anything other than 200.
    #[error("❌ Error: {status} - {body}")]
    Remote { status: u16, body: String },

    /// Connection refused, DNS failure, timeout and the like.
    #[error("Connection error: {0}")]
    Transport(String),

    /// The scoped temporary file for the audio upload could not be used.
    #[error("Connection error: {0}")]
    TempFile(#[from] std::io::Error),
}

impl ClientError {
    /// Transport failures and 5xx answers may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Remote { status, .. } => *status >= 500,
            ClientError::Transport(_) => true,
            ClientError::TempFile(_) => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}
