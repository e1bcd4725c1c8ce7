use std::fmt;

/// Errors surfaced by the client, mirroring the backend's error kinds plus
/// the failure modes the client itself can hit (transport, token storage).
#[derive(Debug)]
pub enum ClientError {
    /// The server rejected the input (400/422).
    Validation(String),
    /// The email is already registered (409).
    DuplicateEmail(String),
    /// Login was rejected; the server does not say which part was wrong.
    InvalidCredentials,
    /// The token was missing, invalid, or expired (401). The caller should
    /// tear the session down and re-authenticate.
    Unauthorized(String),
    /// The referenced record does not exist for this caller (404).
    NotFound(String),
    /// Any other non-success response.
    Api { status: u16, message: String },
    /// The request never completed.
    Transport(reqwest::Error),
    /// Reading or writing the persisted token failed.
    Storage(std::io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClientError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            ClientError::DuplicateEmail(msg) => write!(f, "Duplicate email: {}", msg),
            ClientError::InvalidCredentials => write!(f, "Invalid credentials"),
            ClientError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ClientError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ClientError::Api { status, message } => {
                write!(f, "API error ({}): {}", status, message)
            }
            ClientError::Transport(e) => write!(f, "Transport error: {}", e),
            ClientError::Storage(e) => write!(f, "Token storage error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> ClientError {
        ClientError::Transport(error)
    }
}

impl From<std::io::Error> for ClientError {
    fn from(error: std::io::Error) -> ClientError {
        ClientError::Storage(error)
    }
}

impl ClientError {
    /// True for the kinds that mean the session is no longer usable and the
    /// holder should log out.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthorized(_) | ClientError::InvalidCredentials
        )
    }
}
