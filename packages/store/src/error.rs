use thiserror::Error;

/// Errors surfaced by the external collaborators (hosted database, reminders API,
/// identity provider). Every variant carries the collaborator's free-text message;
/// there are no structured error codes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("Not signed in")]
    NotSignedIn,

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("{0}")]
    Database(String),

    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
