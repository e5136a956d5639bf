//! Error types for sg-auth.
//!
//! Error messages never include script keys or session tokens.

/// Result type alias for sg-auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sg-auth operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// The server refused to issue a session for these credentials.
    pub fn is_handshake_failure(&self) -> bool {
        matches!(self.kind, ErrorKind::Handshake(_))
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Invalid credentials configuration.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Environment variable not set.
    #[error("Environment variable not set: {0}")]
    EnvVar(String),

    /// The session handshake was rejected or returned no session id.
    #[error("Session handshake failed: {0}")]
    Handshake(String),

    /// The handshake never got a well-formed reply.
    #[error("Transport error during handshake: {0}")]
    Transport(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<shotgun_json_client::Error> for Error {
    fn from(err: shotgun_json_client::Error) -> Self {
        use shotgun_json_client::ErrorKind as ClientKind;

        let kind = match &err.kind {
            ClientKind::Fault { message, .. } => ErrorKind::Handshake(message.clone()),
            ClientKind::Config(message) | ClientKind::InvalidUrl(message) => {
                ErrorKind::Config(message.clone())
            }
            other => ErrorKind::Transport(other.to_string()),
        };
        Error::with_source(kind, err)
    }
}
