//! Error types for sg-api.

/// Result type alias for sg-api operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sg-api operations.
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

    /// The request never produced a well-formed reply: connection failures,
    /// bad statuses, malformed bodies and failed file transfers.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Transport(_) | ErrorKind::Upload(_) | ErrorKind::Download(_)
        )
    }

    /// The server processed the call and reported an application error.
    pub fn is_fault(&self) -> bool {
        matches!(self.kind, ErrorKind::Fault { .. })
    }

    pub fn is_authentication_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication(_))
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self.kind, ErrorKind::SessionExpired(_))
    }

    pub fn is_deprecated(&self) -> bool {
        matches!(self.kind, ErrorKind::Deprecated { .. })
    }

    /// Fault signalling that the session token in the auth block was rejected.
    pub(crate) fn is_invalid_session(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Fault {
                error_code: Some(crate::INVALID_SESSION_ERROR_CODE),
                ..
            }
        )
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Transport-level failure below the RPC layer.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Application fault reported by the server.
    #[error("API fault{}: {message}", error_code.map(|c| format!(" {c}")).unwrap_or_default())]
    Fault {
        message: String,
        error_code: Option<i64>,
    },

    /// The server refused to authenticate the script.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The session was rejected again right after being renewed.
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// Operation removed from the API.
    #[error("{operation} is no longer supported, use {replacement} instead")]
    Deprecated {
        operation: &'static str,
        replacement: &'static str,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A returned record lacked a valid type or id.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// A reply was well-formed but not shaped as the method promises.
    #[error("Unexpected result: {0}")]
    UnexpectedResult(String),

    /// File upload failed.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// File download failed.
    #[error("Download failed: {0}")]
    Download(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),
}

impl From<shotgun_json_client::Error> for Error {
    fn from(err: shotgun_json_client::Error) -> Self {
        use shotgun_json_client::ErrorKind as ClientKind;

        let kind = match &err.kind {
            ClientKind::Fault {
                message,
                error_code,
            } => ErrorKind::Fault {
                message: message.clone(),
                error_code: *error_code,
            },
            ClientKind::Config(message) | ClientKind::InvalidUrl(message) => {
                ErrorKind::Config(message.clone())
            }
            other => ErrorKind::Transport(other.to_string()),
        };
        Error::with_source(kind, err)
    }
}

impl From<shotgun_json_auth::Error> for Error {
    fn from(err: shotgun_json_auth::Error) -> Self {
        use shotgun_json_auth::ErrorKind as AuthKind;

        let kind = match &err.kind {
            AuthKind::Handshake(message) => ErrorKind::Authentication(message.clone()),
            AuthKind::Transport(message) => ErrorKind::Transport(message.clone()),
            AuthKind::InvalidCredentials(message) | AuthKind::Config(message) => {
                ErrorKind::Config(message.clone())
            }
            AuthKind::EnvVar(name) => {
                ErrorKind::Config(format!("environment variable not set: {name}"))
            }
        };
        Error::with_source(kind, err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source(ErrorKind::Io(err.to_string()), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::UnexpectedResult(err.to_string()), err)
    }
}
