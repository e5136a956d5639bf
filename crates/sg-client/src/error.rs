//! Error types for sg-client.

/// Result type alias for sg-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sg-client operations.
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

    /// Returns true if the request never produced a well-formed RPC reply.
    pub fn is_transport_error(&self) -> bool {
        self.kind.is_transport_error()
    }

    /// Returns true if the server answered with an application fault.
    pub fn is_fault(&self) -> bool {
        matches!(self.kind, ErrorKind::Fault { .. })
    }

    /// Server-supplied error code of a fault, if any.
    pub fn fault_code(&self) -> Option<i64> {
        match &self.kind {
            ErrorKind::Fault { error_code, .. } => *error_code,
            _ => None,
        }
    }

    /// Returns true if the failure happened at the socket level, meaning the
    /// connection that carried the request should not be reused.
    pub fn is_connection_level(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Connection(_) | ErrorKind::Timeout | ErrorKind::Io(_)
        )
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Server replied with a non-success HTTP status.
    #[error("HTTP error: {status} {message}")]
    Http { status: u16, message: String },

    /// Server replied with a redirect. Redirects are never followed.
    #[error("Unexpected redirect: {status} to {location}")]
    Redirect { status: u16, location: String },

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The reply had no body at all.
    #[error("Empty response body")]
    EmptyBody,

    /// The reply was not JSON.
    #[error("Unexpected content type: {0}")]
    UnexpectedContentType(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The server processed the call and reported an application error.
    #[error("API fault{}: {message}", error_code.map(|c| format!(" {c}")).unwrap_or_default())]
    Fault {
        message: String,
        error_code: Option<i64>,
    },

    /// I/O error while reading or writing a body.
    #[error("I/O error: {0}")]
    Io(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl ErrorKind {
    /// Returns true for failures below the RPC layer.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::Http { .. }
                | ErrorKind::Redirect { .. }
                | ErrorKind::Timeout
                | ErrorKind::Connection(_)
                | ErrorKind::EmptyBody
                | ErrorKind::UnexpectedContentType(_)
                | ErrorKind::Json(_)
                | ErrorKind::Io(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() || err.is_request() {
            ErrorKind::Connection(err.to_string())
        } else if err.is_body() || err.is_decode() {
            ErrorKind::Io(err.to_string())
        } else if let Some(status) = err.status() {
            ErrorKind::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_builder() {
            ErrorKind::Config(err.to_string())
        } else {
            ErrorKind::Other(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source(ErrorKind::Io(err.to_string()), err)
    }
}
