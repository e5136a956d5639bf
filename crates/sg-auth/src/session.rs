//! Session token lifecycle.

use serde_json::Value;
use shotgun_json_client::{AuthBlock, RpcRequest, SgHttpClient};
use tracing::{debug, info, instrument, warn};

use crate::credentials::ScriptCredentials;
use crate::error::{Error, ErrorKind, Result};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No token has been requested yet.
    Unauthenticated,
    /// A handshake is in flight.
    Authenticating,
    /// A token is held.
    Authenticated,
    /// The server rejected the held token.
    Expired,
}

/// Holds the credentials and, once a handshake succeeds, a session token.
///
/// The token is only used when the server supports token auth; the caller
/// decides that and asks for an auth block with or without it.
pub struct SessionManager {
    credentials: ScriptCredentials,
    session_uuid: Option<String>,
    token: Option<String>,
    state: SessionState,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("credentials", &self.credentials)
            .field("session_uuid", &self.session_uuid)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("state", &self.state)
            .finish()
    }
}

impl SessionManager {
    pub fn new(credentials: ScriptCredentials) -> Self {
        let session_uuid = credentials.session_uuid().map(str::to_owned);
        Self {
            credentials,
            session_uuid,
            token: None,
            state: SessionState::Unauthenticated,
        }
    }

    pub fn credentials(&self) -> &ScriptCredentials {
        &self.credentials
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Token from the last successful handshake.
    pub fn current_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn session_uuid(&self) -> Option<&str> {
        self.session_uuid.as_deref()
    }

    /// Change the browser session subsequent calls are associated with.
    pub fn set_session_uuid(&mut self, session_uuid: Option<String>) {
        self.session_uuid = session_uuid;
    }

    /// Forget the current token after the server rejected it.
    pub fn invalidate(&mut self) {
        if self.token.take().is_some() {
            debug!("Session token invalidated");
        }
        self.state = SessionState::Expired;
    }

    /// Auth block for the next call, with the session token when requested
    /// and one is held.
    pub fn auth_block(&self, include_token: bool) -> AuthBlock {
        let token = if include_token { self.token.clone() } else { None };
        self.credentials
            .auth_block()
            .with_session_uuid(self.session_uuid.clone())
            .with_session_token(token)
    }

    /// Current token, performing a handshake first if none is held.
    pub async fn ensure_token(&mut self, http: &mut SgHttpClient) -> Result<String> {
        match &self.token {
            Some(token) => Ok(token.clone()),
            None => self.handshake(http).await,
        }
    }

    /// Exchange the script credentials for a session token.
    ///
    /// A rejection by the server is a handshake failure and leaves the
    /// session unauthenticated. It is never retried here.
    #[instrument(skip(self, http), fields(script_name = %self.credentials.script_name()))]
    pub async fn handshake(&mut self, http: &mut SgHttpClient) -> Result<String> {
        if self.state == SessionState::Authenticating {
            warn!("Previous session handshake never completed, restarting");
        }
        self.state = SessionState::Authenticating;
        self.token = None;

        let auth = self.auth_block(false);
        let outcome = match http.call_rpc(&RpcRequest::GetSessionToken, Some(&auth)).await {
            Ok(reply) => extract_session_id(reply.into_value()),
            Err(err) => Err(Error::from(err)),
        };

        match outcome {
            Ok(token) => {
                self.token = Some(token.clone());
                self.state = SessionState::Authenticated;
                info!("Session token acquired");
                Ok(token)
            }
            Err(err) => {
                self.state = SessionState::Unauthenticated;
                warn!(error = %err, "Session handshake failed");
                Err(err)
            }
        }
    }
}

fn extract_session_id(reply: Value) -> Result<String> {
    reply
        .get("session_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| {
            Error::new(ErrorKind::Handshake(
                "reply did not contain a session_id".to_string(),
            ))
        })
}
