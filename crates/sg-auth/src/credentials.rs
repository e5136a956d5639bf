//! Script credentials.
//!
//! The script key is redacted in Debug output.

use shotgun_json_client::AuthBlock;

use crate::error::{Error, ErrorKind, Result};

/// Server URL plus the script name/key pair used to authenticate.
#[derive(Clone)]
pub struct ScriptCredentials {
    server_url: String,
    script_name: String,
    script_key: String,
    http_proxy: Option<String>,
    session_uuid: Option<String>,
}

impl std::fmt::Debug for ScriptCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptCredentials")
            .field("server_url", &self.server_url)
            .field("script_name", &self.script_name)
            .field("script_key", &"[REDACTED]")
            .field("http_proxy", &self.http_proxy)
            .field("session_uuid", &self.session_uuid)
            .finish()
    }
}

impl ScriptCredentials {
    /// Create new credentials with the given values.
    pub fn new(
        server_url: impl Into<String>,
        script_name: impl Into<String>,
        script_key: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            script_name: script_name.into(),
            script_key: script_key.into(),
            http_proxy: None,
            session_uuid: None,
        }
    }

    /// Route requests through a `host[:port]` proxy.
    pub fn with_http_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.http_proxy = Some(proxy.into());
        self
    }

    /// Associate calls with a browser session.
    pub fn with_session_uuid(mut self, session_uuid: impl Into<String>) -> Self {
        self.session_uuid = Some(session_uuid.into());
        self
    }

    /// Load credentials from environment variables.
    ///
    /// Reads `SHOTGUN_SERVER_URL`, `SHOTGUN_SCRIPT_NAME` and `SHOTGUN_API_KEY`,
    /// plus the optional `SHOTGUN_HTTP_PROXY` and `SHOTGUN_SESSION_UUID`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::new(ErrorKind::EnvVar(name.to_string())))
        };

        let mut creds = Self::new(
            required(crate::ENV_SERVER_URL)?,
            required(crate::ENV_SCRIPT_NAME)?,
            required(crate::ENV_API_KEY)?,
        );
        if let Some(proxy) = lookup(crate::ENV_HTTP_PROXY).filter(|v| !v.is_empty()) {
            creds = creds.with_http_proxy(proxy);
        }
        if let Some(uuid) = lookup(crate::ENV_SESSION_UUID).filter(|v| !v.is_empty()) {
            creds = creds.with_session_uuid(uuid);
        }
        Ok(creds)
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn script_name(&self) -> &str {
        &self.script_name
    }

    /// The script key. Never log this.
    pub fn script_key(&self) -> &str {
        &self.script_key
    }

    pub fn http_proxy(&self) -> Option<&str> {
        self.http_proxy.as_deref()
    }

    pub fn session_uuid(&self) -> Option<&str> {
        self.session_uuid.as_deref()
    }

    /// Returns true if every required field is non-empty.
    pub fn is_valid(&self) -> bool {
        !self.server_url.is_empty() && !self.script_name.is_empty() && !self.script_key.is_empty()
    }

    /// Reject credentials that could never authenticate.
    pub fn validate(&self) -> Result<()> {
        if self.server_url.is_empty() {
            return Err(Error::new(ErrorKind::InvalidCredentials(
                "server url is empty".to_string(),
            )));
        }
        if self.script_name.is_empty() || self.script_key.is_empty() {
            return Err(Error::new(ErrorKind::InvalidCredentials(
                "script name and script key are required".to_string(),
            )));
        }
        Ok(())
    }

    /// Auth block carrying the script credentials only.
    pub(crate) fn auth_block(&self) -> AuthBlock {
        AuthBlock::new(self.script_name.clone(), self.script_key.clone())
    }
}
