//! Shotgun JSON API client.
//!
//! This client wraps `SgHttpClient` from `sg-client` and the session from
//! `sg-auth`, and provides typed methods for every API operation: find,
//! CRUD, schema reads and edits, and file transfer.

use serde_json::Value;
use shotgun_json_auth::{ScriptCredentials, SessionManager};
use shotgun_json_client::{
    ClientConfig, FieldValue, RpcRequest, RpcResponse, ServerCapabilities, ServerEndpoint,
    SgHttpClient,
};
use tracing::{debug, info, instrument, warn};

use crate::capabilities::ClientCapabilities;
use crate::error::{Error, ErrorKind, Result};
use crate::record::EntityRecord;

mod binary;
mod crud;
mod find;
mod schema;

pub use binary::UploadOptions;

/// Shotgun JSON API client.
///
/// Operations take `&mut self`: a client owns one connection per server and
/// one session, and serves one call at a time. Use one client per task.
///
/// # Example
///
/// ```rust,ignore
/// use shotgun_json_api::{FindQuery, ScriptCredentials, ShotgunClient};
///
/// let creds = ScriptCredentials::new("https://studio.shotgunstudio.com", "tool", "key");
/// let mut sg = ShotgunClient::new(creds)?;
///
/// let shots = sg.find(&FindQuery::new("Shot").fields(["code"]).limit(10)).await?;
/// let version = sg.create("Version", &fields, &["code"]).await?;
/// sg.delete("Version", version.id()).await?;
/// ```
#[derive(Debug)]
pub struct ShotgunClient {
    http: SgHttpClient,
    session: SessionManager,
    server_caps: Option<ServerCapabilities>,
    client_caps: ClientCapabilities,
}

impl ShotgunClient {
    /// Create a client with default configuration.
    ///
    /// No request is made until the first operation.
    pub fn new(credentials: ScriptCredentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create a client with custom configuration.
    pub fn with_config(credentials: ScriptCredentials, config: ClientConfig) -> Result<Self> {
        credentials.validate()?;
        let endpoint = ServerEndpoint::parse(
            credentials.server_url(),
            &config.api_version,
            credentials.http_proxy(),
        )?;
        Ok(Self {
            http: SgHttpClient::new(endpoint, config),
            session: SessionManager::new(credentials),
            server_caps: None,
            client_caps: ClientCapabilities::detect(),
        })
    }

    /// Create a client from `SHOTGUN_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ScriptCredentials::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        self.http.config()
    }

    pub fn endpoint(&self) -> &ServerEndpoint {
        self.http.endpoint()
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn client_caps(&self) -> &ClientCapabilities {
        &self.client_caps
    }

    /// Replace detected client capabilities, e.g. to resolve local paths for
    /// another platform.
    pub fn set_client_caps(&mut self, client_caps: ClientCapabilities) {
        self.client_caps = client_caps;
    }

    /// Server capabilities if already negotiated.
    pub fn cached_server_caps(&self) -> Option<&ServerCapabilities> {
        self.server_caps.as_ref()
    }

    /// Associate subsequent calls with a browser session, or clear it.
    pub fn set_session_uuid(&mut self, session_uuid: Option<&str>) {
        self.session.set_session_uuid(session_uuid.map(str::to_owned));
    }

    /// Raw server `info` reply. Needs no credentials.
    #[instrument(skip(self))]
    pub async fn info(&mut self) -> Result<Value> {
        let reply = self.http.call_rpc(&RpcRequest::Info, None).await?;
        Ok(reply.into_value())
    }

    /// Server capabilities, negotiated on first use and again whenever the
    /// endpoint host differs from the one they were negotiated with.
    pub async fn server_caps(&mut self) -> Result<&ServerCapabilities> {
        let host = self.http.endpoint().host().to_string();
        let caps = match self.server_caps.take() {
            Some(caps) if caps.host() == host => caps,
            _ => {
                let info = self.info().await?;
                let caps = ServerCapabilities::from_info(host, info);
                info!(version = %caps.version(), is_dev = caps.is_dev(), "Negotiated server capabilities");
                caps
            }
        };
        Ok(self.server_caps.insert(caps))
    }

    /// Discard negotiated capabilities and ask the server again.
    pub async fn renegotiate(&mut self) -> Result<&ServerCapabilities> {
        self.server_caps = None;
        self.server_caps().await
    }

    /// Open the connection and negotiate capabilities up front.
    pub async fn connect(&mut self) -> Result<()> {
        self.server_caps().await.map(|_| ())
    }

    /// Close the connection. The next operation reconnects.
    pub fn close(&mut self) {
        self.http.close();
    }

    /// Send one RPC call with credentials.
    ///
    /// On servers with token auth, a session is established before the first
    /// call. If the server rejects the held token, the session is renewed
    /// and the call retried once; a second rejection is returned as
    /// [`ErrorKind::SessionExpired`].
    pub(crate) async fn call(&mut self, request: &RpcRequest) -> Result<RpcResponse> {
        if !request.requires_auth() {
            return Ok(self.http.call_rpc(request, None).await?);
        }

        let caps = self.server_caps().await?;
        let use_token = caps.supports_session_token_auth();
        let send_uuid = caps.supports_session_uuid();
        if use_token && self.session.current_token().is_none() {
            self.session.handshake(&mut self.http).await?;
        }

        match self.call_once(request, use_token, send_uuid).await {
            Err(err) if use_token && err.is_invalid_session() => {
                warn!(method = request.method_name(), "Session token rejected, renewing session");
                self.session.invalidate();
                self.session.handshake(&mut self.http).await?;
                match self.call_once(request, use_token, send_uuid).await {
                    Err(err) if err.is_invalid_session() => {
                        self.session.invalidate();
                        Err(Error::with_source(
                            ErrorKind::SessionExpired(format!(
                                "{} rejected a freshly issued session",
                                request.method_name()
                            )),
                            err,
                        ))
                    }
                    other => other,
                }
            }
            other => other,
        }
    }

    async fn call_once(
        &mut self,
        request: &RpcRequest,
        use_token: bool,
        send_uuid: bool,
    ) -> Result<RpcResponse> {
        let mut auth = self.session.auth_block(use_token);
        if !send_uuid {
            auth = auth.with_session_uuid(None);
        }
        debug!(method = request.method_name(), with_token = auth.has_session_token(), "Calling");
        Ok(self.http.call_rpc(request, Some(&auth)).await?)
    }

    /// Decode a reply value into a record, filling in `type` and `id` when
    /// the server left them out.
    pub(crate) fn to_record(
        &self,
        value: Value,
        entity_type: &str,
        id: Option<i64>,
    ) -> Result<EntityRecord> {
        let mut decoded = self.http.codec().decode(value);
        if let Some(map) = decoded.as_map_mut() {
            map.entry("type".to_string())
                .or_insert_with(|| FieldValue::String(entity_type.to_string()));
            if let Some(id) = id {
                map.entry("id".to_string()).or_insert(FieldValue::Int(id));
            }
        }
        EntityRecord::from_value(decoded)
    }

    /// Rewrite local file links and, when configured, resolve thumbnails.
    pub(crate) async fn post_process(&mut self, records: &mut [EntityRecord]) -> Result<()> {
        for record in records.iter_mut() {
            self.client_caps.rewrite_local_paths(record.fields_mut());
        }
        if !self.config().resolve_thumbnail_urls {
            return Ok(());
        }
        for record in records.iter_mut() {
            if has_image(record.get("image")) {
                let url = self.thumbnail_url(record.entity_type(), record.id()).await?;
                record.insert("image", url);
            }
        }
        Ok(())
    }
}

/// Whether a record's `image` field points at a thumbnail. Empty values mean
/// there is none.
fn has_image(value: Option<&FieldValue>) -> bool {
    match value {
        None | Some(FieldValue::Null) | Some(FieldValue::Bool(false)) => false,
        Some(FieldValue::String(s)) => !s.is_empty(),
        Some(FieldValue::List(items)) => !items.is_empty(),
        Some(FieldValue::Map(map)) => !map.is_empty(),
        Some(_) => true,
    }
}
